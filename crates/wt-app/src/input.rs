//! Pointer input from stdin: one `x y` coordinate per line.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use wt_common::Point;
use wt_session::GameClient;

/// Parse `x y` (or `x,y`) into a point.
pub fn parse_point(line: &str) -> Option<Point> {
    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());
    let x = parts.next()?.parse::<f64>().ok()?;
    let y = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() || !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(Point::new(x, y))
}

/// Forward stdin lines to the session as pointer-down events until EOF.
pub async fn forward_stdin(client: GameClient) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => match parse_point(&line) {
                Some(point) => client.pointer_down(point).await,
                None => warn!(input = %line, "Expected `x y`"),
            },
            Ok(None) => {
                debug!("stdin closed");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stdin");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_space_and_comma_separated() {
        assert_eq!(parse_point("120 80"), Some(Point::new(120.0, 80.0)));
        assert_eq!(parse_point(" 3.5,  -2 "), Some(Point::new(3.5, -2.0)));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_point(""), None);
        assert_eq!(parse_point("12"), None);
        assert_eq!(parse_point("1 2 3"), None);
        assert_eq!(parse_point("left up"), None);
        assert_eq!(parse_point("inf 0"), None);
    }
}
