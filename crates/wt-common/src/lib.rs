pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, TransportError, ViewError, WtError};
pub use id::PlayerId;
pub use types::{Color, Point};
