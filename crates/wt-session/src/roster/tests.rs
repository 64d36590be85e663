use std::time::Duration;

use tokio::time::Instant;
use wt_common::{Color, PlayerId, Point, ViewError};

use super::*;
use crate::protocol::{InboundEvent, JoinResponse, PlayerInfo};
use crate::testing::{RecordingView, ViewCall};

fn info(id: u64, x: f64, y: f64) -> PlayerInfo {
    PlayerInfo {
        player_id: PlayerId::from(id),
        color: "#ff0000".into(),
        pos_x: x,
        pos_y: y,
    }
}

fn ready_roster(local: u64) -> Roster {
    let mut roster = Roster::default();
    roster.set_local_identity(PlayerId::from(local));
    roster
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

#[test]
fn add_player_twice_keeps_one_entry() {
    let mut view = RecordingView::default();
    let mut roster = ready_roster(1);

    assert_eq!(roster.add_player(&info(2, 0.0, 0.0), &mut view), Ok(true));
    assert_eq!(roster.add_player(&info(2, 9.0, 9.0), &mut view), Ok(false));

    assert_eq!(roster.len(), 1);
    assert_eq!(view.created(), 1);
    assert_eq!(
        roster.player(&PlayerId::from(2)).unwrap().destination(),
        Point::ORIGIN
    );
}

#[test]
fn add_player_uses_style_and_color() {
    let mut view = RecordingView::default();
    let mut roster = Roster::new(PlayerStyle {
        shape: "rect".into(),
        size: 24.0,
        speed: 100.0,
    });
    roster.set_local_identity(PlayerId::from(1));

    roster.add_player(&info(1, 3.0, 4.0), &mut view).unwrap();

    match &view.calls()[0] {
        ViewCall::Create { spec, .. } => {
            assert_eq!(spec.kind, ShapeKind::Rect);
            assert_eq!(spec.color, Color::from_rgb(255, 0, 0));
            assert_eq!(spec.width, 24.0);
            assert_eq!(spec.position, Point::new(3.0, 4.0));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(roster.player(&PlayerId::from(1)).unwrap().speed(), 100.0);
}

#[test]
fn invalid_color_falls_back_to_black() {
    let mut view = RecordingView::default();
    let mut roster = ready_roster(1);
    let mut player = info(2, 0.0, 0.0);
    player.color = "chartreuse".into();

    roster.add_player(&player, &mut view).unwrap();

    assert_eq!(
        roster.player(&PlayerId::from(2)).unwrap().color(),
        Color::BLACK
    );
}

#[test]
fn unsupported_shape_does_not_register() {
    let mut view = RecordingView::default();
    let mut roster = Roster::new(PlayerStyle {
        shape: "star".into(),
        ..PlayerStyle::default()
    });
    roster.set_local_identity(PlayerId::from(1));

    let result = roster.add_player(&info(2, 0.0, 0.0), &mut view);

    assert_eq!(result, Err(ViewError::UnsupportedShape("star".into())));
    assert!(roster.is_empty());
    assert_eq!(view.created(), 0);
}

#[test]
fn view_failure_does_not_register() {
    let mut view = RecordingView::rejecting();
    let mut roster = ready_roster(1);

    assert!(roster.add_player(&info(2, 0.0, 0.0), &mut view).is_err());
    assert!(!roster.contains(&PlayerId::from(2)));
}

#[test]
fn remove_releases_visual() {
    let mut view = RecordingView::default();
    let mut roster = ready_roster(1);
    roster.add_player(&info(2, 0.0, 0.0), &mut view).unwrap();
    let visual = roster.player(&PlayerId::from(2)).unwrap().visual();

    assert_eq!(
        roster.remove_player(&PlayerId::from(2), &mut view),
        Some(Removal::Removed)
    );
    assert!(roster.is_empty());
    assert_eq!(view.calls().last(), Some(&ViewCall::Destroy(visual)));
}

#[test]
fn unknown_ids_are_tolerated() {
    let mut view = RecordingView::default();
    let mut roster = ready_roster(1);
    roster.add_player(&info(2, 0.0, 0.0), &mut view).unwrap();
    let before = view.calls().len();

    assert_eq!(roster.remove_player(&PlayerId::from(99), &mut view), None);
    let moved = roster.apply_positions(
        &[("99".to_string(), Point::new(1.0, 1.0))],
        Instant::now(),
        &mut view,
    );

    assert_eq!(moved, 0);
    assert_eq!(roster.len(), 1);
    assert_eq!(view.calls().len(), before);
}

#[test]
fn removing_local_player_is_an_ejection() {
    let mut view = RecordingView::default();
    let mut roster = ready_roster(1);
    roster.add_player(&info(1, 0.0, 0.0), &mut view).unwrap();

    let updates = roster.apply(
        InboundEvent::Left(vec![PlayerId::from(1)]),
        Instant::now(),
        &mut view,
    );

    assert_eq!(updates, vec![RosterUpdate::Ejected(PlayerId::from(1))]);
    assert!(!roster.contains(&PlayerId::from(1)));
}

#[test]
fn leave_removes_each_listed_id() {
    let mut view = RecordingView::default();
    let mut roster = ready_roster(1);
    for id in 1..=4 {
        roster.add_player(&info(id, 0.0, 0.0), &mut view).unwrap();
    }

    let updates = roster.apply(
        InboundEvent::Left(vec![PlayerId::from(2), PlayerId::from(4), PlayerId::from(7)]),
        Instant::now(),
        &mut view,
    );

    assert_eq!(
        updates,
        vec![
            RosterUpdate::Left(PlayerId::from(2)),
            RosterUpdate::Left(PlayerId::from(4)),
        ]
    );
    let mut left: Vec<_> = roster.ids().cloned().collect();
    left.sort_by_key(|id| id.to_string());
    assert_eq!(left, vec![PlayerId::from(1), PlayerId::from(3)]);
}

// ---------------------------------------------------------------------------
// Gating
// ---------------------------------------------------------------------------

#[test]
fn nothing_happens_before_identity() {
    let mut view = RecordingView::default();
    let mut roster = Roster::default();
    let now = Instant::now();

    assert_eq!(roster.add_player(&info(2, 0.0, 0.0), &mut view), Ok(false));
    assert!(roster
        .apply(InboundEvent::Joined(vec![info(3, 0.0, 0.0)]), now, &mut view)
        .is_empty());
    assert!(roster
        .apply(InboundEvent::Left(vec![PlayerId::from(3)]), now, &mut view)
        .is_empty());
    assert_eq!(
        roster.apply_positions(&[("2".to_string(), Point::ORIGIN)], now, &mut view),
        0
    );

    assert!(roster.is_empty());
    assert!(view.calls().is_empty());
}

#[test]
fn identity_is_set_once() {
    let mut roster = Roster::default();
    assert!(roster.set_local_identity(PlayerId::from(1)));
    assert!(!roster.set_local_identity(PlayerId::from(2)));
    assert_eq!(roster.local_identity(), Some(&PlayerId::from(1)));
}

// ---------------------------------------------------------------------------
// Seeding and motion
// ---------------------------------------------------------------------------

#[test]
fn seed_adds_players_and_self_once() {
    let mut view = RecordingView::default();
    let mut roster = Roster::default();
    let response = JoinResponse {
        player: info(2, 0.0, 0.0),
        players: vec![info(1, 40.0, 15.0), info(2, 0.0, 0.0)],
    };

    let added = roster.seed(&response, &mut view);

    assert_eq!(added, 2);
    assert_eq!(roster.local_identity(), Some(&PlayerId::from(2)));
    assert_eq!(view.created(), 2);
}

#[test]
fn seeded_roster_then_join_then_positions() {
    let mut view = RecordingView::default();
    let mut roster = Roster::default();
    let now = Instant::now();
    roster.seed(
        &JoinResponse {
            player: info(1, 0.0, 0.0),
            players: vec![info(1, 0.0, 0.0)],
        },
        &mut view,
    );

    let updates = roster.apply(InboundEvent::Joined(vec![info(2, 5.0, 5.0)]), now, &mut view);
    assert_eq!(updates, vec![RosterUpdate::Joined(PlayerId::from(2))]);
    assert!(roster.contains(&PlayerId::from(1)));
    assert!(roster.contains(&PlayerId::from(2)));

    roster.apply(
        InboundEvent::PositionUpdate(vec![("1".to_string(), Point::new(10.0, 0.0))]),
        now,
        &mut view,
    );

    let one = roster.player(&PlayerId::from(1)).unwrap();
    let two = roster.player(&PlayerId::from(2)).unwrap();
    assert_eq!(
        view.animations(),
        vec![(one.visual(), Point::new(10.0, 0.0), Duration::from_millis(17))]
    );
    assert!(one.transition(now).is_some());
    assert!(two.transition(now).is_none());
}

#[test]
fn position_keys_resolve_string_ids() {
    let mut view = RecordingView::default();
    let mut roster = Roster::default();
    let now = Instant::now();
    let mut local = info(0, 0.0, 0.0);
    local.player_id = PlayerId::from("7");
    roster.seed(
        &JoinResponse {
            player: local,
            players: Vec::new(),
        },
        &mut view,
    );

    roster.apply(
        InboundEvent::PositionUpdate(vec![("7".to_string(), Point::new(10.0, 0.0))]),
        now,
        &mut view,
    );

    assert_eq!(roster.resolve_key("7"), Some(PlayerId::from("7")));
    assert_eq!(view.animations().len(), 1);
    assert_eq!(
        roster.player(&PlayerId::from("7")).unwrap().destination(),
        Point::new(10.0, 0.0)
    );
}

#[test]
fn position_keys_resolve_numeric_ids() {
    let mut view = RecordingView::default();
    let mut roster = ready_roster(1);
    roster.add_player(&info(7, 0.0, 0.0), &mut view).unwrap();
    let mut negative = info(0, 0.0, 0.0);
    negative.player_id = serde_json::from_value(serde_json::json!(-2)).unwrap();
    roster.add_player(&negative, &mut view).unwrap();

    let moved = roster.apply_positions(
        &[
            ("7".to_string(), Point::new(6.0, 0.0)),
            ("-2".to_string(), Point::new(0.0, 6.0)),
            ("007".to_string(), Point::new(1.0, 1.0)),
        ],
        Instant::now(),
        &mut view,
    );

    assert_eq!(moved, 2);
    assert_eq!(roster.resolve_key("7"), Some(PlayerId::from(7)));
    assert_eq!(roster.resolve_key("007"), None);
}

#[test]
fn move_player_accepts_speed_override() {
    let mut view = RecordingView::default();
    let mut roster = ready_roster(1);
    roster.add_player(&info(1, 0.0, 0.0), &mut view).unwrap();

    let duration = roster.move_player(
        &PlayerId::from(1),
        Point::new(100.0, 0.0),
        Some(50.0),
        Instant::now(),
        &mut view,
    );

    assert_eq!(duration, Some(Duration::from_secs(2)));
}

#[test]
fn clear_destroys_every_visual() {
    let mut view = RecordingView::default();
    let mut roster = ready_roster(1);
    roster.add_player(&info(1, 0.0, 0.0), &mut view).unwrap();
    roster.add_player(&info(2, 0.0, 0.0), &mut view).unwrap();

    roster.clear(&mut view);

    assert!(roster.is_empty());
    assert_eq!(view.destroyed(), 2);
    assert!(roster.is_ready());
}
