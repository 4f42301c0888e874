use super::*;
use crate::config::{FrameConfig, FrameType};
use crate::fixtures;
use crate::render::surface::{RecordingSurface, SurfaceOp};

fn resolved(expression: &str) -> ResolvedFace {
    ResolvedFace {
        id: CharacterId::parse("main.lea").unwrap(),
        face: Arc::new(fixtures::face()),
        expression: expression.to_owned(),
        images: fixtures::images(),
    }
}

fn hover_config() -> ViewerConfig {
    ViewerConfig {
        frame: FrameConfig::default(),
        loop_on_hover: true,
    }
}

fn draws(ind: &Individual<RecordingSurface>) -> usize {
    ind.surface()
        .unwrap()
        .ops()
        .iter()
        .filter(|op| matches!(op, SurfaceOp::DrawImage { .. }))
        .count()
}

#[test]
fn binding_paints_nothing_until_render() {
    let book = TimerBook::new();
    let mut ind = resolved("NEUTRAL")
        .bind(RecordingSurface::new(1, 1), ViewerConfig::default(), &book)
        .unwrap();
    assert_eq!(ind.surface().unwrap().size(), (20, 30));
    assert_eq!(draws(&ind), 0);
    assert!(!ind.is_animation());

    ind.render(Millis(0)).unwrap();
    assert_eq!(draws(&ind), 3);
    assert_eq!(ind.state(), PlaybackState::Idle);
    assert_eq!(ind.next_deadline(), None);
    assert_eq!(ind.advance(Millis(10_000)).unwrap(), 0);
}

#[test]
fn unknown_expression_fails_to_bind() {
    let book = TimerBook::new();
    let err = resolved("NOPE")
        .bind(RecordingSurface::new(1, 1), ViewerConfig::default(), &book)
        .err()
        .unwrap();
    assert!(matches!(err, FlipbookError::UnresolvedReference(_)));
}

#[test]
fn animated_render_plays_once() {
    let book = TimerBook::new();
    let mut ind = resolved("SHAKE")
        .bind(RecordingSurface::new(1, 1), ViewerConfig::default(), &book)
        .unwrap();
    assert!(ind.is_animation());

    ind.render(Millis(0)).unwrap();
    assert_eq!(ind.state(), PlaybackState::PlayingOnce);
    assert_eq!(ind.next_deadline(), Some(Millis(500)));
    assert_eq!(ind.advance(Millis(2500)).unwrap(), 5);
    assert_eq!(ind.state(), PlaybackState::Idle);
    assert_eq!(book.active_count(), 0);
}

#[test]
fn hover_loops_only_when_bound() {
    let book = TimerBook::new();
    let mut ind = resolved("BLINK")
        .bind(RecordingSurface::new(1, 1), ViewerConfig::default(), &book)
        .unwrap();
    ind.render(Millis(0)).unwrap();
    assert!(!ind.is_hover_bound());
    ind.pointer_enter(Millis(10)).unwrap();
    assert_eq!(ind.state(), PlaybackState::PlayingOnce);

    let mut ind = resolved("BLINK")
        .bind(RecordingSurface::new(1, 1), hover_config(), &book)
        .unwrap();
    ind.render(Millis(0)).unwrap();
    assert!(ind.is_hover_bound());
    ind.pointer_enter(Millis(10)).unwrap();
    assert_eq!(ind.state(), PlaybackState::PlayingLoop);
    ind.pointer_leave();
    assert_eq!(ind.state(), PlaybackState::PlayingOnce);
}

#[test]
fn turning_hover_off_stops_the_loop() {
    let book = TimerBook::new();
    let mut ind = resolved("BLINK")
        .bind(RecordingSurface::new(1, 1), hover_config(), &book)
        .unwrap();
    ind.render(Millis(0)).unwrap();
    ind.pointer_enter(Millis(0)).unwrap();

    ind.update_config(ViewerConfig::default()).unwrap();
    assert!(!ind.is_hover_bound());
    assert_eq!(ind.state(), PlaybackState::PlayingOnce);
}

#[test]
fn update_config_recalibrates_still_faces() {
    let book = TimerBook::new();
    let mut ind = resolved("NEUTRAL")
        .bind(RecordingSurface::new(1, 1), ViewerConfig::default(), &book)
        .unwrap();
    ind.render(Millis(0)).unwrap();

    ind.update_config(ViewerConfig {
        frame: FrameConfig {
            debug: false,
            frame_type: FrameType::FaceOnly,
        },
        loop_on_hover: false,
    })
    .unwrap();
    assert_eq!(ind.surface().unwrap().size(), (8, 8));
}

#[test]
fn set_expression_tears_down_and_rerenders() {
    let book = TimerBook::new();
    let mut ind = resolved("BLINK")
        .bind(RecordingSurface::new(1, 1), hover_config(), &book)
        .unwrap();
    ind.render(Millis(0)).unwrap();
    ind.pointer_enter(Millis(0)).unwrap();
    assert_eq!(book.active_count(), 2);

    assert!(ind.set_expression("NOPE", Millis(50)).is_err());
    assert_eq!(ind.expression(), "BLINK");
    assert_eq!(book.active_count(), 2);

    ind.set_expression("NEUTRAL", Millis(50)).unwrap();
    assert_eq!(ind.expression(), "NEUTRAL");
    assert_eq!(book.active_count(), 0);
    assert!(!ind.is_hover_bound());
    assert_eq!(ind.state(), PlaybackState::Idle);
}

#[test]
fn into_surface_and_drop_release_timers() {
    let book = TimerBook::new();
    let mut ind = resolved("BLINK")
        .bind(RecordingSurface::new(1, 1), hover_config(), &book)
        .unwrap();
    ind.render(Millis(0)).unwrap();
    ind.pointer_enter(Millis(0)).unwrap();

    let surface = ind.into_surface().unwrap();
    assert_eq!(book.active_count(), 0);
    assert_eq!(surface.size(), (20, 30));

    // The surface can be bound again by a new owner.
    let mut ind = resolved("SHAKE").bind(surface, hover_config(), &book).unwrap();
    ind.render(Millis(0)).unwrap();
    assert_eq!(book.active_count(), 1);
    drop(ind);
    assert_eq!(book.active_count(), 0);
}
