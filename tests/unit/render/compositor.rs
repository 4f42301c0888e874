use super::*;
use crate::fixtures;
use crate::foundation::core::Rect;
use crate::foundation::error::FlipbookError;
use crate::render::surface::{RecordingSurface, SurfaceOp};

fn compositor() -> Compositor<RecordingSurface> {
    Compositor::new(
        RecordingSurface::new(1, 1),
        Arc::new(fixtures::face()),
        fixtures::images(),
    )
}

fn config(frame_type: FrameType, debug: bool) -> FrameConfig {
    FrameConfig { debug, frame_type }
}

fn frame_a() -> Vec<String> {
    fixtures::names(&["body", "head", "faceA"])
}

#[test]
fn new_sizes_surface_to_reference() {
    let c = compositor();
    assert_eq!(c.surface().size(), (20, 30));
    assert_eq!(
        c.surface().ops(),
        &[SurfaceOp::Resize {
            width: 20,
            height: 30
        }]
    );
}

#[test]
fn default_frame_keeps_reference_size_and_draws_every_slot() {
    let mut c = compositor();
    c.surface_mut().take_ops();

    let span = c
        .draw_frame(&frame_a(), &config(FrameType::Default, false), true)
        .unwrap();
    assert_eq!(span.min_y, -5.0);

    let ops = c.surface_mut().take_ops();
    assert_eq!(ops[0], SurfaceOp::Clear(Rect::new(0.0, 0.0, 20.0, 30.0)));
    assert_eq!(
        ops[1],
        SurfaceOp::Resize {
            width: 20,
            height: 30
        }
    );
    let drawn: Vec<_> = ops
        .iter()
        .filter_map(|op| match op {
            SurfaceOp::DrawImage { dest, opacity, .. } => Some((*dest, *opacity)),
            _ => None,
        })
        .collect();
    assert_eq!(
        drawn,
        vec![
            (Rect::new(0.0, 0.0, 20.0, 30.0), 1.0),
            (Rect::new(2.0, -5.0, 18.0, 11.0), 1.0),
            // head's sub_y moves the face down by one.
            (Rect::new(4.0, 1.0, 12.0, 9.0), 1.0),
        ]
    );
}

#[test]
fn expand_fits_surface_to_span() {
    let mut c = compositor();
    c.draw_frame(&frame_a(), &config(FrameType::Expand, false), true)
        .unwrap();
    assert_eq!(c.surface().size(), (20, 35));
    assert_eq!(c.surface().translation(), Vec2::new(0.0, 5.0));

    // Later frames keep the calibrated transform and clear the visible area.
    c.surface_mut().take_ops();
    c.draw_frame(&frame_a(), &config(FrameType::Expand, false), false)
        .unwrap();
    let ops = c.surface().ops();
    assert_eq!(ops[0], SurfaceOp::Clear(Rect::new(0.0, -5.0, 20.0, 30.0)));
    assert!(!ops.iter().any(|op| matches!(op, SurfaceOp::Resize { .. })));
}

#[test]
fn face_only_draws_last_slot_at_nominal_position() {
    let mut c = compositor();
    c.surface_mut().take_ops();
    let span = c
        .draw_frame(&frame_a(), &config(FrameType::FaceOnly, false), true)
        .unwrap();

    assert_eq!(span.to_rect(), Some(Rect::new(4.0, 0.0, 12.0, 8.0)));
    assert_eq!(c.surface().size(), (8, 8));
    assert_eq!(c.surface().translation(), Vec2::new(-4.0, 0.0));
    assert_eq!(
        c.surface().drawn_rects(),
        vec![Rect::new(4.0, 0.0, 12.0, 8.0)]
    );
}

#[test]
fn debug_overlays_follow_each_part() {
    let mut c = compositor();
    c.surface_mut().take_ops();
    c.draw_frame(&frame_a(), &config(FrameType::Default, true), false)
        .unwrap();

    let ops = c.surface().ops();
    // Clear, then (image, outline, label) per part.
    assert_eq!(ops.len(), 1 + 3 * 3);
    assert!(matches!(
        ops[1],
        SurfaceOp::DrawImage { opacity, .. } if opacity == DEBUG_OPACITY
    ));
    assert_eq!(ops[2], SurfaceOp::StrokeRect(Rect::new(0.0, 0.0, 20.0, 30.0)));
    assert_eq!(
        ops[3],
        SurfaceOp::FillText {
            text: "0:body".to_owned(),
            at: Point::new(10.0, 15.0),
        }
    );
    assert!(matches!(&ops[9], SurfaceOp::FillText { text, .. } if text == "2:faceA"));
}

#[test]
fn label_clamp_falls_back_to_midpoint() {
    assert_eq!(clamp_inward(0.0, 40.0, 60.0), 40.0);
    assert_eq!(clamp_inward(100.0, 40.0, 60.0), 60.0);
    assert_eq!(clamp_inward(50.0, 40.0, 60.0), 50.0);
    assert_eq!(clamp_inward(0.0, 44.0, -28.0), 8.0);
}

#[test]
fn missing_part_fails_before_drawing() {
    let mut c = compositor();
    c.surface_mut().take_ops();
    let err = c
        .draw_frame(
            &fixtures::names(&["body", "head", "faceZ"]),
            &config(FrameType::Default, false),
            false,
        )
        .unwrap_err();
    assert!(matches!(err, FlipbookError::UnresolvedReference(_)));
    assert!(c.surface().drawn_rects().is_empty());
}

#[test]
fn missing_image_is_unresolved() {
    let mut c = Compositor::new(
        RecordingSurface::new(1, 1),
        Arc::new(fixtures::face()),
        ImageSet::default(),
    );
    let err = c
        .draw_frame(&frame_a(), &config(FrameType::Default, false), false)
        .unwrap_err();
    assert!(err.to_string().contains("couldn't find img"));
}

#[test]
fn expanded_span_ignores_framing() {
    let c = compositor();
    let span = c.expanded_span(&frame_a()).unwrap();
    assert_eq!(span.to_rect(), Some(Rect::new(0.0, -5.0, 20.0, 30.0)));
}
