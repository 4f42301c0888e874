use std::collections::BTreeMap;

use super::*;
use crate::face::model::PartTable;
use crate::foundation::error::FlipbookError;

fn part(dest_x: f64, dest_y: f64, sub_x: Option<f64>, sub_y: Option<f64>) -> Part {
    Part {
        src_x: 0.0,
        src_y: 0.0,
        width: 10.0,
        height: 10.0,
        dest_x,
        dest_y,
        sub_x,
        sub_y,
        img: None,
    }
}

fn face_with(slots: Vec<(&str, Part)>) -> Face {
    let parts = slots
        .into_iter()
        .map(|(name, p)| {
            let mut t = PartTable::new();
            t.insert(name.to_owned(), p);
            t
        })
        .collect();
    Face {
        width: 10,
        height: 10,
        center_x: None,
        center_y: None,
        src: "x.png".to_owned(),
        sub_images: BTreeMap::new(),
        parts,
        expressions: BTreeMap::new(),
    }
}

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn stacked_parts_at_origin_span_one_tile() {
    let face = face_with(vec![
        ("bodyA", part(0.0, 0.0, None, None)),
        ("headA", part(0.0, 0.0, None, None)),
        ("faceA", part(0.0, 0.0, None, None)),
    ]);
    let frame = resolve_frame(&names(&["bodyA", "headA", "faceA"]), &face, false).unwrap();
    assert_eq!(frame.parts.len(), 3);
    assert_eq!(
        frame.span,
        Span {
            min_x: 0.0,
            max_x: 10.0,
            min_y: 0.0,
            max_y: 10.0
        }
    );
}

#[test]
fn carry_over_moves_only_later_parts() {
    let face = face_with(vec![
        ("a", part(5.0, 2.0, Some(3.0), None)),
        ("b", part(5.0, 2.0, None, None)),
    ]);
    let frame = resolve_frame(&names(&["a", "b"]), &face, false).unwrap();
    assert_eq!(frame.parts[0].dest, Point::new(5.0, 2.0));
    assert_eq!(frame.parts[1].dest, Point::new(8.0, 2.0));
}

#[test]
fn carry_over_accumulates_across_slots() {
    let face = face_with(vec![
        ("a", part(0.0, 0.0, Some(1.0), Some(-2.0))),
        ("b", part(0.0, 0.0, Some(4.0), Some(10.0))),
        ("c", part(1.0, 1.0, Some(100.0), Some(100.0))),
    ]);
    let frame = resolve_frame(&names(&["a", "b", "c"]), &face, false).unwrap();
    assert_eq!(frame.parts[0].dest, Point::new(0.0, 0.0));
    assert_eq!(frame.parts[1].dest, Point::new(1.0, -2.0));
    assert_eq!(frame.parts[2].dest, Point::new(6.0, 9.0));
    assert_eq!(frame.span.min_y, -2.0);
    assert_eq!(frame.span.max_x, 16.0);
}

#[test]
fn face_only_keeps_last_slot_at_nominal_position() {
    let face = face_with(vec![
        ("a", part(0.0, 0.0, Some(7.0), Some(7.0))),
        ("b", part(0.0, 0.0, None, None)),
        ("c", part(2.0, 3.0, None, None)),
    ]);
    let frame = resolve_frame(&names(&["a", "b", "c"]), &face, true).unwrap();
    assert_eq!(frame.parts.len(), 1);
    assert_eq!(frame.parts[0].name, "c");
    assert_eq!(frame.parts[0].slot, 2);
    assert_eq!(frame.parts[0].dest, Point::new(2.0, 3.0));
    assert_eq!(frame.parts[0].label(), "2:c");
}

#[test]
fn face_only_with_single_slot() {
    let face = face_with(vec![("only", part(0.0, 0.0, None, None))]);
    let frame = resolve_frame(&names(&["only"]), &face, true).unwrap();
    assert_eq!(frame.parts.len(), 1);
}

#[test]
fn empty_frame_yields_sentinel_span() {
    let face = face_with(vec![]);
    let frame = resolve_frame(&[], &face, false).unwrap();
    assert!(frame.parts.is_empty());
    assert!(frame.span.is_empty());
    assert_eq!(frame.span, Span::EMPTY);

    let frame = accumulate(&[], true);
    assert!(frame.span.is_empty());
}

#[test]
fn missing_part_fails_even_when_face_only() {
    let face = face_with(vec![
        ("a", part(0.0, 0.0, None, None)),
        ("b", part(0.0, 0.0, None, None)),
    ]);
    let err = resolve_frame(&names(&["zzz", "b"]), &face, true).unwrap_err();
    assert!(matches!(err, FlipbookError::UnresolvedReference(_)));
}

#[test]
fn image_name_defaults_to_default_image() {
    let mut p = part(0.0, 0.0, None, None);
    p.img = Some("extra".to_owned());
    let face = face_with(vec![("a", part(0.0, 0.0, None, None)), ("b", p)]);
    let frame = resolve_frame(&names(&["a", "b"]), &face, false).unwrap();
    assert_eq!(frame.parts[0].image, DEFAULT_IMAGE);
    assert_eq!(frame.parts[1].image, "extra");
}

#[test]
fn non_empty_spans_are_well_ordered() {
    // Deterministic pseudo-random sweep over carry-over chains.
    let mut seed = 0x2545_f491_u64;
    let mut next = || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        ((seed % 41) as f64) - 20.0
    };
    for n in 1..6 {
        let slots: Vec<(String, Part)> = (0..n)
            .map(|i| {
                let mut p = part(next(), next(), Some(next()), Some(next()));
                p.width = next().abs();
                p.height = next().abs();
                (format!("p{i}"), p)
            })
            .collect();
        let inputs: Vec<PartInput<'_>> = slots
            .iter()
            .enumerate()
            .map(|(slot, (name, part))| PartInput { name, slot, part })
            .collect();
        let frame = accumulate(&inputs, false);
        assert!(frame.span.min_x <= frame.span.max_x);
        assert!(frame.span.min_y <= frame.span.max_y);
    }
}
