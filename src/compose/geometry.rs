use crate::{
    face::model::{DEFAULT_IMAGE, Face, Part},
    foundation::core::{Point, Rect, Size, Span, Vec2},
    foundation::error::FlipbookResult,
};

/// A looked-up part ready for accumulation.
#[derive(Clone, Copy, Debug)]
pub struct PartInput<'a> {
    /// Part name within its slot.
    pub name: &'a str,
    /// Slot index the part was looked up in.
    pub slot: usize,
    /// Part geometry.
    pub part: &'a Part,
}

/// Per-draw record of one part in absolute surface coordinates. Never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPart {
    /// Part name within its slot.
    pub name: String,
    /// Slot index.
    pub slot: usize,
    /// Top-left corner of the sprite in its image.
    pub source: Point,
    /// Top-left corner on the surface, carry-over applied.
    pub dest: Point,
    /// Sprite size, shared by source and destination.
    pub size: Size,
    /// Image name; [`DEFAULT_IMAGE`] for the face's default image.
    pub image: String,
}

impl ResolvedPart {
    /// Source rectangle in image space.
    pub fn source_rect(&self) -> Rect {
        Rect::from_origin_size(self.source, self.size)
    }

    /// Destination rectangle in surface space.
    pub fn dest_rect(&self) -> Rect {
        Rect::from_origin_size(self.dest, self.size)
    }

    /// Debug label, `"{slot}:{name}"`.
    pub fn label(&self) -> String {
        format!("{}:{}", self.slot, self.name)
    }
}

/// Resolved parts of one frame plus their bounding span.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedFrame {
    /// Parts in draw order.
    pub parts: Vec<ResolvedPart>,
    /// Bounding span; the empty sentinel when `parts` is empty.
    pub span: Span,
}

/// Look up every name of a frame in its slot, then accumulate.
///
/// `names[i]` is looked up in `face.parts[i]`. Every name is resolved even in face-only mode, so
/// a broken frame fails the same way regardless of framing.
pub fn resolve_frame(
    names: &[String],
    face: &Face,
    face_only: bool,
) -> FlipbookResult<ResolvedFrame> {
    let inputs = names
        .iter()
        .enumerate()
        .map(|(slot, name)| {
            Ok(PartInput {
                name,
                slot,
                part: face.part(slot, name)?,
            })
        })
        .collect::<FlipbookResult<Vec<_>>>()?;

    Ok(accumulate(&inputs, face_only))
}

/// Fold looked-up parts into absolute rectangles.
///
/// Each part lands at `dest + offset`, where `offset` is the sum of `sub_x`/`sub_y` of every part
/// before it. A part's own carry-over only moves the parts after it. With `face_only` only the
/// last part is kept, before the fold, so it is drawn at its nominal position.
pub fn accumulate(inputs: &[PartInput<'_>], face_only: bool) -> ResolvedFrame {
    let inputs = if face_only {
        &inputs[inputs.len().saturating_sub(1)..]
    } else {
        inputs
    };

    let (parts, span, _) = inputs.iter().fold(
        (Vec::with_capacity(inputs.len()), Span::EMPTY, Vec2::ZERO),
        |(mut parts, span, offset), input| {
            let p = input.part;
            let resolved = ResolvedPart {
                name: input.name.to_owned(),
                slot: input.slot,
                source: Point::new(p.src_x, p.src_y),
                dest: Point::new(p.dest_x, p.dest_y) + offset,
                size: Size::new(p.width, p.height),
                image: p.img.clone().unwrap_or_else(|| DEFAULT_IMAGE.to_owned()),
            };
            let span = span.widen(resolved.dest_rect());
            let offset = offset + Vec2::new(p.sub_x.unwrap_or(0.0), p.sub_y.unwrap_or(0.0));
            parts.push(resolved);
            (parts, span, offset)
        },
    );

    ResolvedFrame { parts, span }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/geometry.rs"]
mod tests;
