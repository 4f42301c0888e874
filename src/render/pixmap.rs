use std::path::Path;

use anyhow::Context;
use font8x8::{BASIC_FONTS, UnicodeFonts};

use crate::{
    assets::{decode::encode_png, store::PreparedImage},
    foundation::core::{Point, Rect, Rgba8Premul, Vec2},
    foundation::error::FlipbookResult,
    render::surface::Surface,
};

type PremulRgba8 = [u8; 4];

/// Side of one bitmap glyph cell, in pixels.
const GLYPH_SIZE: i64 = 8;

/// Text placed on a [`PixmapSurface`]. Labels are rasterized and also kept for inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLabel {
    /// Label text.
    pub text: String,
    /// Anchor in device pixels.
    pub at: Point,
    /// Fill color.
    pub color: Rgba8Premul,
}

/// CPU raster surface holding premultiplied RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct PixmapSurface {
    width: u32,
    height: u32,
    translation: Vec2,
    data: Vec<u8>,
    labels: Vec<TextLabel>,
}

impl PixmapSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            translation: Vec2::ZERO,
            data: vec![0; buffer_len(width, height)],
            labels: Vec::new(),
        }
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Labels placed since the last clear covering them.
    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    /// Pixel at device coordinates, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x as i64, y as i64);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Encode the current pixels as PNG.
    pub fn to_png(&self) -> FlipbookResult<Vec<u8>> {
        encode_png(self.width, self.height, &self.data)
    }

    /// Write the current pixels to `path` as PNG.
    pub fn save_png(&self, path: &Path) -> FlipbookResult<()> {
        let bytes = self.to_png()?;
        std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    fn index(&self, x: i64, y: i64) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// User-space rect to rounded device bounds `(x0, y0, x1, y1)`, end-exclusive.
    fn device_bounds(&self, rect: Rect) -> (i64, i64, i64, i64) {
        let r = rect + self.translation;
        (
            r.x0.round() as i64,
            r.y0.round() as i64,
            r.x1.round() as i64,
            r.y1.round() as i64,
        )
    }

    fn blend_at(&mut self, x: i64, y: i64, src: PremulRgba8, opacity: f32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let i = self.index(x, y);
        let dst = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        self.data[i..i + 4].copy_from_slice(&over(dst, src, opacity));
    }
}

impl Surface for PixmapSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.translation = Vec2::ZERO;
        self.data.clear();
        self.data.resize(buffer_len(width, height), 0);
        self.labels.clear();
    }

    fn translation(&self) -> Vec2 {
        self.translation
    }

    fn translate(&mut self, by: Vec2) {
        self.translation += by;
    }

    fn clear_rect(&mut self, rect: Rect) {
        let (x0, y0, x1, y1) = self.device_bounds(rect);
        let x0 = x0.clamp(0, i64::from(self.width));
        let x1 = x1.clamp(0, i64::from(self.width));
        let y0 = y0.clamp(0, i64::from(self.height));
        let y1 = y1.clamp(0, i64::from(self.height));
        for y in y0..y1 {
            if x0 >= x1 {
                break;
            }
            let start = self.index(x0, y);
            let end = self.index(x1, y);
            self.data[start..end].fill(0);
        }

        let device = rect + self.translation;
        self.labels.retain(|l| !device.contains(l.at));
    }

    fn draw_image(&mut self, image: &PreparedImage, src: Rect, dest: Rect, opacity: f32) {
        let (dx0, dy0, _, _) = self.device_bounds(dest);
        let sx0 = src.x0.round() as i64;
        let sy0 = src.y0.round() as i64;
        let w = src.width().round() as i64;
        let h = src.height().round() as i64;
        let iw = i64::from(image.width);
        let ih = i64::from(image.height);

        for row in 0..h {
            let sy = sy0 + row;
            if sy < 0 || sy >= ih {
                continue;
            }
            for col in 0..w {
                let sx = sx0 + col;
                if sx < 0 || sx >= iw {
                    continue;
                }
                let si = ((sy * iw + sx) * 4) as usize;
                let px = &image.rgba8_premul[si..si + 4];
                self.blend_at(dx0 + col, dy0 + row, [px[0], px[1], px[2], px[3]], opacity);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba8Premul) {
        let (x0, y0, x1, y1) = self.device_bounds(rect);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let c = color.to_array();
        for x in x0..x1 {
            self.blend_at(x, y0, c, 1.0);
            if y1 - 1 != y0 {
                self.blend_at(x, y1 - 1, c, 1.0);
            }
        }
        for y in (y0 + 1)..(y1 - 1) {
            self.blend_at(x0, y, c, 1.0);
            if x1 - 1 != x0 {
                self.blend_at(x1 - 1, y, c, 1.0);
            }
        }
    }

    /// Draw `text` in an 8x8 bitmap font, centered on `at` and sitting on it as a baseline.
    /// Characters outside basic Latin leave a blank cell.
    fn fill_text(&mut self, text: &str, at: Point, color: Rgba8Premul) {
        let anchor = at + self.translation;
        let c = color.to_array();
        let cells = text.chars().count() as i64;
        let left = anchor.x.round() as i64 - cells * GLYPH_SIZE / 2;
        let top = anchor.y.round() as i64 - (GLYPH_SIZE - 1);

        for (cell, ch) in text.chars().enumerate() {
            let Some(rows) = BASIC_FONTS.get(ch) else {
                continue;
            };
            let x0 = left + cell as i64 * GLYPH_SIZE;
            for (dy, bits) in rows.iter().enumerate() {
                for dx in 0..8u8 {
                    if bits & (1 << dx) != 0 {
                        self.blend_at(x0 + i64::from(dx), top + dy as i64, c, 1.0);
                    }
                }
            }
        }

        self.labels.push(TextLabel {
            text: text.to_owned(),
            at: anchor,
            color,
        });
    }
}

fn buffer_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/pixmap.rs"]
mod tests;
