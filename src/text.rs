//! Glyph atlas for the control panel's labels.
//!
//! Printable ASCII is rasterised once with `fontdue` at a fixed pixel size and
//! shelf-packed into a single-channel coverage bitmap. Characters outside that
//! range are drawn as `?`.

use std::collections::HashMap;

use anyhow::anyhow;

const FIRST_CHAR: char = ' ';
const LAST_CHAR: char = '~';
const FALLBACK_CHAR: char = '?';
const ATLAS_WIDTH: u32 = 256;
const GLYPH_PADDING: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq)]
struct GlyphInfo {
    /// From the pen position on the baseline to the bitmap's top-left corner.
    offset: [f32; 2],
    size: [f32; 2],
    advance: f32,
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

/// A glyph positioned in physical pixels, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub min: [f32; 2],
    pub max: [f32; 2],
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

#[derive(Debug)]
pub struct GlyphAtlas {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
    glyphs: HashMap<char, GlyphInfo>,
    ascent: f32,
    line_height: f32,
}

impl GlyphAtlas {
    /// Rasterise the printable ASCII range of `font_bytes` at `px` pixels.
    pub fn new(font_bytes: &[u8], px: f32) -> anyhow::Result<Self> {
        let font = fontdue::Font::from_bytes(font_bytes, fontdue::FontSettings::default())
            .map_err(|e| anyhow!("failed to parse font: {e}"))?;
        let line = font
            .horizontal_line_metrics(px)
            .ok_or_else(|| anyhow!("font has no horizontal line metrics"))?;

        let mut placed = Vec::new();
        let (mut x, mut y, mut row_height) = (GLYPH_PADDING, GLYPH_PADDING, 0);
        for c in FIRST_CHAR..=LAST_CHAR {
            let (metrics, bitmap) = font.rasterize(c, px);
            let (w, h) = (metrics.width as u32, metrics.height as u32);
            if w + 2 * GLYPH_PADDING > ATLAS_WIDTH {
                return Err(anyhow!("glyph {c:?} at {px}px is wider than the atlas"));
            }
            if x + w + GLYPH_PADDING > ATLAS_WIDTH {
                x = GLYPH_PADDING;
                y += row_height + GLYPH_PADDING;
                row_height = 0;
            }
            placed.push((c, metrics, bitmap, x, y));
            x += w + GLYPH_PADDING;
            row_height = row_height.max(h);
        }
        let width = ATLAS_WIDTH;
        let height = y + row_height + GLYPH_PADDING;

        let mut coverage = vec![0u8; (width * height) as usize];
        let mut glyphs = HashMap::with_capacity(placed.len());
        for (c, metrics, bitmap, gx, gy) in placed {
            let (w, h) = (metrics.width, metrics.height);
            for row in 0..h {
                let start = (gy as usize + row) * width as usize + gx as usize;
                coverage[start..start + w].copy_from_slice(&bitmap[row * w..(row + 1) * w]);
            }
            glyphs.insert(
                c,
                GlyphInfo {
                    offset: [metrics.xmin as f32, -(metrics.ymin as f32 + h as f32)],
                    size: [w as f32, h as f32],
                    advance: metrics.advance_width,
                    uv_min: [gx as f32 / width as f32, gy as f32 / height as f32],
                    uv_max: [
                        (gx as usize + w) as f32 / width as f32,
                        (gy as usize + h) as f32 / height as f32,
                    ],
                },
            );
        }
        log::debug!("glyph atlas {width}x{height} at {px}px");

        Ok(Self {
            width,
            height,
            coverage,
            glyphs,
            ascent: line.ascent,
            line_height: line.new_line_size,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// One byte of coverage per texel, rows top to bottom.
    pub fn coverage(&self) -> &[u8] {
        &self.coverage
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Horizontal advance of `text` in pixels.
    pub fn measure(&self, text: &str) -> f32 {
        text.chars()
            .filter_map(|c| self.glyph(c))
            .map(|g| g.advance)
            .sum()
    }

    /// Place `text` with its line box's top-left corner at `(left, top)`.
    ///
    /// Glyphs are snapped to whole pixels. Blank glyphs advance the pen but
    /// produce nothing.
    pub fn layout(&self, text: &str, left: f32, top: f32) -> Vec<PlacedGlyph> {
        let baseline = (top + self.ascent).round();
        let mut pen = left;
        let mut out = Vec::with_capacity(text.len());
        for c in text.chars() {
            let Some(glyph) = self.glyph(c) else {
                continue;
            };
            if glyph.size[0] > 0.0 && glyph.size[1] > 0.0 {
                let min = [(pen + glyph.offset[0]).round(), baseline + glyph.offset[1]];
                out.push(PlacedGlyph {
                    min,
                    max: [min[0] + glyph.size[0], min[1] + glyph.size[1]],
                    uv_min: glyph.uv_min,
                    uv_max: glyph.uv_max,
                });
            }
            pen += glyph.advance;
        }
        out
    }

    fn glyph(&self, c: char) -> Option<&GlyphInfo> {
        self.glyphs
            .get(&c)
            .or_else(|| self.glyphs.get(&FALLBACK_CHAR))
    }
}
