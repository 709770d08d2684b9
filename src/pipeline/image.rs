use std::path::Path;

use anyhow::Context;

use crate::foundation::core::{Canvas, Rgba, Vec2};
use crate::foundation::error::PlasmaResult;

/// Straight RGBA image with `f64` channels, row-major from the top-left pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatImage {
    width: u32,
    height: u32,
    data: Vec<Rgba>,
}

impl FloatImage {
    pub fn new(canvas: Canvas) -> Self {
        Self::filled(canvas, Rgba::TRANSPARENT)
    }

    pub fn filled(canvas: Canvas, color: Rgba) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![color; canvas.pixel_count()],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.data
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.data
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(self.index(x, y)).copied()
    }

    pub fn fill(&mut self, color: Rgba) {
        self.data.fill(color);
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn texel(&self, x: i64, y: i64) -> Rgba {
        let x = x.clamp(0, i64::from(self.width) - 1) as u32;
        let y = y.clamp(0, i64::from(self.height) - 1) as u32;
        self.data[self.index(x, y)]
    }

    /// Bilinear lookup at texture coordinates with texel centers at `(i + 0.5) / size`.
    /// Rows are stored top first while `v = 0` is the bottom edge, as in a GL texture
    /// uploaded from this buffer. Coordinates outside `[0, 1]` clamp to the edge texels.
    pub fn sample_bilinear(&self, uv: Vec2) -> Rgba {
        let x = uv.x * f64::from(self.width) - 0.5;
        let y = (1.0 - uv.y) * f64::from(self.height) - 0.5;
        if self.data.is_empty() {
            return Rgba::TRANSPARENT;
        }
        if !(x.is_finite() && y.is_finite()) {
            return self.texel(0, 0);
        }
        // Past one texel outside the image every lookup hits the edge anyway.
        let x = x.clamp(-1.0, f64::from(self.width));
        let y = y.clamp(-1.0, f64::from(self.height));
        let x0 = x.floor();
        let y0 = y.floor();
        let (fx, fy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = Rgba::mix(self.texel(x0, y0), self.texel(x0 + 1, y0), fx);
        let bottom = Rgba::mix(self.texel(x0, y0 + 1), self.texel(x0 + 1, y0 + 1), fx);
        Rgba::mix(top, bottom, fy)
    }

    /// 8-bit straight RGBA, clamped.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data.iter().flat_map(|c| c.to_rgba8()).collect()
    }

    pub fn save_png(&self, path: &Path) -> PlasmaResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.to_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/image.rs"]
mod tests;
