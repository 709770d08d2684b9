use rayon::prelude::*;

use crate::catalog::function::{FractalVariant, FunctionFamily};
use crate::effect::selection::ResolvedSelection;
use crate::foundation::core::{Rgba, Vec2};
use crate::foundation::error::{PlasmaError, PlasmaResult};
use crate::foundation::math::sigmoid;
use crate::fractal::accumulator::{FractalParams, fractal_gradient, fractal_paired, fractal_scalar};
use crate::library::blend::BlendKind;
use crate::library::colorize::ColorizeKind;
use crate::library::noise::NoiseGenerator;
use crate::library::warp::WarpKind;
use crate::pipeline::buffers::FrameBuffers;
use crate::pipeline::image::FloatImage;

/// CPU evaluation of an assembled effect, pixel for pixel the same math as the generated
/// fragment program.
#[derive(Clone, Debug)]
pub struct CpuEffect {
    noise: NoiseGenerator,
    noise_range: (f64, f64),
    scale: f64,
    fractal: FractalParams,
    brightness: f64,
    contrast_steepness: f64,
    contrast_midpoint: f64,
    color: ColorizeKind,
    color_params: Vec<f64>,
    feedback: Option<CpuFeedback>,
}

#[derive(Clone, Debug)]
struct CpuFeedback {
    noise: NoiseGenerator,
    variant: FractalVariant,
    fractal: FractalParams,
    scale: f64,
    speed: f64,
    warp: WarpKind,
    warp_params: Vec<f64>,
    blend: BlendKind,
    blend_params: Vec<f64>,
}

fn unsupported(family: FunctionFamily, name: &str) -> PlasmaError {
    PlasmaError::config(format!("no CPU implementation for {family} function '{name}'"))
}

fn noise_kind(name: &str) -> PlasmaResult<NoiseGenerator> {
    NoiseGenerator::from_name(name).ok_or_else(|| unsupported(FunctionFamily::Noise, name))
}

fn component_mul(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new(a.x * b.x, a.y * b.y)
}

impl CpuEffect {
    pub fn from_resolved(resolved: &ResolvedSelection) -> PlasmaResult<Self> {
        let sel = &resolved.selection;
        let noise_range = resolved.noise.value_range().ok_or_else(|| {
            PlasmaError::config(format!(
                "noise function '{}' declares no value range",
                resolved.noise.name
            ))
        })?;
        let color = ColorizeKind::from_name(resolved.color.name())
            .ok_or_else(|| unsupported(FunctionFamily::Colorize, resolved.color.name()))?;

        let feedback = if sel.feedback.enabled {
            let warp = WarpKind::from_name(resolved.warp.name())
                .ok_or_else(|| unsupported(FunctionFamily::Warp, resolved.warp.name()))?;
            let blend = BlendKind::from_name(resolved.blend.name())
                .ok_or_else(|| unsupported(FunctionFamily::Blend, resolved.blend.name()))?;
            Some(CpuFeedback {
                noise: noise_kind(&resolved.warp_noise.name)?,
                variant: resolved
                    .warp
                    .spec
                    .fractal_variant()
                    .unwrap_or_else(|| warp.fractal_variant()),
                fractal: sel.feedback.warp_fractal,
                scale: sel.feedback.warp_scale,
                speed: sel.feedback.warp_speed,
                warp,
                warp_params: resolved.warp.flat_params(),
                blend,
                blend_params: resolved.blend.flat_params(),
            })
        } else {
            None
        };

        Ok(Self {
            noise: noise_kind(&resolved.noise.name)?,
            noise_range,
            scale: sel.noise.scale,
            fractal: sel.noise.fractal,
            brightness: sel.noise.brightness,
            contrast_steepness: sel.noise.contrast_steepness,
            contrast_midpoint: sel.noise.contrast_midpoint,
            color,
            color_params: resolved.color.flat_params(),
            feedback,
        })
    }

    pub fn feedback_enabled(&self) -> bool {
        self.feedback.is_some()
    }

    /// Normalize a raw field value to `[0, 1]`, then apply contrast and brightness.
    pub fn tone_map(&self, raw: f64) -> f64 {
        let (lo, hi) = self.noise_range;
        let n = (raw - lo) / (hi - lo);
        sigmoid(n, self.contrast_steepness, self.contrast_midpoint) * self.brightness
    }

    /// Colorized visible field at `uv` (texture coordinates in `[0, 1]`).
    pub fn base_color(&self, uv: Vec2, view_scale: Vec2, time: f64) -> Rgba {
        let centered = uv * 2.0 - Vec2::new(1.0, 1.0);
        let pos = component_mul(centered * self.scale, view_scale);
        let raw = fractal_scalar(self.noise, pos, time, &self.fractal);
        self.color
            .apply(self.tone_map(raw), uv, time, &self.color_params)
    }

    /// Final color at `uv`: the base color, warped-and-blended with `previous` when
    /// feedback is on.
    pub fn shade(&self, uv: Vec2, view_scale: Vec2, time: f64, previous: &FloatImage) -> Rgba {
        let color = self.base_color(uv, view_scale, time);
        let Some(fb) = &self.feedback else {
            return color;
        };

        let centered = uv * 2.0 - Vec2::new(1.0, 1.0);
        let warp_pos = component_mul(centered * fb.scale, view_scale);
        let warp_time = time * fb.speed;
        let sample = match fb.variant {
            FractalVariant::Paired => {
                let v = fractal_paired(fb.noise, warp_pos, warp_time, &fb.fractal);
                [v.x, v.y, 0.0, 0.0]
            }
            FractalVariant::Gradient => {
                let s = fractal_gradient(fb.noise, warp_pos, warp_time, &fb.fractal);
                [s.value, s.gradient.x, s.gradient.y, 0.0]
            }
        };
        let offset = fb.warp.apply(warp_pos, sample, warp_time, &fb.warp_params);
        let prev = previous.sample_bilinear(uv + offset);
        fb.blend.apply(prev, color, &fb.blend_params)
    }

    /// Shade every pixel of the write slot from the read slot, then swap. Returns the new
    /// frame. Row 0 is the top of the image, where `v_tex.y` approaches 1.
    #[tracing::instrument(skip(self, buffers))]
    pub fn render_frame<'a>(&self, buffers: &'a mut FrameBuffers, time: f64) -> &'a FloatImage {
        let canvas = buffers.canvas();
        let view_scale = canvas.view_scale();
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let (previous, target) = buffers.split();

        target
            .pixels_mut()
            .par_chunks_mut((canvas.width as usize).max(1))
            .enumerate()
            .for_each(|(y, row)| {
                let v = 1.0 - (y as f64 + 0.5) / h;
                for (x, px) in row.iter_mut().enumerate() {
                    let uv = Vec2::new((x as f64 + 0.5) / w, v);
                    *px = self.shade(uv, view_scale, time, previous);
                }
            });

        buffers.swap();
        buffers.front()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/feedback.rs"]
mod tests;
