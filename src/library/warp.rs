use std::f64::consts::TAU;

use crate::catalog::function::FractalVariant;
use crate::foundation::core::{Vec2, Vec3};
use crate::foundation::math::{EPSILON, rotate, safe_normalize, sigmoid};
use crate::library::noise::NoiseGenerator;
use crate::library::param_at;

/// Steepness of the gate that switches the distortion layer on above its threshold.
const DISTORTION_GATE_STEEPNESS: f64 = 20.0;

/// CPU counterparts of the warp catalog members.
///
/// Every warp maps `(position, noise sample, time, params)` to an offset. The sample is
/// `(value, d/dx, d/dy, 0)` for gradient-fed warps and `(a, b, 0, 0)` for paired ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WarpKind {
    Offset,
    Displace,
    Swirl,
    SwirlSigmoid,
    SwirlSigmoidDistorted,
    InfiniteMirror,
}

impl WarpKind {
    pub const ALL: [Self; 6] = [
        Self::Offset,
        Self::Displace,
        Self::Swirl,
        Self::SwirlSigmoid,
        Self::SwirlSigmoidDistorted,
        Self::InfiniteMirror,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Offset => "offset",
            Self::Displace => "displace",
            Self::Swirl => "swirl",
            Self::SwirlSigmoid => "swirl_sigmoid",
            Self::SwirlSigmoidDistorted => "swirl_sigmoid_distorted",
            Self::InfiniteMirror => "infinite_mirror",
        }
    }

    pub fn fractal_variant(self) -> FractalVariant {
        match self {
            Self::Displace => FractalVariant::Paired,
            _ => FractalVariant::Gradient,
        }
    }

    /// Parameter order expected in the flat array.
    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            Self::Offset | Self::Displace => &["amplitude"],
            Self::Swirl => &["radius_scale", "isolation", "strength"],
            Self::SwirlSigmoid => &["radius_scale", "strength", "sharpness", "midpoint"],
            Self::SwirlSigmoidDistorted => &[
                "radius_scale",
                "strength",
                "sharpness",
                "midpoint",
                "distortion_scale",
                "distortion_speed",
                "distortion_threshold",
                "distortion_strength",
            ],
            Self::InfiniteMirror => &[
                "radius_scale",
                "base_intensity",
                "modulation_intensity",
                "frequency",
                "falloff_power",
            ],
        }
    }

    pub fn apply(self, pos: Vec2, sample: [f64; 4], time: f64, params: &[f64]) -> Vec2 {
        let value = sample[0];
        let deriv = Vec2::new(sample[1], sample[2]);
        match self {
            Self::Offset => deriv * (param_at(params, 0) * 0.01),
            Self::Displace => Vec2::new(sample[0], sample[1]) * (param_at(params, 0) * 0.01),
            Self::Swirl => {
                let radius_scale = param_at(params, 0);
                let isolation = param_at(params, 1);
                let strength = param_at(params, 2);
                swirl(pos, deriv, radius_scale, |r| {
                    strength * (-r * isolation * 10.0).exp()
                })
            }
            Self::SwirlSigmoid => {
                let radius_scale = param_at(params, 0);
                let strength = param_at(params, 1);
                let sharpness = param_at(params, 2);
                let midpoint = param_at(params, 3);
                swirl(pos, deriv, radius_scale, |r| {
                    strength * (1.0 - sigmoid(r, sharpness, midpoint))
                })
            }
            Self::SwirlSigmoidDistorted => {
                let radius_scale = param_at(params, 0);
                let strength = param_at(params, 1);
                let sharpness = param_at(params, 2);
                let midpoint = param_at(params, 3);
                let scale = param_at(params, 4);
                let speed = param_at(params, 5);
                let threshold = param_at(params, 6);
                let distortion_strength = param_at(params, 7);

                let n = NoiseGenerator::Perlin3d.sample(Vec3::from_xy(pos * scale, time * speed));
                let distortion =
                    distortion_strength * sigmoid(n, DISTORTION_GATE_STEEPNESS, threshold);
                swirl(pos, deriv, radius_scale, |r| {
                    strength * (1.0 - sigmoid(r, sharpness, midpoint)) + distortion
                })
            }
            Self::InfiniteMirror => {
                let radius_scale = param_at(params, 0);
                let base_intensity = param_at(params, 1);
                let modulation = param_at(params, 2);
                let frequency = param_at(params, 3);
                let falloff_power = param_at(params, 4);

                let center = pos + safe_normalize(deriv) * (value * radius_scale);
                let angle = (time * frequency).sin() * modulation * TAU + base_intensity;
                let rel = pos - center;
                // Reflecting across both axes through the center is a half turn.
                let mirrored = center - rotate(rel, angle);
                let dist = rel.hypot() / (radius_scale + EPSILON);
                let weight = 1.0 - dist.clamp(0.0, 1.0).powf(falloff_power);
                let warped = pos.lerp(mirrored, weight);
                warped - pos
            }
        }
    }
}

/// Shared swirl core: rotate `pos` around `pos + radius_scale * deriv` by
/// `perturbation(normalized radius)` and return the displacement.
fn swirl(pos: Vec2, deriv: Vec2, radius_scale: f64, perturbation: impl Fn(f64) -> f64) -> Vec2 {
    let safe_radius_scale = radius_scale + EPSILON;
    let center = pos + deriv * radius_scale;
    let rel = pos - center;
    let radius = rel.hypot();
    let angle = rel.y.atan2(rel.x) + perturbation(radius / safe_radius_scale);
    let swirled = center + Vec2::new(angle.cos(), angle.sin()) * radius;
    swirled - pos
}

#[cfg(test)]
#[path = "../../tests/unit/library/warp.rs"]
mod tests;
