use std::f64::consts::TAU;

use crate::foundation::core::{Rgba, Vec2};
use crate::foundation::math::fract;
use crate::library::param_at;

/// CPU counterparts of the colorizer catalog members: `(value, position, time, params) -> color`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorizeKind {
    Grayscale,
    TwoTone,
    CosinePalette,
    HueCycle,
}

impl ColorizeKind {
    pub const ALL: [Self; 4] = [
        Self::Grayscale,
        Self::TwoTone,
        Self::CosinePalette,
        Self::HueCycle,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::TwoTone => "two_tone",
            Self::CosinePalette => "cosine_palette",
            Self::HueCycle => "hue_cycle",
        }
    }

    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            Self::Grayscale => &[],
            Self::TwoTone => &["color_low", "color_high"],
            Self::CosinePalette => &["offset", "amplitude", "frequency", "phase"],
            Self::HueCycle => &["hue_offset", "speed", "saturation"],
        }
    }

    /// `value` is the normalized field value in `[0, 1]`. None of the built-in colorizers
    /// vary with the fragment position yet.
    pub fn apply(self, value: f64, _pos: Vec2, time: f64, params: &[f64]) -> Rgba {
        match self {
            Self::Grayscale => Rgba::gray(value),
            Self::TwoTone => Rgba::mix(color_at(params, 0), color_at(params, 4), value),
            Self::CosinePalette => {
                let offset = color_at(params, 0);
                let amplitude = color_at(params, 4);
                let frequency = color_at(params, 8);
                let phase = color_at(params, 12);
                let channel =
                    |o: f64, a: f64, f: f64, p: f64| o + a * (TAU * (f * value + p)).cos();
                Rgba::new(
                    channel(offset.r, amplitude.r, frequency.r, phase.r),
                    channel(offset.g, amplitude.g, frequency.g, phase.g),
                    channel(offset.b, amplitude.b, frequency.b, phase.b),
                    1.0,
                )
                .clamp01()
            }
            Self::HueCycle => {
                let hue = param_at(params, 0) + value + time * param_at(params, 1);
                let [r, g, b] = hsv_to_rgb([hue, param_at(params, 2), value]);
                Rgba::new(r, g, b, 1.0)
            }
        }
    }
}

fn color_at(params: &[f64], offset: usize) -> Rgba {
    Rgba::new(
        param_at(params, offset),
        param_at(params, offset + 1),
        param_at(params, offset + 2),
        param_at(params, offset + 3),
    )
}

/// HSV (hue wraps, saturation and value in `[0, 1]`) to RGB.
pub(crate) fn hsv_to_rgb([h, s, v]: [f64; 3]) -> [f64; 3] {
    let h6 = fract(h) * 6.0;
    let channel = |n: f64| {
        let k = (n + h6) % 6.0;
        v - v * s * k.min(4.0 - k).clamp(0.0, 1.0)
    };
    [channel(5.0), channel(3.0), channel(1.0)]
}

/// RGB to HSV with hue in `[0, 1)`.
pub(crate) fn rgb_to_hsv([r, g, b]: [f64; 3]) -> [f64; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let h = if delta <= 0.0 {
        0.0
    } else if max == r {
        ((g - b) / delta).rem_euclid(6.0) / 6.0
    } else if max == g {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };
    let s = if max <= 0.0 { 0.0 } else { delta / max };
    [h, s, max]
}

#[cfg(test)]
#[path = "../../tests/unit/library/colorize.rs"]
mod tests;
