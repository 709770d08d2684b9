use crate::foundation::core::Rgba;
use crate::library::colorize::{hsv_to_rgb, rgb_to_hsv};
use crate::library::param_at;

/// CPU counterparts of the blend catalog members: `(previous, current, params) -> color`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendKind {
    Linear,
    Additive,
    Multiply,
    Screen,
    HueShiftLinear,
    Replace,
}

impl BlendKind {
    pub const ALL: [Self; 6] = [
        Self::Linear,
        Self::Additive,
        Self::Multiply,
        Self::Screen,
        Self::HueShiftLinear,
        Self::Replace,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Additive => "additive",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::HueShiftLinear => "hue_shift_linear",
            Self::Replace => "replace",
        }
    }

    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            Self::Linear | Self::Additive | Self::Multiply | Self::Screen => &["amount"],
            Self::HueShiftLinear => &["hue_shift", "saturation", "amount"],
            Self::Replace => &[],
        }
    }

    pub fn apply(self, previous: Rgba, current: Rgba, params: &[f64]) -> Rgba {
        match self {
            Self::Linear => blend_linear(previous, current, param_at(params, 0)),
            Self::Additive => blend_additive(previous, current, param_at(params, 0)),
            Self::Multiply => Rgba::mix(previous, previous * current, param_at(params, 0)),
            Self::Screen => {
                let screen = previous.zip(current, |p, c| 1.0 - (1.0 - p) * (1.0 - c));
                Rgba::mix(previous, screen, param_at(params, 0))
            }
            Self::HueShiftLinear => {
                let shifted = shift_hue(previous, param_at(params, 0), param_at(params, 1));
                blend_linear(shifted, current, param_at(params, 2))
            }
            Self::Replace => current,
        }
    }
}

/// `previous * (1 - amount) + current * amount`.
pub fn blend_linear(previous: Rgba, current: Rgba, amount: f64) -> Rgba {
    Rgba::mix(previous, current, amount)
}

/// `previous + current * amount`, clamped to `[0, 1]`.
pub fn blend_additive(previous: Rgba, current: Rgba, amount: f64) -> Rgba {
    (previous + current.scale(amount)).clamp01()
}

fn shift_hue(c: Rgba, hue_shift: f64, saturation: f64) -> Rgba {
    let [h, s, v] = rgb_to_hsv([c.r, c.g, c.b]);
    let [r, g, b] = hsv_to_rgb([h + hue_shift, (s * saturation).clamp(0.0, 1.0), v]);
    Rgba::new(r, g, b, c.a)
}

#[cfg(test)]
#[path = "../../tests/unit/library/blend.rs"]
mod tests;
