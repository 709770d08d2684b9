use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::catalog::function::{FunctionFamily, FunctionSpec, ParamBindings, flatten_values};
use crate::catalog::param::ParamValue;
use crate::catalog::registry::Library;
use crate::foundation::error::{PlasmaError, PlasmaResult};
use crate::fractal::accumulator::FractalParams;

/// Slot a function fills in the effect.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Generator of the visible field.
    Noise,
    /// Generator of the field driving the feedback warp.
    WarpNoise,
    Warp,
    Blend,
    Colorize,
}

impl Role {
    pub const ALL: [Self; 5] = [
        Self::Noise,
        Self::WarpNoise,
        Self::Warp,
        Self::Blend,
        Self::Colorize,
    ];

    pub fn family(self) -> FunctionFamily {
        match self {
            Self::Noise | Self::WarpNoise => FunctionFamily::Noise,
            Self::Warp => FunctionFamily::Warp,
            Self::Blend => FunctionFamily::Blend,
            Self::Colorize => FunctionFamily::Colorize,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Noise => "noise",
            Self::WarpNoise => "warp_noise",
            Self::Warp => "warp",
            Self::Blend => "blend",
            Self::Colorize => "colorize",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function name plus explicit parameter values. Parameters left out take their
/// catalog default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionChoice {
    pub function: String,
    #[serde(default, skip_serializing_if = "ParamBindings::is_empty")]
    pub params: ParamBindings,
}

impl FunctionChoice {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            params: ParamBindings::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(name.into(), value);
        self
    }
}

/// The visible fractal field and its tone mapping.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseLayer {
    pub function: String,
    /// Spatial zoom applied before the first octave.
    pub scale: f64,
    pub fractal: FractalParams,
    pub brightness: f64,
    pub contrast_steepness: f64,
    pub contrast_midpoint: f64,
}

impl Default for NoiseLayer {
    fn default() -> Self {
        Self {
            function: "perlin_3d".to_owned(),
            scale: 2.0,
            fractal: FractalParams::default(),
            brightness: 1.0,
            contrast_steepness: 10.0,
            contrast_midpoint: 0.5,
        }
    }
}

/// Warp-and-blend of the previous frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedbackLayer {
    pub enabled: bool,
    pub blend: FunctionChoice,
    pub warp: FunctionChoice,
    /// Generator of the warp field.
    pub warp_noise: String,
    pub warp_scale: f64,
    /// Multiplier on elapsed time for the warp field.
    pub warp_speed: f64,
    pub warp_fractal: FractalParams,
}

impl Default for FeedbackLayer {
    fn default() -> Self {
        Self {
            enabled: false,
            blend: FunctionChoice::new("linear"),
            warp: FunctionChoice::new("offset"),
            warp_noise: "perlin_3d".to_owned(),
            warp_scale: 1.0,
            warp_speed: 1.0,
            warp_fractal: FractalParams::warp_default(),
        }
    }
}

/// Everything the user chooses: one function per role, their parameter values, and the
/// coefficients of both fractal fields.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectSelection {
    /// Animation speed multiplier.
    pub speed: f64,
    pub noise: NoiseLayer,
    pub color: FunctionChoice,
    pub feedback: FeedbackLayer,
}

impl Default for EffectSelection {
    fn default() -> Self {
        Self {
            speed: 1.0,
            noise: NoiseLayer::default(),
            color: FunctionChoice::new("grayscale"),
            feedback: FeedbackLayer::default(),
        }
    }
}

impl EffectSelection {
    pub fn from_json_str(text: &str) -> PlasmaResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> PlasmaResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read selection {}", path.display()))?;
        Self::from_json_str(&text).map_err(|e| e.context(path.display()))
    }

    pub fn to_json(&self) -> PlasmaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Name of the function chosen for `role`.
    pub fn function_name(&self, role: Role) -> &str {
        match role {
            Role::Noise => &self.noise.function,
            Role::WarpNoise => &self.feedback.warp_noise,
            Role::Warp => &self.feedback.warp.function,
            Role::Blend => &self.feedback.blend.function,
            Role::Colorize => &self.color.function,
        }
    }

    /// Reject numeric values the pipeline cannot evaluate.
    pub fn validate(&self) -> PlasmaResult<()> {
        let finite = [
            ("speed", self.speed),
            ("noise.scale", self.noise.scale),
            ("noise.brightness", self.noise.brightness),
            ("noise.contrast_steepness", self.noise.contrast_steepness),
            ("noise.contrast_midpoint", self.noise.contrast_midpoint),
            ("feedback.warp_scale", self.feedback.warp_scale),
            ("feedback.warp_speed", self.feedback.warp_speed),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(PlasmaError::config(format!("{name} must be finite, got {v}")));
            }
        }
        if self.speed < 0.0 {
            return Err(PlasmaError::config(format!(
                "speed must be non-negative, got {}",
                self.speed
            )));
        }
        if self.noise.brightness < 0.0 {
            return Err(PlasmaError::config(format!(
                "noise.brightness must be non-negative, got {}",
                self.noise.brightness
            )));
        }
        self.noise.fractal.validate("noise.fractal")?;
        self.feedback.warp_fractal.validate("feedback.warp_fractal")?;
        Ok(())
    }

    /// Look up every chosen function and bind its parameters.
    #[tracing::instrument(skip_all)]
    pub fn resolve(&self, lib: &Library) -> PlasmaResult<ResolvedSelection> {
        self.validate()?;
        let spec = |role: Role| -> PlasmaResult<Arc<FunctionSpec>> {
            lib.function(role.family(), self.function_name(role))
                .cloned()
                .map_err(|e| e.context(format_args!("role '{role}'")))
        };
        let bound = |role: Role, params: &ParamBindings| -> PlasmaResult<ResolvedFunction> {
            let spec = spec(role)?;
            let values = spec.bind(params)?;
            Ok(ResolvedFunction { spec, values })
        };

        Ok(ResolvedSelection {
            noise: spec(Role::Noise)?,
            warp_noise: spec(Role::WarpNoise)?,
            warp: bound(Role::Warp, &self.feedback.warp.params)?,
            blend: bound(Role::Blend, &self.feedback.blend.params)?,
            color: bound(Role::Colorize, &self.color.params)?,
            selection: self.clone(),
        })
    }
}

/// A catalog function with parameter values in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedFunction {
    pub spec: Arc<FunctionSpec>,
    pub values: Vec<ParamValue>,
}

impl ResolvedFunction {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Values in flat-array slot order.
    pub fn flat_params(&self) -> Vec<f64> {
        flatten_values(&self.values)
    }
}

/// A selection checked against a library: every function exists and every bound value is
/// in range.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSelection {
    pub selection: EffectSelection,
    pub noise: Arc<FunctionSpec>,
    pub warp_noise: Arc<FunctionSpec>,
    pub warp: ResolvedFunction,
    pub blend: ResolvedFunction,
    pub color: ResolvedFunction,
}

impl ResolvedSelection {
    pub fn spec(&self, role: Role) -> &Arc<FunctionSpec> {
        match role {
            Role::Noise => &self.noise,
            Role::WarpNoise => &self.warp_noise,
            Role::Warp => &self.warp.spec,
            Role::Blend => &self.blend.spec,
            Role::Colorize => &self.color.spec,
        }
    }

    /// True when both resolve to the same functions and feedback mode, so one program
    /// serves both and only uniform values differ.
    pub fn same_structure(&self, other: &Self) -> bool {
        self.selection.feedback.enabled == other.selection.feedback.enabled
            && Role::ALL
                .into_iter()
                .all(|r| self.spec(r).name == other.spec(r).name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effect/selection.rs"]
mod tests;
