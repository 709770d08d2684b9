use crate::foundation::core::{Vec2, Vec3};
use crate::foundation::error::{PlasmaError, PlasmaResult};
use crate::foundation::math::rotate;
use crate::library::noise::{NoiseGenerator, NoiseSample};

/// Time offset separating the two channels of the paired accumulator.
pub const PAIRED_TIME_OFFSET: f64 = 123.0;

/// Upper bound accepted for `octaves`.
pub const MAX_OCTAVES: u32 = 16;

/// Octave coefficients of one fractal field.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FractalParams {
    pub octaves: u32,
    /// Amplitude ratio between consecutive octaves.
    pub gain: f64,
    /// Spatial frequency ratio between consecutive octaves.
    pub position_scale_factor: f64,
    /// Extra rotation per octave, in radians.
    pub rotation_angle_increment: f64,
    /// Time rate ratio between consecutive octaves.
    pub time_scale_factor: f64,
    /// Extra time offset per octave.
    pub time_offset_increment: f64,
    /// Time offset shared by all octaves.
    pub time_offset_initial: f64,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            octaves: 1,
            gain: 0.5,
            position_scale_factor: 2.0,
            rotation_angle_increment: 0.0,
            time_scale_factor: 1.3,
            time_offset_increment: 12.0,
            time_offset_initial: 0.0,
        }
    }
}

impl FractalParams {
    /// Defaults for the warp field, offset in time from the visible field.
    pub fn warp_default() -> Self {
        Self {
            octaves: 1,
            gain: 0.3,
            position_scale_factor: 2.0,
            rotation_angle_increment: 0.0,
            time_scale_factor: 1.0,
            time_offset_increment: 12.0,
            time_offset_initial: 42.0,
        }
    }

    /// Reject coefficients the accumulators cannot evaluate. `field` names the owner in
    /// error messages.
    pub fn validate(&self, field: &str) -> PlasmaResult<()> {
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(PlasmaError::config(format!(
                "{field}.octaves must be in 1..={MAX_OCTAVES}, got {}",
                self.octaves
            )));
        }
        if !(self.gain > 0.0 && self.gain <= 1.0) {
            return Err(PlasmaError::config(format!(
                "{field}.gain must be in (0, 1], got {}",
                self.gain
            )));
        }
        let finite = [
            ("position_scale_factor", self.position_scale_factor),
            ("rotation_angle_increment", self.rotation_angle_increment),
            ("time_scale_factor", self.time_scale_factor),
            ("time_offset_increment", self.time_offset_increment),
            ("time_offset_initial", self.time_offset_initial),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(PlasmaError::config(format!(
                    "{field}.{name} must be finite, got {v}"
                )));
            }
        }
        if self.position_scale_factor == 0.0 {
            return Err(PlasmaError::config(format!(
                "{field}.position_scale_factor must be non-zero"
            )));
        }
        Ok(())
    }

    fn octaves(&self, pos: Vec2, time: f64) -> impl Iterator<Item = Octave> + '_ {
        let mut amp = 1.0;
        let mut scale = 1.0;
        let mut time_scale = 1.0;
        (0..self.octaves).map(move |i| {
            let angle = f64::from(i) * self.rotation_angle_increment;
            let octave = Octave {
                pos: rotate(pos, angle) * scale,
                time: time * time_scale
                    + f64::from(i) * self.time_offset_increment
                    + self.time_offset_initial,
                amp,
                scale,
                angle,
            };
            amp *= self.gain;
            scale *= self.position_scale_factor;
            time_scale *= self.time_scale_factor;
            octave
        })
    }
}

struct Octave {
    pos: Vec2,
    time: f64,
    amp: f64,
    scale: f64,
    angle: f64,
}

/// Normalized octave sum of one generator. Returns 0 when there are no octaves.
pub fn fractal_scalar(noise: NoiseGenerator, pos: Vec2, time: f64, params: &FractalParams) -> f64 {
    let mut sum = 0.0;
    let mut total = 0.0;
    for o in params.octaves(pos, time) {
        sum += noise.sample(Vec3::from_xy(o.pos, o.time)) * o.amp;
        total += o.amp;
    }
    if total > 0.0 { sum / total } else { 0.0 }
}

/// Two fields sampled at the same position, the second shifted by [`PAIRED_TIME_OFFSET`]
/// along the time axis.
pub fn fractal_paired(noise: NoiseGenerator, pos: Vec2, time: f64, params: &FractalParams) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut total = 0.0;
    for o in params.octaves(pos, time) {
        let a = noise.sample(Vec3::from_xy(o.pos, o.time));
        let b = noise.sample(Vec3::from_xy(o.pos, o.time + PAIRED_TIME_OFFSET));
        sum += Vec2::new(a, b) * o.amp;
        total += o.amp;
    }
    if total > 0.0 { sum / total } else { Vec2::ZERO }
}

/// Field value plus its derivative with respect to `pos`.
///
/// Each octave's derivative is rotated back into the input frame and scaled by the octave's
/// position scale (chain rule), then normalized by the same amplitude total as the value.
pub fn fractal_gradient(
    noise: NoiseGenerator,
    pos: Vec2,
    time: f64,
    params: &FractalParams,
) -> NoiseSample {
    let mut value = 0.0;
    let mut gradient = Vec2::ZERO;
    let mut total = 0.0;
    for o in params.octaves(pos, time) {
        let s = noise.sample_with_gradient(Vec3::from_xy(o.pos, o.time));
        value += s.value * o.amp;
        gradient += rotate(s.gradient, -o.angle) * (o.amp * o.scale);
        total += o.amp;
    }
    if total > 0.0 {
        NoiseSample {
            value: value / total,
            gradient: gradient / total,
        }
    } else {
        NoiseSample::default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fractal/accumulator.rs"]
mod tests;
