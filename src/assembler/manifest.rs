use crate::catalog::function::FunctionFamily;
use crate::catalog::param::ParamKind;
use crate::catalog::registry::Library;
use crate::effect::selection::{ResolvedFunction, ResolvedSelection, Role};
use crate::foundation::error::{PlasmaError, PlasmaResult};
use crate::fractal::accumulator::FractalParams;

/// Inputs the host sets every frame rather than on selection change.
pub const FRAME_INPUTS: [&str; 3] = ["u_time", "u_view_scale", "u_feedback"];

/// Position of one parameter inside its flat array.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ParamSlot {
    pub name: String,
    pub kind: ParamKind,
    pub offset: usize,
    pub width: usize,
}

/// One flat parameter array uniform.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ParamArray {
    pub role: Role,
    pub function: String,
    pub uniform: String,
    /// Declared array length; `values` is zero-padded to it.
    pub length: usize,
    pub slots: Vec<ParamSlot>,
    pub values: Vec<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum UniformValue {
    Int(i64),
    Float(f64),
}

impl UniformValue {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ScalarUniform {
    pub name: String,
    pub value: UniformValue,
}

/// Uniform values of an assembled program: the flat parameter arrays and the fixed-role
/// scalars. Rebuilt on every value change; the program text is not.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ProgramManifest {
    pub arrays: Vec<ParamArray>,
    pub scalars: Vec<ScalarUniform>,
    pub frame_inputs: Vec<String>,
}

/// Array length reserved for `family`: the widest member, at least one slot.
pub fn array_length(lib: &Library, family: FunctionFamily) -> usize {
    lib.registry(family).max_param_slots().max(1)
}

impl ProgramManifest {
    pub fn build(lib: &Library, resolved: &ResolvedSelection) -> PlasmaResult<Self> {
        let arrays = vec![
            param_array(lib, Role::Warp, "u_warp_params", &resolved.warp)?,
            param_array(lib, Role::Blend, "u_blend_params", &resolved.blend)?,
            param_array(lib, Role::Colorize, "u_color_params", &resolved.color)?,
        ];

        let sel = &resolved.selection;
        let mut scalars = Vec::new();
        let mut float = |name: &str, v: f64| {
            scalars.push(ScalarUniform {
                name: name.to_owned(),
                value: UniformValue::Float(v),
            });
        };
        float("u_scale", sel.noise.scale);
        float("u_brightness", sel.noise.brightness);
        float("u_contrast_steepness", sel.noise.contrast_steepness);
        float("u_contrast_midpoint", sel.noise.contrast_midpoint);
        float("u_warp_scale", sel.feedback.warp_scale);
        float("u_warp_speed", sel.feedback.warp_speed);
        push_fractal(&mut scalars, "u_", &sel.noise.fractal);
        push_fractal(&mut scalars, "u_warp_", &sel.feedback.warp_fractal);

        Ok(Self {
            arrays,
            scalars,
            frame_inputs: FRAME_INPUTS.iter().map(|s| (*s).to_owned()).collect(),
        })
    }

    pub fn array(&self, role: Role) -> Option<&ParamArray> {
        self.arrays.iter().find(|a| a.role == role)
    }

    pub fn scalar(&self, name: &str) -> Option<UniformValue> {
        self.scalars.iter().find(|s| s.name == name).map(|s| s.value)
    }

    /// Every uniform name the host must set, frame inputs included.
    pub fn uniform_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.arrays
            .iter()
            .map(|a| a.uniform.as_str())
            .chain(self.scalars.iter().map(|s| s.name.as_str()))
            .chain(self.frame_inputs.iter().map(String::as_str))
    }

    pub fn to_json_pretty(&self) -> PlasmaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn param_array(
    lib: &Library,
    role: Role,
    uniform: &str,
    func: &ResolvedFunction,
) -> PlasmaResult<ParamArray> {
    let length = array_length(lib, role.family());
    let mut values = func.flat_params();
    if values.len() > length {
        return Err(PlasmaError::assembly(format!(
            "{} function '{}' needs {} parameter slots but {uniform} holds {length}",
            role.family(),
            func.name(),
            values.len()
        )));
    }
    values.resize(length, 0.0);

    let mut offset = 0;
    let slots = func
        .spec
        .params
        .iter()
        .map(|p| {
            let slot = ParamSlot {
                name: p.name.clone(),
                kind: p.kind,
                offset,
                width: p.slot_count(),
            };
            offset += slot.width;
            slot
        })
        .collect();

    Ok(ParamArray {
        role,
        function: func.name().to_owned(),
        uniform: uniform.to_owned(),
        length,
        slots,
        values,
    })
}

fn push_fractal(out: &mut Vec<ScalarUniform>, prefix: &str, f: &FractalParams) {
    out.push(ScalarUniform {
        name: format!("{prefix}octaves"),
        value: UniformValue::Int(i64::from(f.octaves)),
    });
    let floats = [
        ("gain", f.gain),
        ("position_scale_factor", f.position_scale_factor),
        ("rotation_angle_increment", f.rotation_angle_increment),
        ("time_scale_factor", f.time_scale_factor),
        ("time_offset_increment", f.time_offset_increment),
        ("time_offset_initial", f.time_offset_initial),
    ];
    for (name, v) in floats {
        out.push(ScalarUniform {
            name: format!("{prefix}{name}"),
            value: UniformValue::Float(v),
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assembler/manifest.rs"]
mod tests;
