use serde_json::Value as JsonValue;

use crate::foundation::error::{PlasmaError, PlasmaResult};

/// Value type of a function parameter.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Floating point scalar.
    #[default]
    Float,
    /// Integer scalar.
    Int,
    /// RGBA color with components in `[0, 1]`.
    Color,
}

impl ParamKind {
    /// Number of consecutive float slots the value occupies in a flat parameter array.
    pub fn slot_count(self) -> usize {
        match self {
            Self::Float | Self::Int => 1,
            Self::Color => 4,
        }
    }

    /// Name used in catalog documents.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Color => "color",
        }
    }
}

/// A bound parameter value.
///
/// Deserializes from plain JSON numbers, `[r, g, b(, a)]` arrays and `#rrggbb(aa)` strings;
/// the concrete kind is checked later against the owning [`ParamDef`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "JsonValue", into = "JsonValue")]
pub enum ParamValue {
    /// Floating point scalar.
    Float(f64),
    /// Integer scalar.
    Int(i64),
    /// RGBA color.
    Color([f64; 4]),
}

impl ParamValue {
    /// Scalar view of the value (`None` for colors).
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(v),
            Self::Int(v) => Some(v as f64),
            Self::Color(_) => None,
        }
    }

    /// Append the value's slots to a flat parameter array.
    pub fn write_slots(self, out: &mut Vec<f64>) {
        match self {
            Self::Float(v) => out.push(v),
            Self::Int(v) => out.push(v as f64),
            Self::Color(c) => out.extend_from_slice(&c),
        }
    }
}

impl TryFrom<JsonValue> for ParamValue {
    type Error = PlasmaError;

    fn try_from(value: JsonValue) -> PlasmaResult<Self> {
        match &value {
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else {
                    n.as_f64()
                        .map(Self::Float)
                        .ok_or_else(|| PlasmaError::config(format!("unsupported number {n}")))
                }
            }
            JsonValue::String(s) => parse_hex_color(s).map(Self::Color),
            JsonValue::Array(items) => {
                let mut comps = Vec::with_capacity(items.len());
                for item in items {
                    let v = item.as_f64().ok_or_else(|| {
                        PlasmaError::config(format!("invalid color component: {item}"))
                    })?;
                    comps.push(v);
                }
                normalize_color_components(&comps).map(Self::Color)
            }
            other => Err(PlasmaError::config(format!(
                "cannot interpret {other} as a parameter value"
            ))),
        }
    }
}

impl From<ParamValue> for JsonValue {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Float(v) => serde_json::json!(v),
            ParamValue::Int(v) => serde_json::json!(v),
            ParamValue::Color(c) => serde_json::json!(c),
        }
    }
}

fn parse_hex_color(s: &str) -> PlasmaResult<[f64; 4]> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 && hex.len() != 8 {
        return Err(PlasmaError::config(format!("invalid hex color '{s}'")));
    }
    let channel = |i: usize| -> PlasmaResult<f64> {
        let byte = hex
            .get(i..i + 2)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(|| PlasmaError::config(format!("invalid hex color format '{s}'")))?;
        Ok(f64::from(byte) / 255.0)
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };
    Ok([channel(0)?, channel(2)?, channel(4)?, alpha])
}

fn normalize_color_components(comps: &[f64]) -> PlasmaResult<[f64; 4]> {
    if comps.len() != 3 && comps.len() != 4 {
        return Err(PlasmaError::config("color must have 3 or 4 components"));
    }
    let mut out = [0.0, 0.0, 0.0, 1.0];
    for (slot, &v) in out.iter_mut().zip(comps) {
        // Components above 1 are read as 0..255 bytes.
        *slot = if v > 1.0 { v / 255.0 } else { v };
    }
    if out.iter().any(|c| !(0.0..=1.0).contains(c)) {
        return Err(PlasmaError::config("color components must be in range [0, 1]"));
    }
    Ok(out)
}

/// Parameter metadata as written in catalog documents.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ParamDoc {
    pub(crate) name: String,
    pub(crate) display_name: String,
    #[serde(default)]
    pub(crate) param_type: ParamKind,
    pub(crate) min: Option<f64>,
    pub(crate) max: Option<f64>,
    pub(crate) default: JsonValue,
    #[serde(default)]
    pub(crate) logarithmic: bool,
    #[serde(default)]
    pub(crate) description: String,
}

/// Validated parameter schema entry.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ParamDef {
    /// Stable identifier, unique within its function.
    pub name: String,
    /// Human readable label, passed through to control panels.
    pub display_name: String,
    /// Value type.
    pub kind: ParamKind,
    /// Inclusive lower bound (`0` for colors).
    pub min: f64,
    /// Inclusive upper bound (`1` for colors).
    pub max: f64,
    /// Default value, guaranteed to lie within `[min, max]`.
    pub default: ParamValue,
    /// Display hint: slider should be logarithmic. Only valid for positive ranges.
    pub logarithmic: bool,
    /// Free-form description, passed through.
    pub description: String,
}

impl ParamDef {
    pub(crate) fn from_doc(doc: ParamDoc) -> PlasmaResult<Self> {
        let (min, max) = match doc.param_type {
            ParamKind::Color => (doc.min.unwrap_or(0.0), doc.max.unwrap_or(1.0)),
            ParamKind::Float | ParamKind::Int => {
                let min = doc.min.ok_or_else(|| {
                    PlasmaError::validation(format!("parameter '{}' is missing 'min'", doc.name))
                })?;
                let max = doc.max.ok_or_else(|| {
                    PlasmaError::validation(format!("parameter '{}' is missing 'max'", doc.name))
                })?;
                (min, max)
            }
        };

        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(PlasmaError::validation(format!(
                "parameter '{}' has an invalid range [{min}, {max}]",
                doc.name
            )));
        }
        if doc.logarithmic && min <= 0.0 {
            return Err(PlasmaError::validation(format!(
                "parameter '{}' is logarithmic but its range [{min}, {max}] is not positive",
                doc.name
            )));
        }

        let mut def = Self {
            name: doc.name,
            display_name: doc.display_name,
            kind: doc.param_type,
            min,
            max,
            default: ParamValue::Float(min),
            logarithmic: doc.logarithmic,
            description: doc.description,
        };

        let raw_default = ParamValue::try_from(doc.default).map_err(|e| {
            PlasmaError::validation(format!(
                "failed to convert default value for parameter '{}': {e}",
                def.name
            ))
        })?;
        def.default = def.coerce(raw_default).map_err(|e| {
            PlasmaError::validation(format!(
                "default value of parameter '{}' is invalid: {e}",
                def.name
            ))
        })?;
        Ok(def)
    }

    /// Check `value` against this parameter's kind and range, converting between numeric
    /// representations where lossless.
    pub fn coerce(&self, value: ParamValue) -> PlasmaResult<ParamValue> {
        let out = match (self.kind, value) {
            (ParamKind::Float, ParamValue::Float(v)) => ParamValue::Float(v),
            (ParamKind::Float, ParamValue::Int(v)) => ParamValue::Float(v as f64),
            (ParamKind::Int, ParamValue::Int(v)) => ParamValue::Int(v),
            (ParamKind::Int, ParamValue::Float(v)) if v.fract() == 0.0 => {
                ParamValue::Int(v as i64)
            }
            (ParamKind::Color, ParamValue::Color(c)) => ParamValue::Color(c),
            (kind, other) => {
                return Err(PlasmaError::config(format!(
                    "parameter '{}' expects a {} value, got {other:?}",
                    self.name,
                    kind.type_name()
                )));
            }
        };

        let in_range = |v: f64| v.is_finite() && self.min <= v && v <= self.max;
        let ok = match out {
            ParamValue::Float(v) => in_range(v),
            ParamValue::Int(v) => in_range(v as f64),
            ParamValue::Color(c) => c.iter().all(|&v| in_range(v)),
        };
        if !ok {
            return Err(PlasmaError::config(format!(
                "parameter '{}' value {out:?} is outside range [{}, {}]",
                self.name, self.min, self.max
            )));
        }
        Ok(out)
    }

    /// Number of flat-array slots this parameter occupies.
    pub fn slot_count(&self) -> usize {
        self.kind.slot_count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/param.rs"]
mod tests;
