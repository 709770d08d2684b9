use std::collections::BTreeMap;

use crate::catalog::param::{ParamDef, ParamDoc, ParamValue};
use crate::foundation::error::{PlasmaError, PlasmaResult};

/// Parameter values bound by name. Missing names fall back to the parameter default.
pub type ParamBindings = BTreeMap<String, ParamValue>;

/// Name of the group that collects parameters not listed in any declared group.
pub const DEFAULT_PARAM_GROUP: &str = "Parameters";

/// The four interchangeable function families.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FunctionFamily {
    /// `vec3 -> float` generators, plus analytic derivatives.
    Noise,
    /// `(coordinate, noise sample, time, params) -> offset`.
    Warp,
    /// `(previous, current, params) -> color`.
    Blend,
    /// `(scalar, position, time, params) -> color`.
    #[serde(alias = "color")]
    Colorize,
}

impl FunctionFamily {
    pub const ALL: [Self; 4] = [Self::Noise, Self::Warp, Self::Blend, Self::Colorize];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Noise => "noise",
            Self::Warp => "warp",
            Self::Blend => "blend",
            Self::Colorize => "colorize",
        }
    }
}

impl std::fmt::Display for FunctionFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fractal accumulator variant a warp function consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractalVariant {
    /// Two decorrelated scalar fields sharing one position.
    Paired,
    /// One scalar field and its spatial derivative.
    Gradient,
}

impl FractalVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paired => "paired",
            Self::Gradient => "gradient",
        }
    }
}

/// Family-specific signature information.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignatureVariant {
    /// Noise generator with its native output range.
    Noise { min_value: f64, max_value: f64 },
    /// Warp fed by the given accumulator variant.
    Warp { fractal: FractalVariant },
    /// Blends and colorizers have a single fixed signature.
    Fixed,
}

/// Display grouping of parameters.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParamGroup {
    pub name: String,
    pub params: Vec<String>,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FunctionDoc {
    pub(crate) id: String,
    pub(crate) display_name: String,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) min_value: Option<f64>,
    pub(crate) max_value: Option<f64>,
    pub(crate) fractal_noise_variant: Option<FractalVariant>,
    #[serde(default)]
    pub(crate) params: Vec<ParamDoc>,
    #[serde(default)]
    pub(crate) param_groups: Vec<ParamGroup>,
}

/// Immutable catalog entry. Identity is `(family, name)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FunctionSpec {
    pub family: FunctionFamily,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub signature_variant: SignatureVariant,
    pub params: Vec<ParamDef>,
    pub param_groups: Vec<ParamGroup>,
}

impl FunctionSpec {
    pub(crate) fn from_doc(family: FunctionFamily, doc: FunctionDoc) -> PlasmaResult<Self> {
        if !is_identifier(&doc.id) {
            return Err(PlasmaError::validation(format!(
                "{family} function id '{}' is not a valid identifier",
                doc.id
            )));
        }
        let name = doc.id;
        let in_fn = |msg: &dyn std::fmt::Display| {
            PlasmaError::validation(format!("{family} function '{name}': {msg}"))
        };

        let signature_variant = match family {
            FunctionFamily::Noise => {
                let (min_value, max_value) = match (doc.min_value, doc.max_value) {
                    (Some(lo), Some(hi)) if lo.is_finite() && hi.is_finite() && lo < hi => {
                        (lo, hi)
                    }
                    _ => {
                        return Err(in_fn(&"noise functions need finite 'min_value' < 'max_value'"));
                    }
                };
                SignatureVariant::Noise {
                    min_value,
                    max_value,
                }
            }
            FunctionFamily::Warp => {
                let fractal = doc.fractal_noise_variant.ok_or_else(|| {
                    in_fn(&"warp functions must declare 'fractal_noise_variant'")
                })?;
                SignatureVariant::Warp { fractal }
            }
            FunctionFamily::Blend | FunctionFamily::Colorize => SignatureVariant::Fixed,
        };
        if family != FunctionFamily::Noise && (doc.min_value.is_some() || doc.max_value.is_some())
        {
            return Err(in_fn(&"'min_value'/'max_value' are only valid for noise functions"));
        }
        if family != FunctionFamily::Warp && doc.fractal_noise_variant.is_some() {
            return Err(in_fn(&"'fractal_noise_variant' is only valid for warp functions"));
        }
        if family == FunctionFamily::Noise && !doc.params.is_empty() {
            return Err(in_fn(&"noise functions take no parameters"));
        }

        let mut params: Vec<ParamDef> = Vec::with_capacity(doc.params.len());
        for p in doc.params {
            let def = ParamDef::from_doc(p).map_err(|e| in_fn(&e))?;
            if params.iter().any(|q| q.name == def.name) {
                return Err(in_fn(&format_args!("duplicate parameter '{}'", def.name)));
            }
            params.push(def);
        }

        for group in &doc.param_groups {
            for p in &group.params {
                if !params.iter().any(|d| &d.name == p) {
                    return Err(in_fn(&format_args!(
                        "group '{}' lists unknown parameter '{p}'",
                        group.name
                    )));
                }
            }
        }

        Ok(Self {
            family,
            name,
            display_name: doc.display_name,
            description: doc.description,
            signature_variant,
            params,
            param_groups: doc.param_groups,
        })
    }

    /// Native output range of a noise generator.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        match self.signature_variant {
            SignatureVariant::Noise {
                min_value,
                max_value,
            } => Some((min_value, max_value)),
            _ => None,
        }
    }

    /// Accumulator variant required by a warp function.
    pub fn fractal_variant(&self) -> Option<FractalVariant> {
        match self.signature_variant {
            SignatureVariant::Warp { fractal } => Some(fractal),
            _ => None,
        }
    }

    pub fn param(&self, name: &str) -> Option<&ParamDef> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Total flat-array slots this function's parameters occupy.
    pub fn param_slots(&self) -> usize {
        self.params.iter().map(ParamDef::slot_count).sum()
    }

    pub fn default_bindings(&self) -> ParamBindings {
        self.params
            .iter()
            .map(|p| (p.name.clone(), p.default))
            .collect()
    }

    /// Resolve `bindings` into declaration order, filling defaults and checking every value.
    pub fn bind(&self, bindings: &ParamBindings) -> PlasmaResult<Vec<ParamValue>> {
        if let Some(unknown) = bindings.keys().find(|k| self.param(k).is_none()) {
            return Err(PlasmaError::config(format!(
                "{} function '{}' has no parameter '{unknown}'",
                self.family, self.name
            )));
        }
        self.params
            .iter()
            .map(|p| match bindings.get(&p.name) {
                Some(v) => p
                    .coerce(*v)
                    .map_err(|e| e.context(format_args!("{} function '{}'", self.family, self.name))),
                None => Ok(p.default),
            })
            .collect()
    }

    /// Display groups with ungrouped parameters collected under [`DEFAULT_PARAM_GROUP`].
    pub fn groups(&self) -> Vec<ParamGroup> {
        let mut out = self.param_groups.clone();
        let ungrouped: Vec<String> = self
            .params
            .iter()
            .filter(|p| !out.iter().any(|g| g.params.contains(&p.name)))
            .map(|p| p.name.clone())
            .collect();
        if !ungrouped.is_empty() {
            out.push(ParamGroup {
                name: DEFAULT_PARAM_GROUP.to_owned(),
                params: ungrouped,
            });
        }
        out
    }
}

/// Flatten ordered values into slot order (colors take four slots).
pub fn flatten_values(values: &[ParamValue]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    for v in values {
        v.write_slots(&mut out);
    }
    out
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/function.rs"]
mod tests;
