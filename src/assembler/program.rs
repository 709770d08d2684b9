use std::sync::Arc;

use crate::assembler::manifest::{ProgramManifest, array_length};
use crate::assembler::sources::SourceStore;
use crate::assembler::template::{DEFAULT_MAX_INCLUDE_DEPTH, TemplateArgs, TemplateResolver};
use crate::catalog::function::FunctionFamily;
use crate::catalog::registry::Library;
use crate::effect::selection::ResolvedSelection;
use crate::foundation::error::{PlasmaError, PlasmaResult};
use crate::foundation::math::Fnv1a64;

/// Skeleton of the generated fragment program.
pub const FRAGMENT_SHADER: &str = "fragment.glsl";
/// Full-screen pass-through vertex program.
pub const VERTEX_SHADER: &str = "vertex.glsl";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AssembleOptions {
    /// Wrap each fragment in `FILE` / `END FILE` comments.
    pub annotate_sources: bool,
    pub max_include_depth: usize,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            annotate_sources: false,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

/// Generated program text. Shared between every selection with the same structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramSource {
    pub vertex: String,
    pub fragment: String,
    pub args: TemplateArgs,
    pub key: u64,
}

/// Program text plus the uniform values for one selection.
#[derive(Clone, Debug)]
pub struct AssembledProgram {
    pub source: Arc<ProgramSource>,
    pub manifest: ProgramManifest,
}

impl AssembledProgram {
    pub fn fragment(&self) -> &str {
        &self.source.fragment
    }

    pub fn vertex(&self) -> &str {
        &self.source.vertex
    }
}

/// Skeleton substitutions for a resolved selection.
///
/// Depends only on function choices, the feedback switch and the library's array sizes, so
/// selections differing in values alone produce the same arguments.
pub fn template_args(lib: &Library, resolved: &ResolvedSelection) -> PlasmaResult<TemplateArgs> {
    let (noise_min, noise_max) = resolved.noise.value_range().ok_or_else(|| {
        PlasmaError::config(format!(
            "noise function '{}' declares no value range",
            resolved.noise.name
        ))
    })?;
    let variant = resolved.warp.spec.fractal_variant().ok_or_else(|| {
        PlasmaError::config(format!(
            "warp function '{}' declares no fractal noise variant",
            resolved.warp.name()
        ))
    })?;

    let enabled = if resolved.selection.feedback.enabled { "1" } else { "0" };
    let pairs = [
        ("FB_ENABLED", enabled.to_owned()),
        ("NOISE_MIN", glsl_float(noise_min)),
        ("NOISE_MAX", glsl_float(noise_max)),
        ("MAX_WARP_PARAMS", array_length(lib, FunctionFamily::Warp).to_string()),
        ("MAX_BLEND_PARAMS", array_length(lib, FunctionFamily::Blend).to_string()),
        ("MAX_COLOR_PARAMS", array_length(lib, FunctionFamily::Colorize).to_string()),
        ("NOISE_FUNC", resolved.noise.name.clone()),
        ("COLOR_FUNC", resolved.color.name().to_owned()),
        ("FB_WARP_FRACTAL_NOISE_VARIANT", variant.as_str().to_owned()),
        ("FB_WARP_NOISE_FUNC", resolved.warp_noise.name.clone()),
        ("FB_WARP_XFORM_FUNC", resolved.warp.name().to_owned()),
        ("FB_BLEND_FUNC", resolved.blend.name().to_owned()),
    ];
    Ok(pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect())
}

/// Float literal the shading language accepts (`1` becomes `1.0`).
pub fn glsl_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Stable fingerprint of the arguments and options that shape the program text.
pub fn program_key(args: &TemplateArgs, opts: &AssembleOptions) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_u64(args.len() as u64);
    for (k, v) in args {
        h.write_str(k);
        h.write_str(v);
    }
    h.write_u8(u8::from(opts.annotate_sources));
    h.write_u64(opts.max_include_depth as u64);
    h.finish()
}

/// Resolve both programs from `store`.
#[tracing::instrument(skip(store, args), fields(key = tracing::field::Empty))]
pub fn assemble_source(
    store: &dyn SourceStore,
    args: &TemplateArgs,
    opts: &AssembleOptions,
) -> PlasmaResult<ProgramSource> {
    let key = program_key(args, opts);
    let key_hex = format!("{key:016x}");
    tracing::Span::current().record("key", key_hex.as_str());

    let resolver = TemplateResolver::new(store)
        .with_max_include_depth(opts.max_include_depth)
        .with_annotations(opts.annotate_sources);
    let fragment = resolver.resolve(FRAGMENT_SHADER, args)?;
    let vertex = resolver.resolve(VERTEX_SHADER, &TemplateArgs::new())?;

    tracing::info!(key = %key_hex, bytes = fragment.len(), "assembled fragment program");
    Ok(ProgramSource {
        vertex,
        fragment,
        args: args.clone(),
        key,
    })
}

/// Build the program and manifest for `resolved`. Pure: the same inputs always give the
/// same text.
pub fn assemble(
    store: &dyn SourceStore,
    lib: &Library,
    resolved: &ResolvedSelection,
    opts: &AssembleOptions,
) -> PlasmaResult<AssembledProgram> {
    let args = template_args(lib, resolved)?;
    let source = assemble_source(store, &args, opts)?;
    let manifest = ProgramManifest::build(lib, resolved)?;
    Ok(AssembledProgram {
        source: Arc::new(source),
        manifest,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assembler/program.rs"]
mod tests;
