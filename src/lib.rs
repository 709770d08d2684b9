#![forbid(unsafe_code)]
//! # plasma-fractal
//!
//! Assembles fragment programs for an animated fractal-noise effect with frame feedback,
//! and evaluates the same effect on the CPU.
//!
//! ## Core concepts
//!
//! - [`Library`]: the function catalog, one [`FunctionRegistry`] per family (noise, warp,
//!   blend, colorize), loaded from JSON documents
//! - [`EffectSelection`]: one function per [`Role`] plus parameter values and fractal
//!   coefficients; [`EffectSelection::resolve`] checks it against a library
//! - [`TemplateResolver`]: expands `#include` / `#apply_template` directives and `<KEY>`
//!   placeholders over a [`SourceStore`]
//! - [`assemble`]: pure `(fragments, library, selection) -> program text + manifest`
//! - [`ProgramManifest`]: where every bound parameter lands in the flat uniform arrays
//! - [`EffectSession`]: applies queued selection changes at frame boundaries and keeps the
//!   last good program when a change is rejected
//! - [`CpuEffect`] with [`FrameBuffers`]: the per-frame pipeline (base field, colorize,
//!   optional warp of the previous frame, blend, swap)
//!
//! Value-only changes keep the program text and rebuild only the manifest; function
//! changes select another program variant from the [`ProgramCache`].

mod assembler;
mod catalog;
mod effect;
mod foundation;
mod fractal;
mod library;
mod pipeline;
mod session;

pub use assembler::cache::ProgramCache;
pub use assembler::manifest::{
    FRAME_INPUTS, ParamArray, ParamSlot, ProgramManifest, ScalarUniform, UniformValue,
    array_length,
};
pub use assembler::program::{
    AssembleOptions, AssembledProgram, FRAGMENT_SHADER, ProgramSource, VERTEX_SHADER, assemble,
    assemble_source, glsl_float, program_key, template_args,
};
pub use assembler::sources::{DirSources, MemorySources, SourceStore};
pub use assembler::template::{DEFAULT_MAX_INCLUDE_DEPTH, TemplateArgs, TemplateResolver};
pub use catalog::function::{
    DEFAULT_PARAM_GROUP, FractalVariant, FunctionFamily, FunctionSpec, ParamBindings,
    ParamGroup, SignatureVariant, flatten_values,
};
pub use catalog::param::{ParamDef, ParamKind, ParamValue};
pub use catalog::registry::{FunctionRegistry, Library};
pub use effect::selection::{
    EffectSelection, FeedbackLayer, FunctionChoice, NoiseLayer, ResolvedFunction,
    ResolvedSelection, Role,
};
pub use foundation::core::{Canvas, Fps, Rgba, Vec2, Vec3};
pub use foundation::error::{PlasmaError, PlasmaResult};
pub use foundation::math::{EPSILON, rotate, safe_normalize, sigmoid};
pub use fractal::accumulator::{
    FractalParams, MAX_OCTAVES, PAIRED_TIME_OFFSET, fractal_gradient, fractal_paired,
    fractal_scalar,
};
pub use library::blend::{BlendKind, blend_additive, blend_linear};
pub use library::colorize::ColorizeKind;
pub use library::noise::{NoiseGenerator, NoiseSample};
pub use library::warp::WarpKind;
pub use pipeline::buffers::FrameBuffers;
pub use pipeline::feedback::CpuEffect;
pub use pipeline::image::FloatImage;
pub use pipeline::timer::AnimationTimer;
pub use session::effect_session::{EffectSession, SelectionChange};
