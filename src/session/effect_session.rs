use crate::assembler::cache::ProgramCache;
use crate::assembler::manifest::ProgramManifest;
use crate::assembler::program::{AssembleOptions, AssembledProgram};
use crate::assembler::sources::SourceStore;
use crate::catalog::registry::Library;
use crate::effect::selection::{EffectSelection, ResolvedSelection};
use crate::foundation::error::{PlasmaError, PlasmaResult};
use crate::pipeline::feedback::CpuEffect;

/// What happened to the active program when a selection change was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    /// Nothing was queued.
    Unchanged,
    /// Same functions; only the manifest was rebuilt.
    Values,
    /// Different functions; the program was switched. `created` is false when the variant
    /// came from the cache.
    Program { created: bool },
    /// The change failed to resolve or assemble; the previous selection stays active.
    Rejected,
}

/// Owns the catalog, the fragment store and the active program, and applies selection
/// changes at frame boundaries.
pub struct EffectSession {
    library: Library,
    sources: Box<dyn SourceStore>,
    options: AssembleOptions,
    cache: ProgramCache,
    current: ResolvedSelection,
    program: AssembledProgram,
    pending: Option<EffectSelection>,
    last_rejection: Option<PlasmaError>,
}

impl EffectSession {
    pub fn new(
        library: Library,
        sources: impl SourceStore + 'static,
        selection: EffectSelection,
    ) -> PlasmaResult<Self> {
        Self::with_options(library, sources, selection, AssembleOptions::default())
    }

    /// Build the initial program. Unlike later changes, a failure here has no previous
    /// program to fall back to and is returned.
    pub fn with_options(
        library: Library,
        sources: impl SourceStore + 'static,
        selection: EffectSelection,
        options: AssembleOptions,
    ) -> PlasmaResult<Self> {
        let sources: Box<dyn SourceStore> = Box::new(sources);
        let mut cache = ProgramCache::new();
        let current = selection.resolve(&library)?;
        let (program, _) = cache.assemble(sources.as_ref(), &library, &current, &options)?;
        Ok(Self {
            library,
            sources,
            options,
            cache,
            current,
            program,
            pending: None,
            last_rejection: None,
        })
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn selection(&self) -> &EffectSelection {
        &self.current.selection
    }

    pub fn resolved(&self) -> &ResolvedSelection {
        &self.current
    }

    /// The last program that assembled successfully.
    pub fn program(&self) -> &AssembledProgram {
        &self.program
    }

    pub fn cached_programs(&self) -> usize {
        self.cache.len()
    }

    /// Stage a change for the next [`EffectSession::begin_frame`]. A later call replaces
    /// an earlier one that has not been applied yet.
    pub fn queue_selection(&mut self, selection: EffectSelection) {
        self.pending = Some(selection);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Why the most recent change was rejected, if it was.
    pub fn last_rejection(&self) -> Option<&PlasmaError> {
        self.last_rejection.as_ref()
    }

    /// Frame boundary: apply the queued change, if any.
    pub fn begin_frame(&mut self) -> SelectionChange {
        let Some(selection) = self.pending.take() else {
            return SelectionChange::Unchanged;
        };
        match self.apply(selection) {
            Ok(change) => {
                self.last_rejection = None;
                change
            }
            Err(err) => {
                tracing::warn!(error = %err, "rejected selection change, keeping last good program");
                self.last_rejection = Some(err);
                SelectionChange::Rejected
            }
        }
    }

    /// Apply a change immediately. On error nothing changes.
    pub fn apply(&mut self, selection: EffectSelection) -> PlasmaResult<SelectionChange> {
        let resolved = selection.resolve(&self.library)?;

        if resolved.same_structure(&self.current) {
            let manifest = ProgramManifest::build(&self.library, &resolved)?;
            self.program.manifest = manifest;
            self.current = resolved;
            tracing::debug!("value-only change, manifest rebuilt");
            return Ok(SelectionChange::Values);
        }

        let (program, created) =
            self.cache
                .assemble(self.sources.as_ref(), &self.library, &resolved, &self.options)?;
        tracing::info!(
            created,
            noise = %resolved.noise.name,
            warp = resolved.warp.name(),
            blend = resolved.blend.name(),
            color = resolved.color.name(),
            "switched program"
        );
        self.program = program;
        self.current = resolved;
        Ok(SelectionChange::Program { created })
    }

    /// CPU renderer for the active selection.
    pub fn cpu_effect(&self) -> PlasmaResult<CpuEffect> {
        CpuEffect::from_resolved(&self.current)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/effect_session.rs"]
mod tests;
