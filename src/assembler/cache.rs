use std::collections::HashMap;
use std::sync::Arc;

use crate::assembler::manifest::ProgramManifest;
use crate::assembler::program::{
    AssembleOptions, AssembledProgram, ProgramSource, assemble_source, program_key, template_args,
};
use crate::assembler::sources::SourceStore;
use crate::assembler::template::TemplateArgs;
use crate::catalog::registry::Library;
use crate::effect::selection::ResolvedSelection;
use crate::foundation::error::PlasmaResult;

/// Assembled program variants keyed by the fingerprint of their template arguments.
#[derive(Debug, Default)]
pub struct ProgramCache {
    entries: HashMap<u64, Arc<ProgramSource>>,
}

impl ProgramCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached program for `args`, assembling it on a miss. The flag is `true` when the
    /// program was newly created.
    pub fn get_or_create(
        &mut self,
        store: &dyn SourceStore,
        args: &TemplateArgs,
        opts: &AssembleOptions,
    ) -> PlasmaResult<(Arc<ProgramSource>, bool)> {
        let key = program_key(args, opts);
        if let Some(hit) = self.entries.get(&key).filter(|hit| &hit.args == args) {
            tracing::info!(key = %format!("{key:016x}"), "reusing cached program variant");
            return Ok((Arc::clone(hit), false));
        }
        let source = Arc::new(assemble_source(store, args, opts)?);
        self.entries.insert(key, Arc::clone(&source));
        Ok((source, true))
    }

    /// Cached counterpart of [`crate::assembler::program::assemble`].
    pub fn assemble(
        &mut self,
        store: &dyn SourceStore,
        lib: &Library,
        resolved: &ResolvedSelection,
        opts: &AssembleOptions,
    ) -> PlasmaResult<(AssembledProgram, bool)> {
        let args = template_args(lib, resolved)?;
        let (source, created) = self.get_or_create(store, &args, opts)?;
        let manifest = ProgramManifest::build(lib, resolved)?;
        Ok((AssembledProgram { source, manifest }, created))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assembler/cache.rs"]
mod tests;
