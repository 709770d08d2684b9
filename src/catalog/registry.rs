use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::catalog::function::{FunctionDoc, FunctionFamily, FunctionSpec, ParamBindings};
use crate::foundation::error::{PlasmaError, PlasmaResult};

/// One catalog document: every function of a single family.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CatalogDoc {
    pub(crate) family: FunctionFamily,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) functions: Vec<FunctionDoc>,
}

impl CatalogDoc {
    pub(crate) fn from_json_str(text: &str) -> PlasmaResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Functions of one family, in declaration order.
#[derive(Clone, Debug)]
pub struct FunctionRegistry {
    family: FunctionFamily,
    description: String,
    functions: Vec<Arc<FunctionSpec>>,
    index: HashMap<String, usize>,
}

impl FunctionRegistry {
    pub fn new(family: FunctionFamily) -> Self {
        Self {
            family,
            description: String::new(),
            functions: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn family(&self) -> FunctionFamily {
        self.family
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Merge a JSON catalog document. The document must belong to this family and may not
    /// redefine an existing function. On error the registry is left unchanged.
    pub fn load_json_str(&mut self, text: &str) -> PlasmaResult<()> {
        let doc = CatalogDoc::from_json_str(text)?;
        self.merge(doc)
    }

    pub(crate) fn merge(&mut self, doc: CatalogDoc) -> PlasmaResult<()> {
        if doc.family != self.family {
            return Err(PlasmaError::validation(format!(
                "catalog document for family '{}' cannot be merged into the {} registry",
                doc.family, self.family
            )));
        }

        let mut staged = Vec::with_capacity(doc.functions.len());
        for f in doc.functions {
            let spec = FunctionSpec::from_doc(self.family, f)?;
            if self.index.contains_key(&spec.name)
                || staged.iter().any(|s: &FunctionSpec| s.name == spec.name)
            {
                return Err(PlasmaError::validation(format!(
                    "{} function key '{}' already exists in the registry",
                    self.family, spec.name
                )));
            }
            staged.push(spec);
        }

        for spec in staged {
            self.index.insert(spec.name.clone(), self.functions.len());
            self.functions.push(Arc::new(spec));
        }
        if !doc.description.is_empty() {
            self.description = doc.description;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.functions.clear();
        self.index.clear();
        self.description.clear();
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Function ids in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.functions.iter().map(|f| f.name.as_str())
    }

    pub fn first_key(&self) -> Option<&str> {
        self.functions.first().map(|f| f.name.as_str())
    }

    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FunctionSpec>> + '_ {
        self.functions.iter()
    }

    /// Look up a function, failing with a configuration error that names it.
    pub fn get(&self, name: &str) -> PlasmaResult<&Arc<FunctionSpec>> {
        self.index
            .get(name)
            .map(|&i| &self.functions[i])
            .ok_or_else(|| PlasmaError::config(format!("unknown {} function '{name}'", self.family)))
    }

    /// Largest parameter count across the family.
    pub fn max_param_count(&self) -> usize {
        self.functions
            .iter()
            .map(|f| f.params.len())
            .max()
            .unwrap_or(0)
    }

    /// Largest flat-array length across the family (colors occupy four slots).
    pub fn max_param_slots(&self) -> usize {
        self.functions
            .iter()
            .map(|f| f.param_slots())
            .max()
            .unwrap_or(0)
    }

    /// Default bindings for every function, keyed by function id.
    pub fn defaults(&self) -> BTreeMap<String, ParamBindings> {
        self.functions
            .iter()
            .map(|f| (f.name.clone(), f.default_bindings()))
            .collect()
    }
}

/// The four family registries used to build programs.
#[derive(Clone, Debug)]
pub struct Library {
    pub noise: FunctionRegistry,
    pub warp: FunctionRegistry,
    pub blend: FunctionRegistry,
    pub colorize: FunctionRegistry,
}

impl Library {
    pub fn empty() -> Self {
        Self {
            noise: FunctionRegistry::new(FunctionFamily::Noise),
            warp: FunctionRegistry::new(FunctionFamily::Warp),
            blend: FunctionRegistry::new(FunctionFamily::Blend),
            colorize: FunctionRegistry::new(FunctionFamily::Colorize),
        }
    }

    /// Library built from the catalogs compiled into the crate.
    pub fn builtin() -> PlasmaResult<Self> {
        let mut lib = Self::empty();
        for (name, text) in crate::catalog::builtin::CATALOG_DOCUMENTS {
            lib.load_json_str(text)
                .map_err(|e| PlasmaError::validation(format!("builtin catalog '{name}': {e}")))?;
        }
        Ok(lib)
    }

    /// Merge one catalog document into the registry of its family.
    pub fn load_json_str(&mut self, text: &str) -> PlasmaResult<()> {
        let doc = CatalogDoc::from_json_str(text)?;
        self.registry_mut(doc.family).merge(doc)
    }

    /// Merge every `*.json` document in `dir`, in file-name order.
    pub fn load_dir(&mut self, dir: &Path) -> PlasmaResult<()> {
        let mut paths = Vec::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("read catalog dir {}", dir.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("read catalog dir {}", dir.display()))?
                .path();
            if path.extension().is_some_and(|e| e == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("read catalog {}", path.display()))?;
            self.load_json_str(&text)
                .map_err(|e| PlasmaError::validation(format!("{}: {e}", path.display())))?;
            tracing::debug!(path = %path.display(), "merged catalog document");
        }
        Ok(())
    }

    pub fn registry(&self, family: FunctionFamily) -> &FunctionRegistry {
        match family {
            FunctionFamily::Noise => &self.noise,
            FunctionFamily::Warp => &self.warp,
            FunctionFamily::Blend => &self.blend,
            FunctionFamily::Colorize => &self.colorize,
        }
    }

    fn registry_mut(&mut self, family: FunctionFamily) -> &mut FunctionRegistry {
        match family {
            FunctionFamily::Noise => &mut self.noise,
            FunctionFamily::Warp => &mut self.warp,
            FunctionFamily::Blend => &mut self.blend,
            FunctionFamily::Colorize => &mut self.colorize,
        }
    }

    pub fn function(&self, family: FunctionFamily, name: &str) -> PlasmaResult<&Arc<FunctionSpec>> {
        self.registry(family).get(name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/registry.rs"]
mod tests;
