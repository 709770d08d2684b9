use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{PlasmaError, PlasmaResult};

/// Named shader fragments the template resolver reads from.
///
/// Names are relative, `/`-separated paths such as `"warp/swirl.glsl"`.
pub trait SourceStore: Send + Sync {
    fn load(&self, name: &str) -> PlasmaResult<String>;

    /// Every available name, sorted.
    fn list(&self) -> PlasmaResult<Vec<String>>;
}

/// Fragments compiled into the crate.
const BUILTIN_SHADERS: &[(&str, &str)] = &[
    ("vertex.glsl", include_str!("../../shaders/vertex.glsl")),
    ("fragment.glsl", include_str!("../../shaders/fragment.glsl")),
    ("common.glsl", include_str!("../../shaders/common.glsl")),
    ("noise/lattice.glsl", include_str!("../../shaders/noise/lattice.glsl")),
    ("noise/perlin_3d.glsl", include_str!("../../shaders/noise/perlin_3d.glsl")),
    ("noise/value_3d.glsl", include_str!("../../shaders/noise/value_3d.glsl")),
    ("noise/sine_field.glsl", include_str!("../../shaders/noise/sine_field.glsl")),
    ("fractal/scalar.glsl", include_str!("../../shaders/fractal/scalar.glsl")),
    ("fractal/paired.glsl", include_str!("../../shaders/fractal/paired.glsl")),
    ("fractal/gradient.glsl", include_str!("../../shaders/fractal/gradient.glsl")),
    ("warp/swirl_core.glsl", include_str!("../../shaders/warp/swirl_core.glsl")),
    ("warp/offset.glsl", include_str!("../../shaders/warp/offset.glsl")),
    ("warp/displace.glsl", include_str!("../../shaders/warp/displace.glsl")),
    ("warp/swirl.glsl", include_str!("../../shaders/warp/swirl.glsl")),
    ("warp/swirl_sigmoid.glsl", include_str!("../../shaders/warp/swirl_sigmoid.glsl")),
    (
        "warp/swirl_sigmoid_distorted.glsl",
        include_str!("../../shaders/warp/swirl_sigmoid_distorted.glsl"),
    ),
    ("warp/infinite_mirror.glsl", include_str!("../../shaders/warp/infinite_mirror.glsl")),
    ("blend/linear.glsl", include_str!("../../shaders/blend/linear.glsl")),
    ("blend/additive.glsl", include_str!("../../shaders/blend/additive.glsl")),
    ("blend/multiply.glsl", include_str!("../../shaders/blend/multiply.glsl")),
    ("blend/screen.glsl", include_str!("../../shaders/blend/screen.glsl")),
    ("blend/hue_shift_linear.glsl", include_str!("../../shaders/blend/hue_shift_linear.glsl")),
    ("blend/replace.glsl", include_str!("../../shaders/blend/replace.glsl")),
    ("color/grayscale.glsl", include_str!("../../shaders/color/grayscale.glsl")),
    ("color/two_tone.glsl", include_str!("../../shaders/color/two_tone.glsl")),
    ("color/cosine_palette.glsl", include_str!("../../shaders/color/cosine_palette.glsl")),
    ("color/hue_cycle.glsl", include_str!("../../shaders/color/hue_cycle.glsl")),
];

/// In-memory fragment map.
#[derive(Clone, Debug, Default)]
pub struct MemorySources {
    sources: BTreeMap<String, String>,
}

impl MemorySources {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fragments shipped with the crate.
    pub fn builtin() -> Self {
        let mut out = Self::new();
        for (name, text) in BUILTIN_SHADERS {
            out.insert(*name, *text);
        }
        out
    }

    /// Eagerly read every `*.glsl` file under `root`.
    pub fn from_dir(root: &Path) -> PlasmaResult<Self> {
        let dir = DirSources::new(root);
        let mut out = Self::new();
        for name in dir.list()? {
            let text = dir.load(&name)?;
            out.sources.insert(name, text);
        }
        Ok(out)
    }

    /// Add or replace a fragment.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(name.into(), text.into());
    }

    /// Overlay every fragment of `other`, replacing same-named entries.
    pub fn extend(&mut self, other: MemorySources) {
        self.sources.extend(other.sources);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl SourceStore for MemorySources {
    fn load(&self, name: &str) -> PlasmaResult<String> {
        self.sources
            .get(name)
            .cloned()
            .ok_or_else(|| PlasmaError::assembly(format!("unknown source fragment '{name}'")))
    }

    fn list(&self) -> PlasmaResult<Vec<String>> {
        Ok(self.sources.keys().cloned().collect())
    }
}

/// Fragments read lazily from a directory of `*.glsl` files.
#[derive(Clone, Debug)]
pub struct DirSources {
    root: PathBuf,
}

impl DirSources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, name: &str) -> PlasmaResult<PathBuf> {
        let rel = Path::new(name);
        if !rel
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(PlasmaError::assembly(format!(
                "source fragment name '{name}' must be a relative path without '..'"
            )));
        }
        Ok(self.root.join(rel))
    }
}

impl SourceStore for DirSources {
    fn load(&self, name: &str) -> PlasmaResult<String> {
        let path = self.path_of(name)?;
        if !path.is_file() {
            return Err(PlasmaError::assembly(format!("unknown source fragment '{name}'")));
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read shader fragment {}", path.display()))?;
        Ok(text)
    }

    fn list(&self) -> PlasmaResult<Vec<String>> {
        let mut out = Vec::new();
        let mut stack = vec![self.root.clone()];
        while let Some(dir) = stack.pop() {
            let entries = std::fs::read_dir(&dir)
                .with_context(|| format!("read shader dir {}", dir.display()))?;
            for entry in entries {
                let path = entry
                    .with_context(|| format!("read shader dir {}", dir.display()))?
                    .path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.extension().is_some_and(|e| e == "glsl") {
                    if let Ok(rel) = path.strip_prefix(&self.root) {
                        let name: Vec<String> = rel
                            .components()
                            .map(|c| c.as_os_str().to_string_lossy().into_owned())
                            .collect();
                        out.push(name.join("/"));
                    }
                }
            }
        }
        out.sort();
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assembler/sources.rs"]
mod tests;
