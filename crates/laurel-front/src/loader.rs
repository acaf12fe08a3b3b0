//! Source loaders: how compilation units reach the environment.
//!
//! The core does not prescribe a mapping from storage to namespaces; it
//! consumes this interface. `FsLoader` mirrors a directory tree (directory
//! = namespace, file = unit); `MemoryLoader` serves tests and embedding.
//! Listing happens here, but unit contents are only read by the `read`
//! transform.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::IoError;
use crate::unit::UnitOrigin;

pub trait SourceLoader {
    /// Namespace paths to populate, parents before children. The root
    /// namespace is `main`.
    fn namespaces(&self) -> Result<Vec<String>, IoError>;

    /// Units of one namespace as `(display name, origin)` pairs, in a
    /// deterministic order.
    fn load(&self, path: &str) -> Result<Vec<(String, UnitOrigin)>, IoError>;
}

/// Directory-tree loader. Each directory under the root is a namespace;
/// each `*.lr` file is a unit.
pub struct FsLoader {
    root: PathBuf,
    extension: String,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "lr".to_owned(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    fn dir_for(&self, path: &str) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in path.split('.').skip(1) {
            dir.push(segment);
        }
        dir
    }

    fn collect_dirs(&self, dir: &Path, name: String, out: &mut Vec<String>) -> Result<(), IoError> {
        out.push(name.clone());
        let mut subdirs = Vec::new();
        let entries =
            std::fs::read_dir(dir).map_err(|e| IoError::new(dir.display().to_string(), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| IoError::new(dir.display().to_string(), e))?;
            let path = entry.path();
            if path.is_dir()
                && let Some(dir_name) = path.file_name().and_then(|n| n.to_str())
            {
                subdirs.push((dir_name.to_owned(), path));
            }
        }
        subdirs.sort_by(|a, b| a.0.cmp(&b.0));
        for (dir_name, path) in subdirs {
            self.collect_dirs(&path, format!("{name}.{dir_name}"), out)?;
        }
        Ok(())
    }
}

impl SourceLoader for FsLoader {
    fn namespaces(&self) -> Result<Vec<String>, IoError> {
        let mut out = Vec::new();
        self.collect_dirs(&self.root, "main".to_owned(), &mut out)?;
        Ok(out)
    }

    fn load(&self, path: &str) -> Result<Vec<(String, UnitOrigin)>, IoError> {
        let dir = self.dir_for(path);
        let entries =
            std::fs::read_dir(&dir).map_err(|e| IoError::new(dir.display().to_string(), e))?;
        let mut units = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| IoError::new(dir.display().to_string(), e))?;
            let file = entry.path();
            if !file.is_file() {
                continue;
            }
            if file.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("<unit>")
                .to_owned();
            units.push((name, UnitOrigin::File(file)));
        }
        units.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(units)
    }
}

/// In-memory loader for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    units: IndexMap<String, Vec<(String, String)>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a unit to a namespace path (e.g. `"main"` or `"main.util"`).
    pub fn with_unit(
        mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        self.units
            .entry(namespace.into())
            .or_default()
            .push((name.into(), source.into()));
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn namespaces(&self) -> Result<Vec<String>, IoError> {
        Ok(self.units.keys().cloned().collect())
    }

    fn load(&self, path: &str) -> Result<Vec<(String, UnitOrigin)>, IoError> {
        Ok(self
            .units
            .get(path)
            .into_iter()
            .flatten()
            .map(|(name, source)| (name.clone(), UnitOrigin::Memory(source.clone())))
            .collect())
    }
}
