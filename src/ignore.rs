//! Path exclusion for template compilation.
//! Root-level entries are matched against the leading segments of a relative
//! path, directory names against every segment at any depth. Entries are
//! literal names: `[id]` only ever matches a segment named `[id]`.

use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path, PathBuf};

/// Compiled exclusion rules.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    root_paths: GlobSet,
    dir_names: GlobSet,
}

fn build_literal_set<S: AsRef<str>>(names: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for name in names {
        let glob = GlobBuilder::new(&globset::escape(name.as_ref()))
            .literal_separator(true)
            .build()
            .map_err(|e| {
                Error::ExclusionError(format!("invalid exclusion '{}': {e}", name.as_ref()))
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| Error::ExclusionError(e.to_string()))
}

impl ExclusionSet {
    /// Compiles the root-level and any-depth exclusion lists.
    ///
    /// # Errors
    /// * `Error::ExclusionError` if the matcher cannot be built
    pub fn new<S: AsRef<str>>(root_paths: &[S], dir_names: &[S]) -> Result<Self> {
        Ok(Self {
            root_paths: build_literal_set(root_paths)?,
            dir_names: build_literal_set(dir_names)?,
        })
    }

    /// Returns true if `relative_path` (relative to the source root) is excluded.
    pub fn is_excluded<P: AsRef<Path>>(&self, relative_path: P) -> bool {
        let mut prefix = PathBuf::new();
        for component in relative_path.as_ref().components() {
            let Component::Normal(segment) = component else {
                continue;
            };
            prefix.push(segment);
            if self.root_paths.is_match(&prefix) || self.dir_names.is_match(segment) {
                return true;
            }
        }
        false
    }
}
