//! Classification of source entries and computation of what to write for each.

use crate::config::{Config, Delimiters, DirectoryRename};
use crate::error::{Error, Result};
use crate::ignore::ExclusionSet;
use crate::transform::Transformer;
use log::{debug, warn};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, FileType};
use std::path::{Component, Path, PathBuf};

/// How a source entry is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Excluded,
    Symlink,
    Binary,
    Text,
    /// Directories and special files; nothing is written for them.
    Other,
}

/// What has to happen in the destination for a single source entry.
#[derive(Debug, PartialEq, Eq)]
pub enum FileOperation {
    /// Copy bytes and metadata unchanged.
    Copy { target: PathBuf },
    /// Write text content. `templated` is set when the content was changed.
    Write { target: PathBuf, content: String, templated: bool },
    /// Recreate a symlink pointing at the raw `link_target`.
    Symlink { target: PathBuf, link_target: PathBuf },
}

/// Returns true if the extension of `path` is in `binary_extensions` (lowercase, no dot).
pub fn is_binary_path<P: AsRef<Path>>(path: P, binary_extensions: &HashSet<String>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| binary_extensions.contains(&ext.to_lowercase()))
}

/// Applies directory renames to a source-relative path.
///
/// A segment is renamed when it equals `rename.name` and the segment before
/// it in the source path equals `rename.parent`.
pub fn resolve_relative_path<P: AsRef<Path>>(
    relative_path: P,
    renames: &[DirectoryRename],
    delimiters: &Delimiters,
) -> PathBuf {
    let segments: Vec<OsString> = relative_path
        .as_ref()
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_os_string()),
            _ => None,
        })
        .collect();

    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let renamed = i.checked_sub(1).and_then(|parent| {
                renames.iter().find(|r| *segment == *r.name && segments[parent] == *r.parent)
            });
            match renamed {
                Some(rename) => OsString::from(delimiters.marker(&rename.variable)),
                None => segment.clone(),
            }
        })
        .collect()
}

/// Appends `suffix` to the file name of `path`.
pub fn with_template_suffix<P: AsRef<Path>>(path: P, suffix: &str) -> PathBuf {
    let path = path.as_ref();
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Decides and prepares the destination operation for each source entry.
pub struct Processor<'a> {
    config: &'a Config,
    source_root: &'a Path,
    output_root: &'a Path,
    exclusions: ExclusionSet,
    transformer: Transformer,
    binary_extensions: HashSet<String>,
}

impl<'a> Processor<'a> {
    /// # Errors
    /// * `Error::ExclusionError` if an exclusion pattern is invalid
    pub fn new(config: &'a Config, source_root: &'a Path, output_root: &'a Path) -> Result<Self> {
        let exclusions =
            ExclusionSet::new(&config.excluded_root_paths, &config.excluded_dir_names)?;
        let binary_extensions = config
            .binary_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();

        Ok(Self {
            config,
            source_root,
            output_root,
            exclusions,
            transformer: Transformer::new(config),
            binary_extensions,
        })
    }

    fn relative<'p>(&self, path: &'p Path) -> Result<&'p Path> {
        path.strip_prefix(self.source_root).map_err(|_| {
            Error::OutsideSourceError {
                path: path.display().to_string(),
                source_dir: self.source_root.display().to_string(),
            }
        })
    }

    /// True for configured exclusions and for anything inside the output root.
    pub fn is_excluded(&self, path: &Path) -> bool {
        if path.starts_with(self.output_root) {
            return true;
        }
        match path.strip_prefix(self.source_root) {
            Ok(relative) => self.exclusions.is_excluded(relative),
            Err(_) => true,
        }
    }

    pub fn classify(&self, path: &Path, file_type: FileType) -> EntryKind {
        if self.is_excluded(path) {
            EntryKind::Excluded
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else if !file_type.is_file() {
            EntryKind::Other
        } else if is_binary_path(path, &self.binary_extensions) {
            EntryKind::Binary
        } else {
            EntryKind::Text
        }
    }

    /// Destination path of a source entry, before any template suffix.
    pub fn target_path(&self, relative_path: &Path) -> PathBuf {
        self.output_root.join(resolve_relative_path(
            relative_path,
            &self.config.directory_renames,
            &self.config.delimiters,
        ))
    }

    /// Returns the operation for `path`, or `None` if nothing is written for it.
    ///
    /// # Errors
    /// * `Error::OutsideSourceError` if `path` is not under the source root
    /// * `Error::FileError` if the entry cannot be read
    /// * `Error::MarkerBlockError` if a text file has malformed marker sentinels
    pub fn process(&self, path: &Path, file_type: FileType) -> Result<Option<FileOperation>> {
        let kind = self.classify(path, file_type);
        let relative = self.relative(path)?;

        match kind {
            EntryKind::Excluded => {
                debug!("Skipping excluded path {}", relative.display());
                Ok(None)
            }
            EntryKind::Other => {
                if !file_type.is_dir() {
                    warn!("Skipping special file {}", relative.display());
                }
                Ok(None)
            }
            EntryKind::Symlink => {
                let link_target = fs::read_link(path).map_err(|source| Error::FileError {
                    path: relative.display().to_string(),
                    source,
                })?;
                debug!("Preserving symlink {} -> {}", relative.display(), link_target.display());
                Ok(Some(FileOperation::Symlink { target: self.target_path(relative), link_target }))
            }
            EntryKind::Binary => {
                debug!("Copying binary file {}", relative.display());
                Ok(Some(FileOperation::Copy { target: self.target_path(relative) }))
            }
            EntryKind::Text => {
                let target = self.target_path(relative);
                let bytes = fs::read(path).map_err(|source| Error::FileError {
                    path: relative.display().to_string(),
                    source,
                })?;
                let content = match String::from_utf8(bytes) {
                    Ok(content) => content,
                    Err(_) => {
                        debug!("{} is not valid UTF-8, copying as binary", relative.display());
                        return Ok(Some(FileOperation::Copy { target }));
                    }
                };

                let transformed = self.transformer.transform(&content).map_err(|source| {
                    Error::MarkerBlockError { path: relative.display().to_string(), source }
                })?;

                if transformed.modified {
                    debug!("Templating {}", relative.display());
                    Ok(Some(FileOperation::Write {
                        target: with_template_suffix(target, &self.config.template_suffix),
                        content: transformed.content,
                        templated: true,
                    }))
                } else {
                    debug!("Writing {} unchanged", relative.display());
                    Ok(Some(FileOperation::Write { target, content, templated: false }))
                }
            }
        }
    }
}
