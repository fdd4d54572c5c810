//! Compilation of a working project tree into a template tree.

use crate::config::Config;
use crate::constants::TEMPLATE_DIR;
use crate::error::{Error, Result};
use crate::processor::{FileOperation, Processor};
use filetime::FileTime;
use log::{debug, info};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Counts reported after a compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSummary {
    /// Destination as shown to the user.
    pub destination: PathBuf,
    pub template_suffix: String,
    /// Regular files in the destination.
    pub files: usize,
    /// Files whose name carries the template suffix.
    pub templated: usize,
    pub symlinks: usize,
}

impl fmt::Display for CompileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Compiled template to {}/", self.destination.display())?;
        write!(
            f,
            "  {} files total, {} with {} suffix, {} symlinks preserved",
            self.files, self.templated, self.template_suffix, self.symlinks
        )
    }
}

/// Removes `output_dir` if it exists and recreates it empty.
pub fn reset_output_dir<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let output_dir = output_dir.as_ref();
    if fs::symlink_metadata(output_dir).is_ok() {
        debug!("Removing previous output {}", output_dir.display());
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;
    Ok(())
}

fn create_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn write_file(target: &Path, content: &str) -> io::Result<()> {
    create_parent_dir(target)?;
    // A recreated symlink must be replaced, not written through.
    if fs::symlink_metadata(target).is_ok_and(|m| m.file_type().is_symlink()) {
        fs::remove_file(target)?;
    }
    fs::write(target, content)
}

/// Copies bytes, permissions and the modification time.
fn copy_file(source: &Path, target: &Path) -> io::Result<()> {
    create_parent_dir(target)?;
    fs::copy(source, target)?;
    let metadata = fs::metadata(source)?;
    filetime::set_file_mtime(target, FileTime::from_last_modification_time(&metadata))
}

#[cfg(unix)]
fn create_symlink(link_target: &Path, target: &Path) -> io::Result<()> {
    create_parent_dir(target)?;
    std::os::unix::fs::symlink(link_target, target)
}

#[cfg(windows)]
fn create_symlink(link_target: &Path, target: &Path) -> io::Result<()> {
    create_parent_dir(target)?;
    let resolved = target.parent().map(|p| p.join(link_target)).unwrap_or_default();
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(link_target, target)
    } else {
        std::os::windows::fs::symlink_file(link_target, target)
    }
}

/// Wraps an I/O failure with the path of `target` inside `output_root`.
fn file_error(output_root: &Path, target: &Path, source: io::Error) -> Error {
    let path = target.strip_prefix(output_root).unwrap_or(target);
    Error::FileError { path: path.display().to_string(), source }
}

fn apply(source: &Path, output_root: &Path, operation: &FileOperation) -> Result<()> {
    let (target, result) = match operation {
        FileOperation::Copy { target } => (target, copy_file(source, target)),
        FileOperation::Write { target, content, .. } => (target, write_file(target, content)),
        FileOperation::Symlink { target, link_target } => {
            (target, create_symlink(link_target, target))
        }
    };
    result.map_err(|e| file_error(output_root, target, e))
}

/// Counts files, suffixed files and symlinks under `output_dir`.
fn count_output(output_dir: &Path, template_suffix: &str) -> Result<(usize, usize, usize)> {
    let (mut files, mut templated, mut symlinks) = (0, 0, 0);
    for entry in WalkDir::new(output_dir).min_depth(1) {
        let entry = entry?;
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            symlinks += 1;
        } else if file_type.is_file() {
            files += 1;
            if entry.file_name().to_string_lossy().ends_with(template_suffix) {
                templated += 1;
            }
        }
    }
    Ok((files, templated, symlinks))
}

/// Compiles `source_root` into `output_root`.
///
/// # Flow
/// 1. Resets the output directory
/// 2. Walks the source in file name order, skipping exclusions
/// 3. Copies binary files and writes (possibly templated) text files
/// 4. Recreates symlinks
/// 5. Writes the auxiliary files at the output root
///
/// # Errors
/// * `Error::SourceDoesNotExistError` if `source_root` is not a directory
/// * Any I/O, walk, exclusion or marker block error; the run stops at the first one
pub fn compile_tree(source_root: &Path, output_root: &Path, config: &Config) -> Result<CompileSummary> {
    if !source_root.is_dir() {
        return Err(Error::SourceDoesNotExistError {
            source_dir: source_root.display().to_string(),
        });
    }

    reset_output_dir(output_root)?;

    let processor = Processor::new(config, source_root, output_root)?;
    let mut symlinks = Vec::new();

    let walker = WalkDir::new(source_root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !processor.is_excluded(entry.path()));

    for entry in walker {
        let entry = entry?;
        match processor.process(entry.path(), entry.file_type())? {
            Some(operation @ FileOperation::Symlink { .. }) => symlinks.push(operation),
            Some(operation) => apply(entry.path(), output_root, &operation)?,
            None => {}
        }
    }

    // Symlinks go last so their targets' processing order does not matter.
    for operation in &symlinks {
        apply(source_root, output_root, operation)?;
    }

    for (relative, content) in config.auxiliary_files() {
        debug!("Writing auxiliary file {relative}");
        let target = output_root.join(relative);
        write_file(&target, &content).map_err(|e| file_error(output_root, &target, e))?;
    }

    let (files, templated, symlinks) = count_output(output_root, &config.template_suffix)?;
    let destination = output_root.strip_prefix(source_root).unwrap_or(output_root).to_path_buf();
    info!("Compiled {} into {}", source_root.display(), output_root.display());

    Ok(CompileSummary {
        destination,
        template_suffix: config.template_suffix.clone(),
        files,
        templated,
        symlinks,
    })
}

/// Compiles the project at `root` into its fixed template directory.
pub fn compile<P: AsRef<Path>>(root: P, config: &Config) -> Result<CompileSummary> {
    let root = root.as_ref();
    compile_tree(root, &root.join(TEMPLATE_DIR), config)
}
