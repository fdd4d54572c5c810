//! Configuration handling for templatize.
//! The rules driving a compilation (placeholder literals, exclusions, binary
//! extensions, marker syntax and trailer files) are loaded from an optional
//! configuration file and fall back to built-in defaults.

use crate::constants::{
    ADMIN_DIR, CONFIG_FILES, DEFAULT_BINARY_EXTENSIONS, DEFAULT_BLOCK_END, DEFAULT_BLOCK_START,
    DEFAULT_DIRECTORY_RENAMES, DEFAULT_EXCLUDED_DIR_NAMES, DEFAULT_EXCLUDED_ROOT_PATHS,
    DEFAULT_REPLACEMENTS, DEFAULT_TEMPLATE_SUFFIX, DEFAULT_VARIABLE_END, DEFAULT_VARIABLE_START,
};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::{Component, Path};

/// Delimiters of a template variable marker, e.g. `[[` and `]]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Delimiters {
    pub variable_start: String,
    pub variable_end: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            variable_start: DEFAULT_VARIABLE_START.to_string(),
            variable_end: DEFAULT_VARIABLE_END.to_string(),
        }
    }
}

impl Delimiters {
    /// Renders the marker for `variable`, e.g. `[[ package_name ]]`.
    pub fn marker(&self, variable: &str) -> String {
        format!("{} {} {}", self.variable_start, variable, self.variable_end)
    }
}

/// A literal working value and the variable it becomes in the template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Replacement {
    pub literal: String,
    pub variable: String,
}

/// Renames a path segment `name` whose parent segment is `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryRename {
    pub parent: String,
    pub name: String,
    pub variable: String,
}

/// Sentinels bounding a block that only belongs in the working project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerBlock {
    pub start: String,
    pub end: String,
}

impl Default for MarkerBlock {
    fn default() -> Self {
        Self { start: DEFAULT_BLOCK_START.to_string(), end: DEFAULT_BLOCK_END.to_string() }
    }
}

/// Complete set of rules for one compilation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub delimiters: Delimiters,
    pub template_suffix: String,
    /// Applied in the listed order.
    pub replacements: Vec<Replacement>,
    pub directory_renames: Vec<DirectoryRename>,
    pub excluded_root_paths: Vec<String>,
    pub excluded_dir_names: Vec<String>,
    pub binary_extensions: Vec<String>,
    pub marker_block: MarkerBlock,
    /// Relative path -> content. `None` means the built-in trailer files.
    pub auxiliary_files: Option<IndexMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiters: Delimiters::default(),
            template_suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
            replacements: DEFAULT_REPLACEMENTS
                .iter()
                .map(|(literal, variable)| Replacement {
                    literal: literal.to_string(),
                    variable: variable.to_string(),
                })
                .collect(),
            directory_renames: DEFAULT_DIRECTORY_RENAMES
                .iter()
                .map(|(parent, name, variable)| DirectoryRename {
                    parent: parent.to_string(),
                    name: name.to_string(),
                    variable: variable.to_string(),
                })
                .collect(),
            excluded_root_paths: DEFAULT_EXCLUDED_ROOT_PATHS.iter().map(|s| s.to_string()).collect(),
            excluded_dir_names: DEFAULT_EXCLUDED_DIR_NAMES.iter().map(|s| s.to_string()).collect(),
            binary_extensions: DEFAULT_BINARY_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            marker_block: MarkerBlock::default(),
            auxiliary_files: None,
        }
    }
}

impl Config {
    /// Files written at the destination root after the tree is compiled.
    pub fn auxiliary_files(&self) -> IndexMap<String, String> {
        match &self.auxiliary_files {
            Some(files) => files.clone(),
            None => default_auxiliary_files(&self.delimiters, &self.template_suffix),
        }
    }

    /// Checks the rules for mistakes that would produce a broken template.
    ///
    /// # Errors
    /// * `Error::ConfigError` if a literal, variable, suffix or sentinel is empty,
    ///   if the sentinels are identical, if an auxiliary path escapes the
    ///   destination, or if a replacement literal contains an earlier one.
    pub fn validate(&self) -> Result<()> {
        if self.template_suffix.is_empty() {
            return Err(Error::ConfigError("template_suffix must not be empty".to_string()));
        }
        if self.marker_block.start.is_empty() || self.marker_block.end.is_empty() {
            return Err(Error::ConfigError("marker block sentinels must not be empty".to_string()));
        }
        if self.marker_block.start == self.marker_block.end {
            return Err(Error::ConfigError(format!(
                "marker block start and end sentinels are both '{}'",
                self.marker_block.start
            )));
        }

        for (index, rule) in self.replacements.iter().enumerate() {
            if rule.literal.is_empty() || rule.variable.is_empty() {
                return Err(Error::ConfigError(format!(
                    "replacement #{} has an empty literal or variable",
                    index + 1
                )));
            }
            // An earlier literal found inside this one would be rewritten first.
            if let Some(earlier) =
                self.replacements[..index].iter().find(|e| rule.literal.contains(&e.literal))
            {
                return Err(Error::ConfigError(format!(
                    "replacement '{}' is listed before '{}' which contains it; list longer literals first",
                    earlier.literal, rule.literal
                )));
            }
        }

        for rename in &self.directory_renames {
            if rename.parent.is_empty() || rename.name.is_empty() || rename.variable.is_empty() {
                return Err(Error::ConfigError(
                    "directory rename has an empty parent, name or variable".to_string(),
                ));
            }
        }

        if let Some(files) = &self.auxiliary_files {
            for path in files.keys() {
                let mut components = Path::new(path).components().peekable();
                if components.peek().is_none()
                    || !components.all(|c| matches!(c, Component::Normal(_)))
                {
                    return Err(Error::ConfigError(format!(
                        "auxiliary file '{path}' must be a relative path inside the template"
                    )));
                }
            }
        }

        Ok(())
    }
}

fn default_auxiliary_files(delimiters: &Delimiters, suffix: &str) -> IndexMap<String, String> {
    let mut files = IndexMap::new();

    // Copier answers file, needed for `copier update`
    files.insert(
        format!("{}{suffix}", delimiters.marker("_copier_conf.answers_file")),
        format!(
            "# This file was generated by Copier. Do not edit manually.\n{}\n",
            delimiters.marker("_copier_conf | to_yaml")
        ),
    );

    files.insert(
        format!("README.md{suffix}"),
        format!(
            "# {}\n\
             \n\
             {}\n\
             \n\
             ## Development\n\
             \n\
             ```bash\n\
             pnpm install\n\
             pnpm build\n\
             pnpm test\n\
             ```\n\
             \n\
             ## License\n\
             \n\
             MIT\n",
            delimiters.marker("repo_name"),
            delimiters.marker("package_description")
        ),
    );

    files.insert(
        "LICENSE".to_string(),
        "TODO: Add your license here.\n\
         \n\
         Choose a license at https://choosealicense.com/\n\
         Common choices: MIT, Apache-2.0, ISC\n"
            .to_string(),
    );

    files
}

/// Reads the first configuration file found in `config_dir`.
///
/// # Returns
/// * `Result<Option<String>>` - Contents of the file, or `None` if none of
///   `config_files` exists
pub fn load_config<P: AsRef<Path>>(config_dir: P, config_files: &[&str]) -> Result<Option<String>> {
    for file in config_files {
        let config_path = config_dir.as_ref().join(file);
        if config_path.is_file() {
            debug!("Loading configuration from {}", config_path.display());
            return Ok(Some(std::fs::read_to_string(&config_path)?));
        }
    }

    debug!("No configuration file found (tried: {}), using defaults", config_files.join(", "));
    Ok(None)
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML
///   for the configuration schema
pub fn parse_config(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

/// Loads and validates the configuration belonging to the project at `root`.
pub fn get_config<P: AsRef<Path>>(root: P) -> Result<Config> {
    let config = match load_config(root.as_ref().join(ADMIN_DIR), &CONFIG_FILES)? {
        Some(content) => parse_config(&content)?,
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}
