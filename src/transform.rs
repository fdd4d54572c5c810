//! Text transformations applied to every text file of the working project:
//! removal of marker blocks followed by ordered literal replacement.

use crate::config::{Config, Delimiters, MarkerBlock, Replacement};
use crate::error::MarkerBlockError;

/// Removes every marker block from `content`.
///
/// A block runs from the start of the line holding the start sentinel through
/// the first later line holding the end sentinel, including its line break.
/// Blocks do not nest.
///
/// # Errors
/// * `MarkerBlockError::NestedStart` if a start sentinel appears inside an open block
/// * `MarkerBlockError::UnmatchedEnd` if an end sentinel appears outside a block
/// * `MarkerBlockError::UnterminatedBlock` if the content ends inside a block
pub fn strip_marker_blocks(
    content: &str,
    block: &MarkerBlock,
) -> Result<String, MarkerBlockError> {
    let mut output = String::with_capacity(content.len());
    let mut open_line: Option<usize> = None;

    for (index, line) in content.split_inclusive('\n').enumerate() {
        let number = index + 1;
        match open_line {
            None if line.contains(&block.start) => open_line = Some(number),
            None if line.contains(&block.end) => {
                return Err(MarkerBlockError::UnmatchedEnd { line: number })
            }
            None => output.push_str(line),
            Some(_) if line.contains(&block.end) => open_line = None,
            Some(open) if line.contains(&block.start) => {
                return Err(MarkerBlockError::NestedStart { line: number, open_line: open })
            }
            Some(_) => {}
        }
    }

    match open_line {
        Some(line) => Err(MarkerBlockError::UnterminatedBlock { line }),
        None => Ok(output),
    }
}

/// Ordered literal -> marker substitutions.
#[derive(Debug, Clone)]
pub struct Replacer {
    rules: Vec<(String, String)>,
}

impl Replacer {
    pub fn new(replacements: &[Replacement], delimiters: &Delimiters) -> Self {
        let rules = replacements
            .iter()
            .map(|r| (r.literal.clone(), delimiters.marker(&r.variable)))
            .collect();
        Self { rules }
    }

    /// Replaces every occurrence of each literal, one rule after another.
    pub fn apply(&self, content: &str) -> String {
        self.rules
            .iter()
            .fold(content.to_string(), |acc, (literal, marker)| acc.replace(literal, marker))
    }
}

/// Result of transforming one file.
#[derive(Debug, PartialEq, Eq)]
pub struct Transformed {
    pub content: String,
    /// True if stripping or replacement changed anything.
    pub modified: bool,
}

/// Strips marker blocks, then runs the replacements.
#[derive(Debug, Clone)]
pub struct Transformer {
    block: MarkerBlock,
    replacer: Replacer,
}

impl Transformer {
    pub fn new(config: &Config) -> Self {
        Self {
            block: config.marker_block.clone(),
            replacer: Replacer::new(&config.replacements, &config.delimiters),
        }
    }

    pub fn transform(&self, content: &str) -> Result<Transformed, MarkerBlockError> {
        let stripped = strip_marker_blocks(content, &self.block)?;
        let replaced = self.replacer.apply(&stripped);
        let modified = replaced != content;
        Ok(Transformed { content: replaced, modified })
    }
}
