//! Combined shader resources.
//!
//! A shader resource is one text file holding both stages. Directive lines
//! select the stage the following lines belong to:
//!
//! ```text
//! #shader vertex
//! ...vertex stage source...
//! #shader fragment
//! ...fragment stage source...
//! ```
//!
//! Directive detection is a plain substring scan, not a grammar: any line
//! containing `#shader` is a directive, and it selects `vertex` if that
//! substring occurs anywhere on the line, otherwise `fragment` if that
//! occurs. A directive naming neither keeps the current stage. Source text
//! that itself contains `#shader` is therefore read as a directive.

use std::fmt;
use std::path::Path;

use crate::driver::ShaderStage;
use crate::errors::{Error, Result};

/// Token that marks a directive line.
pub const DIRECTIVE: &str = "#shader";

/// Vertex and fragment source text split out of one resource.
///
/// Both blobs are always present; a stage whose directive never appears is
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    /// Splits resource text into its stages.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// Splits a sequence of lines into their stages.
    ///
    /// Every non-directive line is appended with a `\n` terminator to the
    /// stage selected by the most recent directive. Lines before the first
    /// recognized directive are dropped.
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut source = Self::default();
        let mut current: Option<ShaderStage> = None;

        for line in lines {
            if line.contains(DIRECTIVE) {
                if let Some(stage) = directive_stage(line) {
                    current = Some(stage);
                }
            } else if let Some(stage) = current {
                let blob = source.blob_mut(stage);
                blob.push_str(line);
                blob.push('\n');
            }
        }

        source
    }

    /// Reads and splits the resource at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let source = Self::parse(&text);
        log::debug!(
            "Loaded shader resource {} (vertex: {} bytes, fragment: {} bytes)",
            path.display(),
            source.vertex.len(),
            source.fragment.len()
        );
        Ok(source)
    }

    /// Returns the source text of `stage`.
    #[must_use]
    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }

    fn blob_mut(&mut self, stage: ShaderStage) -> &mut String {
        match stage {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
        }
    }
}

/// Renders the normalized resource: one directive per stage followed by its
/// source.
impl fmt::Display for ShaderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            writeln!(f, "{DIRECTIVE} {stage}")?;
            f.write_str(self.stage(stage))?;
        }
        Ok(())
    }
}

fn directive_stage(line: &str) -> Option<ShaderStage> {
    if line.contains(ShaderStage::Vertex.name()) {
        Some(ShaderStage::Vertex)
    } else if line.contains(ShaderStage::Fragment.name()) {
        Some(ShaderStage::Fragment)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_prefers_vertex() {
        assert_eq!(directive_stage("#shader vertex"), Some(ShaderStage::Vertex));
        assert_eq!(directive_stage("#shader fragment"), Some(ShaderStage::Fragment));
        assert_eq!(
            directive_stage("#shader fragment-after-vertex"),
            Some(ShaderStage::Vertex)
        );
        assert_eq!(directive_stage("#shader geometry"), None);
    }

    #[test]
    fn unknown_directive_keeps_current_stage() {
        let source = ShaderSource::parse("#shader vertex\na\n#shader geometry\nb\n");
        assert_eq!(source.vertex, "a\nb\n");
        assert!(source.fragment.is_empty());
    }

    #[test]
    fn sections_may_repeat() {
        let source =
            ShaderSource::parse("#shader vertex\na\n#shader fragment\nb\n#shader vertex\nc\n");
        assert_eq!(source.vertex, "a\nc\n");
        assert_eq!(source.fragment, "b\n");
    }
}
