//! Shader text sources.
//! E3: shaders are loaded as UTF-8 text and compiled by the renderer; this
//! side only reads and sanity-checks the source.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// A shader source file, not yet compiled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSource {
    /// Label used for compile diagnostics (usually the file stem).
    pub label: String,
    pub text: String,
}

impl ShaderSource {
    /// Wrap an in-memory source. Rejects effectively-empty text.
    pub fn from_text(label: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let text = text.into();
        if text.trim().is_empty() {
            bail!("Shader '{label}' is empty");
        }
        Ok(Self { label, text })
    }

    /// Read a shader source from a file. The label is the file stem.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read shader {}", path.display()))?;
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());
        Self::from_text(label, text)
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nonempty_source() {
        let src = ShaderSource::from_text("post", "fn main() {}").expect("wrap source");
        assert_eq!(src.label, "post");
        assert_eq!(src.line_count(), 1);
    }

    #[test]
    fn rejects_blank_source() {
        assert!(ShaderSource::from_text("empty", "   \n\t").is_err());
    }
}
