//! Dotted paths into a model document, carried by semantic diagnostics.

use std::fmt;

/// A path like `principles[2].parameters.exponent`.
///
/// Model files go through serde, so semantic errors cannot point at byte
/// spans; a path pins the offending node instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPath(String);

impl ModelPath {
    /// The document root (renders as `$`).
    pub fn root() -> Self {
        ModelPath(String::new())
    }

    /// Extend the path with a mapping key.
    pub fn key(&self, name: &str) -> Self {
        if self.0.is_empty() {
            ModelPath(name.to_string())
        } else {
            ModelPath(format!("{}.{}", self.0, name))
        }
    }

    /// Extend the path with a sequence index.
    pub fn index(&self, i: usize) -> Self {
        ModelPath(format!("{}[{}]", self.0, i))
    }

    pub fn as_str(&self) -> &str {
        if self.0.is_empty() {
            "$"
        } else {
            &self.0
        }
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
