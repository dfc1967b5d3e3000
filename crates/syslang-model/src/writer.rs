//! Serializing models back to YAML.

use crate::model::SystemModel;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// An error while writing a model file.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to serialize model: {message}")]
    Serialize { message: String },
}

/// Render a model as YAML.
///
/// Empty sections and a confidence of exactly 1.0 are omitted, so a
/// freshly loaded file writes back without editor noise.
pub fn write_model(model: &SystemModel) -> Result<String, WriteError> {
    serde_yaml::to_string(model).map_err(|e| WriteError::Serialize {
        message: e.to_string(),
    })
}

/// Write a model to a file.
pub fn save_model(model: &SystemModel, path: &Path) -> Result<(), WriteError> {
    let rendered = write_model(model)?;
    fs::write(path, rendered).map_err(|e| WriteError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_model;

    #[test]
    fn full_confidence_and_empty_sections_are_omitted() {
        let model = parse_model(
            "system: {name: T, domain: d, scale: s}\nprinciples: [{name: emergence}]",
        )
        .unwrap();
        let rendered = write_model(&model).unwrap();
        assert!(!rendered.contains("confidence"));
        assert!(!rendered.contains("components"));
        assert!(!rendered.contains("relations"));
        assert!(!rendered.contains("tests"));
    }

    #[test]
    fn reduced_confidence_is_kept() {
        let model = parse_model(
            "system: {name: T}\nprinciples: [{name: emergence, confidence: 0.4}]",
        )
        .unwrap();
        let rendered = write_model(&model).unwrap();
        assert!(rendered.contains("confidence: 0.4"));
    }

    #[test]
    fn written_model_loads_back() {
        let model = parse_model(
            r#"
system: {name: T, domain: d, scale: s, description: desc}
principles:
  - name: redundancy
    parameters: {degree: 2}
    confidence: 0.7
components:
  - {name: a, kind: service}
  - {name: b}
relations:
  - {from: a, to: b, kind: depends_on}
"#,
        )
        .unwrap();
        let reloaded = parse_model(&write_model(&model).unwrap()).unwrap();
        assert_eq!(model, reloaded);
    }
}
