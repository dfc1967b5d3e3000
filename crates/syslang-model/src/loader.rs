//! Loading and parsing of `.syslang.yml` model files.

use crate::model::SystemModel;
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Canonical file extension for SysLang models. A convention, not a
/// gate: the loader accepts any path and leaves warnings to callers.
pub const FILE_EXTENSION: &str = ".syslang.yml";

/// Position of a syntax error in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorLocation {
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
    /// Byte offset into the source.
    pub offset: usize,
}

/// An error while loading a model file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("YAML syntax error: {message}")]
    Syntax {
        message: String,
        location: Option<ErrorLocation>,
    },

    #[error("invalid model: expected a YAML mapping at the document root")]
    NotAMapping,

    #[error("invalid model: missing `system` section")]
    MissingSystem,

    #[error("invalid model: `principles[{index}]` has no `name`")]
    UnnamedPrinciple { index: usize },

    #[error("invalid model: {message}")]
    Shape { message: String },
}

impl LoadError {
    /// Source position of the error, when the parser reports one.
    pub fn location(&self) -> Option<ErrorLocation> {
        match self {
            LoadError::Syntax { location, .. } => *location,
            _ => None,
        }
    }
}

/// Whether a path follows the `.syslang.yml` naming convention.
pub fn has_canonical_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(FILE_EXTENSION))
}

/// Load and parse a model file.
pub fn load_model(path: &Path) -> Result<SystemModel, LoadError> {
    let source = fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_model(&source)
}

/// Parse a model from YAML source.
pub fn parse_model(source: &str) -> Result<SystemModel, LoadError> {
    let doc: Value = serde_yaml::from_str(source).map_err(syntax_error)?;

    if !doc.is_mapping() {
        return Err(LoadError::NotAMapping);
    }

    // The `system` section is required and must be non-empty.
    let system_present = match doc.get("system") {
        None => false,
        Some(Value::Null) => false,
        Some(Value::Mapping(m)) => !m.is_empty(),
        // A non-mapping `system:` surfaces as a shape error below.
        Some(_) => true,
    };
    if !system_present {
        return Err(LoadError::MissingSystem);
    }

    // Reject unnamed principle entries up front; every later stage
    // identifies principles by name.
    if let Some(principles) = doc.get("principles").and_then(Value::as_sequence) {
        for (index, entry) in principles.iter().enumerate() {
            if let Value::Mapping(m) = entry {
                if m.get("name").is_none() {
                    return Err(LoadError::UnnamedPrinciple { index });
                }
            }
        }
    }

    serde_yaml::from_value(doc).map_err(|e| LoadError::Shape {
        message: e.to_string(),
    })
}

fn syntax_error(e: serde_yaml::Error) -> LoadError {
    let location = e.location().map(|loc| ErrorLocation {
        line: loc.line(),
        column: loc.column(),
        offset: loc.index(),
    });
    LoadError::Syntax {
        message: e.to_string(),
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParamValue;

    #[test]
    fn minimal_model_parses_with_defaults() {
        let model = parse_model("system: {name: Reef}").unwrap();
        assert_eq!(model.system.name, "Reef");
        assert_eq!(model.system.domain, "unspecified");
        assert_eq!(model.system.scale, "unspecified");
        assert_eq!(model.system.description, "");
        assert!(model.principles.is_empty());
    }

    #[test]
    fn full_model_parses() {
        let source = r#"
system:
  name: Coral Reef
  domain: ecology
  scale: mesoscale
  description: A fringing reef community.
principles:
  - name: feedback_loop
    parameters:
      polarity: negative
    confidence: 0.8
components:
  - name: coral
    kind: population
  - name: algae
relations:
  - from: algae
    to: coral
    kind: competes_with
tests:
  - name: bleaching_recovery
    principle: feedback_loop
    prediction: cover returns to baseline within two seasons
    refuted_if: cover stays depressed for three seasons
"#;
        let model = parse_model(source).unwrap();
        assert_eq!(model.principles.len(), 1);
        assert_eq!(model.principles[0].confidence, 0.8);
        assert_eq!(
            model.principles[0].parameters.get("polarity"),
            Some(&ParamValue::String("negative".to_string()))
        );
        assert_eq!(model.components.len(), 2);
        assert_eq!(model.relations[0].kind, "competes_with");
        assert_eq!(model.tests[0].principle, "feedback_loop");
    }

    #[test]
    fn missing_system_section() {
        for source in ["principles: []", "system:", "system: {}"] {
            let err = parse_model(source).unwrap_err();
            assert!(matches!(err, LoadError::MissingSystem), "source: {source}");
        }
    }

    #[test]
    fn non_mapping_document() {
        for source in ["- a\n- b", "just a string", ""] {
            let err = parse_model(source).unwrap_err();
            assert!(matches!(err, LoadError::NotAMapping), "source: {source}");
        }
    }

    #[test]
    fn unnamed_principle_is_rejected() {
        let source = r#"
system: {name: T}
principles:
  - name: feedback_loop
  - parameters: {polarity: negative}
"#;
        let err = parse_model(source).unwrap_err();
        assert!(matches!(err, LoadError::UnnamedPrinciple { index: 1 }));
    }

    #[test]
    fn syntax_error_carries_location() {
        let err = parse_model("system: {name: [unclosed").unwrap_err();
        match err {
            LoadError::Syntax { location, .. } => {
                assert!(location.is_some());
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn confidence_defaults_to_one() {
        let model = parse_model("system: {name: T}\nprinciples: [{name: emergence}]").unwrap();
        assert_eq!(model.principles[0].confidence, 1.0);
    }

    #[test]
    fn extension_convention() {
        assert!(has_canonical_extension(Path::new("reef.syslang.yml")));
        assert!(has_canonical_extension(Path::new("dir/reef.syslang.yml")));
        assert!(!has_canonical_extension(Path::new("reef.yml")));
        assert!(!has_canonical_extension(Path::new("reef.syslang.yaml")));
    }
}
