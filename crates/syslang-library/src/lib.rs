//! Built-in knowledge base for SysLang: principle definitions,
//! distribution patterns, and compatibility rules.
//!
//! The data ships as three embedded JSON documents, parsed once per
//! process. `validate` checks their cross-references, which is how the
//! test suite keeps the embedded data honest.

pub mod compat;
pub mod patterns;
pub mod principles;

pub use compat::{CompatibilityRules, Interaction};
pub use patterns::{PatternDef, PatternsDoc};
pub use principles::{placeholders, ParamDef, PrincipleDef, PrinciplesDoc};

use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

const PRINCIPLES_JSON: &str = include_str!("data/principles.json");
const PATTERNS_JSON: &str = include_str!("data/patterns.json");
const COMPATIBILITY_JSON: &str = include_str!("data/compatibility.json");

/// A consistency error in library data.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("invalid {document} data: {message}")]
    Parse {
        document: &'static str,
        message: String,
    },

    #[error("principle `{principle}` has unknown category `{category}`")]
    UnknownCategory { principle: String, category: String },

    #[error("pattern `{pattern}` names unknown parent principle `{parent}`")]
    UnknownParent { pattern: String, parent: String },

    #[error("compatibility rule references unknown principle `{name}`")]
    UnknownCompatibilityPrinciple { name: String },

    #[error("compatibility rule pairs `{name}` with itself")]
    SelfCompatibility { name: String },

    #[error("{owner}: parameter `{parameter}` has an empty value list")]
    EmptyValueList { owner: String, parameter: String },

    #[error("{owner}: parameter `{parameter}` lists `{value}` twice")]
    DuplicateValue {
        owner: String,
        parameter: String,
        value: String,
    },

    #[error("{owner}: parameter `{parameter}` has both a value list and a range")]
    ConflictingConstraints { owner: String, parameter: String },

    #[error("{owner}: parameter `{parameter}` range is not ordered")]
    UnorderedRange { owner: String, parameter: String },

    #[error("principle `{principle}` template references undeclared parameter `{placeholder}`")]
    UnknownPlaceholder {
        principle: String,
        placeholder: String,
    },

    #[error("principle `{principle}` template uses {{threshold}} without a default_threshold")]
    ThresholdWithoutDefault { principle: String },
}

/// The assembled knowledge base.
#[derive(Debug, Clone)]
pub struct Library {
    principles: BTreeMap<String, PrincipleDef>,
    categories: BTreeMap<String, String>,
    patterns: BTreeMap<String, PatternDef>,
    compatibility: CompatibilityRules,
}

impl Library {
    /// The embedded library, parsed once per process.
    pub fn builtin() -> &'static Library {
        static BUILTIN: OnceLock<Library> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Library::from_json(PRINCIPLES_JSON, PATTERNS_JSON, COMPATIBILITY_JSON)
                .expect("embedded library data is well-formed (checked in tests)")
        })
    }

    /// Assemble and validate a library from its three JSON documents.
    pub fn from_json(
        principles: &str,
        patterns: &str,
        compatibility: &str,
    ) -> Result<Library, LibraryError> {
        let principles: PrinciplesDoc =
            serde_json::from_str(principles).map_err(|e| LibraryError::Parse {
                document: "principles",
                message: e.to_string(),
            })?;
        let patterns: PatternsDoc =
            serde_json::from_str(patterns).map_err(|e| LibraryError::Parse {
                document: "patterns",
                message: e.to_string(),
            })?;
        let compatibility: CompatibilityRules =
            serde_json::from_str(compatibility).map_err(|e| LibraryError::Parse {
                document: "compatibility",
                message: e.to_string(),
            })?;

        let library = Library {
            principles: principles.principles,
            categories: principles.categories,
            patterns: patterns.distribution_patterns,
            compatibility,
        };
        library.validate()?;
        Ok(library)
    }

    /// Look up a principle definition.
    pub fn principle(&self, name: &str) -> Option<&PrincipleDef> {
        self.principles.get(name)
    }

    /// All principles, sorted by name.
    pub fn principles(&self) -> impl Iterator<Item = (&str, &PrincipleDef)> {
        self.principles.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Category key to description, sorted by key.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Names of the principles in a category, sorted.
    pub fn principles_in_category(&self, category: &str) -> Vec<&str> {
        self.principles
            .iter()
            .filter(|(_, def)| def.category == category)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Look up a distribution pattern.
    pub fn pattern(&self, name: &str) -> Option<&PatternDef> {
        self.patterns.get(name)
    }

    /// All patterns, sorted by name.
    pub fn patterns(&self) -> impl Iterator<Item = (&str, &PatternDef)> {
        self.patterns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn compatibility(&self) -> &CompatibilityRules {
        &self.compatibility
    }

    /// The known principle name closest to `name`, when close enough to
    /// be a plausible typo (edit distance at most 2).
    pub fn closest_principle(&self, name: &str) -> Option<&str> {
        self.principles
            .keys()
            .map(|known| (known.as_str(), edit_distance(name, known)))
            .filter(|&(_, d)| d <= 2)
            .min_by_key(|&(_, d)| d)
            .map(|(known, _)| known)
    }

    /// Check the library's internal cross-references.
    pub fn validate(&self) -> Result<(), LibraryError> {
        for (name, def) in &self.principles {
            if !self.categories.contains_key(&def.category) {
                return Err(LibraryError::UnknownCategory {
                    principle: name.clone(),
                    category: def.category.clone(),
                });
            }
            let owner = format!("principle `{name}`");
            validate_params(&owner, &def.parameters)?;

            if let Some(template) = &def.hypothesis_template {
                for placeholder in placeholders(template) {
                    if placeholder == "threshold" {
                        if def.default_threshold.is_none() {
                            return Err(LibraryError::ThresholdWithoutDefault {
                                principle: name.clone(),
                            });
                        }
                    } else if !def.parameters.contains_key(placeholder) {
                        return Err(LibraryError::UnknownPlaceholder {
                            principle: name.clone(),
                            placeholder: placeholder.to_string(),
                        });
                    }
                }
            }
        }

        for (name, def) in &self.patterns {
            if !self.principles.contains_key(&def.parent_principle) {
                return Err(LibraryError::UnknownParent {
                    pattern: name.clone(),
                    parent: def.parent_principle.clone(),
                });
            }
            let owner = format!("pattern `{name}`");
            validate_params(&owner, &def.specific_parameters)?;
        }

        for rule in self
            .compatibility
            .synergies
            .iter()
            .chain(self.compatibility.tensions.iter())
        {
            if rule.a == rule.b {
                return Err(LibraryError::SelfCompatibility {
                    name: rule.a.clone(),
                });
            }
            for endpoint in [&rule.a, &rule.b] {
                if !self.principles.contains_key(endpoint) {
                    return Err(LibraryError::UnknownCompatibilityPrinciple {
                        name: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

fn validate_params(
    owner: &str,
    params: &BTreeMap<String, ParamDef>,
) -> Result<(), LibraryError> {
    for (param, def) in params {
        if def.values.is_some() && def.range.is_some() {
            return Err(LibraryError::ConflictingConstraints {
                owner: owner.to_string(),
                parameter: param.clone(),
            });
        }
        if let Some(values) = &def.values {
            if values.is_empty() {
                return Err(LibraryError::EmptyValueList {
                    owner: owner.to_string(),
                    parameter: param.clone(),
                });
            }
            for (i, value) in values.iter().enumerate() {
                if values[..i].contains(value) {
                    return Err(LibraryError::DuplicateValue {
                        owner: owner.to_string(),
                        parameter: param.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
        if let Some([lo, hi]) = def.range {
            if lo > hi {
                return Err(LibraryError::UnorderedRange {
                    owner: owner.to_string(),
                    parameter: param.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Levenshtein distance, used only for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let sub = prev[j] + usize::from(ca != cb);
            cur[j + 1] = sub.min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_parses_and_validates() {
        let library = Library::builtin();
        assert!(library.principle("feedback_loop").is_some());
        assert!(library.principle("nonesuch").is_none());
        library.validate().unwrap();
    }

    #[test]
    fn builtin_covers_every_category() {
        let library = Library::builtin();
        for (category, _) in library.categories() {
            assert!(
                !library.principles_in_category(category).is_empty(),
                "category `{category}` has no principles"
            );
        }
    }

    #[test]
    fn builtin_patterns_have_known_parents() {
        let library = Library::builtin();
        for (name, def) in library.patterns() {
            assert!(
                library.principle(&def.parent_principle).is_some(),
                "pattern `{name}` orphaned"
            );
        }
    }

    #[test]
    fn closest_principle_catches_typos() {
        let library = Library::builtin();
        assert_eq!(library.closest_principle("feedback_lop"), Some("feedback_loop"));
        assert_eq!(library.closest_principle("emergense"), Some("emergence"));
        assert_eq!(library.closest_principle("totally_unrelated"), None);
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", "abc"), 0);
        assert_eq!(edit_distance("abc", "abd"), 1);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn validate_rejects_unknown_parent() {
        let err = Library::from_json(
            r#"{"categories": {"c": "d"}, "principles": {"p": {"description": "x", "category": "c"}}}"#,
            r#"{"distribution_patterns": {"q": {"description": "x", "parent_principle": "ghost"}}}"#,
            r#"{"synergies": [], "tensions": []}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LibraryError::UnknownParent { .. }));
    }

    #[test]
    fn validate_rejects_template_with_undeclared_placeholder() {
        let err = Library::from_json(
            r#"{"categories": {"c": "d"}, "principles": {"p": {
                "description": "x", "category": "c",
                "hypothesis_template": "uses {ghost}"
            }}}"#,
            r#"{"distribution_patterns": {}}"#,
            r#"{"synergies": [], "tensions": []}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LibraryError::UnknownPlaceholder { .. }));
    }

    #[test]
    fn validate_rejects_threshold_without_default() {
        let err = Library::from_json(
            r#"{"categories": {"c": "d"}, "principles": {"p": {
                "description": "x", "category": "c",
                "hypothesis_template": "within {threshold}"
            }}}"#,
            r#"{"distribution_patterns": {}}"#,
            r#"{"synergies": [], "tensions": []}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LibraryError::ThresholdWithoutDefault { .. }));
    }

    #[test]
    fn validate_rejects_compat_rule_with_unknown_endpoint() {
        let err = Library::from_json(
            r#"{"categories": {"c": "d"}, "principles": {"p": {"description": "x", "category": "c"}}}"#,
            r#"{"distribution_patterns": {}}"#,
            r#"{"synergies": [{"a": "p", "b": "ghost", "note": "n"}], "tensions": []}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LibraryError::UnknownCompatibilityPrinciple { .. }
        ));
    }
}
