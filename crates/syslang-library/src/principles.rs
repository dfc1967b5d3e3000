//! Principle definitions and their parameter declarations.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A principle as defined by the library.
#[derive(Debug, Clone, Deserialize)]
pub struct PrincipleDef {
    pub description: String,
    /// Category key; must name an entry in the library's category map.
    pub category: String,
    /// Principles about principles (emergence and friends).
    #[serde(default)]
    pub meta_principle: bool,
    /// Operators combine other principles rather than describe systems.
    #[serde(default)]
    pub operator: bool,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamDef>,
    /// Template for generated hypotheses; `{param}` placeholders are
    /// filled from the model, `{threshold}` from `default_threshold`.
    #[serde(default)]
    pub hypothesis_template: Option<String>,
    #[serde(default)]
    pub default_threshold: Option<f64>,
}

/// A parameter a principle accepts. `values` and `range` are mutually
/// exclusive; a parameter with neither is free-form.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamDef {
    pub description: String,
    #[serde(default)]
    pub values: Option<Vec<String>>,
    #[serde(default)]
    pub range: Option<[f64; 2]>,
}

/// The `principles.json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct PrinciplesDoc {
    pub categories: BTreeMap<String, String>,
    pub principles: BTreeMap<String, PrincipleDef>,
}

/// Extract `{placeholder}` names from a hypothesis template, in order
/// of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        rest = &rest[start + 1..];
        match rest.find('}') {
            Some(end) => {
                out.push(&rest[..end]);
                rest = &rest[end + 1..];
            }
            None => break,
        }
    }
    out
}
