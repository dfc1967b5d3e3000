//! Distribution pattern definitions.

use crate::principles::ParamDef;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A distribution pattern: a named specialization of a parent principle
/// with its own parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDef {
    pub description: String,
    /// Library principle this pattern specializes.
    pub parent_principle: String,
    #[serde(default)]
    pub specific_parameters: BTreeMap<String, ParamDef>,
}

/// The `patterns.json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternsDoc {
    pub distribution_patterns: BTreeMap<String, PatternDef>,
}
