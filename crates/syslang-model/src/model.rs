//! Data types for SysLang system descriptions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A complete SysLang model: one described system plus the principles
/// claimed to govern it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemModel {
    /// The `system` section (required in every model file).
    pub system: SystemInfo,
    /// Systemic principles the model claims apply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub principles: Vec<PrincipleUse>,
    /// Named parts of the system.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    /// Directed relations between components.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,
    /// Falsification tests attached to declared principles.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TestCase>,
}

impl SystemModel {
    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Look up a declared principle by name.
    pub fn principle(&self, name: &str) -> Option<&PrincipleUse> {
        self.principles.iter().find(|p| p.name == name)
    }

    /// Tests attached to a given principle.
    pub fn tests_for<'a>(&'a self, principle: &'a str) -> impl Iterator<Item = &'a TestCase> {
        self.tests.iter().filter(move |t| t.principle == principle)
    }
}

/// Identity of the described system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_unspecified")]
    pub domain: String,
    #[serde(default = "default_unspecified")]
    pub scale: String,
    #[serde(default)]
    pub description: String,
}

fn default_name() -> String {
    "Unnamed System".to_string()
}

fn default_unspecified() -> String {
    "unspecified".to_string()
}

/// A principle declared by a model, with its instantiating parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipleUse {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, ParamValue>,
    /// How confident the author is that the principle applies, in [0, 1].
    #[serde(default = "full_confidence", skip_serializing_if = "is_full_confidence")]
    pub confidence: f64,
}

fn full_confidence() -> f64 {
    1.0
}

fn is_full_confidence(confidence: &f64) -> bool {
    *confidence == 1.0
}

/// A named part of the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, ParamValue>,
}

/// A directed relation between two components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A falsification test: the observation in `refuted_if` is what would
/// disprove the prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub principle: String,
    pub prediction: String,
    pub refuted_if: String,
}

/// A scalar parameter value as written in the model file.
///
/// Variant order matters: untagged deserialization tries bool before
/// int before float, so `true`, `3`, and `3.0` keep their YAML types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl ParamValue {
    /// Numeric view of the value, when it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(n) => Some(*n as f64),
            ParamValue::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::String(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_value_keeps_yaml_types() {
        let v: Vec<ParamValue> = serde_yaml::from_str("[true, 3, 3.5, loose]").unwrap();
        assert_eq!(
            v,
            vec![
                ParamValue::Bool(true),
                ParamValue::Int(3),
                ParamValue::Float(3.5),
                ParamValue::String("loose".to_string()),
            ]
        );
    }

    #[test]
    fn param_value_display() {
        assert_eq!(ParamValue::Int(42).to_string(), "42");
        assert_eq!(ParamValue::String("tight".into()).to_string(), "tight");
        assert_eq!(ParamValue::Float(0.8).to_string(), "0.8");
    }

    #[test]
    fn tests_for_filters_by_principle() {
        let model = SystemModel {
            system: SystemInfo {
                name: "T".into(),
                domain: "d".into(),
                scale: "s".into(),
                description: String::new(),
            },
            principles: vec![],
            components: vec![],
            relations: vec![],
            tests: vec![
                TestCase {
                    name: "a".into(),
                    principle: "feedback_loop".into(),
                    prediction: "p".into(),
                    refuted_if: "r".into(),
                },
                TestCase {
                    name: "b".into(),
                    principle: "redundancy".into(),
                    prediction: "p".into(),
                    refuted_if: "r".into(),
                },
            ],
        };
        assert_eq!(model.tests_for("feedback_loop").count(), 1);
        assert_eq!(model.tests_for("emergence").count(), 0);
    }
}
