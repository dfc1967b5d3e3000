//! Semantic checking error types.

use syslang_model::ModelPath;
use thiserror::Error;

/// A semantic error in a model, fatal to checking.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("unknown principle: {name}")]
    UnknownPrinciple {
        name: String,
        /// Closest library name, when the given one looks like a typo.
        suggestion: Option<String>,
        path: ModelPath,
    },

    #[error("duplicate principle: {name}")]
    DuplicatePrinciple { name: String, path: ModelPath },

    #[error("duplicate component: {name}")]
    DuplicateComponent { name: String, path: ModelPath },

    #[error("duplicate test: {name}")]
    DuplicateTest { name: String, path: ModelPath },

    #[error("principle {principle} has no parameter {parameter}")]
    UnknownParameter {
        principle: String,
        parameter: String,
        path: ModelPath,
    },

    #[error("invalid value {value} for {principle}.{parameter}: expected one of {}", .allowed.join(", "))]
    NotInValueList {
        principle: String,
        parameter: String,
        value: String,
        allowed: Vec<String>,
        path: ModelPath,
    },

    #[error("value {value} for {principle}.{parameter} is outside [{lo}, {hi}]")]
    OutOfRange {
        principle: String,
        parameter: String,
        value: f64,
        lo: f64,
        hi: f64,
        path: ModelPath,
    },

    #[error("{principle}.{parameter} must be numeric")]
    NotNumeric {
        principle: String,
        parameter: String,
        path: ModelPath,
    },

    #[error("confidence {confidence} for principle {principle} is outside [0, 1]")]
    ConfidenceOutOfRange {
        principle: String,
        confidence: f64,
        path: ModelPath,
    },

    #[error("relation endpoint names no component: {name}")]
    UnknownEndpoint { name: String, path: ModelPath },

    #[error("relation connects {component} to itself")]
    SelfRelation { component: String, path: ModelPath },

    #[error("test {test} references principle {principle}, which the model does not declare")]
    TestWithoutPrinciple {
        test: String,
        principle: String,
        path: ModelPath,
    },

    #[error("test {test} has an empty refuted_if: an irrefutable test is no test")]
    EmptyRefutation { test: String, path: ModelPath },
}

impl CheckError {
    /// Path to the offending node in the model document.
    pub fn path(&self) -> &ModelPath {
        match self {
            CheckError::UnknownPrinciple { path, .. }
            | CheckError::DuplicatePrinciple { path, .. }
            | CheckError::DuplicateComponent { path, .. }
            | CheckError::DuplicateTest { path, .. }
            | CheckError::UnknownParameter { path, .. }
            | CheckError::NotInValueList { path, .. }
            | CheckError::OutOfRange { path, .. }
            | CheckError::NotNumeric { path, .. }
            | CheckError::ConfidenceOutOfRange { path, .. }
            | CheckError::UnknownEndpoint { path, .. }
            | CheckError::SelfRelation { path, .. }
            | CheckError::TestWithoutPrinciple { path, .. }
            | CheckError::EmptyRefutation { path, .. } => path,
        }
    }
}

/// Result type for checking operations.
pub type CheckResult<T> = Result<T, CheckError>;
