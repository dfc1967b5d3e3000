//! Semantic checker implementation.

use crate::error::{CheckError, CheckResult};
use std::collections::HashSet;
use std::fmt;
use syslang_library::{Library, ParamDef};
use syslang_model::{ModelPath, ParamValue, SystemModel};
use tracing::debug;

/// Check a model against a library.
pub fn check_model(model: &SystemModel, library: &Library) -> CheckResult<CheckSummary> {
    let mut checker = ModelChecker::new(library);
    checker.check_model(model)
}

/// What a successful check covered, plus non-fatal findings.
#[derive(Debug)]
pub struct CheckSummary {
    pub principles: usize,
    pub components: usize,
    pub relations: usize,
    pub tests: usize,
    pub warnings: Vec<CheckWarning>,
}

/// A non-fatal finding: the model is usable but weaker than it could be.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckWarning {
    MissingDescription,
    UntestedPrinciple { principle: String },
    IsolatedComponent { component: String },
    LowConfidence { principle: String, confidence: f64 },
}

impl fmt::Display for CheckWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckWarning::MissingDescription => {
                write!(f, "system has no description")
            }
            CheckWarning::UntestedPrinciple { principle } => {
                write!(f, "principle '{}' has no falsification test", principle)
            }
            CheckWarning::IsolatedComponent { component } => {
                write!(f, "component '{}' participates in no relation", component)
            }
            CheckWarning::LowConfidence {
                principle,
                confidence,
            } => {
                write!(
                    f,
                    "principle '{}' declared with confidence {:.2}",
                    principle, confidence
                )
            }
        }
    }
}

/// Confidence below this draws a warning.
const LOW_CONFIDENCE: f64 = 0.3;

/// The semantic checker.
pub struct ModelChecker<'a> {
    library: &'a Library,
    warnings: Vec<CheckWarning>,
}

impl<'a> ModelChecker<'a> {
    pub fn new(library: &'a Library) -> Self {
        Self {
            library,
            warnings: Vec::new(),
        }
    }

    /// Check a complete model.
    pub fn check_model(&mut self, model: &SystemModel) -> CheckResult<CheckSummary> {
        // First pass: collect names and reject duplicates.
        debug!("collecting names");
        let components = self.collect_components(model)?;
        let principles = self.collect_principles(model)?;

        // Second pass: check each section against the collected names
        // and the library.
        debug!("checking sections");
        self.check_principles(model)?;
        self.check_relations(model, &components)?;
        self.check_tests(model, &principles)?;

        if model.system.description.is_empty() {
            self.warnings.push(CheckWarning::MissingDescription);
        }
        self.warn_untested_principles(model);
        self.warn_isolated_components(model);

        Ok(CheckSummary {
            principles: model.principles.len(),
            components: model.components.len(),
            relations: model.relations.len(),
            tests: model.tests.len(),
            warnings: std::mem::take(&mut self.warnings),
        })
    }

    fn collect_components(&self, model: &SystemModel) -> CheckResult<HashSet<String>> {
        let root = ModelPath::root().key("components");
        let mut seen = HashSet::new();
        for (i, component) in model.components.iter().enumerate() {
            if !seen.insert(component.name.clone()) {
                return Err(CheckError::DuplicateComponent {
                    name: component.name.clone(),
                    path: root.index(i).key("name"),
                });
            }
        }
        Ok(seen)
    }

    fn collect_principles(&self, model: &SystemModel) -> CheckResult<HashSet<String>> {
        let root = ModelPath::root().key("principles");
        let mut seen = HashSet::new();
        for (i, principle) in model.principles.iter().enumerate() {
            if !seen.insert(principle.name.clone()) {
                return Err(CheckError::DuplicatePrinciple {
                    name: principle.name.clone(),
                    path: root.index(i).key("name"),
                });
            }
        }
        Ok(seen)
    }

    fn check_principles(&mut self, model: &SystemModel) -> CheckResult<()> {
        let root = ModelPath::root().key("principles");
        for (i, used) in model.principles.iter().enumerate() {
            let path = root.index(i);

            let def = self.library.principle(&used.name).ok_or_else(|| {
                CheckError::UnknownPrinciple {
                    name: used.name.clone(),
                    suggestion: self
                        .library
                        .closest_principle(&used.name)
                        .map(str::to_string),
                    path: path.key("name"),
                }
            })?;

            for (param, value) in &used.parameters {
                let param_path = path.key("parameters").key(param);
                let decl = def.parameters.get(param).ok_or_else(|| {
                    CheckError::UnknownParameter {
                        principle: used.name.clone(),
                        parameter: param.clone(),
                        path: param_path.clone(),
                    }
                })?;
                check_param_value(&used.name, param, decl, value, &param_path)?;
            }

            if !(0.0..=1.0).contains(&used.confidence) {
                return Err(CheckError::ConfidenceOutOfRange {
                    principle: used.name.clone(),
                    confidence: used.confidence,
                    path: path.key("confidence"),
                });
            }
            if used.confidence < LOW_CONFIDENCE {
                self.warnings.push(CheckWarning::LowConfidence {
                    principle: used.name.clone(),
                    confidence: used.confidence,
                });
            }
        }
        Ok(())
    }

    fn check_relations(
        &self,
        model: &SystemModel,
        components: &HashSet<String>,
    ) -> CheckResult<()> {
        let root = ModelPath::root().key("relations");
        for (i, relation) in model.relations.iter().enumerate() {
            let path = root.index(i);
            for (end, field) in [(&relation.from, "from"), (&relation.to, "to")] {
                if !components.contains(end) {
                    return Err(CheckError::UnknownEndpoint {
                        name: end.clone(),
                        path: path.key(field),
                    });
                }
            }
            if relation.from == relation.to {
                return Err(CheckError::SelfRelation {
                    component: relation.from.clone(),
                    path,
                });
            }
        }
        Ok(())
    }

    fn check_tests(
        &self,
        model: &SystemModel,
        principles: &HashSet<String>,
    ) -> CheckResult<()> {
        let root = ModelPath::root().key("tests");
        let mut seen = HashSet::new();
        for (i, test) in model.tests.iter().enumerate() {
            let path = root.index(i);
            if !seen.insert(test.name.clone()) {
                return Err(CheckError::DuplicateTest {
                    name: test.name.clone(),
                    path: path.key("name"),
                });
            }
            if !principles.contains(&test.principle) {
                return Err(CheckError::TestWithoutPrinciple {
                    test: test.name.clone(),
                    principle: test.principle.clone(),
                    path: path.key("principle"),
                });
            }
            if test.refuted_if.trim().is_empty() {
                return Err(CheckError::EmptyRefutation {
                    test: test.name.clone(),
                    path: path.key("refuted_if"),
                });
            }
        }
        Ok(())
    }

    fn warn_untested_principles(&mut self, model: &SystemModel) {
        for principle in &model.principles {
            if model.tests_for(&principle.name).next().is_none() {
                self.warnings.push(CheckWarning::UntestedPrinciple {
                    principle: principle.name.clone(),
                });
            }
        }
    }

    fn warn_isolated_components(&mut self, model: &SystemModel) {
        if model.relations.is_empty() && model.components.len() <= 1 {
            return;
        }
        for component in &model.components {
            let touched = model
                .relations
                .iter()
                .any(|r| r.from == component.name || r.to == component.name);
            if !touched {
                self.warnings.push(CheckWarning::IsolatedComponent {
                    component: component.name.clone(),
                });
            }
        }
    }
}

fn check_param_value(
    principle: &str,
    parameter: &str,
    decl: &ParamDef,
    value: &ParamValue,
    path: &ModelPath,
) -> CheckResult<()> {
    if let Some(allowed) = &decl.values {
        let given = value.to_string();
        if !allowed.contains(&given) {
            return Err(CheckError::NotInValueList {
                principle: principle.to_string(),
                parameter: parameter.to_string(),
                value: given,
                allowed: allowed.clone(),
                path: path.clone(),
            });
        }
    }
    if let Some([lo, hi]) = decl.range {
        let given = value.as_f64().ok_or_else(|| CheckError::NotNumeric {
            principle: principle.to_string(),
            parameter: parameter.to_string(),
            path: path.clone(),
        })?;
        if !(lo..=hi).contains(&given) {
            return Err(CheckError::OutOfRange {
                principle: principle.to_string(),
                parameter: parameter.to_string(),
                value: given,
                lo,
                hi,
                path: path.clone(),
            });
        }
    }
    Ok(())
}
