//! Structural profile of a model.

use serde::Serialize;
use std::collections::BTreeMap;
use syslang_library::Library;
use syslang_model::SystemModel;

/// Summary numbers computed before deeper analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub components: usize,
    pub relations: usize,
    pub principles: usize,
    pub tests: usize,
    /// Declared principles per library category. Principles the library
    /// does not know are not counted.
    pub principles_by_category: BTreeMap<String, usize>,
    /// Mean declared confidence (1.0 when no principles are declared).
    pub mean_confidence: f64,
    /// Fraction of declared principles with at least one test
    /// (vacuously 1.0 when no principles are declared).
    pub test_coverage: f64,
}

impl Profile {
    pub fn of(model: &SystemModel, library: &Library) -> Profile {
        let mut principles_by_category = BTreeMap::new();
        for used in &model.principles {
            if let Some(def) = library.principle(&used.name) {
                *principles_by_category
                    .entry(def.category.clone())
                    .or_insert(0) += 1;
            }
        }

        let mean_confidence = if model.principles.is_empty() {
            1.0
        } else {
            model.principles.iter().map(|p| p.confidence).sum::<f64>()
                / model.principles.len() as f64
        };

        let test_coverage = if model.principles.is_empty() {
            1.0
        } else {
            let tested = model
                .principles
                .iter()
                .filter(|p| model.tests_for(&p.name).next().is_some())
                .count();
            tested as f64 / model.principles.len() as f64
        };

        Profile {
            components: model.components.len(),
            relations: model.relations.len(),
            principles: model.principles.len(),
            tests: model.tests.len(),
            principles_by_category,
            mean_confidence,
            test_coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syslang_model::parse_model;

    #[test]
    fn profile_counts_and_coverage() {
        let model = parse_model(
            r#"
system: {name: T}
principles:
  - {name: feedback_loop, confidence: 0.6}
  - {name: emergence}
components: [{name: a}, {name: b}]
relations: [{from: a, to: b, kind: k}]
tests:
  - {name: t, principle: feedback_loop, prediction: p, refuted_if: r}
"#,
        )
        .unwrap();
        let profile = Profile::of(&model, syslang_library::Library::builtin());
        assert_eq!(profile.components, 2);
        assert_eq!(profile.principles, 2);
        assert_eq!(profile.test_coverage, 0.5);
        assert!((profile.mean_confidence - 0.8).abs() < 1e-9);
        assert_eq!(profile.principles_by_category.get("regulatory"), Some(&1));
        assert_eq!(profile.principles_by_category.get("dynamic"), Some(&1));
    }

    #[test]
    fn empty_model_is_vacuously_covered() {
        let model = parse_model("system: {name: T}").unwrap();
        let profile = Profile::of(&model, syslang_library::Library::builtin());
        assert_eq!(profile.test_coverage, 1.0);
        assert_eq!(profile.mean_confidence, 1.0);
    }
}
