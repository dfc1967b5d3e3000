//! Pairwise principle interaction analysis.

use serde::Serialize;
use syslang_library::Library;
use syslang_model::SystemModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Synergy,
    Tension,
}

/// A compatibility-rule hit between two declared principles.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionFinding {
    pub kind: InteractionKind,
    pub a: String,
    pub b: String,
    pub note: String,
}

/// Look up every unordered pair of declared principles in the
/// compatibility rules. Declaration order of the model is preserved.
pub fn find_interactions(model: &SystemModel, library: &Library) -> Vec<InteractionFinding> {
    let rules = library.compatibility();
    let names: Vec<&str> = model.principles.iter().map(|p| p.name.as_str()).collect();
    let mut findings = Vec::new();

    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            if let Some(rule) = rules.synergy_between(a, b) {
                findings.push(InteractionFinding {
                    kind: InteractionKind::Synergy,
                    a: (*a).to_string(),
                    b: (*b).to_string(),
                    note: rule.note.clone(),
                });
            }
            if let Some(rule) = rules.tension_between(a, b) {
                findings.push(InteractionFinding {
                    kind: InteractionKind::Tension,
                    a: (*a).to_string(),
                    b: (*b).to_string(),
                    note: rule.note.clone(),
                });
            }
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use syslang_model::parse_model;

    fn interactions(source: &str) -> Vec<InteractionFinding> {
        let model = parse_model(source).expect("parse error");
        find_interactions(&model, Library::builtin())
    }

    #[test]
    fn synergy_found_regardless_of_declaration_order() {
        for source in [
            "system: {name: T}\nprinciples: [{name: feedback_loop}, {name: homeostasis}]",
            "system: {name: T}\nprinciples: [{name: homeostasis}, {name: feedback_loop}]",
        ] {
            let found = interactions(source);
            assert_eq!(found.len(), 1, "source: {source}");
            assert_eq!(found[0].kind, InteractionKind::Synergy);
        }
    }

    #[test]
    fn tension_found() {
        let found = interactions(
            "system: {name: T}\nprinciples: [{name: modularity}, {name: emergence}]",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, InteractionKind::Tension);
    }

    #[test]
    fn unrelated_pair_yields_nothing() {
        let found = interactions(
            "system: {name: T}\nprinciples: [{name: boundary}, {name: path_dependence}]",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn three_principles_check_all_pairs() {
        let found = interactions(
            r#"
system: {name: T}
principles:
  - {name: feedback_loop}
  - {name: homeostasis}
  - {name: adaptation}
"#,
        );
        // feedback_loop+homeostasis synergy, adaptation+homeostasis tension.
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|f| f.kind == InteractionKind::Synergy));
        assert!(found.iter().any(|f| f.kind == InteractionKind::Tension));
    }
}
