//! Hypothesis generation from principle templates.

use serde::Serialize;
use syslang_library::{placeholders, Library, PrincipleDef};
use syslang_model::{PrincipleUse, SystemModel};

/// A generated, ideally refutable, claim about the modeled system.
#[derive(Debug, Clone, Serialize)]
pub struct Hypothesis {
    pub principle: String,
    pub statement: String,
    pub confidence: f64,
    /// Whether the model backs the claim with a falsification test.
    pub refutable: bool,
    /// Template placeholders the model left unfilled; they stay
    /// verbatim in the statement.
    pub unfilled: Vec<String>,
}

/// Generate one hypothesis per declared principle.
pub fn generate_hypotheses(model: &SystemModel, library: &Library) -> Vec<Hypothesis> {
    model
        .principles
        .iter()
        .map(|used| {
            // Same fallback sentence for unknown principles and for
            // principles without a template.
            let templated = library
                .principle(&used.name)
                .and_then(|def| def.hypothesis_template.as_deref().map(|t| (def, t)));
            let (statement, unfilled) = match templated {
                Some((def, template)) => fill_template(template, used, def),
                None => (
                    format!("System should exhibit {} characteristics", used.name),
                    Vec::new(),
                ),
            };
            let refutable = model
                .tests_for(&used.name)
                .any(|t| !t.refuted_if.trim().is_empty());
            Hypothesis {
                principle: used.name.clone(),
                statement,
                confidence: used.confidence,
                refutable,
                unfilled,
            }
        })
        .collect()
}

fn fill_template(
    template: &str,
    used: &PrincipleUse,
    def: &PrincipleDef,
) -> (String, Vec<String>) {
    let mut statement = template.to_string();
    let mut unfilled: Vec<String> = Vec::new();

    for name in placeholders(template) {
        let token = format!("{{{name}}}");
        let replacement = if name == "threshold" {
            def.default_threshold.map(|t| t.to_string())
        } else {
            used.parameters.get(name).map(ToString::to_string)
        };
        match replacement {
            Some(value) => statement = statement.replace(&token, &value),
            None => {
                if !unfilled.iter().any(|u| u == name) {
                    unfilled.push(name.to_string());
                }
            }
        }
    }

    (statement, unfilled)
}
