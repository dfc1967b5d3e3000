//! Distribution-pattern suggestions.

use serde::Serialize;
use syslang_library::Library;
use syslang_model::SystemModel;

/// A pattern worth considering because the model declares its parent
/// principle.
#[derive(Debug, Clone, Serialize)]
pub struct PatternSuggestion {
    pub pattern: String,
    pub parent: String,
    pub description: String,
    /// Names of the pattern's specific parameters.
    pub parameters: Vec<String>,
}

/// Suggest patterns whose parent principle the model declares.
pub fn suggest_patterns(model: &SystemModel, library: &Library) -> Vec<PatternSuggestion> {
    library
        .patterns()
        .filter(|(_, def)| model.principle(&def.parent_principle).is_some())
        .map(|(name, def)| PatternSuggestion {
            pattern: name.to_string(),
            parent: def.parent_principle.clone(),
            description: def.description.clone(),
            parameters: def.specific_parameters.keys().cloned().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use syslang_model::parse_model;

    #[test]
    fn patterns_follow_their_parent() {
        let model = parse_model(
            "system: {name: T}\nprinciples: [{name: heterogeneous_distribution}]",
        )
        .unwrap();
        let suggestions = suggest_patterns(&model, Library::builtin());
        let names: Vec<&str> = suggestions.iter().map(|s| s.pattern.as_str()).collect();
        assert!(names.contains(&"pareto"));
        assert!(names.contains(&"long_tail"));
        assert!(!names.contains(&"winner_take_all"));
    }

    #[test]
    fn no_parent_no_suggestion() {
        let model =
            parse_model("system: {name: T}\nprinciples: [{name: feedback_loop}]").unwrap();
        assert!(suggest_patterns(&model, Library::builtin()).is_empty());
    }
}
