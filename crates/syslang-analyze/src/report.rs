//! The assembled analysis report, with warnings and recommendations.

use crate::hypothesis::{generate_hypotheses, Hypothesis};
use crate::interaction::{find_interactions, InteractionFinding, InteractionKind};
use crate::profile::Profile;
use crate::suggest::{suggest_patterns, PatternSuggestion};
use serde::Serialize;
use std::fmt;
use syslang_library::Library;
use syslang_model::SystemModel;
use tracing::debug;

/// Confidence at or above which a tension is worth flagging loudly.
const HIGH_CONFIDENCE: f64 = 0.7;

/// Test coverage below which a recommendation is emitted.
const LOW_COVERAGE: f64 = 0.5;

/// Everything the analysis found, ready for rendering.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub system: String,
    pub domain: String,
    pub scale: String,
    pub description: String,
    pub profile: Profile,
    pub hypotheses: Vec<Hypothesis>,
    pub interactions: Vec<InteractionFinding>,
    pub suggestions: Vec<PatternSuggestion>,
    pub warnings: Vec<AnalysisWarning>,
    pub recommendations: Vec<Recommendation>,
}

/// An analysis-level weakness in the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// The model declares principles but not a single test.
    NoTests,
    /// Other principles are tested; this one is not.
    IrrefutableHypothesis { principle: String },
    /// Template placeholders the model left unfilled.
    UnfilledTemplate {
        principle: String,
        placeholders: Vec<String>,
    },
    /// A tension between two principles both held with high confidence.
    UnacknowledgedTension { a: String, b: String },
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::NoTests => {
                write!(f, "model declares principles but no tests")
            }
            AnalysisWarning::IrrefutableHypothesis { principle } => {
                write!(f, "hypothesis for '{}' is irrefutable as modeled", principle)
            }
            AnalysisWarning::UnfilledTemplate {
                principle,
                placeholders,
            } => {
                write!(
                    f,
                    "hypothesis for '{}' left {} unfilled",
                    principle,
                    placeholders.join(", ")
                )
            }
            AnalysisWarning::UnacknowledgedTension { a, b } => {
                write!(
                    f,
                    "'{}' and '{}' are in tension, both held with high confidence",
                    a, b
                )
            }
        }
    }
}

impl AnalysisWarning {
    pub fn fix_hint(&self) -> &'static str {
        match self {
            AnalysisWarning::NoTests => {
                "add a tests: section; every principle deserves a refuted_if observation"
            }
            AnalysisWarning::IrrefutableHypothesis { .. } => {
                "add a test with a concrete refuted_if observation for this principle"
            }
            AnalysisWarning::UnfilledTemplate { .. } => {
                "set the listed parameters in the model to sharpen the hypothesis"
            }
            AnalysisWarning::UnacknowledgedTension { .. } => {
                "lower one confidence or document how the system resolves the strain"
            }
        }
    }
}

/// A concrete next step for the model's author.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    AddFalsificationTests { untested: usize },
    ConsiderPattern { pattern: String, parent: String },
    ReviewTension { a: String, b: String },
    RaiseCoverage { coverage_pct: u32 },
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::AddFalsificationTests { untested } => {
                write!(f, "add falsification tests for {} untested principle(s)", untested)
            }
            Recommendation::ConsiderPattern { pattern, parent } => {
                write!(
                    f,
                    "consider the '{}' pattern, a specialization of '{}'",
                    pattern, parent
                )
            }
            Recommendation::ReviewTension { a, b } => {
                write!(f, "review the tension between '{}' and '{}'", a, b)
            }
            Recommendation::RaiseCoverage { coverage_pct } => {
                write!(f, "test coverage is {}%; aim for every principle", coverage_pct)
            }
        }
    }
}

/// Analyze a model against a library.
///
/// Total over any loadable model: unknown principles degrade to generic
/// hypotheses rather than failing, so `analyze` can run even when the
/// caller skipped checking.
pub fn analyze(model: &SystemModel, library: &Library) -> AnalysisReport {
    debug!(system = %model.system.name, "profiling");
    let profile = Profile::of(model, library);

    debug!("generating hypotheses");
    let hypotheses = generate_hypotheses(model, library);

    debug!("finding interactions");
    let interactions = find_interactions(model, library);

    debug!("suggesting patterns");
    let suggestions = suggest_patterns(model, library);

    let warnings = gather_warnings(model, &hypotheses, &interactions);
    let recommendations = gather_recommendations(&profile, &hypotheses, &interactions, &suggestions);

    AnalysisReport {
        system: model.system.name.clone(),
        domain: model.system.domain.clone(),
        scale: model.system.scale.clone(),
        description: model.system.description.clone(),
        profile,
        hypotheses,
        interactions,
        suggestions,
        warnings,
        recommendations,
    }
}

fn gather_warnings(
    model: &SystemModel,
    hypotheses: &[Hypothesis],
    interactions: &[InteractionFinding],
) -> Vec<AnalysisWarning> {
    let mut warnings = Vec::new();

    if model.tests.is_empty() && !model.principles.is_empty() {
        warnings.push(AnalysisWarning::NoTests);
    } else {
        for hypothesis in hypotheses {
            if !hypothesis.refutable {
                warnings.push(AnalysisWarning::IrrefutableHypothesis {
                    principle: hypothesis.principle.clone(),
                });
            }
        }
    }

    for hypothesis in hypotheses {
        if !hypothesis.unfilled.is_empty() {
            warnings.push(AnalysisWarning::UnfilledTemplate {
                principle: hypothesis.principle.clone(),
                placeholders: hypothesis.unfilled.clone(),
            });
        }
    }

    for finding in interactions {
        if finding.kind != InteractionKind::Tension {
            continue;
        }
        let confident = |name: &str| {
            model
                .principle(name)
                .map(|p| p.confidence >= HIGH_CONFIDENCE)
                .unwrap_or(false)
        };
        if confident(&finding.a) && confident(&finding.b) {
            warnings.push(AnalysisWarning::UnacknowledgedTension {
                a: finding.a.clone(),
                b: finding.b.clone(),
            });
        }
    }

    warnings
}

fn gather_recommendations(
    profile: &Profile,
    hypotheses: &[Hypothesis],
    interactions: &[InteractionFinding],
    suggestions: &[PatternSuggestion],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    let untested = hypotheses.iter().filter(|h| !h.refutable).count();
    if untested > 0 {
        recommendations.push(Recommendation::AddFalsificationTests { untested });
    }

    if profile.principles > 0 && profile.test_coverage < LOW_COVERAGE {
        recommendations.push(Recommendation::RaiseCoverage {
            coverage_pct: (profile.test_coverage * 100.0).round() as u32,
        });
    }

    for finding in interactions {
        if finding.kind == InteractionKind::Tension {
            recommendations.push(Recommendation::ReviewTension {
                a: finding.a.clone(),
                b: finding.b.clone(),
            });
        }
    }

    for suggestion in suggestions {
        recommendations.push(Recommendation::ConsiderPattern {
            pattern: suggestion.pattern.clone(),
            parent: suggestion.parent.clone(),
        });
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use syslang_model::parse_model;

    fn report(source: &str) -> AnalysisReport {
        let model = parse_model(source).expect("parse error");
        analyze(&model, Library::builtin())
    }

    #[test]
    fn tested_model_is_quiet() {
        let r = report(
            r#"
system: {name: T, domain: d, scale: s, description: desc}
principles:
  - name: feedback_loop
    parameters: {polarity: negative, latency: delayed}
tests:
  - {name: t, principle: feedback_loop, prediction: p, refuted_if: r}
"#,
        );
        assert!(r.warnings.is_empty(), "warnings: {:?}", r.warnings);
        assert!(r.recommendations.is_empty());
    }

    #[test]
    fn untested_model_warns_and_recommends() {
        let r = report("system: {name: T}\nprinciples: [{name: emergence}]");
        assert!(r.warnings.contains(&AnalysisWarning::NoTests));
        assert!(r
            .recommendations
            .contains(&Recommendation::AddFalsificationTests { untested: 1 }));
        assert!(r
            .recommendations
            .contains(&Recommendation::RaiseCoverage { coverage_pct: 0 }));
    }

    #[test]
    fn partially_tested_model_flags_the_gap() {
        let r = report(
            r#"
system: {name: T}
principles:
  - {name: feedback_loop, parameters: {polarity: negative, latency: immediate}}
  - {name: emergence}
tests:
  - {name: t, principle: feedback_loop, prediction: p, refuted_if: r}
"#,
        );
        assert!(r.warnings.contains(&AnalysisWarning::IrrefutableHypothesis {
            principle: "emergence".into()
        }));
        assert!(!r.warnings.contains(&AnalysisWarning::NoTests));
    }

    #[test]
    fn confident_tension_is_flagged() {
        let r = report(
            r#"
system: {name: T}
principles:
  - {name: modularity, parameters: {coupling: loose}}
  - {name: emergence}
"#,
        );
        assert!(r
            .warnings
            .contains(&AnalysisWarning::UnacknowledgedTension {
                a: "modularity".into(),
                b: "emergence".into()
            }));
        assert!(r
            .recommendations
            .contains(&Recommendation::ReviewTension {
                a: "modularity".into(),
                b: "emergence".into()
            }));
    }

    #[test]
    fn hesitant_tension_is_not_flagged_loudly() {
        let r = report(
            r#"
system: {name: T}
principles:
  - {name: modularity, confidence: 0.4, parameters: {coupling: loose}}
  - {name: emergence}
"#,
        );
        assert!(!r
            .warnings
            .iter()
            .any(|w| matches!(w, AnalysisWarning::UnacknowledgedTension { .. })));
        // The recommendation to review the tension stays.
        assert!(r
            .recommendations
            .iter()
            .any(|rec| matches!(rec, Recommendation::ReviewTension { .. })));
    }

    #[test]
    fn pattern_suggestion_becomes_recommendation() {
        let r = report(
            r#"
system: {name: T}
principles:
  - {name: heterogeneous_distribution, parameters: {exponent: 1.2}}
tests:
  - {name: t, principle: heterogeneous_distribution, prediction: p, refuted_if: r}
"#,
        );
        assert!(r
            .recommendations
            .iter()
            .any(|rec| matches!(rec, Recommendation::ConsiderPattern { pattern, .. } if pattern == "pareto")));
    }
}
