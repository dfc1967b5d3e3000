//! Analysis engine for SysLang models.
//!
//! Takes a loaded (ideally checked) model plus the principle library
//! and produces an [`AnalysisReport`]: profile, generated hypotheses,
//! principle interactions, pattern suggestions, warnings, and
//! recommendations.

pub mod hypothesis;
pub mod interaction;
pub mod profile;
pub mod render;
pub mod report;
pub mod suggest;

pub use hypothesis::{generate_hypotheses, Hypothesis};
pub use interaction::{find_interactions, InteractionFinding, InteractionKind};
pub use profile::Profile;
pub use render::{render_html, render_json, render_text};
pub use report::{analyze, AnalysisReport, AnalysisWarning, Recommendation};
pub use suggest::{suggest_patterns, PatternSuggestion};
