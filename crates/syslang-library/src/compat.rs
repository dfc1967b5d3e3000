//! Compatibility rules: which principle pairs reinforce or strain each
//! other.

use serde::Deserialize;

/// One synergy or tension between two principles. Pairs are unordered.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    pub a: String,
    pub b: String,
    pub note: String,
}

impl Interaction {
    /// Whether this rule covers the (unordered) pair.
    pub fn covers(&self, x: &str, y: &str) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

/// The `compatibility.json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct CompatibilityRules {
    #[serde(default)]
    pub synergies: Vec<Interaction>,
    #[serde(default)]
    pub tensions: Vec<Interaction>,
}

impl CompatibilityRules {
    /// The synergy covering a pair, if any.
    pub fn synergy_between(&self, x: &str, y: &str) -> Option<&Interaction> {
        self.synergies.iter().find(|i| i.covers(x, y))
    }

    /// The tension covering a pair, if any.
    pub fn tension_between(&self, x: &str, y: &str) -> Option<&Interaction> {
        self.tensions.iter().find(|i| i.covers(x, y))
    }

    /// All principle names referenced by any rule.
    pub fn referenced_principles(&self) -> impl Iterator<Item = &str> {
        self.synergies
            .iter()
            .chain(self.tensions.iter())
            .flat_map(|i| [i.a.as_str(), i.b.as_str()])
    }
}
