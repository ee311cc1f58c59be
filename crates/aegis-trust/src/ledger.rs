use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// A category with no recorded history starts here: trusted enough to
/// operate under human gating, not trusted enough to graduate.
pub const DEFAULT_SCORE: u8 = 50;

/// `category → integer score ∈ [0,100]`. Keyed by [`Category::as_str`]
/// rather than the enum directly so the on-disk YAML stays a plain
/// string-keyed map.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrustLedger {
    #[serde(default)]
    scores: HashMap<String, u8>,
}

impl TrustLedger {
    pub fn score(&self, category: Category) -> u8 {
        *self.scores.get(category.as_str()).unwrap_or(&DEFAULT_SCORE)
    }

    pub fn set_score(&mut self, category: Category, score: u8) {
        self.scores.insert(category.as_str().to_string(), score.min(100));
    }

    pub fn all(&self) -> Vec<(Category, u8)> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.score(*c)))
            .collect()
    }
}
