use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::loader::Cascade;

/// `{<category>: <seconds>, …}`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    #[serde(flatten)]
    pub ttl_seconds: HashMap<String, u64>,
}

impl CacheTtlConfig {
    pub fn ttl_for(&self, category: &str) -> u64 {
        self.ttl_seconds
            .get(category)
            .copied()
            .unwrap_or(DEFAULT_TTL_SECONDS)
    }
}

/// Used for any category with no explicit entry.
pub const DEFAULT_TTL_SECONDS: u64 = 300;

impl Cascade for CacheTtlConfig {
    fn fallback() -> Self {
        CacheTtlConfig::default()
    }
}
