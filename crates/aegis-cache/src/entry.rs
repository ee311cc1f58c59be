use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheEntry {
    pub category: String,
    pub endpoint: String,
    pub stored_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub data: serde_json::Value,
}

impl CacheEntry {
    pub fn new(category: &str, endpoint: &str, data: serde_json::Value, ttl_secs: u64) -> Self {
        let now = Utc::now();
        Self {
            category: category.to_string(),
            endpoint: endpoint.to_string(),
            stored_at: now,
            expires_at: now + chrono::Duration::seconds(ttl_secs as i64),
            data,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
