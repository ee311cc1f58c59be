use async_trait::async_trait;
use sha2::{Digest, Sha256};

pub const DELIMITER_START: &str = "<<<AEGIS-HARVEST-START>>>";
pub const DELIMITER_END: &str = "<<<AEGIS-HARVEST-END>>>";

/// Raw content as the creator registry hands it over, before isolation
/// wrapping or hashing.
#[derive(Clone, Debug)]
pub struct RawArtifact {
    pub label: String,
    pub priority: u8,
    pub content: String,
    pub source: String,
}

/// A harvested artifact: content hashed and wrapped in explicit isolation
/// delimiters so nothing downstream can mistake it for trusted text.
#[derive(Clone, Debug)]
pub struct HarvestedArtifact {
    pub label: String,
    pub priority: u8,
    pub source: String,
    pub content_hash: String,
    pub wrapped_content: String,
}

/// External source of labeled content to learn from. Out of scope to
/// implement concretely here — this is the seam a real registry
/// integration plugs into.
#[async_trait]
pub trait CreatorRegistry: Send + Sync {
    async fn fetch(&self, min_priority: u8) -> Vec<RawArtifact>;
}

fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

fn wrap(content: &str) -> String {
    format!("{DELIMITER_START}\n{content}\n{DELIMITER_END}")
}

/// Pull everything at or above `min_priority` and wrap it for isolation.
pub async fn harvest(registry: &dyn CreatorRegistry, min_priority: u8) -> Vec<HarvestedArtifact> {
    registry
        .fetch(min_priority)
        .await
        .into_iter()
        .filter(|a| a.priority >= min_priority)
        .map(|a| HarvestedArtifact {
            label: a.label,
            priority: a.priority,
            source: a.source,
            content_hash: content_hash(&a.content),
            wrapped_content: wrap(&a.content),
        })
        .collect()
}
