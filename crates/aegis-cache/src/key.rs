use sha2::{Digest, Sha256};

/// 16-hex-char SHA-256 prefix of `category:endpoint:body`. Collision
/// handling is deliberately not implemented — 64 bits of key space is a
/// documented risk, not a guaranteed-unique identifier.
pub fn cache_key(endpoint: &str, body: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(endpoint.as_bytes());
    hasher.update(b":");
    hasher.update(body.unwrap_or("").as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_16_hex_chars() {
        let k = cache_key("/v1/ioc/lookup", None);
        assert_eq!(k.len(), 16);
        assert!(k.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn key_is_deterministic() {
        let k1 = cache_key("/v1/ioc/lookup", Some("{\"q\":1}"));
        let k2 = cache_key("/v1/ioc/lookup", Some("{\"q\":1}"));
        assert_eq!(k1, k2);
    }

    #[test]
    fn different_body_yields_different_key() {
        let k1 = cache_key("/v1/ioc/lookup", Some("a"));
        let k2 = cache_key("/v1/ioc/lookup", Some("b"));
        assert_ne!(k1, k2);
    }
}
