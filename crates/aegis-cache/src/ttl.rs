use aegis_config::CacheTtlConfig;

/// Static per-category TTLs, in seconds, per the documented table. A
/// [`CacheTtlConfig`] loaded from disk takes priority over this table for
/// any category it names explicitly.
fn builtin_ttl_seconds(category: &str) -> u64 {
    match category {
        "trending" => 3600,
        "dashboard" => 7200,
        "cve-entity" => 86400,
        "threat-actor" | "malware" | "detection-rules" => 7 * 86400,
        "entity-search" | "actor-relations" | "tags" => 86400,
        "search" | "stream" => 1800,
        "ioc" => 6 * 3600,
        "profile" => 3600,
        "batch" => 6 * 3600,
        _ => aegis_config::DEFAULT_TTL_SECONDS,
    }
}

/// Resolve the TTL for `category`, preferring an explicit override in
/// `config` over the built-in static table.
pub fn ttl_for(config: &CacheTtlConfig, category: &str) -> u64 {
    if config.ttl_seconds.contains_key(category) {
        config.ttl_for(category)
    } else {
        builtin_ttl_seconds(category)
    }
}
