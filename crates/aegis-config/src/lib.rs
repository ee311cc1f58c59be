//! Process-wide config loading for the control plane.
//!
//! Every config table is read-only after load: each is
//! parsed once by [`loader::load_cascading`] into an immutable value and
//! passed explicitly into the components that need it. There is no
//! singleton and no background reload.
//!
//! Cascade order is user path, then system path, then a fail-closed
//! built-in fallback. A present-but-unparseable file is treated the same
//! as an absent one — the error is logged and the loader falls through
//! to the next source.

mod budget;
mod cache_ttl;
mod checkpoint;
mod error;
mod loader;
mod policy;
mod selfmod;
mod trust;

pub use budget::{BudgetConfig, CircuitBreakerConfig, ConsumerBudget, GlobalBudget};
pub use cache_ttl::{CacheTtlConfig, DEFAULT_TTL_SECONDS};
pub use checkpoint::CheckpointConfig;
pub use error::{ConfigError, Result};
pub use loader::{load_cascading, system_config_path, user_config_path, Cascade};
pub use policy::{BashRules, PathRules, PolicyConfig};
pub use selfmod::SelfModConfig;
pub use trust::{GateMode, TrustConfig};

/// Load all six process-wide config tables using the conventional
/// `~/.aegis/<name>.toml` / `/etc/aegis/<name>.toml` cascade.
pub fn load_all() -> std::result::Result<ControlPlaneConfig, ConfigError> {
    let policy_user = user_config_path("policy")?;
    let budget_user = user_config_path("budget")?;
    let cache_user = user_config_path("cache")?;
    let trust_user = user_config_path("trust")?;
    let checkpoint_user = user_config_path("checkpoint")?;
    let selfmod_user = user_config_path("selfmod")?;

    Ok(ControlPlaneConfig {
        policy: load_cascading(&policy_user, &system_config_path("policy")),
        budget: load_cascading(&budget_user, &system_config_path("budget")),
        cache_ttl: load_cascading(&cache_user, &system_config_path("cache")),
        trust: load_cascading(&trust_user, &system_config_path("trust")),
        checkpoint: load_cascading(&checkpoint_user, &system_config_path("checkpoint")),
        selfmod: load_cascading(&selfmod_user, &system_config_path("selfmod")),
    })
}

/// The six config tables bundled together for convenient passing into a
/// process's component graph.
#[derive(Clone, Debug)]
pub struct ControlPlaneConfig {
    pub policy: PolicyConfig,
    pub budget: BudgetConfig,
    pub cache_ttl: CacheTtlConfig,
    pub trust: TrustConfig,
    pub checkpoint: CheckpointConfig,
    pub selfmod: SelfModConfig,
}
