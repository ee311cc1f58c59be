use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::loader::Cascade;

/// `{global:{monthly,daily,hourly,soft_pct,hard_pct}, consumers:{<name>:
/// {daily,hourly,priority,may_borrow}}, circuit_breaker:{threshold,
/// window_min, cooldown_min, extended_cooldown_min}}`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BudgetConfig {
    #[serde(default)]
    pub global: GlobalBudget,
    #[serde(default)]
    pub consumers: HashMap<String, ConsumerBudget>,
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GlobalBudget {
    #[serde(default)]
    pub monthly: u64,
    #[serde(default)]
    pub daily: u64,
    #[serde(default)]
    pub hourly: u64,
    #[serde(default = "default_soft_pct")]
    pub soft_pct: f64,
    #[serde(default = "default_hard_pct")]
    pub hard_pct: f64,
}

fn default_soft_pct() -> f64 {
    0.85
}

fn default_hard_pct() -> f64 {
    1.0
}

impl Default for GlobalBudget {
    fn default() -> Self {
        Self {
            monthly: 0,
            daily: 0,
            hourly: 0,
            soft_pct: default_soft_pct(),
            hard_pct: default_hard_pct(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ConsumerBudget {
    #[serde(default)]
    pub daily: u64,
    #[serde(default)]
    pub hourly: u64,
    /// Higher priority consumers are served first when borrowing from the
    /// shared pool is allowed.
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub may_borrow: bool,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    #[serde(default = "default_window_min")]
    pub window_min: u32,
    #[serde(default = "default_cooldown_min")]
    pub cooldown_min: u32,
    #[serde(default = "default_extended_cooldown_min")]
    pub extended_cooldown_min: u32,
}

fn default_threshold() -> u32 {
    5
}

fn default_window_min() -> u32 {
    10
}

fn default_cooldown_min() -> u32 {
    15
}

fn default_extended_cooldown_min() -> u32 {
    30
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            window_min: default_window_min(),
            cooldown_min: default_cooldown_min(),
            extended_cooldown_min: default_extended_cooldown_min(),
        }
    }
}

impl Cascade for BudgetConfig {
    /// No budget config at all means no outbound calls are allocated any
    /// allowance beyond the implicit zero default, which is conservative
    /// rather than permissive.
    fn fallback() -> Self {
        BudgetConfig::default()
    }
}
