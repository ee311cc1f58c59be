use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("no bearer token configured")]
    MissingToken,

    #[error("rate limited: {reason}")]
    RateLimited { reason: String },

    #[error("circuit open, retry after cooldown")]
    CircuitOpen,

    #[error("upstream error: {status}")]
    Upstream { status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("budget state error: {0}")]
    Budget(#[from] aegis_budget::BudgetError),
}
