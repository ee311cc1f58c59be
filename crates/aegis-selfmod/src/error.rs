use thiserror::Error;

use crate::breaker::BreakerError;

#[derive(Error, Debug)]
pub enum SelfModError {
    #[error(transparent)]
    Checkpoint(#[from] aegis_checkpoint::CheckpointError),

    #[error(transparent)]
    Trust(#[from] aegis_trust::TrustError),

    #[error(transparent)]
    Budget(#[from] aegis_budget::BudgetError),

    #[error(transparent)]
    Breaker(#[from] BreakerError),

    #[error("self-modification pipeline circuit breaker is tripped: {reason}")]
    BreakerTripped { reason: String },
}
