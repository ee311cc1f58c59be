use aegis_trust::{Category, RiskTier};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::ValidationRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Executed,
    RolledBack,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Approved => "approved",
            ProposalStatus::Executed => "executed",
            ProposalStatus::RolledBack => "rolled_back",
            ProposalStatus::Rejected => "rejected",
        }
    }
}

/// The target of a proposed self-modification: a path plus a human-
/// readable description of the change. What exactly the action *is*
/// (append a skill doc, patch a config key, …) is the external executor's
/// concern, not this crate's.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProposedAction {
    pub target_path: String,
    pub description: String,
}

/// A proposed self-modification moving through
/// generated → (pending | approved) → (executed | rolled_back | rejected).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,
    pub category: Category,
    pub risk_tier: RiskTier,
    pub action: ProposedAction,
    pub validation: ValidationRecord,
    pub status: ProposalStatus,
}

impl Proposal {
    pub fn new(id: String, category: Category, action: ProposedAction, validation: ValidationRecord) -> Self {
        let risk_tier = category.risk_tier();
        Self { id, category, risk_tier, action, validation, status: ProposalStatus::Pending }
    }

    pub fn status_str(&self) -> &'static str {
        self.status.as_str()
    }
}

/// `autolearn-YYYY-MM-DD-NNN`, `seq` is 1-based and zero-padded to 3
/// digits. The date is passed in rather than taken from `Utc::now()` so
/// callers control it (and so the pipeline can be driven deterministically
/// in tests).
pub fn proposal_id(date: NaiveDate, seq: u32) -> String {
    format!("autolearn-{}-{:03}", date.format("%Y-%m-%d"), seq)
}

pub fn today(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}
