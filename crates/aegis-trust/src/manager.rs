use std::path::PathBuf;

use aegis_config::{GateMode, TrustConfig};
use chrono::Utc;

use crate::audit::AuditEntry;
use crate::category::{Category, RiskTier};
use crate::error::TrustError;
use crate::ledger::TrustLedger;
use crate::outcome::Outcome;

/// `check(category)`'s answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckResult {
    pub score: u8,
    pub risk_tier: RiskTier,
    pub graduated: bool,
}

/// `record(task_id, outcome)`'s answer: the score movement plus whatever
/// graduation transition it caused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordResult {
    pub score_before: u8,
    pub score_after: u8,
    pub graduated_before: bool,
    pub graduated_after: bool,
}

impl RecordResult {
    pub fn just_graduated(&self) -> bool {
        !self.graduated_before && self.graduated_after
    }

    pub fn just_demoted(&self) -> bool {
        self.graduated_before && !self.graduated_after
    }
}

/// File-backed trust ledger. `trust-ledger.yaml` holds current scores;
/// `trust-history.jsonl` is the append-only audit trail. Both live under
/// the same root and share one `.lock` file, same as [`aegis_budget::RateBudget`].
pub struct TrustManager {
    root: PathBuf,
    config: TrustConfig,
}

impl TrustManager {
    pub fn new(root: impl Into<PathBuf>, config: TrustConfig) -> Self {
        Self { root: root.into(), config }
    }

    fn ledger_path(&self) -> PathBuf {
        self.root.join("trust-ledger.yaml")
    }

    fn history_path(&self) -> PathBuf {
        self.root.join("trust-history.jsonl")
    }

    fn load(&self) -> TrustLedger {
        let path = self.ledger_path();
        let Ok(content) = std::fs::read_to_string(&path) else {
            return TrustLedger::default();
        };
        match serde_yaml::from_str(&content) {
            Ok(ledger) => ledger,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt trust ledger, starting fresh");
                TrustLedger::default()
            }
        }
    }

    fn save(&self, ledger: &TrustLedger) -> Result<(), TrustError> {
        let path = self.ledger_path();
        let text = serde_yaml::to_string(ledger).map_err(|e| TrustError::Parse { path: path.clone(), source: e })?;
        aegis_fsutil::atomic_write(&path, text.as_bytes()).map_err(|e| TrustError::Io { path, source: e })
    }

    fn graduated(&self, category: Category, score: u8) -> bool {
        self.config.gate_mode == GateMode::Autonomous
            && score >= self.config.threshold
            && !category.risk_tier().is_high()
    }

    /// Current ledger state plus graduation derivation for every category.
    pub fn status(&self) -> Result<Vec<CheckResult>, TrustError> {
        let _lock = aegis_fsutil::DirLock::acquire(&self.root)
            .map_err(|e| TrustError::Io { path: self.root.clone(), source: e })?;
        let ledger = self.load();
        Ok(Category::ALL
            .iter()
            .map(|c| {
                let score = ledger.score(*c);
                CheckResult {
                    score,
                    risk_tier: c.risk_tier(),
                    graduated: self.graduated(*c, score),
                }
            })
            .collect())
    }

    pub fn check(&self, category: Category) -> Result<CheckResult, TrustError> {
        let _lock = aegis_fsutil::DirLock::acquire(&self.root)
            .map_err(|e| TrustError::Io { path: self.root.clone(), source: e })?;
        let ledger = self.load();
        let score = ledger.score(category);
        Ok(CheckResult {
            score,
            risk_tier: category.risk_tier(),
            graduated: self.graduated(category, score),
        })
    }

    /// Applies `outcome`'s score delta to `category`, clamped to [0,100],
    /// appends an audit entry, and reports the graduation transition (if
    /// any). The caller (typically the self-modification pipeline) is
    /// responsible for resolving `category` from the proposal's own
    /// record; this ledger only tracks scores, not proposals.
    pub fn record(&self, task_id: &str, category: Category, outcome: Outcome) -> Result<RecordResult, TrustError> {
        let _lock = aegis_fsutil::DirLock::acquire(&self.root)
            .map_err(|e| TrustError::Io { path: self.root.clone(), source: e })?;

        let mut ledger = self.load();
        let score_before = ledger.score(category);
        let graduated_before = self.graduated(category, score_before);

        let score_after = (score_before as i16 + outcome.delta()).clamp(0, 100) as u8;
        ledger.set_score(category, score_after);
        let graduated_after = self.graduated(category, score_after);

        self.save(&ledger)?;

        let entry = AuditEntry {
            timestamp: Utc::now(),
            task_id: task_id.to_string(),
            category,
            outcome,
            score_before,
            score_after,
            graduated: graduated_after,
        };
        self.append_history(&entry)?;

        Ok(RecordResult {
            score_before,
            score_after,
            graduated_before,
            graduated_after,
        })
    }

    fn append_history(&self, entry: &AuditEntry) -> Result<(), TrustError> {
        let path = self.history_path();
        let line = serde_json::to_string(entry).expect("AuditEntry always serializes");
        aegis_fsutil::append_line(&path, &line).map_err(|e| TrustError::Io { path, source: e })
    }
}
