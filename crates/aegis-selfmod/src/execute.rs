use async_trait::async_trait;

use aegis_checkpoint::CheckpointManager;
use aegis_criteria::{pass_rate, Criterion};
use aegis_trust::{Outcome, TrustManager};

use crate::proposal::{Proposal, ProposalStatus};

/// Applies a proposal's change to the working tree and returns a
/// transcript of what happened, for acceptance-criteria scoring. The
/// concrete executor (an agent invocation, a patch applier, …) is out of
/// scope here; this is the seam.
#[async_trait]
pub trait ProposalExecutor: Send + Sync {
    async fn execute(&self, proposal: &Proposal) -> ExecutionOutput;
}

/// What the executor produced: the transcript acceptance criteria are
/// scored against, and whether the executor itself reported success.
#[derive(Clone, Debug)]
pub struct ExecutionOutput {
    pub transcript: String,
    pub succeeded: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExecuteOutcome {
    Executed { pass_rate: f64 },
    RolledBack { reason: String },
}

/// Checkpoint, execute, verify, and either record success against the
/// trust ledger or roll back and record rejection. Only ever called on an
/// `Approved` proposal — the caller (the pipeline) owns routing.
pub async fn execute_and_verify(
    proposal: &mut Proposal,
    executor: &dyn ProposalExecutor,
    checkpoints: &CheckpointManager,
    trust: &TrustManager,
    criteria: &[Criterion],
) -> Result<ExecuteOutcome, aegis_checkpoint::CheckpointError> {
    checkpoints.checkpoint(&proposal.id, Some(&proposal.action.target_path)).await?;

    let output = executor.execute(proposal).await;
    let verify = checkpoints.verify(&proposal.id).await?;

    if verify.poisoned || !output.succeeded {
        let reason = if verify.poisoned {
            "health check failed after execution".to_string()
        } else {
            "executor reported failure".to_string()
        };
        let rollback = checkpoints.rollback(&proposal.id, &reason).await?;
        proposal.status = ProposalStatus::RolledBack;
        trust
            .record(&proposal.id, proposal.category, Outcome::Rejected)
            .expect("trust ledger record must succeed");
        return Ok(ExecuteOutcome::RolledBack { reason: rollback.reason });
    }

    let rate = pass_rate(criteria, &output.transcript);
    let outcome = if rate >= 0.9 {
        Outcome::ApprovedClean
    } else if rate >= 0.6 {
        Outcome::ApprovedMinor
    } else {
        Outcome::ApprovedMajor
    };

    proposal.status = ProposalStatus::Executed;
    trust
        .record(&proposal.id, proposal.category, outcome)
        .expect("trust ledger record must succeed");

    Ok(ExecuteOutcome::Executed { pass_rate: rate })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{Decision, ValidationRecord};
    use aegis_config::{CheckpointConfig, TrustConfig};
    use aegis_trust::Category;

    fn proposal() -> Proposal {
        let action = crate::proposal::ProposedAction { target_path: "docs/x.md".into(), description: "d".into() };
        let validation = ValidationRecord { scores: vec![], overall: 0.9, injection_score: 0.95, decision: Decision::Passed };
        let mut p = Proposal::new("autolearn-2026-07-28-001".into(), Category::Documentation, action, validation);
        p.status = ProposalStatus::Approved;
        p
    }

    struct SucceedingExecutor;
    #[async_trait]
    impl ProposalExecutor for SucceedingExecutor {
        async fn execute(&self, _proposal: &Proposal) -> ExecutionOutput {
            ExecutionOutput { transcript: "wrote docs/x.md successfully".into(), succeeded: true }
        }
    }

    struct FailingExecutor;
    #[async_trait]
    impl ProposalExecutor for FailingExecutor {
        async fn execute(&self, _proposal: &Proposal) -> ExecutionOutput {
            ExecutionOutput { transcript: "editor crashed".into(), succeeded: false }
        }
    }

    async fn init_repo(dir: &std::path::Path) {
        tokio::process::Command::new("git").arg("init").current_dir(dir).output().await.unwrap();
        tokio::process::Command::new("git").args(["config", "user.email", "a@b.c"]).current_dir(dir).output().await.unwrap();
        tokio::process::Command::new("git").args(["config", "user.name", "a"]).current_dir(dir).output().await.unwrap();
        std::fs::write(dir.join("docs").join("x.md"), "hi").ok();
        tokio::process::Command::new("git").args(["add", "-A"]).current_dir(dir).output().await.unwrap();
        tokio::process::Command::new("git").args(["commit", "-m", "init"]).current_dir(dir).output().await.unwrap();
    }

    #[tokio::test]
    async fn executor_failure_rolls_back_and_records_rejection() {
        let repo = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(repo.path().join("docs")).unwrap();
        init_repo(repo.path()).await;

        let state = tempfile::tempdir().unwrap();
        let checkpoints = CheckpointManager::new(state.path(), repo.path(), CheckpointConfig::default());
        let trust = TrustManager::new(state.path(), TrustConfig::default());

        let mut p = proposal();
        let outcome = execute_and_verify(&mut p, &FailingExecutor, &checkpoints, &trust, &[]).await.unwrap();

        assert!(matches!(outcome, ExecuteOutcome::RolledBack { .. }));
        assert_eq!(p.status, ProposalStatus::RolledBack);
    }

    #[tokio::test]
    async fn successful_execution_with_no_criteria_passes_vacuously() {
        let repo = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(repo.path().join("docs")).unwrap();
        init_repo(repo.path()).await;

        let state = tempfile::tempdir().unwrap();
        let checkpoints = CheckpointManager::new(state.path(), repo.path(), CheckpointConfig::default());
        let trust = TrustManager::new(state.path(), TrustConfig::default());

        let mut p = proposal();
        let outcome = execute_and_verify(&mut p, &SucceedingExecutor, &checkpoints, &trust, &[]).await.unwrap();

        assert_eq!(outcome, ExecuteOutcome::Executed { pass_rate: 1.0 });
        assert_eq!(p.status, ProposalStatus::Executed);
    }
}
