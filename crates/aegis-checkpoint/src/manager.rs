use std::collections::BTreeMap;
use std::path::PathBuf;

use aegis_config::CheckpointConfig;
use chrono::Utc;

use crate::checkpoint::{Checkpoint, RollbackOutcome, VerifyResult};
use crate::checks;
use crate::error::CheckpointError;
use crate::git;
use crate::hash;
use crate::health::HealthSignals;

/// Owns checkpoint files (one per task, immutable after create) and the
/// health-verification history for a single repository. `root` is the
/// control plane's state directory; `repo_root` is the repository being
/// checkpointed — they are deliberately separate, since the state the
/// checkpointer keeps about a repo must survive a rollback of that repo.
pub struct CheckpointManager {
    root: PathBuf,
    repo_root: PathBuf,
    config: CheckpointConfig,
}

impl CheckpointManager {
    pub fn new(root: impl Into<PathBuf>, repo_root: impl Into<PathBuf>, config: CheckpointConfig) -> Self {
        Self { root: root.into(), repo_root: repo_root.into(), config }
    }

    fn checkpoints_dir(&self) -> PathBuf {
        self.root.join("checkpoints")
    }

    fn checkpoint_path(&self, task_id: &str) -> PathBuf {
        self.checkpoints_dir().join(format!("{task_id}.json"))
    }

    fn history_path(&self) -> PathBuf {
        self.root.join("health-history.jsonl")
    }

    /// The files a checkpoint hashes and health-checks: the configured
    /// critical set plus, if given, the target file of the proposal this
    /// checkpoint is guarding.
    fn scanned_files(&self, extra_target: Option<&str>) -> Vec<String> {
        let mut files = self.config.critical_files.clone();
        if let Some(target) = extra_target {
            if !files.iter().any(|f| f == target) {
                files.push(target.to_string());
            }
        }
        files
    }

    /// Record VCS position, file hashes, and current health. Writes the
    /// checkpoint file once via an atomic rename — nothing ever edits it
    /// in place afterward.
    pub async fn checkpoint(&self, task_id: &str, extra_target: Option<&str>) -> Result<Checkpoint, CheckpointError> {
        let vcs_commit = git::current_commit(&self.repo_root).await?;
        let vcs_branch = git::current_branch(&self.repo_root).await?;
        let files = self.scanned_files(extra_target);
        let file_hashes = hash::file_hashes(&self.repo_root, &files);
        let health_before = self.compute_health(&files, None).await?;

        let checkpoint = Checkpoint {
            task_id: task_id.to_string(),
            created_at: Utc::now(),
            vcs_commit,
            vcs_branch,
            file_hashes,
            health_before,
        };

        let path = self.checkpoint_path(task_id);
        let bytes = serde_json::to_vec_pretty(&checkpoint).map_err(|e| CheckpointError::Parse { path: path.clone(), source: e })?;
        aegis_fsutil::atomic_write(&path, &bytes).map_err(|e| CheckpointError::Io { path, source: e })?;

        Ok(checkpoint)
    }

    pub fn load(&self, task_id: &str) -> Result<Checkpoint, CheckpointError> {
        let path = self.checkpoint_path(task_id);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CheckpointError::NotFound { task_id: task_id.to_string() }
            } else {
                CheckpointError::Io { path: path.clone(), source: e }
            }
        })?;
        serde_json::from_str(&content).map_err(|e| CheckpointError::Parse { path, source: e })
    }

    /// Re-run health against the checkpoint's file set, using its
    /// recorded hashes as the deletion baseline, and append the result to
    /// the history log.
    pub async fn verify(&self, task_id: &str) -> Result<VerifyResult, CheckpointError> {
        let checkpoint = self.load(task_id)?;
        let files: Vec<String> = checkpoint.file_hashes.keys().cloned().collect();
        let details = self.compute_health(&files, Some(&checkpoint.file_hashes)).await?;
        let result = VerifyResult { score: details.score(), poisoned: details.poisoned(), details };
        self.append_history(task_id, &result)?;
        Ok(result)
    }

    /// Stash whatever is currently in the working tree, hard-reset to the
    /// checkpoint's commit, then verify. A still-poisoned tree after reset
    /// is a terminal failure for this task — there is no second fallback.
    pub async fn rollback(&self, task_id: &str, reason: &str) -> Result<RollbackOutcome, CheckpointError> {
        tracing::warn!(task_id, reason, "rolling back to checkpoint");
        let checkpoint = self.load(task_id)?;
        git::stash_push(&self.repo_root, &format!("aegis-rollback-{task_id}")).await?;
        git::reset_hard(&self.repo_root, &checkpoint.vcs_commit).await?;

        let verify = self.verify(task_id).await?;
        if verify.poisoned {
            tracing::error!(task_id, "rollback left the tree poisoned, no further fallback");
            return Err(CheckpointError::RollbackFailed { task_id: task_id.to_string() });
        }

        Ok(RollbackOutcome {
            task_id: task_id.to_string(),
            restored_commit: checkpoint.vcs_commit,
            verify,
            reason: reason.to_string(),
        })
    }

    async fn compute_health(&self, files: &[String], baseline: Option<&BTreeMap<String, String>>) -> Result<HealthSignals, CheckpointError> {
        let vcs_clean = git::is_clean(&self.repo_root).await?;
        let scanned: Vec<String> = files.iter().cloned().chain(self.config.config_files.iter().cloned()).collect();

        Ok(HealthSignals {
            vcs_clean,
            syntax_valid: checks::syntax_valid(&self.repo_root, files),
            config_parseable: checks::config_parseable(&self.repo_root, &self.config.config_files),
            no_forbidden_patterns: checks::no_forbidden_patterns(&self.repo_root, &scanned, &self.config),
            index_valid: checks::index_valid(&self.repo_root, &self.config.index_file),
            critical_files_exist: checks::critical_files_exist(&self.repo_root, &self.config.critical_files),
            no_unexpected_deletions: checks::no_unexpected_deletions(&self.repo_root, baseline),
        })
    }

    fn append_history(&self, task_id: &str, result: &VerifyResult) -> Result<(), CheckpointError> {
        #[derive(serde::Serialize)]
        struct HistoryEntry<'a> {
            task_id: &'a str,
            verified_at: chrono::DateTime<Utc>,
            score: u8,
            poisoned: bool,
        }
        let entry = HistoryEntry { task_id, verified_at: Utc::now(), score: result.score, poisoned: result.poisoned };
        let path = self.history_path();
        let line = serde_json::to_string(&entry).map_err(|e| CheckpointError::Parse { path: path.clone(), source: e })?;
        aegis_fsutil::append_line(&path, &line).map_err(|e| CheckpointError::Io { path, source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn init_repo(dir: &std::path::Path) {
        for args in [vec!["init", "-q"], vec!["config", "user.email", "t@example.com"], vec!["config", "user.name", "t"]] {
            tokio::process::Command::new("git").current_dir(dir).args(&args).output().await.unwrap();
        }
    }

    async fn commit_all(dir: &std::path::Path, message: &str) {
        tokio::process::Command::new("git").current_dir(dir).args(["add", "."]).output().await.unwrap();
        tokio::process::Command::new("git").current_dir(dir).args(["commit", "-q", "-m", message]).output().await.unwrap();
    }

    #[tokio::test]
    async fn checkpoint_then_verify_on_unchanged_tree_matches_health_before() {
        let state_dir = tempfile::tempdir().unwrap();
        let repo_dir = tempfile::tempdir().unwrap();
        init_repo(repo_dir.path()).await;
        std::fs::write(repo_dir.path().join("critical.txt"), "safe").unwrap();
        commit_all(repo_dir.path(), "init").await;

        let config = CheckpointConfig { critical_files: vec!["critical.txt".to_string()], ..Default::default() };
        let manager = CheckpointManager::new(state_dir.path(), repo_dir.path(), config);

        let checkpoint = manager.checkpoint("t1", None).await.unwrap();
        let verify = manager.verify("t1").await.unwrap();

        assert_eq!(verify.details, checkpoint.health_before);
        assert!(!verify.poisoned);
    }

    #[tokio::test]
    async fn deleted_critical_file_poisons_and_rollback_restores_it() {
        let state_dir = tempfile::tempdir().unwrap();
        let repo_dir = tempfile::tempdir().unwrap();
        init_repo(repo_dir.path()).await;
        std::fs::write(repo_dir.path().join("critical.txt"), "safe").unwrap();
        commit_all(repo_dir.path(), "init").await;

        let config = CheckpointConfig { critical_files: vec!["critical.txt".to_string()], ..Default::default() };
        let manager = CheckpointManager::new(state_dir.path(), repo_dir.path(), config);
        manager.checkpoint("t2", None).await.unwrap();

        std::fs::remove_file(repo_dir.path().join("critical.txt")).unwrap();
        let verify = manager.verify("t2").await.unwrap();
        assert!(verify.poisoned);

        let outcome = manager.rollback("t2", "critical file deleted").await.unwrap();
        assert!(!outcome.verify.poisoned);
        assert!(repo_dir.path().join("critical.txt").exists());
    }

    #[tokio::test]
    async fn verify_without_a_prior_checkpoint_is_not_found() {
        let state_dir = tempfile::tempdir().unwrap();
        let repo_dir = tempfile::tempdir().unwrap();
        init_repo(repo_dir.path()).await;
        std::fs::write(repo_dir.path().join("a.txt"), "x").unwrap();
        commit_all(repo_dir.path(), "init").await;

        let manager = CheckpointManager::new(state_dir.path(), repo_dir.path(), CheckpointConfig::default());
        let err = manager.verify("nope").await.unwrap_err();
        assert!(matches!(err, CheckpointError::NotFound { .. }));
    }

    #[tokio::test]
    async fn extra_target_is_included_in_scanned_files() {
        let state_dir = tempfile::tempdir().unwrap();
        let repo_dir = tempfile::tempdir().unwrap();
        init_repo(repo_dir.path()).await;
        std::fs::write(repo_dir.path().join("skill.md"), "content").unwrap();
        commit_all(repo_dir.path(), "init").await;

        let manager = CheckpointManager::new(state_dir.path(), repo_dir.path(), CheckpointConfig::default());
        let checkpoint = manager.checkpoint("t3", Some("skill.md")).await.unwrap();
        assert!(checkpoint.file_hashes.contains_key("skill.md"));
    }
}
