//! Minimal VCS shell-out. Every call runs `git` as a subprocess with an
//! explicit argument vector (never through a shell), so there is nothing
//! here that a crafted commit message or branch name could inject into.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to spawn git in {repo_root}: {source}")]
    Spawn {
        repo_root: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("git {args} failed in {repo_root}: {stderr}")]
    CommandFailed { repo_root: std::path::PathBuf, args: String, stderr: String },

    #[error("git output in {repo_root} was not valid UTF-8")]
    NotUtf8 { repo_root: std::path::PathBuf },
}

async fn run(repo_root: &Path, args: &[&str]) -> Result<String, GitError> {
    let output = tokio::process::Command::new("git")
        .current_dir(repo_root)
        .args(args)
        .output()
        .await
        .map_err(|e| GitError::Spawn { repo_root: repo_root.to_path_buf(), source: e })?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            repo_root: repo_root.to_path_buf(),
            args: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout)
        .map(|s| s.trim().to_string())
        .map_err(|_| GitError::NotUtf8 { repo_root: repo_root.to_path_buf() })
}

pub async fn current_commit(repo_root: &Path) -> Result<String, GitError> {
    run(repo_root, &["rev-parse", "HEAD"]).await
}

pub async fn current_branch(repo_root: &Path) -> Result<String, GitError> {
    run(repo_root, &["rev-parse", "--abbrev-ref", "HEAD"]).await
}

/// `git status --porcelain` is empty iff the working tree has no staged or
/// unstaged changes and no untracked files.
pub async fn is_clean(repo_root: &Path) -> Result<bool, GitError> {
    let status = run(repo_root, &["status", "--porcelain"]).await?;
    Ok(status.is_empty())
}

/// Stash everything, including untracked files, under a recognizable
/// message. A clean tree makes this a no-op (`git stash` exits 0 with
/// nothing to stash), which is what a pre-rollback snapshot should do.
pub async fn stash_push(repo_root: &Path, message: &str) -> Result<(), GitError> {
    run(repo_root, &["stash", "push", "-u", "-m", message]).await?;
    Ok(())
}

pub async fn reset_hard(repo_root: &Path, commit: &str) -> Result<(), GitError> {
    run(repo_root, &["reset", "--hard", commit]).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn init_repo(dir: &Path) {
        run(dir, &["init", "-q"]).await.unwrap();
        run(dir, &["config", "user.email", "test@example.com"]).await.unwrap();
        run(dir, &["config", "user.name", "test"]).await.unwrap();
    }

    #[tokio::test]
    async fn clean_repo_reports_clean_and_resolves_head() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path()).await;
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();
        run(dir.path(), &["add", "."]).await.unwrap();
        run(dir.path(), &["commit", "-q", "-m", "init"]).await.unwrap();

        assert!(is_clean(dir.path()).await.unwrap());
        let commit = current_commit(dir.path()).await.unwrap();
        assert_eq!(commit.len(), 40);
    }

    #[tokio::test]
    async fn dirty_tree_reports_not_clean() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path()).await;
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();
        run(dir.path(), &["add", "."]).await.unwrap();
        run(dir.path(), &["commit", "-q", "-m", "init"]).await.unwrap();

        std::fs::write(dir.path().join("a.txt"), "changed").unwrap();
        assert!(!is_clean(dir.path()).await.unwrap());
    }

    #[tokio::test]
    async fn reset_hard_restores_committed_content() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path()).await;
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();
        run(dir.path(), &["add", "."]).await.unwrap();
        run(dir.path(), &["commit", "-q", "-m", "init"]).await.unwrap();
        let commit = current_commit(dir.path()).await.unwrap();

        std::fs::write(dir.path().join("a.txt"), "tampered").unwrap();
        run(dir.path(), &["add", "."]).await.unwrap();
        run(dir.path(), &["commit", "-q", "-m", "bad"]).await.unwrap();

        reset_hard(dir.path(), &commit).await.unwrap();
        let content = std::fs::read_to_string(dir.path().join("a.txt")).unwrap();
        assert_eq!(content, "hello");
    }

    #[tokio::test]
    async fn command_failure_surfaces_stderr() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path()).await;
        let err = current_commit(dir.path()).await.unwrap_err();
        assert!(matches!(err, GitError::CommandFailed { .. }));
    }
}
