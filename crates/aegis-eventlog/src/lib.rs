//! Best-effort, append-only JSON event logging.
//!
//! Events are written one-per-file under `<root>/<YYYY>/<MM>/` with a
//! filename of `{kind}-{slug}-{ts}.jsonl`. Writes never propagate failure
//! to the caller: a component that can't record an event should not fail
//! its primary operation because of it. At-least-once semantics are
//! acceptable — retention and deduplication are external policy.

mod event;
mod slug;

pub use event::{Event, Severity};

use std::path::{Path, PathBuf};

use chrono::Utc;

/// A sink that writes typed events to `root` using the `YYYY/MM/` layout.
#[derive(Clone, Debug)]
pub struct EventLog {
    root: PathBuf,
}

impl EventLog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist `event`. Returns the path written on success. Any IO error
    /// is logged and swallowed — the caller always gets a clean return.
    pub fn emit(&self, event: &Event) -> Option<PathBuf> {
        match self.try_emit(event) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, kind = %event.kind, "event log write failed, dropping event");
                None
            }
        }
    }

    fn try_emit(&self, event: &Event) -> std::io::Result<PathBuf> {
        let ts = event.timestamp;
        let dir = self
            .root
            .join(format!("{:04}", ts.format("%Y")))
            .join(format!("{:02}", ts.format("%m")));

        let slug = slug::slugify(&event.summary_source());
        let filename = format!(
            "{}-{}-{}.jsonl",
            sanitize_component(&event.kind),
            slug,
            ts.timestamp_millis()
        );
        let path = dir.join(filename);

        let line = serde_json::to_string(event)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        aegis_fsutil::append_line(&path, &line)?;
        Ok(path)
    }
}

/// Event kinds may come from arbitrary callers; keep filenames filesystem-safe.
fn sanitize_component(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

/// Current-day path an event emitted right now would land under, useful
/// for callers that want to read back what they just wrote in tests.
pub fn month_dir(root: &Path, at: chrono::DateTime<Utc>) -> PathBuf {
    root.join(format!("{:04}", at.format("%Y")))
        .join(format!("{:02}", at.format("%m")))
}
