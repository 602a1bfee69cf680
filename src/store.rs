//! Per-report artifact storage.
//!
//! Every upload gets a fresh UUID directory under the configured output
//! root, so concurrent requests can never clobber each other's charts.
//! Lookups are doubly restricted: the report id must parse as a UUID
//! (which rules out path traversal outright) and the filename must be
//! one of the fixed artifact names — anything else is treated as
//! missing, not served.
//!
//! Retention is enforced by [`ReportStore::sweep_expired`], which runs
//! at the start of every upload: report directories whose modification
//! time is older than the retention window are deleted.

use crate::config::ServerConfig;
use crate::error::Doc2ChartError;
use crate::report::ARTIFACTS;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};
use uuid::Uuid;

/// Allocates, resolves, and expires per-report directories.
#[derive(Debug, Clone)]
pub struct ReportStore {
    root: PathBuf,
    retention: Duration,
}

impl ReportStore {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            root: config.output_root.clone(),
            retention: config.retention,
        }
    }

    /// Root directory holding all report directories.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Allocate a fresh report id and create its directory.
    pub fn create_report_dir(&self) -> Result<(String, PathBuf), Doc2ChartError> {
        let id = Uuid::new_v4().to_string();
        let dir = self.root.join(&id);
        std::fs::create_dir_all(&dir).map_err(|e| Doc2ChartError::OutputWriteFailed {
            path: dir.clone(),
            source: e,
        })?;
        debug!("Created report directory {}", dir.display());
        Ok((id, dir))
    }

    /// Resolve an artifact path, or `None` when the id is not a UUID,
    /// the filename is not a known artifact, or the file does not exist.
    pub fn artifact_path(&self, report_id: &str, filename: &str) -> Option<PathBuf> {
        if Uuid::parse_str(report_id).is_err() {
            return None;
        }
        if !ARTIFACTS.contains(&filename) {
            return None;
        }
        let path = self.root.join(report_id).join(filename);
        path.is_file().then_some(path)
    }

    /// Delete report directories older than the retention window.
    /// Returns how many were removed. I/O failures are logged, never
    /// propagated — an expired report that survives one sweep gets the
    /// next one.
    pub fn sweep_expired(&self) -> usize {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            // Root not created yet means nothing to sweep.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!("Sweep: cannot read {}: {e}", self.root.display());
                return 0;
            }
        };

        let now = SystemTime::now();
        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let expired = entry
                .metadata()
                .and_then(|m| m.modified())
                .map(|mtime| {
                    now.duration_since(mtime)
                        .map(|age| age > self.retention)
                        .unwrap_or(false)
                })
                .unwrap_or(false);
            if expired {
                match std::fs::remove_dir_all(&path) {
                    Ok(()) => {
                        debug!("Swept expired report {}", path.display());
                        removed += 1;
                    }
                    Err(e) => warn!("Sweep: cannot remove {}: {e}", path.display()),
                }
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &std::path::Path, retention: Duration) -> ReportStore {
        let config = ServerConfig::builder()
            .output_root(dir)
            .retention(retention)
            .build()
            .unwrap();
        ReportStore::new(&config)
    }

    #[test]
    fn create_and_resolve_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path(), Duration::from_secs(3600));
        let (id, dir) = store.create_report_dir().unwrap();
        std::fs::write(dir.join("pie_chart.png"), b"png").unwrap();

        assert!(store.artifact_path(&id, "pie_chart.png").is_some());
        // Known name, file not yet written.
        assert!(store.artifact_path(&id, "data.xlsx").is_none());
    }

    #[test]
    fn non_manifest_names_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path(), Duration::from_secs(3600));
        let (id, dir) = store.create_report_dir().unwrap();
        std::fs::write(dir.join("secret.txt"), b"no").unwrap();

        assert!(store.artifact_path(&id, "secret.txt").is_none());
        assert!(store.artifact_path(&id, "../pie_chart.png").is_none());
    }

    #[test]
    fn non_uuid_ids_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path(), Duration::from_secs(3600));
        std::fs::create_dir_all(tmp.path().join("..-escape")).ok();

        assert!(store.artifact_path("not-a-uuid", "pie_chart.png").is_none());
        assert!(store.artifact_path("..", "pie_chart.png").is_none());
    }

    #[test]
    fn sweep_removes_only_expired_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path(), Duration::from_secs(1));
        let (old_id, _old_dir) = store.create_report_dir().unwrap();

        // Let the first directory age past the 1-second retention floor,
        // then create a fresh one that must survive the sweep.
        std::thread::sleep(Duration::from_millis(1200));
        let (new_id, _new_dir) = store.create_report_dir().unwrap();

        let removed = store.sweep_expired();
        assert_eq!(removed, 1);
        assert!(!tmp.path().join(&old_id).exists());
        assert!(tmp.path().join(&new_id).exists());
    }

    #[test]
    fn sweep_of_missing_root_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp.path().join("never-created"), Duration::from_secs(1));
        assert_eq!(store.sweep_expired(), 0);
    }
}
