//! Costing Status Tool
//!
//! Provides runtime status information about the costing service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::conversion::density::known_density_count;
use crate::snapshot::Snapshot;

/// Runtime status of the costing service
#[derive(Debug, Clone, Serialize)]
pub struct BakecostStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Snapshot information
    pub snapshot_path: String,
    pub snapshot_size_bytes: Option<u64>,
    pub snapshot_loaded_at: String,
    pub ingredient_count: usize,
    pub recipe_count: usize,
    pub known_densities: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    snapshot_path: PathBuf,
    loaded_at: DateTime<Utc>,
}

impl StatusTracker {
    /// Create a new status tracker for a freshly loaded snapshot
    pub fn new(snapshot_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            snapshot_path,
            loaded_at: Utc::now(),
        }
    }

    /// Record that the snapshot was just reloaded
    pub fn mark_reloaded(&mut self) {
        self.loaded_at = Utc::now();
    }

    pub fn snapshot_path(&self) -> &PathBuf {
        &self.snapshot_path
    }

    /// Get the current status
    pub fn get_status(&self, snapshot: &Snapshot) -> BakecostStatus {
        let build_info = BuildInfo::current();

        let snapshot_size_bytes = std::fs::metadata(&self.snapshot_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        BakecostStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            snapshot_path: self.snapshot_path.display().to_string(),
            snapshot_size_bytes,
            snapshot_loaded_at: self.loaded_at.to_rfc3339(),
            ingredient_count: snapshot.ingredient_count(),
            recipe_count: snapshot.recipe_count(),
            known_densities: known_density_count(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_counts_and_missing_file() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/snapshot.json"));
        let status = tracker.get_status(&Snapshot::default());

        assert_eq!(status.ingredient_count, 0);
        assert_eq!(status.recipe_count, 0);
        assert_eq!(status.snapshot_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert!(status.known_densities > 0);
    }

    #[test]
    fn test_mark_reloaded_advances_load_time() {
        let mut tracker = StatusTracker::new(PathBuf::from("snapshot.json"));
        let first = tracker.loaded_at;
        tracker.mark_reloaded();
        assert!(tracker.loaded_at >= first);
    }
}
