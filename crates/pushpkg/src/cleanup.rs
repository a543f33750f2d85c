//! Staging directory reaper.
//!
//! Packaging never deletes its own output. Long-running services call
//! [`reap_staging`] periodically to remove staging directories and archives
//! older than a chosen age.

use crate::package::STAGING_PREFIX;
use crate::Result;
use log::{info, warn};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

/// Outcome of one [`reap_staging`] pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReapReport {
    pub removed_dirs: usize,
    pub removed_archives: usize,
    pub failed: usize,
}

/// Remove `pushPackage_*` directories and archives under `temp_root` older than `max_age`.
///
/// Only direct children of `temp_root` carrying the staging prefix are
/// considered. Entries that cannot be removed are logged and counted in
/// [`ReapReport::failed`]. A missing `temp_root` yields an empty report.
pub fn reap_staging(temp_root: &Path, max_age: Duration) -> Result<ReapReport> {
    let mut report = ReapReport::default();

    if !temp_root.exists() {
        return Ok(report);
    }

    let now = SystemTime::now();

    for entry in WalkDir::new(temp_root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = entry.map_err(|e| std::io::Error::other(format!("Failed to walk directory: {e}")))?;

        if !entry.file_name().to_string_lossy().starts_with(STAGING_PREFIX) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("cannot stat {}: {e}", entry.path().display());
                report.failed += 1;
                continue;
            }
        };

        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();
        if age < max_age {
            continue;
        }

        let path = entry.path();
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(path).map(|()| report.removed_dirs += 1)
        } else {
            fs::remove_file(path).map(|()| report.removed_archives += 1)
        };

        if let Err(e) = removed {
            warn!("failed to remove {}: {e}", path.display());
            report.failed += 1;
        }
    }

    if report.removed_dirs + report.removed_archives > 0 {
        info!(
            "reaped {} staging directories and {} archives under {}",
            report.removed_dirs,
            report.removed_archives,
            temp_root.display()
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{archive_path_for, create_staging_directory};
    use tempfile::TempDir;

    fn populate(root: &Path) -> std::path::PathBuf {
        let staging = create_staging_directory(root).unwrap();
        fs::write(staging.join("website.json"), b"{}").unwrap();
        fs::write(archive_path_for(&staging), b"PK").unwrap();
        fs::write(root.join("unrelated.txt"), b"keep").unwrap();
        staging
    }

    #[test]
    fn test_reap_removes_expired_staging_only() {
        let temp_dir = TempDir::new().unwrap();
        let staging = populate(temp_dir.path());

        let report = reap_staging(temp_dir.path(), Duration::ZERO).unwrap();
        assert_eq!(
            report,
            ReapReport {
                removed_dirs: 1,
                removed_archives: 1,
                failed: 0
            }
        );
        assert!(!staging.exists());
        assert!(!archive_path_for(&staging).exists());
        assert!(temp_dir.path().join("unrelated.txt").exists());
    }

    #[test]
    fn test_reap_keeps_fresh_entries() {
        let temp_dir = TempDir::new().unwrap();
        let staging = populate(temp_dir.path());

        let report = reap_staging(temp_dir.path(), Duration::from_secs(3600)).unwrap();
        assert_eq!(report, ReapReport::default());
        assert!(staging.exists());
    }

    #[test]
    fn test_reap_missing_root_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let report = reap_staging(&temp_dir.path().join("absent"), Duration::ZERO).unwrap();
        assert_eq!(report, ReapReport::default());
    }
}
