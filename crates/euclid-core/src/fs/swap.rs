//! Staged directory replacement
//!
//! A component directory is never written in place. Content is extracted into
//! a staging sibling and then swapped in with renames:
//!
//! 1. `dst` → `.dst.euclid-old` (only if `dst` exists)
//! 2. `.dst.euclid-staging` → `dst`
//! 3. remove `.dst.euclid-old`
//!
//! Every sibling lives in the same parent directory as `dst`, so each step is a
//! same-filesystem rename. A crash before step 1 leaves `dst` untouched; a crash
//! between steps 1 and 2 is rolled back by [`recover`] on the next run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, warn};

const STAGING_SUFFIX: &str = "euclid-staging";
const BACKUP_SUFFIX: &str = "euclid-old";

pub fn staging_path(dst_dir: &Path) -> anyhow::Result<PathBuf> {
    sibling_path(dst_dir, STAGING_SUFFIX)
}

pub fn backup_path(dst_dir: &Path) -> anyhow::Result<PathBuf> {
    sibling_path(dst_dir, BACKUP_SUFFIX)
}

/// Undo the leftovers of an interrupted swap for `dst_dir`.
///
/// Restores the backup when the swap stopped after moving the old content
/// aside, drops a stale backup when it did not, and clears any staging
/// directory.
pub fn recover(dst_dir: &Path) -> anyhow::Result<()> {
    let backup = backup_path(dst_dir)?;
    if backup.exists() {
        if dst_dir.exists() {
            debug!(path = %backup.display(), "Removing stale backup");
            remove_path(&backup)
                .with_context(|| format!("Failed to remove stale backup: {}", backup.display()))?;
        } else {
            warn!(path = %dst_dir.display(), "Restoring content from interrupted swap");
            fs::rename(&backup, dst_dir).with_context(|| {
                format!(
                    "Failed to restore {} from {}",
                    dst_dir.display(),
                    backup.display()
                )
            })?;
        }
    }

    let staging = staging_path(dst_dir)?;
    if staging.exists() {
        debug!(path = %staging.display(), "Removing stale staging directory");
        remove_path(&staging).with_context(|| {
            format!("Failed to remove staging directory: {}", staging.display())
        })?;
    }
    Ok(())
}

/// Swap a fully populated `staging_dir` into place as `dst_dir`.
pub fn swap_into_place(staging_dir: &Path, dst_dir: &Path) -> anyhow::Result<()> {
    let backup = backup_path(dst_dir)?;
    let had_previous = dst_dir.exists();

    if had_previous {
        fs::rename(dst_dir, &backup).with_context(|| {
            format!(
                "Failed to move existing {} aside to {}",
                dst_dir.display(),
                backup.display()
            )
        })?;
    }

    if let Err(err) = fs::rename(staging_dir, dst_dir) {
        if had_previous {
            // Put the old content back before reporting.
            if let Err(restore_err) = fs::rename(&backup, dst_dir) {
                warn!(
                    path = %dst_dir.display(),
                    error = %restore_err,
                    "Failed to restore previous content; it remains at the backup path"
                );
            }
        }
        return Err(anyhow::Error::new(err).context(format!(
            "Failed to move staging {} into {}",
            staging_dir.display(),
            dst_dir.display()
        )));
    }

    if had_previous && let Err(err) = remove_path(&backup) {
        warn!(path = %backup.display(), error = %err, "Failed to remove previous content");
    }
    Ok(())
}

pub fn remove_path(path: &Path) -> std::io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn sibling_path(dst_dir: &Path, suffix: &str) -> anyhow::Result<PathBuf> {
    let parent = dst_dir
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Destination path has no parent: {}", dst_dir.display()))?;
    let base = dst_dir.file_name().ok_or_else(|| {
        anyhow::anyhow!("Destination path has no filename: {}", dst_dir.display())
    })?;
    Ok(parent.join(format!(".{}.{}", base.to_string_lossy(), suffix)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn populated(dir: &Path, file: &str, content: &str) {
        fs::create_dir_all(dir).expect("create_dir_all should succeed");
        fs::write(dir.join(file), content).expect("write should succeed");
    }

    #[test]
    fn swap_installs_fresh_directory() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let dst = tmp.path().join("core");
        let staging = staging_path(&dst).unwrap();
        populated(&staging, "mod.jar", "v1");

        swap_into_place(&staging, &dst).expect("swap should succeed");

        assert_eq!(fs::read_to_string(dst.join("mod.jar")).unwrap(), "v1");
        assert!(!staging.exists());
        assert!(!backup_path(&dst).unwrap().exists());
    }

    #[test]
    fn swap_replaces_previous_content_entirely() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let dst = tmp.path().join("core");
        populated(&dst, "old.jar", "v1");
        let staging = staging_path(&dst).unwrap();
        populated(&staging, "new.jar", "v2");

        swap_into_place(&staging, &dst).expect("swap should succeed");

        assert!(!dst.join("old.jar").exists());
        assert_eq!(fs::read_to_string(dst.join("new.jar")).unwrap(), "v2");
        assert!(!backup_path(&dst).unwrap().exists());
    }

    #[test]
    fn failed_swap_restores_previous_content() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let dst = tmp.path().join("core");
        populated(&dst, "old.jar", "v1");
        let missing_staging = tmp.path().join("does-not-exist");

        assert!(swap_into_place(&missing_staging, &dst).is_err());

        assert_eq!(fs::read_to_string(dst.join("old.jar")).unwrap(), "v1");
    }

    #[test]
    fn recover_restores_backup_when_destination_missing() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let dst = tmp.path().join("core");
        let backup = backup_path(&dst).unwrap();
        populated(&backup, "old.jar", "v1");

        recover(&dst).expect("recover should succeed");

        assert_eq!(fs::read_to_string(dst.join("old.jar")).unwrap(), "v1");
        assert!(!backup.exists());
    }

    #[test]
    fn recover_clears_stale_staging_and_backup() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let dst = tmp.path().join("core");
        populated(&dst, "current.jar", "v2");
        let staging = staging_path(&dst).unwrap();
        populated(&staging, "partial.jar", "half");
        let backup = backup_path(&dst).unwrap();
        populated(&backup, "old.jar", "v1");

        recover(&dst).expect("recover should succeed");

        assert!(!staging.exists());
        assert!(!backup.exists());
        assert_eq!(fs::read_to_string(dst.join("current.jar")).unwrap(), "v2");
    }

    #[test]
    fn sibling_paths_share_parent() {
        let dst = Path::new("/games/mods/core");
        assert_eq!(
            staging_path(dst).unwrap(),
            PathBuf::from("/games/mods/.core.euclid-staging")
        );
        assert_eq!(
            backup_path(dst).unwrap(),
            PathBuf::from("/games/mods/.core.euclid-old")
        );
    }
}
