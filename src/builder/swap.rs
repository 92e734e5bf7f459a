//! Descriptor swap guard and single-run source-tree lock.
//!
//! Orchestration temporarily replaces the project's `CMakeLists.txt` with a
//! minimal variant. The swap is modeled as a scoped acquisition: engaging
//! the guard performs the swap, and the original descriptor is put back on
//! every exit path. The explicit [`DescriptorSwap::restore`] call reports
//! failures; `Drop` is the backstop for panics and early returns.

use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::core::layout::DESCRIPTOR_NAME;
use crate::util::diagnostic::{RestoreFailure, TreeLocked};
use crate::util::fs::write_string;

/// Backup name the original descriptor is parked under during configure.
pub const BACKUP_NAME: &str = "CMakeLists.txt.orig";

/// Name the synthesized minimal descriptor is staged and restored under.
/// The file only exists while a swap cycle is in flight.
pub const MINIMAL_NAME: &str = "CMakeLists.minimal.txt";

/// Lock file enforcing one orchestration run per source tree.
pub const LOCK_NAME: &str = ".slipway.lock";

/// Mutual-exclusion guard for a source tree.
///
/// The descriptor is a shared mutable resource with exactly one legitimate
/// writer per run; an exclusive advisory lock on the lock file turns that
/// caller obligation into an enforced invariant. The OS releases the lock
/// when the holder exits, so a killed run never wedges the tree. Released
/// on drop.
#[derive(Debug)]
pub struct SourceTreeLock {
    file: File,
    path: PathBuf,
}

impl SourceTreeLock {
    /// Acquire the lock, failing with [`TreeLocked`] if another run holds it.
    pub fn acquire(source_folder: &Path) -> Result<SourceTreeLock> {
        let path = source_folder.join(LOCK_NAME);
        let file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("failed to open lock: {}", path.display()))?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(SourceTreeLock { file, path }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Err(TreeLocked { lock_path: path }.into())
            }
            Err(e) => Err(e).with_context(|| format!("failed to lock: {}", path.display())),
        }
    }
}

impl Drop for SourceTreeLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("failed to unlock {}: {}", self.path.display(), e);
        }
    }
}

/// Scoped swap of the build descriptor.
///
/// Engaging renames `CMakeLists.txt` to [`BACKUP_NAME`] and installs the
/// synthesized minimal descriptor in its place. Restoring reverses both
/// renames and deletes the transient minimal file.
#[derive(Debug)]
pub struct DescriptorSwap {
    source_folder: PathBuf,
    restored: bool,
}

impl DescriptorSwap {
    /// Perform the swap: stage the minimal descriptor, park the original
    /// under the backup name, move the minimal one into place.
    pub fn engage(source_folder: &Path, minimal_text: &str) -> Result<DescriptorSwap> {
        let descriptor = source_folder.join(DESCRIPTOR_NAME);
        let backup = source_folder.join(BACKUP_NAME);
        let minimal = source_folder.join(MINIMAL_NAME);

        if !descriptor.exists() {
            anyhow::bail!("no {} in {}", DESCRIPTOR_NAME, source_folder.display());
        }

        write_string(&minimal, minimal_text)?;

        fs::rename(&descriptor, &backup).with_context(|| {
            format!("failed to park descriptor as {}", backup.display())
        })?;
        if let Err(e) = fs::rename(&minimal, &descriptor) {
            // Undo the first rename so a failed engage never leaves the
            // tree without its descriptor.
            let _ = fs::rename(&backup, &descriptor);
            let _ = fs::remove_file(&minimal);
            return Err(e).with_context(|| {
                format!("failed to install minimal descriptor at {}", descriptor.display())
            });
        }

        tracing::debug!("descriptor swapped in {}", source_folder.display());
        Ok(DescriptorSwap {
            source_folder: source_folder.to_path_buf(),
            restored: false,
        })
    }

    /// Undo the swap, returning the tree to its pre-engage state.
    ///
    /// Must be called on success and failure paths alike; a failed
    /// configure is only surfaced after this has run.
    pub fn restore(mut self) -> Result<()> {
        let result = self.restore_inner();
        self.restored = true;
        result.map_err(Into::into)
    }

    fn restore_inner(&self) -> Result<(), RestoreFailure> {
        let descriptor = self.source_folder.join(DESCRIPTOR_NAME);
        let backup = self.source_folder.join(BACKUP_NAME);
        let minimal = self.source_folder.join(MINIMAL_NAME);

        if !backup.exists() {
            return Err(RestoreFailure {
                expected: format!("backup {} present", backup.display()),
                found: "backup missing".to_string(),
            });
        }

        // Move the swapped-in minimal descriptor aside. Its absence is
        // tolerated (a crashed configure may have eaten it); the backup
        // coming home is what matters.
        if descriptor.exists() {
            fs::rename(&descriptor, &minimal).map_err(|e| RestoreFailure {
                expected: format!("{} movable to {}", descriptor.display(), minimal.display()),
                found: format!("rename failed: {}", e),
            })?;
        }

        fs::rename(&backup, &descriptor).map_err(|e| RestoreFailure {
            expected: format!("{} movable to {}", backup.display(), descriptor.display()),
            found: format!("rename failed: {}", e),
        })?;

        // The minimal descriptor never outlives the orchestration cycle.
        let _ = fs::remove_file(&minimal);

        tracing::debug!("descriptor restored in {}", self.source_folder.display());
        Ok(())
    }
}

impl Drop for DescriptorSwap {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.restore_inner() {
            tracing::error!(
                "descriptor restore failed during unwind in {}: {}",
                self.source_folder.display(),
                e
            );
        }
    }
}
