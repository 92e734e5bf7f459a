//! Typed error taxonomy for the recipe pipeline.
//!
//! These errors travel inside `anyhow::Error`; callers that need to
//! distinguish them (tests, exit-code mapping) use `downcast_ref`.

use std::path::PathBuf;
use std::process::ExitStatus;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

/// The external configure step exited with a non-zero status.
///
/// Raised only after descriptor restoration has been attempted; a failed
/// configure never leaves the source tree modified.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("cmake configure failed ({status})")]
#[diagnostic(
    code(slipway::orchestrate::configure_failed),
    help("Re-run with --verbose to see the full cmake invocation")
)]
pub struct ConfigureFailed {
    pub status: ExitStatus,
    pub stderr: String,
}

/// The swap-restore step could not return the source tree to its original
/// state. Fatal; the tree is inconsistent and must be repaired by hand.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("source tree left inconsistent: expected {expected}, found {found}")]
#[diagnostic(
    code(slipway::orchestrate::restore_failed),
    severity(Error),
    help("Restore the build descriptor from the backup file manually before retrying")
)]
pub struct RestoreFailure {
    /// The file state the restore step expected to find.
    pub expected: String,
    /// What was actually on disk.
    pub found: String,
}

/// A declared artifact's source path was missing at packaging time.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("cannot package `{artifact}`: {} does not exist", source_path.display())]
#[diagnostic(
    code(slipway::package::copy_failed),
    help("Check the `exports` list in Recipe.toml against the source tree")
)]
pub struct ArtifactCopy {
    pub artifact: String,
    pub source_path: PathBuf,
}

/// Another orchestration run already holds the source tree.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("source tree is locked by another orchestration run: {}", lock_path.display())]
#[diagnostic(
    code(slipway::orchestrate::tree_locked),
    help("Wait for the other run to finish before retrying")
)]
pub struct TreeLocked {
    pub lock_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_survive_anyhow_downcast() {
        let err: anyhow::Error = ArtifactCopy {
            artifact: "LICENSE".to_string(),
            source_path: PathBuf::from("/src/LICENSE"),
        }
        .into();

        let copy = err.downcast_ref::<ArtifactCopy>().unwrap();
        assert_eq!(copy.artifact, "LICENSE");
        assert!(err.to_string().contains("cannot package"));
    }

    #[test]
    fn test_restore_failure_names_both_states() {
        let err = RestoreFailure {
            expected: "backup CMakeLists.txt.orig present".to_string(),
            found: "backup missing".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("expected backup CMakeLists.txt.orig present"));
        assert!(msg.contains("found backup missing"));
    }
}
