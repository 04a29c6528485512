//! Runtime backend trait: the seam between the launch pipeline and the
//! external execution tools.
//!
//! Exactly one backend runs per launch; which one is a caller-level
//! configuration choice, never inferred from the image. The two variants have
//! very different mounting models: the namespace runtime interprets the
//! config document's mounts natively, while the emulation tracer only
//! understands a flattened bind table. `run` therefore takes the planned
//! table as an optional second argument and each backend declares whether it
//! needs one.

use crate::config::BundleConfig;
use crate::error::{Error, Result};
use crate::mounts::MountTable;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::debug;

/// A container execution backend.
#[async_trait]
pub trait RuntimeBackend: Send + Sync {
    /// Returns the backend name.
    fn name(&self) -> &str;

    /// Whether this backend consumes a planned mount table.
    fn needs_mount_table(&self) -> bool {
        false
    }

    /// Runs the bundle, blocking until the external runtime process exits,
    /// and propagates its exit status unchanged.
    ///
    /// Fails with [`Error::BackendLaunch`] if the external binary cannot be
    /// started, and with [`Error::BackendRuntime`] if the process ends
    /// without an exit code to propagate.
    async fn run(
        &self,
        bundle: &BundleConfig,
        mounts: Option<&MountTable>,
    ) -> Result<ExitStatus>;
}

/// Spawns a backend binary and waits for it.
///
/// Shared by both backends: stdio is inherited so the runtime's output and
/// diagnostics reach the user directly, and the child is killed if the
/// launcher is dropped mid-wait.
pub(crate) async fn run_backend_command(
    backend: &str,
    program: &Path,
    args: Vec<OsString>,
) -> Result<ExitStatus> {
    debug!("invoking {} backend: {} {:?}", backend, program.display(), args);

    let status = Command::new(program)
        .args(&args)
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|e| Error::BackendLaunch {
            backend: backend.to_string(),
            reason: format!("failed to run {}: {}", program.display(), e),
        })?;

    if status.code().is_none() {
        return Err(Error::BackendRuntime {
            backend: backend.to_string(),
            reason: format!("no exit code ({status})"),
        });
    }

    Ok(status)
}
