//! Namespace runtime backend.
//!
//! Invokes an external namespace-based OCI runtime (runc-compatible) on the
//! transformed bundle. No mount translation happens here: the external tool
//! receives the whole config document and interprets every declared mount
//! natively. The runtime's state directory is explicit configuration passed
//! through `--root`.

use crate::config::BundleConfig;
use crate::constants::DEFAULT_NAMESPACE_PROGRAM;
use crate::error::Result;
use crate::mounts::MountTable;
use crate::runtime::{RuntimeBackend, run_backend_command};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitStatus;
use tracing::info;

/// Namespace-based execution backend.
pub struct NamespaceBackend {
    program: PathBuf,
    state_dir: PathBuf,
}

impl NamespaceBackend {
    /// Creates a backend invoking the default runtime binary.
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self::with_program(DEFAULT_NAMESPACE_PROGRAM, state_dir)
    }

    /// Creates a backend invoking a specific binary.
    pub fn with_program(program: impl Into<PathBuf>, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            state_dir: state_dir.into(),
        }
    }

    /// Command-line arguments for running `bundle`.
    ///
    /// The bundle root path serves as both the container identifier and the
    /// bundle argument.
    pub fn argv(&self, bundle: &BundleConfig) -> Vec<OsString> {
        vec![
            OsString::from("--root"),
            self.state_dir.as_os_str().to_os_string(),
            OsString::from("run"),
            bundle.root_path().as_os_str().to_os_string(),
            OsString::from("--bundle"),
            bundle.root_path().as_os_str().to_os_string(),
        ]
    }
}

#[async_trait]
impl RuntimeBackend for NamespaceBackend {
    fn name(&self) -> &str {
        "namespace"
    }

    async fn run(
        &self,
        bundle: &BundleConfig,
        _mounts: Option<&MountTable>,
    ) -> Result<ExitStatus> {
        info!(
            "running bundle {} in namespace runtime",
            bundle.root_path().display()
        );
        run_backend_command(self.name(), &self.program, self.argv(bundle)).await
    }
}
