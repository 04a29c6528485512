//! Ptrace emulation backend.
//!
//! Invokes an external ptrace-based tracer (proot-compatible) that simulates
//! a chroot and mount view by rewriting the syscalls of an unprivileged
//! process. The tracer never reads the config document's mount semantics:
//! it receives the rootfs path, the working directory, one bind flag per
//! planned mount table entry, and the process args to execute.

use crate::config::BundleConfig;
use crate::constants::DEFAULT_EMULATION_PROGRAM;
use crate::error::{Error, Result};
use crate::mounts::MountTable;
use crate::runtime::{RuntimeBackend, run_backend_command};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitStatus;
use tracing::info;

/// Ptrace-based execution backend.
pub struct EmulationBackend {
    program: PathBuf,
}

impl EmulationBackend {
    /// Creates a backend invoking the default tracer binary.
    pub fn new() -> Self {
        Self::with_program(DEFAULT_EMULATION_PROGRAM)
    }

    /// Creates a backend invoking a specific binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command-line arguments for running `bundle` with `mounts`.
    pub fn argv(&self, bundle: &BundleConfig, mounts: &MountTable) -> Vec<OsString> {
        let mut argv = vec![
            OsString::from("-r"),
            bundle.rootfs_path().into_os_string(),
            OsString::from("-w"),
            OsString::from(&bundle.spec.process.cwd),
        ];
        for (destination, source) in mounts.iter() {
            argv.push(OsString::from("-b"));
            argv.push(OsString::from(format!("{source}:{destination}")));
        }
        argv.extend(bundle.spec.process.args.iter().map(OsString::from));
        argv
    }
}

impl Default for EmulationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RuntimeBackend for EmulationBackend {
    fn name(&self) -> &str {
        "emulation"
    }

    fn needs_mount_table(&self) -> bool {
        true
    }

    async fn run(&self, bundle: &BundleConfig, mounts: Option<&MountTable>) -> Result<ExitStatus> {
        let mounts = mounts.ok_or_else(|| Error::BackendLaunch {
            backend: self.name().to_string(),
            reason: "emulation backend requires a planned mount table".to_string(),
        })?;

        info!(
            "running bundle {} in emulation runtime ({} binds)",
            bundle.root_path().display(),
            mounts.len()
        );
        run_backend_command(self.name(), &self.program, self.argv(bundle, mounts)).await
    }
}
