//! Bundle unpacking via an external unpack tool.
//!
//! An umoci-style tool turns a local OCI layout into a runtime bundle: a
//! directory holding a `rootfs/` tree and a `config.json` document. The
//! launcher only guarantees the invocation; rootless extraction mechanics
//! (uid shifting, xattr handling) belong to the tool.

use crate::constants::DEFAULT_UNPACK_PROGRAM;
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Invokes the external bundle unpack tool.
pub struct BundleUnpacker {
    program: PathBuf,
}

impl BundleUnpacker {
    /// Creates an unpacker invoking the default tool.
    pub fn new() -> Self {
        Self::with_program(DEFAULT_UNPACK_PROGRAM)
    }

    /// Creates an unpacker invoking a specific binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command-line arguments for unpacking `image` into `bundle_dir`.
    pub fn argv(&self, image: &str, bundle_dir: &Path) -> Vec<OsString> {
        vec![
            OsString::from("unpack"),
            OsString::from("--rootless"),
            OsString::from("--image"),
            OsString::from(image),
            bundle_dir.as_os_str().to_os_string(),
        ]
    }

    /// Unpacks the fetched layout into a runtime bundle at `bundle_dir`.
    ///
    /// Blocks until the tool exits; its diagnostics pass through untouched.
    /// A failed unpack leaves whatever the tool wrote in place; the fetched
    /// layout stays cached for a later retry.
    pub async fn unpack(&self, image: &str, bundle_dir: &Path) -> Result<()> {
        debug!("unpacking {} into {}", image, bundle_dir.display());
        let status = Command::new(&self.program)
            .args(self.argv(image, bundle_dir))
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| Error::Unpack {
                bundle: bundle_dir.to_path_buf(),
                reason: format!("failed to run {}: {}", self.program.display(), e),
            })?;

        if !status.success() {
            return Err(Error::Unpack {
                bundle: bundle_dir.to_path_buf(),
                reason: format!("{} exited with {}", self.program.display(), status),
            });
        }

        info!("unpacked bundle at {}", bundle_dir.display());
        Ok(())
    }
}

impl Default for BundleUnpacker {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true if a bundle already exists at `dir`.
///
/// Existence of the directory is the whole check; a previously unpacked
/// container is reused without re-unpacking.
pub fn bundle_exists(dir: &Path) -> bool {
    dir.exists()
}
