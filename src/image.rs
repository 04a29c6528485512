//! Image fetching via an external copy tool.
//!
//! The launcher does not speak the registry protocol itself. A skopeo-style
//! tool is invoked to guarantee that a content-addressed OCI layout for the
//! reference exists on local disk, or to fail. The layout is named after the
//! reference, which the unpack tool parses the same way (`path[:tag]`), so
//! the reference string doubles as the layout handle downstream.

use crate::constants::{DEFAULT_FETCH_PROGRAM, validate_image_reference};
use crate::error::{Error, Result};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

/// Invokes the external image fetch tool.
pub struct ImageFetcher {
    program: PathBuf,
}

impl ImageFetcher {
    /// Creates a fetcher invoking the default tool.
    pub fn new() -> Self {
        Self::with_program(DEFAULT_FETCH_PROGRAM)
    }

    /// Creates a fetcher invoking a specific binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command-line arguments for fetching `reference`.
    pub fn argv(&self, reference: &str) -> Vec<String> {
        vec![
            "--insecure-policy".to_string(),
            "copy".to_string(),
            format!("docker://{reference}"),
            format!("oci:{reference}"),
        ]
    }

    /// Copies the image into a local OCI layout named after the reference.
    ///
    /// Blocks until the tool exits. The tool's own stdout/stderr pass through
    /// untouched, so its diagnostics reach the user verbatim.
    pub async fn fetch(&self, reference: &str) -> Result<()> {
        validate_image_reference(reference).map_err(|reason| Error::InvalidImageReference {
            reference: reference.to_string(),
            reason,
        })?;

        debug!("fetching image {}", reference);
        let status = Command::new(&self.program)
            .args(self.argv(reference))
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| Error::Fetch {
                reference: reference.to_string(),
                reason: format!("failed to run {}: {}", self.program.display(), e),
            })?;

        if !status.success() {
            return Err(Error::Fetch {
                reference: reference.to_string(),
                reason: format!("{} exited with {}", self.program.display(), status),
            });
        }

        info!("fetched image {}", reference);
        Ok(())
    }
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}
