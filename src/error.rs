//! Error types for the container launch pipeline.

use std::path::PathBuf;

/// Result type alias for launcher operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while launching a container.
///
/// Every pipeline step has its own variant so a caller can tell which stage
/// failed; no step is retried, and the first error aborts the launch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // =========================================================================
    // Input Validation Errors
    // =========================================================================
    /// Container name failed validation.
    #[error("invalid container name '{name}': {reason}")]
    InvalidContainerName { name: String, reason: &'static str },

    /// Image reference failed validation.
    #[error("invalid image reference '{reference}': {reason}")]
    InvalidImageReference {
        reference: String,
        reason: &'static str,
    },

    // =========================================================================
    // Pipeline Errors
    // =========================================================================
    /// The external image fetch tool failed.
    #[error("failed to fetch image '{reference}': {reason}")]
    Fetch { reference: String, reason: String },

    /// The external bundle unpack tool failed.
    #[error("failed to unpack bundle at {bundle}: {reason}")]
    Unpack { bundle: PathBuf, reason: String },

    /// The bundle's runtime config document is missing, malformed, or lacks
    /// required fields.
    #[error("invalid runtime config at {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    /// The rewritten runtime config could not be persisted. Fatal to the
    /// launch; the on-disk bundle may be left with the original document.
    #[error("failed to write runtime config at {path}: {reason}")]
    ConfigWrite { path: PathBuf, reason: String },

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// The external runtime binary could not be found or started.
    #[error("failed to launch {backend} backend: {reason}")]
    BackendLaunch { backend: String, reason: String },

    /// The runtime process ended without an exit code to propagate
    /// (terminated by a signal).
    #[error("{backend} backend terminated abnormally: {reason}")]
    BackendRuntime { backend: String, reason: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
