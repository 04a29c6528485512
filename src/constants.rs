//! Constants and validation helpers for the launcher.
//!
//! External tool names and the runtime state directory are defaults only;
//! every one of them can be overridden through [`crate::LauncherConfig`].

/// File name of the runtime configuration document inside a bundle.
pub const CONFIG_FILE: &str = "config.json";

// =============================================================================
// External Tool Defaults
// =============================================================================

/// Default image fetch tool (copies a registry image into a local OCI layout).
pub const DEFAULT_FETCH_PROGRAM: &str = "skopeo";

/// Default bundle unpack tool (turns an OCI layout into a runtime bundle).
pub const DEFAULT_UNPACK_PROGRAM: &str = "umoci";

/// Default namespace-based runtime binary.
pub const DEFAULT_NAMESPACE_PROGRAM: &str = "runc";

/// Default ptrace-based emulation binary.
pub const DEFAULT_EMULATION_PROGRAM: &str = "proot";

/// Default state directory handed to the namespace runtime via `--root`.
pub const DEFAULT_RUNTIME_STATE_DIR: &str = "/tmp/skiff-runtime";

// =============================================================================
// Validation Patterns
// =============================================================================
//
// Allowlist-based validation for user-provided strings that end up in
// filesystem paths or external tool argv.
// =============================================================================

/// Maximum image reference length in bytes.
pub const MAX_IMAGE_REF_LEN: usize = 512;

/// Valid characters for image references.
///
/// The `@` is for digest references like `nginx@sha256:abc...`; the `:` is
/// for tag references like `nginx:latest`.
pub const IMAGE_REF_VALID_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_./:@";

/// Valid characters for container names.
///
/// Excludes `/` and `.` so a name can never traverse outside the containers
/// directory it is joined onto.
pub const CONTAINER_NAME_VALID_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_";

/// Maximum container name length.
pub const MAX_CONTAINER_NAME_LEN: usize = 128;

/// Validates a container name before it is used as a directory name.
///
/// Returns `Ok(())` if valid, `Err(reason)` describing the failure.
#[must_use = "validation result must be checked before the name is used as a path"]
pub fn validate_container_name(name: &str) -> std::result::Result<(), &'static str> {
    if name.is_empty() {
        return Err("container name cannot be empty");
    }
    if name.len() > MAX_CONTAINER_NAME_LEN {
        return Err("container name exceeds maximum length");
    }
    if !name.chars().all(|c| CONTAINER_NAME_VALID_CHARS.contains(c)) {
        return Err("container name contains invalid characters");
    }
    Ok(())
}

/// Validates an image reference before it is passed to external tools.
#[must_use = "validation result must be checked before the reference reaches external tools"]
pub fn validate_image_reference(reference: &str) -> std::result::Result<(), &'static str> {
    if reference.is_empty() {
        return Err("image reference cannot be empty");
    }
    if reference.len() > MAX_IMAGE_REF_LEN {
        return Err("image reference exceeds maximum length");
    }
    if !reference.chars().all(|c| IMAGE_REF_VALID_CHARS.contains(c)) {
        return Err("image reference contains invalid characters");
    }
    Ok(())
}
