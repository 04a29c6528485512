//! Mount planning for the emulation backend.
//!
//! The ptrace tracer has no native support for pseudo-filesystem mount types
//! (proc, tmpfs, devpts, mqueue); it can only bind real host paths into the
//! traced process's view. The planner flattens the bundle's declared mounts
//! into a destination → source table, approximating each pseudo-mount by
//! binding the equivalent host path. The approximation is deliberately lossy:
//! the container sees the host's `/proc`, `/dev`, and `/sys` rather than
//! private instances.

use crate::config::BundleConfig;
use std::collections::BTreeMap;
use tracing::debug;

/// Host paths exposed inside every emulated container.
pub const DEFAULT_PASSTHROUGHS: [&str; 7] = [
    "/etc/resolv.conf",
    "/etc/hosts",
    "/etc/hostname",
    "/run",
    "/etc/passwd",
    "/etc/group",
    "/etc/nsswitch.conf",
];

/// Destination → source bind table consumed by the emulation backend.
///
/// Destinations are unique: a later entry for the same destination silently
/// replaces the earlier one. Iteration is ordered by destination so the argv
/// derived from a table is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountTable {
    entries: BTreeMap<String, String>,
}

impl MountTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table seeded with [`DEFAULT_PASSTHROUGHS`].
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for path in DEFAULT_PASSTHROUGHS {
            table.passthrough(path);
        }
        table
    }

    /// Binds `source` at `destination`, replacing any earlier entry for the
    /// same destination.
    pub fn insert(&mut self, destination: impl Into<String>, source: impl Into<String>) {
        self.entries.insert(destination.into(), source.into());
    }

    /// Binds a host path at the same path inside the container.
    pub fn passthrough(&mut self, path: &str) {
        self.insert(path, path);
    }

    /// Returns the source bound at `destination`, if any.
    pub fn get(&self, destination: &str) -> Option<&str> {
        self.entries.get(destination).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(destination, source)` pairs in destination order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(dest, source)| (dest.as_str(), source.as_str()))
    }
}

/// Derives the emulation backend's bind table from the bundle's declared
/// mounts.
///
/// Starts from the fixed host passthroughs, then classifies each declared
/// mount in order. Pseudo-filesystem mounts map to the equivalent host path;
/// everything else becomes a plain `destination → source` bind, last write
/// winning on duplicate destinations. An unrecognized mount type is not an
/// error. A generic mount with no source has nothing to bind and is skipped.
pub fn plan(config: &BundleConfig) -> MountTable {
    let mut table = MountTable::with_defaults();

    for mount in &config.spec.mounts {
        match (
            mount.mount_type.as_str(),
            mount.destination.as_str(),
            mount.source.as_deref(),
        ) {
            ("proc", _, _) => table.passthrough("/proc"),
            ("tmpfs", "/dev", _) => table.passthrough("/dev"),
            ("none", _, Some("/sys")) => table.passthrough("/sys"),
            ("mqueue", "/dev/mqueue", _) => table.passthrough("/dev/mqueue"),
            ("tmpfs", "/dev/shm", _) => table.passthrough("/dev/shm"),
            ("devpts", _, _) => table.passthrough("/dev/pts"),
            (_, destination, Some(source)) => table.insert(destination, source),
            (_, _, None) => {}
        }
    }

    debug!(
        "planned {} binds for {}",
        table.len(),
        config.root_path().display()
    );
    table
}
