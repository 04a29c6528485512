//! Tests for emulation mount planning.

use serde_json::Map;
use skiff::config::{BundleConfig, MountSpec, Process, Root, RuntimeSpec, User};
use skiff::mounts::{DEFAULT_PASSTHROUGHS, MountTable, plan};

fn mount(mount_type: &str, source: Option<&str>, destination: &str) -> MountSpec {
    MountSpec {
        destination: destination.to_string(),
        mount_type: mount_type.to_string(),
        source: source.map(str::to_string),
        options: Vec::new(),
        extra: Map::new(),
    }
}

fn bundle_with_mounts(mounts: Vec<MountSpec>) -> BundleConfig {
    BundleConfig::new(
        "/containers/web",
        RuntimeSpec {
            hostname: Some("web".to_string()),
            root: Root {
                path: "rootfs".to_string(),
                extra: Map::new(),
            },
            process: Process {
                args: vec!["/bin/sh".to_string()],
                cwd: "/".to_string(),
                user: User::default(),
                extra: Map::new(),
            },
            mounts,
            extra: Map::new(),
        },
    )
}

// =============================================================================
// Default Passthroughs
// =============================================================================

#[test]
fn test_empty_mount_list_yields_defaults_only() {
    let table = plan(&bundle_with_mounts(vec![]));

    assert_eq!(table.len(), DEFAULT_PASSTHROUGHS.len());
    for path in DEFAULT_PASSTHROUGHS {
        assert_eq!(table.get(path), Some(path), "{path} should map to itself");
    }
}

#[test]
fn test_with_defaults_matches_passthrough_list() {
    let table = MountTable::with_defaults();

    assert_eq!(table.len(), 7);
    assert_eq!(table.get("/etc/resolv.conf"), Some("/etc/resolv.conf"));
    assert_eq!(table.get("/run"), Some("/run"));
}

// =============================================================================
// Pseudo-Mount Classification
// =============================================================================

#[test]
fn test_proc_maps_to_host_proc() {
    let table = plan(&bundle_with_mounts(vec![mount("proc", Some("proc"), "/proc")]));

    assert_eq!(table.get("/proc"), Some("/proc"));
}

#[test]
fn test_dev_tmpfs_maps_to_host_dev() {
    let table = plan(&bundle_with_mounts(vec![mount("tmpfs", Some("tmpfs"), "/dev")]));

    assert_eq!(table.get("/dev"), Some("/dev"));
}

#[test]
fn test_sys_none_maps_to_host_sys() {
    let table = plan(&bundle_with_mounts(vec![mount("none", Some("/sys"), "/sys")]));

    assert_eq!(table.get("/sys"), Some("/sys"));
}

#[test]
fn test_mqueue_maps_to_host_mqueue() {
    let table = plan(&bundle_with_mounts(vec![mount(
        "mqueue",
        Some("mqueue"),
        "/dev/mqueue",
    )]));

    assert_eq!(table.get("/dev/mqueue"), Some("/dev/mqueue"));
}

#[test]
fn test_shm_tmpfs_maps_to_host_shm() {
    let table = plan(&bundle_with_mounts(vec![mount("tmpfs", Some("shm"), "/dev/shm")]));

    assert_eq!(table.get("/dev/shm"), Some("/dev/shm"));
}

#[test]
fn test_devpts_ignores_declared_source_and_destination() {
    // Whatever a devpts mount declares, the tracer gets the host's /dev/pts.
    let table = plan(&bundle_with_mounts(vec![mount(
        "devpts",
        Some("/weird/source"),
        "/weird/destination",
    )]));

    assert_eq!(table.get("/dev/pts"), Some("/dev/pts"));
    assert_eq!(table.get("/weird/destination"), None);
}

// =============================================================================
// Generic Mounts
// =============================================================================

#[test]
fn test_generic_bind_maps_destination_to_source() {
    let table = plan(&bundle_with_mounts(vec![mount("bind", Some("/x"), "/y")]));

    assert_eq!(table.get("/y"), Some("/x"));
}

#[test]
fn test_unrecognized_type_falls_through_to_generic() {
    let table = plan(&bundle_with_mounts(vec![mount(
        "cgroup",
        Some("cgroup"),
        "/sys/fs/cgroup",
    )]));

    assert_eq!(table.get("/sys/fs/cgroup"), Some("cgroup"));
}

#[test]
fn test_sourceless_generic_mount_is_skipped() {
    let table = plan(&bundle_with_mounts(vec![mount("tmpfs", None, "/scratch")]));

    assert_eq!(table.get("/scratch"), None);
    assert_eq!(table.len(), DEFAULT_PASSTHROUGHS.len());
}

// =============================================================================
// Last Write Wins
// =============================================================================

#[test]
fn test_later_mount_replaces_earlier_destination() {
    let table = plan(&bundle_with_mounts(vec![
        mount("bind", Some("/first"), "/data"),
        mount("bind", Some("/second"), "/data"),
    ]));

    assert_eq!(table.get("/data"), Some("/second"));
}

#[test]
fn test_declared_mount_overrides_default_passthrough() {
    let table = plan(&bundle_with_mounts(vec![mount(
        "bind",
        Some("/custom/resolv.conf"),
        "/etc/resolv.conf",
    )]));

    assert_eq!(table.get("/etc/resolv.conf"), Some("/custom/resolv.conf"));
    assert_eq!(table.len(), DEFAULT_PASSTHROUGHS.len());
}

// =============================================================================
// Combined Scenario
// =============================================================================

#[test]
fn test_mixed_mount_list_plans_expected_table() {
    let table = plan(&bundle_with_mounts(vec![
        mount("proc", Some("proc"), "/proc"),
        mount("tmpfs", Some("tmpfs"), "/dev"),
        mount("bind", Some("/x"), "/y"),
    ]));

    // Seven defaults plus /proc, /dev, and /y.
    assert_eq!(table.len(), 10);
    assert_eq!(table.get("/proc"), Some("/proc"));
    assert_eq!(table.get("/dev"), Some("/dev"));
    assert_eq!(table.get("/y"), Some("/x"));
}

// =============================================================================
// Table Behavior
// =============================================================================

#[test]
fn test_iteration_is_ordered_by_destination() {
    let mut table = MountTable::new();
    table.insert("/b", "/host/b");
    table.insert("/a", "/host/a");
    table.insert("/c", "/host/c");

    let destinations: Vec<&str> = table.iter().map(|(dest, _)| dest).collect();
    assert_eq!(destinations, vec!["/a", "/b", "/c"]);
}

#[test]
fn test_empty_table() {
    let table = MountTable::new();
    assert!(table.is_empty());
    assert_eq!(table.len(), 0);
}
