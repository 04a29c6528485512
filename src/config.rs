//! Runtime bundle configuration.
//!
//! Parses the subset of the bundle's `config.json` the launcher cares about
//! (`root`, `process`, `mounts`, `hostname`), applies the rootless rewrite,
//! and persists the document back. Fields outside that subset are captured in
//! flattened maps and round-trip unchanged, so the external runtime still
//! sees everything the unpack tool generated.

use crate::constants::CONFIG_FILE;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

// =============================================================================
// Runtime Config Document (OCI runtime spec subset)
// =============================================================================

/// The parsed runtime configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSpec {
    /// Hostname inside the container. Always set after [`BundleConfig::transform`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Root filesystem declaration.
    pub root: Root,
    /// Container process declaration.
    pub process: Process,
    /// Declared mounts, in order.
    pub mounts: Vec<MountSpec>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Root filesystem config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Root {
    /// Path of the root filesystem tree, relative to the bundle directory.
    pub path: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Container process config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    /// Command and arguments to execute inside the container.
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory inside the root filesystem.
    #[serde(default = "default_cwd")]
    pub cwd: String,
    /// Identity the process runs as.
    #[serde(default)]
    pub user: User,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_cwd() -> String {
    "/".to_string()
}

/// Process identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub uid: u32,
    #[serde(default)]
    pub gid: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One declared mount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountSpec {
    pub destination: String,
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub mount_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Caller-Requested Bind Mounts
// =============================================================================

/// A caller-requested bind mount, injected into the bundle config as an
/// additional read-write bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMount {
    /// Host path to expose.
    pub source: String,
    /// Path inside the container.
    pub destination: String,
}

impl FromStr for BindMount {
    type Err = String;

    /// Parses `<host-path>:<container-path>`, splitting on the first `:`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((source, destination)) if !source.is_empty() && !destination.is_empty() => {
                Ok(Self {
                    source: source.to_string(),
                    destination: destination.to_string(),
                })
            }
            _ => Err(format!(
                "expected <host-path>:<container-path>, got '{s}'"
            )),
        }
    }
}

// =============================================================================
// Bundle Config
// =============================================================================

/// A runtime bundle's configuration document plus the bundle's location.
///
/// Owned by one launch at a time: loaded once, transformed in memory, and
/// written back exactly once.
#[derive(Debug, Clone)]
pub struct BundleConfig {
    root_path: PathBuf,
    /// The parsed document.
    pub spec: RuntimeSpec,
}

impl BundleConfig {
    /// Wraps an already-parsed document.
    pub fn new(root_path: impl Into<PathBuf>, spec: RuntimeSpec) -> Self {
        Self {
            root_path: root_path.into(),
            spec,
        }
    }

    /// Loads the config document from `<bundle_dir>/config.json`.
    pub fn load(bundle_dir: &Path) -> Result<Self> {
        let path = bundle_dir.join(CONFIG_FILE);
        let content = fs::read_to_string(&path).map_err(|e| Error::ConfigParse {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let spec: RuntimeSpec = serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
            path,
            reason: e.to_string(),
        })?;
        Ok(Self::new(bundle_dir, spec))
    }

    /// Persists the document back to the bundle, replacing the original.
    pub fn save(&self) -> Result<()> {
        let path = self.config_path();
        let content =
            serde_json::to_string_pretty(&self.spec).map_err(|e| Error::ConfigWrite {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        fs::write(&path, content).map_err(|e| Error::ConfigWrite {
            path,
            reason: e.to_string(),
        })
    }

    /// Returns the bundle directory.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Returns the path of the config document.
    pub fn config_path(&self) -> PathBuf {
        self.root_path.join(CONFIG_FILE)
    }

    /// Returns the path of the root filesystem tree.
    pub fn rootfs_path(&self) -> PathBuf {
        self.root_path.join(&self.spec.root.path)
    }

    /// Rewrites the document for rootless execution.
    ///
    /// In order:
    /// 1. strip `ro` from every `bind` mount; the backends used here cannot
    ///    honor read-only bind mounts in rootless mode, so every bind mount
    ///    runs read-write;
    /// 2. append one read-write bind mount per requested [`BindMount`];
    /// 3. set the hostname to the container name;
    /// 4. replace the process args with `command` if one was given, keeping
    ///    the image's entrypoint otherwise;
    /// 5. force the process identity to uid 0 / gid 0; only a root-mapped
    ///    identity exists inside the container.
    pub fn transform(&mut self, container_name: &str, command: &[String], extra_binds: &[BindMount]) {
        for mount in &mut self.spec.mounts {
            if mount.mount_type == "bind" {
                mount.options.retain(|o| o != "ro");
            }
        }

        for bind in extra_binds {
            debug!("injecting bind mount {} -> {}", bind.source, bind.destination);
            self.spec.mounts.push(MountSpec {
                destination: bind.destination.clone(),
                mount_type: "bind".to_string(),
                source: Some(bind.source.clone()),
                options: vec!["bind".to_string(), "rw".to_string()],
                extra: Map::new(),
            });
        }

        self.spec.hostname = Some(container_name.to_string());

        if !command.is_empty() {
            self.spec.process.args = command.to_vec();
        }

        self.spec.process.user.uid = 0;
        self.spec.process.user.gid = 0;
    }
}
