//! # skiff
//!
//! **Rootless OCI container launcher with interchangeable execution backends.**
//!
//! skiff fetches an OCI image, materializes it as an on-disk runtime bundle,
//! rewrites the bundle's `config.json` for an unprivileged root-mapped
//! execution model, and dispatches the bundle to one of two backends: a
//! privileged kernel-namespace runtime (runc-compatible) or a ptrace-based
//! emulation runtime (proot-compatible) that needs no namespace privileges.
//!
//! ```text
//! image ref ──► fetch (skopeo) ──► OCI layout
//!                                      │
//!                               unpack (umoci)          skipped when the
//!                                      │                bundle already exists
//!                                      ▼
//!                               runtime bundle ──► transform ──► config.json
//!                                      │
//!                      ┌───────────────┴───────────────┐
//!                      ▼                               ▼
//!              NamespaceBackend                  MountPlanner
//!           (runc --root … run …)                      │
//!                                                      ▼
//!                                              EmulationBackend
//!                                            (proot -r -w -b …)
//! ```
//!
//! The fetch and unpack steps are external collaborators: skiff only
//! sequences their invocations and lets their diagnostics pass through. The
//! substance of the crate is the config transformation ([`config`]), the
//! emulation mount planning ([`mounts`]), and the backend abstraction
//! ([`runtime`], [`runtimes`]).
//!
//! ## Rootless model
//!
//! Two deliberate, lossy accommodations are part of the contract:
//!
//! - Read-only bind mounts are rewritten read-write. The backends used here
//!   cannot honor `ro` binds reliably in rootless mode, so every bind mount
//!   runs read-write.
//! - The emulation backend approximates pseudo-filesystem mounts (proc,
//!   tmpfs, devpts, mqueue) by bind-mounting the equivalent host paths; the
//!   container sees the host's `/proc` and `/dev`, not private instances.
//!
//! ## Example
//!
//! ```rust,ignore
//! use skiff::{BackendKind, Launcher, LauncherConfig};
//!
//! #[tokio::main]
//! async fn main() -> skiff::Result<()> {
//!     let launcher = Launcher::new(LauncherConfig {
//!         backend: BackendKind::Emulation,
//!         ..Default::default()
//!     });
//!     let status = launcher.launch("alpine:3.18", "my-alpine", &[], &[]).await?;
//!     std::process::exit(status.code().unwrap_or(1));
//! }
//! ```

pub mod bundle;
pub mod config;
pub mod constants;
pub mod error;
pub mod image;
pub mod launcher;
pub mod mounts;
pub mod runtime;
pub mod runtimes;

// Re-exports
pub use bundle::{BundleUnpacker, bundle_exists};
pub use config::{BindMount, BundleConfig, MountSpec, Process, Root, RuntimeSpec, User};
pub use error::{Error, Result};
pub use image::ImageFetcher;
pub use launcher::{Launcher, LauncherConfig};
pub use mounts::{DEFAULT_PASSTHROUGHS, MountTable, plan};
pub use runtime::RuntimeBackend;
pub use runtimes::{BackendKind, EmulationBackend, NamespaceBackend};
