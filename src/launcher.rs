//! Launch orchestration: fetch, unpack, transform, plan, execute.

use crate::bundle::{BundleUnpacker, bundle_exists};
use crate::config::{BindMount, BundleConfig};
use crate::constants::{
    DEFAULT_FETCH_PROGRAM, DEFAULT_RUNTIME_STATE_DIR, DEFAULT_UNPACK_PROGRAM,
    validate_container_name,
};
use crate::error::{Error, Result};
use crate::image::ImageFetcher;
use crate::mounts::plan;
use crate::runtime::RuntimeBackend;
use crate::runtimes::{BackendKind, EmulationBackend, NamespaceBackend};
use std::path::PathBuf;
use std::process::ExitStatus;
use tracing::{debug, info};

/// Configuration for a [`Launcher`].
///
/// Everything the pipeline touches is explicit here; in particular the state
/// directory handed to the namespace runtime is configuration owned by the
/// launcher, not a process-wide constant.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Which execution backend to use.
    pub backend: BackendKind,
    /// Directory bundles are unpacked into, one subdirectory per container
    /// name.
    pub containers_dir: PathBuf,
    /// State directory for the namespace runtime.
    pub runtime_state_dir: PathBuf,
    /// Image fetch tool.
    pub fetch_program: PathBuf,
    /// Bundle unpack tool.
    pub unpack_program: PathBuf,
    /// Override for the selected backend's runtime binary.
    pub runtime_program: Option<PathBuf>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Namespace,
            containers_dir: PathBuf::from("."),
            runtime_state_dir: PathBuf::from(DEFAULT_RUNTIME_STATE_DIR),
            fetch_program: PathBuf::from(DEFAULT_FETCH_PROGRAM),
            unpack_program: PathBuf::from(DEFAULT_UNPACK_PROGRAM),
            runtime_program: None,
        }
    }
}

/// Sequences one container launch from image reference to exit status.
///
/// Every step blocks until its external process exits before the next step
/// begins; the first failure aborts the rest. A launcher may be reused, but
/// two concurrent launches against the same container name are a caller
/// error; the bundle directory is touched by one launch at a time.
pub struct Launcher {
    fetcher: ImageFetcher,
    unpacker: BundleUnpacker,
    backend: Box<dyn RuntimeBackend>,
    containers_dir: PathBuf,
}

impl Launcher {
    /// Builds a launcher from explicit configuration.
    pub fn new(config: LauncherConfig) -> Self {
        let backend: Box<dyn RuntimeBackend> = match config.backend {
            BackendKind::Namespace => match &config.runtime_program {
                Some(program) => Box::new(NamespaceBackend::with_program(
                    program.as_path(),
                    config.runtime_state_dir.as_path(),
                )),
                None => Box::new(NamespaceBackend::new(config.runtime_state_dir.as_path())),
            },
            BackendKind::Emulation => match &config.runtime_program {
                Some(program) => Box::new(EmulationBackend::with_program(program.as_path())),
                None => Box::new(EmulationBackend::new()),
            },
        };

        Self {
            fetcher: ImageFetcher::with_program(config.fetch_program),
            unpacker: BundleUnpacker::with_program(config.unpack_program),
            backend,
            containers_dir: config.containers_dir,
        }
    }

    /// Launches a container and returns the backend's exit status unchanged.
    ///
    /// Pipeline: fetch the image (always, even when the bundle is reused);
    /// unpack a bundle unless one already exists for this name; rewrite the
    /// bundle config for rootless execution and persist it; plan the bind
    /// table if the backend needs one; run the backend.
    pub async fn launch(
        &self,
        image: &str,
        container_name: &str,
        command: &[String],
        bind_mounts: &[BindMount],
    ) -> Result<ExitStatus> {
        validate_container_name(container_name).map_err(|reason| {
            Error::InvalidContainerName {
                name: container_name.to_string(),
                reason,
            }
        })?;

        self.fetcher.fetch(image).await?;

        let bundle_dir = self.containers_dir.join(container_name);
        if bundle_exists(&bundle_dir) {
            debug!("reusing existing bundle at {}", bundle_dir.display());
        } else {
            self.unpacker.unpack(image, &bundle_dir).await?;
        }

        let mut bundle = BundleConfig::load(&bundle_dir)?;
        bundle.transform(container_name, command, bind_mounts);
        bundle.save()?;

        let table = self.backend.needs_mount_table().then(|| plan(&bundle));
        let status = self.backend.run(&bundle, table.as_ref()).await?;

        info!("container {} exited with {}", container_name, status);
        Ok(status)
    }
}
