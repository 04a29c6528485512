//! skiff CLI: fetch an OCI image and run it as a rootless container.
//!
//! ```sh
//! skiff alpine:3.18 my-alpine
//! skiff alpine:3.18 my-alpine --mount /srv/data:/data --cmd /bin/sh -c 'ls /data'
//! skiff alpine:3.18 my-alpine --backend emulation
//! ```

use clap::Parser;
use skiff::{BackendKind, BindMount, Launcher, LauncherConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "skiff",
    about = "Fetch an OCI image and run it as a rootless container"
)]
struct Cli {
    /// Image to fetch (if necessary) and run
    image: String,

    /// Name for the container being started
    name: String,

    /// Additional bind mounts, as <host-path>:<container-path>
    #[arg(long = "mount", value_name = "HOST:CONTAINER")]
    mounts: Vec<BindMount>,

    /// Command to run instead of the image's default entrypoint
    #[arg(long = "cmd", num_args = 1.., allow_hyphen_values = true)]
    cmd: Vec<String>,

    /// Execution backend
    #[arg(long, default_value = "namespace", value_parser = parse_backend)]
    backend: BackendKind,

    /// Runtime state directory for the namespace backend
    #[arg(long = "state-dir", value_name = "PATH")]
    state_dir: Option<PathBuf>,

    /// Directory bundles are unpacked into
    #[arg(long = "containers-dir", value_name = "PATH")]
    containers_dir: Option<PathBuf>,

    /// Override the image fetch tool
    #[arg(long = "fetch-cmd", value_name = "PROGRAM")]
    fetch_cmd: Option<PathBuf>,

    /// Override the bundle unpack tool
    #[arg(long = "unpack-cmd", value_name = "PROGRAM")]
    unpack_cmd: Option<PathBuf>,

    /// Override the backend's runtime binary
    #[arg(long = "runtime-cmd", value_name = "PROGRAM")]
    runtime_cmd: Option<PathBuf>,
}

fn parse_backend(s: &str) -> Result<BackendKind, String> {
    BackendKind::from_str(s)
        .ok_or_else(|| format!("unknown backend '{s}', expected 'namespace' or 'emulation'"))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = LauncherConfig {
        backend: cli.backend,
        ..Default::default()
    };
    if let Some(dir) = cli.state_dir {
        config.runtime_state_dir = dir;
    }
    if let Some(dir) = cli.containers_dir {
        config.containers_dir = dir;
    }
    if let Some(program) = cli.fetch_cmd {
        config.fetch_program = program;
    }
    if let Some(program) = cli.unpack_cmd {
        config.unpack_program = program;
    }
    config.runtime_program = cli.runtime_cmd;

    let launcher = Launcher::new(config);
    match launcher.launch(&cli.image, &cli.name, &cli.cmd, &cli.mounts).await {
        // The container's exit code is the process exit code, verbatim.
        Ok(status) => match status.code() {
            Some(code) => ExitCode::from(code as u8),
            None => ExitCode::FAILURE,
        },
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
