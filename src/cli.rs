//! CLI argument parsing

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::api::ClientOptions;

/// Upload a local image to a Your Snippets website
#[derive(Parser, Debug, Clone)]
#[command(name = "snippet-upload", version)]
#[command(about = "Upload a local image to a Your Snippets website", long_about = None)]
pub struct Args {
    /// Location of the image file to upload
    pub imagefile: PathBuf,

    /// The URL of the snippet this image is for (prompted for when absent)
    #[arg(long)]
    pub url: Option<String>,

    /// Config file, relative paths are resolved next to the executable
    #[arg(long, default_value = "config.toml")]
    pub configfile: PathBuf,

    /// Append log records to this file instead of stderr
    #[arg(long)]
    pub logfile: Option<PathBuf>,

    /// Verbose logging; also prints the version and HTTP status codes
    #[arg(long)]
    pub debug: bool,

    /// Do not verify the API's TLS certificate (self-signed hosts)
    #[arg(long)]
    pub insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
}

impl Args {
    /// Absolute path of the config file.
    pub fn resolve_config_path(&self) -> PathBuf {
        let base = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        resolve_against(&self.configfile, base.as_deref())
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            insecure: self.insecure,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

/// `path` unchanged when absolute or when there is no `base`.
fn resolve_against(path: &Path, base: Option<&Path>) -> PathBuf {
    match base {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}
