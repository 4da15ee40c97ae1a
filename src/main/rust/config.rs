use std::path::PathBuf;

use clap::Parser;

use crate::domain::value_objects::ContainerFormat;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "media-bridge",
    version = "0.1.0",
    author = "Hawkeye Video Pipeline",
    about = "Resolves media metadata and streams downloads through an external extraction tool"
)]
pub struct Config {
    /// HTTP API port
    #[arg(long, env = "HTTP_PORT", default_value = "3000")]
    pub port: u16,

    /// Metrics server port
    #[arg(long, env = "METRICS_PORT", default_value = "9003")]
    pub metrics_port: u16,

    /// Path or name of the extraction tool binary
    #[arg(long, env = "YTDLP_PATH", default_value = "yt-dlp")]
    pub ytdlp_path: PathBuf,

    /// Container the tool muxes separate audio/video tracks into
    #[arg(long, env = "MERGE_FORMAT", default_value = "mkv")]
    pub merge_format: String,

    /// Directory with the web UI to serve at `/`
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Minimum allowed port (ports below 1024 are privileged)
const MIN_USER_PORT: u16 = 1024;

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        Self::validate_port(self.port, "HTTP")?;
        Self::validate_port(self.metrics_port, "metrics")?;

        if self.port == self.metrics_port {
            anyhow::bail!("HTTP port and metrics port cannot be the same");
        }

        if self.ytdlp_path.as_os_str().is_empty() {
            anyhow::bail!("Extraction tool path cannot be empty");
        }

        if !self.merge_container().is_mergeable() {
            anyhow::bail!(
                "Unsupported merge format: {}. Use one of mkv, mp4, webm",
                self.merge_format
            );
        }

        if let Some(dir) = &self.static_dir {
            if !dir.is_dir() {
                anyhow::bail!("Static directory not found: {:?}", dir);
            }
        }

        Ok(())
    }

    fn validate_port(port: u16, name: &str) -> anyhow::Result<()> {
        if port == 0 {
            anyhow::bail!("Invalid {} port: port cannot be 0", name);
        }
        if port < MIN_USER_PORT {
            anyhow::bail!(
                "Invalid {} port: {} is a privileged port (< {}). Use a port >= {}",
                name,
                port,
                MIN_USER_PORT,
                MIN_USER_PORT
            );
        }
        Ok(())
    }

    pub fn merge_container(&self) -> ContainerFormat {
        ContainerFormat::from_extension(&self.merge_format)
    }
}
