use crate::cli::Cli;
use crate::constants::{DEFAULT_OUTPUT_SUBDIR, DEFAULT_QUALITY, POLL_INTERVAL_MS};
use std::path::PathBuf;
use std::time::Duration;

/// Startup settings. Built from defaults and command-line flags only; nothing is
/// read from or written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub quality: u8,
    pub poll_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        let pictures = dirs::picture_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            output_dir: pictures.join(DEFAULT_OUTPUT_SUBDIR),
            input_dir: pictures,
            quality: DEFAULT_QUALITY,
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
        }
    }
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = Self::default();

        if let Some(input) = &cli.input {
            config.input_dir = input.clone();
        }
        if let Some(output) = &cli.output {
            config.output_dir = output.clone();
        }
        if let Some(quality) = cli.quality {
            config.quality = quality;
        }
        if let Some(ms) = cli.poll_interval_ms {
            config.poll_interval = Duration::from_millis(ms.max(1));
        }

        config
    }
}
