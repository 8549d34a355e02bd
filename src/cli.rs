use crate::constants::{MAX_QUALITY, MIN_QUALITY};
use clap::Parser;
use std::path::PathBuf;

/// Convert a folder of HEIC/HEIF photos to JPEG.
///
/// Without `--headless` the desktop window opens with the given values prefilled.
#[derive(Parser, Debug, Default)]
#[command(name = "heic2jpg", version, about)]
pub struct Cli {
    /// Folder containing .heic/.heif files
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Folder that receives the .jpg files (created if missing)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// JPEG quality
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(MIN_QUALITY as i64..=MAX_QUALITY as i64))]
    pub quality: Option<u8>,

    /// Run a single batch in the terminal instead of opening a window
    #[arg(long)]
    pub headless: bool,

    /// Print a JSON run summary when a headless run finishes
    #[arg(long, requires = "headless")]
    pub json: bool,

    /// Open the output folder when a headless run finishes
    #[arg(long, requires = "headless")]
    pub open: bool,

    /// How often progress is polled, in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,
}
