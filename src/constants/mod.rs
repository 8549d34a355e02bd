// App Constants
pub const APP_NAME: &str = "HEIC to JPG Converter";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// Conversion
pub const HEIF_EXTENSIONS: &[&str] = &["heic", "heif"];
pub const OUTPUT_EXTENSION: &str = "jpg";
pub const MIN_QUALITY: u8 = 10;
pub const MAX_QUALITY: u8 = 100;
pub const DEFAULT_QUALITY: u8 = 90;

// Progress relay
pub const POLL_INTERVAL_MS: u64 = 100;
pub const MAX_LOG_LINES: usize = 1000;
pub const LOG_TIME_FORMAT: &str = "%H:%M:%S";

// Default folders, relative to the user's pictures directory
pub const DEFAULT_OUTPUT_SUBDIR: &str = "JPG_Output";

// Mime types accepted by the header sniffing step in front of libheif
pub const HEIF_MIME_TYPES: &[&str] = &["image/heif", "image/heic", "image/avif"];
