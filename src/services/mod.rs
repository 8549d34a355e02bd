pub mod file_service;
pub mod validation_service;

pub use file_service::FileService;
pub use validation_service::{DirectoryError, ValidationService};
