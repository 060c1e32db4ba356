pub mod config;
pub mod error;
pub mod file;
pub mod messages;
pub mod text;
pub mod timer;
pub mod upload;

pub use config::ApiEndpoints;
pub use error::{ConfigError, SelectionError};
pub use file::SelectedFile;
pub use upload::{
    Category, CategoryFilter, DeleteReport, FilterCounts, Tone, Upload, UploadList, UploadResult,
};
