use std::path::{Path, PathBuf};

use crate::error::SelectionError;

/// Largest file the client will send: 20 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// Extensions offered by the file chooser, lowercase, without the dot.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "txt"];

/// A file that passed local validation and may be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    /// Stat `path` and validate it. Nothing is read yet.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SelectionError> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path)
            .map_err(|e| SelectionError::Unreadable(format!("{}: {e}", path.display())))?;
        if !meta.is_file() {
            return Err(SelectionError::Unreadable(format!(
                "{} não é um arquivo",
                path.display()
            )));
        }
        Self::new(path, meta.len())
    }

    /// Validate an already-known path and size.
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Result<Self, SelectionError> {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        check_size(size)?;
        check_extension(&name)?;
        Ok(Self { path, name, size })
    }

    pub fn mime_type(&self) -> &'static str {
        match extension(&self.name).as_deref() {
            Some("pdf") => "application/pdf",
            Some("txt") => "text/plain",
            _ => "application/octet-stream",
        }
    }

    /// Size in MiB with two decimals, e.g. `"1.50 MB"`.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size as f64 / 1024.0 / 1024.0)
    }

    /// Read the contents, re-checking the size limit against the file as it
    /// is now.
    pub fn read(&self) -> Result<Vec<u8>, SelectionError> {
        let unreadable = |e: std::io::Error| {
            SelectionError::Unreadable(format!("{}: {e}", self.path.display()))
        };
        check_size(std::fs::metadata(&self.path).map_err(unreadable)?.len())?;
        let bytes = std::fs::read(&self.path).map_err(unreadable)?;
        check_size(bytes.len() as u64)?;
        Ok(bytes)
    }
}

pub fn check_size(size: u64) -> Result<(), SelectionError> {
    if size > MAX_UPLOAD_BYTES {
        Err(SelectionError::TooLarge { size })
    } else {
        Ok(())
    }
}

pub fn check_extension(name: &str) -> Result<(), SelectionError> {
    match extension(name) {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(SelectionError::UnsupportedExtension(name.to_string())),
    }
}

fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}
