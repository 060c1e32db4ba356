use async_trait::async_trait;
use automail_core::file::SelectedFile;
use automail_core::{DeleteReport, SelectionError, Upload, UploadResult};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Bytes and metadata sent as the multipart `file` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadPayload {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a validated selection from disk.
    pub fn from_selected(file: &SelectedFile) -> Result<Self, SelectionError> {
        Ok(Self::new(file.name.clone(), file.mime_type(), file.read()?))
    }
}

/// The document-processing backend as seen by the client.
///
/// `HttpService` is the only production implementation; the TUI goes
/// through `BlockingHttpService`.
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn upload(&self, payload: &UploadPayload) -> Result<UploadResult, ServiceError>;
    async fn list_uploads(&self) -> Result<Vec<Upload>, ServiceError>;
    async fn get_upload(&self, id: &str) -> Result<Upload, ServiceError>;
    async fn delete_upload(&self, id: &str) -> Result<(), ServiceError>;

    /// Delete every id concurrently and wait for all of them to settle.
    ///
    /// Never fails as a whole; each id lands in `deleted` or `failed`.
    async fn delete_uploads(&self, ids: &[String]) -> DeleteReport {
        let outcomes = futures::future::join_all(ids.iter().map(|id| async move {
            (id.clone(), self.delete_upload(id).await)
        }))
        .await;

        let mut report = DeleteReport::default();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => report.deleted.push(id),
                Err(e) => {
                    tracing::warn!(upload_id = %id, "delete failed: {e}");
                    report.failed.push((id, e.to_string()));
                }
            }
        }
        report
    }
}
