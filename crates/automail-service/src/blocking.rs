use automail_core::{ApiEndpoints, DeleteReport, Upload, UploadResult};
use tokio::runtime::Runtime;

use crate::{DocumentService, HttpService, ServiceError, UploadPayload};

/// Blocking wrapper around the async `HttpService`.
///
/// Creates an internal tokio runtime and uses `block_on()` for each call.
/// Designed for sync callers like the TUI.
pub struct BlockingHttpService {
    inner: HttpService,
    rt: Runtime,
}

impl BlockingHttpService {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::from_service(HttpService::from_base_url(base_url)?)
    }

    pub fn from_service(inner: HttpService) -> Result<Self, ServiceError> {
        let rt = Runtime::new()
            .map_err(|e| ServiceError::Internal(format!("failed to create tokio runtime: {e}")))?;
        Ok(Self { inner, rt })
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        self.inner.endpoints()
    }

    pub fn upload(&self, payload: &UploadPayload) -> Result<UploadResult, ServiceError> {
        self.rt.block_on(self.inner.upload(payload))
    }

    pub fn list_uploads(&self) -> Result<Vec<Upload>, ServiceError> {
        self.rt.block_on(self.inner.list_uploads())
    }

    pub fn get_upload(&self, id: &str) -> Result<Upload, ServiceError> {
        self.rt.block_on(self.inner.get_upload(id))
    }

    pub fn delete_upload(&self, id: &str) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.delete_upload(id))
    }

    pub fn delete_uploads(&self, ids: &[String]) -> DeleteReport {
        self.rt.block_on(self.inner.delete_uploads(ids))
    }
}
