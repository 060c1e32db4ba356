use std::time::Duration;

use async_trait::async_trait;
use automail_core::{ApiEndpoints, Upload, UploadList, UploadResult};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};

use crate::{DocumentService, ServiceError, UploadPayload};

/// Upper bound for one request. Extraction and classification of a large
/// PDF can take a while server-side.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Async HTTP client implementation of DocumentService.
#[derive(Debug, Clone)]
pub struct HttpService {
    endpoints: ApiEndpoints,
    client: Client,
}

impl HttpService {
    pub fn new(endpoints: ApiEndpoints) -> Self {
        Self {
            endpoints,
            client: Client::new(),
        }
    }

    pub fn with_timeout(endpoints: ApiEndpoints, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Internal(format!("http client: {e}")))?;
        Ok(Self { endpoints, client })
    }

    /// Normalize `raw` and build a client with the default timeout.
    pub fn from_base_url(raw: &str) -> Result<Self, ServiceError> {
        let endpoints =
            ApiEndpoints::new(raw).map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
        Self::with_timeout(endpoints, DEFAULT_TIMEOUT)
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        tracing::debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn delete_req(&self, url: Url) -> Result<(), ServiceError> {
        tracing::debug!(%url, "DELETE");
        let resp = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(parse_error(resp).await)
        }
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error(resp: reqwest::Response) -> ServiceError {
    let status = resp.status();
    parse_error_with_status(status, resp).await
}

/// Error bodies are `{"error": ...}` from handlers and `{"detail": ...}`
/// from the framework's own 404s.
async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v["error"]
                .as_str()
                .or_else(|| v["detail"].as_str())
                .map(String::from)
        })
        .unwrap_or(body);
    let msg = if msg.is_empty() {
        status.to_string()
    } else {
        msg
    };

    if status == StatusCode::NOT_FOUND {
        ServiceError::NotFound(msg)
    } else if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
        ServiceError::InvalidInput(msg)
    } else {
        ServiceError::Internal(msg)
    }
}

#[async_trait]
impl DocumentService for HttpService {
    async fn upload(&self, payload: &UploadPayload) -> Result<UploadResult, ServiceError> {
        let url = self.endpoints.upload();
        tracing::debug!(%url, filename = %payload.filename, bytes = payload.bytes.len(), "POST");

        let part = Part::bytes(payload.bytes.clone())
            .file_name(payload.filename.clone())
            .mime_str(&payload.mime_type)
            .map_err(|e| ServiceError::InvalidInput(format!("mime type: {e}")))?;
        let form = Form::new().part("file", part);

        let resp = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn list_uploads(&self) -> Result<Vec<Upload>, ServiceError> {
        let list: UploadList = self.get_json(self.endpoints.uploads()).await?;
        Ok(list.uploads)
    }

    async fn get_upload(&self, id: &str) -> Result<Upload, ServiceError> {
        self.get_json(self.endpoints.upload_by_id(id)).await
    }

    async fn delete_upload(&self, id: &str) -> Result<(), ServiceError> {
        self.delete_req(self.endpoints.upload_by_id(id)).await
    }
}
