//! In-process stand-in for the document-processing backend.
//!
//! Serves the four routes the client uses from an in-memory list, records
//! how many requests arrived, and can be told to fail. Used by the
//! integration tests of the service and TUI crates.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use automail_core::Upload;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

#[derive(Debug)]
pub struct StubState {
    /// Newest first, like the real listing.
    pub uploads: Vec<Upload>,
    pub upload_requests: usize,
    pub list_requests: usize,
    pub delete_requests: usize,
    pub upload_failure: Option<(StatusCode, String)>,
    pub failing_deletes: HashSet<String>,
    pub categoria: String,
    pub resposta_automatica: String,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            uploads: Vec::new(),
            upload_requests: 0,
            list_requests: 0,
            delete_requests: 0,
            upload_failure: None,
            failing_deletes: HashSet::new(),
            categoria: "Produtivo".into(),
            resposta_automatica: "Olá! Recebemos sua solicitação e retornaremos em breve.".into(),
        }
    }
}

pub type SharedState = Arc<Mutex<StubState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, StubState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/upload", post(upload))
        .route("/uploads", get(list_uploads))
        .route("/uploads/{id}", get(get_upload).delete(delete_upload))
        .layer(DefaultBodyLimit::max(25 * 1024 * 1024))
        .with_state(state)
}

async fn upload(State(state): State<SharedState>, mut multipart: Multipart) -> ApiResult<Json<Value>> {
    lock(&state).upload_requests += 1;

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| error(StatusCode::BAD_REQUEST, "error", &e.to_string()))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| error(StatusCode::BAD_REQUEST, "error", &e.to_string()))?;
            file = Some((name, bytes.to_vec()));
        }
    }
    let Some((filename, bytes)) = file else {
        return Err(error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "detail",
            "field required: file",
        ));
    };

    let mut st = lock(&state);
    if let Some((status, msg)) = st.upload_failure.clone() {
        return Err(error(status, "error", &msg));
    }

    let texto_extraido = if filename.to_ascii_lowercase().ends_with(".txt") {
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        String::new()
    };
    let record = Upload {
        id: uuid::Uuid::new_v4().to_string(),
        filename,
        texto_extraido,
        categoria: st.categoria.clone(),
        resposta_automatica: st.resposta_automatica.clone(),
        resultado_itzam: String::new(),
        created_at: Some(chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()),
    };
    tracing::debug!(id = %record.id, "stub stored upload");
    st.uploads.insert(0, record.clone());

    let mut body = json!(record);
    if let Some(obj) = body.as_object_mut() {
        obj.remove("created_at");
    }
    Ok(Json(body))
}

async fn list_uploads(State(state): State<SharedState>) -> Json<Value> {
    let mut st = lock(&state);
    st.list_requests += 1;
    Json(json!({ "uploads": st.uploads }))
}

async fn get_upload(State(state): State<SharedState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let found = lock(&state).uploads.iter().find(|u| u.id == id).cloned();
    found
        .map(|u| Json(json!(u)))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "detail", "Upload não encontrado"))
}

async fn delete_upload(State(state): State<SharedState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut st = lock(&state);
    st.delete_requests += 1;
    if st.failing_deletes.contains(&id) {
        return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "error", "database is locked"));
    }
    let before = st.uploads.len();
    st.uploads.retain(|u| u.id != id);
    if st.uploads.len() == before {
        return Err(error(StatusCode::NOT_FOUND, "detail", "Upload não encontrado"));
    }
    Ok(Json(json!({ "message": "Upload excluído com sucesso" })))
}

fn error(status: StatusCode, key: &str, msg: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ key: msg })))
}

/// A running stub with its base URL and a handle on its state.
pub struct StubServer {
    pub base_url: String,
    state: SharedState,
    _handle: Option<tokio::task::JoinHandle<()>>,
}

impl StubServer {
    pub fn seed(&self, uploads: Vec<Upload>) {
        lock(&self.state).uploads = uploads;
    }

    pub fn uploads(&self) -> Vec<Upload> {
        lock(&self.state).uploads.clone()
    }

    pub fn upload_requests(&self) -> usize {
        lock(&self.state).upload_requests
    }

    pub fn list_requests(&self) -> usize {
        lock(&self.state).list_requests
    }

    pub fn delete_requests(&self) -> usize {
        lock(&self.state).delete_requests
    }

    /// Make every subsequent upload answer `status` with `{"error": msg}`.
    pub fn fail_uploads(&self, status: u16, msg: &str) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        lock(&self.state).upload_failure = Some((status, msg.to_string()));
    }

    /// Make deletes of `id` answer 500 and keep the record.
    pub fn fail_delete(&self, id: &str) {
        lock(&self.state).failing_deletes.insert(id.to_string());
    }

    pub fn classify_as(&self, categoria: &str, resposta_automatica: &str) {
        let mut st = lock(&self.state);
        st.categoria = categoria.to_string();
        st.resposta_automatica = resposta_automatica.to_string();
    }
}

/// Spawn the stub on `127.0.0.1:0` inside the current runtime.
pub async fn spawn_stub_server() -> StubServer {
    let state = SharedState::default();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state.clone());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    StubServer {
        base_url: format!("http://{addr}"),
        state,
        _handle: Some(handle),
    }
}

/// Spawn the stub on its own thread and runtime.
///
/// `BlockingHttpService` owns a runtime too, so sync tests must keep the
/// server out of theirs to avoid nesting.
pub fn spawn_stub_server_on_thread() -> StubServer {
    let (tx, rx) = std::sync::mpsc::sync_channel(1);
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let server = spawn_stub_server().await;
            tx.send((server.base_url.clone(), server.state.clone()))
                .unwrap();
            std::future::pending::<()>().await;
        });
    });
    let (base_url, state) = rx.recv().unwrap();
    StubServer {
        base_url,
        state,
        _handle: None,
    }
}

/// A ready-made record for seeding.
pub fn sample_upload(id: &str, categoria: &str) -> Upload {
    Upload {
        id: id.to_string(),
        filename: format!("{id}.txt"),
        texto_extraido: format!("Texto extraído do documento {id}."),
        categoria: categoria.to_string(),
        resposta_automatica: format!("Resposta para {id}."),
        resultado_itzam: String::new(),
        created_at: Some("2025-09-14 18:05:09".to_string()),
    }
}
