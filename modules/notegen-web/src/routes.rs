//! Axum route handlers for the notegen web front end.

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, Json};
use axum::routing::{get, post};
use notegen_backend::{NoteGenConfig, NoteGenError, NotePipeline};
use notegen_web_types::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::page::INDEX_HTML;

pub struct AppState {
    pub config_path: PathBuf,
    pub start_time: Instant,
    pub notes_created: AtomicU64,
    pub failures: AtomicU64,
    /// Serializes generation runs so only one inference call is in flight
    pub run_lock: tokio::sync::Mutex<()>,
}

impl AppState {
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            start_time: Instant::now(),
            notes_created: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Saved config with the request's overrides applied, persisted for next time
    fn resolve_config(&self, overrides: &ConfigOverrides) -> Result<NoteGenConfig, NoteGenError> {
        let config = merge_overrides(NoteGenConfig::load_from(&self.config_path), overrides);
        config.save_to(&self.config_path)?;
        Ok(config)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/rpc/config", get(config))
        .route("/rpc/run-one", post(run_one))
        .route("/rpc/upload", post(upload))
        .route("/rpc/status", get(status))
        .with_state(state)
}

pub fn merge_overrides(mut config: NoteGenConfig, overrides: &ConfigOverrides) -> NoteGenConfig {
    if let Some(url) = non_blank(&overrides.api_url) {
        config.api_url = url;
    }
    if let Some(dir) = non_blank(&overrides.notes_dir) {
        config.notes_dir = dir;
    }
    if let Some(secs) = overrides.delay_meta_content {
        config.delay_meta_content_secs = secs;
    }
    if let Some(secs) = overrides.delay_between_rows {
        config.delay_between_rows_secs = secs;
    }
    config
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Record a text form field from the upload form
fn apply_form_field(overrides: &mut ConfigOverrides, name: &str, value: &str) {
    let value = value.trim();
    match name {
        "api_url" => overrides.api_url = Some(value.to_string()),
        "notes_dir" => overrides.notes_dir = Some(value.to_string()),
        "delay_meta_content" => overrides.delay_meta_content = value.parse().ok(),
        "delay_between_rows" => overrides.delay_between_rows = value.parse().ok(),
        _ => log::debug!("Ignoring form field {}", name),
    }
}

fn config_view(config: &NoteGenConfig) -> ConfigView {
    ConfigView {
        api_url: config.api_url.clone(),
        notes_dir: config.notes_dir.clone(),
        delay_meta_content: config.delay_meta_content_secs,
        delay_between_rows: config.delay_between_rows_secs,
        request_timeout: config.request_timeout_secs,
        continue_on_error: config.continue_on_error,
    }
}

fn error_status(e: &NoteGenError) -> StatusCode {
    if e.is_network() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn failure<T: serde::Serialize>(e: NoteGenError) -> (StatusCode, Json<RpcResponse<T>>) {
    (error_status(&e), Json(RpcResponse::err(e.to_string())))
}

// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// GET /rpc/config
pub async fn config(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<ConfigView>>) {
    let config = NoteGenConfig::load_from(&state.config_path);
    (StatusCode::OK, Json(RpcResponse::ok(config_view(&config))))
}

// POST /rpc/run-one
pub async fn run_one(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RunOneRequest>, JsonRejection>,
) -> (StatusCode, Json<RpcResponse<RunOneResult>>) {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return (
                rejection.status(),
                Json(RpcResponse::err(rejection.body_text())),
            )
        }
    };
    let config = match state.resolve_config(&req.overrides) {
        Ok(c) => c,
        Err(e) => return failure(e),
    };
    let pipeline = match NotePipeline::from_config(&config) {
        Ok(p) => p,
        Err(e) => return failure(e),
    };

    let _running = state.run_lock.lock().await;
    match pipeline.process_subject(&req.subject).await {
        Ok(path) => {
            if path.is_some() {
                state.notes_created.fetch_add(1, Ordering::Relaxed);
            }
            let result = RunOneResult {
                path: path.map(|p| p.display().to_string()),
            };
            (StatusCode::OK, Json(RpcResponse::ok(result)))
        }
        Err(e) => {
            log::error!("run-one failed: {}", e);
            state.failures.fetch_add(1, Ordering::Relaxed);
            failure(e)
        }
    }
}

// POST /rpc/upload (multipart: `file` plus optional setting fields)
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> (StatusCode, Json<RpcResponse<UploadResult>>) {
    let mut overrides = ConfigOverrides::default();
    let mut file_text: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(RpcResponse::err(format!("Invalid upload: {}", e))),
                )
            }
        };
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            match field.bytes().await {
                Ok(bytes) => file_text = Some(String::from_utf8_lossy(&bytes).into_owned()),
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(RpcResponse::err(format!("Invalid file part: {}", e))),
                    )
                }
            }
        } else {
            match field.text().await {
                Ok(value) => apply_form_field(&mut overrides, &name, &value),
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(RpcResponse::err(format!("Invalid field {}: {}", name, e))),
                    )
                }
            }
        }
    }

    let config = match state.resolve_config(&overrides) {
        Ok(c) => c,
        Err(e) => return failure(e),
    };
    let Some(text) = file_text else {
        return (StatusCode::OK, Json(RpcResponse::ok(UploadResult::default())));
    };
    let pipeline = match NotePipeline::from_config(&config) {
        Ok(p) => p,
        Err(e) => return failure(e),
    };

    let _running = state.run_lock.lock().await;
    let report = pipeline.process_batch_text(&text).await;
    state
        .notes_created
        .fetch_add(report.created.len() as u64, Ordering::Relaxed);
    state
        .failures
        .fetch_add(report.failures.len() as u64, Ordering::Relaxed);

    let result = UploadResult {
        paths: report
            .created
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        failures: report
            .failures
            .iter()
            .map(|f| FailureInfo {
                subject: f.subject.clone(),
                error: f.error.to_string(),
            })
            .collect(),
        aborted: report.aborted,
    };
    (StatusCode::OK, Json(RpcResponse::ok(result)))
}

// GET /rpc/status
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<ServiceStatus>>) {
    let status = ServiceStatus {
        running: true,
        uptime_secs: state.start_time.elapsed().as_secs(),
        notes_created: state.notes_created.load(Ordering::Relaxed),
        failures: state.failures.load(Ordering::Relaxed),
    };
    (StatusCode::OK, Json(RpcResponse::ok(status)))
}
