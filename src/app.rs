#![cfg(feature = "web")]

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::downloader;
use crate::industry::Industry;
use crate::loader;
use crate::record::FinancialRecord;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Multipart field carrying the uploaded workbook.
pub const UPLOAD_FIELD: &str = "workbook";

pub struct AppState {
    /// Last successful import; failed imports never touch it.
    record: Mutex<Option<FinancialRecord>>,
    default_industry: Industry,
}

#[derive(Deserialize)]
struct IndustryQuery {
    industry: Option<String>,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

impl AppState {
    pub fn new(default_industry: Industry) -> Self {
        AppState {
            record: Mutex::new(None),
            default_industry,
        }
    }

    fn industry(&self, params: IndustryQuery) -> Industry {
        params
            .industry
            .map(Industry::from)
            .unwrap_or_else(|| self.default_industry.clone())
    }
}

/// Routes of the upload service, without the listener.
pub fn router(config: &ServerConfig) -> Router {
    let app_state = Arc::new(AppState::new(config.default_industry.clone()));

    Router::new()
        .route("/health", get(health))
        .route("/api/import", post(import_workbook))
        .route("/api/data", get(get_data))
        .route("/api/template", get(download_template))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(&config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    log::info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn import_workbook(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IndustryQuery>,
    mut multipart: Multipart,
) -> Response {
    let mut file_data = Vec::new();

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some(UPLOAD_FIELD) {
                    continue;
                }
                match field.bytes().await {
                    Ok(bytes) => file_data = bytes.to_vec(),
                    Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
                }
            }
            Ok(None) => break,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        }
    }

    if file_data.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No file data received".to_string());
    }

    let industry = state.industry(params);
    match loader::import_workbook(&file_data, industry) {
        Ok(record) => {
            let mut current = state.record.lock().unwrap_or_else(PoisonError::into_inner);
            *current = Some(record.clone());
            Json(record).into_response()
        }
        Err(e) => {
            log::warn!("Rejected upload of {} bytes: {}", file_data.len(), e);
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

async fn get_data(State(state): State<Arc<AppState>>) -> Response {
    let current = state.record.lock().unwrap_or_else(PoisonError::into_inner);

    match current.as_ref() {
        Some(record) => Json(record).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "No data imported yet".to_string()),
    }
}

async fn download_template(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IndustryQuery>,
) -> Response {
    let industry = state.industry(params);

    match downloader::template_workbook() {
        Ok(bytes) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                downloader::template_filename(&industry)
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(StatusResponse {
            status: "error".to_string(),
            message: Some(message),
        }),
    )
        .into_response()
}
