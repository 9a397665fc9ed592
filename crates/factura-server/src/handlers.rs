use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;

use factura_core::error::FacturaError;
use factura_core::response::parse_extraction;
use factura_core::spreadsheet::render_workbook;

use crate::AppState;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLSX_DISPOSITION: &str = "attachment; filename=\"factura_generada.xlsx\"";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "factura-server is running",
    })
}

/// Convert an uploaded electricity-bill PDF into a downloadable workbook.
///
/// Linear pipeline: multipart upload → layout reconstruction → model call →
/// JSON parse → workbook render → attachment response. Every failure is
/// terminal for the request.
pub async fn get_excel(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut pdf_bytes: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name().unwrap_or("") == "file" {
            let filename = field.file_name().unwrap_or("factura.pdf").to_string();
            let data = field.bytes().await?;
            tracing::info!("archivo recibido: {filename} ({} bytes)", data.len());
            pdf_bytes = Some(data);
        }
    }

    let pdf = pdf_bytes.ok_or(AppError::MissingFile)?;

    // pdfium and the layout pass are synchronous; keep them off the runtime
    let extractor = Arc::clone(&state.extractor);
    let document = tokio::task::spawn_blocking(move || {
        factura_core::reconstruct_document(&pdf, extractor.as_ref())
    })
    .await??;
    tracing::debug!(chars = document.len(), "texto reconstruido");

    let reply = state
        .fields
        .extract_fields(&document)
        .await
        .map_err(AppError::Internal)?;
    tracing::debug!(chars = reply.len(), "respuesta del modelo recibida");

    let extraction = parse_extraction(&reply)?;
    let workbook = tokio::task::spawn_blocking(move || render_workbook(&extraction)).await??;

    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
        (header::CONTENT_DISPOSITION, XLSX_DISPOSITION),
    ];
    Ok((headers, workbook).into_response())
}

/// Application error type, mapped onto the endpoint's JSON error envelope.
#[derive(Debug)]
pub enum AppError {
    /// The multipart body carried no `file` field.
    MissingFile,
    /// The PDF yielded no usable text.
    EmptyExtraction,
    /// The model reply contained no parseable JSON object.
    InvalidModelJson { raw: String },
    /// Anything else, including upstream transport failures and timeouts.
    Internal(anyhow::Error),
}

impl From<FacturaError> for AppError {
    fn from(err: FacturaError) -> Self {
        match err {
            FacturaError::EmptyDocument => AppError::EmptyExtraction,
            FacturaError::ModelResponse { raw } => AppError::InvalidModelJson { raw },
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::Internal(err.into())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingFile => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "No se proporcionó un archivo" }),
            ),
            AppError::EmptyExtraction => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": "No se pudo extraer texto del archivo PDF." }),
            ),
            AppError::InvalidModelJson { raw } => {
                tracing::error!("la respuesta del modelo no contiene JSON válido");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Respuesta no es JSON válido", "raw": raw }),
                )
            }
            AppError::Internal(err) => {
                tracing::error!("error inesperado: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": err.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
