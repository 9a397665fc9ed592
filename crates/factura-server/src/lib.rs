pub mod fields;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use factura_core::extraction::WordExtractor;
use fields::FieldExtractor;

/// Per-process collaborators shared across requests. Everything here is
/// immutable; each request runs its own independent pipeline.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn WordExtractor>,
    pub fields: Arc<dyn FieldExtractor>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/Getexcel", post(handlers::get_excel))
        .with_state(state)
}
