//! HTTP surface: configuration, router, and request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::error::{ApiError, Result};
use crate::features::{add_interaction_features, rows_from_csv, Row};
use crate::model::PricePipeline;
use crate::types::{HealthResponse, PredictionResponse, RideRequest};

/// Server configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            model_path: std::env::var("MODEL_PATH")
                .unwrap_or_else(|_| "best_optimized_price_model.json".to_string())
                .into(),
            max_upload_size: std::env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16 * 1024 * 1024), // 16MB
        }
    }
}

/// Shared application state: the pipeline handle, read-only after startup,
/// so no locking.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PricePipeline>,
}

pub fn create_router(state: AppState, max_upload_size: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/predict_batch", post(predict_batch))
        .layer(DefaultBodyLimit::max(max_upload_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Round a predicted price to 2 decimal places for the response.
pub fn round2(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

async fn health(State(_state): State<AppState>) -> Json<HealthResponse> {
    // Startup aborts when the artifact cannot be loaded, so a serving
    // process always has the model.
    Json(HealthResponse {
        status: "ok",
        model_loaded: true,
    })
}

async fn predict(
    State(state): State<AppState>,
    Json(request): Json<RideRequest>,
) -> Result<Json<PredictionResponse>> {
    let mut row = request.into_row();
    add_interaction_features(&mut row).map_err(|e| ApiError::Prediction(e.to_string()))?;

    let price = state
        .pipeline
        .predict_row(&row)
        .map_err(|e| ApiError::Prediction(e.to_string()))?;

    Ok(Json(PredictionResponse {
        predicted_price: round2(price),
    }))
}

async fn predict_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<Row>>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(e.to_string()))?
        .ok_or_else(|| ApiError::InvalidUpload("no file uploaded".to_string()))?;

    let file_name = field.file_name().unwrap_or_default().to_string();
    if !file_name.ends_with(".csv") {
        return Err(ApiError::InvalidUpload(
            "Invalid file type. Please upload a CSV.".to_string(),
        ));
    }

    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;
    info!("received file: {} ({} bytes)", file_name, data.len());

    let mut rows = rows_from_csv(&data).map_err(|e| ApiError::Prediction(e.to_string()))?;
    for row in &mut rows {
        add_interaction_features(row).map_err(|e| ApiError::Prediction(e.to_string()))?;
    }

    let prices = state
        .pipeline
        .predict(&rows)
        .map_err(|e| ApiError::Prediction(e.to_string()))?;
    info!("scored batch: {} rows", rows.len());

    for (row, price) in rows.iter_mut().zip(prices) {
        row.insert("predicted_price".into(), json!(round2(price)));
    }

    Ok(Json(rows))
}
