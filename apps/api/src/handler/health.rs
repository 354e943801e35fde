//! # ヘルスチェックハンドラ
//!
//! - `GET /health`: Liveness Check（DB に触れずに応答する）
//! - `GET /health/db`: Readiness Check（DB に ping する。上限 5 秒はリポジトリ側で制御）

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use items_shared::{DatabaseHealthResponse, DetailResponse, HealthResponse};

use super::AppState;

/// Liveness Check が返すサービス名
pub const SERVICE_NAME: &str = "items api";

/// API の稼働確認
///
/// API が起動してリクエストを処理できることを確認する。
#[utoipa::path(
   get,
   path = "/health",
   tag = "health",
   responses(
      (status = 200, description = "API は正常に稼働している", body = HealthResponse,
         example = json!({ "status": "healthy", "service": "items api", "version": "1.0.0" }))
   )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
    ))
}

/// データベース接続の確認
///
/// PostgreSQL に `SELECT 1` を発行して接続を確認する。
#[utoipa::path(
   get,
   path = "/health/db",
   tag = "health",
   responses(
      (status = 200, description = "データベースに接続できる", body = DatabaseHealthResponse,
         example = json!({ "status": "healthy", "database": "connected" })),
      (status = 503, description = "データベースに接続できない", body = DetailResponse,
         example = json!({ "detail": "database connection failed" }))
   )
)]
#[tracing::instrument(skip_all)]
pub async fn database_health_check(State(state): State<Arc<AppState>>) -> Response {
    match state.item_repository.ping().await {
        Ok(()) => (StatusCode::OK, Json(DatabaseHealthResponse::connected())).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check: データベースへの ping に失敗しました");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(DetailResponse::database_connection_failed()),
            )
                .into_response()
        }
    }
}
