//! # API エラー
//!
//! ハンドラとエクストラクタが返す唯一のエラー型と、その HTTP レスポンスへの変換。
//!
//! | ApiError | ステータス | ボディ |
//! |----------|--------|------|
//! | `Validation` | 422 | `{"detail": [{"type", "loc", "msg", "input"}, ...]}` |
//! | `NotFound` | 404 | `{"detail": "item not found"}` |
//! | `Store`（到達不可） | 503 | `{"detail": "database unavailable"}` |
//! | `Store`（その他） | 500 | `{"detail": "internal server error"}` |
//!
//! ストアの失敗は span trace 付きでログに出し、クライアントには返さない。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use items_domain::{FieldError, ValidationError};
use items_infra::InfraError;
use items_shared::{DetailResponse, ValidationErrorDetail, ValidationErrorResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("item not found")]
    NotFound,

    #[error("store failure: {0}")]
    Store(#[from] InfraError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => {
                let body = ValidationErrorResponse {
                    detail: err.into_errors().into_iter().map(to_detail).collect(),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(DetailResponse::item_not_found()),
            )
                .into_response(),
            ApiError::Store(err) => {
                let unavailable = err.is_unavailable();
                tracing::error!(
                    error.message = %err,
                    error.unavailable = unavailable,
                    span_trace = %err.span_trace(),
                    "ストア操作に失敗しました"
                );

                if unavailable {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        Json(DetailResponse::database_unavailable()),
                    )
                        .into_response()
                } else {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(DetailResponse::internal_error()),
                    )
                        .into_response()
                }
            }
        }
    }
}

fn to_detail(error: FieldError) -> ValidationErrorDetail {
    ValidationErrorDetail {
        error_type: error.kind.as_str().to_string(),
        loc:        error.loc,
        msg:        error.msg,
        input:      error.input,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_バリデーションエラーはフィールド詳細付きの422になる() {
        let err = items_domain::validation::validate_id("0").unwrap_err();

        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({
                "detail": [{
                    "type": "out_of_range",
                    "loc": ["path", "item_id"],
                    "msg": "Input should be greater than or equal to 1",
                    "input": "0"
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_not_foundは404になる() {
        let response = ApiError::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "detail": "item not found" }));
    }

    #[tokio::test]
    async fn test_到達できないストアは503になる() {
        let response = ApiError::from(InfraError::timeout(Duration::from_secs(5))).into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body_json(response).await,
            json!({ "detail": "database unavailable" })
        );
    }

    #[tokio::test]
    async fn test_その他のストア障害は詳細を隠して500になる() {
        let err: InfraError = sqlx::Error::Protocol("row decode failed".to_string()).into();

        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "detail": "internal server error" })
        );
    }
}
