//! # Items 共通ユーティリティ
//!
//! API クレートが使うレスポンス型と Observability 基盤。
//!
//! - ビジネスロジックは持たない
//! - axum に依存しない。HTTP レスポンスへの変換は API クレートの責務
//! - tracing 関連のヘルパーは `observability` feature の背後に置く
//! - OpenAPI スキーマの導出は `openapi` feature で有効にする

pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::{DetailResponse, ValidationErrorDetail, ValidationErrorResponse};
pub use health::{DatabaseHealthResponse, HealthResponse};
