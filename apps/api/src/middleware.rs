//! # ミドルウェア
//!
//! `axum::middleware::from_fn` で組み込むリクエスト単位の処理。

pub mod request_log;

pub use request_log::log_request;
