//! # Items インフラ層
//!
//! PostgreSQL とやり取りするすべての処理。
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! 永続化する値は domain クレートが定義する。API クレートから見えるのは
//! [`repository::ItemRepository`] トレイトと [`InfraError`] だけ。
//!
//! ## モジュール構成
//!
//! - [`db`] - プール作成、スキーマ初期化、終了処理
//! - [`error`] - インフラ層エラー
//! - [`repository`] - アイテムリポジトリと PostgreSQL 実装
//! - `mock` - インメモリリポジトリ（`test-utils` feature）

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
