//! # Items API
//!
//! PostgreSQL に保存したアイテムの CRUD と、Liveness / Readiness チェックを
//! 提供する HTTP サービス。
//!
//! ## モジュール構成
//!
//! - [`app`] - ルーターとミドルウェアスタック
//! - [`config`] - 環境変数からの設定読み込み
//! - [`error`] - API エラーと HTTP レスポンスへの変換
//! - [`extract`] - バリデーション付きエクストラクタ
//! - [`handler`] - リクエストハンドラ
//! - [`middleware`] - アクセスログ
//! - [`openapi`] - OpenAPI 仕様
//!
//! ## 依存クレート
//!
//! - `items_domain`: アイテムモデルと入力バリデーション
//! - `items_infra`: PostgreSQL プールとリポジトリ
//! - `items_shared`: レスポンス型と Observability
//!
//! ```rust,ignore
//! use items_api::{app::build_app, handler::AppState};
//! use items_infra::repository::PostgresItemRepository;
//!
//! let state = AppState::new(Arc::new(PostgresItemRepository::new(pool)));
//! let app = build_app(state);
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod middleware;
pub mod openapi;
