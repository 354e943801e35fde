//! # Items ドメイン層
//!
//! `Item` エンティティと値オブジェクト、およびクライアント入力を
//! それらに変換するバリデーション層を提供する。
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//!  ↓  ↘__________↗
//! shared
//! ```
//!
//! domain クレートは HTTP にもデータベースにも依存しない。
//! [`validation`] と [`pagination`] の関数はすべて純粋関数で、入力を検査して
//! 型付きの値か [`ValidationError`] を返す。
//!
//! ## モジュール構成
//!
//! - [`item`] - `Item`, `ItemId`, `ItemName`, `NewItem`, `ItemPatch`
//! - [`validation`] - 作成・更新・ID のバリデーションとエラー分類
//! - [`pagination`] - 一覧取得のクエリパラメータ（`limit`, `offset`, `name`）
//!
//! ## 使用例
//!
//! ```rust
//! use items_domain::validation::{validate_create, validate_id};
//! use serde_json::json;
//!
//! let new_item = validate_create(&json!({ "name": "Test" })).unwrap();
//! assert_eq!(new_item.name.as_str(), "Test");
//! assert_eq!(new_item.description, None);
//!
//! assert!(validate_id("0").is_err());
//! ```

pub mod item;
pub mod pagination;
pub mod validation;

pub use item::{Item, ItemId, ItemName, ItemPatch, NewItem, Patch};
pub use pagination::{ListQuery, RawListParams};
pub use validation::{FieldError, FieldErrorKind, ValidationError};
