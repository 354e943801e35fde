//! # リポジトリ
//!
//! 永続化をトレイトの背後に置く。本番では PostgreSQL 実装、
//! テストではインメモリ実装に対してハンドラを動かす。

pub mod item_repository;

pub use item_repository::{ItemRepository, PostgresItemRepository};
