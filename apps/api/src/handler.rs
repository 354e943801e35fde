//! # HTTP ハンドラ
//!
//! ```text
//! handler.rs          # 再エクスポート
//! └── handler/
//!     ├── health.rs   # Liveness / Readiness チェック
//!     └── item.rs     # アイテム CRUD
//! ```
//!
//! ハンドラは薄く保つ。抽出と検証、リポジトリ呼び出し、結果のレスポンス変換のみ行う。

pub mod health;
pub mod item;

use std::sync::Arc;

use items_infra::repository::ItemRepository;

pub use health::{database_health_check, health_check};
pub use item::{
    CreateItemRequest,
    ItemDto,
    UpdateItemRequest,
    create_item,
    delete_item,
    get_item,
    list_items,
    update_item,
};

/// 全ルートで共有する State
pub struct AppState {
    pub item_repository: Arc<dyn ItemRepository>,
}

impl AppState {
    pub fn new(item_repository: Arc<dyn ItemRepository>) -> Arc<Self> {
        Arc::new(Self { item_repository })
    }
}
