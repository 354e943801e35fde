//! # テスト用インメモリリポジトリ
//!
//! 他のクレートからは `test-utils` feature で有効にする:
//!
//! ```toml
//! [dev-dependencies]
//! items-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use items_domain::{
    item::{Item, ItemId, ItemPatch, NewItem},
    pagination::ListQuery,
};

use crate::{error::InfraError, repository::ItemRepository};

// ===== MockItemRepository =====

#[derive(Default)]
struct Table {
    rows:    Vec<Item>,
    last_id: i64,
}

/// PostgreSQL リポジトリと同じ振る舞いをする
///
/// ID は再利用されないシーケンスから採番し、一覧は ID 順に並べる。
#[derive(Clone, Default)]
pub struct MockItemRepository {
    table: Arc<Mutex<Table>>,
}

impl MockItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みアイテム数
    pub fn len(&self) -> usize {
        self.table.lock().unwrap().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ItemRepository for MockItemRepository {
    async fn insert(&self, new_item: &NewItem) -> Result<Item, InfraError> {
        let mut table = self.table.lock().unwrap();
        table.last_id += 1;
        let item = Item::from_db(
            ItemId::from_db(table.last_id),
            new_item.name.clone(),
            new_item.description.clone(),
        );
        table.rows.push(item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, InfraError> {
        Ok(self
            .table
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|item| item.id() == id)
            .cloned())
    }

    async fn find_all(&self, query: &ListQuery) -> Result<Vec<Item>, InfraError> {
        let needle = query.name_filter().map(str::to_lowercase);
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit()).unwrap_or(0);

        let table = self.table.lock().unwrap();
        let mut matching: Vec<Item> = table
            .rows
            .iter()
            .filter(|item| match &needle {
                Some(needle) => item.name().as_str().to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by_key(Item::id);

        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Option<Item>, InfraError> {
        let mut table = self.table.lock().unwrap();
        let Some(slot) = table.rows.iter_mut().find(|item| item.id() == id) else {
            return Ok(None);
        };
        *slot = slot.apply(patch);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: ItemId) -> Result<bool, InfraError> {
        let mut table = self.table.lock().unwrap();
        let before = table.rows.len();
        table.rows.retain(|item| item.id() != id);
        Ok(table.rows.len() < before)
    }

    async fn ping(&self) -> Result<(), InfraError> {
        Ok(())
    }
}

// ===== FailingItemRepository =====

/// 全呼び出しが失敗するリポジトリ（エラーマッピングの検証用）
#[derive(Clone, Copy)]
pub struct FailingItemRepository {
    unavailable: bool,
}

impl FailingItemRepository {
    /// プールから接続を取得できなかったものとして失敗する
    pub fn unavailable() -> Self {
        Self { unavailable: true }
    }

    /// DB が文を拒否したものとして失敗する
    pub fn broken() -> Self {
        Self { unavailable: false }
    }

    fn error(&self) -> InfraError {
        if self.unavailable {
            sqlx::Error::PoolTimedOut.into()
        } else {
            sqlx::Error::Protocol("injected failure".to_string()).into()
        }
    }
}

#[async_trait]
impl ItemRepository for FailingItemRepository {
    async fn insert(&self, _new_item: &NewItem) -> Result<Item, InfraError> {
        Err(self.error())
    }

    async fn find_by_id(&self, _id: ItemId) -> Result<Option<Item>, InfraError> {
        Err(self.error())
    }

    async fn find_all(&self, _query: &ListQuery) -> Result<Vec<Item>, InfraError> {
        Err(self.error())
    }

    async fn update(&self, _id: ItemId, _patch: &ItemPatch) -> Result<Option<Item>, InfraError> {
        Err(self.error())
    }

    async fn delete(&self, _id: ItemId) -> Result<bool, InfraError> {
        Err(self.error())
    }

    async fn ping(&self) -> Result<(), InfraError> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use items_domain::item::{ItemName, Patch};
    use pretty_assertions::assert_eq;

    use super::*;

    fn new_item(name: &str) -> NewItem {
        NewItem {
            name:        ItemName::new(name).unwrap(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_削除後もidは再利用されない() {
        let repo = MockItemRepository::new();
        let first = repo.insert(&new_item("a")).await.unwrap();
        repo.delete(first.id()).await.unwrap();

        let second = repo.insert(&new_item("b")).await.unwrap();

        assert_eq!(second.id().as_i64(), 2);
    }

    #[tokio::test]
    async fn test_find_allは大文字小文字を区別せずに絞り込む() {
        let repo = MockItemRepository::new();
        for name in ["xABCx", "other", "abc"] {
            repo.insert(&new_item(name)).await.unwrap();
        }

        let query = ListQuery::new(10, 0, Some("aBc".to_string()));
        let names: Vec<String> = repo
            .find_all(&query)
            .await
            .unwrap()
            .iter()
            .map(|item| item.name().to_string())
            .collect();

        assert_eq!(names, vec!["xABCx", "abc"]);
    }

    #[tokio::test]
    async fn test_存在しないアイテムの更新はnoneを返す() {
        let repo = MockItemRepository::new();
        let patch = ItemPatch {
            name:        None,
            description: Patch::Clear,
        };

        let result = repo.update(ItemId::from_db(1), &patch).await.unwrap();

        assert_eq!(result, None);
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_failing_repositoryは到達可否を区別する() {
        let unavailable = FailingItemRepository::unavailable().ping().await.unwrap_err();
        let broken = FailingItemRepository::broken().ping().await.unwrap_err();

        assert!(unavailable.is_unavailable());
        assert!(!broken.is_unavailable());
    }
}
