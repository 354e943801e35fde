//! # ItemRepository
//!
//! [`Item`] の永続化を担当する。各メソッドは SQL 文を 1 つだけ発行するため、
//! 明示的なトランザクションは不要。
//!
//! クエリは `sqlx::query_as` で実行時に組み立て、[`ItemRow`] 経由で変換する。
//! ビルド時に DB 接続を必要としない。

use std::time::Duration;

use async_trait::async_trait;
use items_domain::{
    item::{Item, ItemId, ItemName, ItemPatch, NewItem, Patch},
    pagination::ListQuery,
};
use sqlx::PgPool;

use crate::error::InfraError;

/// Readiness チェックの ping の上限時間
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// アイテムリポジトリトレイト
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// アイテムを挿入し、採番された ID 付きで返す
    async fn insert(&self, new_item: &NewItem) -> Result<Item, InfraError>;

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, InfraError>;

    /// ID 昇順で 1 ページ分のアイテムを返す
    ///
    /// 名前フィルタは大文字小文字を区別しない部分一致。
    /// `%` と `_` は特別な意味を持たない。
    async fn find_all(&self, query: &ListQuery) -> Result<Vec<Item>, InfraError>;

    /// 部分更新を適用する
    ///
    /// 該当 ID のアイテムがなければ `None`。空のパッチは保存済みのアイテムを
    /// そのまま返す。
    async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Option<Item>, InfraError>;

    /// アイテムを削除し、行が存在したかを返す
    async fn delete(&self, id: ItemId) -> Result<bool, InfraError>;

    /// 簡単な文を往復させ、ストアに到達できることを確認する
    async fn ping(&self) -> Result<(), InfraError>;
}

/// 以下の `RETURNING` / `SELECT` で共通の行の形
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id:          i64,
    name:        String,
    description: Option<String>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        // VARCHAR(255) NOT NULL により保存済みの名前は範囲内
        Item::from_db(
            ItemId::from_db(row.id),
            ItemName::from_db(row.name),
            row.description,
        )
    }
}

/// [`ItemRepository`] の PostgreSQL 実装
#[derive(Debug, Clone)]
pub struct PostgresItemRepository {
    pool: PgPool,
}

impl PostgresItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PostgresItemRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert(&self, new_item: &NewItem) -> Result<Item, InfraError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO items (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#,
        )
        .bind(new_item.name.as_str())
        .bind(new_item.description.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, InfraError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, description
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(limit = query.limit(), offset = query.offset(), filtered = query.name_filter().is_some())
    )]
    async fn find_all(&self, query: &ListQuery) -> Result<Vec<Item>, InfraError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, description
            FROM items
            WHERE $1::TEXT IS NULL OR POSITION(LOWER($1::TEXT) IN LOWER(name)) > 0
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.name_filter())
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, fields = ?patch.touched_fields()))]
    async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Option<Item>, InfraError> {
        let (touch_description, description) = match &patch.description {
            Patch::Unchanged => (false, None),
            Patch::Clear => (true, None),
            Patch::Set(value) => (true, Some(value.as_str())),
        };

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            UPDATE items
            SET name = CASE WHEN $2::VARCHAR IS NULL THEN name ELSE $2::VARCHAR END,
                description = CASE WHEN $3 THEN $4::TEXT ELSE description END
            WHERE id = $1
            RETURNING id, name, description
            "#,
        )
        .bind(id.as_i64())
        .bind(patch.name.as_ref().map(ItemName::as_str))
        .bind(touch_description)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: ItemId) -> Result<bool, InfraError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn ping(&self) -> Result<(), InfraError> {
        let statement = sqlx::query("SELECT 1").execute(&self.pool);

        match tokio::time::timeout(PING_TIMEOUT, statement).await {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_) => Err(InfraError::timeout(PING_TIMEOUT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_リポジトリはsendかつsyncである() {
        assert_send_sync::<Box<dyn ItemRepository>>();
        assert_send_sync::<PostgresItemRepository>();
    }

    #[test]
    fn test_nullの説明はnoneに変換される() {
        let item: Item = ItemRow {
            id:          7,
            name:        "A".to_string(),
            description: None,
        }
        .into();

        assert_eq!(item.id().as_i64(), 7);
        assert_eq!(item.name().as_str(), "A");
        assert_eq!(item.description(), None);
    }
}
