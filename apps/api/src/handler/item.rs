//! # アイテム API ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /items` - アイテム一覧（名前での絞り込み、ページネーション）
//! - `GET /items/{item_id}` - アイテム取得
//! - `POST /items` - アイテム作成
//! - `PUT /items/{item_id}` - アイテムの部分更新
//! - `DELETE /items/{item_id}` - アイテム削除

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use items_domain::{
    Item,
    validation::{validate_create, validate_update},
};
use items_shared::{DetailResponse, ValidationErrorResponse};
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;
use crate::{
    error::ApiError,
    extract::{JsonBody, ListParams, ValidItemId},
};

// --- リクエスト型 ---
//
// ボディは `serde_json::Value` として受け取り `items_domain::validation` で
// 検証するため、以下は OpenAPI ドキュメント用の型。

/// アイテム作成リクエスト
#[derive(Debug, ToSchema)]
#[schema(example = json!({ "name": "New Item", "description": "New Description" }))]
pub struct CreateItemRequest {
    /// 1〜255 文字
    #[schema(min_length = 1, max_length = 255)]
    pub name:        String,
    pub description: Option<String>,
}

/// アイテム更新リクエスト
///
/// 指定したフィールドのみ更新する。`description` に `null` を指定すると削除する。
#[derive(Debug, ToSchema)]
#[schema(example = json!({ "name": "Updated Item", "description": "Updated Description" }))]
pub struct UpdateItemRequest {
    /// 1〜255 文字。`null` は指定できない
    #[schema(min_length = 1, max_length = 255)]
    pub name:        Option<String>,
    pub description: Option<String>,
}

// --- レスポンス型 ---

/// アイテムのレスポンス表現。`description` は常に出力し、未設定なら `null`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[schema(example = json!({ "id": 1, "name": "Item 1", "description": "Description 1" }))]
pub struct ItemDto {
    pub id:          i64,
    pub name:        String,
    pub description: Option<String>,
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        Self {
            id:          item.id().as_i64(),
            name:        item.name().as_str().to_string(),
            description: item.description().map(str::to_string),
        }
    }
}

// --- ハンドラ ---

/// アイテム一覧の取得
///
/// ID 順にページ単位で返す。`name` を指定すると大文字小文字を区別しない部分一致で絞り込む。
#[utoipa::path(
   get,
   path = "/items",
   tag = "items",
   params(
      ("limit" = Option<i64>, Query, description = "返す件数の上限（1〜100、デフォルト 10）", minimum = 1, maximum = 100),
      ("offset" = Option<i64>, Query, description = "読み飛ばす件数（0 以上、デフォルト 0）", minimum = 0),
      ("name" = Option<String>, Query, description = "名前の部分一致フィルタ（大文字小文字を区別しない）"),
   ),
   responses(
      (status = 200, description = "アイテム一覧", body = Vec<ItemDto>,
         example = json!([
            { "id": 1, "name": "Item 1", "description": "Description 1" },
            { "id": 2, "name": "Item 2", "description": "Description 2" }
         ])),
      (status = 422, description = "クエリパラメータが不正", body = ValidationErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    ListParams(query): ListParams,
) -> Result<Json<Vec<ItemDto>>, ApiError> {
    let items = state.item_repository.find_all(&query).await?;

    tracing::debug!(
        count = items.len(),
        limit = query.limit(),
        offset = query.offset(),
        "アイテム一覧を取得しました"
    );
    Ok(Json(items.into_iter().map(ItemDto::from).collect()))
}

/// アイテムの取得
#[utoipa::path(
   get,
   path = "/items/{item_id}",
   tag = "items",
   params(("item_id" = i64, Path, description = "アイテム ID（1 以上）", minimum = 1)),
   responses(
      (status = 200, description = "アイテム", body = ItemDto,
         example = json!({ "id": 1, "name": "Item 1", "description": "Description 1" })),
      (status = 404, description = "指定した ID のアイテムが存在しない", body = DetailResponse,
         example = json!({ "detail": "item not found" })),
      (status = 422, description = "ID が正の整数でない", body = ValidationErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    ValidItemId(id): ValidItemId,
) -> Result<Json<ItemDto>, ApiError> {
    let Some(item) = state.item_repository.find_by_id(id).await? else {
        tracing::warn!(item_id = %id, "アイテムが見つかりません");
        return Err(ApiError::NotFound);
    };

    Ok(Json(item.into()))
}

/// アイテムの作成
#[utoipa::path(
   post,
   path = "/items",
   tag = "items",
   request_body = CreateItemRequest,
   responses(
      (status = 201, description = "作成したアイテム", body = ItemDto,
         example = json!({ "id": 1, "name": "New Item", "description": "New Description" })),
      (status = 422, description = "リクエストボディが不正", body = ValidationErrorResponse,
         example = json!({
            "detail": [{ "type": "missing", "loc": ["body", "name"], "msg": "Field required", "input": {} }]
         }))
   )
)]
#[tracing::instrument(skip_all)]
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<ItemDto>), ApiError> {
    let new_item = validate_create(&body)?;
    let item = state.item_repository.insert(&new_item).await?;

    tracing::info!(item_id = %item.id(), "アイテムを作成しました");
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// アイテムの更新
///
/// ボディに含まれるフィールドのみ変更する。`"description": null` は説明を削除する。
#[utoipa::path(
   put,
   path = "/items/{item_id}",
   tag = "items",
   params(("item_id" = i64, Path, description = "アイテム ID（1 以上）", minimum = 1)),
   request_body = UpdateItemRequest,
   responses(
      (status = 200, description = "更新後のアイテム", body = ItemDto,
         example = json!({ "id": 1, "name": "Updated Item", "description": "Updated Description" })),
      (status = 404, description = "指定した ID のアイテムが存在しない", body = DetailResponse,
         example = json!({ "detail": "item not found" })),
      (status = 422, description = "ID またはリクエストボディが不正", body = ValidationErrorResponse,
         example = json!({
            "detail": [{ "type": "type_error", "loc": ["body", "name"], "msg": "Input should be a valid string", "input": 1 }]
         }))
   )
)]
#[tracing::instrument(skip_all)]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    ValidItemId(id): ValidItemId,
    JsonBody(body): JsonBody,
) -> Result<Json<ItemDto>, ApiError> {
    let patch = validate_update(&body)?;

    let Some(item) = state.item_repository.update(id, &patch).await? else {
        tracing::warn!(item_id = %id, "アイテムが見つかりません");
        return Err(ApiError::NotFound);
    };

    tracing::info!(item_id = %id, fields = ?patch.touched_fields(), "アイテムを更新しました");
    Ok(Json(item.into()))
}

/// アイテムの削除
#[utoipa::path(
   delete,
   path = "/items/{item_id}",
   tag = "items",
   params(("item_id" = i64, Path, description = "アイテム ID（1 以上）", minimum = 1)),
   responses(
      (status = 204, description = "削除した"),
      (status = 404, description = "指定した ID のアイテムが存在しない", body = DetailResponse,
         example = json!({ "detail": "item not found" })),
      (status = 422, description = "ID が正の整数でない", body = ValidationErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    ValidItemId(id): ValidItemId,
) -> Result<StatusCode, ApiError> {
    if !state.item_repository.delete(id).await? {
        tracing::warn!(item_id = %id, "アイテムが見つかりません");
        return Err(ApiError::NotFound);
    }

    tracing::info!(item_id = %id, "アイテムを削除しました");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use items_domain::{ItemId, ItemName};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_説明のないアイテムはnullとしてシリアライズされる() {
        let item = Item::from_db(ItemId::from_db(1), ItemName::new("Test").unwrap(), None);

        let json = serde_json::to_value(ItemDto::from(item)).unwrap();

        assert_eq!(json, json!({ "id": 1, "name": "Test", "description": null }));
    }
}
