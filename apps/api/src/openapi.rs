//! # OpenAPI 仕様定義
//!
//! utoipa でハンドラと Rust の型から OpenAPI 仕様を生成する。
//! `ApiDoc::openapi()` でドキュメントを取得でき、`GET /openapi.json` で配信する。

use axum::Json;
use utoipa::OpenApi;

use crate::handler::{health, item};

#[derive(OpenApi)]
#[openapi(
   info(
      title = "Items API",
      version = "1.0.0",
      description = "アイテム（Items）を管理するシンプルな REST API"
   ),
   paths(
      // health
      health::health_check,
      health::database_health_check,
      // items
      item::list_items,
      item::get_item,
      item::create_item,
      item::update_item,
      item::delete_item,
   ),
   tags(
      (name = "health", description = "ヘルスチェック"),
      (name = "items", description = "アイテム管理"),
   )
)]
pub struct ApiDoc;

/// GET /openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_タイトルとバージョンが設定されている() {
        let doc = ApiDoc::openapi();

        assert_eq!(doc.info.title, "Items API");
        assert_eq!(doc.info.version, "1.0.0");
    }

    #[test]
    fn test_全タグが含まれている() {
        let doc = ApiDoc::openapi();
        let tags: Vec<&str> = doc
            .tags
            .as_ref()
            .expect("tags が存在すること")
            .iter()
            .map(|t| t.name.as_str())
            .collect();

        assert_eq!(tags, vec!["health", "items"]);
    }

    #[test]
    fn test_レスポンス型のスキーマが登録されている() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components が存在すること");

        for name in [
            "ItemDto",
            "CreateItemRequest",
            "UpdateItemRequest",
            "HealthResponse",
            "DatabaseHealthResponse",
            "DetailResponse",
            "ValidationErrorResponse",
        ] {
            assert!(
                components.schemas.contains_key(name),
                "{name} スキーマが登録されていること"
            );
        }
    }
}
