//! # エラーレスポンス
//!
//! どちらも `detail` キーを持つ 2 つの形:
//!
//! - [`DetailResponse`]: 404 / 500 / 503 用の `{"detail": "item not found"}`
//! - [`ValidationErrorResponse`]: 422 用の `{"detail": [{"type", "loc", "msg", "input"}]}`
//!
//! データ型のみを定義する。axum のレスポンスへの変換は API クレートが行う。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 単一メッセージのエラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(example = json!({ "detail": "item not found" })))]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    /// 404: アイテムが存在しない
    pub fn item_not_found() -> Self {
        Self::new("item not found")
    }

    /// 503: CRUD 操作中にストアへ到達できなかった
    pub fn database_unavailable() -> Self {
        Self::new("database unavailable")
    }

    /// 503: Readiness チェックの失敗
    pub fn database_connection_failed() -> Self {
        Self::new("database connection failed")
    }

    /// 500: 内部の詳細を漏らさない固定メッセージ
    pub fn internal_error() -> Self {
        Self::new("internal server error")
    }
}

/// 422 レスポンス内の失敗した 1 フィールド
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ValidationErrorDetail {
    /// エラー分類（`missing`, `too_short`, `too_long`, `out_of_range`, `type_error`）
    #[serde(rename = "type")]
    pub error_type: String,
    /// フィールドの位置（例: `["body", "name"]`）
    pub loc:        Vec<String>,
    pub msg:        String,
    /// 失敗した入力値（任意の JSON 値）
    pub input:      Value,
}

/// 422 レスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "openapi",
    schema(example = json!({
        "detail": [{
            "type": "missing",
            "loc": ["body", "name"],
            "msg": "Field required",
            "input": {}
        }]
    }))
)]
pub struct ValidationErrorResponse {
    pub detail: Vec<ValidationErrorDetail>,
}


#[cfg(all(test, feature = "openapi"))]
mod openapi_tests {
    use utoipa::{
        PartialSchema,
        openapi::{RefOr, Schema},
    };

    use super::*;

    #[test]
    fn test_validation_error_detailのスキーマはserdeのリネームに従う() {
        let RefOr::T(Schema::Object(object)) = ValidationErrorDetail::schema() else {
            panic!("インラインのオブジェクトスキーマであること");
        };

        assert!(object.properties.contains_key("type"));
        assert!(!object.properties.contains_key("error_type"));
    }
}
