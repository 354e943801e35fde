//! # バリデーション付きエクストラクタ
//!
//! axum の `Path` / `Query` / `Json` をラップし、リジェクションを
//! [`ApiError::Validation`] に揃える。不正な入力はフィールド検査の失敗と
//! 同じ 422 ボディになる。
//!
//! axum は `FromRequestParts` のエクストラクタをボディより先に実行する。
//! そのためボディも不正な場合でも、パスの ID エラーが優先して報告される。

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use items_domain::{
    FieldError,
    FieldErrorKind,
    ItemId,
    ListQuery,
    RawListParams,
    ValidationError,
    pagination::validate_list,
    validation::validate_id,
};
use serde_json::Value;

use crate::error::ApiError;

/// `{item_id}` パスセグメント（正の整数として検証済み）
#[derive(Debug, Clone, Copy)]
pub struct ValidItemId(pub ItemId);

impl<S> FromRequestParts<S> for ValidItemId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ValidationError::single(FieldError::new(
                    FieldErrorKind::TypeError,
                    &["path", "item_id"],
                    rejection.body_text(),
                    Value::Null,
                ))
            })?;

        Ok(Self(validate_id(&raw)?))
    }
}

/// 一覧エンドポイントの `limit` / `offset` / `name` クエリパラメータ
///
/// クエリ文字列はキーと値の組の列として読む。同じキーが繰り返された場合は
/// 最後の値が有効になる。
#[derive(Debug, Clone)]
pub struct ListParams(pub ListQuery);

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ValidationError::single(FieldError::new(
                    FieldErrorKind::TypeError,
                    &["query"],
                    rejection.body_text(),
                    Value::Null,
                ))
            })?;

        Ok(Self(validate_list(RawListParams::from_pairs(pairs))?))
    }
}

/// 型を付けずに JSON として解析したリクエストボディ
///
/// フィールドの検査は `items_domain::validation` で後から行う。
/// Content-Type の欠落・不一致や JSON の構文エラーは `["body"]` で報告する。
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ValidationError::invalid_body(rejection.body_text()).into()),
        }
    }
}
