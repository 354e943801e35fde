//! # ルーター構築
//!
//! ルートとミドルウェアスタックを組み立てる。バイナリとテストで共有する。

use std::sync::Arc;

use axum::{Router, middleware::from_fn, routing::get};
use items_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{
        AppState,
        create_item,
        database_health_check,
        delete_item,
        get_item,
        health_check,
        list_items,
        update_item,
    },
    middleware::log_request,
    openapi::openapi_json,
};

/// アプリケーションのルーターを構築する
///
/// ミドルウェア（外側から順に）:
///
/// 1. `SetRequestIdLayer`: クライアントの `x-request-id` を使うか、UUID v7 を生成する
/// 2. `TraceLayer`: `request_id` を持つリクエストスパンを開始する
/// 3. `PropagateRequestIdLayer`: `x-request-id` をレスポンスにコピーする
/// 4. `log_request`: 1 リクエスト 1 行のアクセスログ
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/db", get(database_health_check))
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{item_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(from_fn(log_request))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
