//! # アクセスログミドルウェア
//!
//! レスポンス確定時に、1 リクエストにつき 1 行のサマリーログを出力する。
//! ヘルスチェックを含む全リクエストが対象。
//!
//! | フィールド | 内容 |
//! |-----------|------|
//! | `http.method` | HTTP メソッド |
//! | `http.path` | パス |
//! | `http.query` | クエリ文字列（ある場合のみ） |
//! | `http.user_agent` | User-Agent の先頭 50 文字（ある場合のみ） |
//! | `http.status_code` | ステータスコード |
//! | `http.latency_ms` | 処理時間（ミリ秒） |
//! | `http.response_size` | `Content-Length`（ある場合のみ） |
//!
//! 5xx は ERROR、それ以外は INFO で出力する。`TraceLayer` の内側に置くため、
//! イベントはリクエストスパンの `request_id` を引き継ぐ。

use std::time::Instant;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};

/// ログに残す User-Agent の最大文字数
const USER_AGENT_MAX_CHARS: usize = 50;

/// リクエストごとにアクセスログを 1 行出力する
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let query = request.uri().query().map(str::to_owned);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.chars().take(USER_AGENT_MAX_CHARS).collect::<String>());
    let start = Instant::now();

    let response = next.run(request).await;

    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let status = response.status();
    let response_size = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    if status.is_server_error() {
        tracing::error!(
            log.r#type = "access",
            http.method = %method,
            http.path = %path,
            http.query = query.as_deref(),
            http.user_agent = user_agent.as_deref(),
            http.status_code = status.as_u16(),
            http.latency_ms = latency_ms,
            http.response_size = response_size,
            "リクエスト処理中にサーバーエラーが発生しました"
        );
    } else {
        tracing::info!(
            log.r#type = "access",
            http.method = %method,
            http.path = %path,
            http.query = query.as_deref(),
            http.user_agent = user_agent.as_deref(),
            http.status_code = status.as_u16(),
            http.latency_ms = latency_ms,
            http.response_size = response_size,
            "リクエストを処理しました"
        );
    }

    response
}
