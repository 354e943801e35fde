//! # PostgreSQL コネクションプール
//!
//! プールは起動時に 1 度だけ作成し、axum の State で共有して、
//! シャットダウン時に明示的に閉じる。
//!
//! ```rust,ignore
//! use std::time::Duration;
//!
//! use items_infra::db;
//!
//! let pool = db::create_pool("postgres://localhost/items", 10, Duration::from_secs(5)).await?;
//! db::run_migrations(&pool).await?;
//! // ... serve ...
//! db::close_pool(&pool).await;
//! ```

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

/// アプリケーションと統合テストで共有するプール設定
pub fn pool_options(max_connections: u32, acquire_timeout: Duration) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
}

/// コネクションプールを作成し、接続を 1 本確立できることを確認する
///
/// ホストに到達できない、認証情報が誤っている、URL が不正な場合は失敗する。
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    let pool = pool_options(max_connections, acquire_timeout)
        .connect(database_url)
        .await?;

    tracing::info!(max_connections, "データベース接続プールを作成しました");
    Ok(pool)
}

/// 埋め込みスキーマを適用する
///
/// 各文は冪等で、適用済みバージョンは sqlx が記録する。起動のたびに実行してよい。
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// 貸し出し中の接続の返却を待ってから、すべての接続を閉じる
///
/// 以降の接続取得は `PoolClosed` で失敗する。
pub async fn close_pool(pool: &PgPool) {
    pool.close().await;
    tracing::info!("データベース接続プールを閉じました");
}
