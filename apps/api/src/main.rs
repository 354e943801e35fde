//! # Items API サーバー
//!
//! 起動順序:
//!
//! 1. `.env` の読み込みと tracing の初期化
//! 2. 設定の読み込み
//! 3. コネクションプールの作成とスキーマ適用
//! 4. Ctrl-C または SIGTERM まで待ち受け
//! 5. 処理中のリクエストを捌き切ってからプールを閉じる

use std::sync::Arc;

use anyhow::Context as _;
use items_api::{app::build_app, config::AppConfig, handler::AppState};
use items_infra::{db, repository::PostgresItemRepository};
use items_shared::observability::{self, TracingConfig};
use tokio::net::TcpListener;

const SERVICE_NAME: &str = "items-api";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env(SERVICE_NAME);
    observability::init_tracing(&tracing_config);
    let _tracing_guard =
        tracing::info_span!("app", service = %tracing_config.service_name).entered();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    let pool = db::create_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.acquire_timeout,
    )
    .await
    .context("failed to connect to the database")?;

    db::run_migrations(&pool)
        .await
        .context("failed to apply database schema")?;
    tracing::info!("データベーススキーマを適用しました");

    let state = AppState::new(Arc::new(PostgresItemRepository::new(pool.clone())));
    let app = build_app(state);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Items API サーバーを起動します: {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db::close_pool(&pool).await;
    tracing::info!("シャットダウンが完了しました");
    Ok(())
}

/// Ctrl-C または SIGTERM を受信すると完了する
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C の待ち受けに失敗しました");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM の待ち受けに失敗しました");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl-C を受信しました。シャットダウンします"),
        () = terminate => tracing::info!("SIGTERM を受信しました。シャットダウンします"),
    }
}
