//! # アプリケーション設定
//!
//! すべての設定は環境変数から読み込む（12-factor）。`.env` があれば
//! バイナリが先に読み込む。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|-----------|------|
//! | `DATABASE_URL` | **Yes** | - | PostgreSQL 接続 URL |
//! | `API_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `API_PORT` | No | `8000` | ポート番号 |
//! | `DATABASE_MAX_CONNECTIONS` | No | `10` | プールサイズ |
//! | `DATABASE_ACQUIRE_TIMEOUT_SECS` | No | `5` | 接続取得のタイムアウト（秒） |
//!
//! `LOG_FORMAT` と `RUST_LOG` は `items_shared::observability` が読む。

use std::{env, str::FromStr, time::Duration};

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// 環境変数から設定を構築できなかった
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `TcpListener::bind` に渡す `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url:             String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server:   ServerConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の変数ソースから設定を構築する
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup("DATABASE_URL")
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            server:   ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: parse_or(&lookup, "API_PORT", DEFAULT_PORT)?,
            },
            database: DatabaseConfig {
                url,
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_MAX_CONNECTIONS,
                )?,
                acquire_timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "DATABASE_ACQUIRE_TIMEOUT_SECS",
                    DEFAULT_ACQUIRE_TIMEOUT_SECS,
                )?),
            },
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_database_urlのみ設定時はデフォルト値を使う() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/items")]).unwrap();

        assert_eq!(config.server.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.database.url, "postgres://localhost/items");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_database_url未設定はエラーになる() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
    }

    #[test]
    fn test_環境変数で上書きできる() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/items"),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "9000"),
            ("DATABASE_MAX_CONNECTIONS", "3"),
            ("DATABASE_ACQUIRE_TIMEOUT_SECS", "1"),
        ])
        .unwrap();

        assert_eq!(config.server.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.database.max_connections, 3);
        assert_eq!(config.database.acquire_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_パースできないポートはエラーになる() {
        let err = config_from(&[("DATABASE_URL", "postgres://db/items"), ("API_PORT", "http")])
            .unwrap_err();

        assert_eq!(
            err,
            ConfigError::Invalid {
                name:  "API_PORT",
                value: "http".to_string(),
            }
        );
    }
}
