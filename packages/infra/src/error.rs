//! # インフラ層エラー
//!
//! PostgreSQL とのやり取りで発生するエラー。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターン:
//! - [`InfraError`]: [`InfraErrorKind`] と、生成時に取得した [`SpanTrace`] を保持する
//! - [`InfraErrorKind`]: 何が失敗したか
//!
//! API 層がこのモジュールに求める区別は 1 つだけ。ストアにそもそも到達
//! できなかったか（[`InfraError::is_unavailable`]）、それ以外の失敗か。

use std::{fmt, time::Duration};

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// `sqlx::Error` からの変換やコンストラクタ呼び出しの時点でスパンスタックを
/// 記録する。最終的にエラーをログ出力するハンドラで、どのリポジトリ呼び出しが
/// 原因かを追跡できる。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラエラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// プールから接続を取得できない（取得タイムアウト、プール終了、ネットワーク I/O）
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// 文が制限時間内に完了しなかった
    #[error("database did not respond within {0:?}")]
    Timeout(Duration),

    /// その他のデータベースエラー（SQL 誤り、制約違反、デコード失敗）
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl InfraError {
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// ストアに到達できなかった場合に true
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self.kind,
            InfraErrorKind::Unavailable(_) | InfraErrorKind::Timeout(_)
        )
    }

    pub fn timeout(after: Duration) -> Self {
        Self::from_kind(InfraErrorKind::Timeout(after))
    }

    fn from_kind(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        let kind = match source {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                InfraErrorKind::Unavailable(source)
            }
            other => InfraErrorKind::Database(other),
        };
        Self::from_kind(kind)
    }
}
