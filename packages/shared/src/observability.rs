//! # Observability 基盤
//!
//! tracing の初期化、出力形式の選択、およびルーターに組み込む
//! Request ID / リクエストスパンのヘルパーを提供する。
//!
//! `LOG_FORMAT` で JSON / Pretty を切り替え、`RUST_LOG` でレベルを制御する。

/// ログ出力形式
///
/// `LOG_FORMAT` が未設定または不明な値の場合は [`Pretty`](LogFormat::Pretty) にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 JSON オブジェクト（ログ収集基盤向け）
    Json,
    /// 人間向けの読みやすい形式（ローカル開発向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 形式名をパースする
    ///
    /// 不明な値は stderr に警告を出して Pretty にフォールバックする。
    /// この時点ではまだ subscriber が初期化されていない。
    pub fn parse(s: &str) -> Self {
        match s {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(val) => Self::parse(&val),
            Err(_) => Self::default(),
        }
    }
}

/// tracing の初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// バイナリがルートの `app` スパンに記録するサービス名
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info,items=debug";

/// グローバル subscriber を初期化する
///
/// `tracing_error::ErrorLayer` も登録し、スパン内で生成したエラーが
/// `SpanTrace` を取得できるようにする。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();
}

// =========================================================================
// Request ID
// =========================================================================

/// Request ID を運ぶヘッダー（リクエスト・レスポンス共通）
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// `SetRequestIdLayer` 用に UUID v7 の Request ID を生成する
///
/// v7 は生成時刻順にソートされ、ログ検索で時系列が保たれる。
/// クライアントが `x-request-id` を送った場合はそれを使い、生成しない。
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        let id = uuid::Uuid::now_v7().to_string();
        http::HeaderValue::from_str(&id)
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}

/// 全リクエストのルートスパン（`TraceLayer::make_span_with` で使用）
///
/// ヘッダーが設定済みであるよう、`SetRequestIdLayer` の内側で実行すること。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parseは既知の形式を返す() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
    }

    #[test]
    fn test_parseは不明な値でprettyにフォールバックする() {
        assert_eq!(LogFormat::parse("unknown"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(""), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Pretty);
    }

    #[test]
    fn test_tracing_config_newでフィールドが設定される() {
        let config = TracingConfig::new("items api", LogFormat::Json);

        assert_eq!(config.service_name, "items api");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[cfg(feature = "observability")]
    #[test]
    fn test_request_idはuuid_v7である() {
        use tower_http::request_id::MakeRequestId as _;

        let request = http::Request::builder().body(()).unwrap();
        let id = MakeRequestUuidV7.make_request_id(&request).unwrap();

        let parsed = uuid::Uuid::parse_str(id.header_value().to_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }

    #[cfg(feature = "observability")]
    #[test]
    fn test_request_idは一意である() {
        use tower_http::request_id::MakeRequestId as _;

        let request = http::Request::builder().body(()).unwrap();
        let mut make = MakeRequestUuidV7;

        let first = make.make_request_id(&request).unwrap();
        let second = make.make_request_id(&request).unwrap();

        assert_ne!(first.header_value(), second.header_value());
    }
}
