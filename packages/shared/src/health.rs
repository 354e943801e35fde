//! # ヘルスチェック共通型
//!
//! Liveness（`/health`）と Readiness（`/health/db`）のレスポンス型。

use serde::{Deserialize, Serialize};

/// Liveness チェックレスポンス
///
/// ## 使用例
///
/// ```
/// use items_shared::HealthResponse;
///
/// let response = HealthResponse::healthy("items api", "1.0.0");
/// assert_eq!(response.status, "healthy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "openapi",
    schema(example = json!({ "status": "healthy", "service": "items api", "version": "1.0.0" }))
)]
pub struct HealthResponse {
    /// 稼働状態（プロセスが応答できる限り `"healthy"`）
    pub status:  String,
    /// サービス名
    pub service: String,
    /// アプリケーションバージョン（Cargo.toml から取得）
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status:  "healthy".to_string(),
            service: service.into(),
            version: version.into(),
        }
    }
}

/// Readiness チェックレスポンス（DB が応答した場合）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "openapi",
    schema(example = json!({ "status": "healthy", "database": "connected" }))
)]
pub struct DatabaseHealthResponse {
    pub status:   String,
    pub database: String,
}

impl DatabaseHealthResponse {
    pub fn connected() -> Self {
        Self {
            status:   "healthy".to_string(),
            database: "connected".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_health_responseのserializeで正しいjson形状にする() {
        let json = serde_json::to_value(HealthResponse::healthy("items api", "1.0.0")).unwrap();

        assert_eq!(
            json,
            json!({ "status": "healthy", "service": "items api", "version": "1.0.0" })
        );
    }

    #[test]
    fn test_database_health_responseのserializeで正しいjson形状にする() {
        let json = serde_json::to_value(DatabaseHealthResponse::connected()).unwrap();

        assert_eq!(json, json!({ "status": "healthy", "database": "connected" }));
    }
}

#[cfg(all(test, feature = "openapi"))]
mod openapi_tests {
    use utoipa::{
        PartialSchema,
        openapi::{RefOr, Schema},
    };

    use super::*;

    fn property_names<T: PartialSchema>() -> Vec<String> {
        let RefOr::T(Schema::Object(object)) = T::schema() else {
            panic!("インラインのオブジェクトスキーマであること");
        };
        object.properties.keys().cloned().collect()
    }

    #[test]
    fn test_health_responseにtoschemaが実装されている() {
        assert_eq!(property_names::<HealthResponse>(), vec!["status", "service", "version"]);
    }

    #[test]
    fn test_database_health_responseにtoschemaが実装されている() {
        assert_eq!(property_names::<DatabaseHealthResponse>(), vec!["status", "database"]);
    }
}
