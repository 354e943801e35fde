//! # 一覧クエリ
//!
//! 一覧取得のオフセットページネーションと任意の名前フィルタ。

use serde_json::Value;

use crate::validation::{FieldError, ValidationError, parse_integer};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_OFFSET: i64 = 0;

/// 受信したままの `GET /items` クエリ文字列
///
/// 解析できない値をエクストラクタで弾かずバリデーションエラーとして
/// 報告するため、数値も文字列のまま保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawListParams {
    pub limit:  Option<String>,
    pub offset: Option<String>,
    pub name:   Option<String>,
}

impl RawListParams {
    /// デコード済みのキーと値の組から構築する
    ///
    /// 同じキーが繰り返された場合は最後の値を採用する。未知のキーは無視する。
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        pairs
            .into_iter()
            .fold(Self::default(), |mut params, (key, value)| {
                match key.as_str() {
                    "limit" => params.limit = Some(value),
                    "offset" => params.offset = Some(value),
                    "name" => params.name = Some(value),
                    _ => {}
                }
                params
            })
    }
}

/// バリデーション済みの一覧クエリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    limit:       i64,
    offset:      i64,
    name_filter: Option<String>,
}

impl ListQuery {
    /// 検査済みの値からクエリを構築する
    ///
    /// 空白のみのフィルタは捨てる。範囲の検査は呼び出し側の責務で、
    /// クライアント入力には [`validate_list`] を使う。
    pub fn new(limit: i64, offset: i64, name_filter: Option<String>) -> Self {
        Self {
            limit,
            offset,
            name_filter: name_filter.filter(|f| !f.trim().is_empty()),
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn name_filter(&self) -> Option<&str> {
        self.name_filter.as_deref()
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_OFFSET, None)
    }
}

/// 一覧クエリパラメータを検証する
///
/// 範囲外の limit は丸めずに拒否する。
pub fn validate_list(raw: RawListParams) -> Result<ListQuery, ValidationError> {
    const LIMIT_LOC: &[&str] = &["query", "limit"];
    const OFFSET_LOC: &[&str] = &["query", "offset"];

    let mut errors = Vec::new();

    let limit = match raw.limit.as_deref() {
        None => Some(DEFAULT_LIMIT),
        Some(value) => {
            let input = Value::String(value.to_string());
            match parse_integer(value, LIMIT_LOC, &input) {
                Ok(n) if n < MIN_LIMIT => {
                    errors.push(FieldError::greater_than_equal(LIMIT_LOC, MIN_LIMIT, input));
                    None
                }
                Ok(n) if n > MAX_LIMIT => {
                    errors.push(FieldError::less_than_equal(LIMIT_LOC, MAX_LIMIT, input));
                    None
                }
                Ok(n) => Some(n),
                Err(e) => {
                    errors.push(e);
                    None
                }
            }
        }
    };

    let offset = match raw.offset.as_deref() {
        None => Some(DEFAULT_OFFSET),
        Some(value) => {
            let input = Value::String(value.to_string());
            match parse_integer(value, OFFSET_LOC, &input) {
                Ok(n) if n < 0 => {
                    errors.push(FieldError::greater_than_equal(OFFSET_LOC, 0, input));
                    None
                }
                Ok(n) => Some(n),
                Err(e) => {
                    errors.push(e);
                    None
                }
            }
        }
    };

    match (limit, offset) {
        (Some(limit), Some(offset)) if errors.is_empty() => {
            Ok(ListQuery::new(limit, offset, raw.name))
        }
        _ => Err(ValidationError::from_errors(errors)
            .unwrap_or_else(|| ValidationError::invalid_body("invalid list query"))),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::validation::FieldErrorKind;

    fn params(limit: Option<&str>, offset: Option<&str>, name: Option<&str>) -> RawListParams {
        RawListParams {
            limit:  limit.map(str::to_string),
            offset: offset.map(str::to_string),
            name:   name.map(str::to_string),
        }
    }

    #[test]
    fn test_指定がなければデフォルト値を使う() {
        let query = validate_list(RawListParams::default()).unwrap();

        assert_eq!(query, ListQuery::default());
        assert_eq!(query.limit(), 10);
        assert_eq!(query.offset(), 0);
        assert_eq!(query.name_filter(), None);
    }

    #[rstest]
    #[case("1")]
    #[case("100")]
    fn test_limitの境界値を受け入れる(#[case] limit: &str) {
        assert!(validate_list(params(Some(limit), None, None)).is_ok());
    }

    #[rstest]
    #[case(Some("0"), None, "query.limit")]
    #[case(Some("101"), None, "query.limit")]
    #[case(None, Some("-1"), "query.offset")]
    fn test_範囲外の値を拒否する(
        #[case] limit: Option<&str>,
        #[case] offset: Option<&str>,
        #[case] loc: &str,
    ) {
        let error = validate_list(params(limit, offset, None)).unwrap_err();

        let field = &error.errors()[0];
        assert_eq!(field.kind, FieldErrorKind::OutOfRange);
        assert_eq!(field.loc.join("."), loc);
    }

    #[test]
    fn test_整数でないlimitはtype_errorになる() {
        let error = validate_list(params(Some("ten"), None, None)).unwrap_err();

        assert_eq!(error.errors()[0].kind, FieldErrorKind::TypeError);
    }

    #[test]
    fn test_両方不正なら両方報告する() {
        let error = validate_list(params(Some("0"), Some("x"), None)).unwrap_err();

        assert_eq!(error.errors().len(), 2);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_空白のみのフィルタは無視する(#[case] name: &str) {
        let query = validate_list(params(None, None, Some(name))).unwrap();

        assert_eq!(query.name_filter(), None);
    }

    #[test]
    fn test_フィルタは加工せずに保持する() {
        let query = validate_list(params(None, None, Some(" Ab "))).unwrap();

        assert_eq!(query.name_filter(), Some(" Ab "));
    }

    // ===== RawListParams::from_pairs =====

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_pairsは繰り返されたキーの最後の値を採用する() {
        let raw = RawListParams::from_pairs(pairs(&[("limit", "5"), ("limit", "6")]));

        assert_eq!(raw, params(Some("6"), None, None));
        assert_eq!(validate_list(raw).unwrap().limit(), 6);
    }

    #[test]
    fn test_from_pairsは未知のキーを無視する() {
        let raw = RawListParams::from_pairs(pairs(&[("sort", "name"), ("name", "a")]));

        assert_eq!(raw, params(None, None, Some("a")));
    }
}
