//! # バリデーション層
//!
//! クライアントの生入力をバリデーション済みのドメイン値に変換する。
//!
//! ## 設計方針
//!
//! - リクエストボディは `serde_json::Value` で受け取る。「キーなし」「`null`」
//!   「型違い」をそれぞれ正確に報告するため
//! - 最初の 1 件だけでなく、失敗したフィールドをすべて報告する
//! - 各失敗は位置（`["body", "name"]`）、分類、メッセージ、入力値を持つ
//!
//! ## エラー分類
//!
//! | 分類 | 発生条件 |
//! |------|---------|
//! | `missing` | 必須フィールドがない |
//! | `too_short` | 文字列が下限より短い |
//! | `too_long` | 文字列が上限より長い |
//! | `out_of_range` | 整数が許容範囲外 |
//! | `type_error` | JSON の型が違う、または整数として解釈できない |

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::item::{
    ItemId,
    ItemName,
    ItemPatch,
    MAX_ITEM_NAME_LENGTH,
    MIN_ITEM_NAME_LENGTH,
    NewItem,
    Patch,
};

/// 1 フィールドの失敗分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Missing,
    TooShort,
    TooLong,
    OutOfRange,
    TypeError,
}

impl FieldErrorKind {
    /// エラーボディの `type` に出力する名前
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldErrorKind::Missing => "missing",
            FieldErrorKind::TooShort => "too_short",
            FieldErrorKind::TooLong => "too_long",
            FieldErrorKind::OutOfRange => "out_of_range",
            FieldErrorKind::TypeError => "type_error",
        }
    }
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 失敗した 1 フィールド
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub kind:  FieldErrorKind,
    /// フィールドの位置（例: `["body", "name"]`, `["path", "item_id"]`）
    pub loc:   Vec<String>,
    pub msg:   String,
    /// 失敗した生の入力値
    pub input: Value,
}

impl FieldError {
    pub fn new(
        kind: FieldErrorKind,
        loc: &[&str],
        msg: impl Into<String>,
        input: Value,
    ) -> Self {
        Self {
            kind,
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            input,
        }
    }

    pub fn missing(loc: &[&str], input: Value) -> Self {
        Self::new(FieldErrorKind::Missing, loc, "Field required", input)
    }

    pub fn string_type(loc: &[&str], input: Value) -> Self {
        Self::new(
            FieldErrorKind::TypeError,
            loc,
            "Input should be a valid string",
            input,
        )
    }

    pub fn integer_parsing(loc: &[&str], input: Value) -> Self {
        Self::new(
            FieldErrorKind::TypeError,
            loc,
            "Input should be a valid integer, unable to parse string as an integer",
            input,
        )
    }

    pub fn greater_than_equal(loc: &[&str], bound: i64, input: Value) -> Self {
        Self::new(
            FieldErrorKind::OutOfRange,
            loc,
            format!("Input should be greater than or equal to {bound}"),
            input,
        )
    }

    pub fn less_than_equal(loc: &[&str], bound: i64, input: Value) -> Self {
        Self::new(
            FieldErrorKind::OutOfRange,
            loc,
            format!("Input should be less than or equal to {bound}"),
            input,
        )
    }
}

/// クライアント入力が 1 つ以上の制約に違反した
///
/// 常に 1 件以上の [`FieldError`] を持つ。
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} validation error(s), first: {}", .errors.len(), first_message(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

fn first_message(errors: &[FieldError]) -> String {
    errors
        .first()
        .map(|e| format!("{} at {}", e.kind, e.loc.join(".")))
        .unwrap_or_default()
}

impl ValidationError {
    /// 収集したフィールドエラーから構築する
    ///
    /// 失敗が 1 件もなければ `None` を返す。
    pub fn from_errors(errors: Vec<FieldError>) -> Option<Self> {
        (!errors.is_empty()).then_some(Self { errors })
    }

    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// 解析できないリクエストボディ用のショートハンド
    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::single(FieldError::new(
            FieldErrorKind::TypeError,
            &["body"],
            msg,
            Value::Null,
        ))
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

// =========================================================================
// リクエストボディのバリデーション
// =========================================================================

/// 作成リクエストのボディを検証する
///
/// `name` は必須。`description` は任意で、`null` は省略と同じ扱い。
pub fn validate_create(input: &Value) -> Result<NewItem, ValidationError> {
    let object = body_object(input)?;
    let mut errors = Vec::new();

    let name = match object.get("name") {
        None => {
            errors.push(FieldError::missing(&["body", "name"], input.clone()));
            None
        }
        Some(value) => collect(parse_name(value), &mut errors),
    };

    let description = match object.get("description") {
        None | Some(Value::Null) => Some(None),
        Some(value) => collect(parse_description(value), &mut errors).map(Some),
    };

    match (name, description) {
        (Some(name), Some(description)) if errors.is_empty() => Ok(NewItem { name, description }),
        _ => Err(ValidationError { errors }),
    }
}

/// 更新リクエストのボディを検証する
///
/// 全フィールド任意。明示的な `null` は `description` を削除する。
/// 名前は削除できないため、`name` の `null` は型エラーになる。
pub fn validate_update(input: &Value) -> Result<ItemPatch, ValidationError> {
    let object = body_object(input)?;
    let mut errors = Vec::new();

    let name = match object.get("name") {
        None => Some(None),
        Some(value) => collect(parse_name(value), &mut errors).map(Some),
    };

    let description = match object.get("description") {
        None => Some(Patch::Unchanged),
        Some(Value::Null) => Some(Patch::Clear),
        Some(value) => collect(parse_description(value), &mut errors).map(Patch::Set),
    };

    match (name, description) {
        (Some(name), Some(description)) if errors.is_empty() => {
            Ok(ItemPatch { name, description })
        }
        _ => Err(ValidationError { errors }),
    }
}

// =========================================================================
// パスパラメータのバリデーション
// =========================================================================

const ITEM_ID_LOC: &[&str] = &["path", "item_id"];

/// `{item_id}` パスセグメントを検証する
pub fn validate_id(raw: &str) -> Result<ItemId, ValidationError> {
    let input = Value::String(raw.to_string());
    let value = parse_integer(raw, ITEM_ID_LOC, &input).map_err(ValidationError::single)?;

    ItemId::new(value)
        .ok_or_else(|| ValidationError::single(FieldError::greater_than_equal(ITEM_ID_LOC, 1, input)))
}

// =========================================================================
// ヘルパー
// =========================================================================

/// クエリ・パスパラメータの 10 進整数を解析する
pub(crate) fn parse_integer(raw: &str, loc: &[&str], input: &Value) -> Result<i64, FieldError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| FieldError::integer_parsing(loc, input.clone()))
}

fn body_object(input: &Value) -> Result<&Map<String, Value>, ValidationError> {
    input.as_object().ok_or_else(|| {
        ValidationError::single(FieldError::new(
            FieldErrorKind::TypeError,
            &["body"],
            "Input should be a valid dictionary or object to extract fields from",
            input.clone(),
        ))
    })
}

fn parse_name(value: &Value) -> Result<ItemName, FieldError> {
    const LOC: &[&str] = &["body", "name"];

    let Value::String(raw) = value else {
        return Err(FieldError::string_type(LOC, value.clone()));
    };

    ItemName::new(raw.as_str()).map_err(|kind| {
        let msg = match kind {
            FieldErrorKind::TooShort => {
                format!("String should have at least {MIN_ITEM_NAME_LENGTH} character")
            }
            _ => format!("String should have at most {MAX_ITEM_NAME_LENGTH} characters"),
        };
        FieldError::new(kind, LOC, msg, value.clone())
    })
}

fn parse_description(value: &Value) -> Result<String, FieldError> {
    match value {
        Value::String(raw) => Ok(raw.clone()),
        other => Err(FieldError::string_type(
            &["body", "description"],
            other.clone(),
        )),
    }
}

fn collect<T>(result: Result<T, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}
