//! # アイテム
//!
//! サービスが永続化する唯一のエンティティ。
//!
//! ## 不変条件
//!
//! - `id` はストアが採番する正の整数で、変更されない
//! - `name` は 1〜255 文字。生の文字列で判定する（トリミングしない）
//! - `description` は任意。`None` と `Some("")` は区別する
//!
//! ## 部分更新
//!
//! [`ItemPatch`] はフィールドごとに [`Patch`] を持つ。
//! 「キー省略」と「明示的な null」の区別を SQL 文まで保ったまま運ぶ。
//!
//! ```rust
//! use items_domain::item::{Item, ItemId, ItemName, ItemPatch, Patch};
//!
//! let item = Item::from_db(ItemId::from_db(1), ItemName::new("A").unwrap(), Some("B".to_string()));
//! let patch = ItemPatch {
//!     name:        Some(ItemName::new("C").unwrap()),
//!     description: Patch::Unchanged,
//! };
//!
//! let updated = item.apply(&patch);
//! assert_eq!(updated.name().as_str(), "C");
//! assert_eq!(updated.description(), Some("B"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::FieldErrorKind;

/// アイテム名の最大文字数（DB: `VARCHAR(255)`）
pub const MAX_ITEM_NAME_LENGTH: usize = 255;

/// アイテム名の最小文字数
pub const MIN_ITEM_NAME_LENGTH: usize = 1;

// =========================================================================
// ItemId（アイテム ID）
// =========================================================================

/// ストアが採番するアイテムの識別子
///
/// 常に `>= 1`。クライアント入力は [`ItemId::new`]、
/// DB から読み出した値は [`ItemId::from_db`] を通す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// クライアント入力の値をラップする（1 未満は `None`）
    pub fn new(value: i64) -> Option<Self> {
        (value >= 1).then_some(Self(value))
    }

    /// `items.id` カラムの値から復元する
    pub fn from_db(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =========================================================================
// ItemName（アイテム名）
// =========================================================================

/// アイテム名（値オブジェクト）
///
/// 文字数は Unicode スカラー値で数える。PostgreSQL の `VARCHAR(255)` も
/// バイト数ではなく文字数で制限するため、境界が一致する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemName(String);

impl ItemName {
    pub fn new(value: impl Into<String>) -> Result<Self, FieldErrorKind> {
        let value = value.into();
        let length = value.chars().count();

        if length < MIN_ITEM_NAME_LENGTH {
            return Err(FieldErrorKind::TooShort);
        }
        if length > MAX_ITEM_NAME_LENGTH {
            return Err(FieldErrorKind::TooLong);
        }

        Ok(Self(value))
    }

    /// DB から読み出した名前を復元する
    ///
    /// 長さの境界はカラム制約で保証済み。
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =========================================================================
// Patch（部分更新の 3 状態）
// =========================================================================

/// 部分更新における 1 フィールドの状態
///
/// | JSON | `Patch` |
/// |------|---------|
/// | キー省略 | `Unchanged` |
/// | `null` | `Clear` |
/// | 値 | `Set(value)` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Unchanged,
    Clear,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Patch::Unchanged)
    }

    /// 現在値に対してパッチを解決する
    pub fn apply_to(&self, current: Option<T>) -> Option<T>
    where
        T: Clone,
    {
        match self {
            Patch::Unchanged => current,
            Patch::Clear => None,
            Patch::Set(value) => Some(value.clone()),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unchanged
    }
}

// =========================================================================
// NewItem / ItemPatch
// =========================================================================

/// 作成操作のバリデーション済みペイロード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name:        ItemName,
    pub description: Option<String>,
}

/// 更新操作のバリデーション済みペイロード
///
/// 名前は置き換えられるが削除はできないため、`name` は [`Patch`] ではなく
/// `Option` で持つ。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name:        Option<ItemName>,
    pub description: Patch<String>,
}

impl ItemPatch {
    /// 既知のフィールドが 1 つも指定されていなければ true
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_unchanged()
    }

    /// このパッチが変更するフィールド名（ログ出力用）
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if !self.description.is_unchanged() {
            fields.push("description");
        }
        fields
    }
}

// =========================================================================
// Item（アイテムエンティティ）
// =========================================================================

/// アイテムエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id:          ItemId,
    name:        ItemName,
    description: Option<String>,
}

impl Item {
    /// DB の行からアイテムを復元する
    pub fn from_db(id: ItemId, name: ItemName, description: Option<String>) -> Self {
        Self {
            id,
            name,
            description,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &ItemName {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// `patch` を適用したコピーを返す
    ///
    /// インメモリリポジトリが使う。PostgreSQL リポジトリは同じ解決を
    /// `UPDATE` 文の中で行う。
    pub fn apply(&self, patch: &ItemPatch) -> Self {
        Self {
            id:          self.id,
            name:        patch.name.clone().unwrap_or_else(|| self.name.clone()),
            description: patch.description.apply_to(self.description.clone()),
        }
    }
}
