//! # ユーザー
//!
//! ユーザーエンティティとその識別子を定義する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: [`UserId`] は UUID をラップし、型安全性を確保
//! - **永続化前後の分離**: 識別子とタイムスタンプは保存時に初めて確定する。
//!   保存前の値は [`NewUser`]、保存済みの値は [`User`] として型で区別する
//! - **不変性**: [`User`] のフィールドは getter 経由でのみ参照できる

use chrono::{DateTime, Utc};
use derive_more::Display;
use uuid::Uuid;

/// ユーザー ID（一意識別子）
///
/// UUID v7 を使用し、生成順にソート可能。
/// クライアントから供給されることはなく、永続化時に一度だけ採番される。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct UserId(Uuid);

impl UserId {
    /// 新しいユーザー ID を生成する
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// 既存の UUID からユーザー ID を作成する
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 内部の UUID 参照を取得する
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// 保存前のユーザー
///
/// 識別子とタイムスタンプを構造的に持たない。
/// リポジトリの `save` がこの値を受け取り、採番済みの [`User`] を返す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name:  String,
    pub age:        i32,
}

/// ユーザーエンティティ
///
/// ユースケース層とリポジトリ層の間を行き来する正規のビジネスオブジェクト。
/// 永続化層から復元されたときにのみ構築される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    age: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// 永続化済みのデータからユーザーを復元する
    pub fn from_db(
        id: UserId,
        first_name: String,
        last_name: String,
        age: i32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            age,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
