//! # UserRepository
//!
//! ユーザー情報の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **トランザクション必須**: すべてのクエリはリクエストに束縛された
//!   トランザクション内で実行する。プールから直接コネクションを
//!   取得することはない
//! - **採番は保存時に一度だけ**: 識別子はアプリケーション側で UUID v7 を
//!   採番する。タイムスタンプはカラムデフォルトに任せ、`RETURNING` で
//!   永続化された値を読み戻す

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meibo_domain::{
    AppError,
    user::{NewUser, User, UserId},
};
use uuid::Uuid;

use crate::db::RequestTx;

/// ユーザーリポジトリトレイト
///
/// ユーザー情報の永続化操作を定義する。
/// インフラ層で具体的な実装を提供し、ユースケース層から利用する。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを保存する
    ///
    /// 識別子とタイムスタンプを採番し、永続化されたエンティティを返す。
    ///
    /// # エラー
    ///
    /// - 一意制約違反: `Duplicate`
    /// - その他のデータベース失敗: `InternalServerError`
    async fn save(&self, tx: &RequestTx, user: NewUser) -> Result<User, AppError>;

    /// ID でユーザーを検索する
    ///
    /// # エラー
    ///
    /// - 該当行なし: `NotFound`（深刻度 Warn）
    /// - その他のデータベース失敗: `InternalServerError`
    async fn find(&self, tx: &RequestTx, id: &UserId) -> Result<User, AppError>;
}

/// users テーブルの行
///
/// `query_as` が SQL 結果を直接マッピングする対象。
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id:         Uuid,
    first_name: String,
    last_name:  String,
    age:        i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_entity(self) -> User {
        User::from_db(
            UserId::from_uuid(self.id),
            self.first_name,
            self.last_name,
            self.age,
            self.created_at,
            self.updated_at,
        )
    }
}

/// PostgreSQL 実装の UserRepository
///
/// コネクションを保持しない。使用するのはリクエストの
/// トランザクション内のコネクションだけである。
#[derive(Debug, Clone, Default)]
pub struct PostgresUserRepository;

impl PostgresUserRepository {
    /// 新しいリポジトリインスタンスを作成する
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, tx: &RequestTx, user: NewUser) -> Result<User, AppError> {
        let mut guard = tx.lock().await;
        let Some(tx) = guard.as_mut() else {
            return Err(AppError::internal(
                "トランザクションが既に解放されています",
            ));
        };

        let id = UserId::new();
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, first_name, last_name, age)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, age, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.age)
        .fetch_one(tx.conn())
        .await
        .map_err(save_error)?;

        Ok(row.into_entity())
    }

    async fn find(&self, tx: &RequestTx, id: &UserId) -> Result<User, AppError> {
        let mut guard = tx.lock().await;
        let Some(tx) = guard.as_mut() else {
            return Err(AppError::internal(
                "トランザクションが既に解放されています",
            ));
        };

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, age, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(tx.conn())
        .await
        .map_err(find_error)?;

        match row {
            Some(row) => Ok(row.into_entity()),
            None => Err(AppError::not_found(format!(
                "ユーザーが見つかりません: {id}"
            ))),
        }
    }
}

/// INSERT の失敗をエラータクソノミーに変換する
fn save_error(error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::duplicate(format!("一意制約に違反しています: {db}"))
        }
        _ => AppError::internal(format!("ユーザーの保存に失敗しました: {error}")),
    }
}

/// SELECT の失敗をエラータクソノミーに変換する
///
/// 該当行なしは `fetch_optional` の `None` として扱うため、
/// ここに到達するのは接続断などの想定外の失敗だけである。
fn find_error(error: sqlx::Error) -> AppError {
    AppError::internal(format!("ユーザーの検索に失敗しました: {error}"))
}
