//! # エラータクソノミー
//!
//! 全レイヤーを流れるエラー値を定義する。
//!
//! ## 設計方針
//!
//! - **一度だけ生成**: エラーは検出したレイヤーで生成し、上位レイヤーは
//!   ラップも破棄もせずそのまま伝播させる
//! - **一度だけ変換**: HTTP ステータスへの変換は最外殻のトランスポート層
//!   （user-service の `ApiError`）だけが行う
//! - **thiserror 活用**: `#[error(...)]` マクロでエラーメッセージを自動生成
//!
//! ## エラーコードと HTTP ステータスの対応
//!
//! | コード | HTTP ステータス | 用途 |
//! |--------|----------------|------|
//! | `BadRequest` | 400 Bad Request | リクエストボディのデコード失敗 |
//! | `NotFound` | 404 Not Found | エンティティが存在しない |
//! | `Duplicate` | 409 Conflict | 一意制約違反 |
//! | `InternalServerError` | 500 Internal Server Error | その他すべての失敗 |

use thiserror::Error;

/// エラーの深刻度
///
/// トランスポート層がログ出力レベルを決めるために使用する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ErrorLevel {
    /// 情報（正常系に近い失敗）
    Info,
    /// 警告（呼び出し側起因の失敗）
    Warn,
    /// エラー（サーバー側の失敗）
    Error,
}

/// 機械可読なエラーコード
///
/// HTTP ステータスへの変換はトランスポート層の責務。
/// ここではドメインとしての失敗種別だけを表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ErrorCode {
    /// 呼び出し側の入力がデコード・検証できない
    BadRequest,
    /// 要求されたエンティティが存在しない
    NotFound,
    /// 一意制約に違反する
    Duplicate,
    /// 上記に分類できない失敗
    InternalServerError,
}

/// アプリケーション全体を流れるエラー値
///
/// メッセージ・深刻度・コードを持つ不変の値。検出地点で一度だけ生成され、
/// どのレイヤーでも変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AppError {
    message: String,
    level:   ErrorLevel,
    code:    ErrorCode,
}

impl AppError {
    /// 任意の深刻度・コードでエラーを生成する
    pub fn new(message: impl Into<String>, level: ErrorLevel, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            level,
            code,
        }
    }

    /// デコード・検証失敗（Warn / BadRequest）
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, ErrorLevel::Warn, ErrorCode::BadRequest)
    }

    /// エンティティ不在（Warn / NotFound）
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, ErrorLevel::Warn, ErrorCode::NotFound)
    }

    /// 一意制約違反（Warn / Duplicate）
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(message, ErrorLevel::Warn, ErrorCode::Duplicate)
    }

    /// サーバー内部の失敗（Error / InternalServerError）
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message, ErrorLevel::Error, ErrorCode::InternalServerError)
    }

    /// エラーメッセージを取得する
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 深刻度を取得する
    pub fn level(&self) -> ErrorLevel {
        self.level
    }

    /// エラーコードを取得する
    pub fn code(&self) -> ErrorCode {
        self.code
    }
}
