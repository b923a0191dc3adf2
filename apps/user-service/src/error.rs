//! # User Service エラー変換
//!
//! エラータクソノミー（[`AppError`]）から HTTP レスポンスへの変換を定義する。
//! 変換はここで一度だけ行われる。下位レイヤーはエラーを生成して
//! そのまま伝播させるだけで、ステータスコードを知らない。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use meibo_domain::{AppError, ErrorCode, ErrorLevel};
use meibo_shared::ErrorResponse;

/// HTTP レスポンスに変換可能なエラー
///
/// `AppError`（domain）と `IntoResponse`（axum）はどちらも外部の型のため、
/// このクレートで newtype を定義して変換を実装する。
/// ハンドラは `Result<_, ApiError>` を返し、`?` が `AppError` を自動変換する。
#[derive(Debug)]
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;

        let status = match error.code() {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Duplicate => StatusCode::CONFLICT,
            ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // ログレベルはエラー値が持つ深刻度に従う
        match error.level() {
            ErrorLevel::Info => tracing::info!(code = %error.code(), "{error}"),
            ErrorLevel::Warn => tracing::warn!(code = %error.code(), "{error}"),
            ErrorLevel::Error => tracing::error!(code = %error.code(), "{error}"),
        }

        (
            status,
            Json(ErrorResponse::new(status.as_u16(), error.message())),
        )
            .into_response()
    }
}
