//! # リカバリミドルウェア
//!
//! 処理チェーン内で発生したパニックを 500 レスポンスに変換し、
//! サービングプロセスの停止を防ぐ。
//!
//! `tower_http::catch_panic::CatchPanicLayer::custom` に渡すハンドラを
//! 提供する。トランザクションミドルウェアの内側に配置されるため、
//! 変換後の 500 レスポンスを観測した外側がロールバックする。
//!
//! クライアント切断はパニックではなくリクエスト future のキャンセルとして
//! 現れるため、ここを通らない。ドロップされたトランザクションは
//! sqlx がロールバックする。

use std::any::Any;

use axum::{body::Body, http::Response, response::IntoResponse};
use meibo_domain::AppError;

use crate::error::ApiError;

/// パニックペイロードを 500 レスポンスに変換する
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!("ハンドラがパニックしました: {detail}");

    // エラー値はここ（検出地点）で一度だけ生成し、変換は ApiError に任せる
    ApiError::from(AppError::internal("内部エラーが発生しました")).into_response()
}
