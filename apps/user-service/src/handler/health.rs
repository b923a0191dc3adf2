//! # ヘルスチェックハンドラ
//!
//! サーバーの稼働状態を確認するためのエンドポイント。
//! ロードバランサーやコンテナオーケストレーターの死活確認に使用する。
//!
//! ## エンドポイント
//!
//! ```text
//! GET /health
//! ```
//!
//! トランザクションミドルウェアの外側に配置されるため、
//! データベースにはアクセスしない。

use axum::Json;
use meibo_shared::HealthResponse;

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
