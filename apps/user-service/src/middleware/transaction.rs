//! # トランザクションミドルウェア
//!
//! リクエストごとに 1 つのトランザクションを開始し、
//! 処理チェーンの結果に応じてコミットまたはロールバックする。
//!
//! ## ライフサイクル
//!
//! 1. `TransactionManager::begin` でトランザクションを開始する
//! 2. [`RequestTx`] に包んでリクエスト拡張に載せる（グローバルではなく、
//!    同一リクエストを処理する下流コードだけが取得できる）
//! 3. チェーンを実行する
//! 4. レスポンスが成功（2xx）ならコミット、それ以外はロールバックする
//!
//! ## レスポンスとコミットの順序
//!
//! コミットはレスポンスを返す前に行う。axum ではミドルウェアが
//! `Response` 値を返すまでワイヤーには 1 バイトも書かれないため、
//! ロールバックされた書き込みに対して 200 が先に届くことはない。
//! コミットに失敗した場合はレスポンスを 500 に差し替える。

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use meibo_infra::{RequestTx, db::TransactionManager};

use crate::error::ApiError;

/// リクエストをトランザクションスコープで包むミドルウェア
pub async fn transaction(
    State(tx_manager): State<Arc<dyn TransactionManager>>,
    mut request: Request,
    next: Next,
) -> Response {
    let tx = match tx_manager.begin().await {
        Ok(tx) => tx,
        Err(error) => return ApiError::from(error).into_response(),
    };

    let slot = RequestTx::new(tx);
    request.extensions_mut().insert(slot.clone());

    let response = next.run(request).await;

    // take するのは本ミドルウェアだけであり、スロットは常に埋まっている
    let Some(tx) = slot.take().await else {
        return response;
    };

    if response.status().is_success() {
        if let Err(error) = tx.commit().await {
            return ApiError::from(error).into_response();
        }
    } else if let Err(error) = tx.rollback().await {
        // ロールバック失敗はログに残し、元の失敗レスポンスを返す
        tracing::error!("{error}");
    }

    response
}
