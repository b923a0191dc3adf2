//! # User Service ライブラリ
//!
//! ルーター構築とハンドラ・ユースケース・ミドルウェアを公開する。
//! テストはここから [`app`] を組み立て、`tower::ServiceExt::oneshot` で
//! リクエストを流す。

pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use meibo_infra::db::TransactionManager;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
    handler::{UserState, add_user, find_user, health_check},
    middleware::{handle_panic, transaction},
};

/// ルーターを構築する
///
/// `/users` 系のルートはトランザクションミドルウェアと
/// リカバリミドルウェアの内側に置く。処理順は
///
/// ```text
/// リクエスト → transaction → recovery → ハンドラ
/// ```
///
/// で、パニックは recovery が 500 レスポンスに変換し、
/// それを観測した transaction がロールバックする。
/// `/health` はトランザクションを必要としないため外側に置く。
pub fn app<U>(usecase: U, tx_manager: Arc<dyn TransactionManager>) -> Router
where
    U: usecase::UserUseCase + 'static,
{
    let state = Arc::new(UserState { usecase });

    let user_routes = Router::new()
        .route("/users", post(add_user::<U>))
        .route("/users/{id}", get(find_user::<U>))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn_with_state(tx_manager, transaction));

    Router::new()
        .route("/health", get(health_check))
        .merge(user_routes)
        .layer(TraceLayer::new_for_http())
}
