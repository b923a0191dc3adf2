//! ユーザー API の統合テスト
//!
//! モックリポジトリとモックトランザクションマネージャでルーター全体を
//! 組み立て、`tower::ServiceExt::oneshot` でリクエストを流す。

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    middleware::from_fn_with_state,
    routing::get,
};
use meibo_infra::{
    db::TransactionManager,
    mock::{MockTransactionManager, MockUserRepository},
};
use meibo_user_service::{
    app,
    middleware::{handle_panic, transaction},
    usecase::UserUseCaseImpl,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

/// モック一式でルーターを組み立てる
fn build_app() -> (Router, MockTransactionManager, MockUserRepository) {
    let repo = MockUserRepository::new();
    let manager = MockTransactionManager::new();
    let tx_manager: Arc<dyn TransactionManager> = Arc::new(manager.clone());
    let router = app(UserUseCaseImpl::new(repo.clone()), tx_manager);
    (router, manager, repo)
}

fn post_users(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_user(id: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/users/{id}"))
        .body(Body::empty())
        .unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_add_userは200と未発番の識別子を返す() {
    let (router, _, _) = build_app();

    let (status, body) = send(
        &router,
        post_users(r#"{"firstName": "Taro", "lastName": "Yamada", "age": 30}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Taro");
    assert_eq!(body["lastName"], "Yamada");
    assert_eq!(body["age"], 30);
    assert!(!body["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_userは数値でないageを400にする() {
    let (router, _, repo) = build_app();

    let (status, body) = send(
        &router,
        post_users(r#"{"firstName": "Taro", "lastName": "Yamada", "age": "thirty"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(!body["message"].as_str().unwrap().is_empty());
    // 行は永続化されない
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_find_userは保存したフィールドをそのまま返す() {
    let (router, _, _) = build_app();

    let (_, created) = send(
        &router,
        post_users(r#"{"firstName": "Hanako", "lastName": "Suzuki", "age": 25}"#),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&router, get_user(id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": id,
            "firstName": "Hanako",
            "lastName": "Suzuki",
            "age": 25,
        })
    );
}

#[tokio::test]
async fn test_find_userは未知の識別子を404にする() {
    let (router, _, _) = build_app();

    let (status, body) = send(
        &router,
        get_user("018f4e9e-9c1a-7000-8000-000000000000"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_find_userはuuidでないパスも404にする() {
    let (router, _, _) = build_app();

    let (status, body) = send(&router, get_user("not-a-uuid")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_同じ内容の並行作成は別々の識別子を採番する() {
    let (router, _, _) = build_app();
    let payload = r#"{"firstName": "Taro", "lastName": "Yamada", "age": 30}"#;

    let (first, second) = tokio::join!(
        router.clone().oneshot(post_users(payload)),
        router.clone().oneshot(post_users(payload)),
    );

    let first_body = axum::body::to_bytes(first.unwrap().into_body(), usize::MAX)
        .await
        .unwrap();
    let second_body = axum::body::to_bytes(second.unwrap().into_body(), usize::MAX)
        .await
        .unwrap();
    let first: Value = serde_json::from_slice(&first_body).unwrap();
    let second: Value = serde_json::from_slice(&second_body).unwrap();

    assert_ne!(first["id"], second["id"]);

    // どちらも独立に取得できる
    for id in [first["id"].as_str().unwrap(), second["id"].as_str().unwrap()] {
        let (status, _) = send(&router, get_user(id)).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_成功レスポンスはコミットされる() {
    let (router, manager, _) = build_app();

    send(
        &router,
        post_users(r#"{"firstName": "Taro", "lastName": "Yamada", "age": 30}"#),
    )
    .await;

    assert_eq!(manager.begun(), 1);
    assert_eq!(manager.committed(), 1);
}

#[tokio::test]
async fn test_エラーレスポンスはロールバックされる() {
    let (router, manager, _) = build_app();

    send(&router, get_user("018f4e9e-9c1a-7000-8000-000000000000")).await;

    assert_eq!(manager.begun(), 1);
    assert_eq!(manager.committed(), 0);
}

#[tokio::test]
async fn test_healthはトランザクションを開始しない() {
    let (router, manager, _) = build_app();

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));
    assert_eq!(manager.begun(), 0);
}

#[tokio::test]
async fn test_パニックは500となりコミットされない() {
    async fn boom() -> &'static str {
        panic!("boom")
    }

    let manager = MockTransactionManager::new();
    let tx_manager: Arc<dyn TransactionManager> = Arc::new(manager.clone());
    let router = Router::new()
        .route("/boom", get(boom))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn_with_state(tx_manager, transaction));

    let (status, body) = send(&router, Request::builder().uri("/boom").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
    assert_eq!(manager.begun(), 1);
    assert_eq!(manager.committed(), 0);
}
