//! # User Service サーバー
//!
//! ユーザーの作成・検索を提供する HTTP サービス。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `USER_SERVICE_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `USER_SERVICE_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//!
//! ## 起動方法
//!
//! ```bash
//! USER_SERVICE_PORT=3000 DATABASE_URL=postgres://... cargo run -p meibo-user-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use meibo_infra::{
    db::{self, PgTransactionManager, TransactionManager},
    repository::PostgresUserRepository,
};
use meibo_user_service::{app, config::AppConfig, usecase::UserUseCaseImpl};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// User Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,meibo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 設定読み込み
    let config = AppConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!(
        "User Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成し、マイグレーションを適用
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("データベース接続に失敗しました");
    db::run_migrations(&pool).await?;
    tracing::info!("データベースに接続しました");

    // 依存コンポーネントを初期化
    let tx_manager: Arc<dyn TransactionManager> = Arc::new(PgTransactionManager::new(pool));
    let usecase = UserUseCaseImpl::new(PostgresUserRepository::new());

    // ルーター構築
    let router = app(usecase, tx_manager);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// SIGTERM / Ctrl-C を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Ctrl-C ハンドラの登録に失敗しました");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("SIGTERM ハンドラの登録に失敗しました")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("シャットダウンします");
}
