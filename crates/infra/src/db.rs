//! # PostgreSQL 接続・トランザクション管理
//!
//! 接続プールの作成と、リクエストスコープのトランザクション管理を行う。
//!
//! ## トランザクションのライフサイクル
//!
//! 1. トランザクションミドルウェアが [`TransactionManager::begin`] で
//!    [`TxContext`] を作成する
//! 2. [`RequestTx`] に包んでリクエスト拡張（extensions）に載せる
//! 3. 同一リクエストのリポジトリ呼び出しが [`RequestTx::lock`] 経由で
//!    トランザクション内のコネクションを順次使用する
//! 4. ミドルウェアが [`RequestTx::take`] で取り出し、レスポンスが成功なら
//!    `commit`、それ以外は `rollback` する
//!
//! コミットもロールバックもされずにドロップされた場合は、
//! sqlx がロールバックする。これが最終の解放経路であり、
//! どの離脱経路でもトランザクション資源は必ず解放される。
//!
//! ## なぜ `RequestTx` か
//!
//! トランザクションはグローバルではなく、リクエストごとの明示的に型付いた
//! スロットで運ぶ。型消去されたコンテキストマップからのダウンキャストは
//! 実行時に失敗し得るため採用しない。

use std::{sync::Arc, time::Duration};

#[cfg(any(test, feature = "test-utils"))]
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use meibo_domain::AppError;
use sqlx::{PgConnection, PgPool, Postgres, Transaction, postgres::PgPoolOptions};
use tokio::sync::{Mutex, MutexGuard};

/// PostgreSQL 接続プールを作成する
///
/// アプリケーション起動時に一度だけ呼び出し、作成したプールを
/// アプリケーション全体で共有する。
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// データベースマイグレーションを実行する
///
/// `sqlx::migrate!()` マクロで埋め込まれたマイグレーションファイルを
/// 順番に適用する。適用済みのマイグレーションはスキップされる。
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

// =============================================================================
// TxContext
// =============================================================================

/// トランザクションコンテキスト
///
/// ひとつのリクエストの寿命だけ存在するトランザクションハンドル。
/// リポジトリはこのハンドル内のコネクションだけを使用し、
/// プールから新しいコネクションを取得することはない。
pub struct TxContext(TxContextInner);

enum TxContextInner {
    Pg(Transaction<'static, Postgres>),
    #[cfg(any(test, feature = "test-utils"))]
    Mock { commits: Option<Arc<AtomicUsize>> },
}

impl TxContext {
    /// Postgres トランザクションを開始する
    ///
    /// `PgTransactionManager` のみが使用する。ミドルウェアは
    /// `TransactionManager` trait 経由で TxContext を取得する。
    pub(crate) async fn begin_pg(pool: &PgPool) -> Result<Self, AppError> {
        let tx = pool
            .begin()
            .await
            .map_err(|e| AppError::internal(format!("トランザクションを開始できません: {e}")))?;
        Ok(Self(TxContextInner::Pg(tx)))
    }

    /// テスト用のモック TxContext を作成する
    ///
    /// モックリポジトリはインメモリ実装のため、実際のトランザクションは不要。
    #[cfg(any(test, feature = "test-utils"))]
    pub fn mock() -> Self {
        Self(TxContextInner::Mock { commits: None })
    }

    /// コミット回数を記録するモック TxContext を作成する
    ///
    /// ミドルウェアテストが commit / rollback の分岐を観測するために使う。
    #[cfg(any(test, feature = "test-utils"))]
    pub fn mock_counted(commits: Arc<AtomicUsize>) -> Self {
        Self(TxContextInner::Mock {
            commits: Some(commits),
        })
    }

    /// トランザクションをコミットする
    pub async fn commit(self) -> Result<(), AppError> {
        match self.0 {
            TxContextInner::Pg(tx) => tx
                .commit()
                .await
                .map_err(|e| AppError::internal(format!("コミットに失敗しました: {e}"))),
            #[cfg(any(test, feature = "test-utils"))]
            TxContextInner::Mock { commits } => {
                if let Some(commits) = commits {
                    commits.fetch_add(1, Ordering::SeqCst);
                }
                Ok(())
            }
        }
    }

    /// トランザクションをロールバックする
    ///
    /// 呼ばずにドロップしても sqlx がロールバックするが、
    /// ミドルウェアは失敗を観測できるよう明示的に呼び出す。
    pub async fn rollback(self) -> Result<(), AppError> {
        match self.0 {
            TxContextInner::Pg(tx) => tx
                .rollback()
                .await
                .map_err(|e| AppError::internal(format!("ロールバックに失敗しました: {e}"))),
            #[cfg(any(test, feature = "test-utils"))]
            TxContextInner::Mock { .. } => Ok(()),
        }
    }

    /// トランザクション内の DB コネクションを取得する
    ///
    /// Postgres リポジトリ実装が `query.fetch_one(tx.conn())` として使用する。
    pub(crate) fn conn(&mut self) -> &mut PgConnection {
        match &mut self.0 {
            TxContextInner::Pg(tx) => tx,
            #[cfg(any(test, feature = "test-utils"))]
            TxContextInner::Mock { .. } => {
                panic!("BUG: conn() called on Mock TxContext. Mock repos should not call conn().")
            }
        }
    }
}

// =============================================================================
// RequestTx
// =============================================================================

/// リクエストスコープのトランザクションスロット
///
/// ミドルウェアが作成し、リクエスト拡張に載せて下流へ渡す。
/// 同一リクエスト内のリポジトリ呼び出しは厳密に逐次実行されるため、
/// 内部のロックが競合することはない。
#[derive(Clone)]
pub struct RequestTx(Arc<Mutex<Option<TxContext>>>);

impl RequestTx {
    /// 開始済みのトランザクションからスロットを作成する
    pub fn new(tx: TxContext) -> Self {
        Self(Arc::new(Mutex::new(Some(tx))))
    }

    /// トランザクションのガードを取得する
    ///
    /// ミドルウェアが `take` した後は `None` を返す。
    pub async fn lock(&self) -> MutexGuard<'_, Option<TxContext>> {
        self.0.lock().await
    }

    /// トランザクションをスロットから取り出す
    ///
    /// commit / rollback を決めるミドルウェアだけが呼び出す。
    pub async fn take(&self) -> Option<TxContext> {
        self.0.lock().await.take()
    }

    /// モックトランザクション入りのスロットを作成する
    #[cfg(any(test, feature = "test-utils"))]
    pub fn mock() -> Self {
        Self::new(TxContext::mock())
    }
}

// =============================================================================
// TransactionManager
// =============================================================================

/// トランザクション管理 trait
///
/// ミドルウェアが TxContext を作成するための抽象化。
/// ミドルウェアは PgPool に直接依存せず、この trait 経由で
/// トランザクションを開始する。
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// トランザクションを開始し、TxContext を返す
    async fn begin(&self) -> Result<TxContext, AppError>;
}

/// Postgres 用 TransactionManager 実装
pub struct PgTransactionManager {
    pool: PgPool,
}

impl PgTransactionManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgTransactionManager {
    async fn begin(&self) -> Result<TxContext, AppError> {
        TxContext::begin_pg(&self.pool).await
    }
}
