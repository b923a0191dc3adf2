//! # テスト用モック実装
//!
//! ユースケース・ハンドラテストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! meibo-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use meibo_domain::{
    AppError,
    clock::{Clock, SystemClock},
    user::{NewUser, User, UserId},
};

use crate::{
    db::{RequestTx, TransactionManager, TxContext},
    repository::UserRepository,
};

// ===== MockUserRepository =====

/// インメモリの UserRepository
///
/// 実装と同じ契約で識別子とタイムスタンプを採番する。
/// タイムスタンプは注入された [`Clock`] から取得する。
#[derive(Clone)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
    clock: Arc<dyn Clock>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Arc::new(Mutex::new(Vec::new())),
            clock,
        }
    }

    /// 保存済みユーザー数を返す
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn save(&self, _tx: &RequestTx, user: NewUser) -> Result<User, AppError> {
        let now = self.clock.now();
        let entity = User::from_db(
            UserId::new(),
            user.first_name,
            user.last_name,
            user.age,
            now,
            now,
        );
        self.users.lock().unwrap().push(entity.clone());
        Ok(entity)
    }

    async fn find(&self, _tx: &RequestTx, id: &UserId) -> Result<User, AppError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id() == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("ユーザーが見つかりません: {id}")))
    }
}

// ===== MockTransactionManager =====

/// トランザクションの開始・コミット回数を記録する TransactionManager
///
/// ミドルウェアテストが commit / rollback の分岐を観測するために使う。
/// コミットされなかったトランザクションはロールバックされたとみなせる
/// （`begun() - committed()`）。
#[derive(Clone, Default)]
pub struct MockTransactionManager {
    begins:  Arc<AtomicUsize>,
    commits: Arc<AtomicUsize>,
}

impl MockTransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 開始されたトランザクション数
    pub fn begun(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    /// コミットされたトランザクション数
    pub fn committed(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionManager for MockTransactionManager {
    async fn begin(&self) -> Result<TxContext, AppError> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(TxContext::mock_counted(Arc::clone(&self.commits)))
    }
}
