//! # Meibo インフラ層
//!
//! PostgreSQL への接続・トランザクション管理と、
//! ドメインエンティティの永続化（リポジトリ）を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ユースケース層はここで定義されたトレイト
//!   （[`repository::UserRepository`], [`db::TransactionManager`]）経由で
//!   このクレートを利用する
//! - **リクエストスコープのトランザクション**: すべてのリポジトリ操作は
//!   リクエストに束縛された [`db::TxContext`] 上で実行される

pub mod db;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use db::{RequestTx, TxContext};
