//! # リポジトリ実装
//!
//! ドメインエンティティの永続化ポートと、その PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ユースケース層はトレイト経由でリポジトリを利用する
//! - **トランザクション境界**: すべての操作はリクエストに束縛された
//!   [`crate::db::TxContext`] 上で実行される
//! - **エラー変換**: ストレージ由来の失敗は検出地点でエラータクソノミーに
//!   変換し、上位レイヤーはそのまま伝播させる

pub mod user_repository;

pub use user_repository::{PostgresUserRepository, UserRepository};
