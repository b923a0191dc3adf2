//! # Meibo ドメイン層
//!
//! ユーザーエンティティとエラータクソノミーを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! user-service → infra → domain → shared
//! ```
//!
//! ドメイン層はインフラ層（DB、HTTP）には一切依存しない。
//! リポジトリやユースケースはこのクレートの型だけを介して会話する。
//!
//! ## モジュール構成
//!
//! - [`error`] - 全レイヤーを流れるエラー値（メッセージ + 深刻度 + コード）
//! - [`user`] - ユーザーエンティティと識別子
//! - [`clock`] - テスト可能な時刻プロバイダ

pub mod clock;
pub mod error;
pub mod user;

pub use error::{AppError, ErrorCode, ErrorLevel};
