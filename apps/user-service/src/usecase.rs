//! # ユースケース層
//!
//! ビジネスロジックのポートと実装を定義する。
//!
//! ## 設計方針
//!
//! - ハンドラはポート（trait）だけに依存する
//! - ユースケースはリポジトリのポートだけに依存する
//! - 下位レイヤーが生成したエラーはラップせずそのまま返す

pub mod user;

pub use user::{NewUserDto, UserDto, UserUseCase, UserUseCaseImpl};
