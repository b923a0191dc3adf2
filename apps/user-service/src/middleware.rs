//! # ミドルウェア
//!
//! リクエスト処理チェーンを包む横断的関心事を定義する。
//!
//! - [`transaction`] - リクエストごとに 1 トランザクションを束縛する
//! - [`recovery`] - パニックを 500 レスポンスに変換する

pub mod recovery;
pub mod transaction;

pub use recovery::handle_panic;
pub use transaction::transaction;
