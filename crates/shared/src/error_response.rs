//! # エラーレスポンス
//!
//! 全エンドポイント共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は各サービスの責務（shared に axum 依存を入れない）
//! - `code` には HTTP ステータスコードがそのまま入る

use serde::{Deserialize, Serialize};

/// エラーレスポンス
///
/// すべての非 2xx レスポンスは `{ "code": <status>, "message": <詳細> }`
/// 形式のボディを返す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP ステータスコード
    pub code:    u16,
    /// 人間可読なエラーメッセージ
    pub message: String,
}

impl ErrorResponse {
    /// 新しい `ErrorResponse` を作成する
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serializeを正しいjson形状にする() {
        let response = ErrorResponse::new(404, "user not found");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "code": 404, "message": "user not found" })
        );
    }

    #[test]
    fn test_deserializeでjsonからオブジェクトに変換する() {
        let json = r#"{"code": 400, "message": "bad request"}"#;
        let response: ErrorResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response, ErrorResponse::new(400, "bad request"));
    }
}
