//! # ヘルスチェックレスポンス
//!
//! `GET /health` のレスポンス構造体。

use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 稼働状態（正常時は `"healthy"`）
    pub status: String,
}

impl HealthResponse {
    /// 正常稼働を表すレスポンスを作成する
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_healthyのjson形状() {
        let json = serde_json::to_value(HealthResponse::healthy()).unwrap();

        assert_eq!(json, serde_json::json!({ "status": "healthy" }));
    }
}
