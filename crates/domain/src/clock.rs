//! # Clock（時刻プロバイダ）
//!
//! `Utc::now()` の直接呼び出しを置き換え、
//! テストで固定時刻を注入可能にするための抽象化。

use chrono::{DateTime, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定時刻を返すテスト用実装
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
