//! リトライ付きJSON取得
//!
//! 1回ごとにタイムアウトを掛け、失敗（通信・タイムアウト・JSON不正）したら
//! `backoff_step × 試行回数` 待って再試行する。`retries + 1` 回失敗したら
//! 最後のエラーを返す。

use crate::error::{Result, SyncError};
use crate::transport::Transport;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// 失敗時にログへ出すボディの長さ
const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 初回を除く再試行回数
    pub retries: u32,
    /// 1回あたりのタイムアウト
    pub timeout: Duration,
    /// 待ち時間の刻み（n回目の失敗後は step × n）
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            timeout: Duration::from_secs(15),
            backoff_step: Duration::from_millis(400),
        }
    }
}

impl RetryPolicy {
    /// `attempt`（0始まり）回目の失敗後の待ち時間
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_step * (attempt + 1)
    }
}

/// ボディ文字列をJSONとして読む（先頭のBOMは除去）
pub fn parse_body(raw: &str) -> Result<Value> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    serde_json::from_str(text).map_err(|e| {
        let preview: String = text.chars().take(BODY_PREVIEW_CHARS).collect();
        warn!(body = %preview, "JSONのパースに失敗");
        SyncError::Parse(e.to_string())
    })
}

async fn fetch_once<T: Transport + ?Sized>(transport: &T, url: &str, timeout: Duration) -> Result<Value> {
    // タイムアウトで future を破棄すると通信も中断される
    let raw = tokio::time::timeout(timeout, transport.get_text(url))
        .await
        .map_err(|_| SyncError::Timeout(timeout))??;
    parse_body(&raw)
}

/// URLからJSONを取得する
pub async fn fetch_json<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    policy: &RetryPolicy,
) -> Result<Value> {
    let mut attempt = 0;
    loop {
        match fetch_once(transport, url, policy.timeout).await {
            Ok(json) => return Ok(json),
            Err(e) if attempt < policy.retries => {
                let wait = policy.backoff(attempt);
                debug!(attempt = attempt + 1, error = %e, wait_ms = wait.as_millis() as u64, "取得失敗、再試行します");
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(attempts = attempt + 1, error = %e, "取得に失敗しました");
                return Err(e);
            }
        }
    }
}
