//! HTTP送受信の抽象
//!
//! 本番は reqwest、テストは台本どおりに応答する差し替え実装を使う。

use crate::error::{Result, SyncError};
use async_trait::async_trait;

#[async_trait]
pub trait Transport: Send + Sync {
    /// GETしてボディを文字列で返す
    async fn get_text(&self, url: &str) -> Result<String>;

    /// フォーム送信（application/x-www-form-urlencoded）してボディを返す
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String>;
}

/// reqwest による実装
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;
        Ok(response.text().await?)
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        let response = self.client.post(url).form(form).send().await?;
        response
            .text()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))
    }
}
