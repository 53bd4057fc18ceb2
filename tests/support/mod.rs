//! 統合テスト用の差し替え実装

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::FixedOffset;
use junkai_sync::error::{Result, SyncError};
use junkai_sync::fetcher::RetryPolicy;
use junkai_sync::pipeline::ClientSettings;
use junkai_sync::status::StatusSink;
use junkai_sync::transport::Transport;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub const ENDPOINT: &str = "https://example.com/exec";

/// 台本の1手
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Fail(String),
    /// タイムアウトより長く待たせる
    Hang,
}

impl Reply {
    pub fn json(value: serde_json::Value) -> Self {
        Reply::Body(value.to_string())
    }
}

/// 台本どおりに応答する Transport
#[derive(Default)]
pub struct ScriptedTransport {
    gets: Mutex<VecDeque<Reply>>,
    posts: Mutex<VecDeque<Reply>>,
    pub get_urls: Mutex<Vec<String>>,
    pub post_forms: Mutex<Vec<Vec<(String, String)>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(self, reply: Reply) -> Self {
        self.gets.lock().unwrap().push_back(reply);
        self
    }

    pub fn on_post(self, reply: Reply) -> Self {
        self.posts.lock().unwrap().push_back(reply);
        self
    }

    pub fn get_count(&self) -> usize {
        self.get_urls.lock().unwrap().len()
    }

    async fn play(reply: Option<Reply>) -> Result<String> {
        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Fail(message)) => Err(SyncError::Transport(message)),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(SyncError::Transport("unreachable".into()))
            }
            None => Err(SyncError::Transport("台本切れ".into())),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        self.get_urls.lock().unwrap().push(url.to_string());
        let reply = self.gets.lock().unwrap().pop_front();
        Self::play(reply).await
    }

    async fn post_form(&self, _url: &str, form: &[(&str, &str)]) -> Result<String> {
        let owned = form.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        self.post_forms.lock().unwrap().push(owned);
        let reply = self.posts.lock().unwrap().pop_front();
        Self::play(reply).await
    }
}

/// ステータス文言と進捗を記録する
#[derive(Default)]
pub struct RecordingSink {
    pub statuses: RefCell<Vec<String>>,
    pub progress: RefCell<Vec<u8>>,
    pub hidden: RefCell<usize>,
}

impl RecordingSink {
    pub fn last_status(&self) -> String {
        self.statuses.borrow().last().cloned().unwrap_or_default()
    }
}

impl StatusSink for RecordingSink {
    fn status(&self, text: &str) {
        self.statuses.borrow_mut().push(text.to_string());
    }

    fn progress(&self, percent: u8) {
        self.progress.borrow_mut().push(percent);
    }

    fn hide(&self) {
        *self.hidden.borrow_mut() += 1;
    }
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

pub fn fast_policy(retries: u32) -> RetryPolicy {
    RetryPolicy {
        retries,
        timeout: Duration::from_millis(200),
        backoff_step: Duration::ZERO,
    }
}

pub fn settings() -> ClientSettings {
    ClientSettings {
        endpoint: ENDPOINT.to_string(),
        policy: fast_policy(2),
        offset: utc(),
    }
}
