use crate::error::{Result, SyncError};
use crate::fetcher::RetryPolicy;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/AKfycby9RpFiUbYu6YX6JW9XfwbDx36_4AIlGEQMOxR3SnxgNdoRUJKfyxvF3b1SEYwuHb3X/exec";
const DEFAULT_TIRE_APP_URL: &str = "https://rkworks2025-coder.github.io/r.k.w-/";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// スプレッドシート側のエンドポイント
    pub endpoint_url: String,
    /// 点検アプリのURL
    pub tire_app_url: String,
    pub timeout_seconds: u64,
    pub retries: u32,
    pub backoff_step_ms: u64,
    /// ログシートの日時と日付表示のUTCオフセット（分）
    pub utc_offset_minutes: i32,
    /// ローカル保存ファイル（省略時はデータディレクトリ）
    pub store_path: Option<PathBuf>,
    pub namespace: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.into(),
            tire_app_url: DEFAULT_TIRE_APP_URL.into(),
            timeout_seconds: 15,
            retries: 2,
            backoff_step_ms: 400,
            utc_offset_minutes: 0,
            store_path: None,
            namespace: junkai_common::DEFAULT_NAMESPACE.into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        // 環境変数を優先
        if let Ok(url) = std::env::var("JUNKAI_ENDPOINT") {
            if !url.trim().is_empty() {
                config.endpoint_url = url;
            }
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SyncError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("junkai").join("config.json"))
    }

    /// ローカル保存ファイルの場所
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        let data = dirs::data_dir()
            .ok_or_else(|| SyncError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data.join("junkai").join("storage.json"))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            timeout: Duration::from_secs(self.timeout_seconds),
            backoff_step: Duration::from_millis(self.backoff_step_ms),
        }
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            SyncError::Config(format!("UTCオフセットが不正です: {}分", self.utc_offset_minutes))
        })
    }

    pub fn set_endpoint(&mut self, url: String) -> Result<()> {
        self.endpoint_url = url;
        self.save()
    }

    pub fn set_tire_app_url(&mut self, url: String) -> Result<()> {
        self.tire_app_url = url;
        self.save()
    }
}
