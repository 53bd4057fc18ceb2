use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("通信エラー: {0}")]
    Transport(String),

    #[error("タイムアウト: {}秒以内に応答がありません", .0.as_secs())]
    Timeout(Duration),

    #[error("レスポンスのパースに失敗: {0}")]
    Parse(String),

    #[error("データが空でした（既存データは保持）")]
    EmptyResult,

    #[error("送信が受け付けられませんでした: {0}")]
    RemoteRejection(String),

    #[error("ローカル保存エラー: {0}")]
    Store(#[from] junkai_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),
}

impl SyncError {
    /// 通信系（タイムアウト含む）か
    pub fn is_transport(&self) -> bool {
        matches!(self, SyncError::Transport(_) | SyncError::Timeout(_))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Transport(e.to_string())
    }
}

impl From<dialoguer::Error> for SyncError {
    fn from(e: dialoguer::Error) -> Self {
        SyncError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
