//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
