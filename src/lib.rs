//! 巡回チェックリスト同期クライアント
//!
//! 通信（取得・送信）、ファイル保存、設定、CLIを担う。
//! 正規化や保存形式などの中核は `junkai_common` にある。

pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod file_store;
pub mod pipeline;
pub mod redirect;
pub mod status;
pub mod transport;
