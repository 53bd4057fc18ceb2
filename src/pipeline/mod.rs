//! 同期パイプライン
//!
//! - pull: 取得 → 形状判定 → 正規化 → 市別振り分け → UIインデックス → 保存
//! - push: 全市のレコードをまとめて送信
//!
//! どちらもエラーを呼び出し元に投げず、結果値とステータス文言で返す。

mod pull;
mod push;

pub use pull::{pull_url, PullOutcome};
pub use push::PushOutcome;

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::RetryPolicy;
use crate::status::StatusSink;
use crate::transport::Transport;
use chrono::FixedOffset;
use junkai_common::{CityStore, KvStore, LEDGER_SHEET, LOG_SHEET};

/// 初期同期のラベル
pub const INITIAL_SYNC_LABEL: &str = "初期同期";
/// 通常同期のラベル
pub const SYNC_LABEL: &str = "同期";

/// パイプラインの設定
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: String,
    pub policy: RetryPolicy,
    pub offset: FixedOffset,
}

impl ClientSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            endpoint: config.endpoint_url.clone(),
            policy: config.retry_policy(),
            offset: config.utc_offset()?,
        })
    }
}

/// 同期クライアント
pub struct SyncClient<T: Transport, S: KvStore> {
    transport: T,
    store: CityStore<S>,
    settings: ClientSettings,
}

impl<T: Transport, S: KvStore> SyncClient<T, S> {
    pub fn new(transport: T, store: CityStore<S>, settings: ClientSettings) -> Self {
        Self {
            transport,
            store,
            settings,
        }
    }

    pub fn store(&self) -> &CityStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CityStore<S> {
        &mut self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 初期同期: ローカル保存をリセットしてから台帳を取り込む
    pub async fn initial_sync(&mut self, sink: &dyn StatusSink) -> PullOutcome {
        sink.status("リセット中…");
        sink.progress(10);
        if let Err(e) = self.store.reset_all() {
            tracing::error!(error = %e, "リセットに失敗");
            let message = format!("{}失敗：リセットできませんでした", INITIAL_SYNC_LABEL);
            sink.status(&message);
            sink.hide();
            return PullOutcome::Failed(message);
        }
        self.pull(LEDGER_SHEET, INITIAL_SYNC_LABEL, sink).await
    }

    /// 同期: 送信（失敗しても続行）してから点検ログを取り込む
    pub async fn sync(&mut self, sink: &dyn StatusSink) -> (PushOutcome, PullOutcome) {
        sink.status("データ送信中…");
        sink.progress(15);
        let pushed = match self.submit().await {
            Ok(()) => {
                sink.status("送信成功、同期中…");
                PushOutcome { ok: true }
            }
            Err(e) if e.is_transport() => {
                tracing::error!(error = %e, "push error");
                sink.status("送信エラー");
                PushOutcome { ok: false }
            }
            Err(e) => {
                tracing::warn!(error = %e, "送信が受け付けられませんでした");
                sink.status("送信失敗…");
                PushOutcome { ok: false }
            }
        };
        sink.progress(35);

        let pulled = self.pull(LOG_SHEET, SYNC_LABEL, sink).await;
        (pushed, pulled)
    }
}
