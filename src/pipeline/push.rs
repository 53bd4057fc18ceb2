use super::SyncClient;
use crate::error::{Result, SyncError};
use crate::fetcher::parse_body;
use crate::status::StatusSink;
use crate::transport::Transport;
use junkai_common::KvStore;
use serde_json::Value;
use tracing::{error, info};

/// push の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushOutcome {
    pub ok: bool,
}

impl<T: Transport, S: KvStore> SyncClient<T, S> {
    /// 全市のレコードを送信する（ローカル保存は変更しない）
    pub async fn push(&self, sink: &dyn StatusSink) -> PushOutcome {
        sink.status("データ送信中…");
        sink.progress(15);

        let outcome = match self.submit().await {
            Ok(()) => {
                sink.status("データ送信完了！");
                sink.progress(100);
                PushOutcome { ok: true }
            }
            Err(SyncError::RemoteRejection(reason)) => {
                info!(reason = %reason, "送信が受け付けられませんでした");
                sink.status("更新に失敗しました");
                PushOutcome { ok: false }
            }
            Err(e) => {
                error!(error = %e, "push error");
                sink.status("更新エラー");
                PushOutcome { ok: false }
            }
        };

        sink.hide();
        outcome
    }

    /// 送信本体。`{"ok": true}` 以外の応答は `RemoteRejection`。
    pub(super) async fn submit(&self) -> Result<()> {
        let records = self.store.all_records();
        let data = serde_json::to_string(&records)?;
        let form = [("action", "push"), ("data", data.as_str())];

        let timeout = self.settings.policy.timeout;
        let body = tokio::time::timeout(timeout, self.transport.post_form(&self.settings.endpoint, &form))
            .await
            .map_err(|_| SyncError::Timeout(timeout))??;

        let json = parse_body(&body)
            .map_err(|_| SyncError::RemoteRejection("応答がJSONではありません".into()))?;
        match json.get("ok") {
            Some(Value::Bool(true)) => {
                info!(records = records.len(), "送信完了");
                Ok(())
            }
            _ => Err(SyncError::RemoteRejection(body.chars().take(200).collect())),
        }
    }
}
