use super::SyncClient;
use crate::error::{Result, SyncError};
use crate::fetcher::fetch_json;
use crate::status::{StatusSink, SyncPhase};
use crate::transport::Transport;
use junkai_common::{decode_sheet, extract_rows, City, CommitOutcome, KvStore, SheetKind};
use reqwest::Url;
use tracing::{error, info};

/// pull の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// 書き込んだ市と件数
    Synced(Vec<(City, usize)>),
    /// 全市0件（既存データは保持）
    Empty,
    /// 通信・解析・保存の失敗（既存データは保持）
    Failed(String),
}

impl PullOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PullOutcome::Synced(_))
    }

    pub fn count(&self, city: City) -> usize {
        match self {
            PullOutcome::Synced(written) => written
                .iter()
                .find(|(c, _)| *c == city)
                .map(|(_, n)| *n)
                .unwrap_or(0),
            _ => 0,
        }
    }
}

/// 取得URL（シート名とキャッシュ避けのタイムスタンプ付き）
pub fn pull_url(endpoint: &str, sheet: &str, timestamp_ms: i64) -> Result<String> {
    let url = Url::parse_with_params(
        endpoint,
        &[
            ("action", "pull"),
            ("sheet", sheet),
            ("_", &timestamp_ms.to_string()),
        ],
    )
    .map_err(|e| SyncError::Config(format!("エンドポイントURLが不正です: {}", e)))?;
    Ok(url.to_string())
}

impl<T: Transport, S: KvStore> SyncClient<T, S> {
    /// シートを取り込んで市ごとに置き換える
    ///
    /// 1件も取れなかった場合や通信・解析に失敗した場合は既存データを残す。
    pub async fn pull(&mut self, sheet: &str, label: &str, sink: &dyn StatusSink) -> PullOutcome {
        sink.status(&format!("{}開始…", label));
        sink.progress(5);

        let outcome = match self.pull_inner(sheet, label, sink).await {
            Ok(CommitOutcome::Written(written)) => {
                sink.phase(SyncPhase::Done);
                PullOutcome::Synced(written)
            }
            Ok(CommitOutcome::Empty) => {
                sink.phase(SyncPhase::Failed);
                PullOutcome::Empty
            }
            Err(e) => {
                error!(label, sheet, error = %e, "取り込みに失敗");
                sink.phase(SyncPhase::Failed);
                PullOutcome::Failed(e.to_string())
            }
        };

        sink.status(&status_text(label, &outcome));
        sink.hide();
        outcome
    }

    async fn pull_inner(&mut self, sheet: &str, label: &str, sink: &dyn StatusSink) -> Result<CommitOutcome> {
        let url = pull_url(&self.settings.endpoint, sheet, chrono::Utc::now().timestamp_millis())?;

        sink.status(&format!("{}取得中…", label));
        sink.phase(SyncPhase::Fetching);
        let json = fetch_json(&self.transport, &url, &self.settings.policy).await?;

        sink.phase(SyncPhase::Parsing);
        let rows = extract_rows(&json);
        info!(sheet, rows = rows.len(), "行を取得");

        sink.phase(SyncPhase::Normalizing);
        let buckets = decode_sheet(SheetKind::of(sheet), rows, self.settings.offset);

        sink.phase(SyncPhase::Writing);
        let committed = self.store.commit_pull(buckets)?;
        if committed == CommitOutcome::Empty {
            info!(sheet, "{}", SyncError::EmptyResult);
        }
        Ok(committed)
    }
}

fn status_text(label: &str, outcome: &PullOutcome) -> String {
    match outcome {
        PullOutcome::Synced(_) => {
            let counts: Vec<String> = City::ALL
                .into_iter()
                .map(|city| format!("{}{}", city.short_label(), outcome.count(city)))
                .collect();
            format!("{}完了：{}", label, counts.join(" / "))
        }
        PullOutcome::Empty => format!("{}失敗：データが空でした（既存データは保持）", label),
        PullOutcome::Failed(_) => format!("{}失敗：通信または解析エラー（既存データは保持）", label),
    }
}
