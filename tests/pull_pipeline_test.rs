//! 取り込みパイプラインのテスト

mod support;

use junkai_common::{City, CityStore, KvStore, MemoryStore, Record, Status};
use junkai_sync::pipeline::{PullOutcome, SyncClient, INITIAL_SYNC_LABEL, SYNC_LABEL};
use junkai_sync::status::SilentSink;
use serde_json::json;
use support::{settings, RecordingSink, Reply, ScriptedTransport};

fn client(transport: ScriptedTransport) -> SyncClient<ScriptedTransport, MemoryStore> {
    SyncClient::new(transport, CityStore::new(MemoryStore::new()), settings())
}

fn seeded_client(transport: ScriptedTransport) -> SyncClient<ScriptedTransport, MemoryStore> {
    let mut client = client(transport);
    let existing = Record {
        city: "大和市".into(),
        station: "既存駅".into(),
        number: "既存 1".into(),
        ui_index: "Y1".into(),
        ui_index_num: 1,
        ..Default::default()
    };
    client.store_mut().save_city(City::Yamato, &[existing]).unwrap();
    client
}

fn raw(client: &SyncClient<ScriptedTransport, MemoryStore>, city: City) -> Option<String> {
    client.store().kv().get(&city.storage_key("junkai")).unwrap()
}

#[tokio::test]
async fn test_pull_inspection_log() {
    let transport = ScriptedTransport::new().on_get(Reply::json(json!({
        "data": [
            ["city", "station", "model", "number", "ui_index", "status", "checked_at"],
            ["大和市", "StationA", "ModelX", "ABC-123", "Y5", "Checked", "2024/03/01-09:30"],
            ["海老名市", "StationB", "ModelY", "DEF-456", "E1", "Unnecessary", ""],
        ]
    })));
    let mut client = client(transport);
    let sink = RecordingSink::default();

    let outcome = client.pull("InspectionLog", SYNC_LABEL, &sink).await;
    assert_eq!(outcome, PullOutcome::Synced(vec![(City::Yamato, 1), (City::Ebina, 1)]));
    assert_eq!(sink.last_status(), "同期完了：大和1 / 海老名1 / 調布0");
    assert_eq!(sink.progress.borrow().last(), Some(&100));
    assert_eq!(*sink.hidden.borrow(), 1);

    let yamato = client.store().read_city(City::Yamato);
    assert_eq!(yamato[0].number, "ABC-123");
    assert!(yamato[0].checked);
    assert_eq!(yamato[0].last_inspected_at, "2024-03-01T09:30:00.000Z");
    // 保存時に市ごとに振り直す
    assert_eq!(yamato[0].ui_index, "Y1");

    let ebina = client.store().read_city(City::Ebina);
    assert_eq!(ebina[0].status, Status::Skip);
    assert!(client.store().read_city(City::Chofu).is_empty());
}

#[tokio::test]
async fn test_pull_ledger_requests_sheet() {
    let transport = ScriptedTransport::new().on_get(Reply::json(json!({
        "values": [
            ["City", "Station", "Model", "Plate", "Status"],
            ["調布市", "国領", "ヤリス", "多摩 5", "stop"],
            ["調布市", "布田", "ノート", "多摩 6", ""],
            ["横浜市", "関内", "フィット", "横浜 1", ""],
        ]
    })));
    let mut client = client(transport);

    let outcome = client.pull("全体管理", INITIAL_SYNC_LABEL, &RecordingSink::default()).await;
    assert_eq!(outcome.count(City::Chofu), 2);
    assert_eq!(outcome.count(City::Yamato), 0);

    let chofu = client.store().read_city(City::Chofu);
    assert_eq!(chofu[0].status, Status::Stop);
    assert_eq!(chofu[1].ui_index, "C2");
    assert_eq!(chofu[1].ui_index_num, 2);

    let urls = client.transport().get_urls.lock().unwrap().clone();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].starts_with("https://example.com/exec?action=pull&sheet="));
}

/// 全市0件なら既存データをそのまま残す
#[tokio::test]
async fn test_pull_empty_keeps_store() {
    let transport = ScriptedTransport::new().on_get(Reply::json(json!({"data": []})));
    let mut client = seeded_client(transport);
    let before = raw(&client, City::Yamato);
    let sink = RecordingSink::default();

    let outcome = client.pull("InspectionLog", SYNC_LABEL, &sink).await;
    assert_eq!(outcome, PullOutcome::Empty);
    assert!(!outcome.is_success());
    assert_eq!(raw(&client, City::Yamato), before);
    assert_eq!(sink.last_status(), "同期失敗：データが空でした（既存データは保持）");
}

/// 対象市の行が1件もない場合も空扱い
#[tokio::test]
async fn test_pull_unknown_cities_only() {
    let transport = ScriptedTransport::new().on_get(Reply::json(json!([
        ["横浜市", "S", "M", "N", "X1", "", ""],
    ])));
    let mut client = seeded_client(transport);
    let before = raw(&client, City::Yamato);

    let outcome = client.pull("InspectionLog", SYNC_LABEL, &SilentSink).await;
    assert_eq!(outcome, PullOutcome::Empty);
    assert_eq!(raw(&client, City::Yamato), before);
}

#[tokio::test]
async fn test_pull_failure_keeps_store() {
    let transport = ScriptedTransport::new()
        .on_get(Reply::Fail("offline".into()))
        .on_get(Reply::Body("<html></html>".into()))
        .on_get(Reply::Fail("offline".into()));
    let mut client = seeded_client(transport);
    let before = raw(&client, City::Yamato);
    let sink = RecordingSink::default();

    let outcome = client.pull("InspectionLog", SYNC_LABEL, &sink).await;
    assert!(matches!(outcome, PullOutcome::Failed(_)));
    assert_eq!(client.transport().get_count(), 3);
    assert_eq!(raw(&client, City::Yamato), before);
    assert_eq!(sink.last_status(), "同期失敗：通信または解析エラー（既存データは保持）");
}

/// 取れた市だけ置き換え、他の市は残す
#[tokio::test]
async fn test_pull_replaces_only_returned_cities() {
    let transport = ScriptedTransport::new().on_get(Reply::json(json!({
        "data": [["海老名市", "海老名駅", "アクア", "相模 2", "E9", "", ""]]
    })));
    let mut client = seeded_client(transport);

    let outcome = client.pull("InspectionLog", SYNC_LABEL, &RecordingSink::default()).await;
    assert_eq!(outcome, PullOutcome::Synced(vec![(City::Ebina, 1)]));
    assert_eq!(client.store().read_city(City::Yamato)[0].station, "既存駅");
    assert_eq!(client.store().read_city(City::Ebina)[0].ui_index, "E1");
}

#[tokio::test]
async fn test_initial_sync_resets_before_pull() {
    let transport = ScriptedTransport::new().on_get(Reply::json(json!({
        "data": [["調布市", "国領", "ヤリス", "多摩 5", "stop"]]
    })));
    let mut client = seeded_client(transport);
    let sink = RecordingSink::default();

    let outcome = client.initial_sync(&sink).await;
    assert!(outcome.is_success());
    assert!(client.store().read_city(City::Yamato).is_empty());
    assert_eq!(client.store().read_city(City::Chofu).len(), 1);
    assert_eq!(sink.statuses.borrow()[0], "リセット中…");
    assert_eq!(sink.last_status(), "初期同期完了：大和0 / 海老名0 / 調布1");
}

/// 送信に失敗しても取り込みは続ける
#[tokio::test]
async fn test_sync_continues_after_push_failure() {
    let transport = ScriptedTransport::new()
        .on_post(Reply::Fail("offline".into()))
        .on_get(Reply::json(json!({
            "data": [["大和市", "大和駅", "プリウス", "横浜 3", "Y1", "Checked", "2024/05/01-10:00"]]
        })));
    let mut client = seeded_client(transport);
    let sink = RecordingSink::default();

    let (pushed, pulled) = client.sync(&sink).await;
    assert!(!pushed.ok);
    assert!(pulled.is_success());
    assert!(sink.statuses.borrow().iter().any(|s| s == "送信エラー"));

    let yamato = client.store().read_city(City::Yamato);
    assert_eq!(yamato.len(), 1);
    assert_eq!(yamato[0].number, "横浜 3");
    assert!(yamato[0].checked);
}

#[tokio::test]
async fn test_sync_push_rejected() {
    let transport = ScriptedTransport::new()
        .on_post(Reply::json(json!({"ok": false, "error": "locked"})))
        .on_get(Reply::json(json!({"data": []})));
    let mut client = seeded_client(transport);
    let sink = RecordingSink::default();

    let (pushed, pulled) = client.sync(&sink).await;
    assert!(!pushed.ok);
    assert_eq!(pulled, PullOutcome::Empty);
    assert!(sink.statuses.borrow().iter().any(|s| s == "送信失敗…"));
}
