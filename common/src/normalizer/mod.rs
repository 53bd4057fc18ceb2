//! レコード正規化モジュール
//!
//! スプレッドシートから届く行（配列 or オブジェクト）を正規形の
//! `Record` に変換する。
//!
//! ## シート形式
//! 1. 全体管理（台帳）: ヘッダ行あり/なし・位置ずれのある配列、またはオブジェクト
//! 2. InspectionLog（点検ログ）: 7列固定の配列、英語の状態コード

pub mod inspection_log;
pub mod ledger;

use crate::types::{Record, Status};
use serde_json::Value;

pub use inspection_log::{decode_log, map_status_code, parse_checked_at, ui_index_number};
pub use ledger::{decode_ledger, HeaderMap};

/// 生のレコード（オブジェクト）を正規形に変換する
///
/// - city / station / model / number / status は前後の空白を除去
/// - status が空なら `normal`
/// - checked は真偽値に変換
/// - index は正の整数、それ以外は 0
/// - ui_index / ui_index_num は引き継ぎ（なければ空 / 0）
pub fn normalize(raw: &Value) -> Record {
    let field = |key: &str| raw.get(key).unwrap_or(&Value::Null);

    Record {
        city: value_text(field("city")),
        station: value_text(field("station")),
        model: value_text(field("model")),
        number: value_text(field("number")),
        status: Status::parse(&value_text(field("status"))),
        checked: is_truthy(field("checked")),
        index: coerce_index(field("index")),
        last_inspected_at: value_text(field("last_inspected_at")),
        ui_index: value_text(field("ui_index")),
        ui_index_num: coerce_count(field("ui_index_num")),
    }
    .normalized()
}

/// セルや値を文字列化する（null / false / 0 は空文字）
pub(crate) fn value_text(value: &Value) -> String {
    if !is_truthy(value) {
        return String::new();
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// スプレッドシート流の真偽判定
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 配列行の i 列目（空・欠損は None）
pub(crate) fn cell(row: &[Value], i: usize) -> Option<String> {
    row.get(i).filter(|v| is_truthy(v)).map(value_text)
}

/// 配列行の i 列目が文字列ならその値
pub(crate) fn cell_str(row: &[Value], i: usize) -> Option<&str> {
    row.get(i).and_then(Value::as_str)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn coerce_index(value: &Value) -> u32 {
    match as_number(value) {
        Some(n) if n.is_finite() && n > 0.0 => n.trunc().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

fn coerce_count(value: &Value) -> u32 {
    match as_number(value) {
        Some(n) if n.is_finite() && n >= 0.0 => n.trunc().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}
