//! InspectionLog（点検ログ）シートの読み取り
//!
//! 行は7列固定: `[city, station, model, number, uiIndex, statusCode, checkedAt]`

use super::value_text;
use crate::bucket::CityBuckets;
use crate::types::{Record, Status};
use chrono::{FixedOffset, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// ログ行の最小列数
pub const LOG_COLUMNS: usize = 7;

/// 状態コードから決まる内部状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogState {
    pub status: Status,
    pub checked: bool,
    /// checkedAt を最終点検日時として採用するか
    pub stamped: bool,
}

/// 英語の状態コードを内部状態に変換する
///
/// | code | status | checked | 日時 |
/// |---|---|---|---|
/// | `Checked` | normal | true | 採用 |
/// | `stopped` | stop | false | - |
/// | `Unnecessary` | skip | false | - |
/// | `7days_rule` / `7 day rule` | 7days_rule | false | 採用 |
/// | その他 | normal | false | - |
pub fn map_status_code(code: &str) -> LogState {
    let (status, checked, stamped) = match code.trim() {
        "Checked" => (Status::Normal, true, true),
        "stopped" => (Status::Stop, false, false),
        "Unnecessary" => (Status::Skip, false, false),
        "7days_rule" | "7 day rule" => (Status::SevenDaysRule, false, true),
        _ => (Status::Normal, false, false),
    };
    LogState { status, checked, stamped }
}

/// `YYYY/MM/DD` または `YYYY/MM/DD-HH:mm` をISO-8601に変換する
///
/// 時刻は `offset` の壁時計として解釈する。解釈できなければ空文字。
pub fn parse_checked_at(raw: &str, offset: FixedOffset) -> String {
    parse_wall_clock(raw, offset)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

fn parse_wall_clock(raw: &str, offset: FixedOffset) -> Option<chrono::DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let parts: Vec<&str> = s.split('-').collect();
    let (date_part, time_part) = if parts.len() >= 2 {
        let time = parts[1].split(' ').next().unwrap_or_default();
        (parts[0].replace('/', "-"), time)
    } else {
        (s.replace('/', "-"), "00:00")
    };

    let date = NaiveDate::parse_from_str(&date_part, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time_part, "%H:%M").ok()?;
    let local = offset.from_local_datetime(&date.and_time(time)).single()?;
    Some(local.with_timezone(&Utc))
}

/// UIインデックス表記（例: `Y12`）から番号部分を取り出す
pub fn ui_index_number(label: &str) -> u32 {
    lazy_static::lazy_static! {
        // 任意の非数字 + 数字
        static ref UI_INDEX_RE: Regex = Regex::new(r"^[^0-9]*([0-9]+)").unwrap();
    }

    UI_INDEX_RE
        .captures(label)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(0)
}

fn is_log_header(row: &[Value]) -> bool {
    let lower: Vec<String> = row
        .iter()
        .map(|v| v.as_str().map(str::to_lowercase).unwrap_or_default())
        .collect();
    lower.iter().any(|c| c == "city") && lower.iter().any(|c| c == "station")
}

/// ログ行を1件のレコードに変換する（7列未満は None）
pub fn decode_log_row(row: &[Value], offset: FixedOffset) -> Option<Record> {
    if row.len() < LOG_COLUMNS {
        return None;
    }

    let label = value_text(&row[4]);
    let state = map_status_code(&value_text(&row[5]));
    let last_inspected_at = if state.stamped {
        parse_checked_at(&value_text(&row[6]), offset)
    } else {
        String::new()
    };

    Some(
        Record {
            city: value_text(&row[0]),
            station: value_text(&row[1]),
            model: value_text(&row[2]),
            number: value_text(&row[3]),
            status: state.status,
            checked: state.checked,
            index: 0,
            last_inspected_at,
            ui_index_num: ui_index_number(&label),
            ui_index: label,
        }
        .normalized(),
    )
}

/// ログシートの行を市ごとに振り分ける
pub fn decode_log(rows: &[Value], offset: FixedOffset) -> CityBuckets {
    let body = match rows.first().and_then(Value::as_array) {
        Some(first) if is_log_header(first) => &rows[1..],
        _ => rows,
    };

    let mut buckets = CityBuckets::new();
    for row in body {
        let Some(record) = row.as_array().and_then(|cells| decode_log_row(cells, offset)) else {
            debug!("列数不足のログ行を破棄");
            continue;
        };
        let city = record.city.clone();
        if !buckets.push(record) {
            debug!(city = %city, "未知の市のためログ行を破棄");
        }
    }
    buckets
}
