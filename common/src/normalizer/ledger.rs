//! 全体管理（台帳）シートの行形状判定
//!
//! 1行目が `city` と `station` を含むヘッダならヘッダ位置で読む。
//! ヘッダがなければ位置ベースの判定を優先順に試す:
//!
//! 1. 2列目が `city` の行はヘッダの残骸として捨てる
//! 2. 6列以上かつ1列目が `TS` で始まる行はタグ付き行
//! 3. 6列以上の行は列ずれを許容する読み方
//! 4. それ以外（6列未満）は先頭から city, station, model, number, status
//!
//! オブジェクト行はそのまま正規化に回す。

use super::{cell, cell_str, normalize};
use crate::bucket::CityBuckets;
use crate::types::{Record, Status};
use serde_json::Value;
use tracing::debug;

/// 位置ベースで読み取った1行
#[derive(Debug, Clone, Default, PartialEq)]
struct LedgerRow {
    city: String,
    station: String,
    model: String,
    number: String,
    status: String,
}

impl LedgerRow {
    fn into_record(self) -> Record {
        Record {
            city: self.city,
            station: self.station,
            model: self.model,
            number: self.number,
            status: Status::parse(&self.status),
            ..Default::default()
        }
        .normalized()
    }
}

enum RowDecision {
    Skip,
    Row(LedgerRow),
}

/// 位置ベースの行形式
struct PositionalDialect {
    name: &'static str,
    /// この形式として読める前提条件
    matches: fn(&[Value]) -> bool,
    decode: fn(&[Value]) -> RowDecision,
}

/// 判定順。先に一致したものを採用する。
const POSITIONAL_DIALECTS: [PositionalDialect; 4] = [
    PositionalDialect {
        name: "header-remnant",
        matches: |row| {
            row.len() >= 2
                && cell_str(row, 1).is_some_and(|s| s.trim().to_lowercase() == "city")
        },
        decode: |_| RowDecision::Skip,
    },
    PositionalDialect {
        name: "ts-tagged",
        matches: |row| row.len() >= 6 && cell_str(row, 0).is_some_and(|s| s.trim().starts_with("TS")),
        decode: |row| {
            RowDecision::Row(LedgerRow {
                city: cell(row, 1).unwrap_or_default(),
                station: cell(row, 3).unwrap_or_default(),
                model: cell(row, 4).unwrap_or_default(),
                number: cell(row, 5).unwrap_or_default(),
                status: cell(row, 6).unwrap_or_default(),
            })
        },
    },
    PositionalDialect {
        name: "wide-fallback",
        matches: |row| row.len() >= 6,
        decode: |row| {
            RowDecision::Row(LedgerRow {
                city: cell(row, 1).or_else(|| cell(row, 0)).unwrap_or_default(),
                station: cell(row, 3).or_else(|| cell(row, 1)).unwrap_or_default(),
                model: cell(row, 4).or_else(|| cell(row, 2)).unwrap_or_default(),
                number: cell(row, 5).or_else(|| cell(row, 3)).unwrap_or_default(),
                status: cell(row, 6).unwrap_or_default(),
            })
        },
    },
    PositionalDialect {
        name: "narrow",
        matches: |_| true,
        decode: |row| {
            RowDecision::Row(LedgerRow {
                city: cell(row, 0).unwrap_or_default(),
                station: cell(row, 1).unwrap_or_default(),
                model: cell(row, 2).unwrap_or_default(),
                number: cell(row, 3).unwrap_or_default(),
                status: cell(row, 4).unwrap_or_default(),
            })
        },
    },
];

fn decode_positional(row: &[Value]) -> RowDecision {
    for dialect in &POSITIONAL_DIALECTS {
        if (dialect.matches)(row) {
            debug!(dialect = dialect.name, "台帳行の形式を判定");
            return (dialect.decode)(row);
        }
    }
    RowDecision::Skip
}

/// ヘッダ行から作る列位置マップ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    pub city: Option<usize>,
    pub station: Option<usize>,
    pub model: Option<usize>,
    pub number: Option<usize>,
    pub status: Option<usize>,
}

impl HeaderMap {
    /// 1行目がヘッダなら列位置マップを返す
    pub fn detect(first_row: &[Value]) -> Option<HeaderMap> {
        let lower: Vec<String> = first_row
            .iter()
            .map(|v| v.as_str().map(|s| s.trim().to_lowercase()).unwrap_or_default())
            .collect();

        let has_city = lower.iter().any(|c| c.contains("city"));
        let has_station = lower.iter().any(|c| c.contains("station"));
        if !(has_city && has_station) {
            return None;
        }

        let mut map = HeaderMap::default();
        for (i, col) in lower.iter().enumerate() {
            if col.contains("city") {
                map.city = Some(i);
            } else if col.contains("station") {
                map.station = Some(i);
            } else if col.contains("model") {
                map.model = Some(i);
            } else if col.contains("plate") || col.contains("number") {
                map.number = Some(i);
            } else if col.contains("status") {
                map.status = Some(i);
            }
        }
        Some(map)
    }

    fn read(&self, row: &[Value]) -> LedgerRow {
        LedgerRow {
            city: cell(row, self.city.unwrap_or(0)).unwrap_or_default(),
            station: cell(row, self.station.unwrap_or(1)).unwrap_or_default(),
            model: cell(row, self.model.unwrap_or(2)).unwrap_or_default(),
            number: cell(row, self.number.unwrap_or(3)).unwrap_or_default(),
            status: self
                .status
                .and_then(|i| cell(row, i))
                .unwrap_or_default(),
        }
    }
}

/// 台帳シートの行を市ごとに振り分ける
///
/// 初期同期は台帳が正本なので、点検状態（checked / last_inspected_at）は
/// すべてクリアする。
pub fn decode_ledger(rows: &[Value]) -> CityBuckets {
    let header = rows
        .first()
        .and_then(Value::as_array)
        .and_then(|first| HeaderMap::detect(first));
    let body = if header.is_some() { &rows[1..] } else { rows };

    let mut buckets = CityBuckets::new();
    for row in body {
        let mut record = match row {
            Value::Array(cells) => {
                let decision = match &header {
                    Some(map) => RowDecision::Row(map.read(cells)),
                    None => decode_positional(cells),
                };
                match decision {
                    RowDecision::Row(parsed) => parsed.into_record(),
                    RowDecision::Skip => continue,
                }
            }
            Value::Object(_) => normalize(row),
            _ => continue,
        };

        record.checked = false;
        record.last_inspected_at.clear();
        let city = record.city.clone();
        if !buckets.push(record) {
            debug!(city = %city, "未知の市のため行を破棄");
        }
    }
    buckets
}
