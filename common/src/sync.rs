//! 取り込みの純粋部分（レスポンス→行→市別バケット）
//!
//! 通信と保存は呼び出し側が担う。

use crate::bucket::CityBuckets;
use crate::normalizer::{decode_ledger, decode_log};
use chrono::FixedOffset;
use serde_json::Value;

/// 全体管理（台帳）シート名
pub const LEDGER_SHEET: &str = "全体管理";
/// 点検ログシート名
pub const LOG_SHEET: &str = "InspectionLog";

/// シートの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    /// 台帳（形状判定あり）
    Ledger,
    /// 点検ログ（7列固定）
    Log,
}

impl SheetKind {
    /// シート名から形式を決める（ログ以外はすべて台帳扱い）
    pub fn of(sheet: &str) -> Self {
        if sheet == LOG_SHEET {
            SheetKind::Log
        } else {
            SheetKind::Ledger
        }
    }
}

/// レスポンスから行配列を取り出す
///
/// `data` → `values` → レスポンス自体が配列の配列、の順に探す。
pub fn extract_rows(json: &Value) -> &[Value] {
    let field = |key: &str| json.get(key).and_then(Value::as_array).map(Vec::as_slice);
    let rows = field("data").or_else(|| field("values")).unwrap_or(&[]);
    if !rows.is_empty() {
        return rows;
    }

    match json.as_array() {
        Some(items) if items.first().is_some_and(Value::is_array) => items.as_slice(),
        _ => rows,
    }
}

/// 行配列を形式に応じて市別に振り分ける
pub fn decode_sheet(kind: SheetKind, rows: &[Value], offset: FixedOffset) -> CityBuckets {
    match kind {
        SheetKind::Ledger => decode_ledger(rows),
        SheetKind::Log => decode_log(rows, offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::City;
    use serde_json::json;

    #[test]
    fn test_sheet_kind() {
        assert_eq!(SheetKind::of("InspectionLog"), SheetKind::Log);
        assert_eq!(SheetKind::of("全体管理"), SheetKind::Ledger);
        assert_eq!(SheetKind::of("other"), SheetKind::Ledger);
    }

    #[test]
    fn test_extract_rows_prefers_data() {
        let json = json!({"data": [[1]], "values": [[2], [3]]});
        assert_eq!(extract_rows(&json).len(), 1);

        let json = json!({"values": [[2], [3]]});
        assert_eq!(extract_rows(&json).len(), 2);
    }

    #[test]
    fn test_extract_rows_bare_array() {
        let json = json!([["大和市", "S"], ["海老名市", "S"]]);
        assert_eq!(extract_rows(&json).len(), 2);

        let json = json!([{"city": "大和市"}]);
        assert!(extract_rows(&json).is_empty());

        let json = json!({"ok": false});
        assert!(extract_rows(&json).is_empty());
    }

    #[test]
    fn test_decode_sheet_routes_by_kind() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let rows = json!([["大和市", "S", "M", "N", "Y4", "stopped", ""]]);
        let rows = rows.as_array().unwrap();

        let log = decode_sheet(SheetKind::Log, rows, utc);
        assert_eq!(log.get(City::Yamato)[0].ui_index, "Y4");

        // 台帳として読むと6列以上の位置ずれ判定になる
        let ledger = decode_sheet(SheetKind::Ledger, rows, utc);
        assert!(ledger.is_empty());
    }
}
