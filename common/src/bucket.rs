//! 市ごとの振り分けとUIインデックス付与

use crate::city::City;
use crate::types::Record;
use std::collections::BTreeMap;

/// 市ごとのレコード列（取り込み途中の一時領域）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityBuckets {
    buckets: BTreeMap<City, Vec<Record>>,
}

impl CityBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// レコードを市のバケットに追加する
    ///
    /// 市が既知でなければ捨てて `false` を返す。
    pub fn push(&mut self, record: Record) -> bool {
        match record.known_city() {
            Some(city) => {
                self.buckets.entry(city).or_default().push(record);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, city: City) -> &[Record] {
        self.buckets.get(&city).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, city: City) -> usize {
        self.get(city).len()
    }

    /// 全市合計の件数
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// 空でないバケットを市の表示順に取り出す
    pub fn into_non_empty(self) -> impl Iterator<Item = (City, Vec<Record>)> {
        let mut buckets = self.buckets;
        City::ALL
            .into_iter()
            .filter_map(move |city| buckets.remove(&city).map(|records| (city, records)))
            .filter(|(_, records)| !records.is_empty())
    }
}

/// UIインデックスを先頭から振り直す（例: Y1, Y2, ...）
///
/// 並びが変わらない限り何度適用しても同じ結果になる。
pub fn assign_ui_indices(city: City, records: &mut [Record]) {
    for (i, record) in records.iter_mut().enumerate() {
        let num = (i + 1) as u32;
        record.ui_index_num = num;
        record.ui_index = format!("{}{}", city.prefix(), num);
    }
}
