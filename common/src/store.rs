//! 市ごとのローカル保存
//!
//! 保存先はキー・値ストア（ブラウザのlocalStorage相当）を `KvStore` として
//! 注入する。1市＝1キーで、値はレコード配列のJSON。書き込みは常に
//! 配列全体の置き換え。

use crate::bucket::{assign_ui_indices, CityBuckets};
use crate::city::City;
use crate::error::Result;
use crate::normalizer::normalize;
use crate::types::Record;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// 既定の保存キー名前空間
pub const DEFAULT_NAMESPACE: &str = "junkai";

/// キー・値ストア
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// メモリ上のストア（テスト・一時利用）
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// 1件保存の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// 既存レコードを置き換えた（位置）
    Replaced(usize),
    /// 末尾に追加した
    Appended,
}

/// 取り込み結果の書き込み結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// 書き込んだ市と件数（市の表示順）
    Written(Vec<(City, usize)>),
    /// 全市0件のため何も書き込んでいない
    Empty,
}

/// 市ごとのレコード保存
#[derive(Debug)]
pub struct CityStore<S: KvStore> {
    kv: S,
    namespace: String,
}

impl<S: KvStore> CityStore<S> {
    pub fn new(kv: S) -> Self {
        Self::with_namespace(kv, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(kv: S, namespace: impl Into<String>) -> Self {
        Self {
            kv,
            namespace: namespace.into(),
        }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn into_inner(self) -> S {
        self.kv
    }

    fn key(&self, city: City) -> String {
        city.storage_key(&self.namespace)
    }

    /// 市のレコードを読む
    ///
    /// 未保存・壊れたJSON・配列以外はいずれも空として扱う。
    pub fn read_city(&self, city: City) -> Vec<Record> {
        let raw = match self.kv.get(&self.key(city)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(city = %city, error = %e, "ローカル保存の読み込みに失敗");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items.iter().map(normalize).collect(),
            Ok(_) => {
                warn!(city = %city, "ローカル保存が配列ではありません");
                Vec::new()
            }
            Err(e) => {
                warn!(city = %city, error = %e, "ローカル保存のJSONが壊れています");
                Vec::new()
            }
        }
    }

    /// 市のレコードを丸ごと書き込む
    pub fn save_city(&mut self, city: City, records: &[Record]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        let key = self.key(city);
        self.kv.set(&key, &json)
    }

    /// 市の保存を削除する
    pub fn remove_city(&mut self, city: City) -> Result<()> {
        let key = self.key(city);
        self.kv.remove(&key)
    }

    /// 全市の保存を削除する（初期同期前のリセット）
    pub fn reset_all(&mut self) -> Result<()> {
        for city in City::ALL {
            self.remove_city(city)?;
        }
        Ok(())
    }

    /// 全市のレコードを表示順に連結する（送信用）
    pub fn all_records(&self) -> Vec<Record> {
        City::ALL
            .into_iter()
            .flat_map(|city| self.read_city(city))
            .collect()
    }

    /// 1件を保存する
    ///
    /// ui_index が一致する既存レコード、なければ number が一致する既存レコードを
    /// その位置で置き換える。どちらもなければ末尾に追加する。
    /// ui_index_num の振り直しはしない。
    pub fn persist(&mut self, city: City, record: &Record) -> Result<PersistOutcome> {
        let mut records = self.read_city(city);

        let by_ui_index = if record.ui_index.is_empty() {
            None
        } else {
            records.iter().position(|r| r.ui_index == record.ui_index)
        };
        let position = by_ui_index.or_else(|| records.iter().position(|r| r.number == record.number));

        let outcome = match position {
            Some(i) => {
                records[i] = record.clone();
                PersistOutcome::Replaced(i)
            }
            None => {
                records.push(record.clone());
                PersistOutcome::Appended
            }
        };

        self.save_city(city, &records)?;
        Ok(outcome)
    }

    /// 取り込んだバケットを書き込む
    ///
    /// 1件以上ある市だけUIインデックスを振り直して丸ごと置き換える。
    /// 全市0件なら既存データには触れない。
    pub fn commit_pull(&mut self, buckets: CityBuckets) -> Result<CommitOutcome> {
        if buckets.is_empty() {
            return Ok(CommitOutcome::Empty);
        }

        let mut written = Vec::new();
        for (city, mut records) in buckets.into_non_empty() {
            assign_ui_indices(city, &mut records);
            self.save_city(city, &records)?;
            written.push((city, records.len()));
        }
        Ok(CommitOutcome::Written(written))
    }
}
