//! 件数集計（完了・停止・不要・総数・残り）

use crate::city::City;
use crate::store::{CityStore, KvStore};
use crate::types::{Record, Status};
use serde::Serialize;

/// 1市分（または全体）の件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub done: usize,
    pub stop: usize,
    pub skip: usize,
    pub total: usize,
}

impl Counts {
    /// レコード列から数える
    pub fn of(records: &[Record]) -> Self {
        let mut counts = Counts {
            total: records.len(),
            ..Default::default()
        };
        for record in records {
            match record.status {
                Status::Stop => counts.stop += 1,
                Status::Skip => counts.skip += 1,
                _ => {}
            }
            if record.checked || record.status.is_done() {
                counts.done += 1;
            }
        }
        counts
    }

    /// 残り = 総数 - 完了 - 不要
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.done).saturating_sub(self.skip)
    }

    fn add(&mut self, other: &Counts) {
        self.done += other.done;
        self.stop += other.stop;
        self.skip += other.skip;
        self.total += other.total;
    }
}

/// 全市の集計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub cities: Vec<(City, Counts)>,
    pub overall: Counts,
}

impl Summary {
    pub fn from_store<S: KvStore>(store: &CityStore<S>) -> Self {
        let mut summary = Summary::default();
        for city in City::ALL {
            let counts = Counts::of(&store.read_city(city));
            summary.overall.add(&counts);
            summary.cities.push((city, counts));
        }
        summary
    }

    pub fn city(&self, city: City) -> Counts {
        self.cities
            .iter()
            .find(|(c, _)| *c == city)
            .map(|(_, counts)| *counts)
            .unwrap_or_default()
    }

    /// 全体ヒント
    pub fn hint(&self) -> String {
        if self.overall.total > 0 {
            format!("総件数：{}", self.overall.total)
        } else {
            "まだ同期されていません".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn record(checked: bool, status: Status) -> Record {
        Record {
            city: "大和市".to_string(),
            checked,
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_basic() {
        let records = vec![
            record(true, Status::Normal),
            record(true, Status::Normal),
            record(false, Status::Stop),
            record(false, Status::Skip),
            record(false, Status::Normal),
        ];

        let counts = Counts::of(&records);
        assert_eq!(counts, Counts { done: 2, stop: 1, skip: 1, total: 5 });
        assert_eq!(counts.remaining(), 2);
    }

    #[test]
    fn test_done_status_counts_as_done() {
        let counts = Counts::of(&[record(false, Status::parse("done"))]);
        assert_eq!(counts.done, 1);
    }

    #[test]
    fn test_remaining_saturates() {
        let counts = Counts::of(&[record(true, Status::Skip)]);
        assert_eq!(counts.remaining(), 0);
    }

    #[test]
    fn test_summary_from_store() {
        let mut store = CityStore::new(MemoryStore::new());
        assert_eq!(Summary::from_store(&store).hint(), "まだ同期されていません");

        store
            .save_city(City::Yamato, &[record(true, Status::Normal), record(false, Status::Stop)])
            .unwrap();
        store.save_city(City::Chofu, &[record(false, Status::Skip)]).unwrap();

        let summary = Summary::from_store(&store);
        assert_eq!(summary.overall, Counts { done: 1, stop: 1, skip: 1, total: 3 });
        assert_eq!(summary.city(City::Ebina), Counts::default());
        assert_eq!(summary.city(City::Yamato).total, 2);
        assert_eq!(summary.hint(), "総件数：3");
    }
}
