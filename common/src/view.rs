//! 市別一覧の表示モデルと行ごとの編集
//!
//! 行の背景色は優先順に決まる:
//! チェック済み → 停止 → 不要 → 7日ルール or 7日以内に点検 → 通常

use crate::city::City;
use crate::error::{Error, Result};
use crate::store::{CityStore, KvStore};
use crate::types::{Record, Status};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, SecondsFormat, Utc};

/// 行の表示区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTone {
    Done,
    Stop,
    Skip,
    /// 7日ルール・直近点検
    Recent,
    Default,
}

impl RowTone {
    pub fn css_class(self) -> &'static str {
        match self {
            RowTone::Done => "bg-pink",
            RowTone::Stop => "bg-gray",
            RowTone::Skip => "bg-yellow",
            RowTone::Recent => "bg-blue",
            RowTone::Default => "bg-green",
        }
    }
}

/// 最終点検が7日以内か（未来日時も含む）
pub fn within_seven_days(last_inspected_at: &str, now: DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(last_inspected_at.trim()) {
        Ok(t) => now.signed_duration_since(t.with_timezone(&Utc)) < Duration::days(7),
        Err(_) => false,
    }
}

pub fn classify(record: &Record, now: DateTime<Utc>) -> RowTone {
    if record.checked {
        RowTone::Done
    } else if record.status == Status::Stop {
        RowTone::Stop
    } else if record.status == Status::Skip {
        RowTone::Skip
    } else if record.status == Status::SevenDaysRule
        || within_seven_days(&record.last_inspected_at, now)
    {
        RowTone::Recent
    } else {
        RowTone::Default
    }
}

/// 日付欄の表示（`yyyy` と `mm/dd`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLabel {
    pub year: String,
    pub month_day: String,
}

pub fn date_label(last_inspected_at: &str, offset: FixedOffset) -> Option<DateLabel> {
    let t = DateTime::parse_from_rfc3339(last_inspected_at.trim()).ok()?;
    let local = t.with_timezone(&offset);
    Some(DateLabel {
        year: format!("{:04}", local.year()),
        month_day: format!("{:02}/{:02}", local.month(), local.day()),
    })
}

/// 日付入力をISO-8601（UTCの0時）にする
pub fn date_to_iso(date: NaiveDate) -> String {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

fn now_iso(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 一覧の1行
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub record: Record,
    pub tone: RowTone,
}

impl RowView {
    pub fn new(record: Record, now: DateTime<Utc>) -> Self {
        let tone = classify(&record, now);
        Self { record, tone }
    }
}

/// 1市分の一覧コントローラ
///
/// 編集はすべて `CityStore::persist` を通して即時保存する。
pub struct ListController<'a, S: KvStore> {
    store: &'a mut CityStore<S>,
    city: City,
}

impl<'a, S: KvStore> ListController<'a, S> {
    pub fn new(store: &'a mut CityStore<S>, city: City) -> Self {
        Self { store, city }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn rows(&self, now: DateTime<Utc>) -> Vec<RowView> {
        self.store
            .read_city(self.city)
            .into_iter()
            .map(|record| RowView::new(record, now))
            .collect()
    }

    /// 一覧上部のヒント
    pub fn hint(&self) -> String {
        let len = self.store.read_city(self.city).len();
        if len == 0 {
            "まだ同期されていません（インデックスの同期を押してください）".to_string()
        } else {
            format!("件数：{}", len)
        }
    }

    /// UIインデックス、なければナンバーで1件探す
    pub fn find(&self, key: &str) -> Result<Record> {
        let key = key.trim();
        let records = self.store.read_city(self.city);
        records
            .iter()
            .find(|r| !r.ui_index.is_empty() && r.ui_index.eq_ignore_ascii_case(key))
            .or_else(|| records.iter().find(|r| r.number == key))
            .cloned()
            .ok_or_else(|| Error::RecordNotFound(format!("{} {}", self.city, key)))
    }

    fn update(
        &mut self,
        key: &str,
        now: DateTime<Utc>,
        edit: impl FnOnce(&mut Record),
    ) -> Result<RowView> {
        let mut record = self.find(key)?;
        edit(&mut record);
        self.store.persist(self.city, &record)?;
        Ok(RowView::new(record, now))
    }

    /// チェックを付ける/外す（付けると点検日時を現在時刻に、外すと空に）
    pub fn set_checked(&mut self, key: &str, checked: bool, now: DateTime<Utc>) -> Result<RowView> {
        self.update(key, now, |record| {
            record.checked = checked;
            record.last_inspected_at = if checked { now_iso(now) } else { String::new() };
        })
    }

    pub fn set_status(&mut self, key: &str, status: Status, now: DateTime<Utc>) -> Result<RowView> {
        self.update(key, now, |record| record.status = status)
    }

    /// 最終点検日を手入力で変更する
    pub fn set_date(&mut self, key: &str, date: NaiveDate, now: DateTime<Utc>) -> Result<RowView> {
        self.update(key, now, |record| record.last_inspected_at = date_to_iso(date))
    }
}
