//! レコードの型定義
//!
//! - Status: 点検状態（内部語彙 normal / stop / skip / 7days_rule）
//! - Record: ローカル保存・送信に使う正規形

use crate::city::City;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 点検状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// 通常
    #[default]
    Normal,
    /// 停止
    Stop,
    /// 不要
    Skip,
    /// 7日ルール
    SevenDaysRule,
    /// 台帳側の未知の値（そのまま保持）
    Other(String),
}

impl Status {
    /// 一覧のセレクタで選べる状態
    pub const SELECTABLE: [Status; 3] = [Status::Normal, Status::Stop, Status::Skip];

    /// シートや保存値の文字列から変換（空は normal）
    pub fn parse(s: &str) -> Status {
        match s.trim() {
            "" | "normal" => Status::Normal,
            "stop" => Status::Stop,
            "skip" => Status::Skip,
            "7days_rule" | "7 day rule" => Status::SevenDaysRule,
            other => Status::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Normal => "normal",
            Status::Stop => "stop",
            Status::Skip => "skip",
            Status::SevenDaysRule => "7days_rule",
            Status::Other(s) => s.as_str(),
        }
    }

    /// 画面表示用ラベル
    pub fn label(&self) -> &str {
        match self {
            Status::Normal => "通常",
            Status::Stop => "停止",
            Status::Skip => "不要",
            Status::SevenDaysRule => "7日ルール",
            Status::Other(s) => s.as_str(),
        }
    }

    /// 台帳の `done` はチェック済みと同じ扱い
    pub fn is_done(&self) -> bool {
        matches!(self, Status::Other(s) if s == "done")
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CLIからの指定は既知の語彙のみ受け付ける
impl std::str::FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match Status::parse(s) {
            Status::Other(_) => match s.trim() {
                "通常" => Ok(Status::Normal),
                "停止" => Ok(Status::Stop),
                "不要" => Ok(Status::Skip),
                other => Err(Error::InvalidStatus(other.to_string())),
            },
            status => Ok(status),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Status::parse(&s))
    }
}

/// 巡回レコード（正規形）
///
/// `ui_index` / `ui_index_num` は同期時に市ごとに振り直す表示用の番号で、
/// リモート側の正本には含まれない。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub city: String,
    pub station: String,
    pub model: String,
    /// ナンバー（プレート）
    pub number: String,
    pub status: Status,
    pub checked: bool,
    /// 旧来の並び順ヒント
    pub index: u32,
    /// 最終点検日時（ISO-8601、未点検は空）
    pub last_inspected_at: String,
    pub ui_index: String,
    pub ui_index_num: u32,
}

impl Record {
    /// 前後の空白を除去した正規形を返す
    pub fn normalized(mut self) -> Self {
        trim_in_place(&mut self.city);
        trim_in_place(&mut self.station);
        trim_in_place(&mut self.model);
        trim_in_place(&mut self.number);
        trim_in_place(&mut self.last_inspected_at);
        if let Status::Other(s) = &self.status {
            self.status = Status::parse(s);
        }
        self
    }

    /// 所属する市（未知の市なら None）
    pub fn known_city(&self) -> Option<City> {
        City::from_name(self.city.trim())
    }
}

fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
}
