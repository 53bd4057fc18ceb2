//! 巡回対象の市区（固定の3市）
//!
//! 市ごとにUIインデックスの接頭辞（1文字）と保存キーを持つ。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 巡回対象の市
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "大和市")]
    Yamato,
    #[serde(rename = "海老名市")]
    Ebina,
    #[serde(rename = "調布市")]
    Chofu,
}

impl City {
    /// 表示順
    pub const ALL: [City; 3] = [City::Yamato, City::Ebina, City::Chofu];

    /// シート上の市名
    pub fn name(self) -> &'static str {
        match self {
            City::Yamato => "大和市",
            City::Ebina => "海老名市",
            City::Chofu => "調布市",
        }
    }

    /// ステータス表示用の短縮名
    pub fn short_label(self) -> &'static str {
        match self {
            City::Yamato => "大和",
            City::Ebina => "海老名",
            City::Chofu => "調布",
        }
    }

    /// UIインデックスの接頭辞
    pub fn prefix(self) -> char {
        match self {
            City::Yamato => 'Y',
            City::Ebina => 'E',
            City::Chofu => 'C',
        }
    }

    /// ローカル保存キー（例: `junkai:city:大和市`）
    pub fn storage_key(self, namespace: &str) -> String {
        format!("{}:city:{}", namespace, self.name())
    }

    /// シート上の市名から引く（完全一致のみ）
    pub fn from_name(name: &str) -> Option<City> {
        City::ALL.into_iter().find(|c| c.name() == name)
    }

    /// CLI引数などの緩い指定から引く
    ///
    /// 市名・短縮名・接頭辞（大文字小文字不問）を受け付ける。
    pub fn lookup(input: &str) -> Result<City> {
        let s = input.trim();
        City::ALL
            .into_iter()
            .find(|c| {
                c.name() == s
                    || c.short_label() == s
                    || s.chars().count() == 1 && s.eq_ignore_ascii_case(&c.prefix().to_string())
            })
            .ok_or_else(|| Error::UnknownCity(s.to_string()))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_exact() {
        assert_eq!(City::from_name("大和市"), Some(City::Yamato));
        assert_eq!(City::from_name("海老名市"), Some(City::Ebina));
        assert_eq!(City::from_name("調布市"), Some(City::Chofu));
        assert_eq!(City::from_name("大和"), None);
        assert_eq!(City::from_name(""), None);
    }

    #[test]
    fn test_lookup_accepts_aliases() {
        assert_eq!(City::lookup("海老名").unwrap(), City::Ebina);
        assert_eq!(City::lookup("c").unwrap(), City::Chofu);
        assert_eq!(City::lookup(" 大和市 ").unwrap(), City::Yamato);
        assert!(matches!(City::lookup("横浜市"), Err(Error::UnknownCity(_))));
    }

    #[test]
    fn test_storage_key() {
        assert_eq!(City::Yamato.storage_key("junkai"), "junkai:city:大和市");
    }

    #[test]
    fn test_serde_uses_sheet_name() {
        let json = serde_json::to_string(&City::Chofu).unwrap();
        assert_eq!(json, "\"調布市\"");
    }
}
