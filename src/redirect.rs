//! 点検アプリへの遷移URL

use crate::error::{Result, SyncError};
use junkai_common::Record;
use reqwest::Url;

/// `<tire_app_url>?station=..&model=..&plate_full=..`
pub fn inspection_url(tire_app_url: &str, record: &Record) -> Result<String> {
    let url = Url::parse_with_params(
        tire_app_url,
        &[
            ("station", record.station.as_str()),
            ("model", record.model.as_str()),
            ("plate_full", record.number.as_str()),
        ],
    )
    .map_err(|e| SyncError::Config(format!("点検アプリURLが不正です: {}", e)))?;
    Ok(url.to_string())
}
