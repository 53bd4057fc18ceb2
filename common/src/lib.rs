//! Junkai Common Library
//!
//! 巡回チェックリスト同期の中核（通信・UIに依存しない部分）:
//! レコード正規化、市別ローカル保存、取り込み、集計、一覧の編集。

pub mod bucket;
pub mod city;
pub mod error;
pub mod normalizer;
pub mod store;
pub mod summary;
pub mod sync;
pub mod types;
pub mod view;

pub use bucket::{assign_ui_indices, CityBuckets};
pub use city::City;
pub use error::{Error, Result};
pub use normalizer::{decode_ledger, decode_log, normalize, parse_checked_at};
pub use store::{CityStore, CommitOutcome, KvStore, MemoryStore, PersistOutcome, DEFAULT_NAMESPACE};
pub use summary::{Counts, Summary};
pub use sync::{decode_sheet, extract_rows, SheetKind, LEDGER_SHEET, LOG_SHEET};
pub use types::{Record, Status};
pub use view::{classify, date_label, ListController, RowTone, RowView};
