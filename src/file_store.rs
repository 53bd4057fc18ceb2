//! ファイルに保存するキー・値ストア
//!
//! ブラウザのlocalStorage相当。1つのJSONファイルにキーごとの文字列を持ち、
//! 書き込みのたびに一時ファイル経由で丸ごと置き換える。

use junkai_common::{KvStore, Result as StoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// ファイルの中身
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    /// バージョン（互換性チェック用）
    version: u32,
    entries: BTreeMap<String, String>,
}

impl StoreFile {
    const CURRENT_VERSION: u32 = 1;
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    file: StoreFile,
}

impl FileStore {
    /// 開く（なければ空、壊れていれば空から始める）
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = Self::read(&path).unwrap_or_default();
        Self { path, file }
    }

    fn read(path: &Path) -> Option<StoreFile> {
        if !path.exists() {
            return None;
        }
        let reader = BufReader::new(File::open(path).ok()?);
        match serde_json::from_reader::<_, StoreFile>(reader) {
            Ok(file) if file.version == StoreFile::CURRENT_VERSION => Some(file),
            Ok(file) => {
                warn!(version = file.version, "保存ファイルのバージョン不一致、空から始めます");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "保存ファイルが壊れています、空から始めます");
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.file.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.entries.is_empty()
    }

    fn flush(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer(&mut writer, &self.file)?;
            writer.flush()?;
        }
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.file.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.file.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        if self.file.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
