use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{StoreError, StoreResult};
use crate::store::schema::HistoricalStats;

const HISTORY_FILE: &str = "stats.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    /// Store rooted in the user's config directory.
    pub fn new() -> StoreResult<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| StoreError::Unavailable("no user config directory".to_string()))?
            .join("tapwise");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn history_path(&self) -> PathBuf {
        self.file_path(HISTORY_FILE)
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> StoreResult<Option<T>> {
        let path = self.file_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Whole-file rewrite through a temp file and rename, so a crash mid-write
    /// leaves the previous file intact.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> StoreResult<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// `Ok(None)` when no history has been written yet.
    pub fn load_history(&self) -> StoreResult<Option<HistoricalStats>> {
        self.load(HISTORY_FILE)
    }

    pub fn save_history(&self, data: &HistoricalStats) -> StoreResult<()> {
        self.save(HISTORY_FILE, data)
    }
}
