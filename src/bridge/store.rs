use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FormscoutError, Result};
use crate::form::form_model::FormGroups;
use crate::record::record_model::ClickRecord;

/// Persisted state, one JSON object with fixed keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreData {
    pub form_elements: FormGroups,
    pub total_elements: usize,
    pub custom_script: String,
    pub click_records: Vec<ClickRecord>,
}

/// JSON-file key-value store for the latest snapshot, the user's custom
/// script and recorded clicks. Changes are kept in memory until
/// [`save`](SnapshotStore::save).
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    data: StoreData,
}

impl SnapshotStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "store file missing; starting empty");
            return Ok(Self {
                path,
                data: StoreData::default(),
            });
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| FormscoutError::io(format!("reading store {}", path.display()), e))?;
        let data = serde_json::from_str(&content)
            .map_err(|e| FormscoutError::json(format!("parsing store {}", path.display()), e))?;

        Ok(Self { path, data })
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| FormscoutError::json("serializing store", e))?;
        std::fs::write(&self.path, json)
            .map_err(|e| FormscoutError::io(format!("writing store {}", self.path.display()), e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    /// Replace the snapshot wholesale.
    pub fn set_snapshot(&mut self, groups: FormGroups) {
        self.data.total_elements = groups.total_elements();
        self.data.form_elements = groups;
    }

    pub fn snapshot(&self) -> &FormGroups {
        &self.data.form_elements
    }

    pub fn total_elements(&self) -> usize {
        self.data.total_elements
    }

    pub fn set_custom_script(&mut self, script: impl Into<String>) {
        self.data.custom_script = script.into();
    }

    pub fn custom_script(&self) -> &str {
        &self.data.custom_script
    }

    pub fn append_records(&mut self, records: impl IntoIterator<Item = ClickRecord>) {
        self.data.click_records.extend(records);
    }

    pub fn click_records(&self) -> &[ClickRecord] {
        &self.data.click_records
    }

    /// Drop the snapshot and every record made on `origin`.
    pub fn clear_origin(&mut self, origin: &str) {
        self.data.form_elements = FormGroups::default();
        self.data.total_elements = 0;
        self.data.click_records.retain(|r| !r.url.starts_with(origin));
    }
}
