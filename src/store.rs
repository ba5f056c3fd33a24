//! Whole-document JSON persistence.
//!
//! The CRM keeps every user, lead and attendance record in one JSON file.
//! Reads load a fresh snapshot; writes replace the file. Mutations go
//! through [`JsonStore::update`], which holds a single async mutex across
//! the load-modify-save cycle so concurrent requests cannot overwrite each
//! other's changes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::{CrmError, StoreError};
use crate::models::attendance_model::AttendanceRecord;
use crate::models::lead_model::Lead;
use crate::models::user_model::User;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current document. A missing or unreadable file yields an
    /// empty document.
    pub async fn load(&self) -> Document {
        match self.try_load().await {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!(
                    "Error reading {}: {}; starting from an empty document",
                    self.path.display(),
                    e
                );
                Document::default()
            }
        }
    }

    pub async fn try_load(&self) -> Result<Document, StoreError> {
        let bytes = fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Replace the file with `doc`. Writes a sibling temp file first and
    /// renames it over the target.
    pub async fn save(&self, doc: &Document) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_vec_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Run one read-modify-write cycle while holding the write lock.
    ///
    /// Only a missing file starts from an empty document; a file that
    /// exists but cannot be read or parsed fails with `Storage` and is left
    /// untouched. If `f` fails nothing is written. A failed save is logged
    /// and otherwise ignored; the caller still gets `f`'s result.
    pub async fn update<T, F>(&self, f: F) -> Result<T, CrmError>
    where
        F: FnOnce(&mut Document) -> Result<T, CrmError>,
    {
        let _guard = self.write_lock.lock().await;

        let mut doc = match self.try_load().await {
            Ok(doc) => doc,
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => Document::default(),
            Err(e) => return Err(CrmError::Storage(e)),
        };
        let out = f(&mut doc)?;

        if let Err(e) = self.save(&doc).await {
            log::error!("Error writing {}: {}", self.path.display(), e);
        }

        Ok(out)
    }
}
