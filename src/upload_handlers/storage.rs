use std::io::Write;
use std::path::{Path, PathBuf};

use actix_web::web::{self, Bytes};
use chrono::Utc;
use tempfile::NamedTempFile;

use crate::error::CrmError;

/// URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads/";

/// Flat directory of uploaded visiting cards.
#[derive(Debug, Clone)]
pub struct UploadStore {
    base_path: PathBuf,
}

/// A file being received. Bytes land in a temp file inside the upload
/// directory and only appear under their final name on [`PendingUpload::persist`].
pub struct PendingUpload {
    temp: NamedTempFile,
    file_name: String,
}

impl UploadStore {
    pub fn new(base_path: PathBuf) -> Result<Self, CrmError> {
        std::fs::create_dir_all(&base_path).map_err(|e| {
            CrmError::Internal(format!(
                "Failed to create upload directory '{}': {}",
                base_path.display(),
                e
            ))
        })?;
        log::info!("Upload store at {}", base_path.display());
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn begin(&self, original_name: &str) -> Result<PendingUpload, CrmError> {
        let temp = NamedTempFile::new_in(&self.base_path)
            .map_err(|e| CrmError::Internal(format!("Failed to create temp file: {}", e)))?;
        let file_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        );
        Ok(PendingUpload { temp, file_name })
    }

    /// Remove a previously persisted file given its public URL. Missing
    /// files are ignored.
    pub fn discard(&self, public_url: &str) {
        if let Some(path) = public_url
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|name| self.resolve(name))
        {
            if let Err(e) = std::fs::remove_file(&path) {
                log::warn!("Failed to remove upload {}: {}", path.display(), e);
            }
        }
    }

    /// Path of a stored file, or `None` if `name` could escape the directory.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return None;
        }
        Some(self.base_path.join(name))
    }
}

impl PendingUpload {
    /// Append `data` on the blocking thread pool. On error the upload is
    /// dropped and its temp file removed.
    pub async fn write_chunk(mut self, data: Bytes) -> Result<Self, CrmError> {
        web::block(move || self.temp.write_all(&data).map(|_| self))
            .await
            .map_err(|e| CrmError::Internal(format!("Upload writer failed: {}", e)))?
            .map_err(|e| CrmError::Internal(format!("Failed to write upload: {}", e)))
    }

    /// Move the file to its final name and return its public URL.
    pub fn persist(self, store: &UploadStore) -> Result<String, CrmError> {
        let target = store.base_path.join(&self.file_name);
        self.temp
            .persist(&target)
            .map_err(|e| CrmError::Internal(format!("Failed to store upload: {}", e)))?;
        log::debug!("Stored upload {}", target.display());
        Ok(format!("{}{}", PUBLIC_PREFIX, self.file_name))
    }
}

/// Keep only characters that are safe in a single path component.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').replace("..", "_");
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Content type for a served file, by extension.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
