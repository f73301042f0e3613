//! References to borrower documents attached to the form.
//!
//! A [`FileRef`] records where a document lives on disk plus the metadata the
//! storage upload needs. The bytes are only read when the application is
//! submitted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upload limit per document (10 MB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Extensions accepted for ordinary deal documents.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx"];

/// Extensions accepted for the land multi-parcel spreadsheet.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["csv", "xls", "xlsx"];

pub const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum FileRefError {
    #[error("cannot read '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{0}' has no file name")]
    MissingName(PathBuf),

    #[error("file too large: '{name}' is {size} bytes, maximum is {max} bytes")]
    TooLarge { name: String, size: u64, max: u64 },

    #[error("unsupported file type '{name}'; accepted: {accepted}")]
    UnsupportedType { name: String, accepted: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub path: PathBuf,
}

impl FileRef {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        path: impl Into<PathBuf>,
    ) -> Self {
        let name = name.into();
        let mime_type = mime_for_name(&name).to_string();
        Self {
            name,
            mime_type,
            size,
            path: path.into(),
        }
    }

    /// Builds a reference to a file on disk, enforcing the size limit and the
    /// accepted extension list.
    pub fn from_path(
        path: &Path,
        accepted: &[&str],
    ) -> Result<Self, FileRefError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| FileRefError::MissingName(path.to_path_buf()))?;

        let metadata = std::fs::metadata(path).map_err(|source| FileRefError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        check_extension(&name, accepted)?;

        if metadata.len() > MAX_FILE_SIZE {
            return Err(FileRefError::TooLarge {
                name,
                size: metadata.len(),
                max: MAX_FILE_SIZE,
            });
        }

        Ok(Self::new(name, metadata.len(), path))
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn check_extension(
    name: &str,
    accepted: &[&str],
) -> Result<(), FileRefError> {
    match extension_of(name) {
        Some(ext) if accepted.contains(&ext.as_str()) => Ok(()),
        _ => Err(FileRefError::UnsupportedType {
            name: name.to_string(),
            accepted: accepted
                .iter()
                .map(|ext| format!(".{ext}"))
                .collect::<Vec<_>>()
                .join(","),
        }),
    }
}

/// MIME type sent as the upload's `Content-Type`.
pub fn mime_for_name(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("csv") => "text/csv",
        _ => OCTET_STREAM,
    }
}

/// Accepted extensions for a file field.
pub fn accepted_extensions(field: &str) -> &'static [&'static str] {
    match field {
        "multiParcelSpreadsheet" => SPREADSHEET_EXTENSIONS,
        _ => DOCUMENT_EXTENSIONS,
    }
}
