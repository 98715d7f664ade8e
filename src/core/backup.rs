//! Whole-dashboard export and import

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::document::Document;
use super::store::Theme;

/// Suggested name for exported files
pub const DEFAULT_FILE_NAME: &str = "widget-dashboard-backup.json";

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("could not read backup: {0}")]
    Io(#[from] std::io::Error),
    #[error("backup is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid backup: {0}")]
    Invalid(&'static str),
}

/// Contents of an export file
#[derive(Debug, Clone, PartialEq)]
pub struct Backup {
    pub data: Document,
    pub theme: Theme,
}

#[derive(Serialize)]
struct BackupRef<'a> {
    data: &'a Document,
    theme: Theme,
}

/// Serialize the document and theme as `{ data, theme }`
pub fn export_all(document: &Document, theme: Theme) -> Result<String> {
    serde_json::to_string_pretty(&BackupRef {
        data: document,
        theme,
    })
    .context("Failed to serialize backup")
}

pub fn export_to_file(path: &Path, document: &Document, theme: Theme) -> Result<()> {
    let json = export_all(document, theme)?;
    fs::write(path, json).with_context(|| format!("Failed to write backup: {}", path.display()))?;
    tracing::info!("Exported dashboard to {}", path.display());
    Ok(())
}

/// Parse an export file; nothing is applied here
pub fn import_all(json: &str) -> Result<Backup, BackupError> {
    let mut root: Value = serde_json::from_str(json)?;
    let data = root
        .get_mut("data")
        .map(Value::take)
        .ok_or(BackupError::Invalid("missing data"))?;
    match data.get("pages") {
        Some(Value::Array(pages)) if !pages.is_empty() => {}
        Some(Value::Array(_)) => return Err(BackupError::Invalid("no pages")),
        _ => return Err(BackupError::Invalid("missing data.pages")),
    }
    let data = Document::from_value(data).ok_or(BackupError::Invalid("unreadable pages"))?;
    let theme = root
        .get("theme")
        .and_then(Value::as_str)
        .and_then(Theme::from_name)
        .unwrap_or_default();
    Ok(Backup { data, theme })
}

pub fn import_from_file(path: &Path) -> Result<Backup, BackupError> {
    let json = fs::read_to_string(path)?;
    let backup = import_all(&json)?;
    tracing::info!("Read backup from {}", path.display());
    Ok(backup)
}
