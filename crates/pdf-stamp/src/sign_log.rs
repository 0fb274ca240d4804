//! Persisted signing log
//!
//! A batch appends one entry per successfully signed document to a JSON
//! log at the output root. The existing log is loaded and extended, never
//! rewritten entry-by-entry; a corrupt log is discarded with a warning and
//! a fresh one started in its place.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::StampConfig;
use crate::constants::pt_to_in;
use crate::types::{Result, SignResult, StampPosition};

/// One record of a successfully signed document, including the full
/// configuration snapshot it was signed with. Margins are recorded in
/// inches, matching the caller-facing units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub signature: PathBuf,
    pub pages_filter: String,
    pub position: StampPosition,
    pub scale: f32,
    pub x_offset: f32,
    pub y_offset: f32,
    pub opacity: f32,
    pub rotation: f32,
    pub total_pages: usize,
    pub pages_signed: usize,
    pub success: bool,
}

impl LogEntry {
    /// Build an entry for a successful result, stamped with the current
    /// local time.
    pub fn new(config: &StampConfig, result: &SignResult) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339(),
            input_path: result.input_path.clone(),
            output_path: result.output_path.clone(),
            signature: config.signature_path().to_owned(),
            pages_filter: config.pages_expr().to_string(),
            position: config.position(),
            scale: config.scale(),
            x_offset: pt_to_in(config.x_offset_pt()),
            y_offset: pt_to_in(config.y_offset_pt()),
            opacity: config.opacity(),
            rotation: config.rotation_degrees(),
            total_pages: result.total_pages,
            pages_signed: result.pages_signed,
            success: true,
        }
    }
}

/// On-disk log shape: `{"signed_files": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignatureLog {
    pub signed_files: Vec<LogEntry>,
}

impl SignatureLog {
    /// Load the log at `path`, treating a missing or unparseable file as
    /// an empty log.
    pub async fn load_or_default(path: &Path) -> Self {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(_) => return Self::default(),
        };
        match serde_json::from_slice(&bytes) {
            Ok(log) => log,
            Err(e) => {
                log::warn!(
                    "Existing log {} is not parseable ({}); starting fresh",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Write the log as pretty-printed JSON.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

/// Merge new entries into the log at `path`: load what is there, append,
/// write once. Entries recorded by earlier runs are preserved.
pub async fn append_entries(path: &Path, entries: Vec<LogEntry>) -> Result<()> {
    let mut log = SignatureLog::load_or_default(path).await;
    log.signed_files.extend(entries);
    log.save(path).await
}
