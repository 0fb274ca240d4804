//! Batch signing across a directory tree
//!
//! Discovery is a pure step producing ordered `(relative, absolute)` path
//! pairs; the relative part is mirrored under the output root so the input
//! tree's structure is preserved. Each document is signed independently —
//! one failure never stops the rest — and log entries for the successes
//! are collected in memory and merged into the persisted log in a single
//! write at the end of the batch.

use std::path::{Path, PathBuf};

use crate::config::StampConfig;
use crate::constants::{LOG_FILE_NAME, PDF_EXTENSION};
use crate::sign::sign_pdf;
use crate::sign_log::{self, LogEntry};
use crate::types::{BatchResult, Result, StampError};

/// Sign every matching document under `input_dir`, mirroring the tree
/// under `output_dir`.
///
/// Fails early only when `input_dir` is not a readable directory;
/// per-document failures are captured in the returned [`BatchResult`]. A
/// failed final log write is reported in `log_error` without invalidating
/// the documents already written.
pub async fn sign_batch(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &StampConfig,
) -> Result<BatchResult> {
    let input_dir = input_dir.as_ref().to_owned();
    let output_dir = output_dir.as_ref().to_owned();

    if !input_dir.is_dir() {
        return Err(StampError::Config(format!(
            "Input directory not found: {}",
            input_dir.display()
        )));
    }

    tokio::fs::create_dir_all(&output_dir).await?;

    let documents = {
        let input_dir = input_dir.clone();
        tokio::task::spawn_blocking(move || collect_documents(&input_dir)).await??
    };

    let mut files = Vec::with_capacity(documents.len());
    let mut successful = 0;
    let mut failed = 0;
    let mut entries = Vec::new();

    for (relative, absolute) in documents {
        let output_path = output_dir.join(&relative);
        log::info!("Signing {}", absolute.display());

        let result = sign_pdf(&absolute, &output_path, config).await;
        if result.success {
            successful += 1;
            entries.push(LogEntry::new(config, &result));
        } else {
            failed += 1;
            log::warn!(
                "Failed to sign {}: {}",
                absolute.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
        files.push(result);
    }

    let log_path = output_dir.join(LOG_FILE_NAME);
    let log_error = match sign_log::append_entries(&log_path, entries).await {
        Ok(()) => None,
        Err(e) => {
            log::warn!("Failed to write signing log: {}", e);
            Some(e.to_string())
        }
    };

    Ok(BatchResult {
        total_documents: files.len(),
        successful,
        failed,
        files,
        log_path,
        log_error,
    })
}

/// Recursively enumerate documents under `input_dir`.
///
/// Returns `(relative, absolute)` pairs for every file whose extension
/// case-insensitively matches the document type, sorted by name within
/// each directory so batch order is deterministic.
pub fn collect_documents(input_dir: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut found = Vec::new();
    walk(input_dir, Path::new(""), &mut found)?;
    Ok(found)
}

fn walk(dir: &Path, relative: &Path, found: &mut Vec<(PathBuf, PathBuf)>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let rel = relative.join(entry.file_name());
        if path.is_dir() {
            walk(&path, &rel, found)?;
        } else if is_document(&path) {
            found.push((rel, path));
        }
    }
    Ok(())
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
}
