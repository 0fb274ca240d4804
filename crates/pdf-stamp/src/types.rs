use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StampError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Page merge failed: {0}")]
    Merge(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, StampError>;

/// Corner of the page the signature is anchored to.
///
/// Margins are measured from the two edges that meet at the chosen corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StampPosition {
    BottomRight,
    #[default]
    BottomLeft,
    TopRight,
    TopLeft,
}

impl StampPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            StampPosition::BottomRight => "bottom-right",
            StampPosition::BottomLeft => "bottom-left",
            StampPosition::TopRight => "top-right",
            StampPosition::TopLeft => "top-left",
        }
    }
}

/// Outcome of signing a single document.
///
/// Created once the document finishes processing and never mutated afterwards.
/// `pages_signed == 0` means the page filter matched nothing; it is not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub success: bool,
    pub total_pages: usize,
    pub pages_signed: usize,
    /// Human-readable cause on failure, or a list of per-page merge
    /// errors when the document was still written.
    pub error: Option<String>,
}

/// Aggregate outcome of one batch run over a directory tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub total_documents: usize,
    pub successful: usize,
    pub failed: usize,
    /// Per-file results in processing order.
    pub files: Vec<SignResult>,
    /// Location of the merged signing log.
    pub log_path: PathBuf,
    /// Set when the final log write failed; already-written documents
    /// remain valid.
    pub log_error: Option<String>,
}
