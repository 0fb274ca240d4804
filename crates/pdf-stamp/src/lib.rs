mod batch;
mod config;
mod constants;
pub mod geometry;
pub mod overlay;
mod selector;
mod sign;
mod sign_log;
mod types;

pub use batch::{collect_documents, sign_batch};
pub use config::{StampConfig, StampOptions};
pub use constants::{LOG_FILE_NAME, SIGNED_DIR_NAME, in_to_pt, pt_to_in};
pub use selector::{PageFilter, PageSelector};
pub use sign::{default_output_path, page_dimensions, sign_pdf, stamp_document};
pub use sign_log::{LogEntry, SignatureLog};
pub use types::*;
