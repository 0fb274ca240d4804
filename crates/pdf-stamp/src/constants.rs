//! Shared constants for signature stamping
//!
//! This module centralizes unit conversions, default page dimensions and
//! the validation bounds enforced at configuration time.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per inch (PDF user space unit)
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert inches to points
#[inline]
pub fn in_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

/// Convert points to inches
#[inline]
pub fn pt_to_in(pt: f32) -> f32 {
    pt / POINTS_PER_INCH
}

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Configuration Bounds
// =============================================================================

/// Minimum signature width as a fraction of page width
pub const MIN_SCALE: f32 = 0.1;

/// Maximum signature width as a fraction of page width
pub const MAX_SCALE: f32 = 1.0;

/// Minimum margin from the page edge in inches
pub const MIN_MARGIN_IN: f32 = 0.1;

/// Maximum margin from the page edge in inches
pub const MAX_MARGIN_IN: f32 = 2.0;

/// Minimum overlay opacity
pub const MIN_OPACITY: f32 = 0.1;

/// Maximum overlay opacity
pub const MAX_OPACITY: f32 = 1.0;

/// Maximum rotation angle in degrees
pub const MAX_ROTATION_DEG: f32 = 360.0;

// =============================================================================
// Files
// =============================================================================

/// Name of the persisted signing log at the batch output root
pub const LOG_FILE_NAME: &str = "signature_log.json";

/// Document extension matched during batch discovery (case-insensitive)
pub const PDF_EXTENSION: &str = "pdf";

/// Suffix appended to the input stem for single-file default output paths
pub const SIGNED_SUFFIX: &str = "_signed";

/// Default batch output subdirectory under the input directory
pub const SIGNED_DIR_NAME: &str = "signed";
