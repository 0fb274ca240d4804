//! Stamping configuration
//!
//! `StampOptions` is the caller-facing bundle of knobs; `StampConfig` is
//! the validated, immutable form the engine runs with. Every bound is
//! checked and the signature image decoded at construction time, so a bad
//! configuration fails before any document is touched.

use image::{ImageFormat, ImageReader, RgbaImage};
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::selector::PageFilter;
use crate::types::{Result, StampError, StampPosition};

/// Caller-facing stamping options.
///
/// Field ranges are validated by [`StampConfig::from_options`]:
/// scale 0.1-1.0 (fraction of page width), margins 0.1-2.0 inches,
/// opacity 0.1-1.0, rotation 0-360 degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct StampOptions {
    /// Path to the signature image (PNG with transparency)
    pub signature_path: PathBuf,
    /// Corner the signature is anchored to
    pub position: StampPosition,
    /// Signature width as a fraction of the page width
    pub scale: f32,
    /// Horizontal margin from the page edge in inches
    pub x_offset_in: f32,
    /// Vertical margin from the page edge in inches
    pub y_offset_in: f32,
    /// Overlay opacity (1.0 is opaque)
    pub opacity: f32,
    /// Rotation around the overlay center in degrees, counter-clockwise
    pub rotation_degrees: f32,
    /// Page expression: all, first, last, odd, even, or ranges like "1-5,10"
    pub pages: String,
    /// Pages to skip after the page filter, ranges like "2,5-7" (empty: none)
    pub skip_pages: String,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            signature_path: PathBuf::new(),
            position: StampPosition::default(),
            scale: 0.3,
            x_offset_in: 0.5,
            y_offset_in: 0.5,
            opacity: 1.0,
            rotation_degrees: 0.0,
            pages: "all".to_string(),
            skip_pages: String::new(),
        }
    }
}

/// Validated, immutable stamping configuration.
///
/// Constructed once per run. Margins are stored in points; the signature
/// image is decoded to RGBA up front so its alpha channel is available to
/// the compositor.
#[derive(Debug, Clone)]
pub struct StampConfig {
    signature_path: PathBuf,
    image: RgbaImage,
    position: StampPosition,
    scale: f32,
    x_offset_pt: f32,
    y_offset_pt: f32,
    opacity: f32,
    rotation_degrees: f32,
    filter: PageFilter,
    pages_expr: String,
    skip_expr: String,
}

impl StampConfig {
    /// Validate options and build the runtime configuration.
    ///
    /// Numeric bounds and page expressions are checked before the image
    /// file is opened; any violation is a [`StampError::Config`].
    pub fn from_options(options: &StampOptions) -> Result<Self> {
        if !(MIN_SCALE..=MAX_SCALE).contains(&options.scale) {
            return Err(StampError::Config(format!(
                "Scale must be between {} and {}",
                MIN_SCALE, MAX_SCALE
            )));
        }
        if !(MIN_MARGIN_IN..=MAX_MARGIN_IN).contains(&options.x_offset_in) {
            return Err(StampError::Config(format!(
                "X offset must be between {} and {} inches",
                MIN_MARGIN_IN, MAX_MARGIN_IN
            )));
        }
        if !(MIN_MARGIN_IN..=MAX_MARGIN_IN).contains(&options.y_offset_in) {
            return Err(StampError::Config(format!(
                "Y offset must be between {} and {} inches",
                MIN_MARGIN_IN, MAX_MARGIN_IN
            )));
        }
        if !(MIN_OPACITY..=MAX_OPACITY).contains(&options.opacity) {
            return Err(StampError::Config(format!(
                "Opacity must be between {} and {}",
                MIN_OPACITY, MAX_OPACITY
            )));
        }
        if !(0.0..=MAX_ROTATION_DEG).contains(&options.rotation_degrees) {
            return Err(StampError::Config(format!(
                "Rotation must be between 0 and {} degrees",
                MAX_ROTATION_DEG
            )));
        }

        let filter = PageFilter::new(&options.pages, &options.skip_pages)?;
        let image = load_signature_image(&options.signature_path)?;

        Ok(Self {
            signature_path: options.signature_path.clone(),
            image,
            position: options.position,
            scale: options.scale,
            x_offset_pt: in_to_pt(options.x_offset_in),
            y_offset_pt: in_to_pt(options.y_offset_in),
            opacity: options.opacity,
            rotation_degrees: options.rotation_degrees,
            filter,
            pages_expr: options.pages.clone(),
            skip_expr: options.skip_pages.clone(),
        })
    }

    pub fn signature_path(&self) -> &Path {
        &self.signature_path
    }

    /// Decoded signature raster, always RGBA.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn position(&self) -> StampPosition {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Horizontal margin in points.
    pub fn x_offset_pt(&self) -> f32 {
        self.x_offset_pt
    }

    /// Vertical margin in points.
    pub fn y_offset_pt(&self) -> f32 {
        self.y_offset_pt
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn filter(&self) -> &PageFilter {
        &self.filter
    }

    /// The page expression as given by the caller, for logging.
    pub fn pages_expr(&self) -> &str {
        &self.pages_expr
    }

    /// The skip expression as given by the caller, for logging.
    pub fn skip_expr(&self) -> &str {
        &self.skip_expr
    }
}

/// Decode the signature image, requiring PNG.
///
/// PNG is the one widely-used raster format here that carries an alpha
/// channel; the compositor relies on it to keep the signature's
/// background transparent.
fn load_signature_image(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        return Err(StampError::Config(format!(
            "Signature image not found: {}",
            path.display()
        )));
    }

    let reader = ImageReader::open(path)?.with_guessed_format()?;
    if reader.format() != Some(ImageFormat::Png) {
        return Err(StampError::Config(format!(
            "Signature must be PNG format: {}",
            path.display()
        )));
    }

    Ok(reader.decode()?.to_rgba8())
}
