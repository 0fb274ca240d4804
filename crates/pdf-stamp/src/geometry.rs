//! Overlay placement math
//!
//! Pure functions mapping page dimensions and the configured position,
//! scale and margins to the overlay's on-page bounding box. The page
//! coordinate space follows the PDF convention: (0,0) at the bottom-left,
//! units in points.

use crate::types::StampPosition;

/// Resolved bounding box for one page's overlay.
///
/// Width and height preserve the signature image's aspect ratio; (x, y)
/// is the unrotated bottom-left corner of the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl OverlayGeometry {
    /// Center of the overlay, used as the rotation pivot.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Size the overlay for a page: width is a fraction of the page width,
/// height follows from the image's aspect ratio.
pub fn overlay_size(page_width: f32, scale: f32, image_width: u32, image_height: u32) -> (f32, f32) {
    let width = page_width * scale;
    let height = width * (image_height as f32 / image_width as f32);
    (width, height)
}

/// Resolve the overlay origin for a corner position and edge margins.
pub fn resolve_origin(
    page_width: f32,
    page_height: f32,
    overlay_width: f32,
    overlay_height: f32,
    position: StampPosition,
    x_margin_pt: f32,
    y_margin_pt: f32,
) -> (f32, f32) {
    match position {
        StampPosition::BottomRight => (page_width - overlay_width - x_margin_pt, y_margin_pt),
        StampPosition::BottomLeft => (x_margin_pt, y_margin_pt),
        StampPosition::TopRight => (
            page_width - overlay_width - x_margin_pt,
            page_height - overlay_height - y_margin_pt,
        ),
        StampPosition::TopLeft => (x_margin_pt, page_height - overlay_height - y_margin_pt),
    }
}

/// Compute the full overlay geometry for one page.
///
/// An overlay larger than half the page in either dimension is legal but
/// usually unintended, so it is surfaced as a warning rather than an error.
pub fn resolve(
    page_width: f32,
    page_height: f32,
    scale: f32,
    image_width: u32,
    image_height: u32,
    position: StampPosition,
    x_margin_pt: f32,
    y_margin_pt: f32,
) -> OverlayGeometry {
    let (width, height) = overlay_size(page_width, scale, image_width, image_height);

    if width > page_width * 0.5 || height > page_height * 0.5 {
        log::warn!(
            "Signature is large ({:.0}x{:.0} pts on {:.0}x{:.0} page)",
            width,
            height,
            page_width,
            page_height
        );
    }

    let (x, y) = resolve_origin(
        page_width,
        page_height,
        width,
        height,
        position,
        x_margin_pt,
        y_margin_pt,
    );

    OverlayGeometry {
        x,
        y,
        width,
        height,
    }
}
