//! Single-document signing
//!
//! Opens a document, stamps every page the filter selects and writes the
//! result in one shot. The output is assembled fully in memory, so a
//! failure anywhere leaves the output path untouched.

use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};

use crate::config::StampConfig;
use crate::constants::{DEFAULT_PAGE_DIMENSIONS, SIGNED_SUFFIX};
use crate::geometry;
use crate::overlay::{self, EmbeddedSignature};
use crate::types::{Result, SignResult};

/// Sign a single document.
///
/// Always returns a [`SignResult`]; unrecoverable failures (unreadable
/// input, unwritable output) are captured in it with `success == false`
/// rather than propagated, so batch callers get failure isolation for
/// free. Page-level merge failures leave those pages unmodified and are
/// reported in the result's error text while the document still succeeds.
pub async fn sign_pdf(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &StampConfig,
) -> SignResult {
    let input = input_path.as_ref().to_owned();
    let output = output_path.as_ref().to_owned();

    match sign_inner(&input, &output, config).await {
        Ok((total_pages, pages_signed, page_errors)) => SignResult {
            input_path: input,
            output_path: output,
            success: true,
            total_pages,
            pages_signed,
            error: if page_errors.is_empty() {
                None
            } else {
                Some(page_errors.join("; "))
            },
        },
        Err(e) => SignResult {
            input_path: input,
            output_path: output,
            success: false,
            total_pages: 0,
            pages_signed: 0,
            error: Some(e.to_string()),
        },
    }
}

async fn sign_inner(
    input: &Path,
    output: &Path,
    config: &StampConfig,
) -> Result<(usize, usize, Vec<String>)> {
    let bytes = tokio::fs::read(input).await?;

    let config = config.clone();
    let (rendered, total_pages, pages_signed, page_errors) =
        tokio::task::spawn_blocking(move || {
            let mut doc = Document::load_mem(&bytes)?;
            let (total_pages, pages_signed, page_errors) = stamp_document(&mut doc, &config)?;

            let mut rendered = Vec::new();
            doc.save_to(&mut rendered)?;
            Ok::<_, crate::types::StampError>((rendered, total_pages, pages_signed, page_errors))
        })
        .await??;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(output, rendered).await?;

    Ok((total_pages, pages_signed, page_errors))
}

/// Stamp the selected pages of an in-memory document.
///
/// Pages are visited in order by their 1-based number. Geometry is
/// recomputed for each page from its own MediaBox, since pages within one
/// document need not share a size. Every page stays in the document in its
/// original order whether or not it was stamped.
///
/// Returns `(total_pages, pages_signed, page_errors)`.
pub fn stamp_document(
    doc: &mut Document,
    config: &StampConfig,
) -> Result<(usize, usize, Vec<String>)> {
    let pages = doc.get_pages();
    let total_pages = pages.len();

    let mut pages_signed = 0;
    let mut page_errors = Vec::new();
    let mut embedded: Option<EmbeddedSignature> = None;

    for (page_num, page_id) in pages {
        if !config.filter().should_sign(page_num as usize, total_pages) {
            continue;
        }

        let (page_width, page_height) = match page_dimensions(doc, page_id) {
            Ok(dims) => dims,
            Err(e) => {
                log::warn!("Skipping page {}: {}", page_num, e);
                page_errors.push(format!("page {}: {}", page_num, e));
                continue;
            }
        };

        let signature = match embedded {
            Some(s) => s,
            None => {
                let s = overlay::embed_signature(doc, config)?;
                embedded = Some(s);
                s
            }
        };

        let (image_width, image_height) = config.image().dimensions();
        let overlay_geometry = geometry::resolve(
            page_width,
            page_height,
            config.scale(),
            image_width,
            image_height,
            config.position(),
            config.x_offset_pt(),
            config.y_offset_pt(),
        );

        match overlay::stamp_page(
            doc,
            page_id,
            &signature,
            &overlay_geometry,
            config.rotation_degrees(),
        ) {
            Ok(()) => pages_signed += 1,
            Err(e) => {
                log::warn!("Failed to stamp page {}: {}", page_num, e);
                page_errors.push(format!("page {}: {}", page_num, e));
            }
        }
    }

    Ok((total_pages, pages_signed, page_errors))
}

/// Default output path for a single input: `<stem>_signed.pdf` next to it.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{}{}.pdf", stem, SIGNED_SUFFIX))
}

/// Page dimensions (width, height) in points from the MediaBox, falling
/// back to US Letter when absent.
pub fn page_dimensions(doc: &Document, page_id: ObjectId) -> Result<(f32, f32)> {
    let page_dict = doc.get_dictionary(page_id)?;

    if let Ok(mb) = page_dict.get(b"MediaBox").and_then(|obj| obj.as_array()) {
        if mb.len() == 4 {
            let width = extract_number(&mb[2]).unwrap_or(DEFAULT_PAGE_DIMENSIONS.0);
            let height = extract_number(&mb[3]).unwrap_or(DEFAULT_PAGE_DIMENSIONS.1);
            return Ok((width, height));
        }
    }
    Ok(DEFAULT_PAGE_DIMENSIONS)
}

fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
