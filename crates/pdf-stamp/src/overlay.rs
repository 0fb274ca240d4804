//! Signature overlay compositing
//!
//! Embeds the decoded signature raster into a document as an Image XObject
//! with a DeviceGray soft mask carrying the alpha channel, then stamps
//! individual pages by appending a transformed `Do` invocation to their
//! content. The original page content and MediaBox are never altered; the
//! existing content is wrapped in `q`/`Q` so the overlay always draws in a
//! clean graphics state.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;

use crate::config::StampConfig;
use crate::geometry::OverlayGeometry;
use crate::types::{Result, StampError};

/// Signature resources added to a document, shared by every stamped page.
///
/// The image XObject (with its soft mask) and the opacity graphics state
/// are page-size independent, so they are embedded once per document.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSignature {
    image_id: ObjectId,
    gstate_id: ObjectId,
}

impl EmbeddedSignature {
    /// Resource name of the image XObject, unique within the document.
    pub fn image_name(&self) -> String {
        format!("SigIm{}", self.image_id.0)
    }

    /// Resource name of the opacity graphics state.
    pub fn gstate_name(&self) -> String {
        format!("SigGS{}", self.gstate_id.0)
    }
}

/// Embed the signature image and its opacity graphics state.
///
/// RGB samples and the alpha channel are split into separate flate-encoded
/// streams; the alpha stream becomes the image's `/SMask`, which preserves
/// the signature's transparent background through compositing.
pub fn embed_signature(doc: &mut Document, config: &StampConfig) -> Result<EmbeddedSignature> {
    let rgba = config.image();
    let (width, height) = rgba.dimensions();

    let rgb: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();

    let smask_id = add_image_stream(doc, deflate(&alpha)?, width, height, b"DeviceGray", None);
    let image_id = add_image_stream(
        doc,
        deflate(&rgb)?,
        width,
        height,
        b"DeviceRGB",
        Some(smask_id),
    );

    let mut gstate = Dictionary::new();
    gstate.set("Type", Object::Name(b"ExtGState".to_vec()));
    gstate.set("ca", Object::Real(config.opacity()));
    gstate.set("CA", Object::Real(config.opacity()));
    let gstate_id = doc.add_object(gstate);

    Ok(EmbeddedSignature {
        image_id,
        gstate_id,
    })
}

/// Stamp one page: register the signature resources on the page and append
/// the overlay drawing operations to its content.
///
/// Fails without modifying the page when its structure cannot be merged
/// (malformed `Contents` or an unresolvable `Resources` reference); the
/// caller treats that as a per-page error, not a document abort.
pub fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    signature: &EmbeddedSignature,
    geometry: &OverlayGeometry,
    rotation_degrees: f32,
) -> Result<()> {
    let ops = overlay_ops(
        geometry,
        rotation_degrees,
        &signature.image_name(),
        &signature.gstate_name(),
    );

    // Validate the page structure before mutating anything
    let original_content = page_content_refs(doc, page_id)?;
    let resources = page_resources(doc, page_id, signature)?;

    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let overlay_id = doc.add_object(Stream::new(
        Dictionary::new(),
        format!("\nQ\n{}", ops).into_bytes(),
    ));

    let mut contents = Vec::with_capacity(original_content.len() + 2);
    contents.push(Object::Reference(save_id));
    contents.extend(original_content);
    contents.push(Object::Reference(overlay_id));

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("Contents", Object::Array(contents));
    page.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Content-stream operations drawing the overlay.
///
/// The image XObject spans the unit square, so the final `cm` scales it to
/// the overlay size. With rotation, the frame is first translated to the
/// overlay center, rotated, then translated back by half the extents, which
/// pivots the overlay around its own center rather than the page origin.
/// Positive angles rotate counter-clockwise, matching the PDF rotation
/// matrix convention.
pub fn overlay_ops(
    geometry: &OverlayGeometry,
    rotation_degrees: f32,
    image_name: &str,
    gstate_name: &str,
) -> String {
    if rotation_degrees != 0.0 {
        let (cx, cy) = geometry.center();
        let (sin, cos) = rotation_degrees.to_radians().sin_cos();
        format!(
            "q /{} gs 1 0 0 1 {} {} cm {} {} {} {} 0 0 cm 1 0 0 1 {} {} cm {} 0 0 {} 0 0 cm /{} Do Q\n",
            gstate_name,
            cx,
            cy,
            cos,
            sin,
            -sin,
            cos,
            -geometry.width / 2.0,
            -geometry.height / 2.0,
            geometry.width,
            geometry.height,
            image_name
        )
    } else {
        format!(
            "q /{} gs {} 0 0 {} {} {} cm /{} Do Q\n",
            gstate_name, geometry.width, geometry.height, geometry.x, geometry.y, image_name
        )
    }
}

/// Collect the page's content stream references without modifying them.
fn page_content_refs(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc.get_dictionary(page_id)?;
    match page.get(b"Contents") {
        Ok(Object::Reference(id)) => Ok(vec![Object::Reference(*id)]),
        Ok(Object::Array(items)) => Ok(items.clone()),
        Err(_) => Ok(Vec::new()), // no content, blank page
        Ok(_) => Err(StampError::Merge(
            "page Contents is neither a reference nor an array".to_string(),
        )),
    }
}

/// Clone the page's resources with the signature image and graphics state
/// registered. Inline and referenced resource dictionaries are both
/// supported; the updated dictionary is written back inline.
fn page_resources(
    doc: &Document,
    page_id: ObjectId,
    signature: &EmbeddedSignature,
) -> Result<Dictionary> {
    let page = doc.get_dictionary(page_id)?;
    let mut resources = match page.get(b"Resources") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => doc.get_dictionary(*id)?.clone(),
        _ => Dictionary::new(),
    };

    let mut xobjects = resolve_subdictionary(doc, &resources, b"XObject")?;
    xobjects.set(
        signature.image_name().into_bytes(),
        Object::Reference(signature.image_id),
    );
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut gstates = resolve_subdictionary(doc, &resources, b"ExtGState")?;
    gstates.set(
        signature.gstate_name().into_bytes(),
        Object::Reference(signature.gstate_id),
    );
    resources.set("ExtGState", Object::Dictionary(gstates));

    Ok(resources)
}

fn resolve_subdictionary(
    doc: &Document,
    resources: &Dictionary,
    key: &[u8],
) -> Result<Dictionary> {
    match resources.get(key) {
        Ok(Object::Dictionary(dict)) => Ok(dict.clone()),
        Ok(Object::Reference(id)) => Ok(doc.get_dictionary(*id)?.clone()),
        _ => Ok(Dictionary::new()),
    }
}

fn add_image_stream(
    doc: &mut Document,
    data: Vec<u8>,
    width: u32,
    height: u32,
    color_space: &[u8],
    smask: Option<ObjectId>,
) -> ObjectId {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    if let Some(id) = smask {
        dict.set("SMask", Object::Reference(id));
    }

    // Samples are already flate-encoded; lopdf must not compress them again
    let mut stream = Stream::new(dict, data);
    stream.allows_compression = false;
    doc.add_object(stream)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
