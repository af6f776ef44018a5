//! PDF serialization
//!
//! Turns a [`Layout`] into PDF bytes with lopdf. Output is uncompressed and
//! contains nothing time-dependent beyond the supplied creation date, so the
//! same layout always serializes to the same bytes.

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::RenderError;
use crate::layout::{Layout, Mark, Page, PageGeometry};
use crate::metrics::{encode_win_ansi, FontFace};

const PRODUCER: &str = concat!("mandate-core ", env!("CARGO_PKG_VERSION"));

/// Stroke width for table grids and heading rules
const LINE_WIDTH: f32 = 0.5;

/// Document information dictionary entries.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub created_on: NaiveDate,
}

fn literal(text: &str) -> Object {
    Object::String(encode_win_ansi(text), StringFormat::Literal)
}

fn font_dictionary(face: FontFace) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(face.base_font().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Content stream operations for one page.
fn page_operations(page: &Page, geometry: &PageGeometry) -> Vec<Operation> {
    // Layout measures from the top edge, PDF from the bottom
    let flip = |y: f32| geometry.height - y;

    let mut ops = vec![Operation::new("w", vec![Object::Real(LINE_WIDTH)])];
    for mark in &page.marks {
        match mark {
            Mark::Text {
                x,
                baseline,
                text,
                face,
                size,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![
                        Object::Name(face.resource_name().to_vec()),
                        Object::Real(*size),
                    ],
                ));
                ops.push(Operation::new(
                    "Td",
                    vec![Object::Real(*x), Object::Real(flip(*baseline))],
                ));
                ops.push(Operation::new("Tj", vec![literal(text)]));
                ops.push(Operation::new("ET", vec![]));
            }
            Mark::Rect {
                x,
                top,
                width,
                height,
                fill,
            } => {
                let rect = vec![
                    Object::Real(*x),
                    Object::Real(flip(top + height)),
                    Object::Real(*width),
                    Object::Real(*height),
                ];
                match fill {
                    Some(gray) => {
                        ops.push(Operation::new("q", vec![]));
                        ops.push(Operation::new("g", vec![Object::Real(*gray)]));
                        ops.push(Operation::new("re", rect));
                        ops.push(Operation::new("B", vec![]));
                        ops.push(Operation::new("Q", vec![]));
                    }
                    None => {
                        ops.push(Operation::new("re", rect));
                        ops.push(Operation::new("S", vec![]));
                    }
                }
            }
            Mark::Rule { x1, x2, y } => {
                ops.push(Operation::new(
                    "m",
                    vec![Object::Real(*x1), Object::Real(flip(*y))],
                ));
                ops.push(Operation::new(
                    "l",
                    vec![Object::Real(*x2), Object::Real(flip(*y))],
                ));
                ops.push(Operation::new("S", vec![]));
            }
        }
    }
    ops
}

/// Serialize a layout into a complete PDF file.
pub fn render_pdf(layout: &Layout, info: &DocumentInfo) -> Result<Vec<u8>, RenderError> {
    if layout.pages.is_empty() {
        return Err(RenderError::Layout("layout has no pages".into()));
    }

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(FontFace::Regular));
    let bold_id = doc.add_object(font_dictionary(FontFace::Bold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(regular_id),
            "F2" => Object::Reference(bold_id),
        },
    });

    let geometry = &layout.geometry;
    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(geometry.width),
        Object::Real(geometry.height),
    ];

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = Content {
            operations: page_operations(page, geometry),
        };
        let encoded = content
            .encode()
            .map_err(|e| RenderError::Serialization(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => media_box.clone(),
            "Resources" => Object::Reference(resources_id),
            "Contents" => Object::Reference(content_id),
        });
        page_ids.push(page_id);
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => Object::Integer(page_ids.len() as i64),
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let info_id = doc.add_object(dictionary! {
        "Title" => literal(&info.title),
        "Producer" => literal(PRODUCER),
        "CreationDate" => literal(&info.created_on.format("D:%Y%m%d000000").to_string()),
    });
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RenderError::Serialization(format!("Save failed: {}", e)))?;

    Ok(buffer)
}
