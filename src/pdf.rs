use anyhow::Context as _;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, Stream, StringFormat, dictionary};

use crate::layout::{DrawOp, PAGE_HEIGHT, PAGE_WIDTH, Page};
use crate::metrics::{Face, encode_win_ansi};

const PRODUCER: &str = concat!("rams ", env!("CARGO_PKG_VERSION"));

/// Serializes laid-out pages into a complete PDF file.
///
/// The output carries no timestamps or random identifiers, so identical pages
/// always produce identical bytes.
pub fn write_pdf(pages: &[Page], title: &str) -> anyhow::Result<Vec<u8>> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(Face::Regular));
    let bold_id = doc.add_object(font_dictionary(Face::Bold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Face::Regular.resource_name() => regular_id,
            Face::Bold.resource_name() => bold_id,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        let content = Content {
            operations: page_operations(page),
        };
        let encoded = content
            .encode()
            .with_context(|| format!("encode content stream for page {}", index + 1))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(PAGE_WIDTH),
                Object::Real(PAGE_HEIGHT),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(title),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).context("write pdf")?;
    Ok(buffer)
}

/// Document-information text string: ASCII as a literal, anything else as
/// UTF-16BE with a byte order mark.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xfe, 0xff];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn font_dictionary(face: Face) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut ops = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                gray,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("g", vec![real(*gray)]));
                ops.push(Operation::new(
                    "re",
                    vec![real(*x), real(*y), real(*width), real(*height)],
                ));
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawOp::StrokeRect {
                x,
                y,
                width,
                height,
                line_width,
                gray,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("G", vec![real(*gray)]));
                ops.push(Operation::new("w", vec![real(*line_width)]));
                ops.push(Operation::new(
                    "re",
                    vec![real(*x), real(*y), real(*width), real(*height)],
                ));
                ops.push(Operation::new("S", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            DrawOp::Text {
                x,
                y,
                face,
                size,
                gray,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new("g", vec![real(*gray)]));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::from(face.resource_name()), real(*size)],
                ));
                ops.push(Operation::new("Td", vec![real(*x), real(*y)]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
        }
    }
    ops
}

// Two decimals keeps content streams compact and stable.
fn real(value: f32) -> Object {
    Object::Real((value * 100.0).round() / 100.0)
}
