use lopdf::Document;
use lopdf::content::Content;

/// Text runs of every page, in drawing order, decoded as Latin-1.
pub fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(bytes).expect("parse pdf");
    doc.get_pages()
        .values()
        .map(|page_id| {
            let raw = doc.get_page_content(*page_id).expect("page content");
            let content = Content::decode(&raw).expect("decode content");
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| op.operands.first()?.as_str().ok())
                .map(|bytes| bytes.iter().map(|b| char::from(*b)).collect())
                .collect()
        })
        .collect()
}

pub fn all_texts(bytes: &[u8]) -> Vec<String> {
    page_texts(bytes).into_iter().flatten().collect()
}
