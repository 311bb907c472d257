//! Term search over flattened documents

use crate::document::DocumentEntry;

/// Documents whose title, date, tags or summary contain every term of `query`.
///
/// Matching is case-insensitive. An empty query matches everything. Results
/// keep the input order.
pub fn search<'a>(documents: &'a [DocumentEntry], query: &str) -> Vec<&'a DocumentEntry> {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();

    documents
        .iter()
        .filter(|doc| {
            let haystack = haystack(doc);
            terms.iter().all(|term| haystack.contains(term.as_str()))
        })
        .collect()
}

fn haystack(doc: &DocumentEntry) -> String {
    let meta = &doc.metadata;
    let mut text = format!("{} {}", meta.title, meta.date);
    for tag in &meta.tags {
        text.push(' ');
        text.push_str(tag);
    }
    if let Some(summary) = &meta.summary {
        text.push(' ');
        text.push_str(summary);
    }
    text.to_lowercase()
}
