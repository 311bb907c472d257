//! Heading outline of a markdown body, for the page's table of contents

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::Serialize;
use std::collections::HashMap;

/// A heading with its anchor id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Extract headings in document order.
///
/// Anchor ids follow GitHub's scheme: lowercased, punctuation dropped,
/// spaces turned into `-`, repeats suffixed with `-1`, `-2`, ...
/// Headings without text are skipped.
pub fn outline(markdown: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    let mut current: Option<(u8, String)> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((heading_level_to_u8(level), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                let Some((level, text)) = current.take() else {
                    continue;
                };
                let text = text.trim().to_string();
                if text.is_empty() {
                    continue;
                }
                let id = unique_id(anchor_id(&text), &mut seen);
                headings.push(Heading { id, text, level });
            }
            _ => {}
        }
    }

    headings
}

fn anchor_id(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

fn unique_id(base: String, seen: &mut HashMap<String, usize>) -> String {
    let mut candidate = base.clone();
    while seen.contains_key(&candidate) {
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        candidate = format!("{}-{}", base, count);
    }
    seen.insert(candidate.clone(), 0);
    candidate
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
