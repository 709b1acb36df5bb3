// * Company Description Extraction
// * Chain: og:description meta -> first mid-length paragraph -> leading body text

use crate::extraction::truncate_chars;
use scraper::{Html, Node, Selector};
use std::sync::LazyLock;

static SELECTOR_OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:description"]"#).unwrap());
static SELECTOR_P: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

// * Elements whose text never counts as page copy
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer"];

// * Description length bounds (characters)
const MIN_DESCRIPTION_CHARS: usize = 50;
const MAX_DESCRIPTION_CHARS: usize = 500;
const PARAGRAPH_MIN_CHARS: usize = 100;
const PARAGRAPH_MAX_CHARS: usize = 500;
const BODY_FALLBACK_CHARS: usize = 300;

/// Picks a company description out of an HTML page
///
/// Returns `None` when nothing longer than 50 characters is found.
pub fn extract_description(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let description = og_description(&document)
        .filter(|d| char_len(d) >= MIN_DESCRIPTION_CHARS)
        .or_else(|| first_paragraph(&document))
        .or_else(|| {
            let body = visible_text(&document);
            Some(truncate_chars(&body, BODY_FALLBACK_CHARS).trim().to_string())
        })?;

    if char_len(&description) > MIN_DESCRIPTION_CHARS {
        Some(truncate_chars(&description, MAX_DESCRIPTION_CHARS).to_string())
    } else {
        None
    }
}

fn og_description(document: &Html) -> Option<String> {
    document
        .select(&SELECTOR_OG_DESCRIPTION)
        .find_map(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
}

fn first_paragraph(document: &Html) -> Option<String> {
    document
        .select(&SELECTOR_P)
        .filter(|p| !inside_skipped(p.ancestors().filter_map(|a| a.value().as_element().map(|e| e.name()))))
        .map(|p| p.text().map(str::trim).collect::<String>())
        .find(|text| {
            let len = char_len(text);
            len > PARAGRAPH_MIN_CHARS && len < PARAGRAPH_MAX_CHARS
        })
}

/// Whitespace-joined text outside script/style/nav/header/footer
pub fn visible_text(document: &Html) -> String {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => {
                let names = node
                    .ancestors()
                    .filter_map(|a| a.value().as_element().map(|e| e.name()));
                if inside_skipped(names) {
                    None
                } else {
                    Some(text.trim())
                }
            }
            _ => None,
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn inside_skipped<'a>(mut names: impl Iterator<Item = &'a str>) -> bool {
    names.any(|name| SKIPPED_ELEMENTS.contains(&name))
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
