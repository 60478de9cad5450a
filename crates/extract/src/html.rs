//! Markup stripping for directly fetched pages.
//!
//! Pages are parsed with `scraper` (html5ever underneath), which copes with
//! malformed markup and decodes the full HTML5 named entity set.

use scraper::{Html, Node};

use crate::compact::collapse_whitespace;

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Drop `<script>`/`<style>` content, join the remaining text nodes with
/// spaces, decode entities and collapse whitespace.
pub fn strip_html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::with_capacity(html.len() / 2);

    for node in document.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            text.push_str(fragment);
            text.push(' ');
        }
    }

    collapse_whitespace(&text)
}
