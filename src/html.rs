// src/html.rs
//! HTML -> visible text, for regex scanning.

use scraper::{Html, Selector};

/// Text content of the document's `<body>`, text nodes concatenated in
/// document order. Falls back to the whole document when there is no body.
/// Entities come back decoded.
pub fn page_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next().map(|b| b.text().collect::<String>()));
    body.unwrap_or_else(|| doc.root_element().text().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_and_decodes_entities() {
        let html = r#"<html><head><title>ignored</title></head>
            <body><div class="p"><span>NT$</span>&nbsp;<b>3,500</b></div></body></html>"#;
        let text = page_text(html);
        assert!(!text.contains('<'));
        assert!(!text.contains("ignored"));
        assert!(text.contains("NT$\u{a0}3,500"), "got: {text:?}");
    }

    #[test]
    fn fragment_without_body_still_yields_text() {
        let text = page_text("<p>12,000円</p>");
        assert!(text.contains("12,000円"));
    }
}
