//! Best-effort article body extraction from HTML

use crate::engine::models::truncate_chars;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Containers tried in order before falling back to every paragraph
const CONTAINER_SELECTORS: &[&str] = &[
    "article",
    "[role=\"main\"]",
    ".article-content",
    ".article-body",
    ".story-body",
    ".entry-content",
    "main",
];

/// Page chrome whose paragraphs are never article text
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

/// A container must yield more than this to be accepted
const MIN_ARTICLE_CHARS: usize = 200;

static PARAGRAPH: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("paragraph selector is valid"));

static CONTAINERS: Lazy<Vec<Selector>> = Lazy::new(|| {
    CONTAINER_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("container selector is valid"))
        .collect()
});

/// Extract up to `max_chars` of likely article text from a page
pub fn extract_article_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let mut content = String::new();

    for selector in CONTAINERS.iter() {
        if let Some(container) = document.select(selector).next() {
            content = join_paragraphs(container.select(&PARAGRAPH));
            if content.chars().count() > MIN_ARTICLE_CHARS {
                break;
            }
        }
    }

    if content.chars().count() < MIN_ARTICLE_CHARS {
        content = join_paragraphs(document.select(&PARAGRAPH));
    }

    truncate_chars(&content, max_chars)
}

/// Plain text of an HTML fragment, whitespace collapsed
pub fn strip_html(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    collapse_whitespace(parsed.root_element().text())
}

/// Visible text of one element, whitespace collapsed
pub fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(element.text())
}

/// Text nodes are joined before splitting so inline tags never break a word
fn collapse_whitespace<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    let joined: String = pieces.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn join_paragraphs<'a>(paragraphs: impl Iterator<Item = ElementRef<'a>>) -> String {
    paragraphs
        .filter(|p| !inside_page_chrome(p))
        .map(|p| element_text(&p))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn inside_page_chrome(element: &ElementRef<'_>) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .map(|e| SKIPPED_ELEMENTS.contains(&e.name()))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_sentence(word: &str) -> String {
        format!("{} ", word).repeat(60)
    }

    #[test]
    fn test_prefers_article_container() {
        let html = format!(
            "<html><body><nav><p>Menu item</p></nav><article><p>{}</p></article><p>Sidebar text</p></body></html>",
            long_sentence("story")
        );
        let text = extract_article_text(&html, 5000);
        assert!(text.starts_with("story story"));
        assert!(!text.contains("Sidebar"));
        assert!(!text.contains("Menu"));
    }

    #[test]
    fn test_falls_back_to_all_paragraphs() {
        let html = "<html><body><article><p>short</p></article><p>Other paragraph.</p><footer><p>Copyright</p></footer></body></html>";
        let text = extract_article_text(html, 5000);
        assert_eq!(text, "short Other paragraph.");
    }

    #[test]
    fn test_skips_short_container_for_later_one() {
        let html = format!(
            "<html><body><article><p>tiny</p></article><main><p>{}</p></main></body></html>",
            long_sentence("body")
        );
        let text = extract_article_text(&html, 5000);
        assert!(text.starts_with("body body"));
        assert!(!text.contains("tiny"));
    }

    #[test]
    fn test_truncates_to_budget() {
        let html = format!("<article><p>{}</p></article>", long_sentence("word"));
        let text = extract_article_text(&html, 20);
        assert_eq!(text.chars().count(), 20);
    }

    #[test]
    fn test_inline_markup_keeps_word_spacing() {
        let html = "<p>The <a href=\"#\">Earth</a> is   round.</p>";
        assert_eq!(extract_article_text(html, 5000), "The Earth is round.");
    }

    #[test]
    fn test_inline_markup_inside_a_word() {
        let html = "<p>The claim is un<b>proven</b> and was <i>debunk</i>ed.</p>";
        assert_eq!(
            extract_article_text(html, 5000),
            "The claim is unproven and was debunked."
        );
        assert_eq!(
            strip_html("<b>Vaccine</b>s cause autism claims"),
            "Vaccines cause autism claims"
        );
    }

    #[test]
    fn test_strip_html() {
        let snippet = "The <span class=\"searchmatch\">Earth</span> is the third planet";
        assert_eq!(strip_html(snippet), "The Earth is the third planet");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract_article_text("", 5000), "");
    }
}
