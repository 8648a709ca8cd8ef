// src/extract.rs
// =============================================================================
// Turning fetched HTML into a title, readable text and outbound links.
//
// HtmlExtractor uses the `scraper` crate:
// - Html::parse_document never fails, html5ever repairs broken markup
// - CSS selectors pick the main content area and the text blocks
//
// Text rendering (markdown-like, so the output document stays readable):
//   # Page title
//   ## A heading          (one '#' per heading level)
//   A paragraph.
//   * A list item
//   [table]
//   cell | cell | cell
//   ```
//   preformatted code
//   ```
//
// Blocks come out in document order. A block nested inside another block
// (a <p> inside an <li>, a <p> inside a table cell) is rendered as part of
// its outer block only.
// =============================================================================

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;

/// Where the main content of a documentation page usually lives, most
/// specific first
const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    ".content",
    ".documentation",
    ".docs-content",
    "#content",
    "#main-content",
    ".main-content",
    ".article-content",
];

const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, li, pre, table";

/// Blocks whose descendants are rendered as part of them
const CONTAINER_TAGS: &[&str] = &["p", "li", "pre", "table"];

/// Result of extracting one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub text: String,
    /// Raw href values, unresolved and unfiltered
    pub links: Vec<String>,
}

/// Turns a fetched body into an Extracted page
pub trait Extractor: Send + Sync {
    fn extract(&self, body: &[u8]) -> Result<Extracted, ExtractError>;
}

/// Extractor for HTML documents
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract(&self, body: &[u8]) -> Result<Extracted, ExtractError> {
        // Pages in Latin-1, Shift_JIS etc. still parse; only the non-UTF-8
        // bytes turn into U+FFFD, and ASCII hrefs survive untouched
        let markup = String::from_utf8_lossy(body);

        // An empty 200 response is still a page, just one with nothing in it
        if markup.trim().is_empty() {
            return Ok(Extracted::default());
        }

        // html5ever repairs any markup, so parsing itself cannot fail
        let document = Html::parse_document(&markup);
        let title = extract_title(&document);
        // Text only from the main content area, so nav bars and footers stay out
        let text = render_text(&title, main_content(&document));
        // Links from the whole document: the nav bar is how we find the other pages
        let links = extract_links(&document);

        Ok(Extracted { title, text, links })
    }
}

// Selectors used here are constants, so a parse failure is a programming error
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("constant CSS selector is valid")
}

fn extract_title(document: &Html) -> String {
    document
        .select(&selector("title"))
        .next()
        .map(|title| collapse_whitespace(&title.text().collect::<String>()))
        .unwrap_or_default()
}

// Falls back to <body>, then to the whole document
fn main_content(document: &Html) -> ElementRef<'_> {
    MAIN_CONTENT_SELECTORS
        .iter()
        .find_map(|css| document.select(&selector(css)).next())
        .or_else(|| document.select(&selector("body")).next())
        .unwrap_or_else(|| document.root_element())
}

fn render_text(title: &str, root: ElementRef<'_>) -> String {
    let mut out = String::new();
    out.push_str("# ");
    out.push_str(title);
    out.push_str("\n\n");

    // select() walks the tree in document order, outer blocks before inner ones
    for block in root.select(&selector(BLOCK_SELECTOR)) {
        // Its outer block already printed this text
        if is_nested_block(block, root) {
            continue;
        }
        render_block(&mut out, block);
    }

    out
}

// True if some ancestor between `element` and `root` already renders it
fn is_nested_block(element: ElementRef<'_>, root: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(ElementRef::wrap)
        .any(|ancestor| CONTAINER_TAGS.contains(&ancestor.value().name()))
}

fn render_block(out: &mut String, block: ElementRef<'_>) {
    let name = block.value().name();
    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let text = element_text(block);
            if !text.is_empty() {
                let level = name[1..].parse::<usize>().unwrap_or(1);
                out.push('\n');
                out.push_str(&"#".repeat(level));
                out.push(' ');
                out.push_str(&text);
                out.push('\n');
            }
        }
        "p" => {
            let text = element_text(block);
            if !text.is_empty() {
                out.push('\n');
                out.push_str(&text);
                out.push('\n');
            }
        }
        "li" => {
            let text = element_text(block);
            if !text.is_empty() {
                out.push_str("* ");
                out.push_str(&text);
                out.push('\n');
            }
        }
        "pre" => {
            // Whitespace inside code matters, so no collapse_whitespace here
            let code = block.text().collect::<String>();
            let code = code.trim();
            if !code.is_empty() {
                out.push_str("\n```\n");
                out.push_str(code);
                out.push_str("\n```\n");
            }
        }
        "table" => render_table(out, block),
        _ => {}
    }
}

fn render_table(out: &mut String, table: ElementRef<'_>) {
    out.push_str("\n[table]\n");
    for row in table.select(&selector("tr")) {
        let cells: Vec<String> = row.select(&selector("th, td")).map(element_text).collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
}

fn extract_links(document: &Html) -> Vec<String> {
    document
        .select(&selector("a[href]"))
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why does extract take &[u8] and not &str?
//    - The fetcher has no idea what encoding a page uses, so it hands over
//      raw bytes
//    - String::from_utf8_lossy returns a Cow: it borrows the bytes when they
//      are valid UTF-8 and only allocates when something had to be replaced
//
// 2. Why ElementRef<'_> everywhere?
//    - An ElementRef borrows from the Html document, so it cannot outlive it.
//      The '_ tells the compiler "tied to whatever it was borrowed from"
//    - That is also why extract() builds the title, text and links as owned
//      Strings before the document is dropped
//
// 3. Why is Extractor a trait?
//    - The crawler only needs "bytes in, Extracted out". Tests plug in their
//      own extractor to make a page fail on purpose
// -----------------------------------------------------------------------------
