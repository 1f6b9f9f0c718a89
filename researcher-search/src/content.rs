//! Readable text extraction for fetched result pages.
//!
//! Raw content is embedded into prompts, so markup, scripts and page chrome
//! are dropped and only the text of the main content area is kept.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose whole subtree never contributes readable text.
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript", "svg", "iframe",
    "template", "form",
];

/// Elements that end a line of text.
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "section", "article", "li", "ul", "ol", "br", "tr", "table", "pre",
    "blockquote", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Main-content containers, tried in priority order.
const CONTENT_SELECTORS: &[&str] = &["article", "main", "[role=\"main\"]", "body"];

/// Extract readable text from an HTML document.
///
/// Returns `None` when the document has no text outside boilerplate.
pub fn extract_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(root) = document.select(&selector).next() {
            let mut raw = String::new();
            collect_text(root, &mut raw);
            let text = normalise_whitespace(&raw);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    None
}

/// Whether a `Content-Type` header value denotes an HTML document.
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Pending work for the text walk. Kept on an explicit stack so page depth
/// never turns into call-stack depth.
enum Step<N> {
    Visit(N),
    EndBlock,
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    let mut stack: Vec<Step<_>> = element.children().rev().map(Step::Visit).collect();

    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Visit(node) => node,
            Step::EndBlock => {
                out.push('\n');
                continue;
            }
        };
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                if BLOCK_ELEMENTS.contains(&name) {
                    stack.push(Step::EndBlock);
                }
                stack.extend(node.children().rev().map(Step::Visit));
            }
            _ => {}
        }
    }
}

/// Collapse runs of spaces to one, trim every line, and drop blank lines.
fn normalise_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_article_text() {
        let html = r#"<html><head><title>T</title></head><body>
            <nav>Home | About</nav>
            <article><h1>Rust</h1><p>Ownership   and borrowing.</p></article>
            <footer>Copyright</footer>
        </body></html>"#;
        let text = extract_text(html).expect("text");
        assert_eq!(text, "Rust\nOwnership and borrowing.");
    }

    #[test]
    fn scripts_and_styles_are_dropped() {
        let html = "<html><body><script>var x = 1;</script><style>p{}</style><p>Visible</p></body></html>";
        let text = extract_text(html).expect("text");
        assert_eq!(text, "Visible");
    }

    #[test]
    fn falls_back_to_body() {
        let html = "<html><body><div>One</div><div>Two</div></body></html>";
        let text = extract_text(html).expect("text");
        assert_eq!(text, "One\nTwo");
    }

    #[test]
    fn boilerplate_only_page_yields_none() {
        let html = "<html><body><nav>menu</nav><script>x()</script></body></html>";
        assert!(extract_text(html).is_none());
    }

    #[test]
    fn deeply_nested_page_does_not_exhaust_the_stack() {
        let depth = 10_000;
        let html = format!(
            "<html><body>{}deep{}</body></html>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );
        // A small stack makes per-level recursion overflow well before `depth`.
        let handle = std::thread::Builder::new()
            .stack_size(1024 * 1024)
            .spawn(move || extract_text(&html))
            .expect("spawn extraction thread");
        let text = handle.join().expect("extraction thread completed");
        assert_eq!(text.as_deref(), Some("deep"));
    }

    #[test]
    fn skipped_subtrees_are_pruned_at_any_depth() {
        let html = "<html><body><div><div><nav><div><p>menu</p></div></nav>\
                    <p>kept</p></div></div></body></html>";
        assert_eq!(extract_text(html).as_deref(), Some("kept"));
    }

    #[test]
    fn html_content_types() {
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(!is_html_content_type("text/plain"));
        assert!(!is_html_content_type("application/json"));
    }
}
