use std::sync::OnceLock;

use html_escape::encode_text;
use regex::Regex;

/// Converts one non-prompt line into an HTML fragment.
///
/// Supports `#`/`##`/`###` headings at line start, `**bold**`, `*italic*`
/// and backtick code spans. Code spans are raw zones: emphasis markers inside
/// them are left alone. Everything else is HTML-escaped.
pub fn format_plain_line(line: &str) -> String {
    match heading_level(line) {
        Some((level, rest)) => format!("<h{level}>{}</h{level}>", format_inline(rest)),
        None => format_inline(line),
    }
}

/// Splits off a heading marker, returning the level and the heading text.
fn heading_level(line: &str) -> Option<(u8, &str)> {
    ["# ", "## ", "### "]
        .iter()
        .zip(1u8..)
        .find_map(|(marker, level)| line.strip_prefix(marker).map(|rest| (level, rest)))
}

fn format_inline(text: &str) -> String {
    static CODE_SPAN: OnceLock<Regex> = OnceLock::new();
    let code_span =
        CODE_SPAN.get_or_init(|| Regex::new(r"`([^`]+)`").expect("Invalid code span regex"));

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in code_span.captures_iter(text) {
        let (Some(full), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&format_emphasis(&text[last..full.start()]));
        out.push_str("<code>");
        out.push_str(&encode_text(inner.as_str()));
        out.push_str("</code>");
        last = full.end();
    }
    out.push_str(&format_emphasis(&text[last..]));
    out
}

fn format_emphasis(segment: &str) -> String {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    static ITALIC: OnceLock<Regex> = OnceLock::new();
    let bold = BOLD.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid bold regex"));
    let italic = ITALIC.get_or_init(|| Regex::new(r"\*(.*?)\*").expect("Invalid italic regex"));

    let escaped = encode_text(segment);
    let bolded = bold.replace_all(&escaped, "<strong>${1}</strong>");
    italic.replace_all(&bolded, "<em>${1}</em>").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# Title", "<h1>Title</h1>")]
    #[case("## Section", "<h2>Section</h2>")]
    #[case("### Sub", "<h3>Sub</h3>")]
    #[case("#### Too deep", "#### Too deep")]
    #[case("#NoSpace", "#NoSpace")]
    #[case("plain text", "plain text")]
    #[case("**bold** text", "<strong>bold</strong> text")]
    #[case("an *italic* word", "an <em>italic</em> word")]
    #[case("use `cargo test`", "use <code>cargo test</code>")]
    #[case("## **Loud** heading", "<h2><strong>Loud</strong> heading</h2>")]
    fn formats_line(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_plain_line(input), expected);
    }

    #[test]
    fn escapes_html() {
        assert_eq!(
            format_plain_line("a <b> & c"),
            "a &lt;b&gt; &amp; c"
        );
    }

    #[test]
    fn code_span_is_raw_zone() {
        assert_eq!(
            format_plain_line("`*not italic*` but *this is*"),
            "<code>*not italic*</code> but <em>this is</em>"
        );
    }

    #[test]
    fn code_span_content_is_escaped() {
        assert_eq!(format_plain_line("`<div>`"), "<code>&lt;div&gt;</code>");
    }

    #[test]
    fn unclosed_markers_stay_literal() {
        assert_eq!(format_plain_line("`unclosed"), "`unclosed");
        assert_eq!(format_plain_line("lone * star"), "lone * star");
    }
}
