use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script regex"));

static STYLE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("style regex"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z/!?][^>]*>").expect("tag regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Upper bound on sanitize passes. Each pass peels one layer of entity encoding.
const MAX_PASSES: usize = 8;

/// Reduce an HTML fragment to plain text.
///
/// Script/style blocks go first, then the remaining tags, then whitespace is collapsed and
/// finally entities are decoded. Decoding can surface new markup (`&lt;b&gt;`), so the pass
/// repeats until the text is stable, at most `MAX_PASSES` times. Input encoded deeper than that
/// comes back partially decoded.
pub fn sanitize_html(raw: &str) -> String {
    let mut current = sanitize_once(raw);
    for _ in 1..MAX_PASSES {
        let next = sanitize_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn sanitize_once(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let without_scripts = SCRIPT_BLOCK_RE.replace_all(raw, " ");
    let without_styles = STYLE_BLOCK_RE.replace_all(&without_scripts, " ");
    let without_tags = TAG_RE.replace_all(&without_styles, " ");
    let collapsed = WHITESPACE_RE.replace_all(&without_tags, " ");
    html_escape::decode_html_entities(collapsed.trim()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_and_style_blocks_across_lines() {
        let raw = "<p>Soliq</p><SCRIPT type=\"text/javascript\">\nalert('x');\n</script>\
                   <style>\n.a { color: red }\n</STYLE>imtiyozi";
        assert_eq!(sanitize_html(raw), "Soliq imtiyozi");
    }

    #[test]
    fn collapses_whitespace_and_decodes_entities() {
        let raw = "  <b>Qaror</b>\n\n\t&laquo;Tadbirkorlik&raquo; &amp; soliq  ";
        assert_eq!(sanitize_html(raw), "Qaror «Tadbirkorlik» & soliq");
    }

    #[test]
    fn deeply_nested_entities_stop_after_bounded_passes() {
        let raw = format!("&{}lt;b&gt;", "amp;".repeat(32));
        let sanitized = sanitize_html(&raw);
        assert!(sanitized.contains("amp;"));
        assert!(sanitized.len() < raw.len());
    }

    #[test]
    fn keeps_bare_comparison_operators() {
        assert_eq!(sanitize_html("5 < 6 and 7 > 3"), "5 < 6 and 7 > 3");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(sanitize_html(""), "");
        assert_eq!(sanitize_html("   \n "), "");
        assert_eq!(sanitize_html("<br/>"), "");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "",
            "plain text",
            "<div>Salom &lt;b&gt;dunyo&lt;/b&gt;</div>",
            "&amp;lt;script&amp;gt;x&amp;lt;/script&amp;gt; after",
            "a&nbsp;&nbsp;b",
            "<p>unterminated <b",
            "tab\tand\r\nnewline",
            "&#1050;&#1088;&#1077;&#1076;&#1080;&#1090;",
        ];
        for sample in samples {
            let once = sanitize_html(sample);
            assert_eq!(sanitize_html(&once), once, "sample {sample:?}");
        }
    }
}
