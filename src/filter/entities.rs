//! Entity handling for titles: strip on the way in, escape on the way out.
//! The two are never applied in the same direction.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

// Double-escaped forms come first so `&amp;lt;` goes as a whole.
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&amp;(?:quot|amp|lt|gt|apos);|&(?:quot|amp|lt|gt|apos);|&#(?:34|38|39|60|62);").unwrap()
});

/// Delete known named/numeric entities (and their `&amp;`-doubled forms) from
/// source text. Entities are dropped, not decoded.
pub fn strip_entities(text: &str) -> Cow<'_, str> {
    ENTITY_RE.replace_all(text, "")
}

/// Escape `& < > " '` for element text. Must run exactly once per value.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_named_entities() {
        assert_eq!(strip_entities("Tom &amp; Jerry"), "Tom  Jerry");
        assert_eq!(strip_entities("&quot;Match&quot;"), "Match");
        assert_eq!(strip_entities("a &lt;b&gt; c"), "a b c");
        assert_eq!(strip_entities("it&apos;s"), "its");
    }

    #[test]
    fn strips_double_escaped_whole() {
        assert_eq!(strip_entities("&amp;quot;Live&amp;quot;"), "Live");
        assert_eq!(strip_entities("x&amp;lt;y"), "xy");
        assert_eq!(strip_entities("&amp;amp;"), "");
    }

    #[test]
    fn strips_numeric_entities() {
        assert_eq!(strip_entities("&#34;A&#38;B&#39;&#60;&#62;"), "AB");
    }

    #[test]
    fn leaves_plain_text_and_unknown_entities() {
        assert!(matches!(strip_entities("Новости"), Cow::Borrowed("Новости")));
        assert_eq!(strip_entities("&nbsp;&#169;"), "&nbsp;&#169;");
    }

    #[test]
    fn escapes_five_characters() {
        assert_eq!(
            escape_text(r#"Tom & "Jerry" <it's>"#),
            "Tom &amp; &quot;Jerry&quot; &lt;it&apos;s&gt;"
        );
        assert_eq!(escape_text("Реклама"), "Реклама");
    }

    #[test]
    fn escape_round_trips() {
        let original = r#"a&b<c>d"e'f"#;
        let escaped = escape_text(original);
        let back = quick_xml::escape::unescape(&escaped).unwrap();
        assert_eq!(back, original);
    }
}
