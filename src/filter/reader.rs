//! Line-based element reader.
//!
//! The input is treated as newline-delimited text: a top-level element starts on
//! a line whose trimmed text begins with `<tag` and ends on the first line that
//! contains `</tag>`. All assumptions about line boundaries live here, behind
//! [`ElementSource`], so a real streaming XML reader could replace it without
//! touching classification or scheduling.

use std::io::{self, BufRead};

use tracing::warn;

/// A complete top-level element, or what was left of it at end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub text: String,
    /// End of input was reached before the closing tag.
    pub truncated: bool,
}

impl Element {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// Anything that hands out lines and can accumulate a whole element.
pub trait ElementSource {
    /// Next line with its line terminator removed, or `None` at end of input.
    fn next_line(&mut self) -> io::Result<Option<String>>;

    /// Lines handed out so far.
    fn lines_read(&self) -> usize;

    /// Accumulate the element opened by `first_line` up to and including the
    /// first line that contains `</tag>`. Never reads past that line.
    fn read_element(&mut self, first_line: &str, tag: &str) -> io::Result<Element> {
        let end_tag = format!("</{}>", tag);
        let mut text = first_line.to_string();

        if first_line.contains(&end_tag) || is_self_closing(first_line) {
            return Ok(Element { text, truncated: false });
        }

        while let Some(line) = self.next_line()? {
            text.push('\n');
            text.push_str(&line);
            if line.contains(&end_tag) {
                return Ok(Element { text, truncated: false });
            }
        }

        warn!(tag, line = self.lines_read(), "input ended before closing tag");
        Ok(Element { text, truncated: true })
    }
}

/// `<tag .../>`: the opening tag's own `>` is preceded by `/`.
fn is_self_closing(line: &str) -> bool {
    line.find('>').is_some_and(|idx| line[..idx].ends_with('/'))
}

/// [`ElementSource`] over any buffered reader.
///
/// Lines are decoded lossily: bytes that are not valid UTF-8 come out as
/// U+FFFD, so a copied-through block is byte-exact only for valid input.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    lines_read: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        LineReader {
            inner,
            buf: Vec::new(),
            lines_read: 0,
        }
    }
}

impl<R: BufRead> ElementSource for LineReader<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.inner.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.lines_read += 1;
        // invalid UTF-8 is replaced rather than aborting the scan
        let line = String::from_utf8_lossy(&self.buf);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn lines_read(&self) -> usize {
        self.lines_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(text: &str) -> LineReader<Cursor<Vec<u8>>> {
        LineReader::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn single_line_element() {
        let mut r = reader("<after/>\n");
        let el = r
            .read_element(r#"<channel id="a"><display-name>A</display-name></channel>"#, "channel")
            .unwrap();
        assert!(!el.truncated);
        assert!(el.text.ends_with("</channel>"));
        // nothing consumed
        assert_eq!(r.lines_read(), 0);
    }

    #[test]
    fn multi_line_element_stops_at_close() {
        let mut r = reader("  <display-name>A</display-name>\n</channel>\n<programme start=\"1\">\n");
        let el = r.read_element("<channel id=\"a\">", "channel").unwrap();
        assert_eq!(el.text, "<channel id=\"a\">\n  <display-name>A</display-name>\n</channel>");
        assert!(!el.truncated);
        assert_eq!(r.next_line().unwrap().as_deref(), Some("<programme start=\"1\">"));
    }

    #[test]
    fn self_closing_element_is_complete() {
        let mut r = reader("<programme start=\"1\">\n");
        let el = r.read_element(r#"<channel id="a" />"#, "channel").unwrap();
        assert!(!el.truncated);
        assert_eq!(r.lines_read(), 0);

        let el = r.read_element(r#"<channel id="a"><icon src="x"/>"#, "channel").unwrap();
        assert!(el.truncated);
    }

    #[test]
    fn truncated_element_returns_partial() {
        let mut r = reader("  <title>Late</title>\n");
        let el = r.read_element("<programme start=\"1\">", "programme").unwrap();
        assert!(el.truncated);
        assert_eq!(el.lines().count(), 2);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut r = LineReader::new(Cursor::new(b"<display-name>A\xffB</display-name>\n".to_vec()));
        assert_eq!(
            r.next_line().unwrap().as_deref(),
            Some("<display-name>A\u{FFFD}B</display-name>")
        );
    }

    #[test]
    fn crlf_is_stripped() {
        let mut r = reader("one\r\ntwo\n");
        assert_eq!(r.next_line().unwrap().as_deref(), Some("one"));
        assert_eq!(r.next_line().unwrap().as_deref(), Some("two"));
        assert_eq!(r.next_line().unwrap(), None);
        assert_eq!(r.lines_read(), 2);
    }
}
