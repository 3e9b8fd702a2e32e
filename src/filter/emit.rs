//! XMLTV output. The root element is always closed: either by [`DocumentEmitter::finish`]
//! or, when a run bails out early, when the emitter is dropped.

use std::io::Write;

use super::entities::escape_text;
use super::model::{ProgrammeRecord, RawElementBlock};
use crate::error::{FilterError, Result};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const DOCTYPE: &str = r#"<!DOCTYPE tv SYSTEM "xmltv.dtd">"#;
const TV_OPEN: &str = r#"<tv generator-info-name="iptvx" generator-info-url="https://megasite.ru/">"#;
const TV_CLOSE: &str = "</tv>";

pub struct DocumentEmitter<W: Write> {
    out: W,
    closed: bool,
}

impl<W: Write> DocumentEmitter<W> {
    /// Write the declaration, doctype and `<tv>` open tag.
    pub fn new(out: W) -> Result<Self> {
        let mut emitter = DocumentEmitter { out, closed: false };
        writeln!(emitter.out, "{}", XML_DECLARATION).map_err(FilterError::Write)?;
        writeln!(emitter.out, "{}", DOCTYPE).map_err(FilterError::Write)?;
        writeln!(emitter.out, "{}", TV_OPEN).map_err(FilterError::Write)?;
        Ok(emitter)
    }

    /// Copy a channel block as-is, followed by a newline.
    pub fn write_channel(&mut self, block: &RawElementBlock) -> Result<()> {
        writeln!(self.out, "{}", block.text).map_err(FilterError::Write)
    }

    /// Render one channel's programmes. Titles are escaped here and only here.
    pub fn write_programmes(&mut self, channel: &str, programmes: &[ProgrammeRecord]) -> Result<usize> {
        for p in programmes {
            writeln!(
                self.out,
                "<programme start=\"{}\" stop=\"{}\" channel=\"{}\">\n<title>{}</title>\n</programme>",
                p.start,
                p.stop,
                channel,
                escape_text(&p.title)
            )
            .map_err(FilterError::Write)?;
        }
        Ok(programmes.len())
    }

    /// Close the root element and flush. Safe to call more than once.
    pub fn finish(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            writeln!(self.out, "{}", TV_CLOSE).map_err(FilterError::Write)?;
        }
        self.out.flush().map_err(FilterError::Write)
    }
}

impl<W: Write> Drop for DocumentEmitter<W> {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut DocumentEmitter<&mut Vec<u8>>)) -> String {
        let mut buf = Vec::new();
        {
            let mut e = DocumentEmitter::new(&mut buf).unwrap();
            f(&mut e);
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_document_is_closed() {
        let doc = render(|e| e.finish().unwrap());
        assert_eq!(
            doc,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <!DOCTYPE tv SYSTEM \"xmltv.dtd\">\n\
             <tv generator-info-name=\"iptvx\" generator-info-url=\"https://megasite.ru/\">\n\
             </tv>\n"
        );
    }

    #[test]
    fn drop_closes_root() {
        let doc = render(|e| {
            e.write_channel(&RawElementBlock {
                id: "a".into(),
                text: "<channel id=\"a\"></channel>".into(),
            })
            .unwrap();
        });
        assert!(doc.ends_with("<channel id=\"a\"></channel>\n</tv>\n"));
        assert_eq!(doc.matches("</tv>").count(), 1);
    }

    #[test]
    fn finish_twice_closes_once() {
        let doc = render(|e| {
            e.finish().unwrap();
            e.finish().unwrap();
        });
        assert_eq!(doc.matches("</tv>").count(), 1);
    }

    #[test]
    fn programme_title_escaped_once() {
        let doc = render(|e| {
            let n = e
                .write_programmes(
                    "a",
                    &[ProgrammeRecord::new("20240101100000 +0300", "20240101110000 +0300", "Q&A <live>")],
                )
                .unwrap();
            assert_eq!(n, 1);
            e.finish().unwrap();
        });
        assert!(doc.contains(
            "<programme start=\"20240101100000 +0300\" stop=\"20240101110000 +0300\" channel=\"a\">\n\
             <title>Q&amp;A &lt;live&gt;</title>\n</programme>\n"
        ));
        assert!(!doc.contains("&amp;amp;"));
    }
}
