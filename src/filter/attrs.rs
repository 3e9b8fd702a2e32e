//! Attribute and title lookup by delimiter search. An empty string always
//! means "not present".

pub const NO_TITLE: &str = "No title";

/// Value of the first `name="..."` in `text`, or `""` when absent or unterminated.
pub fn get_attribute<'a>(text: &'a str, name: &str) -> &'a str {
    let pattern = format!("{}=\"", name);
    text.find(&pattern)
        .map(|idx| &text[idx + pattern.len()..])
        .and_then(|rest| rest.find('"').map(|end| &rest[..end]))
        .unwrap_or("")
}

pub fn extract_channel(text: &str) -> &str {
    get_attribute(text, "channel")
}

pub fn extract_id(text: &str) -> &str {
    get_attribute(text, "id")
}

/// Trimmed inner text of the first `<title ...>...</title>` on `line`.
/// Tolerates attributes on the opening tag (`<title lang="ru">`).
pub fn extract_title_from_line(line: &str) -> &str {
    inner_text(line, "<title", "</title>")
}

/// Trimmed text of the first `<display-name ...>` in `text`.
pub fn extract_display_name(text: &str) -> &str {
    inner_text(text, "<display-name", "</display-name>")
}

fn inner_text<'a>(text: &'a str, open: &str, close: &str) -> &'a str {
    let Some(start) = text.find(open) else {
        return "";
    };
    let Some(tag_end) = text[start..].find('>') else {
        return "";
    };
    let body_start = start + tag_end + 1;
    match text[body_start..].find(close) {
        Some(end) => text[body_start..body_start + end].trim(),
        None => "",
    }
}

/// Scan up to `max_lines` lines of a programme block for its title. The search
/// stops at the first line carrying `</programme>`; a title on that same line
/// still counts. Returns [`NO_TITLE`] when nothing usable is found.
pub fn find_programme_title<'a, I>(lines: I, max_lines: usize) -> &'a str
where
    I: IntoIterator<Item = &'a str>,
{
    for line in lines.into_iter().take(max_lines) {
        if line.contains("<title") && line.contains("</title>") {
            let title = extract_title_from_line(line);
            if !title.is_empty() {
                return title;
            }
        }
        if line.contains("</programme>") {
            break;
        }
    }
    NO_TITLE
}
