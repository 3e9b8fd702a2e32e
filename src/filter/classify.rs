//! Pass one: a single forward scan that copies selected channels out and
//! collects in-window programmes per channel.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use super::attrs::{extract_channel, extract_id, find_programme_title, get_attribute};
use super::entities::strip_entities;
use super::model::{ChannelProgrammeIndex, ProgrammeRecord, RawElementBlock};
use super::reader::{Element, ElementSource};
use super::window::{ChannelSelection, DateWindow};
use crate::error::{FilterError, Result};

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Lines after the programme's opening line searched for `<title>`.
    pub title_search_lines: usize,
    /// Drop elements cut off by end of input instead of keeping what was read.
    pub strict: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            title_search_lines: 10,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub lines: usize,
    pub channels_matched: usize,
    pub programmes_matched: usize,
    pub programmes_out_of_window: usize,
    pub programmes_malformed: usize,
    pub truncated: usize,
}

/// What pass one hands to the schedule pass. Owned outright; nothing else
/// holds a reference to the index once the scan returns.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub programmes: ChannelProgrammeIndex,
    /// Ids whose `<channel>` block reached `on_channel`.
    pub channels_written: BTreeSet<String>,
    pub stats: ScanStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opening {
    Channel,
    Programme,
    Other,
}

fn classify_line(trimmed: &str) -> Opening {
    if trimmed.starts_with("<channel") {
        Opening::Channel
    } else if trimmed.starts_with("<programme") {
        Opening::Programme
    } else {
        Opening::Other
    }
}

/// Scan `source` to the end. Each selected channel block is passed to
/// `on_channel` as soon as it is complete, in input order.
pub fn scan<S, F>(
    source: &mut S,
    selection: &ChannelSelection,
    window: &DateWindow,
    opts: ScanOptions,
    mut on_channel: F,
) -> Result<ScanOutcome>
where
    S: ElementSource,
    F: FnMut(&RawElementBlock) -> Result<()>,
{
    let mut out = ScanOutcome::default();

    while let Some(line) = source.next_line().map_err(FilterError::Read)? {
        let trimmed = line.trim();

        match classify_line(trimmed) {
            Opening::Channel => {
                let id = extract_id(trimmed);
                if !selection.contains(id) {
                    continue;
                }
                let Some(element) = read(source, trimmed, "channel", opts, &mut out.stats)? else {
                    continue;
                };
                let block = RawElementBlock {
                    id: id.to_string(),
                    text: element.text,
                };
                on_channel(&block)?;
                out.stats.channels_matched += 1;
                info!("✓ Found channel: {}", block.id);
                out.channels_written.insert(block.id);
            }
            Opening::Programme => {
                if let Some((channel, record)) =
                    scan_programme(source, trimmed, selection, window, opts, &mut out.stats)?
                {
                    out.programmes.entry(channel).or_default().push(record);
                    out.stats.programmes_matched += 1;
                }
            }
            Opening::Other => {}
        }
    }

    out.stats.lines = source.lines_read();
    Ok(out)
}

fn scan_programme<S: ElementSource>(
    source: &mut S,
    first_line: &str,
    selection: &ChannelSelection,
    window: &DateWindow,
    opts: ScanOptions,
    stats: &mut ScanStats,
) -> Result<Option<(String, ProgrammeRecord)>> {
    let channel = extract_channel(first_line);
    let start = get_attribute(first_line, "start");

    // Rejected programmes are still consumed so the cursor lands after them.
    if !selection.contains(channel) {
        read(source, first_line, "programme", opts, stats)?;
        return Ok(None);
    }
    if !window.contains_timestamp(start) {
        stats.programmes_out_of_window += 1;
        read(source, first_line, "programme", opts, stats)?;
        return Ok(None);
    }

    let Some(element) = read(source, first_line, "programme", opts, stats)? else {
        return Ok(None);
    };

    let stop = get_attribute(first_line, "stop");
    if stop.is_empty() {
        stats.programmes_malformed += 1;
        debug!(channel, start, "programme without stop dropped");
        return Ok(None);
    }

    let title = find_programme_title(element.lines(), opts.title_search_lines.saturating_add(1));
    let record = ProgrammeRecord::new(start, stop, strip_entities(title));
    Ok(Some((channel.to_string(), record)))
}

/// Read one element, applying the strictness policy to truncated ones.
fn read<S: ElementSource>(
    source: &mut S,
    first_line: &str,
    tag: &str,
    opts: ScanOptions,
    stats: &mut ScanStats,
) -> Result<Option<Element>> {
    let element = source.read_element(first_line, tag).map_err(FilterError::Read)?;
    if element.truncated {
        stats.truncated += 1;
        if opts.strict {
            return Ok(None);
        }
    }
    Ok(Some(element))
}
