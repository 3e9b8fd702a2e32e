//! Discovery mode: show which channel ids a guide contains, without filtering.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{FilterError, Result};
use crate::filter::attrs::{extract_display_name, extract_id};
use crate::filter::reader::{ElementSource, LineReader};

const NAME_WIDTH: usize = 20;
const CELL_WIDTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelListing {
    pub entries: Vec<ChannelEntry>,
    /// Every channel with an id, including those past the limit.
    pub total: usize,
    pub limit: usize,
}

/// One pass over the input: the first `limit` channels are kept with their
/// display name, the rest are only counted.
pub fn list_channels<S: ElementSource>(source: &mut S, limit: usize) -> Result<ChannelListing> {
    let mut listing = ChannelListing {
        limit,
        ..ChannelListing::default()
    };

    while let Some(line) = source.next_line().map_err(FilterError::Read)? {
        let trimmed = line.trim();
        if !trimmed.starts_with("<channel") {
            continue;
        }
        let id = extract_id(trimmed);
        if id.is_empty() {
            continue;
        }
        listing.total += 1;
        if listing.entries.len() >= limit {
            continue;
        }

        let element = source
            .read_element(trimmed, "channel")
            .map_err(FilterError::Read)?;
        let name = match extract_display_name(&element.text) {
            "" => "No name".to_string(),
            name => truncate(name, NAME_WIDTH),
        };
        listing.entries.push(ChannelEntry {
            id: id.to_string(),
            name,
        });
    }

    Ok(listing)
}

pub fn list_file(path: &Path, limit: usize) -> Result<ChannelListing> {
    if !path.exists() {
        return Err(FilterError::InputMissing(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| FilterError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    list_channels(&mut LineReader::new(BufReader::new(file)), limit)
}

/// Two fixed-width cells per row, then the total.
impl fmt::Display for ChannelListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Available channels (first {}):", self.limit)?;
        writeln!(f, "-----------------------------")?;

        for (i, entry) in self.entries.iter().enumerate() {
            let mut cell = format!("{} ({})", entry.id, entry.name);
            if cell.chars().count() > CELL_WIDTH {
                cell = truncate(&cell, CELL_WIDTH - 3);
            }
            write!(f, "{:<width$}", cell, width = CELL_WIDTH)?;
            if (i + 1) % 2 == 0 {
                writeln!(f)?;
            }
        }
        if self.entries.len() % 2 != 0 {
            writeln!(f)?;
        }

        writeln!(
            f,
            "\nTotal channels in file: {} (showing first {})",
            self.total, self.limit
        )
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
