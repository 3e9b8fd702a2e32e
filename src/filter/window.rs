use std::collections::{BTreeSet, HashSet};

use chrono::{Days, NaiveDate};

/// Channel ids requested by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSelection {
    ids: HashSet<String>,
}

impl ChannelSelection {
    /// Parse a comma-separated list; entries are trimmed and blanks dropped.
    pub fn parse(list: &str) -> Self {
        list.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        !id.is_empty() && self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in sorted order, for logging.
    pub fn sorted(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl<S: Into<String>> FromIterator<S> for ChannelSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ChannelSelection {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Calendar days (`YYYYMMDD`) a programme may start on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    days: BTreeSet<String>,
}

impl DateWindow {
    /// `[today - days_back, today + days_forward]`, both ends included.
    pub fn around(today: NaiveDate, days_back: u32, days_forward: u32) -> Self {
        let first = today
            .checked_sub_days(Days::new(days_back.into()))
            .unwrap_or(today);
        let span = days_back as usize + days_forward as usize + 1;
        let days = first
            .iter_days()
            .take(span)
            .map(|d| d.format("%Y%m%d").to_string())
            .collect();
        DateWindow { days }
    }

    /// Whether the timestamp's first eight characters name a day in the window.
    /// Timestamps shorter than that never match.
    pub fn contains_timestamp(&self, timestamp: &str) -> bool {
        timestamp
            .get(..8)
            .is_some_and(|key| self.days.contains(key))
    }

    pub fn days(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }
}
