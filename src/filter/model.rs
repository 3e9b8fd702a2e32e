use std::collections::BTreeMap;

/// One broadcast slot. `start` and `stop` keep the source's
/// `YYYYMMDDhhmmss[ tz]` text; only the schedule pass parses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammeRecord {
    pub start: String,
    pub stop: String,
    pub title: String,
}

impl ProgrammeRecord {
    pub fn new(start: impl Into<String>, stop: impl Into<String>, title: impl Into<String>) -> Self {
        ProgrammeRecord {
            start: start.into(),
            stop: stop.into(),
            title: title.into(),
        }
    }
}

/// Verbatim text of one selected `<channel>` element, copied to the output as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElementBlock {
    pub id: String,
    pub text: String,
}

/// Matched programmes per channel id, handed from the scan to the schedule pass.
pub type ChannelProgrammeIndex = BTreeMap<String, Vec<ProgrammeRecord>>;
