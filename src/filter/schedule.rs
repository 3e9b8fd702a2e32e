//! Pass two: order each channel's programmes and plug the holes between them.

use chrono::NaiveDateTime;

use super::model::ProgrammeRecord;

pub const FILLER_TITLE: &str = "Реклама";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Clone)]
pub struct GapPolicy {
    /// Gaps strictly longer than this are filled.
    pub threshold_secs: i64,
    pub filler_title: String,
}

impl Default for GapPolicy {
    fn default() -> Self {
        GapPolicy {
            threshold_secs: 60,
            filler_title: FILLER_TITLE.to_string(),
        }
    }
}

/// Parse the first 14 characters as `YYYYMMDDhhmmss`; any suffix (timezone)
/// is ignored. `None` for short or non-numeric input.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let head = s.get(..14)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(head, TIMESTAMP_FORMAT).ok()
}

/// Stable sort by the start string. Fixed-width numeric timestamps make
/// lexicographic order chronological.
pub fn sort_by_start(programmes: &mut [ProgrammeRecord]) {
    programmes.sort_by(|a, b| a.start.cmp(&b.start));
}

/// Insert a filler after every programme whose successor starts more than
/// `threshold_secs` after it stops. The filler reuses the neighbours' own
/// timestamp strings, timezone suffix included. Pairs with an unparseable
/// timestamp are left as they are.
pub fn fill_gaps(programmes: Vec<ProgrammeRecord>, policy: &GapPolicy) -> Vec<ProgrammeRecord> {
    let mut out = Vec::with_capacity(programmes.len() * 2);
    let mut iter = programmes.into_iter().peekable();

    while let Some(current) = iter.next() {
        let filler = iter
            .peek()
            .and_then(|next| filler_between(&current, next, policy));
        out.push(current);
        if let Some(filler) = filler {
            out.push(filler);
        }
    }

    out
}

fn filler_between(
    current: &ProgrammeRecord,
    next: &ProgrammeRecord,
    policy: &GapPolicy,
) -> Option<ProgrammeRecord> {
    let end = parse_timestamp(&current.stop)?;
    let next_start = parse_timestamp(&next.start)?;
    if (next_start - end).num_seconds() <= policy.threshold_secs {
        return None;
    }
    Some(ProgrammeRecord::new(
        current.stop.clone(),
        next.start.clone(),
        policy.filler_title.clone(),
    ))
}

/// Sort then gap-fill one channel's programmes.
pub fn normalize(mut programmes: Vec<ProgrammeRecord>, policy: &GapPolicy) -> Vec<ProgrammeRecord> {
    sort_by_start(&mut programmes);
    fill_gaps(programmes, policy)
}
