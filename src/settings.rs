use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::filter::classify::ScanOptions;
use crate::filter::schedule::{GapPolicy, FILLER_TITLE};

const CONFIG_FILE: &str = "epg_filter";
const ENV_PREFIX: &str = "EPG_FILTER";

/// Tunables, layered: defaults < `epg_filter.toml` < `EPG_FILTER_*` env vars.
/// CLI flags are applied on top by `main`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub days_back: u32,
    pub days_forward: u32,
    pub gap_threshold_secs: i64,
    pub filler_title: String,
    pub title_search_lines: usize,
    pub strict: bool,
    pub listing_limit: usize,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::builder()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("days_back", 1_i64)?
            .set_default("days_forward", 4_i64)?
            .set_default("gap_threshold_secs", 60_i64)?
            .set_default("filler_title", FILLER_TITLE)?
            .set_default("title_search_lines", 10_i64)?
            .set_default("strict", false)?
            .set_default("listing_limit", 100_i64)?)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            title_search_lines: self.title_search_lines,
            strict: self.strict,
        }
    }

    pub fn gap_policy(&self) -> GapPolicy {
        GapPolicy {
            threshold_secs: self.gap_threshold_secs,
            filler_title: self.filler_title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s: Settings = Settings::builder()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(s.days_back, 1);
        assert_eq!(s.days_forward, 4);
        assert_eq!(s.gap_threshold_secs, 60);
        assert_eq!(s.filler_title, "Реклама");
        assert_eq!(s.title_search_lines, 10);
        assert!(!s.strict);
        assert_eq!(s.listing_limit, 100);
    }

    #[test]
    fn overrides_win() {
        let s: Settings = Settings::builder()
            .unwrap()
            .set_override("days_forward", 6_i64)
            .unwrap()
            .set_override("strict", true)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(s.days_forward, 6);
        assert!(s.strict);
        assert_eq!(s.gap_policy().threshold_secs, 60);
        assert!(s.scan_options().strict);
    }
}
