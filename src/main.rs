mod error;
mod filter;
mod listing;
mod settings;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use filter::window::{ChannelSelection, DateWindow};
use filter::{FilterJob, FilterOptions};
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "epg_filter",
    about = "Cut an XMLTV guide down to selected channels and a few days around today",
    after_help = "Example: epg_filter epg_lite.xml \"match-tv,match-premier\" output.xml"
)]
struct Cli {
    /// XMLTV guide to read
    input: PathBuf,

    /// Comma-separated channel ids; omit to list the channels in the file
    channels: Option<String>,

    /// Output file (default: filtered_<timestamp>.xml)
    output: Option<PathBuf>,

    /// Day the date window is centred on, YYYY-MM-DD (default: today)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Days before today to keep
    #[arg(long)]
    days_back: Option<u32>,

    /// Days after today to keep
    #[arg(long)]
    days_forward: Option<u32>,

    /// Drop elements cut off by end of file instead of keeping the partial text
    #[arg(long)]
    strict: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;
    if let Some(n) = cli.days_back {
        settings.days_back = n;
    }
    if let Some(n) = cli.days_forward {
        settings.days_forward = n;
    }
    settings.strict |= cli.strict;

    let selection = ChannelSelection::parse(cli.channels.as_deref().unwrap_or_default());
    if selection.is_empty() {
        let listing = listing::list_file(&cli.input, settings.listing_limit)
            .with_context(|| format!("Listing channels in {}", cli.input.display()))?;
        print!("{}", listing);
        return Ok(());
    }

    let output = cli.output.unwrap_or_else(default_output_path);
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let job = FilterJob {
        input: cli.input,
        output,
        options: FilterOptions {
            selection,
            window: DateWindow::around(today, settings.days_back, settings.days_forward),
            scan: settings.scan_options(),
            gaps: settings.gap_policy(),
        },
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Filtering {}", job.input.display()));
    pb.enable_steady_tick(Duration::from_millis(120));
    let result = filter::run(&job);
    pb.finish_and_clear();

    let report = result.with_context(|| format!("Filtering {}", job.input.display()))?;
    report.print();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if report.no_channels_found() {
        println!("ERROR: No channels found from the requested list!");
        println!("Please check channel IDs and try again.");
    } else {
        println!("Successfully created: {}", job.output.display());
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

fn default_output_path() -> PathBuf {
    PathBuf::from(format!("filtered_{}.xml", Local::now().format("%Y%m%d_%H%M%S")))
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_positional_arguments() {
        let cli = Cli::try_parse_from(["epg_filter", "in.xml", "a, b ,", "out.xml", "--today", "2024-01-10"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.xml"));
        assert_eq!(cli.channels.as_deref(), Some("a, b ,"));
        assert_eq!(cli.output, Some(PathBuf::from("out.xml")));
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 1, 10));
        assert!(!cli.strict);
    }

    #[test]
    fn cli_listing_mode() {
        let cli = Cli::try_parse_from(["epg_filter", "in.xml"]).unwrap();
        assert!(cli.channels.is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn default_output_name_shape() {
        let name = default_output_path().to_string_lossy().into_owned();
        assert!(name.starts_with("filtered_"));
        assert!(name.ends_with(".xml"));
        assert_eq!(name.len(), "filtered_20240101_120000.xml".len());
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
