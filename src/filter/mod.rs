pub mod attrs;
pub mod classify;
pub mod emit;
pub mod entities;
pub mod model;
pub mod reader;
pub mod schedule;
pub mod window;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{FilterError, Result};
use classify::ScanOptions;
use emit::DocumentEmitter;
use model::ProgrammeRecord;
use reader::{ElementSource, LineReader};
use schedule::GapPolicy;
use window::{ChannelSelection, DateWindow};

/// Everything a run needs besides the streams themselves.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub selection: ChannelSelection,
    pub window: DateWindow,
    pub scan: ScanOptions,
    pub gaps: GapPolicy,
}

#[derive(Debug, Clone)]
pub struct FilterJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: FilterOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSummary {
    pub channel: String,
    pub matched: usize,
    pub written: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub lines: usize,
    pub channels_requested: usize,
    pub channels_matched: usize,
    /// In-window programmes collected before gap filling.
    pub programmes_matched: usize,
    /// Programmes written, fillers included.
    pub programmes_written: usize,
    pub fillers: usize,
    pub programmes_out_of_window: usize,
    pub programmes_malformed: usize,
    /// Matched programmes dropped because their channel block was never written.
    pub programmes_orphaned: usize,
    pub truncated: usize,
    pub channels: Vec<ChannelSummary>,
}

impl RunReport {
    /// None of the requested channels were in the input. The output is still
    /// a closed, empty `<tv>` document; this is not an error.
    pub fn no_channels_found(&self) -> bool {
        self.channels_matched == 0
    }

    pub fn print(&self) {
        println!("\nProcessing complete:");
        println!("Lines processed: {}", self.lines);
        println!("Channels found: {}/{}", self.channels_matched, self.channels_requested);
        println!(
            "Programmes found: {} ({} matched, {} fillers)",
            self.programmes_written, self.programmes_matched, self.fillers
        );
        if self.truncated > 0 {
            println!("Truncated elements: {}", self.truncated);
        }
        if self.programmes_orphaned > 0 {
            println!("Programmes without a channel block: {}", self.programmes_orphaned);
        }
    }
}

/// Scan, normalise and emit. `out` receives a complete document even when
/// nothing matched.
pub fn filter<S, W>(source: &mut S, out: W, opts: &FilterOptions) -> Result<RunReport>
where
    S: ElementSource,
    W: Write,
{
    let mut emitter = DocumentEmitter::new(out)?;

    // Pass 1: channels go straight to the output, programmes are collected
    let scanned = classify::scan(source, &opts.selection, &opts.window, opts.scan, |block| {
        emitter.write_channel(block)
    })?;

    let mut report = RunReport {
        lines: scanned.stats.lines,
        channels_requested: opts.selection.len(),
        channels_matched: scanned.stats.channels_matched,
        programmes_matched: scanned.stats.programmes_matched,
        programmes_out_of_window: scanned.stats.programmes_out_of_window,
        programmes_malformed: scanned.stats.programmes_malformed,
        truncated: scanned.stats.truncated,
        ..RunReport::default()
    };

    // Pass 2: sort + gap fill per channel; only channels whose block was written
    let written_channels = scanned.channels_written;
    let normalized: Vec<(String, usize, Vec<ProgrammeRecord>)> = scanned
        .programmes
        .into_iter()
        .filter(|(channel, programmes)| {
            if written_channels.contains(channel) {
                return true;
            }
            warn!(
                "Channel {}: {} programmes dropped, no channel block in output",
                channel,
                programmes.len()
            );
            report.programmes_orphaned += programmes.len();
            false
        })
        .map(|(channel, programmes)| {
            let matched = programmes.len();
            (channel, matched, schedule::normalize(programmes, &opts.gaps))
        })
        .collect();

    for (channel, matched, programmes) in normalized {
        let written = emitter.write_programmes(&channel, &programmes)?;
        info!(
            "Channel {}: {} programmes -> {} after gap filling",
            channel, matched, written
        );
        report.programmes_written += written;
        report.fillers += written - matched;
        report.channels.push(ChannelSummary {
            channel,
            matched,
            written,
        });
    }

    emitter.finish()?;

    if report.no_channels_found() {
        warn!("No channels found from the requested list");
    }
    Ok(report)
}

/// File-level entry point. Opening either file is the only fatal failure
/// besides I/O errors mid-stream.
pub fn run(job: &FilterJob) -> Result<RunReport> {
    if !job.input.exists() {
        return Err(FilterError::InputMissing(job.input.clone()));
    }

    info!("Filtering channels: {}", job.options.selection.sorted().join(","));
    info!(
        "Filtering dates ({} days): {}",
        job.options.window.len(),
        job.options.window.days().collect::<Vec<_>>().join(", ")
    );

    let input = File::open(&job.input).map_err(|source| FilterError::OpenInput {
        path: job.input.clone(),
        source,
    })?;
    let output = File::create(&job.output).map_err(|source| FilterError::CreateOutput {
        path: job.output.clone(),
        source,
    })?;

    let mut source = LineReader::new(BufReader::new(input));
    filter(&mut source, BufWriter::new(output), &job.options)
}
