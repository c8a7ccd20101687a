//! The tail → tally → render control loop.
//!
//! Design: one thread owns everything. [`Watcher::run`] alternates between
//! processing one line and idling, and checks its [`StopSignal`] between
//! iterations. Rendering goes through the [`RenderSink`] trait so the loop
//! has no opinion about terminals.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::chart::{ChartView, StackOrder};
use crate::palette::Colorizer;
use crate::record::{DecodeError, Record};
use crate::tail::{LineSource, StartAt};
use crate::tally::{LineOutcome, Tally};

/// How long to wait after a poll finds nothing new.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Granularity at which the default idle wait re-checks the stop signal.
const IDLE_SLICE: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("input file {} does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Settings for one watch session.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub path: PathBuf,
    pub poll_interval: Duration,
    pub start_at: StartAt,
    pub stack_order: StackOrder,
    pub legend_top_first: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/project_live.json"),
            poll_interval: DEFAULT_POLL_INTERVAL,
            start_at: StartAt::End,
            stack_order: StackOrder::Rank,
            legend_top_first: false,
        }
    }
}

// ---------------------------------------------------------------------------
// StopSignal
// ---------------------------------------------------------------------------

/// Shared "please stop" flag. Cheap to clone; safe to raise from a signal
/// handler thread.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// WatchState
// ---------------------------------------------------------------------------

/// Everything the loop accumulates: counts, colors, and the latest record.
#[derive(Debug, Clone, Default)]
pub struct WatchState {
    pub tally: Tally,
    pub colors: Colorizer,
    last: Option<Record>,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest_line(&mut self, line: &str) -> LineOutcome {
        let outcome = self.tally.ingest_line(line, &mut self.colors);
        if let LineOutcome::Applied(record) = &outcome {
            self.last = Some(record.clone());
        }
        outcome
    }

    /// Ingest every line of an already-written stream. Malformed lines are
    /// logged and skipped.
    pub fn ingest_reader<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        for chunk in reader.split(b'\n') {
            let bytes = chunk?;
            let line = String::from_utf8_lossy(&bytes);
            if let LineOutcome::Malformed(e) = self.ingest_line(&line) {
                log::warn!("skipping malformed line ({e}): {}", line.trim());
            }
        }
        Ok(())
    }

    /// The most recently counted record.
    pub fn last_record(&self) -> Option<&Record> {
        self.last.as_ref()
    }

    pub fn view(&self, order: StackOrder) -> ChartView {
        ChartView::build(&self.tally, &self.colors, order)
    }

    pub fn summary(&self) -> WatchSummary {
        WatchSummary {
            records: self.tally.records(),
            malformed: self.tally.malformed(),
            blank: self.tally.blank(),
            authors: self.tally.authors().count(),
            keywords: self.colors.len(),
        }
    }
}

/// Counters reported when a watch ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WatchSummary {
    pub records: u64,
    pub malformed: u64,
    pub blank: u64,
    pub authors: usize,
    pub keywords: usize,
}

// ---------------------------------------------------------------------------
// RenderSink
// ---------------------------------------------------------------------------

/// Receives render triggers from the loop.
pub trait RenderSink {
    /// Called after every record that changed the tally.
    fn render(&mut self, state: &WatchState) -> io::Result<()>;

    /// Called when a poll found nothing. This is the only place the loop
    /// suspends. Implementations must return promptly once `stop` is raised.
    fn idle(
        &mut self,
        _state: &WatchState,
        interval: Duration,
        stop: &StopSignal,
    ) -> io::Result<()> {
        let deadline = Instant::now() + interval;
        while !stop.is_stopped() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(IDLE_SLICE));
        }
        Ok(())
    }

    /// Called for each line that failed to decode.
    fn rejected(&mut self, _line: &str, _err: &DecodeError) {}

    /// Final flush when the loop ends, whether it stopped or failed.
    fn finish(&mut self, state: &WatchState) -> io::Result<()> {
        self.render(state)
    }
}

/// Sink that draws nothing.
#[derive(Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render(&mut self, _state: &WatchState) -> io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Watcher
// ---------------------------------------------------------------------------

pub struct Watcher {
    config: WatchConfig,
    source: LineSource,
    state: WatchState,
}

impl Watcher {
    /// Open the input file. Fails with [`WatchError::MissingInput`] if it
    /// does not exist.
    pub fn new(config: WatchConfig) -> Result<Self, WatchError> {
        let source = LineSource::open(&config.path, config.start_at)?;
        Ok(Self {
            config,
            source,
            state: WatchState::new(),
        })
    }

    /// Poll once. Returns `true` if a line was consumed (whatever became of
    /// it), `false` if nothing new was available.
    pub fn step<S: RenderSink + ?Sized>(&mut self, sink: &mut S) -> Result<bool, WatchError> {
        let Some(line) = self.source.poll_line()? else {
            return Ok(false);
        };
        log::debug!("raw: {}", line.trim());

        match self.state.ingest_line(&line) {
            LineOutcome::Applied(record) => {
                log::debug!(
                    "fields: author={}, keyword={}",
                    record.author,
                    record.keyword
                );
                if let Some(counts) = self.state.tally.author_counts(&record.author) {
                    log::debug!("counts for {}: {counts:?}", record.author);
                }
                sink.render(&self.state)?;
            }
            LineOutcome::Malformed(err) => {
                log::warn!("skipping malformed line ({err}): {}", line.trim());
                sink.rejected(&line, &err);
            }
            LineOutcome::Blank => {}
        }
        Ok(true)
    }

    /// Run until `stop` is raised or an error occurs. The sink's
    /// [`RenderSink::finish`] runs in both cases.
    pub fn run<S: RenderSink + ?Sized>(
        &mut self,
        sink: &mut S,
        stop: &StopSignal,
    ) -> Result<WatchSummary, WatchError> {
        log::info!(
            "waiting for new JSON messages in {}",
            self.source.path().display()
        );

        let result = self.run_loop(sink, stop);
        if let Err(e) = &result {
            log::error!("watch loop stopped: {e}");
        }

        let flushed = sink.finish(&self.state);
        let summary = self.state.summary();
        log::info!(
            "closed after {} records ({} malformed)",
            summary.records,
            summary.malformed
        );

        result?;
        flushed?;
        Ok(summary)
    }

    fn run_loop<S: RenderSink + ?Sized>(
        &mut self,
        sink: &mut S,
        stop: &StopSignal,
    ) -> Result<(), WatchError> {
        while !stop.is_stopped() {
            if !self.step(sink)? {
                sink.idle(&self.state, self.config.poll_interval, stop)?;
            }
        }
        Ok(())
    }

    pub fn state(&self) -> &WatchState {
        &self.state
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }
}
