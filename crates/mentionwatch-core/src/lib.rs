//! # mentionwatch-core
//!
//! **Who is talking about what, as it happens.**
//!
//! `mentionwatch-core` follows a newline-delimited JSON file as an external
//! producer appends to it, decodes each line into an author/keyword
//! [`Record`], and keeps a running [`Tally`] of keyword mentions per author.
//! Every keyword gets a stable color and rank the first time it is seen, and
//! [`ChartView`] turns the tally into a render-ready stacked bar layout.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mentionwatch_core::{StopSignal, WatchConfig, Watcher, NullSink};
//!
//! let config = WatchConfig {
//!     path: "data/project_live.json".into(),
//!     ..Default::default()
//! };
//! let mut watcher = Watcher::new(config).expect("input file must exist");
//! let stop = StopSignal::new();
//! let summary = watcher.run(&mut NullSink, &stop).unwrap();
//! println!("{} records", summary.records);
//! ```
//!
//! ## Architecture
//!
//! LineSource → decode → Tally (+ Colorizer) → ChartView → RenderSink
//!
//! The loop is single-threaded. The only place it waits is
//! [`RenderSink::idle`], and it ends when its [`StopSignal`] is raised.
//! Rendering is a trait seam, so the same loop drives the terminal dashboard
//! and the headless `follow` mode.

pub mod chart;
pub mod palette;
pub mod record;
pub mod snapshot;
pub mod tail;
pub mod tally;
pub mod watch;

pub use chart::{ChartView, Series, StackOrder};
pub use palette::{Assignment, Colorizer, PALETTE, Rgb};
pub use record::{DecodeError, NONE_KEYWORD, Record, UNKNOWN_AUTHOR};
pub use snapshot::{KeywordEntry, Snapshot, default_snapshot_name};
pub use tail::{LineSource, StartAt};
pub use tally::{LineOutcome, Tally};
pub use watch::{
    DEFAULT_POLL_INTERVAL, NullSink, RenderSink, StopSignal, WatchConfig, WatchError, WatchState,
    WatchSummary, Watcher,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
