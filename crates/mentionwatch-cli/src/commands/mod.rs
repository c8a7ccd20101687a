pub mod follow;
pub mod summarize;
pub mod watch;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mentionwatch_core::{ChartView, StackOrder, StartAt, StopSignal, WatchConfig, Watcher};

/// Parse a stack order string into the enum.
pub fn parse_order(s: &str) -> StackOrder {
    match s {
        "rank" | "first-seen" => StackOrder::Rank,
        "alpha" | "alphabetical" => StackOrder::Alphabetical,
        _ => {
            eprintln!("Unknown order '{s}', using rank");
            StackOrder::Rank
        }
    }
}

/// Map CLI flags onto a [`WatchConfig`].
pub fn watch_config(
    path: PathBuf,
    poll_ms: u64,
    from_start: bool,
    order: &str,
    legend_top_first: bool,
) -> WatchConfig {
    WatchConfig {
        path,
        poll_interval: Duration::from_millis(poll_ms),
        start_at: if from_start {
            StartAt::Beginning
        } else {
            StartAt::End
        },
        stack_order: parse_order(order),
        legend_top_first,
    }
}

/// Initialise `env_logger`. `RUST_LOG` wins over `default_filter`. With a
/// `log_file`, output goes there instead of stderr.
pub fn init_logger(default_filter: &str, log_file: Option<&Path>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        match File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Warning: cannot open log file {}: {e}", path.display());
                return;
            }
        }
    }
    let _ = builder.try_init();
}

/// Open the input, or exit with status 1 if that is impossible.
pub fn open_watcher(config: WatchConfig) -> Watcher {
    match Watcher::new(config) {
        Ok(w) => w,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Raise `stop` on Ctrl+C.
pub fn install_ctrlc(stop: &StopSignal) {
    let s = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || s.stop()) {
        eprintln!("Warning: could not install Ctrl+C handler: {e}");
    }
}

/// Plain-text table: one row per author, one column per keyword in stack
/// order, plus a total column.
pub fn format_table(view: &ChartView) -> String {
    if view.is_empty() {
        return "(no records yet)\n".to_string();
    }

    let totals = view.totals();
    let mut header = vec!["author".to_string()];
    header.extend(view.series.iter().map(|s| s.keyword.clone()));
    header.push("total".to_string());

    let mut rows = vec![header];
    for (i, author) in view.authors.iter().enumerate() {
        let mut row = vec![author.clone()];
        row.extend(view.series.iter().map(|s| s.values[i].to_string()));
        row.push(totals[i].to_string());
        rows.push(row);
    }

    let widths: Vec<usize> = (0..rows[0].len())
        .map(|c| rows.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(c, cell)| {
                if c == 0 {
                    format!("{cell:<w$}", w = widths[c])
                } else {
                    format!("{cell:>w$}", w = widths[c])
                }
            })
            .collect();
        out.push_str(&cells.join("  "));
        out.push('\n');
    }
    out
}
