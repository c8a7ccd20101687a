//! `mentionwatch follow`: headless tailing with log output.

use std::io::{self, Write};
use std::path::Path;

use mentionwatch_core::{
    RenderSink, Snapshot, StackOrder, StopSignal, WatchConfig, WatchState,
};

use super::{format_table, install_ctrlc, open_watcher};

/// Logs every counted record and prints the table when the watch ends.
pub struct FollowSink<W: Write> {
    order: StackOrder,
    out: W,
}

impl<W: Write> FollowSink<W> {
    pub fn new(order: StackOrder, out: W) -> Self {
        Self { order, out }
    }
}

impl<W: Write> RenderSink for FollowSink<W> {
    fn render(&mut self, state: &WatchState) -> io::Result<()> {
        if let Some(record) = state.last_record() {
            log::info!(
                "{} mentioned {} ({} so far)",
                record.author,
                record.keyword,
                state.tally.count(&record.author, &record.keyword)
            );
        }
        Ok(())
    }

    fn finish(&mut self, state: &WatchState) -> io::Result<()> {
        writeln!(self.out)?;
        write!(self.out, "{}", format_table(&state.view(self.order)))?;
        self.out.flush()
    }
}

/// Run the follow command.
pub fn run(config: WatchConfig, snapshot: Option<&Path>) {
    let order = config.stack_order;
    let path = config.path.clone();
    let mut watcher = open_watcher(config);

    let stop = StopSignal::new();
    install_ctrlc(&stop);

    println!("Following {}", path.display());
    println!("  Order:    {}", order.label());
    println!("  Stop:     Ctrl+C");
    println!();

    let mut sink = FollowSink::new(order, io::stdout());
    let result = watcher.run(&mut sink, &stop);

    if let Some(out) = snapshot {
        match Snapshot::capture(&path, watcher.state(), order).write_to(out) {
            Ok(()) => println!("Snapshot saved to {}", out.display()),
            Err(e) => eprintln!("Error writing snapshot: {e}"),
        }
    }

    match result {
        Ok(summary) => {
            println!(
                "{} records from {} authors, {} keywords ({} malformed lines skipped)",
                summary.records, summary.authors, summary.keywords, summary.malformed
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
