//! `mentionwatch summarize`: one pass over a finished file.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use mentionwatch_core::{Snapshot, StackOrder, WatchError, WatchState};

use super::format_table;

/// Read `path` from start to end into a fresh state.
pub fn tally_file(path: &Path) -> Result<WatchState, WatchError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(WatchError::MissingInput(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    let mut state = WatchState::new();
    state.ingest_reader(BufReader::new(file))?;
    Ok(state)
}

/// Run the summarize command.
pub fn run(path: &Path, order: StackOrder, json: bool) {
    let state = match tally_file(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        match Snapshot::capture(path, &state, order).to_json() {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    print!("{}", format_table(&state.view(order)));
    let summary = state.summary();
    println!();
    println!(
        "{} records, {} malformed, {} blank",
        summary.records, summary.malformed, summary.blank
    );
}
