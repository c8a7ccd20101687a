use mentionwatch_core::WatchConfig;

pub fn run(config: WatchConfig) {
    let mut watcher = super::open_watcher(config);
    match crate::tui::app::run_dashboard(&mut watcher) {
        Ok(summary) => {
            println!(
                "Closed after {} records from {} authors ({} malformed lines skipped)",
                summary.records, summary.authors, summary.malformed
            );
        }
        Err(e) => {
            eprintln!("TUI error: {e}");
            std::process::exit(1);
        }
    }
}
