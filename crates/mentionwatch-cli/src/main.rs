//! CLI for mentionwatch: who is talking about what, as it happens.

mod commands;
mod tui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mentionwatch")]
#[command(about = "mentionwatch: live keyword mentions per author from a JSON-lines feed")]
#[command(version = mentionwatch_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live stacked bar chart of keyword mentions per author (TUI)
    Watch {
        /// JSON-lines file another process is appending to
        path: PathBuf,

        /// Wait between polls when no new line is available, in milliseconds
        #[arg(long, default_value = "250")]
        poll_ms: u64,

        /// Replay lines already in the file before following new ones
        #[arg(long)]
        from_start: bool,

        /// Keyword stacking order: rank (first seen) or alpha
        #[arg(long, default_value = "rank", value_parser = ["rank", "alpha"])]
        order: String,

        /// List the legend top segment first
        #[arg(long)]
        legend_top_first: bool,

        /// Write log output to this file (the dashboard owns the terminal)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Follow the file without a dashboard; print the table on Ctrl+C
    Follow {
        /// JSON-lines file another process is appending to
        path: PathBuf,

        /// Wait between polls when no new line is available, in milliseconds
        #[arg(long, default_value = "250")]
        poll_ms: u64,

        /// Replay lines already in the file before following new ones
        #[arg(long)]
        from_start: bool,

        /// Keyword column order: rank (first seen) or alpha
        #[arg(long, default_value = "rank", value_parser = ["rank", "alpha"])]
        order: String,

        /// Write a JSON snapshot of the final tally to this path on exit
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Tally a finished file once and print the result
    Summarize {
        /// JSON-lines file to read from start to end
        path: PathBuf,

        /// Keyword column order: rank (first seen) or alpha
        #[arg(long, default_value = "rank", value_parser = ["rank", "alpha"])]
        order: String,

        /// Print a JSON snapshot instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            path,
            poll_ms,
            from_start,
            order,
            legend_top_first,
            log_file,
        } => {
            if let Some(log_path) = log_file.as_deref() {
                commands::init_logger("info", Some(log_path));
            }
            commands::watch::run(commands::watch_config(
                path,
                poll_ms,
                from_start,
                &order,
                legend_top_first,
            ))
        }
        Commands::Follow {
            path,
            poll_ms,
            from_start,
            order,
            snapshot,
        } => {
            commands::init_logger("info", None);
            commands::follow::run(
                commands::watch_config(path, poll_ms, from_start, &order, false),
                snapshot.as_deref(),
            )
        }
        Commands::Summarize { path, order, json } => {
            commands::init_logger("warn", None);
            commands::summarize::run(&path, commands::parse_order(&order), json)
        }
    }
}
