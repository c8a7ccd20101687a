//! Dashboard state and event handling.
//!
//! The dashboard is a [`RenderSink`]: the watch loop calls `render` after
//! each counted record, and hands control to `idle` while the file is quiet.
//! Keys are read in both places, so the whole program stays on one thread
//! and `q` still works while a backlog is being replayed.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mentionwatch_core::{
    DecodeError, RenderSink, Snapshot, StackOrder, StopSignal, WatchError, WatchState,
    WatchSummary, Watcher, default_snapshot_name,
};
use ratatui::prelude::*;

use super::ui::{Dashboard, draw};
use crate::commands::format_table;

const KEY_POLL: Duration = Duration::from_millis(50);
const MAX_REJECTED_CHARS: usize = 60;

/// Take over the terminal and run `watcher` until the user quits.
pub fn run_dashboard(watcher: &mut Watcher) -> Result<WatchSummary, WatchError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    // Install panic hook that restores terminal before printing the panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
        original_hook(info);
    }));

    let stop = StopSignal::new();
    let config = watcher.config();
    let mut app = App::new(
        terminal,
        TerminalEvents,
        config.path.clone(),
        config.stack_order,
        config.legend_top_first,
        stop.clone(),
    );

    // First frame before any record arrives.
    let result = match app.render(watcher.state()) {
        Ok(()) => watcher.run(&mut app, &stop),
        Err(e) => Err(e.into()),
    };

    // Always restore terminal, even if the loop returned an error.
    let _ = std::panic::take_hook(); // remove our hook
    disable_raw_mode()?;
    execute!(
        app.terminal.backend_mut(),
        LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;

    // The alternate screen is gone; leave the final tally on the normal one.
    print!("{}", app.closing_report(watcher.state()));

    result
}

/// Where the dashboard reads terminal events from.
pub trait EventSource {
    /// Next event, waiting at most `timeout`. `Duration::ZERO` never blocks.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

/// The real terminal, via crossterm.
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? {
            event::read().map(Some)
        } else {
            Ok(None)
        }
    }
}

pub struct App<B: Backend, E: EventSource> {
    terminal: Terminal<B>,
    events: E,
    source: PathBuf,
    order: StackOrder,
    legend_top_first: bool,
    stop: StopSignal,
    export_dir: PathBuf,
    last_export: Option<PathBuf>,
    export_error: Option<String>,
    last_rejected: Option<String>,
    frames: u64,
    started: Instant,
}

impl<B: Backend, E: EventSource> App<B, E> {
    pub fn new(
        terminal: Terminal<B>,
        events: E,
        source: PathBuf,
        order: StackOrder,
        legend_top_first: bool,
        stop: StopSignal,
    ) -> Self {
        Self {
            terminal,
            events,
            source,
            order,
            legend_top_first,
            stop,
            export_dir: PathBuf::from("."),
            last_export: None,
            export_error: None,
            last_rejected: None,
            frames: 0,
            started: Instant::now(),
        }
    }

    /// Directory `s` writes snapshots into. Defaults to the working directory.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Apply one key. Returns `true` when the screen needs a redraw.
    pub fn handle_key(&mut self, key: KeyEvent, state: &WatchState) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.stop.stop();
                false
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.stop.stop();
                false
            }
            KeyCode::Char('o') => {
                self.order = self.order.toggle();
                true
            }
            KeyCode::Char('l') => {
                self.legend_top_first = !self.legend_top_first;
                true
            }
            KeyCode::Char('s') => {
                self.export_snapshot(state);
                true
            }
            _ => false,
        }
    }

    fn handle_event(&mut self, ev: Event, state: &WatchState) -> io::Result<()> {
        match ev {
            Event::Key(key) => {
                if self.handle_key(key, state) {
                    self.draw(state)?;
                }
            }
            Event::Resize(_, _) => self.draw(state)?,
            _ => {}
        }
        Ok(())
    }

    /// Apply every event already queued, without waiting. Stops early once
    /// a quit key has been seen.
    pub fn drain_events(&mut self, state: &WatchState) -> io::Result<()> {
        while !self.stop.is_stopped() {
            let Some(ev) = self.events.next_event(Duration::ZERO)? else {
                break;
            };
            self.handle_event(ev, state)?;
        }
        Ok(())
    }

    /// Text printed after the terminal is restored: the final table in the
    /// order last shown, and where the last snapshot went.
    pub fn closing_report(&self, state: &WatchState) -> String {
        let mut out = format_table(&state.view(self.order));
        if let Some(path) = &self.last_export {
            out.push_str(&format!("Snapshot saved to {}\n", path.display()));
        }
        out
    }

    fn export_snapshot(&mut self, state: &WatchState) {
        let path = self.export_dir.join(default_snapshot_name());
        match Snapshot::capture(&self.source, state, self.order).write_to(&path) {
            Ok(()) => {
                log::info!("snapshot saved to {}", path.display());
                self.last_export = Some(path);
                self.export_error = None;
            }
            Err(e) => {
                log::warn!("snapshot to {} failed: {e}", path.display());
                self.export_error = Some(e.to_string());
            }
        }
    }

    fn draw(&mut self, state: &WatchState) -> io::Result<()> {
        self.frames += 1;
        let view = state.view(self.order);
        let dash = Dashboard {
            view: &view,
            source: &self.source,
            order: self.order,
            legend_top_first: self.legend_top_first,
            summary: state.summary(),
            last_record: state.last_record(),
            last_rejected: self.last_rejected.as_deref(),
            last_export: self.last_export.as_deref(),
            export_error: self.export_error.as_deref(),
            uptime: self.started.elapsed(),
        };
        self.terminal.draw(|f| draw(f, &dash))?;
        Ok(())
    }

    // --- Public accessors ---

    pub fn order(&self) -> StackOrder {
        self.order
    }
    pub fn legend_top_first(&self) -> bool {
        self.legend_top_first
    }
    pub fn last_export(&self) -> Option<&Path> {
        self.last_export.as_deref()
    }
    pub fn export_error(&self) -> Option<&str> {
        self.export_error.as_deref()
    }
    pub fn last_rejected(&self) -> Option<&str> {
        self.last_rejected.as_deref()
    }
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl<B: Backend, E: EventSource> RenderSink for App<B, E> {
    fn render(&mut self, state: &WatchState) -> io::Result<()> {
        self.draw(state)?;
        self.drain_events(state)
    }

    fn idle(&mut self, state: &WatchState, interval: Duration, stop: &StopSignal) -> io::Result<()> {
        let deadline = Instant::now() + interval;
        loop {
            let wait = deadline.saturating_duration_since(Instant::now()).min(KEY_POLL);
            if let Some(ev) = self.events.next_event(wait)? {
                self.handle_event(ev, state)?;
            }
            if stop.is_stopped() || Instant::now() >= deadline {
                return Ok(());
            }
        }
    }

    fn rejected(&mut self, line: &str, err: &DecodeError) {
        self.last_rejected = Some(clip(&format!("{err}: {}", line.trim()), MAX_REJECTED_CHARS));
    }

    fn finish(&mut self, state: &WatchState) -> io::Result<()> {
        self.draw(state)
    }
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
