//! Integration tests for mentionwatch-core.
//!
//! These drive a real file through the full pipeline:
//! append → tail → decode → tally → chart view → snapshot.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use mentionwatch_core::{
    ChartView, NONE_KEYWORD, RenderSink, Snapshot, StackOrder, StartAt, StopSignal,
    UNKNOWN_AUTHOR, WatchConfig, WatchState, Watcher,
};

fn append(path: &Path, text: &str) {
    let mut f = OpenOptions::new().append(true).open(path).unwrap();
    f.write_all(text.as_bytes()).unwrap();
}

/// Keeps every view it was asked to render.
struct ViewLog {
    views: Vec<ChartView>,
    finished: Option<ChartView>,
    stop_after: usize,
    stop: StopSignal,
}

impl RenderSink for ViewLog {
    fn render(&mut self, state: &WatchState) -> io::Result<()> {
        self.views.push(state.view(StackOrder::Rank));
        if self.views.len() >= self.stop_after {
            self.stop.stop();
        }
        Ok(())
    }

    fn finish(&mut self, state: &WatchState) -> io::Result<()> {
        self.finished = Some(state.view(StackOrder::Rank));
        Ok(())
    }
}

#[test]
fn producer_thread_feeds_live_chart() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("project_live.json");
    std::fs::write(&path, "{\"author\":\"before-start\",\"keyword_mentioned\":\"ignored\"}\n").unwrap();

    let config = WatchConfig {
        path: path.clone(),
        poll_interval: Duration::from_millis(2),
        ..Default::default()
    };
    let mut watcher = Watcher::new(config).unwrap();

    let producer_path = path.clone();
    let producer = thread::spawn(move || {
        let lines = [
            "{\"author\":\"Eve\",\"keyword_mentioned\":\"rust\"}\n",
            "not-json\n",
            "{\"author\":\"Bob\",\"keyword_mentioned\":\"python\"}\n",
            "\n",
            "{\"author\":\"Eve\",\"keyword_mentioned\":\"rust\"}\n",
            "{\"keyword_mentioned\":\"go\"}\n",
            "{\"author\":\"Bob\",\"keyword_mentioned\":\"\"}\n",
        ];
        for line in lines {
            // Split each line in two writes to exercise partial-line handling.
            let (head, tail) = line.split_at(line.len() / 2);
            append(&producer_path, head);
            thread::sleep(Duration::from_millis(3));
            append(&producer_path, tail);
        }
    });

    let stop = StopSignal::new();
    let mut sink = ViewLog {
        views: Vec::new(),
        finished: None,
        stop_after: 5,
        stop: stop.clone(),
    };
    let summary = watcher.run(&mut sink, &stop).unwrap();
    producer.join().unwrap();

    assert_eq!(summary.records, 5);
    assert_eq!(summary.malformed, 1);
    assert_eq!(sink.views.len(), 5);

    let last = sink.finished.expect("finish must run");
    assert_eq!(last.authors, vec!["Bob", "Eve", UNKNOWN_AUTHOR]);
    let keywords: Vec<&str> = last.series.iter().map(|s| s.keyword.as_str()).collect();
    assert_eq!(keywords, vec!["rust", "python", "go", NONE_KEYWORD]);
    assert_eq!(last.series[0].values, vec![0, 2, 0]);
    assert_eq!(last.series[3].values, vec![1, 0, 0]);

    let tally = &watcher.state().tally;
    assert_eq!(tally.count("before-start", "ignored"), 0);
    assert_eq!(tally.count("Eve", "rust"), 2);
}

#[test]
fn colors_never_change_once_assigned() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("live.json");
    std::fs::write(&path, "").unwrap();
    let mut watcher = Watcher::new(WatchConfig {
        path: path.clone(),
        ..Default::default()
    })
    .unwrap();

    let mut sink = mentionwatch_core::NullSink;
    append(&path, "{\"author\":\"A\",\"keyword_mentioned\":\"k1\"}\n");
    while watcher.step(&mut sink).unwrap() {}
    let first = watcher.state().colors.get("k1").unwrap();

    for i in 0..30 {
        append(&path, &format!("{{\"author\":\"A\",\"keyword_mentioned\":\"k{i}\"}}\n"));
    }
    while watcher.step(&mut sink).unwrap() {}

    assert_eq!(watcher.state().colors.get("k1").unwrap(), first);
    assert_eq!(watcher.state().colors.len(), 30);
}

#[test]
fn replay_from_start_then_snapshot() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("live.json");
    std::fs::write(
        &path,
        "{\"author\":\"A\",\"keyword_mentioned\":\"x\"}\n{\"author\":\"A\",\"keyword_mentioned\":\"x\"}\n{\"author\":\"B\"}\n",
    )
    .unwrap();

    let mut watcher = Watcher::new(WatchConfig {
        path: path.clone(),
        start_at: StartAt::Beginning,
        ..Default::default()
    })
    .unwrap();
    while watcher.step(&mut mentionwatch_core::NullSink).unwrap() {}

    let out = tmp.path().join("snap.json");
    Snapshot::capture(&path, watcher.state(), StackOrder::Rank)
        .write_to(&out)
        .unwrap();
    let snap = Snapshot::read_from(&out).unwrap();
    assert_eq!(snap.authors["A"]["x"], 2);
    assert_eq!(snap.authors["B"][NONE_KEYWORD], 1);
    assert_eq!(snap.records, 3);
}
