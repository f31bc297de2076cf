//! Log tailer behaviour against real files.

mod common;

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use common::*;
use opsdeck::delivery::{delivery_channel, NoticeLevel, UiEvent};
use opsdeck::logtail::{LogTailer, TailConfig};
use tempfile::tempdir;

fn append(path: &Path, text: &str) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
}

#[tokio::test]
async fn test_existing_content_is_not_replayed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ops.log");
    std::fs::write(&path, "old 1\nold 2\n").unwrap();

    let (tx, mut rx) = delivery_channel(32);
    let mut tailer = LogTailer::start(&path, tx, fast_tail()).await.unwrap();

    append(&path, "new 1\nnew 2\n");
    let lines = collect_log_lines(&mut rx, 2).await;

    assert_eq!(lines, vec!["new 1", "new 2"]);
    tailer.stop().await.unwrap();
}

#[tokio::test]
async fn test_consecutive_duplicates_collapse() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ops.log");
    File::create(&path).unwrap();

    let (tx, mut rx) = delivery_channel(32);
    let mut tailer = LogTailer::start(&path, tx, fast_tail()).await.unwrap();

    append(&path, "a\na\na\nb\na\n");
    let lines = collect_log_lines(&mut rx, 3).await;

    assert_eq!(lines, vec!["a", "b", "a"]);
    assert!(recv_within(&mut rx, Duration::from_millis(150)).await.is_none());
    tailer.stop().await.unwrap();
}

#[tokio::test]
async fn test_trailing_whitespace_is_stripped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ops.log");
    File::create(&path).unwrap();

    let (tx, mut rx) = delivery_channel(32);
    let mut tailer = LogTailer::start(&path, tx, fast_tail()).await.unwrap();

    append(&path, "  padded \t\r\n");
    assert_eq!(collect_log_lines(&mut rx, 1).await, vec!["  padded"]);
    tailer.stop().await.unwrap();
}

#[tokio::test]
async fn test_partial_line_waits_for_newline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ops.log");
    File::create(&path).unwrap();

    let (tx, mut rx) = delivery_channel(32);
    let mut tailer = LogTailer::start(&path, tx, fast_tail()).await.unwrap();

    append(&path, "half a ");
    assert!(
        recv_within(&mut rx, Duration::from_millis(200)).await.is_none(),
        "an unterminated line must not be delivered"
    );

    append(&path, "line\n");
    assert_eq!(collect_log_lines(&mut rx, 1).await, vec!["half a line"]);
    tailer.stop().await.unwrap();
}

#[tokio::test]
async fn test_size_cap_flushes_before_timer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ops.log");
    File::create(&path).unwrap();

    let config = TailConfig::default()
        .with_poll_interval(Duration::from_millis(20))
        .with_flush_interval(Duration::from_secs(60))
        .with_max_batch_size(3);
    let (tx, mut rx) = delivery_channel(32);
    let mut tailer = LogTailer::start(&path, tx, config).await.unwrap();

    append(&path, "1\n2\n3\n4\n5\n6\n7\n");

    for expected in [["1", "2", "3"], ["4", "5", "6"]] {
        match recv_within(&mut rx, EVENT_TIMEOUT).await {
            Some(UiEvent::LogLines(batch)) => assert_eq!(batch.lines(), expected),
            other => panic!("expected a full batch, got {:?}", other),
        }
    }
    assert!(recv_within(&mut rx, Duration::from_millis(150)).await.is_none());

    // The remainder goes out with the final flush.
    tailer.stop().await.unwrap();
    match rx.drain().as_slice() {
        [UiEvent::LogLines(batch)] => assert_eq!(batch.lines(), ["7"]),
        other => panic!("expected the final flush, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timer_flushes_small_batch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ops.log");
    File::create(&path).unwrap();

    let (tx, mut rx) = delivery_channel(32);
    let mut tailer = LogTailer::start(&path, tx, fast_tail()).await.unwrap();

    append(&path, "only one\nand two\n");
    match recv_within(&mut rx, EVENT_TIMEOUT).await {
        Some(UiEvent::LogLines(batch)) => assert_eq!(batch.lines(), ["only one", "and two"]),
        other => panic!("expected a timed flush, got {:?}", other),
    }
    tailer.stop().await.unwrap();
}

#[tokio::test]
async fn test_truncation_restarts_from_beginning() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ops.log");
    std::fs::write(&path, "history that will be truncated\n").unwrap();

    let (tx, mut rx) = delivery_channel(32);
    let mut tailer = LogTailer::start(&path, tx, fast_tail()).await.unwrap();

    append(&path, "before\n");
    assert_eq!(collect_log_lines(&mut rx, 1).await, vec!["before"]);

    OpenOptions::new().write(true).open(&path).unwrap().set_len(0).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    append(&path, "after\n");

    assert_eq!(collect_log_lines(&mut rx, 1).await, vec!["after"]);
    assert!(tailer.is_running());
    tailer.stop().await.unwrap();
}

#[tokio::test]
async fn test_deleted_file_reports_once_and_stops() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ops.log");
    File::create(&path).unwrap();

    let (tx, mut rx) = delivery_channel(32);
    let mut tailer = LogTailer::start(&path, tx, fast_tail()).await.unwrap();

    std::fs::remove_file(&path).unwrap();

    match recv_within(&mut rx, EVENT_TIMEOUT).await {
        Some(UiEvent::Notice(notice)) => assert_eq!(notice.level, NoticeLevel::Error),
        other => panic!("expected an error notice, got {:?}", other),
    }
    assert!(recv_within(&mut rx, Duration::from_millis(200)).await.is_none());
    assert!(!tailer.is_running());

    tailer.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_is_prompt_with_long_flush_interval() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ops.log");
    File::create(&path).unwrap();

    let config = TailConfig::default().with_flush_interval(Duration::from_secs(60));
    let (tx, _rx) = delivery_channel(4);
    let mut tailer = LogTailer::start(&path, tx, config).await.unwrap();

    let started = std::time::Instant::now();
    tailer.stop().await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(500));
    assert!(!tailer.is_running());
}

#[tokio::test]
async fn test_start_on_missing_file_is_fatal() {
    let dir = tempdir().unwrap();
    let (tx, _rx) = delivery_channel(4);

    let err = LogTailer::start(dir.path().join("absent.log"), tx, fast_tail())
        .await
        .err()
        .expect("missing file must fail");
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_repeat_across_truncation_is_not_delivered_twice() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ops.log");
    File::create(&path).unwrap();

    let (tx, mut rx) = delivery_channel(32);
    let mut tailer = LogTailer::start(&path, tx, fast_tail()).await.unwrap();

    append(&path, "same\n");
    assert_eq!(collect_log_lines(&mut rx, 1).await, vec!["same"]);

    OpenOptions::new().write(true).open(&path).unwrap().set_len(0).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    append(&path, "same\nnext\n");

    assert_eq!(collect_log_lines(&mut rx, 1).await, vec!["next"]);
    tailer.stop().await.unwrap();
}

#[tokio::test]
async fn test_zero_intervals_still_tail() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ops.log");
    File::create(&path).unwrap();

    let config = TailConfig::default()
        .with_poll_interval(Duration::ZERO)
        .with_flush_interval(Duration::ZERO);
    let (tx, mut rx) = delivery_channel(32);
    let mut tailer = LogTailer::start(&path, tx, config).await.unwrap();

    append(&path, "still alive\n");
    assert_eq!(collect_log_lines(&mut rx, 1).await, vec!["still alive"]);
    assert!(tailer.is_running());
    tailer.stop().await.unwrap();
}
