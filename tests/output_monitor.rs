mod common;
use crate::common::{TestResult, with_timeout};

use apptest::exec::{MonitorRead, OutputMonitor};

async fn read_all(bytes: &[u8]) -> std::io::Result<Vec<MonitorRead>> {
    let mut monitor = OutputMonitor::new(bytes);
    let mut reads = Vec::new();
    loop {
        let read = monitor.next_line().await?;
        let done = read == MonitorRead::Exhausted;
        reads.push(read);
        if done {
            assert!(monitor.is_exhausted());
            return Ok(reads);
        }
    }
}

fn line(text: &str) -> MonitorRead {
    MonitorRead::Line(text.to_string())
}

#[tokio::test]
async fn lines_are_yielded_in_order() -> TestResult {
    let reads = with_timeout(read_all(b"ready\nframe 1\nframe 2\n")).await?;

    assert_eq!(
        reads,
        vec![
            line("ready"),
            line("frame 1"),
            line("frame 2"),
            MonitorRead::Exhausted,
        ]
    );
    Ok(())
}

#[tokio::test]
async fn final_line_without_newline_is_kept() -> TestResult {
    let reads = with_timeout(read_all(b"first\nlast")).await?;

    assert_eq!(
        reads,
        vec![line("first"), line("last"), MonitorRead::Exhausted]
    );
    Ok(())
}

#[tokio::test]
async fn blank_lines_and_carriage_returns() -> TestResult {
    let reads = with_timeout(read_all(b"a\r\n\n\r\nb\n")).await?;

    assert_eq!(
        reads,
        vec![
            line("a"),
            MonitorRead::Blank,
            MonitorRead::Blank,
            line("b"),
            MonitorRead::Exhausted,
        ]
    );
    Ok(())
}

#[tokio::test]
async fn invalid_utf8_is_replaced() -> TestResult {
    let reads = with_timeout(read_all(b"ok \xff\xfe bytes\n")).await?;

    assert_eq!(
        reads,
        vec![line("ok \u{FFFD}\u{FFFD} bytes"), MonitorRead::Exhausted]
    );
    Ok(())
}

#[tokio::test]
async fn empty_stream_is_exhausted_immediately() -> TestResult {
    let mut monitor = OutputMonitor::new(&b""[..]);
    assert!(!monitor.is_exhausted());

    let read = with_timeout(monitor.next_line()).await?;

    assert_eq!(read, MonitorRead::Exhausted);
    assert!(monitor.is_exhausted());
    Ok(())
}
