//! Pieces of the line client shared by the `sparkfuse-client` binary.

use chrono::Local;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Hands lines typed on a blocking stdin thread to the async send loop.
///
/// `put` never blocks, so it is safe from a plain thread; `take` waits until a line arrives and
/// yields `None` once every [`InputSender`] is gone.
pub struct InputQueue {
    rx: UnboundedReceiver<String>,
}

#[derive(Clone)]
pub struct InputSender {
    tx: UnboundedSender<String>,
}

impl InputQueue {
    pub fn new() -> (InputSender, InputQueue) {
        let (tx, rx) = unbounded_channel();
        (InputSender { tx }, InputQueue { rx })
    }

    pub async fn take(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

impl InputSender {
    /// False once the consuming side has gone away.
    pub fn put(&self, line: impl Into<String>) -> bool {
        self.tx.send(line.into()).is_ok()
    }
}

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How a server line is shown: `"<time> ~ msg"` with timestamps, `" ~ msg"` without.
pub fn format_incoming(msg: &str, timestamps: bool) -> String {
    if timestamps {
        format!("{} ~ {msg}", Local::now().format(TIMESTAMP_FORMAT))
    } else {
        format!(" ~ {msg}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lines_arrive_in_order() {
        let (tx, mut queue) = InputQueue::new();
        let producer = std::thread::spawn(move || {
            for line in ["login", "alice", "pw"] {
                assert!(tx.put(line));
            }
        });
        producer.join().unwrap();

        assert_eq!(queue.take().await.as_deref(), Some("login"));
        assert_eq!(queue.take().await.as_deref(), Some("alice"));
        assert_eq!(queue.take().await.as_deref(), Some("pw"));
        assert_eq!(queue.take().await, None);
    }

    #[test]
    fn put_fails_after_consumer_drops() {
        let (tx, queue) = InputQueue::new();
        drop(queue);
        assert!(!tx.put("lost"));
    }

    #[test]
    fn plain_format() {
        assert_eq!(format_incoming("Help Menu", false), " ~ Help Menu");
    }

    #[test]
    fn timestamped_format() {
        let line = format_incoming("Help Menu", true);
        let (stamp, rest) = line.split_once(" ~ ").unwrap();
        assert_eq!(rest, "Help Menu");
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
    }
}
