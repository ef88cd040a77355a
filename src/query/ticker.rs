//! UI clock
//!
//! Publishes "now" on a fixed period so elapsed-time labels stay current.
//! Independent of query polling; never triggers a fetch.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct Ticker {
    receiver: watch::Receiver<DateTime<Utc>>,
    task: JoinHandle<()>,
}

impl Ticker {
    /// Start ticking every `period`. Stops when dropped.
    pub fn start(period: Duration) -> Self {
        let (sender, receiver) = watch::channel(Utc::now());

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;

            loop {
                interval.tick().await;
                if sender.send(Utc::now()).is_err() {
                    break;
                }
            }
        });

        Self { receiver, task }
    }

    /// Latest published time
    pub fn now(&self) -> DateTime<Utc> {
        *self.receiver.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<DateTime<Utc>> {
        self.receiver.clone()
    }

    /// Wait for the next tick
    pub async fn changed(&mut self) {
        if self.receiver.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks() {
        let mut ticker = Ticker::start(Duration::from_millis(1000));
        let mut ticks = 0;

        for _ in 0..3 {
            ticker.changed().await;
            ticks += 1;
        }
        assert_eq!(ticks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticking() {
        let ticker = Ticker::start(Duration::from_millis(1000));
        let mut receiver = ticker.subscribe();
        drop(ticker);

        let result = tokio::time::timeout(Duration::from_secs(10), receiver.changed()).await;
        assert!(matches!(result, Ok(Err(_))));
    }
}
