//! Clock backend: a ticker task on the shared runtime.

use std::sync::mpsc::Sender;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::Waker;

/// Messages sent from the ticker back to the UI thread
#[derive(Debug, Clone, Copy)]
pub enum ClockServiceMessage {
    Tick(DateTime<Local>),
}

/// Handle to a running ticker. Dropping it stops the task.
#[derive(Debug)]
pub struct ClockTicker {
    cancel: CancellationToken,
}

impl ClockTicker {
    /// Send a `Tick` every `period`, the first one immediately.
    pub fn start(
        tx: Sender<ClockServiceMessage>,
        runtime: &tokio::runtime::Handle,
        waker: Waker,
        period: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(ClockServiceMessage::Tick(Local::now())).is_err() {
                            break;
                        }
                        waker();
                    }
                }
            }
            tracing::debug!("Clock ticker stopped");
        });

        Self { cancel }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
