//! Cancellation and deadlines for resolve/fetch calls.
//!
//! A [`Cancellation`] is handed down through resolver, cache and downloader
//! calls. Work is raced against it at every await point that may block on
//! the network or a lock, so a caller can abort an in-flight fetch or bound a
//! whole command with a deadline.

use crate::core::{JarvaultError, JarvaultResult};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Caller side of a cancellation signal
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation to every linked [`Cancellation`]
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

/// Cancellation signal plus an optional deadline
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    signal: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// Never cancelled, no deadline
    pub fn none() -> Self {
        Self::default()
    }

    /// A cancellation that fires when the returned handle is used
    pub fn new() -> (CancelHandle, Self) {
        let (sender, receiver) = watch::channel(false);
        (
            CancelHandle { sender },
            Self {
                signal: Some(receiver),
                deadline: None,
            },
        )
    }

    /// Add a deadline `timeout` from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Add an absolute deadline; the earlier of two deadlines wins
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Fail fast if cancelled or past the deadline
    pub fn check(&self) -> JarvaultResult<()> {
        if self.is_cancelled() {
            return Err(JarvaultError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(JarvaultError::DeadlineExceeded);
            }
        }
        Ok(())
    }

    /// Drive `future` to completion unless cancelled or out of time first
    pub async fn run<F, T>(&self, future: F) -> JarvaultResult<T>
    where
        F: Future<Output = JarvaultResult<T>>,
    {
        self.check()?;

        let cancelled = wait_for_signal(self.signal.clone());
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = future => result,
            _ = cancelled => Err(JarvaultError::Cancelled),
            _ = expired => Err(JarvaultError::DeadlineExceeded),
        }
    }

    /// Sleep for `duration`, waking early with an error on cancellation
    pub async fn sleep(&self, duration: Duration) -> JarvaultResult<()> {
        self.run(async {
            tokio::time::sleep(duration).await;
            Ok(())
        })
        .await
    }
}

async fn wait_for_signal(signal: Option<watch::Receiver<bool>>) {
    match signal {
        Some(mut rx) => {
            if rx.wait_for(|cancelled| *cancelled).await.is_err() {
                // Handle dropped without cancelling: never fires.
                std::future::pending::<()>().await;
            }
        }
        None => std::future::pending::<()>().await,
    }
}
