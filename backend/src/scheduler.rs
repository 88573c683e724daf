//! Background job scheduler.
//!
//! A small ticking task runner for the recurring sweeps (alert monitor,
//! forecast engine). Jobs are plain async closures, so the job bodies are
//! invoked directly in tests without waiting on real time; this runner only
//! adds cadence, serialization and shutdown.
//!
//! Ticks for one job never overlap: the next tick is not polled until the
//! current run finishes, and missed ticks are delayed rather than bursted,
//! so a slow run cannot make ticks pile up.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct Scheduler {
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            shutdown_tx,
            shutdown_rx,
            handles: Vec::new(),
        }
    }

    /// Spawn a named recurring job. The job returns the number of records it
    /// touched; failures are logged and the next tick proceeds normally.
    pub fn spawn<F, Fut>(&mut self, name: &'static str, period: Duration, job: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<u64>> + Send + 'static,
    {
        let mut shutdown = self.shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick fires immediately; skip it so jobs run
            // one full period after startup.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // Once a tick wins the race the run completes even if
                        // shutdown is requested meanwhile.
                        match job().await {
                            Ok(count) => {
                                tracing::info!(job = name, records = count, "job tick completed");
                            }
                            Err(e) => {
                                tracing::error!(job = name, error = %e, "job tick failed");
                            }
                        }
                    }
                    _ = shutdown.changed() => {
                        tracing::info!(job = name, "job loop stopped");
                        break;
                    }
                }
            }
        });
        self.handles.push(handle);
    }

    /// Signal all job loops to stop and wait for them to drain.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn job_runs_on_cadence_and_stops_on_shutdown() {
        let counter = Arc::new(AtomicU64::new(0));
        let seen = counter.clone();

        let mut scheduler = Scheduler::new();
        scheduler.spawn("counter", Duration::from_millis(10), move || {
            let counter = seen.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            }
        });

        tokio::time::sleep(Duration::from_millis(55)).await;
        scheduler.shutdown().await;

        let ticks = counter.load(Ordering::SeqCst);
        assert!(ticks >= 2, "expected at least 2 ticks, got {ticks}");

        // No more ticks after shutdown.
        let after = counter.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(counter.load(Ordering::SeqCst), after);
    }

    #[tokio::test]
    async fn failing_job_does_not_stop_the_loop() {
        let counter = Arc::new(AtomicU64::new(0));
        let seen = counter.clone();

        let mut scheduler = Scheduler::new();
        scheduler.spawn("flaky", Duration::from_millis(10), move || {
            let counter = seen.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n % 2 == 0 {
                    anyhow::bail!("transient failure");
                }
                Ok(1)
            }
        });

        tokio::time::sleep(Duration::from_millis(55)).await;
        scheduler.shutdown().await;

        assert!(counter.load(Ordering::SeqCst) >= 3);
    }
}
