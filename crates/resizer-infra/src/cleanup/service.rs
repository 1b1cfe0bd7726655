use chrono::{DateTime, Utc};
use resizer_storage::Storage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Counts from a single sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub expired: usize,
    pub deleted: usize,
    pub failed: usize,
    /// Leftovers of interrupted writes that were removed.
    pub incomplete_removed: usize,
}

#[derive(Clone)]
pub struct RetentionSweeper {
    storage: Arc<dyn Storage>,
    retention: chrono::Duration,
    interval: Duration,
}

/// Running sweeper task. Dropping the handle also stops the task.
pub struct SweeperHandle {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the task to stop and wait for it to finish the sweep in progress.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "Retention sweeper task ended abnormally");
        }
    }
}

impl RetentionSweeper {
    pub fn new(storage: Arc<dyn Storage>, retention: Duration, interval: Duration) -> Self {
        Self {
            storage,
            retention: chrono::Duration::from_std(retention)
                .unwrap_or_else(|_| chrono::Duration::weeks(52 * 1000)),
            interval,
        }
    }

    /// Start the background sweep loop.
    ///
    /// The first sweep runs immediately, then once per interval. Ticks missed
    /// while a slow sweep was running are skipped rather than bunched up.
    pub fn start(self: Arc<Self>) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                retention_secs = self.retention.num_seconds(),
                interval_secs = self.interval.as_secs(),
                "Retention sweeper started"
            );

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Retention sweeper stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.sweep().await;
                    }
                }
            }
        });

        SweeperHandle {
            shutdown_tx,
            handle,
        }
    }

    pub async fn sweep(&self) -> SweepReport {
        self.sweep_at(Utc::now()).await
    }

    /// Delete every artifact that is older than the retention window at `now`,
    /// along with partial writes that have been abandoned for as long.
    ///
    /// Failures are logged and skipped; the sweep always runs to completion.
    #[tracing::instrument(skip(self), fields(cleanup.operation = "expire_outputs"))]
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> SweepReport {
        let mut report = SweepReport::default();

        let cutoff = now
            .checked_sub_signed(self.retention)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        match self.storage.purge_incomplete(cutoff).await {
            Ok(removed) => report.incomplete_removed = removed,
            Err(e) => tracing::warn!(error = %e, "Failed to purge incomplete writes, continuing"),
        }

        let artifacts = match self.storage.list().await {
            Ok(artifacts) => artifacts,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list output artifacts");
                return report;
            }
        };
        report.scanned = artifacts.len();

        for artifact in artifacts {
            if !artifact.is_expired(now, self.retention) {
                continue;
            }
            report.expired += 1;

            match self.storage.delete(&artifact.filename).await {
                Ok(()) => {
                    report.deleted += 1;
                    tracing::debug!(
                        key = %artifact.filename,
                        created_at = %artifact.created_at,
                        "Deleted expired artifact"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        error = %e,
                        key = %artifact.filename,
                        "Failed to delete expired artifact, continuing"
                    );
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            expired = report.expired,
            deleted = report.deleted,
            failed = report.failed,
            incomplete_removed = report.incomplete_removed,
            "Retention sweep completed"
        );

        report
    }
}
