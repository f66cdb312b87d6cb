//! Serial execution queue on a tokio runtime.

use std::panic::{self, AssertUnwindSafe};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::queue::{panic_message, ExecutionQueue, QueueStats, Task};

enum Command {
    Run(Task),
    Drain(oneshot::Sender<()>),
}

/// Runs submitted tasks one at a time, in FIFO order, inside a single tokio
/// task.
///
/// Callbacks are synchronous, so each one occupies a runtime worker while it
/// runs; keep them short or hand heavy work off with `spawn_blocking`.
/// Panics are caught, logged and counted, like [`ThreadQueue`](crate::ThreadQueue).
pub struct TokioQueue {
    name: String,
    tx: Mutex<Option<mpsc::UnboundedSender<Command>>>,
    handle: Mutex<Option<JoinHandle<QueueStats>>>,
}

impl TokioQueue {
    /// Start the queue on the runtime behind `handle`.
    pub fn spawn(handle: &Handle, name: impl Into<String>) -> Self {
        let name = name.into();
        let (tx, mut rx) = mpsc::unbounded_channel::<Command>();
        let worker_name = name.clone();

        let join = handle.spawn(async move {
            let mut stats = QueueStats::default();

            while let Some(command) = rx.recv().await {
                match command {
                    Command::Run(task) => match panic::catch_unwind(AssertUnwindSafe(task)) {
                        Ok(()) => stats.tasks_run += 1,
                        Err(payload) => {
                            stats.tasks_panicked += 1;
                            error!(
                                queue = %worker_name,
                                panic = panic_message(payload.as_ref()),
                                "Queued task panicked"
                            );
                        }
                    },
                    Command::Drain(ack) => {
                        let _ = ack.send(());
                    }
                }
            }

            stats
        });

        debug!(queue = %name, "Started tokio queue");

        Self {
            name,
            tx: Mutex::new(Some(tx)),
            handle: Mutex::new(Some(join)),
        }
    }

    /// Start the queue on the runtime the caller is running in.
    ///
    /// Panics outside a tokio runtime, like [`Handle::current`].
    pub fn current(name: impl Into<String>) -> Self {
        Self::spawn(&Handle::current(), name)
    }

    /// Wait until every task submitted before this call has run.
    pub async fn drain(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        let sent = match self.tx.lock().as_ref() {
            Some(tx) => tx.send(Command::Drain(ack_tx)).is_ok(),
            None => false,
        };
        if sent {
            let _ = ack_rx.await;
        }
    }

    /// Close the queue, let queued tasks finish and return statistics.
    pub async fn stop(&self) -> QueueStats {
        drop(self.tx.lock().take());

        let handle = self.handle.lock().take();
        let stats = match handle {
            Some(handle) => handle.await.unwrap_or_default(),
            None => QueueStats::default(),
        };

        debug!(
            queue = %self.name,
            tasks_run = stats.tasks_run,
            tasks_panicked = stats.tasks_panicked,
            "Stopped tokio queue"
        );
        stats
    }
}

impl ExecutionQueue for TokioQueue {
    fn submit(&self, task: Task) {
        let accepted = match self.tx.lock().as_ref() {
            Some(tx) => tx.send(Command::Run(task)).is_ok(),
            None => false,
        };
        if !accepted {
            warn!(queue = %self.name, "Queue is stopped; dropping task");
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
