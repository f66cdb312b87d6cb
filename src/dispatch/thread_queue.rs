//! Serial execution queue on a dedicated thread.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Sender};
use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::Mutex;
use tracing::{debug, error, warn};

use super::queue::{panic_message, ExecutionQueue, QueueStats, Task};
use crate::error::PubSubError;

enum Command {
    Run(Task),
    Drain(Sender<()>),
}

/// A background thread that runs submitted tasks one at a time, in FIFO
/// order.
///
/// Failure policy: a task that panics is caught, logged at `error` and
/// counted; the worker carries on with the next task. Tasks submitted after
/// [`stop`](Self::stop) are dropped with a warning.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use pubsub_rust::{EventBus, ThreadQueue};
///
/// let queue = Arc::new(ThreadQueue::spawn("pubsub-worker").unwrap());
/// let bus = EventBus::new();
/// bus.set_execution_queue(Some(queue.clone()));
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = hits.clone();
/// bus.subscribe("tick", move |_| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// })
/// .unwrap();
///
/// bus.publish_named("tick").unwrap();
/// queue.drain();
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
///
/// let stats = queue.stop();
/// assert_eq!(stats.tasks_run, 1);
/// ```
pub struct ThreadQueue {
    name: String,
    worker: ThreadId,
    tx: Mutex<Option<Sender<Command>>>,
    handle: Mutex<Option<JoinHandle<QueueStats>>>,
}

impl ThreadQueue {
    /// Spawn the worker thread, named `name`.
    pub fn spawn(name: impl Into<String>) -> Result<Self, PubSubError> {
        let name = name.into();
        let (tx, rx) = channel::<Command>();
        let worker_name = name.clone();

        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            let mut stats = QueueStats::default();

            // Ends once every sender is gone.
            for command in rx {
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
        })?;

        debug!(queue = %name, "Started thread queue");

        Ok(Self {
            name,
            worker: handle.thread().id(),
            tx: Mutex::new(Some(tx)),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Block until every task submitted before this call has run.
    ///
    /// Returns immediately when called from a queued task (the worker would
    /// otherwise wait on itself) or after the queue has stopped.
    pub fn drain(&self) {
        if thread::current().id() == self.worker {
            return;
        }

        let (ack_tx, ack_rx) = channel();
        let sent = match self.tx.lock().as_ref() {
            Some(tx) => tx.send(Command::Drain(ack_tx)).is_ok(),
            None => false,
        };
        if sent {
            let _ = ack_rx.recv();
        }
    }

    /// Close the queue, wait for queued tasks to finish and return statistics.
    ///
    /// A second call returns empty statistics.
    pub fn stop(&self) -> QueueStats {
        drop(self.tx.lock().take());

        let handle = self.handle.lock().take();
        let stats = match handle {
            Some(handle) if handle.thread().id() != thread::current().id() => {
                handle.join().unwrap_or_default()
            }
            _ => QueueStats::default(),
        };

        debug!(
            queue = %self.name,
            tasks_run = stats.tasks_run,
            tasks_panicked = stats.tasks_panicked,
            "Stopped thread queue"
        );
        stats
    }

    pub fn is_running(&self) -> bool {
        self.tx.lock().is_some()
    }
}

impl ExecutionQueue for ThreadQueue {
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

impl Drop for ThreadQueue {
    fn drop(&mut self) {
        // Closing the channel lets the worker finish its backlog and exit;
        // don't join on drop.
        drop(self.tx.get_mut().take());
    }
}
