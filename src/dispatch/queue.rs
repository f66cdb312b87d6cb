use std::any::Any;
use std::sync::Arc;

/// A unit of deferred work: one callback bound to one event.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Anything that can run tasks later, per its own scheduling policy.
///
/// The bus only ever calls [`submit`](Self::submit) and never waits for the
/// task. What happens when a task panics, or when the queue is shut down,
/// is the queue's own business.
///
/// Implementations might include:
/// - [`ThreadQueue`](crate::ThreadQueue) - serial FIFO on a dedicated thread
/// - `TokioQueue` - serial FIFO on a tokio runtime (`tokio` feature)
/// - A thread pool, a UI main-loop hook, a test recorder
pub trait ExecutionQueue: Send + Sync {
    /// Accept `task` for later execution.
    fn submit(&self, task: Task);

    /// Queue name, for logs.
    fn name(&self) -> &str {
        "queue"
    }
}

impl<Q> ExecutionQueue for Arc<Q>
where
    Q: ExecutionQueue + ?Sized,
{
    fn submit(&self, task: Task) {
        (**self).submit(task)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Statistics from a queue worker.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    pub tasks_run: usize,
    pub tasks_panicked: usize,
}

/// Best-effort text of a caught panic.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "<non-string panic>"
    }
}
