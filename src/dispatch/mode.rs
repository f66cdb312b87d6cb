use std::fmt;
use std::sync::Arc;

use super::ExecutionQueue;

/// Where callbacks run.
#[derive(Clone, Default)]
pub enum ExecutionMode {
    /// On the publishing thread, before `publish` returns.
    #[default]
    Inline,
    /// Submitted to a queue; `publish` returns after submission.
    Queued(Arc<dyn ExecutionQueue>),
}

impl ExecutionMode {
    pub fn queued<Q>(queue: Q) -> Self
    where
        Q: ExecutionQueue + 'static,
    {
        ExecutionMode::Queued(Arc::new(queue))
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ExecutionMode::Inline)
    }
}

impl From<Option<Arc<dyn ExecutionQueue>>> for ExecutionMode {
    fn from(queue: Option<Arc<dyn ExecutionQueue>>) -> Self {
        match queue {
            Some(queue) => ExecutionMode::Queued(queue),
            None => ExecutionMode::Inline,
        }
    }
}

impl fmt::Debug for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Inline => f.write_str("Inline"),
            ExecutionMode::Queued(queue) => f.debug_tuple("Queued").field(&queue.name()).finish(),
        }
    }
}
