//! Dispatch - running callbacks inline or on an execution queue.
//!
//! ```text
//!   Matches { live: [s1, s2, s3] }
//!        │
//!        ▼
//!   Dispatcher ── for each: re-check ─► retire if once ─► run
//!                                                        │
//!                     ┌──────────────────────────────────┴───────┐
//!                     ▼                                          ▼
//!           Inline: callback(&event)          Queued: queue.submit(task)
//!           on the publishing thread          ThreadQueue / TokioQueue / custom
//! ```

mod dispatcher;
mod mode;
mod queue;
mod thread_queue;
#[cfg(feature = "tokio")]
mod tokio_queue;

pub use dispatcher::{DispatchReport, Dispatcher};
pub use mode::ExecutionMode;
pub use queue::{ExecutionQueue, QueueStats, Task};
pub use thread_queue::ThreadQueue;
#[cfg(feature = "tokio")]
pub use tokio_queue::TokioQueue;
