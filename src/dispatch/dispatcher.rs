use std::sync::Arc;

use tracing::trace;

use super::{ExecutionMode, Task};
use crate::event::Event;
use crate::registry::{Matches, Registry};
use crate::subscription::Subscription;

/// What one dispatch round did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Callbacks run on the publishing thread.
    pub invoked: usize,
    /// Callbacks handed to an execution queue.
    pub queued: usize,
    /// Once-subscriptions retired by this round.
    pub retired: usize,
    /// Matches skipped because they died after matching.
    pub skipped: usize,
    /// Stale subscriptions removed from the registry.
    pub pruned: usize,
}

/// Runs the callbacks of a [`Matches`] snapshot.
///
/// For each match, in order:
/// 1. re-check liveness, since an earlier callback in the same round may
///    have unsubscribed it;
/// 2. for a once-subscription, claim and remove it from the registry; only
///    the winning claim goes on to run, which keeps concurrent publishes
///    from firing it twice;
/// 3. run the callback inline or submit it to the queue. The subscriber, if
///    any, is pinned for the duration of the call.
///
/// Callback panics are not caught here. Inline, they unwind into the
/// publisher; queued, the queue's own policy applies.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dispatcher {
    trace_dispatch: bool,
}

impl Dispatcher {
    pub fn new(trace_dispatch: bool) -> Self {
        Self { trace_dispatch }
    }

    pub fn dispatch(
        &self,
        registry: &Registry,
        event: Event,
        matches: Matches,
        mode: &ExecutionMode,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        let event = Arc::new(event);

        for sub in matches.live {
            if !sub.is_live() {
                report.skipped += 1;
                continue;
            }
            if sub.is_once() {
                if !registry.retire(&sub) {
                    report.skipped += 1;
                    continue;
                }
                report.retired += 1;
            }

            if self.trace_dispatch {
                trace!(
                    token = %sub.token(),
                    event = event.name(),
                    inline = mode.is_inline(),
                    "Delivering event"
                );
            }

            match mode {
                ExecutionMode::Inline => {
                    if sub.invoke(&event) {
                        report.invoked += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
                ExecutionMode::Queued(queue) => {
                    queue.submit(deferred(sub, Arc::clone(&event)));
                    report.queued += 1;
                }
            }
        }

        report.pruned = registry.prune_tokens(&matches.stale);
        report
    }
}

/// Bind one callback to one event for later execution.
fn deferred(sub: Arc<Subscription>, event: Arc<Event>) -> Task {
    Box::new(move || {
        // Once-subscriptions were claimed at dispatch time. Anything else
        // may have been unsubscribed while waiting in the queue. `invoke`
        // checks the subscriber itself.
        if sub.is_once() || sub.is_alive() {
            sub.invoke(&event);
        }
    })
}
