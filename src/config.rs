//! Bus configuration.
//!
//! ```json
//! { "execution": "inline" }
//! { "execution": { "thread": { "name": "pubsub-worker" } }, "trace_dispatch": true }
//! ```

use serde::Deserialize;

use crate::error::PubSubError;

const DEFAULT_WORKER_NAME: &str = "pubsub-worker";

/// Where callbacks run when a bus is built from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionConfig {
    /// On the publishing thread.
    #[default]
    Inline,
    /// On a dedicated [`ThreadQueue`](crate::ThreadQueue) worker.
    Thread {
        #[serde(default = "default_worker_name")]
        name: String,
    },
}

fn default_worker_name() -> String {
    DEFAULT_WORKER_NAME.to_string()
}

/// Event bus settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    pub execution: ExecutionConfig,

    /// Emit a `trace!` line for every delivered callback.
    pub trace_dispatch: bool,
}

impl BusConfig {
    pub fn from_json(json: &str) -> Result<Self, PubSubError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Queued execution on a worker thread called `name`.
    pub fn threaded(name: impl Into<String>) -> Self {
        Self {
            execution: ExecutionConfig::Thread { name: name.into() },
            ..Self::default()
        }
    }
}
