use thiserror::Error;

/// Errors surfaced by the event bus.
///
/// Stale tokens and dead subscribers are not errors.
#[derive(Debug, Error)]
pub enum PubSubError {
    /// An event name must contain at least one character.
    #[error("event name must not be empty")]
    EmptyEventName,

    /// The bus configuration could not be parsed.
    #[error("invalid bus configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The worker thread backing a queue could not be started.
    #[error("failed to spawn queue worker: {0}")]
    QueueSpawn(#[from] std::io::Error),
}
