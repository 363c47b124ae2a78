use thiserror::Error;

/// Failures raised by the watchword subsystem.
///
/// Everything except `Storage` and `Encoding` is informational at the
/// command boundary: handlers turn these into user-facing replies instead
/// of propagating them. Nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum WatchwordError {
    #[error("you are already watching \"{0}\"")]
    DuplicateSubscription(String),

    #[error("you are not watching \"{0}\"")]
    NotSubscribed(String),

    #[error("This operation does not work in private message contexts.")]
    InvalidContext,

    #[error("\"{0}\" can never trigger")]
    InvalidWord(String),

    #[error("could not deliver notification to user {user_id}")]
    DeliveryFailure {
        user_id: u64,
        #[source]
        source: serenity::Error,
    },

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Encoding(#[from] serde_json::Error),
}
