/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the dispatch
/// core can handle failures consistently (user-facing message vs operator
/// log).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("duplicate command: /{0}")]
    DuplicateCommand(String),

    #[error("external call failed: {0}")]
    ExternalCall(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
