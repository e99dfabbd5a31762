use crate::collab::BoxError;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to read '{location}': {source}")]
    Io {
        location: String,
        source: std::io::Error,
    },

    #[error("Invalid location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Script contains no nodes, so there is nothing to start")]
    EmptyScript,

    #[error("No file is open")]
    NoFileOpen,

    #[error("Script has compile errors; fix them before playing")]
    CompileErrors,

    #[error("No recent file at position {0}")]
    NoSuchRecentFile(usize),

    #[error("Another load is already in progress")]
    LoadInProgress,

    #[error("Dialogue runtime error: {0}")]
    Runtime(#[source] BoxError),
}
