use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("storage unavailable: {0}")]
    Storage(#[from] crate::db::DbError),
    #[error("clipboard error: {0}")]
    Clipboard(#[from] crate::clipboard::ClipboardError),
    #[error("{} required", join_fields(.missing))]
    Validation { missing: Vec<&'static str> },
    #[error(transparent)]
    InvalidStatus(#[from] crate::db::UnknownStatus),
    #[error("snippet {0} not found")]
    NotFound(i64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn join_fields(fields: &[&'static str]) -> String {
    match fields {
        [] => "fields".to_string(),
        [only] => format!("{only} is"),
        [init @ .., last] => format!("{} and {last} are", init.join(", ")),
    }
}

pub type AppResult<T> = Result<T, AppError>;
