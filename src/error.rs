use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotesError {
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Invalid opacity '{0}'. Expected a number between 0 and 0.9")]
    InvalidOpacity(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, NotesError>;
