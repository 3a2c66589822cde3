//! MCP-specific error types and mapping to JSON-RPC error codes.

use crate::error::NotesError;
use rmcp::model::ErrorCode;
use rmcp::ErrorData as RmcpError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Custom MCP error codes (in the -32000 to -32099 range for server errors)
pub mod error_codes {
    pub const NOTE_NOT_FOUND: i32 = -32001;
    pub const PANEL_LOCKED: i32 = -32002;
    pub const VALIDATION_FAILED: i32 = -32003;
    pub const RESOURCE_NOT_FOUND: i32 = -32005;
    pub const INVALID_RESOURCE_URI: i32 = -32006;
    pub const STORAGE_ERROR: i32 = -32010;
    pub const INTERNAL_ERROR: i32 = -32011;
}

/// MCP-specific error types with detailed context.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum McpError {
    #[error("Note not found: {id}")]
    NoteNotFound { id: String },

    #[error("The panel is locked. Unlock it with lock_set before editing")]
    PanelLocked,

    #[error("Validation failed for field '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Text too long: {actual} characters (max {max})")]
    TextTooLong { max: usize, actual: usize },

    #[error("Resource not found: {uri}")]
    ResourceNotFound { uri: String },

    #[error("Invalid resource URI: {uri}")]
    InvalidResourceUri { uri: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl McpError {
    /// Get the JSON-RPC error code for this error type.
    pub fn error_code(&self) -> i32 {
        match self {
            McpError::NoteNotFound { .. } => error_codes::NOTE_NOT_FOUND,
            McpError::PanelLocked => error_codes::PANEL_LOCKED,
            McpError::ValidationFailed { .. } | McpError::TextTooLong { .. } => {
                error_codes::VALIDATION_FAILED
            }
            McpError::ResourceNotFound { .. } => error_codes::RESOURCE_NOT_FOUND,
            McpError::InvalidResourceUri { .. } => error_codes::INVALID_RESOURCE_URI,
            McpError::StorageError { .. } => error_codes::STORAGE_ERROR,
            McpError::InternalError { .. } => error_codes::INTERNAL_ERROR,
        }
    }

    /// Get the error type name for the data payload.
    pub fn error_type(&self) -> &'static str {
        match self {
            McpError::NoteNotFound { .. } => "NoteNotFound",
            McpError::PanelLocked => "PanelLocked",
            McpError::ValidationFailed { .. } => "ValidationFailed",
            McpError::TextTooLong { .. } => "TextTooLong",
            McpError::ResourceNotFound { .. } => "ResourceNotFound",
            McpError::InvalidResourceUri { .. } => "InvalidResourceUri",
            McpError::StorageError { .. } => "StorageError",
            McpError::InternalError { .. } => "InternalError",
        }
    }

    /// Convert to rmcp ErrorData for JSON-RPC response.
    pub fn to_rmcp_error(&self) -> RmcpError {
        RmcpError {
            code: ErrorCode(self.error_code()),
            message: self.to_string().into(),
            data: Some(json!({
                "error_type": self.error_type(),
                "details": self.clone()
            })),
        }
    }
}

impl From<McpError> for RmcpError {
    fn from(err: McpError) -> Self {
        err.to_rmcp_error()
    }
}

impl From<NotesError> for McpError {
    fn from(err: NotesError) -> Self {
        match err {
            NotesError::NoteNotFound(id) => McpError::NoteNotFound { id },
            NotesError::InvalidOpacity(value) => McpError::ValidationFailed {
                field: "opacity".to_string(),
                message: format!("'{}' is not between 0 and 0.9", value),
            },
            NotesError::InvalidInput(message) => McpError::ValidationFailed {
                field: "input".to_string(),
                message,
            },
            NotesError::Storage(message) => McpError::StorageError { message },
            NotesError::Io(e) => McpError::StorageError {
                message: format!("IO error: {}", e),
            },
            NotesError::Sqlite(e) => McpError::StorageError {
                message: format!("SQLite error: {}", e),
            },
            NotesError::Json(e) => McpError::InternalError {
                message: format!("JSON error: {}", e),
            },
        }
    }
}

/// Validation constants.
pub mod validation {
    pub const MAX_TEXT_LENGTH: usize = 1000;
}
