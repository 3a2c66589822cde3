//! MCP tool types and helpers.
//!
//! Parameter and response types for the tools. The tool implementations
//! live in mod.rs within the #[tool_router] impl block.

use crate::board::Board;
use crate::entity::{Note, NoteId};
use crate::mcp::error::{validation, McpError};
use crate::storage::KeyValueStore;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Parameter Types
// ============================================================================

/// Parameters for note_add tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NoteAddParams {
    /// Optional initial text for the new note
    pub text: Option<String>,
}

/// Parameters for note_update tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NoteUpdateParams {
    /// Note ID (1-based position like "2" or id prefix like "3f2a")
    pub id: String,
    /// Replacement text
    pub text: String,
}

/// Parameters for note_delete tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NoteDeleteParams {
    /// Note ID (1-based position or id prefix)
    pub id: String,
}

/// Parameters for note_reorder tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NoteReorderParams {
    /// Note to move
    pub id: String,
    /// Note whose current position the moved note takes
    pub target: String,
}

/// Parameters for opacity_set tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OpacitySetParams {
    /// Background opacity between 0 and 0.9
    pub opacity: f64,
}

/// Parameters for lock_set tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LockSetParams {
    /// true to lock the panel (read-only), false to unlock
    pub locked: bool,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteResponse {
    pub id: String,
    /// 1-based position in the list
    pub position: usize,
    pub text: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteListResponse {
    pub notes: Vec<NoteResponse>,
    pub total: usize,
    /// Deletions that can still be undone this session
    pub undo_available: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: NoteResponse,
    pub undo_available: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoResponse {
    pub restored: Option<NoteResponse>,
    pub undo_available: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub opacity: f64,
    pub locked: bool,
}

// ============================================================================
// Conversion Helpers
// ============================================================================

pub fn note_to_response(note: &Note, index: usize) -> NoteResponse {
    NoteResponse {
        id: note.id.to_string(),
        position: index + 1,
        text: note.text.clone(),
        color: note.color.clone(),
    }
}

/// Response for a note that is currently in the list.
pub fn find_note_response<S: KeyValueStore + Send + 'static>(
    board: &Board<S>,
    id: &NoteId,
) -> Option<NoteResponse> {
    let index = board.list().position(id)?;
    Some(note_to_response(&board.notes()[index], index))
}

pub fn list_response<S: KeyValueStore + Send + 'static>(board: &Board<S>) -> NoteListResponse {
    let notes: Vec<NoteResponse> = board
        .notes()
        .iter()
        .enumerate()
        .map(|(i, n)| note_to_response(n, i))
        .collect();
    NoteListResponse {
        total: notes.len(),
        notes,
        undo_available: board.list().history().len(),
    }
}

pub fn settings_response<S: KeyValueStore + Send + 'static>(board: &Board<S>) -> SettingsResponse {
    SettingsResponse {
        opacity: board.opacity().value(),
        locked: board.is_locked(),
    }
}

// ============================================================================
// Validation Helpers
// ============================================================================

pub fn validate_text(text: &str) -> Result<(), McpError> {
    let actual = text.chars().count();
    if actual > validation::MAX_TEXT_LENGTH {
        return Err(McpError::TextTooLong {
            max: validation::MAX_TEXT_LENGTH,
            actual,
        });
    }
    Ok(())
}

pub fn validate_opacity(opacity: f64) -> Result<(), McpError> {
    if !opacity.is_finite() || !(0.0..=0.9).contains(&opacity) {
        return Err(McpError::ValidationFailed {
            field: "opacity".to_string(),
            message: format!("{} is not between 0 and 0.9", opacity),
        });
    }
    Ok(())
}

/// Resolve a user-supplied note reference against the board.
pub fn resolve_note<S: KeyValueStore + Send + 'static>(
    board: &Board<S>,
    id: &str,
) -> Result<NoteId, McpError> {
    board.resolve(id).ok_or_else(|| McpError::NoteNotFound {
        id: id.to_string(),
    })
}
