//! MCP resource implementations.
//!
//! Three read-only JSON resources: the note list, the settings and the
//! full panel render model.

use crate::board::Board;
use crate::mcp::error::McpError;
use crate::mcp::tools::{list_response, settings_response};
use crate::storage::SqliteStore;
use rmcp::model::{RawResource, ReadResourceResult, ResourceContents};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The glassy:// URI scheme prefix.
pub const GLASSY_SCHEME: &str = "glassy://";

/// MIME type for all resource responses.
pub const RESOURCE_MIME_TYPE: &str = "application/json";

/// Static resource URIs.
pub mod static_resources {
    pub const NOTES: &str = "glassy://notes";
    pub const SETTINGS: &str = "glassy://settings";
    pub const PANEL: &str = "glassy://panel";
}

fn resource(uri: &str, name: &str, description: &str) -> RawResource {
    RawResource {
        uri: uri.to_string(),
        name: name.to_string(),
        title: Some(name.to_string()),
        description: Some(description.to_string()),
        mime_type: Some(RESOURCE_MIME_TYPE.to_string()),
        size: None,
        icons: None,
        meta: None,
    }
}

/// Build the list of static resources.
pub fn build_static_resources() -> Vec<RawResource> {
    vec![
        resource(
            static_resources::NOTES,
            "Notes",
            "All notes in display order",
        ),
        resource(
            static_resources::SETTINGS,
            "Settings",
            "Background opacity and lock mode",
        ),
        resource(
            static_resources::PANEL,
            "Panel",
            "Render model of the panel: header, rows and footer hint",
        ),
    ]
}

/// Read a resource by URI.
pub async fn read_resource(
    uri: &str,
    board: &Arc<Mutex<Board<SqliteStore>>>,
) -> Result<ReadResourceResult, McpError> {
    if !uri.starts_with(GLASSY_SCHEME) {
        return Err(McpError::InvalidResourceUri {
            uri: uri.to_string(),
        });
    }

    let board = board.lock().await;
    match uri {
        static_resources::NOTES => json_resource(uri, &list_response(&board)),
        static_resources::SETTINGS => json_resource(uri, &settings_response(&board)),
        static_resources::PANEL => json_resource(uri, &board.view()),
        _ => Err(McpError::ResourceNotFound {
            uri: uri.to_string(),
        }),
    }
}

fn json_resource<T: Serialize>(uri: &str, value: &T) -> Result<ReadResourceResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| McpError::InternalError {
        message: format!("Failed to serialize resource: {}", e),
    })?;

    Ok(ReadResourceResult {
        contents: vec![ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some(RESOURCE_MIME_TYPE.to_string()),
            text,
            meta: None,
        }],
    })
}
