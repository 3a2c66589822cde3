//! MCP (Model Context Protocol) server for the notes panel.
//!
//! Exposes the panel's list operations, undo and settings as tools so an
//! assistant can read and arrange notes. One server holds one board, so
//! the undo history lives as long as the server does.

pub mod error;
pub mod resources;
pub mod tools;

use crate::board::Board;
use crate::storage::SqliteStore;
use error::McpError;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::*,
    service::{RequestContext, RoleServer},
    tool, tool_handler, tool_router, ErrorData as McpErrorData, ServerHandler,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tools::*;
use tracing::debug;

/// The MCP server.
///
/// Holds a thread-safe reference to the board.
#[derive(Clone)]
pub struct GlassyServer {
    /// The panel state, persisted through its SQLite store.
    pub board: Arc<Mutex<Board<SqliteStore>>>,
    /// Tool router for MCP tool handling.
    pub tool_router: rmcp::handler::server::tool::ToolRouter<Self>,
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpErrorData> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::InternalError {
        message: format!("Failed to serialize response: {}", e),
    })?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// All tool implementations in the tool_router impl block
#[tool_router]
impl GlassyServer {
    /// Create a new server over an opened board.
    pub fn new(board: Board<SqliteStore>) -> Self {
        Self {
            board: Arc::new(Mutex::new(board)),
            tool_router: Self::tool_router(),
        }
    }

    /// Start the MCP server on the given transport.
    ///
    /// This method runs the server until the transport is closed or an error occurs.
    pub async fn serve<T, E, A>(self, transport: T) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        T: rmcp::transport::IntoTransport<RoleServer, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        use rmcp::service::ServiceExt;
        let running = ServiceExt::serve(self, transport).await.map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })?;
        running.waiting().await.map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })?;
        Ok(())
    }

    /// Ping tool for health checks.
    #[tool(description = "Check if the server is running")]
    async fn ping(&self) -> Result<CallToolResult, McpErrorData> {
        Ok(CallToolResult::success(vec![Content::text("pong")]))
    }

    #[tool(description = "List all notes in display order")]
    pub async fn note_list(&self) -> Result<CallToolResult, McpErrorData> {
        let board = self.board.lock().await;
        json_result(&list_response(&board))
    }

    #[tool(description = "Append a new note, optionally with initial text")]
    pub async fn note_add(
        &self,
        Parameters(params): Parameters<NoteAddParams>,
    ) -> Result<CallToolResult, McpErrorData> {
        if let Some(text) = &params.text {
            validate_text(text)?;
        }

        let mut board = self.board.lock().await;
        let id = board.add_note().ok_or(McpError::PanelLocked)?;
        if let Some(text) = params.text.filter(|t| !t.is_empty()) {
            board.update_text(&id, &text);
        }
        debug!(id = %id, "note added over mcp");

        let response = find_note_response(&board, &id).ok_or_else(|| McpError::InternalError {
            message: "Added note is missing".to_string(),
        })?;
        json_result(&response)
    }

    #[tool(description = "Replace the text of a note")]
    pub async fn note_update(
        &self,
        Parameters(params): Parameters<NoteUpdateParams>,
    ) -> Result<CallToolResult, McpErrorData> {
        validate_text(&params.text)?;

        let mut board = self.board.lock().await;
        if board.is_locked() {
            return Err(McpError::PanelLocked.into());
        }
        let id = resolve_note(&board, &params.id)?;
        board.update_text(&id, &params.text);

        let response = find_note_response(&board, &id).ok_or(McpError::NoteNotFound {
            id: params.id,
        })?;
        json_result(&response)
    }

    #[tool(description = "Delete a note. The deletion can be undone with note_undo")]
    pub async fn note_delete(
        &self,
        Parameters(params): Parameters<NoteDeleteParams>,
    ) -> Result<CallToolResult, McpErrorData> {
        let mut board = self.board.lock().await;
        if board.is_locked() {
            return Err(McpError::PanelLocked.into());
        }
        let id = resolve_note(&board, &params.id)?;
        let deleted = find_note_response(&board, &id).ok_or(McpError::NoteNotFound {
            id: params.id.clone(),
        })?;
        board.delete_note(&id);

        json_result(&DeleteResponse {
            deleted,
            undo_available: board.list().history().len(),
        })
    }

    #[tool(description = "Restore the most recently deleted note at its original position")]
    pub async fn note_undo(&self) -> Result<CallToolResult, McpErrorData> {
        let mut board = self.board.lock().await;
        let pending = board.list().history().last().map(|r| r.note.id.clone());
        board.undo_delete();

        let restored = pending.and_then(|id| find_note_response(&board, &id));
        json_result(&UndoResponse {
            restored,
            undo_available: board.list().history().len(),
        })
    }

    #[tool(description = "Move a note to the current position of another note")]
    pub async fn note_reorder(
        &self,
        Parameters(params): Parameters<NoteReorderParams>,
    ) -> Result<CallToolResult, McpErrorData> {
        let mut board = self.board.lock().await;
        if board.is_locked() {
            return Err(McpError::PanelLocked.into());
        }
        let id = resolve_note(&board, &params.id)?;
        let target = resolve_note(&board, &params.target)?;
        board.reorder(&id, &target);
        json_result(&list_response(&board))
    }

    #[tool(description = "Get background opacity and lock mode")]
    pub async fn settings_get(&self) -> Result<CallToolResult, McpErrorData> {
        let board = self.board.lock().await;
        json_result(&settings_response(&board))
    }

    #[tool(description = "Set the background opacity (0 to 0.9)")]
    pub async fn opacity_set(
        &self,
        Parameters(params): Parameters<OpacitySetParams>,
    ) -> Result<CallToolResult, McpErrorData> {
        validate_opacity(params.opacity)?;

        let mut board = self.board.lock().await;
        board.set_opacity(params.opacity).ok_or(McpError::PanelLocked)?;
        json_result(&settings_response(&board))
    }

    #[tool(description = "Lock or unlock the panel. A locked panel is read-only")]
    pub async fn lock_set(
        &self,
        Parameters(params): Parameters<LockSetParams>,
    ) -> Result<CallToolResult, McpErrorData> {
        let mut board = self.board.lock().await;
        board.set_locked(params.locked);
        json_result(&settings_response(&board))
    }
}

#[tool_handler]
impl ServerHandler for GlassyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Glassy Notes is a sticky-notes panel. Use note tools to list, add, \
                 edit, delete and reorder notes; note_undo restores the last deletion. \
                 Notes are referenced by 1-based position or id prefix."
                    .to_string(),
            ),
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, rmcp::ErrorData>> + Send + '_
    {
        use rmcp::model::AnnotateAble;
        async move {
            let static_resources = resources::build_static_resources();
            Ok(ListResourcesResult {
                resources: static_resources
                    .into_iter()
                    .map(|r| r.no_annotation())
                    .collect(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, rmcp::ErrorData>> + Send + '_
    {
        async move {
            resources::read_resource(&request.uri, &self.board)
                .await
                .map_err(|e| e.to_rmcp_error())
        }
    }
}
