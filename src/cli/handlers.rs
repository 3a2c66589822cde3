use std::io::{self, BufRead};
use std::path::PathBuf;

use tracing::info;

use crate::board::Board;
use crate::config::StoreConfig;
use crate::entity::{Note, NoteId};
use crate::error::{NotesError, Result};
use crate::mcp::GlassyServer;
use crate::settings::Opacity;
use crate::storage::SqliteStore;

use super::session::Session;

fn open_board(store: Option<PathBuf>) -> Result<Board<SqliteStore>> {
    let config = StoreConfig::resolve(store);
    let store = SqliteStore::open(&config.path)?;
    Ok(Board::open(store))
}

fn resolve(board: &Board<SqliteStore>, id: &str) -> Result<NoteId> {
    board
        .resolve(id)
        .ok_or_else(|| NotesError::NoteNotFound(id.to_string()))
}

fn display_text(note: &Note) -> &str {
    if note.text.is_empty() {
        "..."
    } else {
        &note.text
    }
}

fn print_note(position: usize, note: &Note) {
    println!(
        "  {:>2}. ({}) {} {}",
        position,
        note.id.short(),
        note.color,
        display_text(note)
    );
}

pub fn handle_list(store: Option<PathBuf>, json: bool) -> Result<()> {
    let board = open_board(store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(board.notes())?);
    } else if board.notes().is_empty() {
        println!("No notes.");
    } else {
        for (i, note) in board.notes().iter().enumerate() {
            print_note(i + 1, note);
        }
    }

    Ok(())
}

pub fn handle_add(store: Option<PathBuf>, text: Option<String>, json: bool) -> Result<()> {
    let mut board = open_board(store)?;

    let id = board
        .add_note()
        .ok_or_else(|| NotesError::InvalidInput("panel is locked".to_string()))?;
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        board.update_text(&id, &text);
    }

    let position = board.list().position(&id).unwrap_or_default();
    let note = &board.notes()[position];
    if json {
        println!("{}", serde_json::to_string_pretty(note)?);
    } else {
        println!(
            "Created note {:02} ({}) - {}",
            position + 1,
            note.id.short(),
            display_text(note)
        );
    }

    Ok(())
}

pub fn handle_edit(store: Option<PathBuf>, id: String, text: String) -> Result<()> {
    let mut board = open_board(store)?;
    let note_id = resolve(&board, &id)?;

    board.update_text(&note_id, &text);
    println!("Updated note ({}) - {}", note_id.short(), text);

    Ok(())
}

pub fn handle_delete(store: Option<PathBuf>, id: String, force: bool) -> Result<()> {
    let mut board = open_board(store)?;
    let note_id = resolve(&board, &id)?;
    let note = board
        .list()
        .get(&note_id)
        .cloned()
        .ok_or_else(|| NotesError::NoteNotFound(id.clone()))?;

    // Confirm deletion unless --force is used
    if !force {
        eprintln!(
            "Delete note ({}) - {}? Undo is only available inside a session. [y/N] ",
            note.id.short(),
            display_text(&note)
        );

        if atty::is(atty::Stream::Stdin) {
            let mut input = String::new();
            io::stdin().lock().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        } else {
            return Err(NotesError::InvalidInput(
                "Use --force to delete in non-interactive mode".to_string(),
            ));
        }
    }

    board.delete_note(&note_id);
    println!("Deleted note ({}) - {}", note.id.short(), display_text(&note));

    Ok(())
}

pub fn handle_move(store: Option<PathBuf>, id: String, target: String) -> Result<()> {
    let mut board = open_board(store)?;
    let note_id = resolve(&board, &id)?;
    let target_id = resolve(&board, &target)?;

    if board.reorder(&note_id, &target_id) {
        let position = board.list().position(&note_id).unwrap_or_default();
        println!("Moved note ({}) to position {}", note_id.short(), position + 1);
    } else {
        println!("Note ({}) did not move.", note_id.short());
    }

    Ok(())
}

pub fn handle_opacity(store: Option<PathBuf>, value: Option<String>) -> Result<()> {
    let mut board = open_board(store)?;

    if let Some(raw) = value {
        let opacity: Opacity = raw.parse()?;
        board.set_opacity(opacity.value());
    }
    println!("{}", board.opacity());

    Ok(())
}

pub fn handle_session(store: Option<PathBuf>) -> Result<()> {
    let board = open_board(store)?;
    let interactive = atty::is(atty::Stream::Stdin);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    Session::new(board).run(stdin.lock(), &mut stdout, interactive)
}

pub fn handle_serve(store: Option<PathBuf>) -> Result<()> {
    let board = open_board(store)?;
    let server = GlassyServer::new(board);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        info!("serving MCP over stdio");
        server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| NotesError::Storage(format!("MCP server error: {}", e)))
    })
}
