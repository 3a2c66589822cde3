pub mod board;
pub mod cli;
pub mod config;
pub mod controller;
pub mod entity;
pub mod error;
pub mod gesture;
pub mod mcp;
pub mod settings;
pub mod storage;

pub use board::Board;
pub use controller::ListController;
pub use error::{NotesError, Result};
pub use mcp::GlassyServer;
