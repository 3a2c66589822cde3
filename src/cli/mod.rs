mod commands;
mod handlers;
mod session;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_add, handle_delete, handle_edit, handle_list, handle_move, handle_opacity,
    handle_serve, handle_session,
};
pub use session::Session;
