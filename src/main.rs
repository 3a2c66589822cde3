use clap::Parser;
use glassy_notes::cli::{
    handle_add, handle_delete, handle_edit, handle_list, handle_move, handle_opacity,
    handle_serve, handle_session, Cli, Commands,
};
use glassy_notes::config::LOG_ENV;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // Logs go to stderr so stdout stays clean for JSON output and MCP stdio.
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let store = cli.store;

    let result = match cli.command {
        Commands::List { json } => handle_list(store, json),
        Commands::Add { text, json } => handle_add(store, text, json),
        Commands::Edit { id, text } => handle_edit(store, id, text),
        Commands::Delete { id, force } => handle_delete(store, id, force),
        Commands::Move { id, target } => handle_move(store, id, target),
        Commands::Opacity { value } => handle_opacity(store, value),
        Commands::Session => handle_session(store),
        Commands::Serve => handle_serve(store),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
