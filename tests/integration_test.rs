use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn notes_cmd(store: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_glassy-notes"));
    cmd.arg("--store").arg(store).env_remove("GLASSY_NOTES_STORE");
    cmd
}

fn list_json(store: &Path) -> Vec<serde_json::Value> {
    let output = notes_cmd(store).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    parsed.as_array().unwrap().clone()
}

#[test]
fn test_first_run_seeds_five_notes() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");

    let notes = list_json(&store);
    assert_eq!(notes.len(), 5);
    assert!(store.exists());
    assert_eq!(notes[0]["color"], "#FFADAD");
    assert_eq!(notes[4]["color"], "#9BF6FF");
    assert!(notes.iter().all(|n| n["text"] == ""));

    // Seeded notes are persisted, so ids are stable across runs.
    let again = list_json(&store);
    assert_eq!(notes, again);
}

#[test]
fn test_store_created_in_nested_directory() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("deep").join("dir").join("store.db");

    let output = notes_cmd(&store).args(["list"]).output().unwrap();
    assert!(output.status.success());
    assert!(store.exists());
}

#[test]
fn test_add_edit_move_workflow() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");

    let output = notes_cmd(&store)
        .args(["add", "buy milk"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Created note 06"));
    assert!(stdout.contains("buy milk"));

    let output = notes_cmd(&store)
        .args(["edit", "1", "call mom"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = notes_cmd(&store)
        .args(["move", "1", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("position 3"));

    let notes = list_json(&store);
    assert_eq!(notes.len(), 6);
    assert_eq!(notes[2]["text"], "call mom");
    assert_eq!(notes[5]["text"], "buy milk");
    assert_eq!(notes[5]["color"], "#A0C4FF");
}

#[test]
fn test_add_json_output() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");

    let output = notes_cmd(&store)
        .args(["add", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(parsed["text"], "");
    assert!(parsed["id"].as_str().unwrap().len() >= 32);
}

#[test]
fn test_delete_requires_force_when_not_interactive() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");

    let output = notes_cmd(&store)
        .args(["delete", "1"])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--force"));
    assert_eq!(list_json(&store).len(), 5);

    let output = notes_cmd(&store)
        .args(["delete", "1", "--force"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(list_json(&store).len(), 4);
}

#[test]
fn test_unknown_note_fails() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");

    let output = notes_cmd(&store)
        .args(["edit", "99", "x"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Note not found: 99"));
}

#[test]
fn test_opacity_round_trip() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");

    let output = notes_cmd(&store).args(["opacity"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "0.2");

    let output = notes_cmd(&store)
        .args(["opacity", "0.55"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = notes_cmd(&store).args(["opacity"]).output().unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "0.55");

    let output = notes_cmd(&store)
        .args(["opacity", "1.5"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid opacity"));
}

#[test]
fn test_session_undo_restores_deleted_note() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");
    let before = list_json(&store);

    let mut child = notes_cmd(&store)
        .arg("session")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"add\ndelete 3\nkey ctrl+z\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("deleted"));
    assert!(stdout.contains("handled"));

    let after = list_json(&store);
    assert_eq!(after.len(), 6);
    assert_eq!(&after[..5], &before[..]);
}

#[test]
fn test_session_swipe_deletes_past_half_width() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");

    let mut child = notes_cmd(&store)
        .arg("session")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"press 1 0 0\npointer 100 0\nrelease\npress 1 0 0\npointer 250 0\nrelease\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    assert_eq!(list_json(&store).len(), 4);
}

#[test]
fn test_corrupted_store_falls_back_to_seed() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");

    write_raw_notes(&store, "{not json");

    let notes = list_json(&store);
    assert_eq!(notes.len(), 5);
    assert!(notes.iter().all(|n| n["text"] == ""));
}

fn write_raw_notes(path: &Path, payload: &str) {
    use glassy_notes::storage::{KeyValueStore, SqliteStore, NOTES_KEY};
    let mut store = SqliteStore::open(path).unwrap();
    store.set(NOTES_KEY, payload).unwrap();
}

#[test]
fn test_stored_empty_list_stays_empty() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");
    write_raw_notes(&store, "[]");

    let output = notes_cmd(&store).args(["list"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No notes."));
}

#[test]
fn test_serve_has_no_network_option() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("store.db");

    let output = notes_cmd(&store)
        .args(["serve", "--http", "127.0.0.1:0"])
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--http"));
}
