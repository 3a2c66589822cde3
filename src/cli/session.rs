//! Line-oriented interactive session.
//!
//! Each input line is one host event or shortcut. The board lives for the
//! whole session, so undo history, lock mode and in-flight gestures carry
//! over from line to line.

use std::io::{BufRead, Write};

use crate::board::{Board, KeyChord, PANEL_WIDTH};
use crate::entity::NoteId;
use crate::error::Result;
use crate::gesture::Point;
use crate::storage::KeyValueStore;

const HELP: &str = "\
commands:
  list | view | json            show the panel
  add [TEXT]                    append a note
  edit ID TEXT                  edit a note and commit
  dblclick ID | type ID TEXT    open the editor, replace its buffer
  enter ID | blur ID            commit the editor
  delete ID                     delete a note
  undo | key CHORD              undo (ctrl+z / cmd+z)
  move ID TARGET                drag ID over TARGET and drop
  drag ID | over ID | drop      native reorder drag
  press ID X Y | pointer X Y    start a swipe, move the pointer
  release [WIDTH]               release the pointer (row width, default 400)
  lock | opacity VALUE          toggle lock, set background opacity
  quit";

pub struct Session<S: KeyValueStore + Send + 'static> {
    board: Board<S>,
}

/// Outcome of one input line.
enum Step {
    Continue,
    Quit,
}

impl<S: KeyValueStore + Send + 'static> Session<S> {
    pub fn new(board: Board<S>) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &Board<S> {
        &self.board
    }

    /// Process lines until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W, interactive: bool) -> Result<()> {
        if interactive {
            writeln!(out, "{}", self.board.view().render_text())?;
            writeln!(out, "type 'help' for commands")?;
        }
        for line in input.lines() {
            let line = line?;
            match self.execute(line.trim(), out)? {
                Step::Continue => {}
                Step::Quit => break,
            }
            out.flush()?;
        }
        Ok(())
    }

    fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Step> {
        if line.is_empty() || line.starts_with('#') {
            return Ok(Step::Continue);
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        match command {
            "quit" | "exit" => return Ok(Step::Quit),
            "help" => writeln!(out, "{}", HELP)?,
            "list" | "view" => writeln!(out, "{}", self.board.view().render_text())?,
            "json" => writeln!(out, "{}", serde_json::to_string_pretty(&self.board.view())?)?,
            "add" => match self.board.add_note() {
                Some(id) => {
                    if !rest.is_empty() {
                        self.board.update_text(&id, rest);
                    }
                    writeln!(out, "added {}", id.short())?;
                }
                None => writeln!(out, "locked")?,
            },
            "edit" => {
                let Some((id, text)) = self.id_and_text(rest, out)? else {
                    return Ok(Step::Continue);
                };
                let opened = self.board.double_activate(&id);
                if opened && self.board.edit_input(&id, text) && self.board.confirm(&id) {
                    writeln!(out, "updated {}", id.short())?;
                } else {
                    writeln!(out, "not editable")?;
                }
            }
            "dblclick" => {
                if let Some(id) = self.note_arg(args.first(), out)? {
                    let opened = self.board.double_activate(&id);
                    writeln!(out, "{}", if opened { "editing" } else { "ignored" })?;
                }
            }
            "type" => {
                if let Some((id, text)) = self.id_and_text(rest, out)? {
                    let typed = self.board.edit_input(&id, text);
                    writeln!(out, "{}", if typed { "ok" } else { "not editing" })?;
                }
            }
            "enter" | "blur" => {
                if let Some(id) = self.note_arg(args.first(), out)? {
                    let committed = if command == "enter" {
                        self.board.confirm(&id)
                    } else {
                        self.board.blur(&id)
                    };
                    writeln!(out, "{}", if committed { "committed" } else { "not editing" })?;
                }
            }
            "delete" => {
                if let Some(id) = self.note_arg(args.first(), out)? {
                    let deleted = self.board.delete_note(&id);
                    writeln!(out, "{}", if deleted { "deleted" } else { "locked" })?;
                }
            }
            "undo" => {
                self.board.handle_key(KeyChord::ctrl('z'));
                writeln!(out, "{} notes", self.board.notes().len())?;
            }
            "key" => match rest.parse::<KeyChord>() {
                Ok(chord) => {
                    let handled = self.board.handle_key(chord);
                    writeln!(out, "{}", if handled { "handled" } else { "ignored" })?;
                }
                Err(e) => writeln!(out, "{}", e)?,
            },
            "move" => {
                let Some(id) = self.note_arg(args.first(), out)? else {
                    return Ok(Step::Continue);
                };
                let Some(target) = self.note_arg(args.get(1), out)? else {
                    return Ok(Step::Continue);
                };
                let moved = self.board.drag_start(&id) && self.board.drag_over(&target);
                self.board.drag_end();
                writeln!(out, "{}", if moved { "moved" } else { "unchanged" })?;
            }
            "drag" => {
                if let Some(id) = self.note_arg(args.first(), out)? {
                    let started = self.board.drag_start(&id);
                    writeln!(out, "{}", if started { "dragging" } else { "not draggable" })?;
                }
            }
            "over" => {
                if let Some(target) = self.note_arg(args.first(), out)? {
                    let moved = self.board.drag_over(&target);
                    writeln!(out, "{}", if moved { "moved" } else { "unchanged" })?;
                }
            }
            "drop" => {
                self.board.drag_end();
                writeln!(out, "dropped")?;
            }
            "press" => {
                let Some(id) = self.note_arg(args.first(), out)? else {
                    return Ok(Step::Continue);
                };
                match parse_point(&args[1..]) {
                    Some(at) => {
                        let started = self.board.pointer_down(&id, at);
                        writeln!(out, "{}", if started { "swiping" } else { "ignored" })?;
                    }
                    None => writeln!(out, "usage: press ID X Y")?,
                }
            }
            "pointer" => match parse_point(&args) {
                Some(at) => {
                    self.board.pointer_move(at);
                    writeln!(out, "ok")?;
                }
                None => writeln!(out, "usage: pointer X Y")?,
            },
            "release" => {
                let width = match args.first() {
                    Some(raw) => match raw.parse::<f64>() {
                        Ok(width) => width,
                        Err(_) => {
                            writeln!(out, "usage: release [WIDTH]")?;
                            return Ok(Step::Continue);
                        }
                    },
                    None => PANEL_WIDTH,
                };
                let deleted = self.board.pointer_up(width);
                if deleted.is_empty() {
                    writeln!(out, "released")?;
                } else {
                    let ids: Vec<&str> = deleted.iter().map(|id| id.short()).collect();
                    writeln!(out, "deleted {}", ids.join(" "))?;
                }
            }
            "lock" => {
                let locked = self.board.toggle_lock();
                writeln!(out, "{}", if locked { "locked" } else { "unlocked" })?;
            }
            "opacity" => match rest.parse::<f64>() {
                Ok(value) => match self.board.set_opacity(value) {
                    Some(opacity) => writeln!(out, "opacity {}", opacity)?,
                    None => writeln!(out, "locked")?,
                },
                Err(_) => writeln!(out, "opacity {}", self.board.opacity())?,
            },
            other => writeln!(out, "unknown command '{}', try 'help'", other)?,
        }
        Ok(Step::Continue)
    }

    fn note_arg<W: Write>(&self, arg: Option<&&str>, out: &mut W) -> Result<Option<NoteId>> {
        let Some(query) = arg else {
            writeln!(out, "missing note id")?;
            return Ok(None);
        };
        let resolved = self.board.resolve(query);
        if resolved.is_none() {
            writeln!(out, "no note matching '{}'", query)?;
        }
        Ok(resolved)
    }

    fn id_and_text<'a, W: Write>(
        &self,
        rest: &'a str,
        out: &mut W,
    ) -> Result<Option<(NoteId, &'a str)>> {
        let (query, text) = match rest.split_once(char::is_whitespace) {
            Some((query, text)) => (query, text.trim()),
            None => (rest, ""),
        };
        let query = if query.is_empty() { None } else { Some(query) };
        Ok(self.note_arg(query.as_ref(), out)?.map(|id| (id, text)))
    }
}

fn parse_point(args: &[&str]) -> Option<Point> {
    match args {
        [x, y, ..] => Some(Point::new(x.parse().ok()?, y.parse().ok()?)),
        _ => None,
    }
}
