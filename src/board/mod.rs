//! The notes panel: list, per-row gestures, lock mode and settings.
//!
//! `Board` is the single state container the host drives. Every input
//! (pointer, key, focus) is a method call, so the global undo binding
//! reads whatever the current history is rather than a captured copy.

mod keys;
mod view;

use std::collections::HashMap;

use tracing::{debug, warn};

pub use keys::KeyChord;
pub use view::{
    HeaderView, LockIcon, PanelView, RowView, EMPTY_PLACEHOLDER, LOCKED_HINT, PANEL_HEIGHT,
    PANEL_TITLE, PANEL_WIDTH, UNLOCKED_HINT,
};

use crate::controller::{ListController, NotesPersister};
use crate::entity::{Note, NoteId};
use crate::gesture::{GestureOutcome, ItemGesture, Point};
use crate::settings::{Opacity, Settings};
use crate::storage::{read_shared, shared, KeyValueStore, SharedStore, NOTES_KEY};

pub struct Board<S: KeyValueStore + Send + 'static> {
    list: ListController,
    gestures: HashMap<NoteId, ItemGesture>,
    settings: Settings<S>,
    locked: bool,
}

impl<S: KeyValueStore + Send + 'static> Board<S> {
    pub fn open(store: S) -> Self {
        Self::open_shared(shared(store))
    }

    /// Load notes and settings from `store` and persist from then on.
    pub fn open_shared(store: SharedStore<S>) -> Self {
        let mut list = match read_shared(&store, NOTES_KEY) {
            Ok(payload) => ListController::from_payload(payload.as_deref()),
            Err(e) => {
                warn!(error = %e, "failed to read stored notes, seeding");
                ListController::seeded()
            }
        };
        list.subscribe(Box::new(NotesPersister::new(store.clone())));
        // Write back what was loaded so a fresh seed is durable.
        list.publish();

        let settings = Settings::load(store);
        debug!(notes = list.len(), opacity = %settings.opacity(), "board opened");

        Self {
            list,
            gestures: HashMap::new(),
            settings,
            locked: false,
        }
    }

    pub fn list(&self) -> &ListController {
        &self.list
    }

    pub fn notes(&self) -> &[Note] {
        self.list.notes()
    }

    pub fn resolve(&self, query: &str) -> Option<NoteId> {
        self.list.resolve(query)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Locking takes focus from any open editor, which commits it, and
    /// abandons swipes and drags in progress.
    pub fn set_locked(&mut self, locked: bool) {
        if locked {
            for id in self.editing_rows(None) {
                self.blur(&id);
            }
            for gesture in self.gestures.values_mut() {
                gesture.cancel_swipe();
            }
            self.list.end_drag();
        }
        self.locked = locked;
        debug!(locked, "lock mode changed");
    }

    pub fn toggle_lock(&mut self) -> bool {
        self.set_locked(!self.locked);
        self.locked
    }

    pub fn opacity(&self) -> Opacity {
        self.settings.opacity()
    }

    /// Move the opacity slider. The slider is hidden while locked and
    /// moves in `Opacity::STEP` increments.
    pub fn set_opacity(&mut self, value: f64) -> Option<Opacity> {
        if self.locked {
            return None;
        }
        Some(self.settings.set_opacity(Opacity::snapped(value).value()))
    }

    /// The add button. Hidden while locked.
    pub fn add_note(&mut self) -> Option<NoteId> {
        if self.locked {
            return None;
        }
        Some(self.list.add_note())
    }

    /// Replace a note's text directly, bypassing the editor.
    pub fn update_text(&mut self, id: &NoteId, text: &str) -> bool {
        !self.locked && self.list.update_text(id, text)
    }

    pub fn delete_note(&mut self, id: &NoteId) -> bool {
        if self.locked {
            return false;
        }
        self.remove(id)
    }

    pub fn reorder(&mut self, dragged: &NoteId, target: &NoteId) -> bool {
        !self.locked && self.list.reorder(dragged, target)
    }

    /// Undo the last deletion. Available in every mode.
    pub fn undo_delete(&mut self) -> bool {
        self.list.undo_delete()
    }

    /// Global key handler. Returns true when the chord was consumed.
    pub fn handle_key(&mut self, chord: KeyChord) -> bool {
        if chord.is_undo() {
            self.undo_delete();
            return true;
        }
        false
    }

    pub fn gesture(&self, id: &NoteId) -> Option<&ItemGesture> {
        self.gestures.get(id)
    }

    fn gesture_mut(&mut self, id: &NoteId) -> Option<&mut ItemGesture> {
        self.list.get(id)?;
        Some(self.gestures.entry(id.clone()).or_default())
    }

    pub fn double_activate(&mut self, id: &NoteId) -> bool {
        let locked = self.locked;
        let Some(text) = self.list.get(id).map(|n| n.text.clone()) else {
            return false;
        };
        let opened = self
            .gesture_mut(id)
            .is_some_and(|g| g.double_activate(&text, locked));
        if opened {
            // Only one editor holds focus.
            for other in self.editing_rows(Some(id)) {
                self.blur(&other);
            }
        }
        opened
    }

    fn editing_rows(&self, except: Option<&NoteId>) -> Vec<NoteId> {
        self.gestures
            .iter()
            .filter(|(id, g)| g.is_editing() && Some(*id) != except)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn edit_input(&mut self, id: &NoteId, text: &str) -> bool {
        self.gesture_mut(id).is_some_and(|g| g.input(text))
    }

    /// Focus left the row editor.
    pub fn blur(&mut self, id: &NoteId) -> bool {
        let outcome = self.gesture_mut(id).and_then(|g| g.blur());
        self.apply(id, outcome)
    }

    /// Confirm key inside the row editor.
    pub fn confirm(&mut self, id: &NoteId) -> bool {
        let outcome = self.gesture_mut(id).and_then(|g| g.confirm());
        self.apply(id, outcome)
    }

    pub fn pointer_down(&mut self, id: &NoteId, at: Point) -> bool {
        let locked = self.locked;
        self.gesture_mut(id)
            .is_some_and(|g| g.pointer_down(at, locked))
    }

    /// Window-level pointer move, seen by every swiping row.
    pub fn pointer_move(&mut self, at: Point) {
        for gesture in self.gestures.values_mut() {
            gesture.pointer_move(at);
        }
    }

    /// Window-level pointer release. Returns the ids that were deleted.
    pub fn pointer_up(&mut self, row_width: f64) -> Vec<NoteId> {
        let released: Vec<(NoteId, Option<GestureOutcome>)> = self
            .gestures
            .iter_mut()
            .filter(|(_, g)| g.is_swiping())
            .map(|(id, g)| (id.clone(), g.pointer_up(row_width)))
            .collect();

        let mut deleted = Vec::new();
        for (id, outcome) in released {
            if self.apply(&id, outcome) {
                deleted.push(id);
            }
        }
        deleted
    }

    /// Native drag start. Refused while locked, editing or swiping.
    pub fn drag_start(&mut self, id: &NoteId) -> bool {
        let draggable = self
            .gestures
            .get(id)
            .map_or(!self.locked, |g| g.draggable(self.locked));
        draggable && self.list.begin_drag(id)
    }

    pub fn drag_over(&mut self, target: &NoteId) -> bool {
        !self.locked && self.list.drag_over(target)
    }

    pub fn drag_end(&mut self) {
        self.list.end_drag();
    }

    fn apply(&mut self, id: &NoteId, outcome: Option<GestureOutcome>) -> bool {
        match outcome {
            Some(GestureOutcome::Commit(text)) => self.list.update_text(id, text),
            Some(GestureOutcome::Delete) => !self.locked && self.remove(id),
            None => false,
        }
    }

    fn remove(&mut self, id: &NoteId) -> bool {
        let removed = self.list.delete_note(id);
        if removed {
            self.gestures.remove(id);
        }
        removed
    }

    pub fn view(&self) -> PanelView {
        let dragging = self.list.dragging();
        let rows = self
            .list
            .notes()
            .iter()
            .map(|note| {
                let gesture = self.gestures.get(&note.id);
                let text = if note.text.is_empty() && !self.locked {
                    EMPTY_PLACEHOLDER.to_string()
                } else {
                    note.text.clone()
                };
                RowView {
                    id: note.id.clone(),
                    text,
                    color: note.color.clone(),
                    editing: gesture.and_then(|g| g.buffer()).map(str::to_string),
                    offset: gesture.map_or(0.0, |g| g.offset()),
                    delete_affordance_opacity: gesture
                        .map_or(0.0, |g| g.delete_affordance_opacity()),
                    dragging: dragging == Some(&note.id),
                    draggable: gesture.map_or(!self.locked, |g| g.draggable(self.locked)),
                }
            })
            .collect();

        PanelView {
            width: PANEL_WIDTH,
            height: PANEL_HEIGHT,
            background_opacity: self.settings.opacity().value(),
            border_opacity: if self.locked { 0.05 } else { 0.15 },
            locked: self.locked,
            header: HeaderView {
                title: PANEL_TITLE.to_string(),
                show_opacity_slider: !self.locked,
                show_add_button: !self.locked,
                lock_icon: if self.locked {
                    LockIcon::Locked
                } else {
                    LockIcon::Unlocked
                },
            },
            rows,
            footer_hint: if self.locked {
                LOCKED_HINT.to_string()
            } else {
                UNLOCKED_HINT.to_string()
            },
        }
    }
}
