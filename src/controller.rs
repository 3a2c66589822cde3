//! The ordered note list, its deletion history and the drag selection.
//!
//! `ListController` is a plain state machine. It never touches storage
//! itself; persistence hangs off the [`NotesObserver`] seam and is
//! notified with the full list after every successful mutation.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::entity::{Note, NoteId, INITIAL_NOTES_COUNT};
use crate::storage::{write_shared, KeyValueStore, SharedStore, NOTES_KEY};

/// Minimum id prefix length accepted by [`ListController::resolve`].
pub const MIN_ID_PREFIX_LENGTH: usize = 4;

/// A deleted note and the position it occupied when it was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionRecord {
    pub note: Note,
    pub index: usize,
}

/// Receives the full note list after every successful mutation.
pub trait NotesObserver: Send {
    fn notes_changed(&mut self, notes: &[Note]);
}

/// Writes the note list to [`NOTES_KEY`] as a JSON array.
///
/// Empty lists are never written, so an empty list observed during
/// startup cannot clobber a stored one.
pub struct NotesPersister<S: KeyValueStore + Send> {
    store: SharedStore<S>,
}

impl<S: KeyValueStore + Send> NotesPersister<S> {
    pub fn new(store: SharedStore<S>) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore + Send> NotesObserver for NotesPersister<S> {
    fn notes_changed(&mut self, notes: &[Note]) {
        if notes.is_empty() {
            debug!("skipping persistence of empty note list");
            return;
        }
        let payload = match serde_json::to_string(notes) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "failed to serialize notes");
                return;
            }
        };
        if let Err(e) = write_shared(&self.store, NOTES_KEY, &payload) {
            warn!(error = %e, "failed to persist notes");
        }
    }
}

pub struct ListController {
    notes: Vec<Note>,
    history: Vec<DeletionRecord>,
    dragging: Option<NoteId>,
    observers: Vec<Box<dyn NotesObserver>>,
}

impl Default for ListController {
    fn default() -> Self {
        Self::seeded()
    }
}

impl std::fmt::Debug for ListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("notes", &self.notes)
            .field("history", &self.history)
            .field("dragging", &self.dragging)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ListController {
    /// Controller over an explicit list, with empty history.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes,
            history: Vec::new(),
            dragging: None,
            observers: Vec::new(),
        }
    }

    /// Controller over `INITIAL_NOTES_COUNT` empty notes.
    pub fn seeded() -> Self {
        Self::with_notes(seed_notes())
    }

    /// Build from a stored payload, seeding when it is absent or malformed.
    pub fn from_payload(payload: Option<&str>) -> Self {
        match payload {
            None => {
                debug!("no stored notes, seeding");
                Self::seeded()
            }
            Some(raw) => match parse_notes(raw) {
                Some(notes) => Self::with_notes(notes),
                None => {
                    warn!("stored notes are malformed, seeding");
                    Self::seeded()
                }
            },
        }
    }

    /// Load the list from `store`. Read errors fall back to seeding.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(NOTES_KEY) {
            Ok(payload) => Self::from_payload(payload.as_deref()),
            Err(e) => {
                warn!(error = %e, "failed to read stored notes, seeding");
                Self::seeded()
            }
        }
    }

    /// Register an observer. It is not called for the current state.
    pub fn subscribe(&mut self, observer: Box<dyn NotesObserver>) {
        self.observers.push(observer);
    }

    /// Push the current list to every observer.
    pub fn publish(&mut self) {
        for observer in self.observers.iter_mut() {
            observer.notes_changed(&self.notes);
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn history(&self) -> &[DeletionRecord] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|n| &n.id == id)
    }

    /// Resolve a 1-based position or a unique id prefix to a note id.
    pub fn resolve(&self, query: &str) -> Option<NoteId> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if query.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(pos) = query.parse::<usize>() {
                if pos >= 1 && pos <= self.notes.len() {
                    return Some(self.notes[pos - 1].id.clone());
                }
            }
        }
        if let Some(note) = self.notes.iter().find(|n| n.id.as_str() == query) {
            return Some(note.id.clone());
        }
        if query.len() < MIN_ID_PREFIX_LENGTH {
            return None;
        }
        let mut matches = self
            .notes
            .iter()
            .filter(|n| n.id.as_str().starts_with(query));
        match (matches.next(), matches.next()) {
            (Some(note), None) => Some(note.id.clone()),
            _ => None,
        }
    }

    /// Append an empty note colored by the current list length.
    pub fn add_note(&mut self) -> NoteId {
        let note = Note::new(self.notes.len());
        let id = note.id.clone();
        debug!(id = %id, color = %note.color, "note added");
        self.notes.push(note);
        self.publish();
        id
    }

    /// Replace a note's text. Returns false when the id is unknown.
    pub fn update_text(&mut self, id: &NoteId, text: impl Into<String>) -> bool {
        let Some(note) = self.notes.iter_mut().find(|n| &n.id == id) else {
            return false;
        };
        note.text = text.into();
        debug!(id = %id, "note text committed");
        self.publish();
        true
    }

    /// Remove a note, remembering it and its position for undo.
    pub fn delete_note(&mut self, id: &NoteId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let note = self.notes.remove(index);
        debug!(id = %id, index, "note deleted");
        self.history.push(DeletionRecord { note, index });
        if self.dragging.as_ref() == Some(id) {
            self.dragging = None;
        }
        self.publish();
        true
    }

    /// Reinsert the most recently deleted note at its recorded index.
    ///
    /// The index is not adjusted for deletions made since; a position past
    /// the end of the current list appends.
    pub fn undo_delete(&mut self) -> bool {
        let Some(record) = self.history.pop() else {
            return false;
        };
        let at = record.index.min(self.notes.len());
        debug!(id = %record.note.id, index = record.index, at, "deletion undone");
        self.notes.insert(at, record.note);
        self.publish();
        true
    }

    /// Move `dragged` to the current index of `target`.
    pub fn reorder(&mut self, dragged: &NoteId, target: &NoteId) -> bool {
        if dragged == target {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(dragged), self.position(target)) else {
            return false;
        };
        let note = self.notes.remove(from);
        self.notes.insert(to, note);
        debug!(id = %dragged, from, to, "note reordered");
        self.publish();
        true
    }

    /// Start dragging a note. Unknown ids leave the selection untouched.
    pub fn begin_drag(&mut self, id: &NoteId) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.dragging = Some(id.clone());
        true
    }

    /// The pointer moved over `target` while dragging.
    pub fn drag_over(&mut self, target: &NoteId) -> bool {
        match self.dragging.clone() {
            Some(dragged) => self.reorder(&dragged, target),
            None => false,
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    pub fn dragging(&self) -> Option<&NoteId> {
        self.dragging.as_ref()
    }
}

fn seed_notes() -> Vec<Note> {
    (0..INITIAL_NOTES_COUNT).map(Note::new).collect()
}

/// Parse a stored payload. Duplicate ids make the payload malformed.
fn parse_notes(raw: &str) -> Option<Vec<Note>> {
    let notes: Vec<Note> = serde_json::from_str(raw).ok()?;
    let mut seen = HashSet::with_capacity(notes.len());
    if notes.iter().all(|n| seen.insert(n.id.clone())) {
        Some(notes)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{palette_color, PALETTE};
    use crate::storage::{read_shared, shared, MemoryStore};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        snapshots: Arc<Mutex<Vec<Vec<Note>>>>,
    }

    impl NotesObserver for Recorder {
        fn notes_changed(&mut self, notes: &[Note]) {
            self.snapshots.lock().unwrap().push(notes.to_vec());
        }
    }

    impl Recorder {
        fn count(&self) -> usize {
            self.snapshots.lock().unwrap().len()
        }
    }

    fn note(id: &str) -> Note {
        Note {
            id: NoteId::from(id),
            text: id.to_uppercase(),
            color: PALETTE[0].to_string(),
        }
    }

    fn ids(controller: &ListController) -> Vec<&str> {
        controller.notes().iter().map(|n| n.id.as_str()).collect()
    }

    fn three() -> ListController {
        ListController::with_notes(vec![note("n0"), note("n1"), note("n2")])
    }

    #[test]
    fn test_seeded_notes() {
        let controller = ListController::seeded();
        assert_eq!(controller.len(), INITIAL_NOTES_COUNT);
        for (i, n) in controller.notes().iter().enumerate() {
            assert!(n.text.is_empty());
            assert_eq!(n.color, palette_color(i));
        }
        assert!(controller.history().is_empty());
    }

    #[test]
    fn test_corrupted_payload_seeds() {
        for raw in ["not json", "{\"id\": 1}", "[{\"id\": \"a\"}]", "42"] {
            let controller = ListController::from_payload(Some(raw));
            assert_eq!(controller.len(), INITIAL_NOTES_COUNT, "payload {raw}");
            assert!(controller.notes().iter().all(|n| n.text.is_empty()));
        }
    }

    #[test]
    fn test_duplicate_ids_seed() {
        let raw = serde_json::to_string(&vec![note("a"), note("a")]).unwrap();
        let controller = ListController::from_payload(Some(&raw));
        assert_eq!(controller.len(), INITIAL_NOTES_COUNT);
        assert!(controller.get(&NoteId::from("a")).is_none());
    }

    #[test]
    fn test_load_stored_notes() {
        let raw = serde_json::to_string(&vec![note("x"), note("y")]).unwrap();
        let store = MemoryStore::with_entry(NOTES_KEY, &raw);
        let controller = ListController::load(&store);
        assert_eq!(ids(&controller), vec!["x", "y"]);
    }

    #[test]
    fn test_load_empty_array_stays_empty() {
        let controller = ListController::from_payload(Some("[]"));
        assert!(controller.is_empty());
    }

    #[test]
    fn test_add_note_uses_length_for_color() {
        let mut controller = three();
        let id = controller.add_note();
        let added = controller.get(&id).unwrap();
        assert_eq!(added.color, palette_color(3));
        assert!(added.text.is_empty());
        assert_eq!(controller.position(&id), Some(3));
    }

    #[test]
    fn test_update_text() {
        let mut controller = three();
        assert!(controller.update_text(&NoteId::from("n1"), "eggs"));
        assert_eq!(controller.get(&NoteId::from("n1")).unwrap().text, "eggs");
        assert!(!controller.update_text(&NoteId::from("missing"), "x"));
    }

    #[test]
    fn test_delete_records_history() {
        let mut controller = three();
        assert!(controller.delete_note(&NoteId::from("n1")));
        assert_eq!(ids(&controller), vec!["n0", "n2"]);
        assert_eq!(controller.history().len(), 1);
        assert_eq!(controller.history()[0].index, 1);
        assert_eq!(controller.history()[0].note.id.as_str(), "n1");

        assert!(!controller.delete_note(&NoteId::from("n1")));
        assert_eq!(controller.history().len(), 1);
    }

    #[test]
    fn test_delete_then_undo_restores_list() {
        let mut controller = three();
        let before = controller.notes().to_vec();
        controller.delete_note(&NoteId::from("n0"));
        assert!(controller.undo_delete());
        assert_eq!(controller.notes(), before.as_slice());
        assert!(controller.history().is_empty());
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut controller = three();
        let recorder = Recorder::default();
        controller.subscribe(Box::new(recorder.clone()));
        assert!(!controller.undo_delete());
        assert_eq!(ids(&controller), vec!["n0", "n1", "n2"]);
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_undo_order_is_most_recent_first() {
        let mut controller = three();
        controller.delete_note(&NoteId::from("n0"));
        controller.delete_note(&NoteId::from("n2"));
        controller.undo_delete();
        assert_eq!(ids(&controller), vec!["n1", "n2"]);
        controller.undo_delete();
        assert_eq!(ids(&controller), vec!["n0", "n1", "n2"]);
    }

    #[test]
    fn test_undo_past_end_appends() {
        let mut controller = three();
        controller.delete_note(&NoteId::from("n2"));
        controller.delete_note(&NoteId::from("n0"));
        controller.delete_note(&NoteId::from("n1"));
        let kept = controller.history.pop().unwrap();
        let kept_too = controller.history.pop().unwrap();
        assert_eq!(controller.history()[0].index, 2);
        assert!(controller.is_empty());

        // n2 was recorded at index 2 but the list is empty now.
        assert!(controller.undo_delete());
        assert_eq!(ids(&controller), vec!["n2"]);
        assert_eq!((kept.index, kept_too.index), (0, 0));

        let mut controller = ListController::with_notes(vec![note("a")]);
        controller.history.push(DeletionRecord {
            note: note("late"),
            index: 4,
        });
        assert!(controller.undo_delete());
        assert_eq!(ids(&controller), vec!["a", "late"]);
    }

    #[test]
    fn test_reorder_moves_to_target_index() {
        let mut controller = three();
        assert!(controller.reorder(&NoteId::from("n0"), &NoteId::from("n2")));
        assert_eq!(ids(&controller), vec!["n1", "n2", "n0"]);

        assert!(controller.reorder(&NoteId::from("n0"), &NoteId::from("n1")));
        assert_eq!(ids(&controller), vec!["n0", "n1", "n2"]);
    }

    #[test]
    fn test_reorder_onto_self_or_unknown_is_noop() {
        let mut controller = three();
        let recorder = Recorder::default();
        controller.subscribe(Box::new(recorder.clone()));
        assert!(!controller.reorder(&NoteId::from("n1"), &NoteId::from("n1")));
        assert!(!controller.reorder(&NoteId::from("zz"), &NoteId::from("n1")));
        assert!(!controller.reorder(&NoteId::from("n1"), &NoteId::from("zz")));
        assert_eq!(ids(&controller), vec!["n0", "n1", "n2"]);
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_drag_over_is_continuous() {
        let mut controller = ListController::with_notes(vec![
            note("n0"),
            note("n1"),
            note("n2"),
            note("n3"),
        ]);
        assert!(controller.begin_drag(&NoteId::from("n0")));
        assert!(controller.drag_over(&NoteId::from("n1")));
        assert_eq!(ids(&controller), vec!["n1", "n0", "n2", "n3"]);
        assert!(!controller.drag_over(&NoteId::from("n0")));
        assert!(controller.drag_over(&NoteId::from("n2")));
        assert!(controller.drag_over(&NoteId::from("n3")));
        assert_eq!(ids(&controller), vec!["n1", "n2", "n3", "n0"]);

        controller.end_drag();
        assert!(controller.dragging().is_none());
        assert!(!controller.drag_over(&NoteId::from("n1")));
    }

    #[test]
    fn test_begin_drag_unknown_id() {
        let mut controller = three();
        assert!(!controller.begin_drag(&NoteId::from("nope")));
        assert!(controller.dragging().is_none());
    }

    #[test]
    fn test_observer_sees_each_mutation() {
        let mut controller = three();
        let recorder = Recorder::default();
        controller.subscribe(Box::new(recorder.clone()));

        let id = controller.add_note();
        controller.update_text(&id, "hi");
        controller.delete_note(&id);
        controller.undo_delete();
        controller.reorder(&id, &NoteId::from("n0"));
        assert_eq!(recorder.count(), 5);

        let last = recorder.snapshots.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last[0].id, id);
        assert_eq!(last[0].text, "hi");
    }

    #[test]
    fn test_persister_writes_json_and_skips_empty() {
        let store = shared(MemoryStore::new());
        let mut persister = NotesPersister::new(store.clone());

        persister.notes_changed(&[]);
        assert_eq!(read_shared(&store, NOTES_KEY).unwrap(), None);

        persister.notes_changed(&[note("a")]);
        let raw = read_shared(&store, NOTES_KEY).unwrap().unwrap();
        let parsed: Vec<Note> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, vec![note("a")]);

        persister.notes_changed(&[]);
        assert!(read_shared(&store, NOTES_KEY).unwrap().is_some());
    }

    #[test]
    fn test_resolve() {
        let controller = ListController::with_notes(vec![
            note("abcd-1111"),
            note("abcd-2222"),
            note("ef01-3333"),
        ]);
        assert_eq!(controller.resolve("1").unwrap().as_str(), "abcd-1111");
        assert_eq!(controller.resolve("3").unwrap().as_str(), "ef01-3333");
        assert!(controller.resolve("0").is_none());
        assert!(controller.resolve("4").is_none());
        assert_eq!(controller.resolve("ef01").unwrap().as_str(), "ef01-3333");
        assert!(controller.resolve("abcd").is_none(), "ambiguous prefix");
        assert!(controller.resolve("ef").is_none(), "prefix too short");
        assert_eq!(
            controller.resolve("abcd-2222").unwrap().as_str(),
            "abcd-2222"
        );
    }

    #[test]
    fn test_length_tracks_adds_minus_deletes() {
        let mut controller = ListController::with_notes(Vec::new());
        let mut added = Vec::new();
        for _ in 0..6 {
            added.push(controller.add_note());
        }
        controller.delete_note(&added[1]);
        controller.delete_note(&added[4]);
        controller.delete_note(&added[1]);
        controller.delete_note(&NoteId::from("ghost"));
        assert_eq!(controller.len(), 4);

        let unique: HashSet<_> = controller.notes().iter().map(|n| &n.id).collect();
        assert_eq!(unique.len(), controller.len());
    }
}
