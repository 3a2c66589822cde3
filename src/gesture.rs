//! Per-row pointer and edit gesture interpretation.
//!
//! A row is either idle, being edited, or being swiped. Keeping these in
//! one enum makes the three interaction modes mutually exclusive.

use serde::{Deserialize, Serialize};

/// Vertical travel beyond which a swipe is handed over to reordering.
pub const VERTICAL_INTENT_DY: f64 = 20.0;

/// Horizontal travel below which vertical travel counts as reorder intent.
pub const VERTICAL_INTENT_MAX_DX: f64 = 10.0;

/// Offset past which the delete affordance becomes visible.
pub const AFFORDANCE_OFFSET: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ItemState {
    #[default]
    Idle,
    Editing {
        buffer: String,
    },
    Swiping {
        start: Point,
        offset: f64,
    },
}

/// What a gesture asks of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Replace the note text with the edit buffer.
    Commit(String),
    /// Delete the note.
    Delete,
}

#[derive(Debug, Clone, Default)]
pub struct ItemGesture {
    state: ItemState,
}

impl ItemGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ItemState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, ItemState::Editing { .. })
    }

    pub fn is_swiping(&self) -> bool {
        matches!(self.state, ItemState::Swiping { .. })
    }

    /// Current edit buffer, if editing.
    pub fn buffer(&self) -> Option<&str> {
        match &self.state {
            ItemState::Editing { buffer } => Some(buffer),
            _ => None,
        }
    }

    /// Visible horizontal offset of the row.
    pub fn offset(&self) -> f64 {
        match self.state {
            ItemState::Swiping { offset, .. } => offset,
            _ => 0.0,
        }
    }

    /// Opacity of the delete layer behind the row.
    pub fn delete_affordance_opacity(&self) -> f64 {
        if self.offset() > AFFORDANCE_OFFSET {
            1.0
        } else {
            0.0
        }
    }

    /// Whether the row may start a native reorder drag.
    pub fn draggable(&self, locked: bool) -> bool {
        !locked && matches!(self.state, ItemState::Idle)
    }

    /// Double activation on the text region opens the editor.
    pub fn double_activate(&mut self, text: &str, locked: bool) -> bool {
        if locked || !matches!(self.state, ItemState::Idle) {
            return false;
        }
        self.state = ItemState::Editing {
            buffer: text.to_string(),
        };
        true
    }

    /// Replace the edit buffer. Ignored outside editing.
    pub fn input(&mut self, text: &str) -> bool {
        match &mut self.state {
            ItemState::Editing { buffer } => {
                *buffer = text.to_string();
                true
            }
            _ => false,
        }
    }

    /// Focus left the editor: commit the buffer, changed or not.
    pub fn blur(&mut self) -> Option<GestureOutcome> {
        match std::mem::take(&mut self.state) {
            ItemState::Editing { buffer } => Some(GestureOutcome::Commit(buffer)),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// The confirm key drops focus, which commits.
    pub fn confirm(&mut self) -> Option<GestureOutcome> {
        self.blur()
    }

    /// Pointer pressed on the row body.
    pub fn pointer_down(&mut self, at: Point, locked: bool) -> bool {
        if locked || self.is_editing() {
            return false;
        }
        self.state = ItemState::Swiping {
            start: at,
            offset: 0.0,
        };
        true
    }

    /// Pointer moved while the row may be swiping.
    pub fn pointer_move(&mut self, at: Point) {
        let ItemState::Swiping { start, .. } = self.state else {
            return;
        };
        let delta_x = at.x - start.x;
        let delta_y = (at.y - start.y).abs();

        if delta_y > VERTICAL_INTENT_DY && delta_x.abs() < VERTICAL_INTENT_MAX_DX {
            self.state = ItemState::Idle;
            return;
        }

        self.state = ItemState::Swiping {
            start,
            offset: delta_x.max(0.0),
        };
    }

    /// Abandon a swipe in progress without deleting.
    pub fn cancel_swipe(&mut self) -> bool {
        if !self.is_swiping() {
            return false;
        }
        self.state = ItemState::Idle;
        true
    }

    /// Pointer released. Deletes when dragged past half the row width.
    pub fn pointer_up(&mut self, row_width: f64) -> Option<GestureOutcome> {
        let ItemState::Swiping { offset, .. } = self.state else {
            return None;
        };
        self.state = ItemState::Idle;
        if offset > row_width / 2.0 {
            Some(GestureOutcome::Delete)
        } else {
            None
        }
    }
}
