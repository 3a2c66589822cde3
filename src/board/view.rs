use serde::Serialize;

use crate::entity::NoteId;

pub const PANEL_WIDTH: f64 = 400.0;
pub const PANEL_HEIGHT: f64 = 600.0;
pub const PANEL_TITLE: &str = "Glassy Notes";

/// Shown in place of empty note text while unlocked.
pub const EMPTY_PLACEHOLDER: &str = "...";

pub const UNLOCKED_HINT: &str =
    "Swipe right to delete • Ctrl+Z to undo • Drag vertically to reorder";
pub const LOCKED_HINT: &str = "Locked - click-through mode";

/// Render model for the whole panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub width: f64,
    pub height: f64,
    pub background_opacity: f64,
    pub border_opacity: f64,
    pub locked: bool,
    pub header: HeaderView,
    pub rows: Vec<RowView>,
    pub footer_hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderView {
    pub title: String,
    pub show_opacity_slider: bool,
    pub show_add_button: bool,
    pub lock_icon: LockIcon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LockIcon {
    Locked,
    Unlocked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub id: NoteId,
    pub text: String,
    pub color: String,
    /// Edit buffer while the row is being edited.
    pub editing: Option<String>,
    pub offset: f64,
    pub delete_affordance_opacity: f64,
    pub dragging: bool,
    pub draggable: bool,
}

impl PanelView {
    /// Plain-text rendering used by the interactive session.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let lock = match self.header.lock_icon {
            LockIcon::Locked => "[locked]",
            LockIcon::Unlocked => "[unlocked]",
        };
        out.push_str(&format!("{} {}", self.header.title, lock));
        if self.header.show_opacity_slider {
            out.push_str(&format!("  opacity {:.2}", self.background_opacity));
        }
        if self.header.show_add_button {
            out.push_str("  [+]");
        }
        out.push('\n');

        for (i, row) in self.rows.iter().enumerate() {
            let text = match &row.editing {
                Some(buffer) => format!("{}_", buffer),
                None => row.text.clone(),
            };
            let mut marks = String::new();
            if row.dragging {
                marks.push_str(" (dragging)");
            }
            if row.offset > 0.0 {
                marks.push_str(&format!(" (swipe {:.0})", row.offset));
            }
            if row.delete_affordance_opacity > 0.0 {
                marks.push_str(" [delete]");
            }
            out.push_str(&format!(
                "  {:>2}. ({}) {} {}{}\n",
                i + 1,
                row.id.short(),
                row.color,
                text,
                marks
            ));
        }

        out.push_str(&self.footer_hint);
        out
    }
}
