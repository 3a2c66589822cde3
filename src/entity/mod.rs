mod note;
mod palette;

pub use note::{Note, NoteId};
pub use palette::{palette_color, INITIAL_NOTES_COUNT, PALETTE};
