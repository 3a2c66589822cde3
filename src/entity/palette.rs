/// Row colors, assigned round-robin by list position at creation time.
pub const PALETTE: [&str; 8] = [
    "#FFADAD", // soft red
    "#FFD6A5", // soft orange
    "#FDFFB6", // soft yellow
    "#CAFFBF", // soft green
    "#9BF6FF", // soft blue
    "#A0C4FF", // periwinkle
    "#BDB2FF", // soft purple
    "#FFC6FF", // soft pink
];

/// Number of empty notes seeded when nothing usable is stored.
pub const INITIAL_NOTES_COUNT: usize = 5;

pub fn palette_color(position: usize) -> &'static str {
    PALETTE[position % PALETTE.len()]
}
