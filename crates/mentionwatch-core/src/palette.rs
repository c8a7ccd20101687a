//! Stable keyword colors.
//!
//! Each keyword is assigned the next palette slot the first time it is seen.
//! The slot index doubles as the keyword's rank (0-based first-seen order),
//! which the chart uses for stacking. Once exhausted, the palette wraps and
//! colors repeat; ranks never do.

use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Rgb
// ---------------------------------------------------------------------------

/// A 24-bit display color, independent of any rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Lowercase `#rrggbb`.
    pub fn hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Fixed warm palette, in assignment order.
pub const PALETTE: [Rgb; 11] = [
    Rgb(0xff, 0x7e, 0x0e), // vivid orange
    Rgb(0xd6, 0x27, 0x28), // red
    Rgb(0x94, 0x67, 0xbd), // purple
    Rgb(0xe6, 0x55, 0x0d), // orange-red
    Rgb(0xcc, 0x47, 0x78), // magenta
    Rgb(0x8e, 0x01, 0x52), // crimson-magenta
    Rgb(0xef, 0xd5, 0x11), // yellow
    Rgb(0x4b, 0x1a, 0x54), // deep purple
    Rgb(0xe5, 0x10, 0x82), // fuchsia
    Rgb(0xf7, 0x7e, 0x13), // burnt orange
    Rgb(0xe7, 0xbb, 0x0b), // amber
];

/// Palette entry for a given rank, wrapping once the palette is exhausted.
pub fn color_for_rank(rank: usize) -> Rgb {
    PALETTE[rank % PALETTE.len()]
}

// ---------------------------------------------------------------------------
// Colorizer
// ---------------------------------------------------------------------------

/// A keyword's permanent display slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub rank: usize,
    pub color: Rgb,
}

/// One-way keyword → [`Assignment`] map, built incrementally.
#[derive(Debug, Clone, Default)]
pub struct Colorizer {
    assignments: HashMap<String, Assignment>,
}

impl Colorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the keyword's assignment, creating it on first sight.
    pub fn assign(&mut self, keyword: &str) -> Assignment {
        if let Some(existing) = self.assignments.get(keyword) {
            return *existing;
        }
        let rank = self.assignments.len();
        let assignment = Assignment {
            rank,
            color: color_for_rank(rank),
        };
        self.assignments.insert(keyword.to_string(), assignment);
        assignment
    }

    pub fn get(&self, keyword: &str) -> Option<Assignment> {
        self.assignments.get(keyword).copied()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
