use crate::units::*;

/// A rectangle, specified by two opposite corners. Coordinates follow screen
/// conventions: the origin is the top-left corner of the page and y grows downwards.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rect {
    /// The x-coordinate of the top-left corner.
    pub x1: Pt,
    /// The y-coordinate of the top-left corner.
    pub y1: Pt,
    /// The x-coordinate of the bottom-right corner.
    pub x2: Pt,
    /// The y-coordinate of the bottom-right corner.
    pub y2: Pt,
}

impl Rect {
    /// A rectangle of the given size with its top-left corner at the origin
    pub fn from_size(width: Pt, height: Pt) -> Rect {
        Rect {
            x1: Pt::ZERO,
            y1: Pt::ZERO,
            x2: width,
            y2: height,
        }
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    /// Whether the rectangle encloses a positive area
    pub fn is_empty(&self) -> bool {
        self.width() <= Pt::ZERO || self.height() <= Pt::ZERO
    }
}
