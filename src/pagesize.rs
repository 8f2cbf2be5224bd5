//! Paper sizes a manuscript is commonly laid out on.
//!
//! All sizes are given in portrait orientation, i.e. `width <= height`. Use
//! [`PageSize::landscape`] and [`PageSize::portrait`] to flip between the two.
//!
//! ```
//! use page_flow::pagesize::{LETTER, A4};
//! use page_flow::Pt;
//!
//! assert_eq!(LETTER.width, Pt(612.0));
//! assert!(A4.landscape().width > A4.landscape().height);
//! ```

use crate::rect::Rect;
use crate::units::Pt;

/// The physical dimensions of a page, in points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PageSize {
    pub width: Pt,
    pub height: Pt,
}

const fn inches(width: f32, height: f32) -> PageSize {
    PageSize {
        width: Pt(width * 72.0),
        height: Pt(height * 72.0),
    }
}

const fn millimetres(width: f32, height: f32) -> PageSize {
    PageSize {
        width: Pt(width * 72.0 / 25.4),
        height: Pt(height * 72.0 / 25.4),
    }
}

// north american sizes
pub const LETTER: PageSize = inches(8.5, 11.0);
pub const HALF_LETTER: PageSize = inches(5.5, 8.5);
pub const LEGAL: PageSize = inches(8.5, 14.0);

// trade book trims
pub const TRADE_6X9: PageSize = inches(6.0, 9.0);
pub const DIGEST_5_5X8_5: PageSize = inches(5.5, 8.5);

// iso a-series
pub const A4: PageSize = millimetres(210.0, 297.0);
pub const A5: PageSize = millimetres(148.0, 210.0);
pub const A6: PageSize = millimetres(105.0, 148.0);

impl PageSize {
    pub fn new<W: Into<Pt>, H: Into<Pt>>(width: W, height: H) -> PageSize {
        PageSize {
            width: width.into(),
            height: height.into(),
        }
    }

    /// Returns the size in portrait orientation (width ≤ height).
    pub fn portrait(self) -> PageSize {
        if self.width <= self.height {
            self
        } else {
            PageSize {
                width: self.height,
                height: self.width,
            }
        }
    }

    /// Returns the size in landscape orientation (width ≥ height).
    pub fn landscape(self) -> PageSize {
        if self.width >= self.height {
            self
        } else {
            PageSize {
                width: self.height,
                height: self.width,
            }
        }
    }

    /// The full page as a rectangle anchored at the top-left corner
    pub fn media_box(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        LETTER
    }
}
