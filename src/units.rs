//! Typographic units.
//!
//! Layout happens in points ([`Pt`], 72 per inch). Page sizes are usually quoted
//! in inches ([`In`]) and browser measurements arrive as CSS pixels ([`Px`], 96
//! per inch); both convert into points with `From`.
//!
//! ```
//! use page_flow::{In, Pt, Px};
//!
//! assert_eq!(Pt::from(In(1.0)), Pt(72.0));
//! assert_eq!(Pt::from(Px(96.0)), Pt(72.0));
//! ```

use derive_more::{Add, AddAssign, Display, Sub, SubAssign, Sum};
use std::ops::{Div, Mul};

/// A length in PostScript points.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, AddAssign, Sub, SubAssign, Sum, Display,
)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

/// A length in inches.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Display)]
#[display("{_0}in")]
pub struct In(pub f32);

/// A length in CSS pixels.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Display)]
#[display("{_0}px")]
pub struct Px(pub f32);

pub const POINTS_PER_INCH: f32 = 72.0;
pub const PIXELS_PER_INCH: f32 = 96.0;

impl Pt {
    pub const ZERO: Pt = Pt(0.0);

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl From<In> for Pt {
    fn from(value: In) -> Self {
        Pt(value.0 * POINTS_PER_INCH)
    }
}

impl From<Px> for Pt {
    fn from(value: Px) -> Self {
        Pt(value.0 * POINTS_PER_INCH / PIXELS_PER_INCH)
    }
}

impl From<Pt> for In {
    fn from(value: Pt) -> Self {
        In(value.0 / POINTS_PER_INCH)
    }
}

impl From<Pt> for Px {
    fn from(value: Pt) -> Self {
        Px(value.0 * PIXELS_PER_INCH / POINTS_PER_INCH)
    }
}

impl From<f32> for Pt {
    fn from(value: f32) -> Self {
        Pt(value)
    }
}

impl From<Pt> for f32 {
    fn from(value: Pt) -> Self {
        value.0
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl Mul<Pt> for f32 {
    type Output = Pt;

    fn mul(self, rhs: Pt) -> Pt {
        Pt(self * rhs.0)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

/// Dividing two lengths yields a unitless ratio
impl Div<Pt> for Pt {
    type Output = f32;

    fn div(self, rhs: Pt) -> f32 {
        self.0 / rhs.0
    }
}
