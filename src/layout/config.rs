use crate::error::Error;
use crate::layout::Margins;
use crate::pagesize::{self, PageSize};
use crate::rect::Rect;
use crate::units::{In, Pt};

/// Font metrics used when estimating how tall a run of text will be.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FontMetrics {
    /// Body text size
    pub size: Pt,
    /// Line height as a multiple of `size`, as in CSS `line-height: 1.5`
    pub line_height: f32,
    /// Average glyph advance as a fraction of `size`
    pub average_char_width: f32,
}

impl FontMetrics {
    pub fn new<S: Into<Pt>>(size: S, line_height: f32) -> FontMetrics {
        FontMetrics {
            size: size.into(),
            line_height,
            ..Default::default()
        }
    }

    /// Distance between consecutive baselines
    pub fn line_advance(&self) -> Pt {
        self.size * self.line_height
    }

    /// Average horizontal advance of a single glyph
    pub fn char_width(&self) -> Pt {
        self.size * self.average_char_width
    }

    /// The same metrics with the font size multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> FontMetrics {
        FontMetrics {
            size: self.size * factor,
            ..*self
        }
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        FontMetrics {
            size: Pt(12.0),
            line_height: 1.5,
            average_char_width: 0.5,
        }
    }
}

/// Everything a pagination pass depends on besides the document itself. A
/// config is treated as immutable for the duration of a pass; changing any
/// field invalidates all previously computed pages.
///
/// ```
/// use page_flow::layout::{LayoutConfig, Margins};
/// use page_flow::{pagesize, In, Pt};
///
/// let config = LayoutConfig::default()
///     .with_page_size(pagesize::A5)
///     .with_margins(Margins::all(In(0.75)));
/// assert!(config.validate().is_ok());
/// assert!(config.content_box().height() < pagesize::A5.height);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub page_size: PageSize,
    pub margins: Margins,
    pub font: FontMetrics,
    /// Vertical gap added below every block
    pub paragraph_spacing: Pt,
    /// Whether page-break fragments force the following content onto a new page
    pub honor_page_breaks: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page_size: pagesize::LETTER,
            margins: Margins::all(In(1.0)),
            font: FontMetrics::default(),
            paragraph_spacing: Pt(6.0),
            honor_page_breaks: true,
        }
    }
}

impl LayoutConfig {
    pub fn with_page_size(mut self, page_size: PageSize) -> LayoutConfig {
        self.page_size = page_size;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> LayoutConfig {
        self.margins = margins;
        self
    }

    pub fn with_font(mut self, font: FontMetrics) -> LayoutConfig {
        self.font = font;
        self
    }

    pub fn with_paragraph_spacing<S: Into<Pt>>(mut self, spacing: S) -> LayoutConfig {
        self.paragraph_spacing = spacing.into();
        self
    }

    pub fn with_page_breaks(mut self, honor: bool) -> LayoutConfig {
        self.honor_page_breaks = honor;
        self
    }

    /// The printable area of the page: the media box inset by the margins
    pub fn content_box(&self) -> Rect {
        Rect {
            x1: self.margins.left,
            y1: self.margins.top,
            x2: self.page_size.width - self.margins.right,
            y2: self.page_size.height - self.margins.bottom,
        }
    }

    /// Checks that the configuration leaves a usable content box and sane font metrics
    pub fn validate(&self) -> Result<(), Error> {
        let content = self.content_box();
        if !content.width().is_finite() || !content.height().is_finite() {
            return Err(Error::InvalidLayout(
                "page dimensions must be finite".into(),
            ));
        }
        if content.is_empty() {
            return Err(Error::InvalidLayout(format!(
                "margins {:?} leave no content area on a {} x {} page",
                self.margins, self.page_size.width, self.page_size.height
            )));
        }
        if !(self.font.size > Pt::ZERO) || self.font.line_height <= 0.0 {
            return Err(Error::InvalidLayout(format!(
                "font size {} and line height {} must both be positive",
                self.font.size, self.font.line_height
            )));
        }
        if self.font.average_char_width <= 0.0 {
            return Err(Error::InvalidLayout(
                "average character width must be positive".into(),
            ));
        }
        Ok(())
    }
}
