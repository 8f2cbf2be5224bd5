//! Height measurement for fragments.
//!
//! The paginator never looks at markup itself; it asks a [`Measure`]
//! implementation how tall each fragment renders inside the content box. A
//! measurer may fail by returning `None`, in which case the fragment is treated
//! as having no height at all.
//!
//! Three measurers are provided:
//!
//! - [`FixedHeights`] - heights supplied up front, handy for tests or when the
//!   heights were measured by a real renderer elsewhere
//! - [`TextMetrics`] - an estimate from the [`FontMetrics`](crate::layout::FontMetrics)
//!   in the layout, assuming every glyph has the average width
//! - [`FontMeasure`] - word wrapping with the glyph advances of a real font
//!
//! Any `Fn(&Fragment, &LayoutConfig) -> Option<Pt>` closure is a measurer too.

use crate::document::{Fragment, FragmentKind};
use crate::font::{FaceMetrics, Font};
use crate::layout::{FontMetrics, LayoutConfig};
use crate::units::{In, Pt};

/// Reports how tall a fragment renders when laid out in the content box of `layout`.
pub trait Measure {
    /// Returns `None` if the height cannot be determined
    fn measure(&self, fragment: &Fragment, layout: &LayoutConfig) -> Option<Pt>;
}

impl<F> Measure for F
where
    F: Fn(&Fragment, &LayoutConfig) -> Option<Pt>,
{
    fn measure(&self, fragment: &Fragment, layout: &LayoutConfig) -> Option<Pt> {
        self(fragment, layout)
    }
}

/// Heights injected per fragment index.
///
/// ```
/// use page_flow::measure::{FixedHeights, Measure};
/// use page_flow::{Document, LayoutConfig, Pt};
///
/// let doc = Document::from_fragments(["<p>a</p>", "<p>b</p>"]);
/// let heights = FixedHeights::new([Pt(100.0)]).with_default(Pt(20.0));
/// let layout = LayoutConfig::default();
/// assert_eq!(heights.measure(doc.fragment_at(0).unwrap(), &layout), Some(Pt(100.0)));
/// assert_eq!(heights.measure(doc.fragment_at(1).unwrap(), &layout), Some(Pt(20.0)));
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FixedHeights {
    pub heights: Vec<Option<Pt>>,
    /// Height for fragments past the end of `heights`
    pub default: Option<Pt>,
}

impl FixedHeights {
    pub fn new<I, H>(heights: I) -> FixedHeights
    where
        I: IntoIterator<Item = H>,
        H: Into<Pt>,
    {
        FixedHeights {
            heights: heights.into_iter().map(|h| Some(h.into())).collect(),
            default: None,
        }
    }

    /// Heights where `None` marks a fragment whose measurement fails
    pub fn from_options<I: IntoIterator<Item = Option<Pt>>>(heights: I) -> FixedHeights {
        FixedHeights {
            heights: heights.into_iter().collect(),
            default: None,
        }
    }

    pub fn with_default<H: Into<Pt>>(mut self, height: H) -> FixedHeights {
        self.default = Some(height.into());
        self
    }
}

impl Measure for FixedHeights {
    fn measure(&self, fragment: &Fragment, _layout: &LayoutConfig) -> Option<Pt> {
        match self.heights.get(fragment.index) {
            Some(height) => *height,
            None => self.default,
        }
    }
}

/// Estimates heights from font metrics alone. Text is wrapped at word
/// boundaries assuming every character has the layout's average width.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMetrics {
    /// Height of an image without a declared height
    pub image_height: Pt,
    /// Height of a horizontal rule, including its own spacing
    pub rule_height: Pt,
    /// Glyph width ratio used for preformatted text
    pub monospace_char_width: f32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        TextMetrics {
            image_height: In(3.0).into(),
            rule_height: Pt(12.0),
            monospace_char_width: 0.6,
        }
    }
}

impl Measure for TextMetrics {
    fn measure(&self, fragment: &Fragment, layout: &LayoutConfig) -> Option<Pt> {
        let width = layout.content_box().width();
        let spacing = layout.paragraph_spacing;
        let font = match fragment.kind {
            FragmentKind::Heading(level) => layout.font.scaled(heading_scale(level)),
            FragmentKind::Preformatted => FontMetrics {
                average_char_width: self.monospace_char_width,
                ..layout.font
            },
            _ => layout.font,
        };
        let char_width = font.char_width();

        let height = match fragment.kind {
            FragmentKind::Image => fragment.declared_height.unwrap_or(self.image_height) + spacing,
            FragmentKind::Rule => self.rule_height,
            FragmentKind::LineBreak => font.line_advance(),
            FragmentKind::PageBreak => Pt::ZERO,
            FragmentKind::Text if fragment.is_blank() => Pt::ZERO,
            _ => {
                let text = fragment.plain_text();
                let preformatted = fragment.kind == FragmentKind::Preformatted;
                let lines = count_lines(&text, width, preformatted, |s| {
                    char_width * s.chars().count() as f32
                });
                font.line_advance() * lines as f32 + spacing
            }
        };
        Some(height)
    }
}

/// Measures text by wrapping it with the advances of a real font face. The
/// body size comes from the layout's font metrics; headings are scaled the same
/// way [`TextMetrics`] scales them.
pub struct FontMeasure<F = Font> {
    pub font: F,
    /// Used for fragments that aren't text
    pub fallback: TextMetrics,
}

impl<F> FontMeasure<F> {
    pub fn new(font: F) -> FontMeasure<F> {
        FontMeasure {
            font,
            fallback: TextMetrics::default(),
        }
    }
}

impl<F: FaceMetrics> Measure for FontMeasure<F> {
    fn measure(&self, fragment: &Fragment, layout: &LayoutConfig) -> Option<Pt> {
        let size = match fragment.kind {
            FragmentKind::Heading(level) => layout.font.size * heading_scale(level),
            FragmentKind::Paragraph
            | FragmentKind::List
            | FragmentKind::Quote
            | FragmentKind::Preformatted
            | FragmentKind::Table
            | FragmentKind::Element(_)
            | FragmentKind::Text => layout.font.size,
            _ => return self.fallback.measure(fragment, layout),
        };
        if fragment.kind == FragmentKind::Text && fragment.is_blank() {
            return Some(Pt::ZERO);
        }

        let text = fragment.plain_text();
        let preformatted = fragment.kind == FragmentKind::Preformatted;
        let lines = count_lines(&text, layout.content_box().width(), preformatted, |s| {
            self.font.width_of_text(s, size)
        });
        Some(self.font.line_height(size) * lines as f32 + layout.paragraph_spacing)
    }
}

/// Browser default heading sizes, relative to body text
fn heading_scale(level: u8) -> f32 {
    match level {
        1 => 2.0,
        2 => 1.5,
        3 => 1.17,
        4 => 1.0,
        5 => 0.83,
        _ => 0.67,
    }
}

/// Counts the lines `text` wraps onto within `max_width`. Each `\n`-separated
/// segment starts a new line; blank segments are collapsed unless the text is
/// preformatted. Words wider than a whole line are broken across as many lines
/// as they need. A block always occupies at least one line.
fn count_lines<W>(text: &str, max_width: Pt, preformatted: bool, width_of: W) -> usize
where
    W: Fn(&str) -> Pt,
{
    let space = width_of(" ");
    let mut lines = 0usize;
    let text = if preformatted {
        text.trim_end_matches('\n')
    } else {
        text
    };

    for segment in text.split('\n') {
        if preformatted {
            let width = width_of(segment.trim_end());
            lines += lines_for_width(width, max_width);
            continue;
        }

        let mut line_width = Pt::ZERO;
        let mut segment_lines = 0usize;
        for word in segment.split_whitespace() {
            let word_width = width_of(word);
            if segment_lines == 0 {
                segment_lines = 1;
            }
            if line_width == Pt::ZERO {
                line_width = word_width;
            } else if line_width + space + word_width <= max_width {
                line_width += space + word_width;
                continue;
            } else {
                segment_lines += 1;
                line_width = word_width;
            }
            if word_width > max_width {
                // an overlong word fills whole lines and leaves a partial one
                let extra = lines_for_width(word_width, max_width) - 1;
                segment_lines += extra;
                line_width = Pt(word_width.0 - extra as f32 * max_width.0);
            }
        }
        lines += segment_lines;
    }

    lines.max(1)
}

fn lines_for_width(width: Pt, max_width: Pt) -> usize {
    if width <= Pt::ZERO || max_width <= Pt::ZERO {
        1
    } else {
        (width / max_width).ceil().max(1.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn chars(s: &str) -> Pt {
        Pt(s.chars().count() as f32)
    }

    #[test]
    fn wraps_words() {
        assert_eq!(count_lines("aaa bbb ccc", Pt(7.0), false, chars), 2);
        assert_eq!(count_lines("aaa bbb ccc", Pt(11.0), false, chars), 1);
        assert_eq!(count_lines("", Pt(11.0), false, chars), 1);
    }

    #[test]
    fn breaks_overlong_words() {
        assert_eq!(count_lines("aaaaaaaaaa", Pt(4.0), false, chars), 3);
        assert_eq!(count_lines("aaaaaaaaaa b", Pt(4.0), false, chars), 3);
    }

    #[test]
    fn newlines_start_new_lines() {
        assert_eq!(count_lines("one\ntwo\n", Pt(80.0), false, chars), 2);
        assert_eq!(count_lines("one\n\n\ntwo", Pt(80.0), true, chars), 4);
    }

    #[test]
    fn estimates_paragraph_height() {
        let layout = LayoutConfig::default().with_paragraph_spacing(Pt::ZERO);
        // 6.5in at 6pt per character fits seven 9-letter words per line
        let words = vec!["abcdefghi"; 12].join(" ");
        let doc = Document::from_fragments([format!("<p>{words}</p>")]);
        let height = TextMetrics::default()
            .measure(doc.fragment_at(0).unwrap(), &layout)
            .unwrap();
        assert_eq!(height, Pt(18.0 * 2.0));
    }

    #[test]
    fn headings_are_taller() {
        let layout = LayoutConfig::default();
        let doc = Document::from_fragments(["<h1>Title</h1>", "<p>Title</p>"]);
        let metrics = TextMetrics::default();
        let heading = metrics.measure(doc.fragment_at(0).unwrap(), &layout).unwrap();
        let body = metrics.measure(doc.fragment_at(1).unwrap(), &layout).unwrap();
        assert!(heading > body);
    }

    #[test]
    fn images_use_declared_height() {
        let layout = LayoutConfig::default().with_paragraph_spacing(Pt::ZERO);
        let doc = Document::from_fragments(["<img src=\"a.png\" height=\"192\">", "<img src=\"b.png\">"]);
        let metrics = TextMetrics::default();
        assert_eq!(
            metrics.measure(doc.fragment_at(0).unwrap(), &layout),
            Some(Pt(144.0))
        );
        assert_eq!(
            metrics.measure(doc.fragment_at(1).unwrap(), &layout),
            Some(Pt(216.0))
        );
    }

    /// Every glyph advances half the font size; lines are 1.2 sizes apart
    struct HalfEm;

    impl FaceMetrics for HalfEm {
        fn line_height(&self, size: Pt) -> Pt {
            size * 1.2
        }

        fn width_of_text(&self, text: &str, size: Pt) -> Pt {
            size * 0.5 * text.chars().count() as f32
        }
    }

    #[test]
    fn font_measure_stacks_wrapped_lines() {
        let layout = LayoutConfig::default();
        let words = vec!["abcdefghi"; 12].join(" ");
        let doc = Document::from_fragments([format!("<p>{words}</p>"), "<h2>Short</h2>".into()]);
        let measure = FontMeasure::new(HalfEm);

        let paragraph = measure.measure(doc.fragment_at(0).unwrap(), &layout);
        assert_eq!(paragraph, Some(Pt(12.0) * 1.2 * 2.0 + Pt(6.0)));

        let heading = measure.measure(doc.fragment_at(1).unwrap(), &layout);
        assert_eq!(heading, Some(Pt(12.0) * 1.5 * 1.2 + Pt(6.0)));
    }

    #[test]
    fn font_measure_falls_back_for_non_text() {
        let layout = LayoutConfig::default();
        let doc = Document::from_fragments(["<img src=\"a.png\">", "<hr>", "<br>"]);
        let measure = FontMeasure::new(HalfEm);
        assert_eq!(
            measure.measure(doc.fragment_at(0).unwrap(), &layout),
            Some(Pt(216.0) + Pt(6.0))
        );
        assert_eq!(measure.measure(doc.fragment_at(1).unwrap(), &layout), Some(Pt(12.0)));
        assert_eq!(measure.measure(doc.fragment_at(2).unwrap(), &layout), Some(Pt(18.0)));
    }

    #[test]
    fn closures_are_measurers() {
        let measurer = |fragment: &Fragment, _: &LayoutConfig| {
            Some(Pt(fragment.source.len() as f32))
        };
        let doc = Document::from_fragments(["<p>abc</p>"]);
        assert_eq!(
            measurer.measure(doc.fragment_at(0).unwrap(), &LayoutConfig::default()),
            Some(Pt(10.0))
        );
    }

    #[test]
    fn fixed_heights_report_failures() {
        let doc = Document::from_fragments(["<p>a</p>", "<p>b</p>", "<p>c</p>"]);
        let heights = FixedHeights::from_options([Some(Pt(5.0)), None]);
        let layout = LayoutConfig::default();
        assert_eq!(heights.measure(doc.fragment_at(0).unwrap(), &layout), Some(Pt(5.0)));
        assert_eq!(heights.measure(doc.fragment_at(1).unwrap(), &layout), None);
        assert_eq!(heights.measure(doc.fragment_at(2).unwrap(), &layout), None);
    }
}
