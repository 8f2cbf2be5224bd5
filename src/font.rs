use crate::{Error, Pt};
use owned_ttf_parser::{AsFaceRef, OwnedFace};

/// The glyph metrics needed to wrap text into lines and stack those lines.
pub trait FaceMetrics {
    /// Distance between consecutive baselines at the given size
    fn line_height(&self, size: Pt) -> Pt;
    fn width_of_text(&self, text: &str, size: Pt) -> Pt;
}

/// A parsed TrueType / OpenType face, used to measure text with real glyph
/// advances instead of an average character width.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, Error> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face })
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().ascender() as f32
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().descender() as f32
    }

    /// Calculate the default line height of the font for the given size. The returned value is
    /// how much to vertically offset a second row of text below a first row of text.
    pub fn line_height(&self, size: Pt) -> Pt {
        let leading = self.scaling(size) * self.face.as_face_ref().line_gap() as f32;
        leading + self.ascent(size) - self.descent(size)
    }

    /// Horizontal advance of a single character, falling back to the replacement
    /// glyph for characters the face doesn't cover
    pub fn advance(&self, ch: char, size: Pt) -> Pt {
        let face = self.face.as_face_ref();
        let advance = face
            .glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .and_then(|gid| face.glyph_hor_advance(gid))
            .unwrap_or_default();
        self.scaling(size) * advance as f32
    }

    /// Calculate the width of a given string of text at the given font size
    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        text.chars().map(|ch| self.advance(ch, size)).sum()
    }
}

impl FaceMetrics for Font {
    fn line_height(&self, size: Pt) -> Pt {
        Font::line_height(self, size)
    }

    fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        Font::width_of_text(self, text, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU_MONO: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf";

    #[test]
    fn rejects_bytes_that_are_not_a_font() {
        let result = Font::load(b"definitely not a font".to_vec());
        assert!(matches!(result, Err(Error::Font(_))));
    }

    #[test]
    fn monospace_advances_add_up() {
        // only checked where the system ships DejaVu
        let Ok(bytes) = std::fs::read(DEJAVU_MONO) else {
            return;
        };
        let font = Font::load(bytes).expect("can load font");
        let size = Pt(10.0);
        let one = font.advance('m', size);
        assert!(one > Pt::ZERO);
        assert_eq!(font.advance('i', size), one);
        assert!((font.width_of_text("mmmm", size).0 - one.0 * 4.0).abs() < 1e-3);
        assert!(font.line_height(size) > size);
        assert!(font.descent(size) < Pt::ZERO);
    }
}
