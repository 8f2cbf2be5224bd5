use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed markup at byte {position}: {source}")]
    /// [quick_xml] could not tokenize the document markup
    Markup {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    #[error("invalid layout: {0}")]
    /// The layout configuration leaves no room for content
    InvalidLayout(String),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    Font(#[from] owned_ttf_parser::FaceParsingError),
}
