use crate::error::Error;
use crate::units::{Pt, Px};
use id_arena::{Arena, Id};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Elements that never have a closing tag in HTML
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose end separates words when extracting plain text
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "li", "dt", "dd", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "td", "th",
    "blockquote", "pre", "figcaption", "section", "article",
];

/// What kind of block a fragment is, as far as measurement cares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentKind {
    Paragraph,
    /// `h1` through `h6`
    Heading(u8),
    List,
    Quote,
    Preformatted,
    Table,
    Image,
    /// A horizontal rule
    Rule,
    LineBreak,
    /// A block explicitly marked as the end of a page
    PageBreak,
    /// Loose text, entities or comments sitting between top-level elements
    Text,
    /// Any other element, by lowercase tag name
    Element(String),
}

impl FragmentKind {
    fn from_tag(tag: &str) -> FragmentKind {
        match tag {
            "p" => FragmentKind::Paragraph,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                FragmentKind::Heading(tag.as_bytes()[1] - b'0')
            }
            "ul" | "ol" | "dl" => FragmentKind::List,
            "blockquote" => FragmentKind::Quote,
            "pre" => FragmentKind::Preformatted,
            "table" => FragmentKind::Table,
            "img" | "figure" | "svg" | "picture" => FragmentKind::Image,
            "hr" => FragmentKind::Rule,
            "br" => FragmentKind::LineBreak,
            other => FragmentKind::Element(other.to_string()),
        }
    }
}

/// A block-level unit of content. Fragments are atomic as far as pagination is
/// concerned: a fragment is never split across pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// 0-based position of the fragment within its document
    pub index: usize,
    pub kind: FragmentKind,
    /// The exact markup this fragment was cut from, including any whitespace
    /// that preceded it
    pub source: String,
    /// Height declared on the element itself (e.g. `<img height="300">`)
    pub declared_height: Option<Pt>,
}

impl Fragment {
    /// The visible text of this fragment, with character references resolved.
    /// Whitespace is left as written; block boundaries and `<br>` become a space
    /// or newline so adjacent words don't run together.
    pub fn plain_text(&self) -> String {
        let mut reader = Reader::from_str(&self.source);
        configure_lenient(&mut reader);

        let mut text = String::with_capacity(self.source.len());
        loop {
            match reader.read_event() {
                Ok(Event::Text(e)) => match e.decode() {
                    Ok(decoded) => text.push_str(&decoded),
                    Err(_) => text.push_str(&String::from_utf8_lossy(&e)),
                },
                Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e)),
                Ok(Event::GeneralRef(e)) => {
                    if let Ok(name) = e.decode() {
                        text.push_str(&resolve_entity(&name));
                    }
                }
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if tag_name(&e).as_str() == "br" =>
                {
                    text.push('\n');
                }
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                    if BLOCK_ELEMENTS.contains(&name.as_str()) {
                        text.push('\n');
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    log::debug!(
                        "fragment {}: giving up on text extraction: {err}",
                        self.index
                    );
                    break;
                }
            }
        }
        text
    }

    /// Whether the fragment holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.source.trim().is_empty()
    }
}

/// An ordered sequence of [`Fragment`]s. Fragments are stored in an arena and
/// referred to by [`Id`]; the id of a fragment stays valid for the lifetime of
/// the document.
#[derive(Debug, Default)]
pub struct Document {
    pub fragments: Arena<Fragment>,
    pub fragment_order: Vec<Id<Fragment>>,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    /// Splits HTML-like markup into its top-level blocks.
    ///
    /// Whitespace between blocks is carried by the block that follows it (or by
    /// the last block, for trailing whitespace), so [`Document::to_html`] returns
    /// the input unchanged. Loose text between blocks becomes a
    /// [`FragmentKind::Text`] fragment. End tags HTML lets authors omit (`</p>`,
    /// `</li>`, `</dt>`, `</dd>`) are implied where the next sibling starts; an
    /// element left open at the end of the input swallows the remainder.
    ///
    /// ```
    /// use page_flow::{Document, FragmentKind};
    ///
    /// let html = "<h1>Title</h1>\n<p>First</p>\n<p>Second</p>";
    /// let doc = Document::from_html(html).unwrap();
    /// assert_eq!(doc.len(), 3);
    /// assert_eq!(doc.fragment_at(0).unwrap().kind, FragmentKind::Heading(1));
    /// assert_eq!(doc.to_html(), html);
    /// ```
    pub fn from_html(html: &str) -> Result<Document, Error> {
        let mut document = Document::new();
        let mut reader = Reader::from_str(html);
        configure_lenient(&mut reader);

        // end of the last emitted fragment
        let mut cursor = 0usize;
        // the open top-level element: where it starts, and what it is
        let mut open: Option<(usize, FragmentKind, Option<Pt>)> = None;
        // names of the elements currently open, outermost first
        let mut stack: Vec<String> = Vec::new();

        loop {
            let start = reader_offset(&reader);
            let event = reader.read_event().map_err(|source| Error::Markup {
                position: reader_offset(&reader),
                source,
            })?;
            let self_closing = matches!(event, Event::Empty(_));

            match event {
                Event::Start(e) | Event::Empty(e) => {
                    let name = tag_name(&e);
                    if close_implied(&mut stack, &name) && stack.is_empty() {
                        if let Some((from, kind, declared_height)) = open.take() {
                            cursor = start;
                            document.push(kind, &html[from..start], declared_height);
                        }
                    }

                    let is_void = self_closing || VOID_ELEMENTS.contains(&name.as_str());
                    if stack.is_empty() {
                        let from = document.flush_loose(html, cursor, start);
                        let (kind, declared_height) = classify(&name, &e);
                        if is_void {
                            cursor = reader_offset(&reader);
                            document.push(kind, &html[from..cursor], declared_height);
                        } else {
                            open = Some((from, kind, declared_height));
                            stack.push(name);
                        }
                    } else if !is_void {
                        stack.push(name);
                    }
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                    // an end tag closes everything opened inside its element; end
                    // tags with no open element are left in the loose text
                    if let Some(position) = stack.iter().rposition(|open| *open == name) {
                        stack.truncate(position);
                        if stack.is_empty() {
                            if let Some((from, kind, declared_height)) = open.take() {
                                cursor = reader_offset(&reader);
                                document.push(kind, &html[from..cursor], declared_height);
                            }
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some((from, kind, declared_height)) = open.take() {
            log::debug!("unclosed top-level element at byte {from}, taking the rest of the input");
            document.push(kind, &html[from..], declared_height);
        } else if cursor < html.len() {
            let tail = &html[cursor..];
            match document.fragment_order.last().copied() {
                Some(last) if tail.trim().is_empty() => {
                    document.fragments[last].source.push_str(tail);
                }
                _ => {
                    document.push(FragmentKind::Text, tail, None);
                }
            }
        }

        Ok(document)
    }

    /// Like [`Document::from_html`], but never fails: markup that cannot be
    /// tokenized is kept whole as a single fragment.
    pub fn from_html_lossy(html: &str) -> Document {
        match Document::from_html(html) {
            Ok(document) => document,
            Err(err) => {
                log::warn!("{err}; treating the document as a single block");
                let mut document = Document::new();
                if !html.is_empty() {
                    document.push(FragmentKind::Element(String::new()), html, None);
                }
                document
            }
        }
    }

    /// Builds a document out of fragments that were split elsewhere. Each piece
    /// is classified by its leading tag, if it has one.
    pub fn from_fragments<I, S>(fragments: I) -> Document
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut document = Document::new();
        for source in fragments {
            let source: String = source.into();
            let (kind, declared_height) = classify_source(&source);
            document.push(kind, source, declared_height);
        }
        document
    }

    /// Appends a fragment to the end of the document, returning its id
    pub fn push<S: Into<String>>(
        &mut self,
        kind: FragmentKind,
        source: S,
        declared_height: Option<Pt>,
    ) -> Id<Fragment> {
        let index = self.fragment_order.len();
        let id = self.fragments.alloc(Fragment {
            index,
            kind,
            source: source.into(),
            declared_height,
        });
        self.fragment_order.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.fragment_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragment_order.is_empty()
    }

    pub fn get(&self, id: Id<Fragment>) -> Option<&Fragment> {
        self.fragments.get(id)
    }

    /// Get the fragment at the given 0-based position
    pub fn fragment_at(&self, index: usize) -> Option<&Fragment> {
        self.fragment_order
            .get(index)
            .and_then(|id| self.fragments.get(*id))
    }

    /// Fragments in document order
    pub fn iter(&self) -> impl Iterator<Item = (Id<Fragment>, &Fragment)> + '_ {
        self.fragment_order
            .iter()
            .filter_map(move |id| self.fragments.get(*id).map(|f| (*id, f)))
    }

    /// Reassembles the document's markup
    pub fn to_html(&self) -> String {
        self.iter().map(|(_, f)| f.source.as_str()).collect()
    }

    /// Emits any non-whitespace loose content in `html[cursor..start]` as a text
    /// fragment, and returns where the next element's fragment should begin.
    fn flush_loose(&mut self, html: &str, cursor: usize, start: usize) -> usize {
        let loose = &html[cursor..start];
        if loose.trim().is_empty() {
            cursor
        } else {
            self.push(FragmentKind::Text, loose, None);
            start
        }
    }
}

/// Elements whose start implicitly ends an open `<p>`
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "fieldset", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol", "p", "pre",
    "section", "table", "ul",
];

/// Pops the elements that HTML ends implicitly when `name` starts, e.g. an open
/// `<li>` when the next `<li>` begins. Returns whether anything was popped.
fn close_implied(stack: &mut Vec<String>, name: &str) -> bool {
    let closes: &[&str] = match name {
        "li" => &["li", "p"],
        "dt" | "dd" => &["dt", "dd", "p"],
        _ if CLOSES_PARAGRAPH.contains(&name) => &["p"],
        _ => return false,
    };
    let before = stack.len();
    while stack.last().is_some_and(|open| closes.contains(&open.as_str())) {
        stack.pop();
    }
    stack.len() != before
}

fn configure_lenient<R>(reader: &mut Reader<R>) {
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.check_comments = false;
    config.allow_dangling_amp = true;
}

fn reader_offset<R>(reader: &Reader<R>) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX)
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase()
}

fn classify(name: &str, e: &BytesStart<'_>) -> (FragmentKind, Option<Pt>) {
    let mut kind = FragmentKind::from_tag(name);
    let mut declared_height = None;

    for attr in e.html_attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let value = String::from_utf8_lossy(&attr.value);
        match key.as_str() {
            "data-page-break" => kind = FragmentKind::PageBreak,
            "class" if value.split_whitespace().any(|c| c == "page-break") => {
                kind = FragmentKind::PageBreak
            }
            "style" if declares_page_break(&value) => kind = FragmentKind::PageBreak,
            "height" => {
                declared_height = value
                    .trim()
                    .trim_end_matches("px")
                    .parse::<f32>()
                    .ok()
                    .map(|px| Pt::from(Px(px)));
            }
            _ => {}
        }
    }

    (kind, declared_height)
}

fn declares_page_break(style: &str) -> bool {
    let style: String = style
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    style.contains("page-break-after:always") || style.contains("break-after:page")
}

fn classify_source(source: &str) -> (FragmentKind, Option<Pt>) {
    let mut reader = Reader::from_str(source);
    configure_lenient(&mut reader);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => return classify(&tag_name(&e), &e),
            Ok(Event::Text(e)) if e.iter().all(u8::is_ascii_whitespace) => continue,
            Ok(Event::Comment(_)) | Ok(Event::DocType(_)) => continue,
            _ => return (FragmentKind::Text, None),
        }
    }
}

fn resolve_entity(name: &str) -> String {
    let reference = format!("&{name};");
    match quick_xml::escape::unescape(&reference) {
        Ok(resolved) => resolved.into_owned(),
        Err(_) => match name {
            "nbsp" | "ensp" | "emsp" | "thinsp" => " ".to_string(),
            "mdash" => "\u{2014}".to_string(),
            "ndash" => "\u{2013}".to_string(),
            "hellip" => "\u{2026}".to_string(),
            "lsquo" | "rsquo" => "'".to_string(),
            "ldquo" | "rdquo" => "\"".to_string(),
            _ => reference,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_top_level_blocks() {
        let html = "<h2>Chapter</h2>\n<p>One <em>two</em></p>\n<ul><li>a</li><li>b</li></ul>";
        let doc = Document::from_html(html).unwrap();
        let kinds: Vec<_> = doc.iter().map(|(_, f)| f.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                FragmentKind::Heading(2),
                FragmentKind::Paragraph,
                FragmentKind::List
            ]
        );
        assert_eq!(doc.fragment_at(1).unwrap().source, "\n<p>One <em>two</em></p>");
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn void_elements_close_themselves() {
        let html = "<p>a<br>b</p><hr><img src=\"x.png\" height=\"96\"><p>c</p>";
        let doc = Document::from_html(html).unwrap();
        assert_eq!(doc.len(), 4);
        assert_eq!(doc.fragment_at(1).unwrap().kind, FragmentKind::Rule);
        let image = doc.fragment_at(2).unwrap();
        assert_eq!(image.kind, FragmentKind::Image);
        assert_eq!(image.declared_height, Some(Pt(72.0)));
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn loose_text_becomes_its_own_fragment() {
        let html = "intro text<p>para</p>  trailing  ";
        let doc = Document::from_html(html).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.fragment_at(0).unwrap().kind, FragmentKind::Text);
        assert_eq!(doc.fragment_at(2).unwrap().source, "  trailing  ");
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn trailing_whitespace_joins_last_fragment() {
        let html = "<p>a</p>\n\n";
        let doc = Document::from_html(html).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.fragment_at(0).unwrap().source, html);
    }

    #[test]
    fn unclosed_element_takes_the_rest() {
        let html = "<p>one</p><div>two<p>three";
        let doc = Document::from_html(html).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.fragment_at(1).unwrap().source, "<div>two<p>three");
    }

    #[test]
    fn implied_end_tags_close_fragments() {
        let html = "<ul><li>a<li>b</ul><p>after</p>";
        let doc = Document::from_html(html).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.fragment_at(0).unwrap().source, "<ul><li>a<li>b</ul>");
        assert_eq!(doc.fragment_at(1).unwrap().kind, FragmentKind::Paragraph);
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn unclosed_paragraphs_end_at_the_next_block() {
        let html = "<p>one\n<p>two\n<h2>three</h2><dl><dt>x<dd>y</dl>";
        let doc = Document::from_html(html).unwrap();
        let sources: Vec<_> = doc.iter().map(|(_, f)| f.source.as_str()).collect();
        assert_eq!(
            sources,
            vec!["<p>one\n", "<p>two\n", "<h2>three</h2>", "<dl><dt>x<dd>y</dl>"]
        );
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn detects_page_breaks() {
        let html = concat!(
            "<div class=\"page-break\"></div>",
            "<div data-page-break></div>",
            "<div style=\"page-break-after: always\"></div>",
            "<div class=\"not-a-break\"></div>"
        );
        let doc = Document::from_html(html).unwrap();
        let breaks = doc
            .iter()
            .filter(|(_, f)| f.kind == FragmentKind::PageBreak)
            .count();
        assert_eq!(breaks, 3);
    }

    #[test]
    fn empty_input_has_no_fragments() {
        let doc = Document::from_html("").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.to_html(), "");
    }

    #[test]
    fn lossy_never_drops_content() {
        let html = "<p>fine</p><p";
        let doc = Document::from_html_lossy(html);
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn plain_text_resolves_entities() {
        let doc = Document::from_html("<p>Fish &amp; chips&nbsp;&#8212; <b>hot</b></p>").unwrap();
        let text = doc.fragment_at(0).unwrap().plain_text();
        assert_eq!(text.trim_end(), "Fish & chips \u{2014} hot");
    }

    #[test]
    fn builds_from_presplit_fragments() {
        let doc = Document::from_fragments(["<h3>x</h3>", "plain words", "<p>y</p>"]);
        let kinds: Vec<_> = doc.iter().map(|(_, f)| f.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                FragmentKind::Heading(3),
                FragmentKind::Text,
                FragmentKind::Paragraph
            ]
        );
        assert_eq!(doc.to_html(), "<h3>x</h3>plain words<p>y</p>");
    }
}
