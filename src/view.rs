use crate::document::{Document, Fragment};
use crate::layout::LayoutConfig;
use crate::measure::Measure;
use crate::navigation::{Action, Key, Navigator};
use crate::paginate::{paginate, Page, Pagination};
use crate::units::In;
use id_arena::Id;

/// A document shown one page at a time.
///
/// The view owns its inputs and the pages derived from them. Replacing the
/// document, the layout or the measurer repaginates immediately; the previous
/// pages are discarded and the current page is clamped into the new range.
///
/// ```
/// use page_flow::measure::TextMetrics;
/// use page_flow::{Key, LayoutConfig, PaginatedView};
///
/// let mut view = PaginatedView::from_html("<p>Hello</p>", LayoutConfig::default(), TextMetrics::default());
/// assert_eq!(view.total_pages(), 1);
/// assert!(!view.handle_key(Key::ArrowRight));
/// assert!(view.render_current().contains("Page 1 of 1"));
/// ```
pub struct PaginatedView<M> {
    document: Document,
    layout: LayoutConfig,
    measurer: M,
    pagination: Pagination,
    navigator: Navigator,
}

impl<M: Measure> PaginatedView<M> {
    pub fn new(document: Document, layout: LayoutConfig, measurer: M) -> PaginatedView<M> {
        let pagination = paginate(&document, &layout, &measurer);
        let navigator = Navigator::new(pagination.len());
        PaginatedView {
            document,
            layout,
            measurer,
            pagination,
            navigator,
        }
    }

    /// Builds a view straight from markup. Markup that can't be split into
    /// blocks is kept as a single block.
    pub fn from_html(html: &str, layout: LayoutConfig, measurer: M) -> PaginatedView<M> {
        PaginatedView::new(Document::from_html_lossy(html), layout, measurer)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn set_document(&mut self, document: Document) {
        self.document = document;
        self.repaginate();
    }

    pub fn set_html(&mut self, html: &str) {
        self.set_document(Document::from_html_lossy(html));
    }

    /// Swaps the layout. Pages are only recomputed if the layout actually changed.
    pub fn set_layout(&mut self, layout: LayoutConfig) {
        if layout == self.layout {
            return;
        }
        self.layout = layout;
        self.repaginate();
    }

    pub fn set_measurer(&mut self, measurer: M) {
        self.measurer = measurer;
        self.repaginate();
    }

    /// Recomputes the pages from the current document, layout and measurer
    pub fn repaginate(&mut self) {
        self.pagination = paginate(&self.document, &self.layout, &self.measurer);
        self.navigator.set_total_pages(self.pagination.len());
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.len()
    }

    pub fn current_page_number(&self) -> usize {
        self.navigator.current_page()
    }

    pub fn current_page(&self) -> &Page {
        // the navigator is kept within 1..=len and there is always a page
        &self.pagination.pages[self.navigator.current_page().min(self.pagination.len()) - 1]
    }

    /// Get a page by its 1-based number
    pub fn page(&self, number: usize) -> Option<&Page> {
        self.pagination.page(number)
    }

    pub fn page_of_fragment(&self, fragment: Id<Fragment>) -> Option<usize> {
        self.pagination.page_of(fragment)
    }

    pub fn handle_key(&mut self, key: Key) -> bool {
        self.navigator.handle_key(key)
    }

    pub fn apply(&mut self, action: Action) -> bool {
        self.navigator.apply(action)
    }

    /// Renders a page as an HTML `<section>` sized like the physical page, with
    /// the margins as padding and a page number footer. Pages holding an
    /// oversized fragment get an extra `overflow` class so they can be clipped.
    pub fn render_page(&self, number: usize) -> Option<String> {
        let page = self.pagination.page(number)?;
        let class = if page.overflows {
            "page overflow"
        } else {
            "page"
        };
        Some(format!(
            concat!(
                "<section class=\"{class}\" data-page=\"{number}\" ",
                "style=\"width: {width}; height: {height}; padding: {padding}; box-sizing: border-box\">",
                "<div class=\"page-content\">{content}</div>",
                "<footer class=\"page-number\">Page {number} of {total}</footer>",
                "</section>"
            ),
            class = class,
            number = number,
            width = In::from(self.layout.page_size.width),
            height = In::from(self.layout.page_size.height),
            padding = self.layout.margins.to_css(),
            content = page.html(&self.document),
            total = self.pagination.len(),
        ))
    }

    pub fn render_current(&self) -> String {
        self.render_page(self.navigator.current_page())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Margins;
    use crate::measure::FixedHeights;
    use crate::pagesize::PageSize;
    use crate::units::Pt;

    fn layout() -> LayoutConfig {
        LayoutConfig::default()
            .with_page_size(PageSize::new(Pt(100.0), Pt(100.0)))
            .with_margins(Margins::empty())
    }

    fn view(fragments: usize) -> PaginatedView<FixedHeights> {
        let document = Document::from_fragments((0..fragments).map(|i| format!("<p>{i}</p>")));
        PaginatedView::new(document, layout(), FixedHeights::default().with_default(Pt(60.0)))
    }

    #[test]
    fn starts_on_the_first_page() {
        let view = view(4);
        assert_eq!(view.total_pages(), 4);
        assert_eq!(view.current_page_number(), 1);
        assert_eq!(view.current_page().html(view.document()), "<p>0</p>");
    }

    #[test]
    fn new_document_reclamps_navigation() {
        let mut view = view(4);
        view.apply(Action::Last);
        assert_eq!(view.current_page_number(), 4);

        view.set_html("<p>only</p>");
        assert_eq!(view.total_pages(), 1);
        assert_eq!(view.current_page_number(), 1);
        assert_eq!(view.current_page().html(view.document()), "<p>only</p>");
    }

    #[test]
    fn layout_change_repaginates() {
        let mut view = view(4);
        view.apply(Action::JumpTo(3));
        view.set_layout(layout().with_page_size(PageSize::new(Pt(100.0), Pt(130.0))));
        assert_eq!(view.total_pages(), 2);
        assert_eq!(view.current_page_number(), 2);
        assert_eq!(view.pagination().content_height, Pt(130.0));
    }

    #[test]
    fn empty_html_still_renders_a_page() {
        let view = PaginatedView::from_html("", layout(), FixedHeights::default());
        assert_eq!(view.total_pages(), 1);
        assert!(view.current_page().is_empty());
        assert!(view.render_current().contains("Page 1 of 1"));
    }

    #[test]
    fn renders_page_markup() {
        let view = PaginatedView::new(
            Document::from_fragments(["<p>a</p>", "<p>b</p>"]),
            LayoutConfig::default(),
            FixedHeights::new([Pt(10.0), Pt(2000.0)]),
        );
        let first = view.render_page(1).unwrap();
        assert!(first.starts_with("<section class=\"page\" data-page=\"1\""));
        assert!(first.contains("width: 8.5in; height: 11in; padding: 72pt 72pt 72pt 72pt"));
        assert!(first.contains("<div class=\"page-content\"><p>a</p></div>"));
        assert!(first.contains("Page 1 of 2"));

        let second = view.render_page(2).unwrap();
        assert!(second.starts_with("<section class=\"page overflow\""));
        assert!(view.render_page(3).is_none());
    }

    #[test]
    fn locates_fragments() {
        let view = view(3);
        let last = view.document().fragment_order[2];
        assert_eq!(view.page_of_fragment(last), Some(3));
    }
}
