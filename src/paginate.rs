//! Greedy pagination of a [`Document`] into fixed-size pages.
//!
//! Fragments are taken in order and stacked onto the current page until the
//! next one would push the page past the height of the content box; that
//! fragment then starts a new page. A fragment that is taller than the content
//! box on its own is placed alone on a page and left to overflow rather than
//! being split. An empty document still produces a single, empty page.
//!
//! ```
//! use page_flow::measure::FixedHeights;
//! use page_flow::{paginate, Document, LayoutConfig, Pt};
//!
//! // the default content box is 648pt tall
//! let doc = Document::from_fragments(["<p>a</p>", "<p>b</p>", "<p>c</p>"]);
//! let heights = FixedHeights::new([Pt(400.0), Pt(200.0), Pt(100.0)]);
//! let pagination = paginate(&doc, &LayoutConfig::default(), &heights);
//!
//! assert_eq!(pagination.len(), 2);
//! assert_eq!(pagination.html_of(&doc, 2).unwrap(), "<p>c</p>");
//! ```

use crate::document::{Document, Fragment, FragmentKind};
use crate::layout::LayoutConfig;
use crate::measure::Measure;
use crate::units::Pt;
use id_arena::Id;

/// One page of laid out content: a run of consecutive fragments.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    pub fragments: Vec<Id<Fragment>>,
    /// Sum of the measured heights of the page's fragments
    pub height: Pt,
    /// Set when a single fragment is taller than the content box
    pub overflows: bool,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The page's markup: its fragments' sources, concatenated
    pub fn html(&self, document: &Document) -> String {
        self.fragments
            .iter()
            .filter_map(|id| document.get(*id))
            .map(|f| f.source.as_str())
            .collect()
    }
}

/// The result of a pagination pass. Always holds at least one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    pub pages: Vec<Page>,
    /// Height of the content box the pages were filled against
    pub content_height: Pt,
}

impl Pagination {
    /// Number of pages; never zero
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always `false`: pagination yields at least one page
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get a page by its 1-based number
    pub fn page(&self, number: usize) -> Option<&Page> {
        number.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> + '_ {
        self.pages.iter()
    }

    /// The 1-based number of the page holding the given fragment
    pub fn page_of(&self, fragment: Id<Fragment>) -> Option<usize> {
        self.pages
            .iter()
            .find(|page| page.fragments.contains(&fragment))
            .map(|page| page.number)
    }

    /// Markup of the page with the given 1-based number
    pub fn html_of(&self, document: &Document, number: usize) -> Option<String> {
        self.page(number).map(|page| page.html(document))
    }

    /// Pages that hold a fragment taller than the content box
    pub fn overflowing(&self) -> impl Iterator<Item = &Page> + '_ {
        self.pages.iter().filter(|page| page.overflows)
    }
}

/// Asks `measurer` for the height of `fragment`. A failed measurement, or one
/// that isn't a finite non-negative length, counts as zero height.
pub fn measured_height<M: Measure + ?Sized>(
    measurer: &M,
    fragment: &Fragment,
    layout: &LayoutConfig,
) -> Pt {
    match measurer.measure(fragment, layout) {
        Some(height) if height.is_finite() && height >= Pt::ZERO => height,
        Some(height) => {
            log::debug!(
                "fragment {} measured at {height}, treating it as zero height",
                fragment.index
            );
            Pt::ZERO
        }
        None => {
            log::debug!(
                "fragment {} could not be measured, treating it as zero height",
                fragment.index
            );
            Pt::ZERO
        }
    }
}

/// Splits `document` into pages that fit the content box of `layout`.
///
/// The pass is deterministic: the same document, layout and measurer always
/// produce the same page boundaries.
pub fn paginate<M: Measure + ?Sized>(
    document: &Document,
    layout: &LayoutConfig,
    measurer: &M,
) -> Pagination {
    if let Err(err) = layout.validate() {
        log::warn!("paginating with a questionable layout: {err}");
    }

    let limit = layout.content_box().height();
    let mut builder = PageBuilder::new(limit);

    for (id, fragment) in document.iter() {
        let height = measured_height(measurer, fragment, layout);
        // zero-height fragments always fold into the open page, even one that
        // already overflows
        if !builder.is_empty() && height > Pt::ZERO && builder.height + height > limit {
            builder.close();
        }
        builder.push(id, height);

        if layout.honor_page_breaks && fragment.kind == FragmentKind::PageBreak {
            builder.close();
        }
    }

    let pages = builder.finish();
    log::debug!(
        "paginated {} fragments into {} pages ({} overflowing)",
        document.len(),
        pages.len(),
        pages.iter().filter(|page| page.overflows).count()
    );

    Pagination {
        pages,
        content_height: limit,
    }
}

struct PageBuilder {
    limit: Pt,
    pages: Vec<Page>,
    fragments: Vec<Id<Fragment>>,
    height: Pt,
}

impl PageBuilder {
    fn new(limit: Pt) -> PageBuilder {
        PageBuilder {
            limit,
            pages: Vec::new(),
            fragments: Vec::new(),
            height: Pt::ZERO,
        }
    }

    fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn push(&mut self, id: Id<Fragment>, height: Pt) {
        self.fragments.push(id);
        self.height += height;
    }

    /// Ends the current page. Does nothing if the page has no fragments yet, so
    /// consecutive breaks never produce blank pages.
    fn close(&mut self) {
        if self.fragments.is_empty() {
            return;
        }
        let number = self.pages.len() + 1;
        let overflows = self.height > self.limit;
        log::trace!(
            "page {number}: {} fragments, {} of {}",
            self.fragments.len(),
            self.height,
            self.limit
        );
        self.pages.push(Page {
            number,
            fragments: std::mem::take(&mut self.fragments),
            height: self.height,
            overflows,
        });
        self.height = Pt::ZERO;
    }

    fn finish(mut self) -> Vec<Page> {
        self.close();
        if self.pages.is_empty() {
            self.pages.push(Page {
                number: 1,
                fragments: Vec::new(),
                height: Pt::ZERO,
                overflows: false,
            });
        }
        self.pages
    }
}
