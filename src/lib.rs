//! Reflows rich-text HTML into fixed-size pages and keeps track of which page
//! is on screen.
//!
//! A [`Document`] is split into block-level [`Fragment`]s, each fragment is
//! measured by a [`Measure`](measure::Measure) implementation, and
//! [`paginate`] stacks them greedily into [`Page`]s that fit the content box
//! of a [`LayoutConfig`]. A [`PaginatedView`] ties this together with a
//! [`Navigator`] for next / previous / jump navigation and a fullscreen flag.
//!
//! ```
//! use page_flow::measure::TextMetrics;
//! use page_flow::{Key, LayoutConfig, PaginatedView};
//!
//! let html: String = (0..200).map(|i| format!("<p>Paragraph {i}</p>\n")).collect();
//! let mut view = PaginatedView::from_html(&html, LayoutConfig::default(), TextMetrics::default());
//!
//! assert!(view.total_pages() > 1);
//! view.handle_key(Key::End);
//! assert_eq!(view.current_page_number(), view.total_pages());
//! assert_eq!(view.document().to_html(), html);
//! ```

mod document;
pub use document::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

/// Page geometry and the layout configuration of a pagination pass
pub mod layout;
pub use layout::LayoutConfig;

pub mod measure;

mod navigation;
pub use navigation::*;

mod paginate;
pub use paginate::*;

pub mod pagesize;

mod rect;
pub use rect::*;

mod units;
pub use units::*;

mod view;
pub use view::*;
