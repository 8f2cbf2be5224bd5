//! Page geometry: margins, font metrics and the [`LayoutConfig`] a pagination
//! pass runs against.
//!
//! # Example
//!
//! ```
//! use page_flow::layout::{FontMetrics, LayoutConfig, Margins};
//! use page_flow::{pagesize, In, Pt};
//!
//! let config = LayoutConfig::default()
//!     .with_page_size(pagesize::TRADE_6X9)
//!     .with_margins(Margins::symmetric(In(0.75), In(0.625)))
//!     .with_font(FontMetrics::new(Pt(11.0), 1.4));
//!
//! let content = config.content_box();
//! assert_eq!(content.height(), Pt(9.0 * 72.0 - 108.0));
//! ```

mod config;
mod margins;

pub use config::*;
pub use margins::*;
