//! Page transforms.
//!
//! - `inline`: replaces matching `<img>` elements with fetched SVG markup
//! - `inject`: appends the framework bootstrap script to `<body>`

mod inject;
mod inline;

pub use inject::InitInjector;
pub use inline::{FetchCache, InlineContext, InlineError, InlineStats, SvgInlineTransform};
pub(crate) use inline::select_images;
