//! SVG handling for fetched image bodies.
//!
//! # Modules
//!
//! - [`extract`]: locate the first `<svg>` element in an XML body and build
//!   a DOM subtree from it, stripping unwanted root attributes
//! - [`optimize`]: optional usvg round-trip (minification)

mod extract;
mod optimize;

pub use extract::{SvgError, extract_svg};
pub use optimize::{OptimizeOptions, optimize_svg};
