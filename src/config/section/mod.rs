//! Configuration section definitions.

mod fetch;
mod inject;
mod scan;
mod select;
mod svg;

pub use fetch::FetchConfig;
pub use inject::InjectConfig;
pub use scan::ScanConfig;
pub use select::SelectConfig;
pub use svg::SvgConfig;
