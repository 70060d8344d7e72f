//! Optional SVG optimization using usvg.

use anyhow::{Context, Result};

/// Options for SVG optimization
#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    /// DPI for rendering calculations.
    pub dpi: f32,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self { dpi: 96.0 }
    }
}

/// Round-trip SVG content through usvg, producing minified markup.
///
/// usvg normalizes the tree (resolves defaults, drops unused definitions)
/// and writes it back without indentation.
pub fn optimize_svg(content: &[u8], options: &OptimizeOptions) -> Result<String> {
    let usvg_options = usvg::Options {
        dpi: options.dpi,
        ..Default::default()
    };

    let tree = usvg::Tree::from_data(content, &usvg_options).context("Failed to parse SVG")?;

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        ..Default::default()
    };

    Ok(tree.to_string(&write_options))
}
