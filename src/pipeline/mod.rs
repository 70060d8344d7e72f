//! Page rewrite pipeline.
//!
//! One page moves through the stages below as a unit; the fetch stage fans
//! out per image and the two DOM mutations run on the page's own task.
//!
//! ```text
//! parse -> select -> fetch (concurrent per image) -> apply -> inject -> render
//! ```
//!
//! Inlining and injection are independent of each other; they are ordered
//! here only so a page is parsed and rendered once.

pub mod transform;

use std::path::Path;

use anyhow::Result;

use crate::config::InjectConfig;
use crate::dom::{parse_document, render_document};

pub use transform::{FetchCache, InitInjector, InlineContext, InlineError, InlineStats,
    SvgInlineTransform};

/// Outcome of rewriting one page.
#[derive(Debug)]
pub struct PageOutcome {
    /// Rendered HTML, present only when the page changed.
    pub html: Option<String>,
    /// Inlining counters.
    pub stats: InlineStats,
    /// Whether the bootstrap script was added.
    pub injected: bool,
}

impl PageOutcome {
    pub fn changed(&self) -> bool {
        self.html.is_some()
    }
}

/// Rewrite a single page: inline matching images, inject the bootstrap.
///
/// `page_dir` anchors file-relative image sources.
pub async fn rewrite_page(
    source: &str,
    page_dir: &Path,
    ctx: &InlineContext,
    inject: &InjectConfig,
) -> Result<PageOutcome> {
    let mut doc = parse_document(source)?;

    let inliner = SvgInlineTransform::new(ctx.clone(), page_dir.to_path_buf());
    let stats = inliner.apply(&mut doc).await;

    let injected = InitInjector::new(inject).apply(&mut doc);

    let changed = stats.inlined > 0 || injected;
    let html = changed.then(|| render_document(&doc));

    Ok(PageOutcome {
        html,
        stats,
        injected,
    })
}
