//! SVG inliner transform.
//!
//! Selection walks the page for `img` elements whose `src` matches the
//! configured predicate. Each selected image is then handled independently
//! and concurrently: fetch the resource, extract the first `<svg>` element,
//! strip unwanted root attributes, and swap the `img` for the result at the
//! same position among its siblings.
//!
//! Failures are isolated per image: the original `<img>` stays in place and
//! the rest of the page is unaffected. Completion order across images is
//! unspecified; each replacement touches a disjoint node.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{InlayConfig, SelectConfig};
use crate::debug;
use crate::dom::{Document, Element, Node};
use crate::fetch::{FetchError, Fetcher, Resource};
use crate::svg::{OptimizeOptions, SvgError, extract_svg, optimize_svg};

/// Why a single image could not be inlined.
#[derive(Debug, Error)]
pub enum InlineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Svg(#[from] SvgError),
}

/// Address of a node as child indices from the document roots.
type NodePath = Vec<usize>;

/// Cleaned `<svg>` subtrees keyed by resolved source, shared across pages.
pub type FetchCache = DashMap<Resource, Element>;

/// Per-page inlining counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineStats {
    /// Images whose `src` matched the selection predicate.
    pub matched: usize,
    /// Images replaced by SVG markup.
    pub inlined: usize,
    /// Images left in place after a failure.
    pub failed: usize,
}

/// Shared state for the inliner, cheap to clone into page tasks.
#[derive(Clone)]
pub struct InlineContext {
    pub fetcher: Arc<Fetcher>,
    pub cache: Arc<FetchCache>,
    pub limiter: Arc<Semaphore>,
    pub select: SelectConfig,
    pub strip_attrs: Arc<Vec<String>>,
    pub optimize: bool,
    pub dpi: f32,
}

impl InlineContext {
    pub fn from_config(config: &InlayConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Arc::new(Fetcher::new(config)?),
            cache: Arc::new(FetchCache::new()),
            limiter: Arc::new(Semaphore::new(config.fetch.concurrency)),
            select: config.select.clone(),
            strip_attrs: Arc::new(config.svg.strip_attrs.clone()),
            optimize: config.svg.optimize,
            dpi: config.svg.dpi,
        })
    }
}

/// Replaces matching `<img>` elements with fetched SVG markup
pub struct SvgInlineTransform {
    ctx: InlineContext,
    page_dir: PathBuf,
}

impl SvgInlineTransform {
    pub fn new(ctx: InlineContext, page_dir: PathBuf) -> Self {
        Self { ctx, page_dir }
    }

    /// Inline every matching image on the page.
    pub async fn apply(&self, doc: &mut Document) -> InlineStats {
        let targets = select_images(doc, &self.ctx.select);
        let mut stats = InlineStats {
            matched: targets.len(),
            ..Default::default()
        };
        if targets.is_empty() {
            return stats;
        }

        let mut tasks: JoinSet<(NodePath, String, Result<Element, InlineError>)> = JoinSet::new();
        for (path, src) in targets {
            let ctx = self.ctx.clone();
            let page_dir = self.page_dir.clone();
            tasks.spawn(async move {
                let result = inline_one(&ctx, &page_dir, &src).await;
                (path, src, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let Ok((path, src, result)) = joined else {
                continue;
            };
            match result {
                Ok(svg) => {
                    if replace_at(doc, &path, svg) {
                        stats.inlined += 1;
                    } else {
                        stats.failed += 1;
                    }
                }
                Err(e) => {
                    stats.failed += 1;
                    crate::log!("inline"; "left `{}` in place: {}", src, e);
                }
            }
        }

        stats
    }
}

/// Fetch one image source and build its cleaned `<svg>` subtree.
async fn inline_one(
    ctx: &InlineContext,
    page_dir: &Path,
    src: &str,
) -> Result<Element, InlineError> {
    let resource = ctx.fetcher.resolve(src, page_dir)?;

    if let Some(cached) = ctx.cache.get(&resource) {
        return Ok(cached.value().clone());
    }

    let _permit = ctx.limiter.acquire().await.ok();
    let body = ctx.fetcher.fetch(&resource).await?;
    let svg = build_svg(ctx, &body)?;

    ctx.cache.insert(resource, svg.clone());
    Ok(svg)
}

/// Extract the `<svg>` subtree, optionally optimizing the body first.
fn build_svg(ctx: &InlineContext, body: &str) -> Result<Element, SvgError> {
    if ctx.optimize {
        match optimize_svg(body.as_bytes(), &OptimizeOptions { dpi: ctx.dpi }) {
            Ok(optimized) => return extract_svg(&optimized, &ctx.strip_attrs),
            Err(e) => debug!("inline"; "optimize failed, inlining as fetched: {e:#}"),
        }
    }
    extract_svg(body, &ctx.strip_attrs)
}

/// Collect the node path and `src` of every image matching the predicate.
pub(crate) fn select_images(doc: &Document, select: &SelectConfig) -> Vec<(NodePath, String)> {
    let mut found = Vec::new();
    for (index, node) in doc.roots.iter().enumerate() {
        visit(node, vec![index], select, &mut found);
    }
    found
}

fn visit(node: &Node, path: NodePath, select: &SelectConfig, found: &mut Vec<(NodePath, String)>) {
    let Node::Element(elem) = node else { return };

    if elem.is_tag("img") {
        if let Some(src) = elem.get_attr("src")
            && select.matches(src)
        {
            found.push((path, src.to_string()));
        }
        return;
    }

    for (index, child) in elem.children.iter().enumerate() {
        let mut child_path = path.clone();
        child_path.push(index);
        visit(child, child_path, select, found);
    }
}

/// Replace the node at `path` with the SVG subtree, in place.
///
/// Paths stay valid throughout a run because replacement never changes the
/// shape of the tree around the target. The target is re-checked to still be
/// an `img` before the swap.
fn replace_at(doc: &mut Document, path: &[usize], svg: Element) -> bool {
    let Some((&first, rest)) = path.split_first() else {
        return false;
    };
    let Some(mut node) = doc.roots.get_mut(first) else {
        return false;
    };

    for &index in rest {
        let Node::Element(elem) = node else {
            return false;
        };
        let Some(child) = elem.children.get_mut(index) else {
            return false;
        };
        node = child;
    }

    if !matches!(node, Node::Element(e) if e.is_tag("img")) {
        return false;
    }
    *node = Node::Element(Box::new(svg));
    true
}
