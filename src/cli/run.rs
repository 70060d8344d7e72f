//! `run` command: rewrite pages in place (or into an output mirror).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::RunArgs;
use crate::cli::common::{collect_pages, output_path};
use crate::config::{InjectConfig, InlayConfig};
use crate::logger::ProgressLine;
use crate::pipeline::{InlineContext, rewrite_page};
use crate::utils::plural_s;
use crate::{debug, log};

/// Entry point for `inlay run`.
pub fn run_pages(args: &RunArgs, config: &InlayConfig) -> Result<()> {
    let pages = collect_pages(&args.paths, config)?;
    if pages.is_empty() {
        log!("run"; "no pages found");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(process_pages(pages, args.output.as_deref(), config))
}

/// Per-page result carried back to the summary.
struct PageSummary {
    page: PathBuf,
    matched: usize,
    inlined: usize,
    failed: usize,
    injected: bool,
}

async fn process_pages(
    pages: Vec<PathBuf>,
    output: Option<&Path>,
    config: &InlayConfig,
) -> Result<()> {
    let ctx = InlineContext::from_config(config)?;
    let pages_dir = config.pages_dir();

    let progress = ProgressLine::new(&[("pages", pages.len())]);
    let mut tasks: tokio::task::JoinSet<Result<PageSummary>> = tokio::task::JoinSet::new();

    for page in pages {
        let ctx = ctx.clone();
        let inject = config.inject.clone();
        let out = output_path(&page, &pages_dir, output);
        tasks.spawn(async move { process_page(page, out, ctx, inject).await });
    }

    let (mut matched, mut inlined, mut failed, mut injected, mut pages_done) = (0, 0, 0, 0, 0);
    while let Some(joined) = tasks.join_next().await {
        let Ok(result) = joined else { continue };
        match result {
            Ok(summary) => {
                matched += summary.matched;
                inlined += summary.inlined;
                failed += summary.failed;
                injected += usize::from(summary.injected);
                pages_done += 1;
                debug!("run"; "{}: {}/{} inlined", summary.page.display(), summary.inlined, summary.matched);
            }
            Err(e) => log!("error"; "{e:#}"),
        }
        progress.inc("pages");
    }
    progress.finish();

    log!(
        "run";
        "inlined {} of {} image{} across {} page{}",
        inlined, matched, plural_s(matched), pages_done, plural_s(pages_done)
    );
    if injected > 0 {
        log!("run"; "injected bootstrap into {} page{}", injected, plural_s(injected));
    }
    if failed > 0 {
        log!("warning"; "{} image{} left in place (see messages above)", failed, plural_s(failed));
    }

    Ok(())
}

/// Rewrite one page and write the result.
///
/// In-place runs only touch the file when the page actually changed. Mirror
/// runs (`--output`) also copy unchanged pages, so the mirror is complete.
async fn process_page(
    page: PathBuf,
    out: PathBuf,
    ctx: InlineContext,
    inject: InjectConfig,
) -> Result<PageSummary> {
    let source = tokio::fs::read_to_string(&page)
        .await
        .with_context(|| format!("failed to read {}", page.display()))?;

    let page_dir = page.parent().unwrap_or(Path::new(".")).to_path_buf();
    let outcome = rewrite_page(&source, &page_dir, &ctx, &inject)
        .await
        .with_context(|| format!("failed to rewrite {}", page.display()))?;

    let mirroring = out != page;
    if outcome.changed() || mirroring {
        if let Some(parent) = out.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = outcome.html.as_deref().unwrap_or(&source);
        tokio::fs::write(&out, contents)
            .await
            .with_context(|| format!("failed to write {}", out.display()))?;
    }

    Ok(PageSummary {
        page,
        matched: outcome.stats.matched,
        inlined: outcome.stats.inlined,
        failed: outcome.stats.failed,
        injected: outcome.injected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site_config(root: &Path) -> InlayConfig {
        let mut config = InlayConfig::default();
        config.root = root.to_path_buf();
        config
    }

    #[tokio::test]
    async fn test_process_page_in_place() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("icon.svg"), "<svg><circle/></svg>").unwrap();
        let page = dir.path().join("index.html");
        fs::write(&page, r#"<html><body><img src="icon.svg"></body></html>"#).unwrap();

        let config = site_config(dir.path());
        let ctx = InlineContext::from_config(&config).unwrap();
        let summary = process_page(page.clone(), page.clone(), ctx, config.inject.clone())
            .await
            .unwrap();

        assert_eq!(summary.inlined, 1);
        let written = fs::read_to_string(&page).unwrap();
        assert_eq!(
            written,
            "<html><body><svg><circle/></svg></body></html>"
        );
    }

    #[tokio::test]
    async fn test_process_page_unchanged_is_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("index.html");
        // No matching images: the file must keep its original bytes.
        let source = "<html><body><img src=\"photo.png\"></body></html>\n";
        fs::write(&page, source).unwrap();

        let config = site_config(dir.path());
        let ctx = InlineContext::from_config(&config).unwrap();
        let summary = process_page(page.clone(), page.clone(), ctx, config.inject.clone())
            .await
            .unwrap();

        assert_eq!(summary.matched, 0);
        assert_eq!(fs::read_to_string(&page).unwrap(), source);
    }

    #[tokio::test]
    async fn test_process_page_mirror_copies_unchanged() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("index.html");
        let source = "<html><body>plain</body></html>";
        fs::write(&page, source).unwrap();

        let out = dir.path().join("out/index.html");
        let config = site_config(dir.path());
        let ctx = InlineContext::from_config(&config).unwrap();
        process_page(page, out.clone(), ctx, config.inject.clone())
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(&out).unwrap(), source);
    }

    #[tokio::test]
    async fn test_process_pages_end_to_end() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("one.svg"), r#"<svg id="one"/>"#).unwrap();
        fs::write(dir.path().join("two.svg"), r#"<svg id="two"/>"#).unwrap();
        fs::write(
            dir.path().join("index.html"),
            r#"<html><body><img src="one.svg"><img src="two.svg"></body></html>"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("about.html"),
            r#"<html><body><img src="missing.svg"></body></html>"#,
        )
        .unwrap();

        let config = site_config(dir.path());
        let pages = collect_pages(&[], &config).unwrap();
        assert_eq!(pages.len(), 2);
        process_pages(pages, None, &config).await.unwrap();

        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains(r#"<svg id="one"/>"#));
        assert!(index.contains(r#"<svg id="two"/>"#));

        // The failing page keeps its img untouched.
        let about = fs::read_to_string(dir.path().join("about.html")).unwrap();
        assert!(about.contains(r#"<img src="missing.svg">"#));
    }
}
