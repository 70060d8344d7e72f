//! `check` command: report matching images without rewriting anything.
//!
//! For every page, lists the images the selection predicate would inline and
//! verifies that their resources resolve: local files must exist and parse
//! as SVG, remote URLs are fetched only with `--remote`. Problems are
//! grouped per page; `--json` emits the report as JSON.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::CheckArgs;
use crate::cli::common::collect_pages;
use crate::config::InlayConfig;
use crate::dom::parse_document;
use crate::fetch::{Fetcher, Resource};
use crate::log;
use crate::pipeline::transform::select_images;
use crate::svg::extract_svg;
use crate::utils::plural_s;

/// A single problem found on a page.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    pub src: String,
    pub reason: String,
}

/// Check results across all scanned pages.
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    /// Pages scanned.
    pub pages: usize,
    /// Images matching the selection predicate.
    pub matched: usize,
    /// Remote sources skipped (run with --remote to verify them).
    pub skipped_remote: usize,
    /// Problems grouped by page path.
    pub problems: BTreeMap<String, Vec<Problem>>,
}

impl CheckReport {
    fn add_problem(&mut self, page: &Path, src: &str, reason: String) {
        self.problems
            .entry(page.display().to_string())
            .or_default()
            .push(Problem {
                src: src.to_string(),
                reason,
            });
    }

    pub fn problem_count(&self) -> usize {
        self.problems.values().map(|v| v.len()).sum()
    }

    /// Print the report to stderr in the standard colored format.
    fn print(&self) {
        if self.problems.is_empty() {
            return;
        }
        eprintln!();

        let file_count = self.problems.len();
        let problem_count = self.problem_count();
        eprintln!(
            "{} {}",
            "images".red().bold(),
            format!(
                "({file_count} page{}, {problem_count} problem{})",
                plural_s(file_count),
                plural_s(problem_count)
            )
            .dimmed()
        );

        for (page, problems) in &self.problems {
            eprintln!("{}{}{}", "[".dimmed(), page.cyan(), "]".dimmed());
            for problem in problems {
                eprintln!("{} {} {}", "→".red(), problem.src, problem.reason);
            }
        }
    }
}

/// Entry point for `inlay check`.
pub fn check_pages(args: &CheckArgs, config: &InlayConfig) -> Result<()> {
    let pages = collect_pages(&args.paths, config)?;
    if pages.is_empty() {
        log!("check"; "no pages found");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let report = runtime.block_on(build_report(&pages, args.remote, config))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
        summarize(&report);
    }

    if report.problem_count() > 0 && !args.warn_only {
        std::process::exit(1);
    }
    Ok(())
}

async fn build_report(
    pages: &[PathBuf],
    verify_remote: bool,
    config: &InlayConfig,
) -> Result<CheckReport> {
    let fetcher = Fetcher::new(config)?;
    let mut report = CheckReport {
        pages: pages.len(),
        ..Default::default()
    };

    for page in pages {
        check_page(page, &fetcher, verify_remote, config, &mut report).await?;
    }

    Ok(report)
}

/// Check a single page's matching images.
async fn check_page(
    page: &Path,
    fetcher: &Fetcher,
    verify_remote: bool,
    config: &InlayConfig,
    report: &mut CheckReport,
) -> Result<()> {
    let source = tokio::fs::read_to_string(page)
        .await
        .with_context(|| format!("failed to read {}", page.display()))?;
    let doc = parse_document(&source)
        .with_context(|| format!("failed to parse {}", page.display()))?;

    let page_dir = page.parent().unwrap_or(Path::new("."));
    let targets = select_images(&doc, &config.select);
    report.matched += targets.len();

    for (_, src) in targets {
        let resource = match fetcher.resolve(&src, page_dir) {
            Ok(resource) => resource,
            Err(e) => {
                report.add_problem(page, &src, e.to_string());
                continue;
            }
        };

        match &resource {
            Resource::Local(path) if !path.exists() => {
                report.add_problem(page, &src, "file not found".to_string());
                continue;
            }
            Resource::Remote(_) if !verify_remote => {
                report.skipped_remote += 1;
                continue;
            }
            _ => {}
        }

        // Verify the body actually yields an <svg> subtree.
        match fetcher.fetch(&resource).await {
            Ok(body) => {
                if let Err(e) = extract_svg(&body, &config.svg.strip_attrs) {
                    report.add_problem(page, &src, e.to_string());
                }
            }
            Err(e) => report.add_problem(page, &src, e.to_string()),
        }
    }

    Ok(())
}

fn summarize(report: &CheckReport) {
    let problems = report.problem_count();
    if problems == 0 {
        log!(
            "check";
            "{} image{} across {} page{}, all resolvable",
            report.matched, plural_s(report.matched), report.pages, plural_s(report.pages)
        );
    } else {
        log!(
            "check";
            "found {} problem{} across {} page{}",
            problems, plural_s(problems), report.problems.len(), plural_s(report.problems.len())
        );
    }
    if report.skipped_remote > 0 {
        log!(
            "check";
            "{} remote source{} not verified (pass --remote)",
            report.skipped_remote, plural_s(report.skipped_remote)
        );
    }
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
    async fn test_report_counts_matches_and_problems() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("notsvg.svg"), "<div>nope</div>").unwrap();
        let page = dir.path().join("index.html");
        fs::write(
            &page,
            r#"<body><img src="good.svg"><img src="notsvg.svg"><img src="gone.svg"><img src="photo.png"></body>"#,
        )
        .unwrap();

        let config = site_config(dir.path());
        let report = build_report(&[page], false, &config).await.unwrap();

        assert_eq!(report.pages, 1);
        assert_eq!(report.matched, 3);
        assert_eq!(report.problem_count(), 2);

        let problems = report.problems.values().next().unwrap();
        let srcs: Vec<_> = problems.iter().map(|p| p.src.as_str()).collect();
        assert!(srcs.contains(&"notsvg.svg"));
        assert!(srcs.contains(&"gone.svg"));
    }

    #[tokio::test]
    async fn test_report_skips_remote_without_flag() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("index.html");
        fs::write(
            &page,
            r#"<body><img src="https://example.com/icon.svg"></body>"#,
        )
        .unwrap();

        let config = site_config(dir.path());
        let report = build_report(&[page], false, &config).await.unwrap();

        assert_eq!(report.matched, 1);
        assert_eq!(report.skipped_remote, 1);
        assert_eq!(report.problem_count(), 0);
    }

    #[tokio::test]
    async fn test_report_serializes_to_json() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("index.html");
        fs::write(&page, r#"<body><img src="gone.svg"></body>"#).unwrap();

        let config = site_config(dir.path());
        let report = build_report(&[page], false, &config).await.unwrap();
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"matched\": 1"));
        assert!(json.contains("gone.svg"));
    }
}
