//! Shared helpers for CLI commands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rustc_hash::FxHashSet;

use crate::config::InlayConfig;
use crate::log;

/// Collect the pages to process.
///
/// Explicit `paths` (files or directories) win over the configured scan
/// root. Directories are walked recursively for files with a configured
/// page extension. The result is de-duplicated and sorted for a
/// deterministic processing order.
pub fn collect_pages(paths: &[PathBuf], config: &InlayConfig) -> Result<Vec<PathBuf>> {
    let roots: Vec<PathBuf> = if paths.is_empty() {
        vec![config.pages_dir()]
    } else {
        paths.to_vec()
    };

    let mut seen = FxHashSet::default();
    let mut pages = Vec::new();

    for root in roots {
        if root.is_file() {
            if seen.insert(root.clone()) {
                pages.push(root);
            }
        } else if root.is_dir() {
            for entry in jwalk::WalkDir::new(&root) {
                let Ok(entry) = entry else { continue };
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                if is_page(&path, &config.scan.extensions) && seen.insert(path.clone()) {
                    pages.push(path);
                }
            }
        } else {
            log!("warning"; "path not found: {}", root.display());
        }
    }

    pages.sort();
    Ok(pages)
}

/// Check whether a file carries one of the configured page extensions.
fn is_page(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Compute the output path for a page: a mirror under `output` when given,
/// otherwise the page itself (in-place rewrite).
pub fn output_path(page: &Path, pages_dir: &Path, output: Option<&Path>) -> PathBuf {
    let Some(output) = output else {
        return page.to_path_buf();
    };
    let relative = page
        .strip_prefix(pages_dir)
        .ok()
        .map(Path::to_path_buf)
        .or_else(|| page.file_name().map(PathBuf::from))
        .unwrap_or_else(|| page.to_path_buf());
    output.join(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_pages_walks_scan_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("posts/a.htm"), "<html></html>").unwrap();
        fs::write(dir.path().join("style.css"), "body {}").unwrap();

        let mut config = InlayConfig::default();
        config.root = dir.path().to_path_buf();

        let pages = collect_pages(&[], &config).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| is_page(p, &config.scan.extensions)));
    }

    #[test]
    fn test_collect_pages_explicit_paths_dedupe() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("index.html");
        fs::write(&page, "<html></html>").unwrap();

        let config = InlayConfig::default();
        let pages = collect_pages(&[page.clone(), page.clone()], &config).unwrap();
        assert_eq!(pages, vec![page]);
    }

    #[test]
    fn test_collect_pages_missing_path_is_skipped() {
        let dir = TempDir::new().unwrap();
        let config = InlayConfig::default();
        let pages = collect_pages(&[dir.path().join("absent")], &config).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_is_page_case_insensitive() {
        let extensions = vec!["html".to_string()];
        assert!(is_page(Path::new("a.html"), &extensions));
        assert!(is_page(Path::new("a.HTML"), &extensions));
        assert!(!is_page(Path::new("a.css"), &extensions));
        assert!(!is_page(Path::new("html"), &extensions));
    }

    #[test]
    fn test_output_path_in_place() {
        let page = Path::new("/site/posts/a.html");
        assert_eq!(
            output_path(page, Path::new("/site"), None),
            PathBuf::from("/site/posts/a.html")
        );
    }

    #[test]
    fn test_output_path_mirror() {
        let page = Path::new("/site/posts/a.html");
        assert_eq!(
            output_path(page, Path::new("/site"), Some(Path::new("/out"))),
            PathBuf::from("/out/posts/a.html")
        );
    }

    #[test]
    fn test_output_path_outside_pages_dir_falls_back_to_name() {
        let page = Path::new("/elsewhere/b.html");
        assert_eq!(
            output_path(page, Path::new("/site"), Some(Path::new("/out"))),
            PathBuf::from("/out/b.html")
        );
    }
}
