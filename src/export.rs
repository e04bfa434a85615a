use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::catalog::Catalog;
use crate::cli::RenderArgs;
use crate::render::{render_not_found, render_route};
use crate::routes::{Route, all_routes};

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let catalog = Catalog::load_configured(args.catalog.as_deref()).context("load catalog")?;
    let written = write_site(&catalog, &args.out, args.force)?;
    tracing::info!(pages = written, out = %args.out.display(), "rendered site");
    Ok(())
}

/// Writes one `index.html` per route plus `404.html`; returns the number of pages.
pub fn write_site(catalog: &Catalog, out_dir: &Path, force: bool) -> anyhow::Result<usize> {
    if out_dir.exists() && !force && !is_empty_dir(out_dir)? {
        anyhow::bail!("render output already exists: {}", out_dir.display());
    }

    let mut written = 0usize;
    for route in all_routes(catalog) {
        let html = render_route(catalog, &route)
            .with_context(|| format!("render route: {}", route.path()))?;
        let path = page_path(out_dir, &route);
        write_page(&path, &html)?;
        tracing::debug!(route = %route.path(), path = %path.display(), "wrote page");
        written += 1;
    }

    let not_found = render_not_found(catalog, None);
    write_page(&out_dir.join("404.html"), &not_found)?;

    Ok(written)
}

pub fn page_path(out_dir: &Path, route: &Route) -> PathBuf {
    let mut path = out_dir.to_path_buf();
    for segment in route.path().split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.join("index.html")
}

fn write_page(path: &Path, html: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create page dir: {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("write page: {}", path.display()))
}

fn is_empty_dir(dir: &Path) -> anyhow::Result<bool> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("read output dir: {}", dir.display()))?;
    Ok(entries.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_path_mirrors_url_scheme() {
        let out = Path::new("site");
        assert_eq!(
            page_path(out, &Route::Hub),
            Path::new("site/learn/index.html")
        );
        assert_eq!(
            page_path(out, &Route::lesson("a", "b", "c")),
            Path::new("site/learn/a/b/c/index.html")
        );
    }

    #[test]
    fn refuses_non_empty_output_without_force() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("keep.txt"), "x").unwrap();
        let catalog = Catalog::builtin().unwrap();

        let err = write_site(&catalog, temp.path(), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let written = write_site(&catalog, temp.path(), true).unwrap();
        assert!(written > 0);
        assert!(temp.path().join("keep.txt").exists());
    }
}
