//! Static site generation.
//!
//! Renders the portfolio once per locale, exactly as the page looks right
//! after start-up with nothing hidden and nothing open, and copies the asset
//! directory next to it.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html          # default locale
//! ├── pt.html             # every other locale, at the root too
//! └── assets/             # copied verbatim (images, PDFs, résumé)
//!     ├── avatar.png
//!     └── thesis.pdf
//! ```
//!
//! Each page's language switch is a plain link to the next locale's file.
//! All pages are rendered before anything is written, so a content error
//! never leaves a half-built directory behind. When the document can't be
//! loaded at all, [`write_load_error`] puts an error notice at `index.html`
//! in place of the portfolio.

use crate::config::SiteConfig;
use crate::content::{ContentDocument, LoadError, Store, StoreError};
use crate::i18n::Labels;
use crate::page::{Page, Skeleton};
use crate::render::{self, DocumentState};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Asset walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub locale: String,
    /// Path relative to the output directory.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateSummary {
    pub output_dir: PathBuf,
    pub pages: Vec<GeneratedPage>,
    pub assets_copied: usize,
}

/// File name of a locale's page.
pub fn page_file(locale: &str, default_locale: &str) -> String {
    if locale == default_locale {
        "index.html".to_string()
    } else {
        format!("{locale}.html")
    }
}

/// Render every locale of `document`, write the pages to `output_dir`, and
/// copy `assets_dir` (if given) underneath it.
pub fn generate(
    document: &ContentDocument,
    config: &SiteConfig,
    assets_dir: Option<&Path>,
    output_dir: &Path,
) -> Result<GenerateSummary, GenerateError> {
    let default_locale = config.default_locale.as_str();
    let mut store = Store::new(document.clone(), default_locale)?;

    let locales: Vec<String> = document.locales().map(str::to_string).collect();
    let mut rendered = Vec::with_capacity(locales.len());
    for locale in &locales {
        store.select(locale)?;
        let mut page = Page::new(Skeleton::portfolio());
        page.paint(&store);
        let state = DocumentState {
            lang_href: Some(page_file(store.next_locale(), default_locale)),
            ..Default::default()
        };
        let html = render::document(&page, &state).into_string();
        debug!("rendered {locale} ({} bytes)", html.len());
        rendered.push((locale.clone(), PathBuf::from(page_file(locale, default_locale)), html));
    }

    fs::create_dir_all(output_dir)?;
    let mut summary = GenerateSummary {
        output_dir: output_dir.to_path_buf(),
        ..Default::default()
    };
    for (locale, path, html) in rendered {
        fs::write(output_dir.join(&path), html)?;
        info!("generated {}", path.display());
        summary.pages.push(GeneratedPage { locale, path });
    }

    if let Some(assets) = assets_dir {
        let name = assets.file_name().map_or_else(|| PathBuf::from("assets"), PathBuf::from);
        summary.assets_copied = copy_assets(assets, &output_dir.join(name))?;
        info!("copied {} assets", summary.assets_copied);
    }

    info!("site generated at {}", output_dir.display());
    Ok(summary)
}

/// Write the load-error notice as `index.html`, in the default locale's
/// language. No sections are rendered. Returns the written path.
pub fn write_load_error(
    error: &LoadError,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<PathBuf, GenerateError> {
    let locale = config.default_locale.as_str();
    let html = render::load_error_document(Labels::for_locale(locale), locale, &error.to_string());
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(page_file(locale, locale));
    fs::write(&path, html.into_string())?;
    warn!("content failed to load, wrote error notice to {}", path.display());
    Ok(path)
}

/// Copy a directory tree, returning the number of files copied.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
