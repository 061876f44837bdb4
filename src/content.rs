//! Content store.
//!
//! Loads the content document, assigns stable ids, and tracks the active
//! locale. The document is immutable after load; switching locale only moves
//! the selection.
//!
//! ## Document shapes
//!
//! ```text
//! { "en": { profile, about, projects, experience, publications, ui? },
//!   "pt": { ... } }                         ← localized (preferred)
//!
//! { profile, about, projects, ... }         ← flat, stored under the default locale
//! ```
//!
//! ## Identity
//!
//! Every project and publication gets an id right after parsing: explicit ids
//! are kept, missing ones become `project-{index}` / `pub-{index}`. Lookups
//! elsewhere are by id only, never by position.

use crate::config::FetchConfig;
use crate::types::{About, Experience, Profile, Project, Publication};
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("content document has no locales")]
    Empty,
    #[error("locale {locale}: {message}")]
    Invalid { locale: String, message: String },
    #[error("locale {locale}: duplicate {kind} id {id:?}")]
    DuplicateId {
        locale: String,
        kind: &'static str,
        id: String,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown locale {0:?}")]
    UnknownLocale(String),
}

/// All content for one language.
#[derive(Debug, Clone, Deserialize)]
pub struct LocaleBundle {
    pub profile: Profile,
    #[serde(default)]
    pub about: About,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub publications: Vec<Publication>,
    /// The untyped subtree, used for `data-i18n` key paths.
    #[serde(skip)]
    pub raw: Value,
}

/// The parsed content document, keyed by locale code.
#[derive(Debug, Clone)]
pub struct ContentDocument {
    locales: BTreeMap<String, LocaleBundle>,
}

impl ContentDocument {
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    pub fn bundle(&self, locale: &str) -> Option<&LocaleBundle> {
        self.locales.get(locale)
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }
}

/// Load the content document from a file path or an `http(s)://` URL.
pub fn load(
    source: &str,
    fetch: &FetchConfig,
    default_locale: &str,
) -> Result<ContentDocument, LoadError> {
    let body = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_url(source, fetch)?
    } else {
        std::fs::read_to_string(Path::new(source))?
    };
    let document = parse(&body, default_locale)?;
    info!(
        "loaded content from {} ({} locales)",
        source,
        document.locales.len()
    );
    Ok(document)
}

/// Fetch with a fixed timeout, retrying transport errors only.
fn fetch_url(url: &str, fetch: &FetchConfig) -> Result<String, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(fetch.timeout_secs))
        .build()?;

    let mut attempt = 0;
    loop {
        match client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
        {
            Ok(resp) => {
                let status = resp.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                return Ok(resp.text()?);
            }
            Err(e) if attempt < fetch.retries => {
                attempt += 1;
                warn!("fetching {url} failed ({e}), retry {attempt}/{}", fetch.retries);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Parse a content document and assign stable ids.
pub fn parse(json: &str, default_locale: &str) -> Result<ContentDocument, LoadError> {
    let root: Value = serde_json::from_str(json)?;
    let Value::Object(map) = root else {
        return Err(LoadError::Invalid {
            locale: default_locale.to_string(),
            message: "top level must be an object".into(),
        });
    };

    let raw_bundles: Vec<(String, Value)> = if map.contains_key("profile") {
        vec![(default_locale.to_string(), Value::Object(map))]
    } else {
        map.into_iter().collect()
    };
    if raw_bundles.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut locales = BTreeMap::new();
    for (locale, raw) in raw_bundles {
        let mut bundle =
            LocaleBundle::deserialize(&raw).map_err(|e| LoadError::Invalid {
                locale: locale.clone(),
                message: e.to_string(),
            })?;
        assign_ids(&locale, "project", &mut bundle.projects, |p| &mut p.id)?;
        assign_ids(&locale, "pub", &mut bundle.publications, |p| &mut p.id)?;
        bundle.raw = raw;
        locales.insert(locale, bundle);
    }
    Ok(ContentDocument { locales })
}

/// Keep explicit ids, synthesize `{prefix}-{index}` for the rest.
///
/// Synthetic ids never shadow an explicit one: on collision a numeric suffix
/// is appended.
fn assign_ids<T>(
    locale: &str,
    prefix: &'static str,
    items: &mut [T],
    id: impl Fn(&mut T) -> &mut String,
) -> Result<(), LoadError> {
    let kind = if prefix == "pub" { "publication" } else { "project" };
    let mut taken = HashSet::new();
    for item in items.iter_mut() {
        let explicit = id(item).trim().to_string();
        if explicit.is_empty() {
            continue;
        }
        if !taken.insert(explicit.clone()) {
            return Err(LoadError::DuplicateId {
                locale: locale.to_string(),
                kind,
                id: explicit,
            });
        }
        *id(item) = explicit;
    }

    for (index, item) in items.iter_mut().enumerate() {
        let slot = id(item);
        if !slot.is_empty() {
            continue;
        }
        let mut candidate = format!("{prefix}-{index}");
        let mut suffix = 1;
        while taken.contains(&candidate) {
            candidate = format!("{prefix}-{index}-{suffix}");
            suffix += 1;
        }
        taken.insert(candidate.clone());
        *slot = candidate;
    }
    Ok(())
}

/// The loaded document plus the active locale.
#[derive(Debug, Clone)]
pub struct Store {
    document: ContentDocument,
    locale: String,
}

impl Store {
    /// Create a store with `locale` active. The locale must exist.
    pub fn new(document: ContentDocument, locale: &str) -> Result<Self, StoreError> {
        if !document.contains(locale) {
            return Err(StoreError::UnknownLocale(locale.to_string()));
        }
        Ok(Self {
            document,
            locale: locale.to_string(),
        })
    }

    /// Switch the active locale. On error the selection is unchanged.
    pub fn select(&mut self, locale: &str) -> Result<(), StoreError> {
        if !self.document.contains(locale) {
            return Err(StoreError::UnknownLocale(locale.to_string()));
        }
        self.locale = locale.to_string();
        Ok(())
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn document(&self) -> &ContentDocument {
        &self.document
    }

    /// The active locale's bundle.
    pub fn bundle(&self) -> &LocaleBundle {
        // `new` and `select` only ever store locales present in the document
        &self.document.locales[&self.locale]
    }

    pub fn projects(&self) -> &[Project] {
        &self.bundle().projects
    }

    pub fn publications(&self) -> &[Publication] {
        &self.bundle().publications
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects().iter().find(|p| p.id == id)
    }

    pub fn publication(&self, id: &str) -> Option<&Publication> {
        self.publications().iter().find(|p| p.id == id)
    }

    /// The locale after the active one, wrapping around. With `en` and `pt`
    /// this toggles between the two.
    pub fn next_locale(&self) -> &str {
        let locales: Vec<&str> = self.document.locales().collect();
        let pos = locales.iter().position(|l| *l == self.locale).unwrap_or(0);
        locales[(pos + 1) % locales.len()]
    }
}
