//! # Folio
//!
//! A bilingual single-page portfolio: profile, about, experience, projects,
//! and publications, all read from one JSON content document.
//!
//! # Architecture: Two Ways to Run the Page
//!
//! ```text
//! content.json ──▶ content::Store ──▶ page::Page ──▶ render::document ──▶ dist/index.html, dist/pt.html
//!                                          │
//!                                          └──▶ app::App  (clicks, timers, locale, contact form)
//! ```
//!
//! - **Static generation** ([`generate`]) paints every section once per
//!   locale and writes plain HTML.
//! - **Headless runtime** ([`app`]) keeps the interactive state the live page
//!   has: the modal and its carousel, the click router, the mobile menu,
//!   scroll-reveal, and the contact form. It is driven by explicit events and
//!   an injected [`clock::Clock`], which is what the `preview` command and the
//!   test suite use.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Content entities (`Profile`, `Project`, `Publication`, ...) and the closed `LinkKind` enum |
//! | [`content`] | Loads the document from a file or URL, assigns ids, tracks the active locale |
//! | [`i18n`] | Language detection, dotted key paths, built-in UI labels |
//! | [`prefs`] | The persisted locale preference |
//! | [`render`] | Maud renderers for every card, detail body, viewer, and the full document |
//! | [`page`] | The markup skeleton (sections and `data-i18n` slots) and its painted state |
//! | [`clock`] | Time source for the runtime: system or manual |
//! | [`modal`] | Modal lifecycle and the auto-advancing carousel |
//! | [`router`] | Click classification and dispatch |
//! | [`chrome`] | Scroll reveal, mobile menu, contact form |
//! | [`app`] | The application-state object wiring the runtime together |
//! | [`generate`] | Static output: one page per locale plus assets |
//! | [`config`] | `folio.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Ids Over Positions
//!
//! Every project and publication gets an id when the document is loaded;
//! cards carry it in `data-id` and lookups never fall back to list position.
//! A detail card for an entity the active locale doesn't have opens nothing.
//!
//! ## One Timer, Owned
//!
//! The carousel's auto-advance is an `Option` inside the modal engine rather
//! than a handle floating around the page, so at most one exists and closing
//! the modal drops it.

pub mod app;
pub mod chrome;
pub mod clock;
pub mod config;
pub mod content;
pub mod generate;
pub mod i18n;
pub mod modal;
pub mod output;
pub mod page;
pub mod prefs;
pub mod render;
pub mod router;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
