//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what an entity *is* (title and id) rather than where it
//! came from. Each entity gets a header line with a positional index, and
//! anything secondary goes on indented context lines below it.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! en (default)
//!     Profile: Ana Souza, Software Engineer
//!     Projects
//!     001 Telemetry Pipeline [p1] (2 images)
//!         GitHub: https://x
//!     Publications
//!     001 Consensus Under Partial Synchrony [thesis] (1 image)
//!         pdf: assets/thesis.pdf
//!
//! 2 locales, 4 projects, 6 publications
//! ```
//!
//! ## Build
//!
//! ```text
//! en → index.html
//! pt → pt.html
//! Copied 3 assets
//! Generated 2 pages in dist
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::app::App;
use crate::chrome::SubmitOutcome;
use crate::clock::Clock;
use crate::content::{ContentDocument, LocaleBundle};
use crate::generate::GenerateSummary;
use crate::modal::ModalPhase;
use crate::prefs::PreferenceStore;
use crate::router::Dispatch;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Entity header: index, title, id, and image count when there are images.
///
/// ```text
/// 001 Telemetry Pipeline [p1] (2 images)
/// 002 Recipe Planner [project-1]
/// ```
fn entity_header(index: usize, title: &str, id: &str, images: usize) -> String {
    let mut line = format!("{} {} [{}]", format_index(index), title, id);
    if images > 0 {
        line.push_str(&format!(" ({})", plural(images, "image", "images")));
    }
    line
}

fn format_bundle(lines: &mut Vec<String>, bundle: &LocaleBundle) {
    let profile = &bundle.profile;
    lines.push(format!("{}Profile: {}, {}", indent(1), profile.name, profile.role));

    if !bundle.projects.is_empty() {
        lines.push(format!("{}Projects", indent(1)));
        for (i, project) in bundle.projects.iter().enumerate() {
            lines.push(format!(
                "{}{}",
                indent(1),
                entity_header(i + 1, &project.title, &project.id, project.images.len())
            ));
            for link in &project.links {
                lines.push(format!("{}{}: {}", indent(2), link.label, link.url));
            }
        }
    }

    if !bundle.publications.is_empty() {
        lines.push(format!("{}Publications", indent(1)));
        for (i, publication) in bundle.publications.iter().enumerate() {
            lines.push(format!(
                "{}{}",
                indent(1),
                entity_header(i + 1, &publication.title, &publication.id, publication.images.len())
            ));
            if let Some(link) = &publication.link {
                lines.push(format!("{}{}: {}", indent(2), link.kind, link.url));
            }
        }
    }
}

// ============================================================================
// check
// ============================================================================

/// Content inventory: every locale with its projects and publications.
pub fn format_check_output(document: &ContentDocument, default_locale: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let (mut projects, mut publications, mut locales) = (0, 0, 0);

    for locale in document.locales() {
        let Some(bundle) = document.bundle(locale) else {
            continue;
        };
        if locales > 0 {
            lines.push(String::new());
        }
        if locale == default_locale {
            lines.push(format!("{locale} (default)"));
        } else {
            lines.push(locale.to_string());
        }
        format_bundle(&mut lines, bundle);
        locales += 1;
        projects += bundle.projects.len();
        publications += bundle.publications.len();
    }

    lines.push(String::new());
    lines.push(format!(
        "{}, {}, {}",
        plural(locales, "locale", "locales"),
        plural(projects, "project", "projects"),
        plural(publications, "publication", "publications"),
    ));
    lines
}

pub fn print_check_output(document: &ContentDocument, default_locale: &str) {
    for line in format_check_output(document, default_locale) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

pub fn format_generate_output(summary: &GenerateSummary) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .pages
        .iter()
        .map(|page| format!("{} → {}", page.locale, page.path.display()))
        .collect();
    if summary.assets_copied > 0 {
        lines.push(format!(
            "Copied {}",
            plural(summary.assets_copied, "asset", "assets")
        ));
    }
    lines.push(format!(
        "Generated {} in {}",
        plural(summary.pages.len(), "page", "pages"),
        summary.output_dir.display()
    ));
    lines
}

pub fn print_generate_output(summary: &GenerateSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}

/// Content that failed to load: the source, the cause, and where the error
/// page went (build only).
pub fn format_load_error(source: &str, error: &dyn std::error::Error, notice: Option<&Path>) -> Vec<String> {
    let mut lines = vec![format!("Could not load {source}"), format!("{}{error}", indent(1))];
    if let Some(path) = notice {
        lines.push(format!("{}Error notice written to {}", indent(1), path.display()));
    }
    lines
}

// ============================================================================
// detail / locale / contact
// ============================================================================

/// Unknown detail id: what was asked for and what exists in the locale.
pub fn format_detail_not_found(document: &ContentDocument, locale: &str, id: &str) -> Vec<String> {
    let mut lines = vec![format!("No project or publication with id {id:?} in locale {locale}")];
    if let Some(bundle) = document.bundle(locale) {
        let ids: Vec<&str> = bundle
            .projects
            .iter()
            .map(|p| p.id.as_str())
            .chain(bundle.publications.iter().map(|p| p.id.as_str()))
            .collect();
        if !ids.is_empty() {
            lines.push(format!("{}Available: {}", indent(1), ids.join(", ")));
        }
    }
    lines
}

pub fn format_locale_output(document: &ContentDocument, active: &str) -> Vec<String> {
    document
        .locales()
        .map(|locale| {
            if locale == active {
                format!("* {locale}")
            } else {
                format!("  {locale}")
            }
        })
        .collect()
}

pub fn print_locale_output(document: &ContentDocument, active: &str) {
    for line in format_locale_output(document, active) {
        println!("{}", line);
    }
}

pub fn format_contact_outcome(outcome: &SubmitOutcome, status: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(text) = status {
        lines.push(text.to_string());
    }
    match outcome {
        SubmitOutcome::Sent => {}
        SubmitOutcome::Failed(reason) => lines.push(format!("{}{}", indent(1), reason)),
        SubmitOutcome::NoAction => lines.push("No contact form action configured".to_string()),
    }
    lines
}

// ============================================================================
// preview
// ============================================================================

/// What a click did, or `None` when it didn't reach anything routable.
pub fn format_dispatch(dispatch: &Dispatch) -> Option<String> {
    match dispatch {
        Dispatch::Ignore => None,
        Dispatch::Navigate => Some("navigate (default action)".to_string()),
        Dispatch::NewTab { url } => Some(format!("new tab: {url}")),
        Dispatch::Modal { images, .. } if images.is_empty() => Some("modal opened".to_string()),
        Dispatch::Modal { images, .. } => Some(format!(
            "modal opened ({})",
            plural(images.len(), "image", "images")
        )),
        Dispatch::Unresolved { kind, id } => Some(format!(
            "nothing to open: {kind} {}",
            id.as_deref().unwrap_or("(no id)")
        )),
    }
}

/// One-screen summary of the runtime state for the `show` command.
pub fn format_preview_state<C: Clock + Clone, P: PreferenceStore>(app: &App<C, P>) -> Vec<String> {
    let modal = app.modal();
    let mut lines = vec![format!("Locale: {}", app.locale())];

    let phase = match modal.phase() {
        ModalPhase::Closed => "closed".to_string(),
        ModalPhase::Open => "open".to_string(),
        ModalPhase::Closing { .. } => "closing".to_string(),
    };
    lines.push(format!("Modal: {phase}"));
    if modal.is_visible() {
        if let Some(carousel) = modal.carousel() {
            lines.push(format!(
                "{}Image {}/{}: {}",
                indent(1),
                carousel.index() + 1,
                carousel.len(),
                carousel.current()
            ));
        }
        lines.push(format!(
            "{}Auto-advance: {}",
            indent(1),
            if modal.timer_active() { "running" } else { "stopped" }
        ));
    }

    lines.push(format!(
        "Menu: {}",
        if app.nav().is_open() { "open" } else { "closed" }
    ));
    let hidden: Vec<&str> = app.reveal().hidden().iter().map(String::as_str).collect();
    if !hidden.is_empty() {
        lines.push(format!("Hidden sections: {}", hidden.join(", ")));
    }
    if let Some(status) = app.form().status() {
        lines.push(format!("Form status: {}", status.text));
    }
    lines
}

pub fn print_preview_state<C: Clock + Clone, P: PreferenceStore>(app: &App<C, P>) {
    for line in format_preview_state(app) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::generate::GeneratedPage;
    use crate::test_helpers::*;
    use std::path::PathBuf;

    #[test]
    fn load_error_names_source_and_notice() {
        let error = crate::content::parse("[", "en").unwrap_err();
        let lines = format_load_error("content.json", &error, Some(Path::new("dist/index.html")));
        assert_eq!(lines[0], "Could not load content.json");
        assert!(lines[1].starts_with("    JSON error"));
        assert_eq!(lines[2], "    Error notice written to dist/index.html");

        let lines = format_load_error("content.json", &error, None);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
    }

    #[test]
    fn entity_header_with_and_without_images() {
        assert_eq!(entity_header(1, "Telemetry", "p1", 2), "001 Telemetry [p1] (2 images)");
        assert_eq!(entity_header(3, "Poster", "poster", 1), "003 Poster [poster] (1 image)");
        assert_eq!(entity_header(2, "Recipes", "project-1", 0), "002 Recipes [project-1]");
    }

    #[test]
    fn check_lists_locales_and_entities() {
        let lines = format_check_output(&sample_document(), "en");
        assert_eq!(lines[0], "en (default)");
        assert_eq!(lines[1], "    Profile: Ana Souza, Software Engineer");
        assert_eq!(lines[2], "    Projects");
        assert_eq!(lines[3], "    001 Telemetry Pipeline [p1] (2 images)");
        assert_eq!(lines[4], "        GitHub: https://x");
        assert!(lines.contains(&"        pdf: assets/thesis.pdf".to_string()));
        assert!(lines.contains(&"        external: https://blog.example.com/async".to_string()));
        assert!(lines.contains(&"pt".to_string()));
        assert_eq!(lines.last().unwrap(), "2 locales, 4 projects, 6 publications");
    }

    #[test]
    fn generate_summary_lines() {
        let summary = GenerateSummary {
            output_dir: PathBuf::from("dist"),
            pages: vec![
                GeneratedPage {
                    locale: "en".into(),
                    path: PathBuf::from("index.html"),
                },
                GeneratedPage {
                    locale: "pt".into(),
                    path: PathBuf::from("pt.html"),
                },
            ],
            assets_copied: 1,
        };
        assert_eq!(
            format_generate_output(&summary),
            vec![
                "en → index.html",
                "pt → pt.html",
                "Copied 1 asset",
                "Generated 2 pages in dist",
            ]
        );
    }

    #[test]
    fn not_found_lists_available_ids() {
        let lines = format_detail_not_found(&sample_document(), "en", "ghost");
        assert_eq!(lines[0], "No project or publication with id \"ghost\" in locale en");
        assert!(lines[1].contains("p1, project-1, thesis, poster, pub-2"));
    }

    #[test]
    fn locale_output_marks_active() {
        assert_eq!(format_locale_output(&sample_document(), "pt"), vec!["  en", "* pt"]);
    }

    #[test]
    fn contact_outcome_lines() {
        assert_eq!(
            format_contact_outcome(&SubmitOutcome::Failed("HTTP 500".into()), Some("Error. Try again.")),
            vec!["Error. Try again.", "    HTTP 500"]
        );
        assert_eq!(format_contact_outcome(&SubmitOutcome::Sent, Some("Success!")), vec!["Success!"]);
    }

    #[test]
    fn dispatch_lines() {
        assert_eq!(format_dispatch(&Dispatch::Ignore), None);
        assert_eq!(
            format_dispatch(&Dispatch::Modal {
                content: String::new(),
                images: vec!["a.png".into(), "b.png".into()],
            })
            .as_deref(),
            Some("modal opened (2 images)")
        );
        assert_eq!(
            format_dispatch(&Dispatch::Unresolved {
                kind: crate::types::LinkKind::ProjectDetails,
                id: Some("ghost".into()),
            })
            .as_deref(),
            Some("nothing to open: project-details ghost")
        );
    }

    #[test]
    fn preview_state_reports_modal_and_sections() {
        use crate::clock::ManualClock;
        use crate::prefs::MemoryPreferences;
        use crate::router::{Click, Element};
        use crate::types::LinkKind;

        let mut app = App::boot(
            sample_document(),
            &SiteConfig::default(),
            ManualClock::new(),
            MemoryPreferences::default(),
            None,
        )
        .unwrap();
        let lines = format_preview_state(&app);
        assert_eq!(lines[0], "Locale: en");
        assert_eq!(lines[1], "Modal: closed");
        assert!(lines.contains(&"Hidden sections: about, contact, experience".to_string()));

        app.click(&Click::on(Element::card(LinkKind::ProjectDetails, "p1")));
        let lines = format_preview_state(&app);
        assert_eq!(lines[1], "Modal: open");
        assert_eq!(lines[2], "    Image 1/2: a.png");
        assert_eq!(lines[3], "    Auto-advance: running");
    }
}
