//! HTML rendering.
//!
//! Every renderer is a pure function from content to [`Markup`]. Callers
//! decide where the markup goes; nothing here touches page state.
//!
//! Titles, labels, and URLs are escaped by maud. Author prose (`desc`,
//! `longDesc`, bio paragraphs, achievements) goes through Markdown, so inline
//! HTML written into the content document still renders.

use crate::i18n::Labels;
use crate::modal::Carousel;
use crate::page::{Page, Section};
use crate::types::{About, Experience, LinkKind, Profile, Project, Publication, Social};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::collections::BTreeSet;

/// Characters of description shown on a project card.
const PREVIEW_CHARS: usize = 100;
/// Techs shown on a project card.
const CARD_TECHS: usize = 4;

// ============================================================================
// Text helpers
// ============================================================================

/// Render Markdown (with inline HTML passthrough) to markup.
pub fn markdown(text: &str) -> Markup {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(text));
    PreEscaped(out)
}

/// Markdown for a single line: the surrounding `<p>` is dropped so the result
/// can sit inside inline containers.
pub fn inline_markdown(text: &str) -> Markup {
    let rendered = markdown(text).into_string();
    let trimmed = rendered.trim_end();
    match trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => PreEscaped(inner.to_string()),
        _ => PreEscaped(rendered),
    }
}

/// Strip HTML tags from a string (simple angle-bracket stripping).
pub(crate) fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate to `max` characters (not bytes).
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Card preview: description as plain text, cut to [`PREVIEW_CHARS`], with a
/// trailing ellipsis.
pub fn preview_text(desc: &str) -> String {
    let plain = strip_html_tags(&markdown(desc).into_string());
    let plain = plain.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{}...", truncate_chars(&plain, PREVIEW_CHARS))
}

// ============================================================================
// Section renderers
// ============================================================================

/// Hero block: greeting, name, role, description, and the two CTAs.
pub fn hero(profile: &Profile, labels: &Labels) -> Markup {
    html! {
        p.greeting { (labels.greeting) }
        h1.glitch-text data-text=(profile.name) { (profile.name) }
        h2.subtitle { (profile.role) }
        p.description { (inline_markdown(&profile.description)) }
        div.cta-group {
            a.btn.btn-primary href="#contact" { (labels.cta_contact) }
            a.btn.btn-outline href="#projects" { (labels.cta_work) }
        }
    }
}

pub fn socials(social: &Social) -> Markup {
    html! {
        @for (label, url) in social.links() {
            a.social-link href=(url) target="_blank" rel="noopener" data-type="external" { (label) }
        }
    }
}

pub fn about(about: &About, avatar: &str) -> Markup {
    html! {
        div.about-text {
            @for paragraph in &about.bio {
                p { (inline_markdown(paragraph)) }
            }
            p { (about.skills_title) }
            ul.skills-list {
                @for skill in &about.skills {
                    li { (skill) }
                }
            }
        }
        div.about-image {
            div.img-wrapper {
                img src=(avatar) alt="Profile Picture";
            }
        }
    }
}

/// Project grid. Each card routes to its detail modal; the link icons inside
/// are ordinary external links.
pub fn project_cards(projects: &[Project], labels: &Labels) -> Markup {
    html! {
        @for project in projects {
            article.project-card data-type=(LinkKind::ProjectDetails.as_str()) data-id=(project.id) {
                div.project-header {
                    div.folder-icon { "📁" }
                    div.project-external-links {
                        @for link in &project.links {
                            a.icon-link href=(link.url) target="_blank" rel="noopener"
                                title=(link.label) data-type="external" { (link.icon()) }
                        }
                    }
                }
                h3.project-title { (project.title) }
                div.project-desc-preview { (preview_text(&project.desc)) }
                ul.project-tech-list-card {
                    @for tech in project.techs.iter().take(CARD_TECHS) {
                        li { (tech) }
                    }
                }
                div.project-footer {
                    span.view-details-btn { (labels.view_project) " " span.arrow { "→" } }
                }
            }
        }
    }
}

pub fn experience_timeline(experience: &[Experience]) -> Markup {
    html! {
        @for entry in experience {
            div.timeline-item {
                div.timeline-date { (entry.period) }
                div.timeline-content {
                    h4 { (entry.role) " " span.highlight { (entry.company) } }
                    p.timeline-desc { (inline_markdown(&entry.desc)) }
                    ul {
                        @for item in &entry.achievements {
                            li { (inline_markdown(item)) }
                        }
                    }
                }
            }
        }
    }
}

pub fn publication_cards(publications: &[Publication], labels: &Labels) -> Markup {
    html! {
        @for publication in publications {
            article.pub-card data-type=(LinkKind::PublicationDetails.as_str()) data-id=(publication.id) {
                div.pub-header {
                    div.pub-icon { (publication.icon) }
                    span.pub-tag { (publication.tag) }
                }
                h3.pub-title { (publication.title) }
                div.pub-desc { (inline_markdown(&publication.desc)) }
                div.pub-footer {
                    div.pub-links-wrapper {
                        @if let Some(link) = &publication.link {
                            a.highlight-link href=(link.url) target=(link.kind.target())
                                data-type=(link.kind.as_str()) { (link.text) }
                        }
                    }
                    span.advisor { (publication.footer) }
                    div.read-more { (labels.read_more) " " span.arrow { "→" } }
                }
            }
        }
    }
}

// ============================================================================
// Modal content
// ============================================================================

/// Detail body for a project. The carousel is rendered separately by the
/// modal; projects without images get a placeholder slide instead.
pub fn project_detail(project: &Project, labels: &Labels) -> Markup {
    html! {
        @if project.images.is_empty() {
            div.carousel-slide.fade.no-images { (labels.no_images) }
        }
        div.modal-project-info {
            h2 { (project.title) }
            div.modal-tech-list {
                @for tech in &project.techs {
                    span.modal-tech-tag { (tech) }
                }
            }
            div.modal-desc { (markdown(&project.desc)) }
            div.modal-actions {
                @for link in &project.links {
                    a.btn.btn-primary href=(link.url) target="_blank" rel="noopener"
                        data-type="external" { (link.label) }
                }
            }
        }
    }
}

pub fn publication_detail(publication: &Publication) -> Markup {
    html! {
        div.modal-project-info {
            div.modal-pub-header {
                span.modal-pub-icon { (publication.icon) }
                span.modal-tech-tag { (publication.tag) }
            }
            h2 { (publication.title) }
            div.modal-desc { (markdown(publication.detail_text())) }
            p.modal-pub-footer { (publication.footer) }
            div.modal-actions {
                @if let Some(link) = &publication.link {
                    a.btn.btn-primary href=(link.url) target=(link.kind.target())
                        data-type=(link.kind.as_str()) { (link.icon()) (link.text) }
                }
            }
        }
    }
}

/// Embedded document viewer (raw PDF or a third-party embed URL).
pub fn pdf_viewer(src: &str) -> Markup {
    html! {
        div.content-wrapper-full {
            iframe.pdf-viewer src=(src) title="Document Viewer" {}
        }
    }
}

pub fn image_viewer(src: &str) -> Markup {
    html! {
        div.content-wrapper-full {
            div.image-scroll-container {
                img.image-content src=(src) alt="Preview";
            }
        }
    }
}

/// Slides with only the current one displayed. Prev/next controls appear
/// when there is something to navigate to.
pub fn carousel(carousel: &Carousel) -> Markup {
    html! {
        div.carousel-container {
            @for (i, image) in carousel.images().iter().enumerate() {
                img.carousel-slide.fade src=(image) style=(slide_style(i == carousel.index()));
            }
            @if carousel.len() > 1 {
                button.prev-btn type="button" { (PreEscaped("&#10094;")) }
                button.next-btn type="button" { (PreEscaped("&#10095;")) }
            }
        }
    }
}

fn slide_style(active: bool) -> &'static str {
    if active { "display: block;" } else { "display: none;" }
}

/// Modal body: carousel (when there are images) followed by `content`, which
/// is trusted markup produced by the renderers above.
pub fn modal_body(carousel_state: Option<&Carousel>, content: &str) -> Markup {
    html! {
        @if let Some(c) = carousel_state {
            (carousel(c))
        }
        (PreEscaped(content))
    }
}

/// Shown instead of the page when the content document can't be loaded.
pub fn load_error_notice(labels: &Labels, detail: &str) -> Markup {
    html! {
        div.load-error role="alert" {
            h2 { (labels.load_failed) }
            p { code { (detail) } }
        }
    }
}

pub fn load_error_document(labels: &Labels, lang: &str, detail: &str) -> Markup {
    base_document(labels.load_failed, lang, load_error_notice(labels, detail))
}

// ============================================================================
// Full document
// ============================================================================

/// Runtime state layered onto the page when rendering a document.
#[derive(Debug, Default)]
pub struct DocumentState {
    /// Section ids still waiting for scroll-reveal.
    pub hidden: BTreeSet<String>,
    pub nav_open: bool,
    pub modal: Option<ModalView>,
    pub form: FormView,
    /// Target of the language switch; `None` renders a button.
    pub lang_href: Option<String>,
}

#[derive(Debug)]
pub struct ModalView {
    pub body: Markup,
    pub opacity: f32,
}

#[derive(Debug, Default)]
pub struct FormView {
    /// Overrides the localized submit label (e.g. while sending).
    pub button_label: Option<String>,
    pub disabled: bool,
    pub status: Option<(String, bool)>,
    pub fields: Vec<(String, String)>,
}

impl FormView {
    fn value(&self, name: &str) -> &str {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map_or("", |(_, v)| v.as_str())
    }
}

/// Renders the base HTML document structure
fn base_document(title: &str, lang: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body {
                (content)
            }
        }
    }
}

fn section_class(id: &str, state: &DocumentState) -> &'static str {
    if state.hidden.contains(id) { "hidden" } else { "show" }
}

fn slot_text(page: &Page, key: &str) -> Markup {
    html! { span data-i18n=(key) { (page.text(key)) } }
}

fn site_header(page: &Page, state: &DocumentState) -> Markup {
    let nav_items = [
        ("#about", "ui.nav.about"),
        ("#experience", "ui.nav.experience"),
        ("#projects", "ui.nav.projects"),
        ("#publications", "ui.nav.publications"),
        ("#contact", "ui.nav.contact"),
    ];
    html! {
        header.site-header {
            nav {
                div.logo { a href="#hero" { (page.title()) } }
                ul.nav-links.nav-active[state.nav_open] {
                    @for (href, key) in nav_items {
                        li { a href=(href) data-i18n=(key) { (page.text(key)) } }
                    }
                    li {
                        a.btn-resume href=(page.resume_href().unwrap_or("#")) target="_blank"
                            data-type="pdf" data-i18n="ui.resume" { (page.text("ui.resume")) }
                    }
                    li {
                        @match &state.lang_href {
                            Some(href) => {
                                a #lang-switch href=(href) { (page.lang_switch()) }
                            }
                            None => {
                                button #lang-switch type="button" { (page.lang_switch()) }
                            }
                        }
                    }
                }
                div.hamburger.toggle[state.nav_open] {
                    div.line1 {}
                    div.line2 {}
                    div.line3 {}
                }
            }
        }
    }
}

fn painted(page: &Page, section: Section) -> Markup {
    PreEscaped(page.section(section).unwrap_or_default().to_string())
}

fn contact_section(page: &Page, state: &DocumentState) -> Markup {
    let form = &state.form;
    let submit_label = form
        .button_label
        .clone()
        .unwrap_or_else(|| page.text("ui.contact.submit").to_string());
    html! {
        section #contact class=(section_class("contact", state)) {
            h2 { (slot_text(page, "ui.sections.contact")) }
            p data-i18n="ui.contact.text" { (page.text("ui.contact.text")) }
            form.contact-form action=[page.form_action()] method="POST" {
                input type="text" name="name" value=(form.value("name"))
                    data-i18n-placeholder="ui.contact.namePlaceholder"
                    placeholder=(page.text("ui.contact.namePlaceholder"));
                input type="email" name="email" value=(form.value("email"))
                    data-i18n-placeholder="ui.contact.emailPlaceholder"
                    placeholder=(page.text("ui.contact.emailPlaceholder"));
                textarea name="message"
                    data-i18n-placeholder="ui.contact.messagePlaceholder"
                    placeholder=(page.text("ui.contact.messagePlaceholder")) { (form.value("message")) }
                button.btn.btn-primary type="submit" disabled[form.disabled] { (submit_label) }
                @match &form.status {
                    Some((message, true)) => {
                        p #form-status class="success" { (message) }
                    }
                    Some((message, false)) => {
                        p #form-status class="error" { (message) }
                    }
                    None => {
                        p #form-status {}
                    }
                }
            }
        }
    }
}

fn modal_overlay(state: &DocumentState) -> Markup {
    match &state.modal {
        Some(modal) => html! {
            div #modal-overlay class="modal-overlay" style={ "display: flex; opacity: " (modal.opacity) ";" } {
                div.modal-content {
                    button #close-modal-btn class="close-modal" type="button" { "×" }
                    div #modal-body { (modal.body) }
                }
            }
        },
        None => html! {
            div #modal-overlay class="modal-overlay modal-hidden" style="display: none;" {
                div.modal-content {
                    button #close-modal-btn class="close-modal" type="button" { "×" }
                    div #modal-body {}
                }
            }
        },
    }
}

/// The whole page: header, every section in the skeleton, contact form, and
/// the modal overlay.
pub fn document(page: &Page, state: &DocumentState) -> Markup {
    let body_style = state
        .modal
        .as_ref()
        .filter(|m| m.opacity > 0.0)
        .map(|_| "overflow: hidden;");
    let has = |s: Section| page.skeleton().has(s);

    let content = html! {
        div.page style=[body_style] {
            (site_header(page, state))
            main {
                @if has(Section::Hero) {
                    section #hero {
                        div.hero-content { (painted(page, Section::Hero)) }
                        @if has(Section::Socials) {
                            div.socials { (painted(page, Section::Socials)) }
                        }
                    }
                }
                @if has(Section::About) {
                    section #about class=(section_class("about", state)) {
                        h2 { (slot_text(page, "ui.sections.about")) }
                        div.about-content { (painted(page, Section::About)) }
                    }
                }
                @if has(Section::Experience) {
                    section #experience class=(section_class("experience", state)) {
                        h2 { (slot_text(page, "ui.sections.experience")) }
                        div.timeline { (painted(page, Section::Experience)) }
                    }
                }
                @if has(Section::Projects) {
                    section #projects class=(section_class("projects", state)) {
                        h2 { (slot_text(page, "ui.sections.projects")) }
                        div.projects-grid { (painted(page, Section::Projects)) }
                    }
                }
                @if has(Section::Publications) {
                    section #publications class=(section_class("publications", state)) {
                        h2 { (slot_text(page, "ui.sections.publications")) }
                        div.publications-grid { (painted(page, Section::Publications)) }
                    }
                }
                (contact_section(page, state))
            }
            (modal_overlay(state))
        }
    };

    base_document(page.title(), page.lang(), content)
}
