//! Headless page runtime.
//!
//! [`App`] owns everything the live page would otherwise keep in globals:
//! the content store and active locale, the painted page, the modal engine,
//! the mobile menu, scroll-reveal state, and the contact form. It is built
//! once by [`App::boot`] and driven from outside:
//!
//! - [`App::click`] for every click, as a composed path
//! - [`App::tick`] to run timers that are due on the injected clock
//! - [`App::on_intersections`] for viewport changes
//! - [`App::submit_contact`] for the contact form
//!
//! [`App::render`] produces the current document at any point.

use crate::chrome::{ContactForm, FormTransport, Intersection, MobileNav, ScrollReveal, SubmitOutcome};
use crate::clock::Clock;
use crate::config::SiteConfig;
use crate::content::{ContentDocument, Store, StoreError};
use crate::i18n::Labels;
use crate::modal::{ModalEngine, ModalTimings};
use crate::page::{Page, Section, Skeleton};
use crate::prefs::{self, LOCALE_KEY, PreferenceStore, PrefsError};
use crate::render::{self, DocumentState, FormView, ModalView};
use crate::router::{self, Click, Dispatch, Element, Environment};
use crate::types::LinkKind;
use log::{debug, info, warn};
use maud::Markup;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Sections that start hidden and fade in on scroll.
const REVEALED: [&str; 5] = ["about", "experience", "projects", "publications", "contact"];

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Preference error: {0}")]
    Prefs(#[from] PrefsError),
    #[error("Invalid site URL: {0}")]
    Url(#[from] url::ParseError),
}

pub struct App<C: Clock + Clone, P: PreferenceStore> {
    store: Store,
    page: Page,
    clock: C,
    modal: ModalEngine<C>,
    nav: MobileNav,
    reveal: ScrollReveal,
    form: ContactForm,
    env: Environment,
    prefs: P,
    pdf_embed_url: String,
    status_display: Duration,
}

impl<C: Clock + Clone, P: PreferenceStore> App<C, P> {
    /// Start the page: pick the locale (stored preference, then browser
    /// language), paint every section, and arm scroll-reveal.
    pub fn boot(
        document: ContentDocument,
        config: &SiteConfig,
        clock: C,
        mut prefs: P,
        browser_language: Option<&str>,
    ) -> Result<Self, AppError> {
        let locale = prefs::initial_locale(&mut prefs, &document, browser_language)?;
        let store = Store::new(document, &locale)?;
        let env = Environment::new(&config.viewer.user_agent, &config.site_url)?;
        let skeleton = Skeleton::portfolio();
        let reveal = ScrollReveal::observe(REVEALED);

        let mut app = Self {
            store,
            page: Page::new(skeleton),
            modal: ModalEngine::new(clock.clone(), ModalTimings::from(&config.modal)),
            clock,
            nav: MobileNav::default(),
            reveal,
            form: ContactForm::default(),
            env,
            prefs,
            pdf_embed_url: config.viewer.pdf_embed_url.clone(),
            status_display: Duration::from_millis(config.contact.status_display_ms),
        };
        app.repaint();
        info!("page booted in locale {locale}");
        Ok(app)
    }

    fn repaint(&mut self) {
        self.page.paint(&self.store);
        self.form.set_action(self.page.form_action());
        // rendered card grids are shown straight away
        for section in [Section::Projects, Section::Publications] {
            if self.page.skeleton().has(section) {
                self.reveal.reveal(section.id());
            }
        }
    }

    /// Handle one click. Menu, modal controls, and the language switch are
    /// handled here; everything else goes through the router.
    pub fn click(&mut self, click: &Click) -> Dispatch {
        if self.nav.on_click(click) {
            return Dispatch::Ignore;
        }

        let on_backdrop = click.target().is_some_and(|t| t.is("modal-overlay"));
        if on_backdrop || click.passes_through_id("close-modal-btn") {
            self.modal.close();
            return Dispatch::Ignore;
        }
        if click.passes_through_class("prev-btn") {
            self.modal.advance(-1);
            return Dispatch::Ignore;
        }
        if click.passes_through_class("next-btn") {
            self.modal.advance(1);
            return Dispatch::Ignore;
        }
        if click.passes_through_id("lang-switch") {
            if let Err(e) = self.toggle_locale() {
                warn!("locale switch failed: {e}");
            }
            return Dispatch::Ignore;
        }

        let dispatch = router::route(click, &self.env, &self.store, &self.pdf_embed_url);
        match &dispatch {
            Dispatch::Modal { content, images } => self.modal.open(content.as_str(), images.clone()),
            Dispatch::NewTab { url } => info!("opening {url} in a new tab"),
            _ => {}
        }
        dispatch
    }

    /// Switch to the next locale, persist it, and repaint.
    pub fn toggle_locale(&mut self) -> Result<&str, AppError> {
        let next = self.store.next_locale().to_string();
        self.select_locale(&next)?;
        Ok(self.store.locale())
    }

    /// Switch the store and repaint. A preference that can't be written
    /// is logged; the page still follows the store.
    pub fn select_locale(&mut self, locale: &str) -> Result<(), AppError> {
        self.store.select(locale)?;
        self.repaint();
        if let Err(e) = self.prefs.set(LOCALE_KEY, locale) {
            warn!("could not persist locale {locale}: {e}");
        }
        debug!("locale switched to {locale}");
        Ok(())
    }

    /// Run whatever is due on the clock. Returns `true` if anything changed.
    pub fn tick(&mut self) -> bool {
        let before = self.modal.revision();
        self.modal.poll();
        let form_changed = self.form.poll(self.clock.now());
        form_changed || self.modal.revision() != before
    }

    /// Viewport observations; returns the sections revealed by them.
    pub fn on_intersections(&mut self, entries: &[Intersection]) -> Vec<String> {
        self.reveal.on_intersections(entries)
    }

    pub fn set_field(&mut self, name: &str, value: &str) {
        self.form.set_field(name, value);
    }

    pub fn submit_contact(&mut self, transport: &dyn FormTransport) -> SubmitOutcome {
        let labels = Labels::for_locale(self.store.locale());
        self.form
            .submit(transport, labels, self.clock.now(), self.status_display)
    }

    /// The document as it stands right now.
    pub fn render(&self) -> Markup {
        let modal = self.modal.is_visible().then(|| ModalView {
            body: self.modal.render(),
            opacity: self.modal.opacity(),
        });
        let state = DocumentState {
            hidden: self.reveal.hidden().clone(),
            nav_open: self.nav.is_open(),
            modal,
            form: FormView {
                button_label: self.form.button_label().map(str::to_string),
                disabled: self.form.is_disabled(),
                status: self.form.status().map(|s| (s.text.clone(), s.success)),
                fields: self.form.fields().to_vec(),
            },
            lang_href: None,
        };
        render::document(&self.page, &state)
    }

    pub fn locale(&self) -> &str {
        self.store.locale()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn modal(&self) -> &ModalEngine<C> {
        &self.modal
    }

    pub fn nav(&self) -> &MobileNav {
        &self.nav
    }

    pub fn reveal(&self) -> &ScrollReveal {
        &self.reveal
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }
}

// ============================================================================
// Preview commands
// ============================================================================

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(String),
    #[error("not a number of milliseconds: {0}")]
    Duration(String),
}

/// One line of the `preview` REPL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewCommand {
    Click(Click),
    Wait(Duration),
    Show,
    Quit,
}

impl FromStr for PreviewCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let arg = words.next();
        let need = |name: &str| arg.ok_or_else(|| CommandError::MissingArgument(name.to_string()));

        let click = match command {
            "show" => return Ok(PreviewCommand::Show),
            "quit" | "exit" => return Ok(PreviewCommand::Quit),
            "wait" => {
                let raw = need("wait")?;
                let ms = raw
                    .parse::<u64>()
                    .map_err(|_| CommandError::Duration(raw.to_string()))?;
                return Ok(PreviewCommand::Wait(Duration::from_millis(ms)));
            }
            "click" => {
                let kind = need("click")?;
                let target = words
                    .next()
                    .ok_or_else(|| CommandError::MissingArgument(format!("click {kind}")))?;
                click_on(kind, target)?
            }
            "next" => modal_button("next-btn"),
            "prev" => modal_button("prev-btn"),
            "close" => Click::on(Element::new("button").with_id("close-modal-btn"))
                .within(Element::new("div").with_class("modal-content"))
                .within(Element::new("div").with_id("modal-overlay")),
            "backdrop" => Click::on(Element::new("div").with_id("modal-overlay")),
            "locale" => Click::on(Element::new("button").with_id("lang-switch"))
                .within(Element::new("li"))
                .within(Element::new("ul").with_class("nav-links")),
            "menu" => Click::on(Element::new("div").with_class("line1"))
                .within(Element::new("div").with_class("hamburger")),
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(PreviewCommand::Click(click))
    }
}

fn click_on(kind: &str, target: &str) -> Result<Click, CommandError> {
    let link = |kind: LinkKind| Click::on(Element::anchor(target).with_attr("data-type", kind.as_str()));
    Ok(match kind {
        "project" => Click::on(Element::new("h3").with_class("project-title"))
            .within(Element::card(LinkKind::ProjectDetails, target)),
        "pub" => Click::on(Element::new("h3").with_class("pub-title"))
            .within(Element::card(LinkKind::PublicationDetails, target)),
        "pdf" => link(LinkKind::Pdf),
        "image" => link(LinkKind::Image),
        "link" => link(LinkKind::External),
        other => return Err(CommandError::Unknown(format!("click {other}"))),
    })
}

fn modal_button(class: &str) -> Click {
    Click::on(Element::new("button").with_class(class))
        .within(Element::new("div").with_class("carousel-container"))
        .within(Element::new("div").with_id("modal-body"))
        .within(Element::new("div").with_class("modal-content"))
        .within(Element::new("div").with_id("modal-overlay"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrome::TransportError;
    use crate::clock::ManualClock;
    use crate::modal::ModalPhase;
    use crate::prefs::MemoryPreferences;
    use crate::test_helpers::*;

    fn boot_with(prefs: MemoryPreferences, language: Option<&str>) -> (ManualClock, App<ManualClock, MemoryPreferences>) {
        let clock = ManualClock::new();
        let app = App::boot(
            sample_document(),
            &SiteConfig::default(),
            clock.clone(),
            prefs,
            language,
        )
        .unwrap();
        (clock, app)
    }

    fn booted() -> (ManualClock, App<ManualClock, MemoryPreferences>) {
        boot_with(MemoryPreferences::default(), Some("en-US"))
    }

    fn command(line: &str) -> Click {
        match line.parse::<PreviewCommand>().unwrap() {
            PreviewCommand::Click(click) => click,
            other => panic!("expected click for {line:?}, got {other:?}"),
        }
    }

    struct StatusTransport(u16);

    impl FormTransport for StatusTransport {
        fn post(&self, _: &str, _: &[(String, String)]) -> Result<u16, TransportError> {
            Ok(self.0)
        }
    }

    #[test]
    fn boot_detects_and_persists_locale() {
        let (_, app) = boot_with(MemoryPreferences::default(), Some("pt-BR"));
        assert_eq!(app.locale(), "pt");
        assert_eq!(app.prefs().get(LOCALE_KEY).as_deref(), Some("pt"));
        assert_eq!(app.page().text("ui.nav.about"), "Sobre");
    }

    #[test]
    fn boot_prefers_stored_locale() {
        let mut prefs = MemoryPreferences::default();
        prefs.set(LOCALE_KEY, "pt").unwrap();
        let (_, app) = boot_with(prefs, Some("en-US"));
        assert_eq!(app.locale(), "pt");
    }

    #[test]
    fn project_card_opens_carousel_that_auto_advances() {
        let (clock, mut app) = booted();
        let dispatch = app.click(&command("click project p1"));
        assert!(dispatch.prevents_default());
        assert!(app.modal().is_open());
        let carousel = app.modal().carousel().unwrap();
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.current(), "a.png");

        clock.advance_ms(4000);
        assert!(app.tick());
        assert_eq!(app.modal().carousel().unwrap().current(), "b.png");

        clock.advance_ms(4000);
        app.tick();
        assert_eq!(app.modal().carousel().unwrap().index(), 0);
    }

    #[test]
    fn modal_buttons_navigate_and_close() {
        let (clock, mut app) = booted();
        app.click(&command("click project p1"));

        app.click(&command("prev"));
        assert_eq!(app.modal().carousel().unwrap().index(), 1);
        app.click(&command("next"));
        assert_eq!(app.modal().carousel().unwrap().index(), 0);

        app.click(&command("close"));
        assert!(matches!(app.modal().phase(), ModalPhase::Closing { .. }));
        assert!(!app.modal().timer_active());
        clock.advance_ms(300);
        app.tick();
        assert_eq!(app.modal().phase(), ModalPhase::Closed);
        assert_eq!(app.modal().content(), "");
    }

    #[test]
    fn backdrop_click_closes_but_inner_click_does_not() {
        let (_, mut app) = booted();
        app.click(&command("click pub thesis"));

        let inner = Click::on(Element::new("h2"))
            .within(Element::new("div").with_class("modal-project-info"))
            .within(Element::new("div").with_id("modal-body"))
            .within(Element::new("div").with_class("modal-content"))
            .within(Element::new("div").with_id("modal-overlay"));
        app.click(&inner);
        assert!(app.modal().is_open());

        app.click(&command("backdrop"));
        assert!(!app.modal().is_open());
    }

    #[test]
    fn nested_github_link_does_not_open_modal() {
        let (_, mut app) = booted();
        let click = Click::on(
            Element::anchor("https://x")
                .with_class("icon-link")
                .with_attr("data-type", "external"),
        )
        .within(Element::new("div").with_class("project-external-links"))
        .within(Element::new("div").with_class("project-header"))
        .within(Element::card(LinkKind::ProjectDetails, "p1"));

        assert_eq!(app.click(&click), Dispatch::Navigate);
        assert!(!app.modal().is_visible());
    }

    #[test]
    fn locale_toggle_repaints_and_persists() {
        let (_, mut app) = booted();
        assert_eq!(app.page().text("ui.sections.projects"), "Things I've Built");

        app.click(&command("locale"));
        assert_eq!(app.locale(), "pt");
        assert_eq!(app.prefs().get(LOCALE_KEY).as_deref(), Some("pt"));
        assert_eq!(app.page().text("ui.sections.projects"), "Coisas Que Construí");
        assert_eq!(app.page().text("ui.contact.submit"), "Enviar Mensagem");

        let html = app.render().into_string();
        assert!(html.contains(r#"<html lang="pt">"#));
        assert!(html.contains("Ver Projeto"));
        assert!(!html.contains("View Project"));

        app.toggle_locale().unwrap();
        assert_eq!(app.locale(), "en");
    }

    #[test]
    fn detail_after_toggle_uses_new_locale() {
        let (_, mut app) = booted();
        app.click(&command("locale"));
        app.click(&command("click project p1"));
        assert!(app.modal().content().contains("Pipeline de Telemetria"));
    }

    /// Remembers English and refuses every write.
    struct ReadOnlyPrefs;

    impl PreferenceStore for ReadOnlyPrefs {
        fn get(&self, _: &str) -> Option<String> {
            Some("en".to_string())
        }

        fn set(&mut self, _: &str, _: &str) -> Result<(), PrefsError> {
            Err(PrefsError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn toggle_repaints_when_preference_write_fails() {
        let mut app = App::boot(
            sample_document(),
            &SiteConfig::default(),
            ManualClock::new(),
            ReadOnlyPrefs,
            None,
        )
        .unwrap();

        assert_eq!(app.toggle_locale().unwrap(), "pt");
        assert_eq!(app.page().lang(), "pt");
        assert_eq!(app.page().text("ui.nav.about"), "Sobre");

        app.click(&command("click project p1"));
        assert!(app.modal().content().contains("Pipeline de Telemetria"));
    }

    #[test]
    fn unknown_project_is_noop() {
        let (_, mut app) = booted();
        let dispatch = app.click(&command("click project ghost"));
        assert!(matches!(dispatch, Dispatch::Unresolved { .. }));
        assert!(!app.modal().is_visible());
    }

    #[test]
    fn image_link_opens_viewer() {
        let (_, mut app) = booted();
        app.click(&command("click image assets/poster.png"));
        assert!(app.modal().content().contains("image-scroll-container"));
        assert!(app.modal().carousel().is_none());
        assert!(!app.modal().timer_active());
    }

    #[test]
    fn menu_toggle_and_outside_close() {
        let (_, mut app) = booted();
        app.click(&command("menu"));
        assert!(app.nav().is_open());
        assert!(app.render().into_string().contains("nav-active"));

        app.click(&Click::on(Element::new("p")).within(Element::new("main")));
        assert!(!app.nav().is_open());
    }

    #[test]
    fn sections_reveal_on_scroll() {
        let (_, mut app) = booted();
        assert!(app.reveal().is_hidden("about"));
        assert!(!app.reveal().is_hidden("projects"));

        let shown = app.on_intersections(&[Intersection {
            target: "about".into(),
            is_intersecting: true,
        }]);
        assert_eq!(shown, vec!["about".to_string()]);
        let html = app.render().into_string();
        assert!(html.contains(r#"<section id="about" class="show">"#));
        assert!(html.contains(r#"<section id="experience" class="hidden">"#));
    }

    #[test]
    fn contact_submit_shows_status_then_clears() {
        let (clock, mut app) = booted();
        app.set_field("name", "Rui");
        let outcome = app.submit_contact(&StatusTransport(500));
        assert_eq!(outcome, SubmitOutcome::Failed("HTTP 500".into()));
        assert_eq!(app.form().field("name"), Some("Rui"));
        assert!(app.render().into_string().contains("Error. Try again."));

        clock.advance_ms(5000);
        assert!(app.tick());
        assert!(app.form().status().is_none());
    }

    #[test]
    fn contact_form_posts_to_profile_action() {
        let (_, app) = booted();
        assert_eq!(app.form().action(), Some("https://formspree.io/f/example"));
    }

    #[test]
    fn parse_preview_commands() {
        assert_eq!("show".parse::<PreviewCommand>(), Ok(PreviewCommand::Show));
        assert_eq!("quit".parse::<PreviewCommand>(), Ok(PreviewCommand::Quit));
        assert_eq!(
            "wait 250".parse::<PreviewCommand>(),
            Ok(PreviewCommand::Wait(Duration::from_millis(250)))
        );
        assert_eq!(
            "wait soon".parse::<PreviewCommand>(),
            Err(CommandError::Duration("soon".into()))
        );
        assert_eq!(
            "click".parse::<PreviewCommand>(),
            Err(CommandError::MissingArgument("click".into()))
        );
        assert_eq!(
            "dance".parse::<PreviewCommand>(),
            Err(CommandError::Unknown("dance".into()))
        );
        assert!(matches!(
            "click video x".parse::<PreviewCommand>(),
            Err(CommandError::Unknown(_))
        ));
    }
}
