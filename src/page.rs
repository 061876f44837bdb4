//! Page skeleton and painted page state.
//!
//! The [`Skeleton`] is the static markup contract: which templated section
//! containers exist and which elements carry `data-i18n` /
//! `data-i18n-placeholder` keys. A [`Page`] is that skeleton with content
//! painted into it for one locale.

use crate::content::Store;
use crate::i18n::{self, Labels};
use crate::render;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Templated section containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Hero,
    Socials,
    About,
    Experience,
    Projects,
    Publications,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Hero,
        Section::Socials,
        Section::About,
        Section::Experience,
        Section::Projects,
        Section::Publications,
    ];

    /// Element id of the enclosing `<section>`.
    pub fn id(self) -> &'static str {
        match self {
            Section::Hero | Section::Socials => "hero",
            Section::About => "about",
            Section::Experience => "experience",
            Section::Projects => "projects",
            Section::Publications => "publications",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTarget {
    /// Element text (`data-i18n`).
    Text,
    /// Input placeholder (`data-i18n-placeholder`).
    Placeholder,
}

/// A localized element: key path into the locale bundle, plus the text the
/// static markup ships with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nSlot {
    pub key: &'static str,
    pub target: SlotTarget,
    pub initial: &'static str,
}

const fn text(key: &'static str, initial: &'static str) -> I18nSlot {
    I18nSlot {
        key,
        target: SlotTarget::Text,
        initial,
    }
}

const fn placeholder(key: &'static str, initial: &'static str) -> I18nSlot {
    I18nSlot {
        key,
        target: SlotTarget::Placeholder,
        initial,
    }
}

const PORTFOLIO_SLOTS: [I18nSlot; 16] = [
    text("ui.nav.about", "About"),
    text("ui.nav.experience", "Experience"),
    text("ui.nav.projects", "Projects"),
    text("ui.nav.publications", "Publications"),
    text("ui.nav.contact", "Contact"),
    text("ui.resume", "Resume"),
    text("ui.sections.about", "About"),
    text("ui.sections.experience", "Experience"),
    text("ui.sections.projects", "Projects"),
    text("ui.sections.publications", "Publications"),
    text("ui.sections.contact", "Contact"),
    text("ui.contact.text", ""),
    placeholder("ui.contact.namePlaceholder", "Name"),
    placeholder("ui.contact.emailPlaceholder", "Email"),
    placeholder("ui.contact.messagePlaceholder", "Message"),
    text("ui.contact.submit", "Send"),
];

#[derive(Debug, Clone)]
pub struct Skeleton {
    sections: BTreeSet<Section>,
    slots: Vec<I18nSlot>,
}

impl Skeleton {
    /// Every section and slot of the portfolio page.
    pub fn portfolio() -> Self {
        Self {
            sections: Section::ALL.into_iter().collect(),
            slots: PORTFOLIO_SLOTS.to_vec(),
        }
    }

    /// The portfolio page without some sections.
    pub fn without(mut self, sections: &[Section]) -> Self {
        for section in sections {
            self.sections.remove(section);
        }
        self
    }

    pub fn has(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }

    pub fn slots(&self) -> &[I18nSlot] {
        &self.slots
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::portfolio()
    }
}

/// Skeleton plus painted content.
#[derive(Debug, Clone)]
pub struct Page {
    skeleton: Skeleton,
    lang: String,
    title: String,
    lang_switch: String,
    sections: BTreeMap<Section, String>,
    slot_values: BTreeMap<&'static str, String>,
    resume_href: Option<String>,
    form_action: Option<String>,
}

impl Page {
    /// An unpainted page: slots hold their initial text, sections are empty.
    pub fn new(skeleton: Skeleton) -> Self {
        let slot_values = skeleton
            .slots
            .iter()
            .map(|slot| (slot.key, slot.initial.to_string()))
            .collect();
        Self {
            skeleton,
            lang: String::new(),
            title: String::new(),
            lang_switch: String::new(),
            sections: BTreeMap::new(),
            slot_values,
            resume_href: None,
            form_action: None,
        }
    }

    /// Re-render every section the skeleton has from the active locale, then
    /// localize the slots. Sections missing from the skeleton are skipped.
    pub fn paint(&mut self, store: &Store) {
        let bundle = store.bundle();
        let labels = Labels::for_locale(store.locale());

        for section in Section::ALL {
            if !self.skeleton.has(section) {
                continue;
            }
            let markup = match section {
                Section::Hero => render::hero(&bundle.profile, labels),
                Section::Socials => match &bundle.profile.social {
                    Some(social) => render::socials(social),
                    None => {
                        self.sections.remove(&section);
                        continue;
                    }
                },
                Section::About => render::about(&bundle.about, &bundle.profile.avatar),
                Section::Experience => render::experience_timeline(&bundle.experience),
                Section::Projects => render::project_cards(&bundle.projects, labels),
                Section::Publications => render::publication_cards(&bundle.publications, labels),
            };
            self.sections.insert(section, markup.into_string());
        }

        self.resume_href = bundle.profile.resume_link.clone();
        self.form_action = bundle.profile.contact_action.clone();
        self.lang = store.locale().to_string();
        self.title = bundle.profile.name.clone();
        self.lang_switch = i18n::switch_label(store.locale(), store.document().locales());
        self.localize(&bundle.raw);
    }

    /// Apply `data-i18n` slots from a locale bundle. Keys that don't resolve
    /// keep their current text.
    pub fn localize(&mut self, bundle: &Value) {
        for slot in &self.skeleton.slots {
            if let Some(value) = i18n::resolve(bundle, slot.key) {
                self.slot_values.insert(slot.key, value);
            }
        }
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn section(&self, section: Section) -> Option<&str> {
        self.sections.get(&section).map(String::as_str)
    }

    /// Current text of a slot; empty for keys the skeleton doesn't have.
    pub fn text(&self, key: &str) -> &str {
        self.slot_values.get(key).map_or("", String::as_str)
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lang_switch(&self) -> &str {
        &self.lang_switch
    }

    pub fn resume_href(&self) -> Option<&str> {
        self.resume_href.as_deref()
    }

    pub fn form_action(&self) -> Option<&str> {
        self.form_action.as_deref()
    }
}
