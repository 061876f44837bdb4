//! Localization helpers: locale detection, `data-i18n` key paths, and the
//! built-in UI strings the renderers need.

use serde_json::Value;

/// Pick the initial locale from a browser language tag (`pt-BR`, `en-US`, ...).
pub fn detect_locale(language_tag: Option<&str>) -> &'static str {
    match language_tag {
        Some(tag) if tag.trim().to_lowercase().starts_with("pt") => "pt",
        _ => "en",
    }
}

/// Resolve a dotted key path (`ui.nav.about`, `about.skills.0`) into a locale
/// bundle.
///
/// Returns `None` for missing keys, empty strings, and non-scalar values so
/// callers leave the existing text in place.
pub fn resolve(root: &Value, path: &str) -> Option<String> {
    let mut node = root;
    for key in path.split('.') {
        node = match node {
            Value::Object(map) => map.get(key)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    match node {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Label of the language switch: active code first, then the others.
pub fn switch_label<'a>(active: &str, locales: impl IntoIterator<Item = &'a str>) -> String {
    let mut parts = vec![active.to_uppercase()];
    parts.extend(
        locales
            .into_iter()
            .filter(|l| *l != active)
            .map(str::to_uppercase),
    );
    parts.join(" / ")
}

/// Fixed UI strings that are not part of the content document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub greeting: &'static str,
    pub cta_contact: &'static str,
    pub cta_work: &'static str,
    pub view_project: &'static str,
    pub read_more: &'static str,
    pub no_images: &'static str,
    pub sending: &'static str,
    pub sent: &'static str,
    pub send_failed: &'static str,
    pub load_failed: &'static str,
}

const EN: Labels = Labels {
    greeting: "Hi, I am",
    cta_contact: "Let's Talk",
    cta_work: "Check Work",
    view_project: "View Project",
    read_more: "Read More",
    no_images: "No Images Available",
    sending: "Sending...",
    sent: "Success!",
    send_failed: "Error. Try again.",
    load_failed: "Could not load the page content",
};

const PT: Labels = Labels {
    greeting: "Olá, eu sou",
    cta_contact: "Vamos Conversar",
    cta_work: "Ver Projetos",
    view_project: "Ver Projeto",
    read_more: "Ler Mais",
    no_images: "Sem Imagens Disponíveis",
    sending: "Enviando...",
    sent: "Enviado!",
    send_failed: "Erro. Tente novamente.",
    load_failed: "Não foi possível carregar o conteúdo da página",
};

impl Labels {
    /// Portuguese has its own table; everything else falls back to English.
    pub fn for_locale(locale: &str) -> &'static Labels {
        if locale.to_lowercase().starts_with("pt") {
            &PT
        } else {
            &EN
        }
    }
}
