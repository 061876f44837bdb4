//! Click router.
//!
//! One delegated handler for every click on the page. A click is described by
//! its composed path (target first, then ancestors), so cards that were
//! re-rendered after a locale switch need no re-binding.
//!
//! The nearest *routable* element decides: an anchor, or any element with a
//! `data-type` (project and publication cards). Its kind picks the route:
//!
//! | kind                  | result                                              |
//! |-----------------------|-----------------------------------------------------|
//! | `external` / none     | default navigation                                  |
//! | `pdf`                 | new tab, third-party embed, or inline frame (below) |
//! | `image`               | image viewer in the modal                           |
//! | `project-details`     | project detail modal                                |
//! | `publication-details` | publication detail modal                            |
//!
//! PDFs: an embedded viewer can't reach a non-public host, so mobile clients
//! on such hosts get a new tab; mobile clients on public hosts get the
//! third-party embed; everyone else gets the raw PDF in a frame.
//!
//! Because the nearest routable element wins, a click on a link nested inside
//! a card routes as that link and never opens the card's modal.

use crate::content::Store;
use crate::i18n::Labels;
use crate::render;
use crate::types::LinkKind;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::net::IpAddr;
use url::{Host, Url};

/// Mobile user-agent markers.
const MOBILE_MARKERS: [&str; 4] = ["iphone", "ipad", "ipod", "android"];

/// An element on the click path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn anchor(href: &str) -> Self {
        Self::new("a").with_attr("href", href)
    }

    /// A project or publication card as rendered on the page.
    pub fn card(kind: LinkKind, id: &str) -> Self {
        let class = match kind {
            LinkKind::PublicationDetails => "pub-card",
            _ => "project-card",
        };
        Self::new("article")
            .with_class(class)
            .with_attr("data-type", kind.as_str())
            .with_attr("data-id", id)
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    pub fn is_anchor(&self) -> bool {
        self.tag == "a"
    }

    fn is_routable(&self) -> bool {
        self.is_anchor() || self.attrs.contains_key("data-type")
    }
}

/// A click event: target first, then its ancestors up to the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Click {
    pub path: Vec<Element>,
}

impl Click {
    pub fn on(target: Element) -> Self {
        Self { path: vec![target] }
    }

    /// Add the next ancestor (call innermost first).
    pub fn within(mut self, ancestor: Element) -> Self {
        self.path.push(ancestor);
        self
    }

    pub fn target(&self) -> Option<&Element> {
        self.path.first()
    }

    pub fn closest(&self, pred: impl Fn(&Element) -> bool) -> Option<&Element> {
        self.path.iter().find(|e| pred(e))
    }

    pub fn passes_through_class(&self, class: &str) -> bool {
        self.closest(|e| e.has_class(class)).is_some()
    }

    pub fn passes_through_id(&self, id: &str) -> bool {
        self.closest(|e| e.is(id)).is_some()
    }
}

/// What the page knows about where and how it is being viewed.
#[derive(Debug, Clone)]
pub struct Environment {
    pub user_agent: String,
    pub page_url: Url,
}

impl Environment {
    pub fn new(user_agent: &str, page_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            user_agent: user_agent.to_string(),
            page_url: Url::parse(page_url)?,
        })
    }

    pub fn is_mobile(&self) -> bool {
        let ua = self.user_agent.to_lowercase();
        MOBILE_MARKERS.iter().any(|m| ua.contains(m))
    }

    /// Whether third parties can reach the page's host. Loopback, private,
    /// link-local, and `.local` hosts are not public.
    pub fn is_public_host(&self) -> bool {
        match self.page_url.host() {
            Some(Host::Domain(domain)) => {
                let domain = domain.to_ascii_lowercase();
                domain != "localhost" && !domain.ends_with(".local")
            }
            Some(Host::Ipv4(ip)) => is_public_ip(IpAddr::V4(ip)),
            Some(Host::Ipv6(ip)) => is_public_ip(IpAddr::V6(ip)),
            None => false,
        }
    }

    /// Resolve an href against the page address.
    pub fn absolute(&self, href: &str) -> String {
        self.page_url
            .join(href)
            .map(String::from)
            .unwrap_or_else(|_| href.to_string())
    }
}

fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified())
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            // fc00::/7 unique-local, fe80::/10 link-local
            let local = (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80;
            !(v6.is_loopback() || v6.is_unspecified() || local)
        }
    }
}

/// Outcome of routing a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Not on a routable element.
    Ignore,
    /// Let the browser follow the link.
    Navigate,
    NewTab { url: String },
    Modal { content: String, images: Vec<String> },
    /// A detail card whose entity isn't in the active locale.
    Unresolved { kind: LinkKind, id: Option<String> },
}

impl Dispatch {
    pub fn prevents_default(&self) -> bool {
        matches!(self, Dispatch::NewTab { .. } | Dispatch::Modal { .. })
    }
}

/// Classify a click and decide what happens.
pub fn route(click: &Click, env: &Environment, store: &Store, pdf_embed_url: &str) -> Dispatch {
    let Some(element) = click.closest(Element::is_routable) else {
        return Dispatch::Ignore;
    };

    let kind = match element.attr("data-type") {
        None => LinkKind::External,
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("{e}; treating as external");
            LinkKind::External
        }),
    };
    let href = element.attr("href").unwrap_or_default();

    let dispatch = match kind {
        LinkKind::External => Dispatch::Navigate,
        LinkKind::Pdf => route_pdf(href, env, pdf_embed_url),
        LinkKind::Image => Dispatch::Modal {
            content: render::image_viewer(href).into_string(),
            images: Vec::new(),
        },
        LinkKind::ProjectDetails | LinkKind::PublicationDetails => {
            route_detail(kind, element.attr("data-id"), store)
        }
    };
    debug!("click on <{}> kind={kind} → {dispatch:?}", element.tag);
    dispatch
}

fn route_pdf(href: &str, env: &Environment, pdf_embed_url: &str) -> Dispatch {
    let absolute = env.absolute(href);
    if !env.is_mobile() {
        return Dispatch::Modal {
            content: render::pdf_viewer(href).into_string(),
            images: Vec::new(),
        };
    }
    if !env.is_public_host() {
        return Dispatch::NewTab { url: absolute };
    }
    let embed = format!(
        "{pdf_embed_url}?url={}&embedded=true",
        urlencoding::encode(&absolute)
    );
    Dispatch::Modal {
        content: render::pdf_viewer(&embed).into_string(),
        images: Vec::new(),
    }
}

fn route_detail(kind: LinkKind, id: Option<&str>, store: &Store) -> Dispatch {
    let labels = Labels::for_locale(store.locale());
    let found = id.and_then(|id| match kind {
        LinkKind::ProjectDetails => store.project(id).map(|p| Dispatch::Modal {
            content: render::project_detail(p, labels).into_string(),
            images: p.images.clone(),
        }),
        _ => store.publication(id).map(|p| Dispatch::Modal {
            content: render::publication_detail(p).into_string(),
            images: p.images.clone(),
        }),
    });
    found.unwrap_or_else(|| {
        warn!("no {kind} entity for id {id:?} in locale {}", store.locale());
        Dispatch::Unresolved {
            kind,
            id: id.map(str::to_string),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    const EMBED: &str = "https://docs.google.com/gview";
    const DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64)";
    const PHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";

    fn env(ua: &str, url: &str) -> Environment {
        Environment::new(ua, url).unwrap()
    }

    fn pdf_click() -> Click {
        Click::on(Element::anchor("assets/thesis.pdf").with_attr("data-type", "pdf"))
    }

    #[test]
    fn click_outside_routable_element_is_ignored() {
        let click = Click::on(Element::new("p")).within(Element::new("section"));
        let dispatch = route(&click, &env(DESKTOP, "https://a.dev/"), &sample_store(), EMBED);
        assert_eq!(dispatch, Dispatch::Ignore);
        assert!(!dispatch.prevents_default());
    }

    #[test]
    fn external_links_never_prevent_default() {
        let store = sample_store();
        let environment = env(PHONE, "https://a.dev/");
        for click in [
            Click::on(Element::anchor("https://x")),
            Click::on(Element::anchor("https://x").with_attr("data-type", "external")),
            Click::on(Element::new("span")).within(Element::anchor("#about")),
            Click::on(Element::anchor("https://x").with_attr("data-type", "video")),
        ] {
            let dispatch = route(&click, &environment, &store, EMBED);
            assert_eq!(dispatch, Dispatch::Navigate);
            assert!(!dispatch.prevents_default());
        }
    }

    #[test]
    fn pdf_on_desktop_opens_inline_frame() {
        let dispatch = route(&pdf_click(), &env(DESKTOP, "http://localhost:8000/"), &sample_store(), EMBED);
        let Dispatch::Modal { content, images } = &dispatch else {
            panic!("expected modal, got {dispatch:?}");
        };
        assert!(content.contains(r#"src="assets/thesis.pdf""#));
        assert!(images.is_empty());
        assert!(dispatch.prevents_default());
    }

    #[test]
    fn pdf_on_mobile_private_host_opens_new_tab() {
        for host in ["http://localhost:8000/", "http://127.0.0.1/", "http://192.168.0.12:8080/"] {
            let dispatch = route(&pdf_click(), &env(PHONE, host), &sample_store(), EMBED);
            let Dispatch::NewTab { url } = &dispatch else {
                panic!("expected new tab for {host}, got {dispatch:?}");
            };
            assert!(url.starts_with(host));
            assert!(url.ends_with("assets/thesis.pdf"));
            assert!(dispatch.prevents_default());
        }
    }

    #[test]
    fn pdf_on_mobile_public_host_uses_embed() {
        let dispatch = route(
            &pdf_click(),
            &env("Mozilla/5.0 (Linux; Android 14)", "https://ana.dev/portfolio/"),
            &sample_store(),
            EMBED,
        );
        let Dispatch::Modal { content, .. } = dispatch else {
            panic!("expected modal");
        };
        assert!(content.contains(
            "https://docs.google.com/gview?url=https%3A%2F%2Fana.dev%2Fportfolio%2Fassets%2Fthesis.pdf&amp;embedded=true"
        ));
    }

    #[test]
    fn image_link_opens_scrollable_viewer() {
        let click = Click::on(Element::anchor("assets/poster.png").with_attr("data-type", "image"));
        let dispatch = route(&click, &env(DESKTOP, "https://a.dev/"), &sample_store(), EMBED);
        let Dispatch::Modal { content, .. } = dispatch else {
            panic!("expected modal");
        };
        assert!(content.contains("image-scroll-container"));
        assert!(content.contains(r#"src="assets/poster.png""#));
    }

    #[test]
    fn project_card_click_opens_detail_with_images() {
        let click = Click::on(Element::new("h3").with_class("project-title"))
            .within(project_card("p1"));
        let dispatch = route(&click, &env(DESKTOP, "https://a.dev/"), &sample_store(), EMBED);
        let Dispatch::Modal { content, images } = dispatch else {
            panic!("expected modal");
        };
        assert!(content.contains("Telemetry Pipeline"));
        assert_eq!(images, vec!["a.png".to_string(), "b.png".to_string()]);
    }

    #[test]
    fn nested_link_inside_card_navigates() {
        let click = Click::on(
            Element::anchor("https://x")
                .with_class("icon-link")
                .with_attr("data-type", "external"),
        )
        .within(Element::new("div").with_class("project-external-links"))
        .within(project_card("p1"));
        let dispatch = route(&click, &env(DESKTOP, "https://a.dev/"), &sample_store(), EMBED);
        assert_eq!(dispatch, Dispatch::Navigate);
    }

    #[test]
    fn pdf_link_inside_publication_card_routes_as_pdf() {
        let click = pdf_click().within(publication_card("thesis"));
        let dispatch = route(&click, &env(DESKTOP, "https://a.dev/"), &sample_store(), EMBED);
        let Dispatch::Modal { content, .. } = dispatch else {
            panic!("expected modal");
        };
        assert!(content.contains("pdf-viewer"));
    }

    #[test]
    fn publication_detail_uses_active_locale() {
        let mut store = sample_store();
        store.select("pt").unwrap();
        let click = Click::on(publication_card("thesis"));
        let dispatch = route(&click, &env(DESKTOP, "https://a.dev/"), &store, EMBED);
        let Dispatch::Modal { content, images } = dispatch else {
            panic!("expected modal");
        };
        assert!(content.contains("Consenso Sob Sincronia Parcial"));
        assert_eq!(images, vec!["thesis-cover.png".to_string()]);
    }

    #[test]
    fn unknown_id_is_unresolved_noop() {
        let click = Click::on(project_card("ghost"));
        let dispatch = route(&click, &env(DESKTOP, "https://a.dev/"), &sample_store(), EMBED);
        assert_eq!(
            dispatch,
            Dispatch::Unresolved {
                kind: LinkKind::ProjectDetails,
                id: Some("ghost".into())
            }
        );
        assert!(!dispatch.prevents_default());
    }

    #[test]
    fn mobile_detection() {
        assert!(env(PHONE, "https://a.dev/").is_mobile());
        assert!(env("Mozilla/5.0 (iPad)", "https://a.dev/").is_mobile());
        assert!(!env(DESKTOP, "https://a.dev/").is_mobile());
    }

    #[test]
    fn public_host_classification() {
        assert!(env(DESKTOP, "https://a.dev/").is_public_host());
        assert!(env(DESKTOP, "http://8.8.8.8/").is_public_host());
        assert!(!env(DESKTOP, "http://localhost/").is_public_host());
        assert!(!env(DESKTOP, "http://10.0.0.5/").is_public_host());
        assert!(!env(DESKTOP, "http://[::1]:3000/").is_public_host());
        assert!(!env(DESKTOP, "http://printer.local/").is_public_host());
    }

    #[test]
    fn private_ipv6_hosts_are_not_public() {
        assert!(!env(DESKTOP, "http://[fd12:3456::5]/").is_public_host());
        assert!(!env(DESKTOP, "http://[fc00::1]/").is_public_host());
        assert!(!env(DESKTOP, "http://[fe80::1]/").is_public_host());
        assert!(env(DESKTOP, "http://[2001:4860::8888]/").is_public_host());

        let dispatch = route(&pdf_click(), &env(PHONE, "http://[fd12:3456::5]:8080/"), &sample_store(), EMBED);
        assert!(matches!(dispatch, Dispatch::NewTab { .. }));
    }
}
