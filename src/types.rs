//! Content types shared by the store, the renderers, and the router.
//!
//! Field names follow the content document (`longDesc`, `resumeLink`, ...),
//! mapped to snake_case through serde.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Routing kind carried by an anchor's `data-type` attribute.
///
/// Closed set: the click router matches on it exhaustively, so adding a kind
/// means deciding how it routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKind {
    #[default]
    External,
    Pdf,
    Image,
    ProjectDetails,
    PublicationDetails,
}

impl LinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::External => "external",
            LinkKind::Pdf => "pdf",
            LinkKind::Image => "image",
            LinkKind::ProjectDetails => "project-details",
            LinkKind::PublicationDetails => "publication-details",
        }
    }

    /// PDF and image links open in place (inside the modal), everything else
    /// in a new tab.
    pub fn target(self) -> &'static str {
        match self {
            LinkKind::Pdf | LinkKind::Image => "_self",
            _ => "_blank",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLinkKind(pub String);

impl fmt::Display for UnknownLinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown link kind: {}", self.0)
    }
}

impl std::error::Error for UnknownLinkKind {}

impl FromStr for LinkKind {
    type Err = UnknownLinkKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "external" => Ok(LinkKind::External),
            "pdf" => Ok(LinkKind::Pdf),
            "image" => Ok(LinkKind::Image),
            "project-details" => Ok(LinkKind::ProjectDetails),
            "publication-details" => Ok(LinkKind::PublicationDetails),
            other => Err(UnknownLinkKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<Social>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Social {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

impl Social {
    /// Configured networks as `(label, url)`, in display order.
    pub fn links(&self) -> Vec<(&'static str, &str)> {
        [
            ("GitHub", self.github.as_deref()),
            ("LinkedIn", self.linkedin.as_deref()),
            ("Instagram", self.instagram.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.filter(|u| !u.is_empty()).map(|u| (label, u)))
        .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    #[serde(default)]
    pub bio: Vec<String>,
    #[serde(default)]
    pub skills_title: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectLink {
    pub label: String,
    pub url: String,
}

impl ProjectLink {
    /// Icon shown on the project card for this link.
    pub fn icon(&self) -> &'static str {
        let label = self.label.to_lowercase();
        if label.contains("docs") {
            "📄"
        } else if label.contains("live") || label.contains("demo") {
            "🚀"
        } else if label.contains("github") {
            "💻"
        } else {
            "🔗"
        }
    }
}

/// A project. `id` is always set once the document has been loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub techs: Vec<String>,
    #[serde(default)]
    pub links: Vec<ProjectLink>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub period: String,
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationLink {
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: LinkKind,
    #[serde(default)]
    pub text: String,
}

impl PublicationLink {
    pub fn icon(&self) -> &'static str {
        match self.kind {
            LinkKind::Pdf => "📄 ",
            LinkKind::Image => "🖼️ ",
            _ => "🔗 ",
        }
    }
}

/// A publication. `id` is always set once the document has been loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_desc: Option<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub footer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<PublicationLink>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Publication {
    /// Body text for the detail modal: `longDesc` when present, otherwise `desc`.
    pub fn detail_text(&self) -> &str {
        self.long_desc
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.desc)
    }
}
