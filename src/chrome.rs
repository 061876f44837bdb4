//! Page chrome: scroll reveal, the mobile menu, and the contact form.

use crate::i18n::Labels;
use crate::router::Click;
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Scroll reveal
// ============================================================================

/// An intersection observation for one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intersection {
    pub target: String,
    pub is_intersecting: bool,
}

/// Elements that start hidden and are shown the first time they enter the
/// viewport. One-shot: a revealed element never hides again.
#[derive(Debug, Clone, Default)]
pub struct ScrollReveal {
    hidden: BTreeSet<String>,
}

impl ScrollReveal {
    pub fn observe<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hidden: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Apply a batch of observations; returns the ids revealed by it.
    pub fn on_intersections(&mut self, entries: &[Intersection]) -> Vec<String> {
        entries
            .iter()
            .filter(|e| e.is_intersecting && self.reveal(&e.target))
            .map(|e| e.target.clone())
            .collect()
    }

    /// Show an element now. `false` if it wasn't hidden.
    pub fn reveal(&mut self, id: &str) -> bool {
        self.hidden.remove(id)
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    pub fn hidden(&self) -> &BTreeSet<String> {
        &self.hidden
    }
}

// ============================================================================
// Mobile menu
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileNav {
    open: bool,
}

impl MobileNav {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Menu behaviour for a document click. Returns `true` when the click was
    /// the menu button, which stops it from reaching anything else.
    pub fn on_click(&mut self, click: &Click) -> bool {
        if click.passes_through_class("hamburger") {
            self.toggle();
            return true;
        }
        if !self.open {
            return false;
        }
        let in_panel = click.passes_through_class("nav-links");
        let on_item = in_panel && click.closest(|e| e.tag == "li").is_some();
        if on_item || !in_panel {
            self.close();
        }
        false
    }
}

// ============================================================================
// Contact form
// ============================================================================

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// Sends the form-encoded fields to the action URL and returns the HTTP
/// status.
pub trait FormTransport {
    fn post(&self, action: &str, fields: &[(String, String)]) -> Result<u16, TransportError>;
}

/// Blocking HTTP transport with a fixed timeout. Never retries: a retried
/// POST could deliver the message twice.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl FormTransport for HttpTransport {
    fn post(&self, action: &str, fields: &[(String, String)]) -> Result<u16, TransportError> {
        let resp = self
            .client
            .post(action)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(fields)
            .send()?;
        Ok(resp.status().as_u16())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Failed(String),
    /// No action URL configured; nothing was sent.
    NoAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub success: bool,
    pub clear_at: Duration,
}

/// The contact form: fields, submit control, and status line.
#[derive(Debug, Clone)]
pub struct ContactForm {
    action: Option<String>,
    fields: Vec<(String, String)>,
    sending_label: Option<String>,
    disabled: bool,
    status: Option<StatusMessage>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            action: None,
            fields: ["name", "email", "message"]
                .into_iter()
                .map(|name| (name.to_string(), String::new()))
                .collect(),
            sending_label: None,
            disabled: false,
            status: None,
        }
    }
}

impl ContactForm {
    pub fn set_action(&mut self, action: Option<&str>) {
        self.action = action.map(str::to_string);
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn set_field(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Label override while a submission is in flight.
    pub fn button_label(&self) -> Option<&str> {
        self.sending_label.as_deref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Disable the control and show the sending label. The returned guard
    /// restores the control when dropped, whatever happens in between.
    pub fn begin(&mut self, labels: &Labels) -> Submission<'_> {
        self.disabled = true;
        self.sending_label = Some(labels.sending.to_string());
        Submission { form: self }
    }

    /// Submit the current fields through `transport`. Any 2xx status is a
    /// success and clears the fields; anything else keeps them for a retry.
    /// The status line stays up for `display`, measured from `now`.
    pub fn submit(
        &mut self,
        transport: &dyn FormTransport,
        labels: &Labels,
        now: Duration,
        display: Duration,
    ) -> SubmitOutcome {
        let Some(action) = self.action.clone() else {
            warn!("contact form has no action URL");
            return SubmitOutcome::NoAction;
        };
        let fields = self.fields.clone();
        let submission = self.begin(labels);
        let result = transport.post(&action, &fields);
        submission.finish(result, labels, now + display)
    }

    /// Drop the status line once its display time is over.
    pub fn poll(&mut self, now: Duration) -> bool {
        match &self.status {
            Some(status) if now >= status.clear_at => {
                self.status = None;
                true
            }
            _ => false,
        }
    }

    fn reset_fields(&mut self) {
        for (_, value) in &mut self.fields {
            value.clear();
        }
    }
}

/// An in-flight submission. Dropping it re-enables the submit control.
pub struct Submission<'a> {
    form: &'a mut ContactForm,
}

impl Submission<'_> {
    pub fn is_disabled(&self) -> bool {
        self.form.disabled
    }

    pub fn button_label(&self) -> Option<&str> {
        self.form.button_label()
    }

    /// Record the transport result and show the status line until `clear_at`.
    pub fn finish(
        self,
        result: Result<u16, TransportError>,
        labels: &Labels,
        clear_at: Duration,
    ) -> SubmitOutcome {
        let outcome = match result {
            Ok(status) if (200..300).contains(&status) => SubmitOutcome::Sent,
            Ok(status) => SubmitOutcome::Failed(format!("HTTP {status}")),
            Err(e) => SubmitOutcome::Failed(e.to_string()),
        };
        let success = outcome == SubmitOutcome::Sent;
        if success {
            self.form.reset_fields();
            info!("contact form sent");
        } else {
            warn!("contact form failed: {outcome:?}");
        }
        self.form.status = Some(StatusMessage {
            text: if success { labels.sent } else { labels.send_failed }.to_string(),
            success,
            clear_at,
        });
        outcome
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        self.form.disabled = false;
        self.form.sending_label = None;
        debug!("contact form control restored");
    }
}
