//! Modal and carousel engine.
//!
//! A single modal instance that is either closed, open, or fading out:
//!
//! ```text
//!            open()                 close()               close transition
//! Closed ───────────▶ Open ───────────────────▶ Closing ───────────────────▶ Closed
//!                     ▲  │ open() (replace)       │ open()                     (content cleared)
//!                     │  └──────────┘             │
//!                     └───────────────────────────┘
//! ```
//!
//! While open with images, an auto-advance task moves the carousel every
//! `advance_interval`. The task is an `Option` owned by the engine, so there
//! is never more than one; starting one replaces the previous, and closing
//! drops it before anything else happens. Time comes from an injected
//! [`Clock`] and scheduled work only runs inside [`ModalEngine::poll`].

use crate::clock::Clock;
use crate::config::ModalConfig;
use crate::render;
use log::debug;
use maud::Markup;
use std::time::Duration;

/// Image slideshow state. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    images: Vec<String>,
    index: usize,
}

impl Carousel {
    /// `None` when there are no images.
    pub fn new(images: Vec<String>) -> Option<Self> {
        if images.is_empty() {
            None
        } else {
            Some(Self { images, index: 0 })
        }
    }

    /// Move by `delta` slides, wrapping in both directions.
    pub fn advance(&mut self, delta: i64) {
        let len = self.images.len() as i64;
        self.index = (self.index as i64 + delta % len).rem_euclid(len) as usize;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn current(&self) -> &str {
        &self.images[self.index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    Open,
    /// Faded out, still in the page until `hide_at`.
    Closing { hide_at: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalTimings {
    pub advance_interval: Duration,
    pub close_transition: Duration,
}

impl From<&ModalConfig> for ModalTimings {
    fn from(config: &ModalConfig) -> Self {
        Self {
            advance_interval: config.advance_interval(),
            close_transition: config.close_transition(),
        }
    }
}

impl Default for ModalTimings {
    fn default() -> Self {
        Self::from(&ModalConfig::default())
    }
}

pub struct ModalEngine<C: Clock> {
    clock: C,
    timings: ModalTimings,
    phase: ModalPhase,
    content: String,
    carousel: Option<Carousel>,
    /// Due time of the next auto-advance tick.
    auto_advance: Option<Duration>,
    revision: u64,
}

impl<C: Clock> ModalEngine<C> {
    pub fn new(clock: C, timings: ModalTimings) -> Self {
        Self {
            clock,
            timings,
            phase: ModalPhase::Closed,
            content: String::new(),
            carousel: None,
            auto_advance: None,
            revision: 0,
        }
    }

    /// Show `content`, replacing whatever is open. The carousel restarts at
    /// the first image and auto-advance runs only when there are images.
    pub fn open(&mut self, content: impl Into<String>, images: Vec<String>) {
        self.content = content.into();
        self.carousel = Carousel::new(images);
        self.phase = ModalPhase::Open;
        self.auto_advance = None;
        if self.carousel.is_some() {
            self.schedule_advance();
        }
        self.revision += 1;
        debug!(
            "modal open ({} images)",
            self.carousel.as_ref().map_or(0, Carousel::len)
        );
    }

    /// Cancel auto-advance, release the page scroll, and start the fade-out.
    /// The modal is hidden and emptied once the close transition has elapsed.
    pub fn close(&mut self) {
        if self.phase != ModalPhase::Open {
            return;
        }
        self.auto_advance = None;
        self.phase = ModalPhase::Closing {
            hide_at: self.clock.now() + self.timings.close_transition,
        };
        self.revision += 1;
        debug!("modal closing");
    }

    /// Manual navigation. Restarts the auto-advance period so the two don't
    /// fight. Returns `false` when there is nothing to navigate.
    pub fn advance(&mut self, delta: i64) -> bool {
        if self.phase != ModalPhase::Open {
            return false;
        }
        let Some(carousel) = self.carousel.as_mut() else {
            return false;
        };
        carousel.advance(delta);
        self.schedule_advance();
        self.revision += 1;
        true
    }

    /// Run any scheduled work that is due. Returns the number of auto-advance
    /// ticks applied.
    pub fn poll(&mut self) -> u64 {
        let now = self.clock.now();

        if let ModalPhase::Closing { hide_at } = self.phase {
            if now >= hide_at {
                self.phase = ModalPhase::Closed;
                self.content.clear();
                self.carousel = None;
                self.revision += 1;
                debug!("modal hidden");
            }
            return 0;
        }

        let (Some(due), Some(carousel)) = (self.auto_advance, self.carousel.as_mut()) else {
            return 0;
        };
        if now < due {
            return 0;
        }
        let interval = self.timings.advance_interval.as_nanos().max(1);
        let ticks = (now - due).as_nanos() / interval + 1;
        carousel.advance((ticks % carousel.len() as u128) as i64);
        self.auto_advance =
            Some(due + Duration::from_nanos((interval * ticks).min(u64::MAX as u128) as u64));
        self.revision += 1;
        debug!("carousel auto-advance x{ticks} → {}", carousel.index());
        ticks as u64
    }

    fn schedule_advance(&mut self) {
        self.auto_advance = Some(self.clock.now() + self.timings.advance_interval);
    }

    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == ModalPhase::Open
    }

    /// In the page at all (open or fading out).
    pub fn is_visible(&self) -> bool {
        self.phase != ModalPhase::Closed
    }

    pub fn opacity(&self) -> f32 {
        if self.is_open() { 1.0 } else { 0.0 }
    }

    /// Page scrolling is suppressed only while the modal is open.
    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    pub fn timer_active(&self) -> bool {
        self.auto_advance.is_some()
    }

    pub fn next_tick(&self) -> Option<Duration> {
        self.auto_advance
    }

    /// Bumped on every visible change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Modal body markup: carousel (if any) followed by the content.
    pub fn render(&self) -> Markup {
        render::modal_body(self.carousel.as_ref(), &self.content)
    }
}
