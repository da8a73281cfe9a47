//! The search and tag filter behind the trace list.
//!
//! The controller owns the only mutable filter state: the raw search text
//! and the active tag. Every change recomputes visibility for the whole
//! list and pushes the results (item visibility, count text, empty state,
//! URL fragment) through a [`Surface`]. Typing is debounced; tag clicks
//! apply immediately.

use crate::debounce::Debouncer;
use crate::error::InitError;
use crate::fragment;
use crate::item::Item;
use crate::messages::Messages;
use crate::page::{Mount, Page, Surface, UrlUpdate};
use crate::query::{Query, is_visible};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub query: String,
    pub active_tag: Option<String>,
}

pub struct FilterController<S: Surface> {
    surface: S,
    items: Vec<Item>,
    known_tags: Vec<String>,
    messages: Messages,
    state: FilterState,
    debounce: Debouncer,
}

impl FilterController<Page> {
    /// Attach to a rendered page. Nothing is set up when the page lacks its
    /// search input or trace list.
    pub fn attach(page: Page) -> Result<Self, InitError> {
        let mount = page.mount().inspect_err(|err| {
            warn!(error = %err, "filter not attached");
        })?;
        Ok(Self::new(mount, page))
    }
}

impl<S: Surface> FilterController<S> {
    pub fn new(mount: Mount, surface: S) -> Self {
        let Mount { items, tags, messages, fragment: hash } = mount;
        info!(items = items.len(), tags = tags.len(), "filter mounted");
        let mut controller = Self {
            surface,
            items,
            known_tags: tags,
            messages,
            state: FilterState::default(),
            debounce: Debouncer::default(),
        };

        if let Some(raw) = hash.filter(|h| !h.is_empty()) {
            let initial = fragment::decode(&raw)
                .filter(|tag| controller.known_tags.contains(tag));
            if let Some(tag) = initial {
                debug!(tag = %tag, "tag restored from fragment");
                controller.surface.set_tag_active(&tag, true);
                controller.state.active_tag = Some(tag);
            }
            controller.apply_filters();
        }
        controller
    }

    /// Toggle `tag`: clicking the active tag clears it, any other known tag
    /// replaces it. Returns `false` for tags with no control on the page.
    pub fn select_tag(&mut self, tag: &str) -> bool {
        if !self.known_tags.iter().any(|t| t == tag) {
            debug!(tag, "ignoring unknown tag");
            return false;
        }
        if self.state.active_tag.as_deref() == Some(tag) {
            self.state.active_tag = None;
            self.surface.set_tag_active(tag, false);
        } else {
            for known in &self.known_tags {
                self.surface.set_tag_active(known, false);
            }
            self.state.active_tag = Some(tag.to_string());
            self.surface.set_tag_active(tag, true);
        }
        self.apply_filters();
        true
    }

    /// Record new input text and restart the debounce window.
    pub fn set_query(&mut self, text: &str, now: Instant) {
        self.state.query = text.to_string();
        self.debounce.schedule(now);
    }

    /// Run the pending search pass if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.debounce.fire_if_due(now) {
            self.apply_filters();
            true
        } else {
            false
        }
    }

    /// Run the pending search pass now, if any.
    pub fn flush(&mut self) -> bool {
        if self.debounce.take() {
            self.apply_filters();
            true
        } else {
            false
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn known_tags(&self) -> &[String] {
        &self.known_tags
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Recompute every item from the current state and sync the page.
    /// Returns the number of visible items.
    pub fn apply_filters(&mut self) -> usize {
        let query = Query::parse(&self.state.query);
        let active_tag = self.state.active_tag.as_deref();

        let mut visible_count = 0;
        for (index, item) in self.items.iter().enumerate() {
            let visible = is_visible(item, &query, active_tag);
            self.surface.set_item_visible(index, visible);
            if visible {
                visible_count += 1;
            }
        }

        if self.surface.has_results_count() {
            let text = self.messages.result_count(visible_count, &query, active_tag);
            self.surface.set_results_count(&text);
        }
        if self.surface.has_empty_state() {
            self.surface.set_empty_state(visible_count == 0);
        }

        if let Some(tag) = active_tag {
            self.surface.replace_url(UrlUpdate::Fragment(fragment::encode(tag)));
        } else if query.is_empty() {
            self.surface.replace_url(UrlUpdate::Clear);
        }

        debug!(
            query = %query.text,
            tag = active_tag.unwrap_or(""),
            visible = visible_count,
            total = self.items.len(),
            "filters applied"
        );
        visible_count
    }
}
