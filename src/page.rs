//! In-memory stand-in for the server-rendered page: the trace list, the tag
//! sidebar, the optional count and empty-state elements, and the address bar.

use crate::error::InitError;
use crate::item::{Item, PAGE_PATH_DEFAULT, PageSnapshot};
use crate::messages::{MessageTemplates, Messages};
use crate::tags::tag_counts;

/// Where the controller writes its side effects. Optional elements default to
/// absent so a minimal surface only has to handle visibility, tags and the
/// URL.
pub trait Surface {
    fn set_item_visible(&mut self, index: usize, visible: bool);
    fn set_tag_active(&mut self, tag: &str, active: bool);
    fn has_results_count(&self) -> bool {
        false
    }
    fn set_results_count(&mut self, _text: &str) {}
    fn has_empty_state(&self) -> bool {
        false
    }
    fn set_empty_state(&mut self, _shown: bool) {}
    /// Replace the current URL without adding a history entry.
    fn replace_url(&mut self, update: UrlUpdate);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlUpdate {
    /// Already percent-encoded fragment, without `#`.
    Fragment(String),
    /// Back to the bare pathname.
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub hash: Option<String>,
}

impl Location {
    pub fn new(pathname: &str, hash: Option<&str>) -> Self {
        Self {
            pathname: pathname.to_string(),
            hash: hash.filter(|h| !h.is_empty()).map(str::to_string),
        }
    }

    pub fn href(&self) -> String {
        match &self.hash {
            Some(h) => format!("{}#{}", self.pathname, h),
            None => self.pathname.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ItemElement {
    pub item: Item,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct TraceList {
    pub templates: MessageTemplates,
    pub items: Vec<ItemElement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLink {
    pub tag: String,
    pub count: usize,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub search_input: bool,
    pub trace_list: Option<TraceList>,
    pub tag_links: Vec<TagLink>,
    pub results_count: Option<String>,
    pub no_results: Option<bool>,
    pub location: Location,
    replacements: usize,
}

/// What the controller reads once when it is attached to a page.
#[derive(Debug, Clone)]
pub struct Mount {
    pub items: Vec<Item>,
    pub tags: Vec<String>,
    pub messages: Messages,
    pub fragment: Option<String>,
}

impl Page {
    pub fn from_snapshot(snapshot: &PageSnapshot, hash: Option<&str>) -> Self {
        let pathname = snapshot.path.as_deref().unwrap_or(PAGE_PATH_DEFAULT);
        let total = snapshot.traces.as_ref().map(Vec::len).unwrap_or_default();
        let trace_list = snapshot.traces.as_ref().map(|records| TraceList {
            templates: snapshot.i18n.clone(),
            items: records
                .iter()
                .map(|r| ItemElement { item: Item::render(r), visible: true })
                .collect(),
        });
        let tag_links = trace_list
            .as_ref()
            .map(|list| {
                let items: Vec<Item> =
                    list.items.iter().map(|e| e.item.clone()).collect();
                tag_counts(&items)
                    .into_iter()
                    .map(|(tag, count)| TagLink { tag, count, active: false })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            search_input: snapshot.search_input,
            trace_list,
            tag_links,
            results_count: snapshot.results_count.then(|| {
                Messages::resolve(&snapshot.i18n, total).showing_all().to_string()
            }),
            no_results: snapshot.no_results.then_some(false),
            location: Location::new(pathname, hash),
            replacements: 0,
        }
    }

    /// Read the static snapshot the controller works from. Fails when the
    /// search input or the trace list is missing.
    pub fn mount(&self) -> Result<Mount, InitError> {
        if !self.search_input {
            return Err(InitError::MissingSearchInput);
        }
        let list = self.trace_list.as_ref().ok_or(InitError::MissingTraceList)?;
        let items: Vec<Item> = list.items.iter().map(|e| e.item.clone()).collect();
        let messages = Messages::resolve(&list.templates, items.len());
        Ok(Mount {
            items,
            tags: self.tag_links.iter().map(|l| l.tag.clone()).collect(),
            messages,
            fragment: self.location.hash.clone(),
        })
    }

    pub fn items(&self) -> &[ItemElement] {
        self.trace_list.as_ref().map(|l| l.items.as_slice()).unwrap_or(&[])
    }

    pub fn visible_items(&self) -> impl Iterator<Item = &Item> {
        self.items().iter().filter(|e| e.visible).map(|e| &e.item)
    }

    pub fn active_tags(&self) -> Vec<&str> {
        self.tag_links
            .iter()
            .filter(|l| l.active)
            .map(|l| l.tag.as_str())
            .collect()
    }

    /// Number of in-place URL replacements. History never grows.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Surface for Page {
    fn set_item_visible(&mut self, index: usize, visible: bool) {
        if let Some(el) =
            self.trace_list.as_mut().and_then(|l| l.items.get_mut(index))
        {
            el.visible = visible;
        }
    }

    fn set_tag_active(&mut self, tag: &str, active: bool) {
        for link in self.tag_links.iter_mut().filter(|l| l.tag == tag) {
            link.active = active;
        }
    }

    fn has_results_count(&self) -> bool {
        self.results_count.is_some()
    }

    fn set_results_count(&mut self, text: &str) {
        if let Some(slot) = self.results_count.as_mut() {
            *slot = text.to_string();
        }
    }

    fn has_empty_state(&self) -> bool {
        self.no_results.is_some()
    }

    fn set_empty_state(&mut self, shown: bool) {
        if let Some(slot) = self.no_results.as_mut() {
            *slot = shown;
        }
    }

    fn replace_url(&mut self, update: UrlUpdate) {
        self.location.hash = match update {
            UrlUpdate::Fragment(f) => Some(f),
            UrlUpdate::Clear => None,
        };
        self.replacements += 1;
    }
}
