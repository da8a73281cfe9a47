//! Result-count wording. Templates come from the rendered page and fall back
//! to English when a template is missing or empty.

use crate::query::Query;
use serde::Deserialize;

pub const COUNT_PLACEHOLDER: &str = "__COUNT__";
const SHOWING_ALL_DEFAULT: &str = "Showing all __COUNT__ traces";
const SINGULAR_DEFAULT: &str = "trace";
const PLURAL_DEFAULT: &str = "traces";
const MATCHING_DEFAULT: &str = "matching";

/// Localized templates as the page provides them.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct MessageTemplates {
    #[serde(default)]
    pub showing_all: Option<String>,
    #[serde(default)]
    pub singular: Option<String>,
    #[serde(default)]
    pub plural: Option<String>,
    #[serde(default)]
    pub matching: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    showing_all: String,
    singular: String,
    plural: String,
    matching: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self::resolve(&MessageTemplates::default(), 0)
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

impl Messages {
    /// The total is substituted once, at mount time; only the first
    /// placeholder is replaced.
    pub fn resolve(templates: &MessageTemplates, total: usize) -> Self {
        let showing_all = or_default(&templates.showing_all, SHOWING_ALL_DEFAULT)
            .replacen(COUNT_PLACEHOLDER, &total.to_string(), 1);
        Self {
            showing_all,
            singular: or_default(&templates.singular, SINGULAR_DEFAULT),
            plural: or_default(&templates.plural, PLURAL_DEFAULT),
            matching: or_default(&templates.matching, MATCHING_DEFAULT),
        }
    }

    pub fn showing_all(&self) -> &str {
        &self.showing_all
    }

    pub fn noun(&self, count: usize) -> &str {
        if count == 1 { &self.singular } else { &self.plural }
    }

    pub fn result_count(
        &self,
        visible: usize,
        query: &Query,
        active_tag: Option<&str>,
    ) -> String {
        if query.text.is_empty() && active_tag.is_none() {
            return self.showing_all.clone();
        }
        let mut parts: Vec<String> = Vec::new();
        if !query.text.is_empty() {
            parts.push(format!("\"{}\"", query.text));
        }
        if let Some(tag) = active_tag {
            parts.push(format!("#{tag}"));
        }
        format!(
            "{} {} {} {}",
            visible,
            self.noun(visible),
            self.matching,
            parts.join(" + ")
        )
    }
}
