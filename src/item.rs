use crate::error::SnapshotError;
use crate::messages::MessageTemplates;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_DEFAULT: &str = "seed_traces.json";
pub const PAGE_PATH_DEFAULT: &str = "/browse/";
const SLUG_MAX_LEN: usize = 80;

/// One trace as the site generator receives it.
#[derive(Debug, Clone, Deserialize)]
pub struct TraceRecord {
    pub title: String,
    #[serde(default, alias = "context_text")]
    pub context: String,
    #[serde(default, alias = "solution_text")]
    pub solution: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A rendered entry of the trace list. `search_text` and `tag_string` are
/// fixed at render time; visibility lives on the page, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub slug: String,
    pub title: String,
    pub context: String,
    pub solution: String,
    pub search_text: String,
    pub tag_string: String,
}

impl Item {
    pub fn render(record: &TraceRecord) -> Self {
        let slug = record
            .slug
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&record.title));
        let tag_words = record.tags.join(" ");
        let search_text = [
            record.title.as_str(),
            record.context.as_str(),
            record.solution.as_str(),
            tag_words.as_str(),
        ]
        .join(" ")
        .to_lowercase();
        Self {
            slug,
            title: record.title.clone(),
            context: record.context.clone(),
            solution: record.solution.clone(),
            search_text,
            tag_string: record.tags.join(","),
        }
    }

    /// Tag ids decoded from the comma-delimited attribute. An attribute
    /// without delimiters is a single tag; an empty one yields nothing
    /// that a real tag id can equal.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tag_string.split(',')
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().any(|t| t == tag)
    }
}

/// Lower-case, keep `[a-z0-9]`, whitespace and hyphens, then collapse
/// separator runs to a single `-`.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let mut slug = String::new();
    let mut pending_sep = false;
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_sep {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_sep = true;
        }
    }
    if pending_sep {
        slug.push('-');
    }
    let capped: String = slug.chars().take(SLUG_MAX_LEN).collect();
    capped.trim_end_matches('-').to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "present")]
    pub search_input: bool,
    #[serde(default = "present")]
    pub results_count: bool,
    #[serde(default = "present")]
    pub no_results: bool,
    #[serde(default)]
    pub i18n: MessageTemplates,
    #[serde(default)]
    pub traces: Option<Vec<TraceRecord>>,
}

fn present() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Traces(Vec<TraceRecord>),
    Page(PageSnapshot),
}

impl From<SnapshotFile> for PageSnapshot {
    fn from(file: SnapshotFile) -> Self {
        match file {
            SnapshotFile::Page(page) => page,
            SnapshotFile::Traces(traces) => PageSnapshot {
                search_input: true,
                results_count: true,
                no_results: true,
                traces: Some(traces),
                ..Default::default()
            },
        }
    }
}

pub fn snapshot_path() -> PathBuf {
    std::env::var("TRACE_FILTER_SNAPSHOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(SNAPSHOT_DEFAULT))
}

pub fn parse_snapshot(raw: &str) -> Result<PageSnapshot, serde_json::Error> {
    serde_json::from_str::<SnapshotFile>(raw).map(PageSnapshot::from)
}

pub fn load_snapshot(path: &Path) -> Result<PageSnapshot, SnapshotError> {
    let raw = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_snapshot(&raw).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, tags: &[&str]) -> TraceRecord {
        TraceRecord {
            title: title.to_string(),
            context: "Context".to_string(),
            solution: "Solution".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            slug: None,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Fix Kafka consumer lag!"), "fix-kafka-consumer-lag");
        assert_eq!(slugify("  a -- b  "), "a-b");
        assert_eq!(slugify("! a"), "-a");
        assert_eq!(slugify("Next.js 14 routing"), "nextjs-14-routing");
        assert_eq!(slugify(&"x".repeat(100)).len(), 80);
    }

    #[test]
    fn test_render_precomputes_search_text() {
        let item = Item::render(&record("Kafka Lag", &["go", "Kafka"]));
        assert_eq!(item.slug, "kafka-lag");
        assert_eq!(item.search_text, "kafka lag context solution go kafka");
        assert_eq!(item.tag_string, "go,Kafka");
    }

    #[test]
    fn test_tag_membership_is_exact() {
        let item = Item::render(&record("t", &["go", "golang"]));
        assert!(item.has_tag("go"));
        assert!(item.has_tag("golang"));
        assert!(!item.has_tag("gol"));
        assert!(!item.has_tag("Go"));
    }

    #[test]
    fn test_malformed_tag_string_degrades() {
        let mut item = Item::render(&record("t", &[]));
        assert!(!item.has_tag("go"));
        item.tag_string = "go python".to_string();
        assert!(!item.has_tag("go"));
        assert!(item.has_tag("go python"));
    }

    #[test]
    fn test_parse_bare_array_snapshot() {
        let page = parse_snapshot(
            r#"[{"title": "A", "context_text": "c", "solution_text": "s", "tags": ["go"]}]"#,
        )
        .unwrap();
        assert!(page.search_input && page.results_count && page.no_results);
        let traces = page.traces.unwrap();
        assert_eq!(traces[0].context, "c");
        assert_eq!(traces[0].solution, "s");
    }

    #[test]
    fn test_parse_page_snapshot() {
        let page = parse_snapshot(
            r#"{"path": "/tag/go/", "no_results": false,
                "i18n": {"singular": "Spur"}, "traces": []}"#,
        )
        .unwrap();
        assert_eq!(page.path.as_deref(), Some("/tag/go/"));
        assert!(page.search_input);
        assert!(!page.no_results);
        assert_eq!(page.i18n.singular.as_deref(), Some("Spur"));
        assert!(page.traces.unwrap().is_empty());
    }

    #[test]
    fn test_page_without_traces_has_no_list() {
        let page = parse_snapshot(r#"{"search_input": true}"#).unwrap();
        assert!(page.traces.is_none());
    }
}
