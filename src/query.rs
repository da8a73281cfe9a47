use crate::item::Item;

/// The search input after normalization: trimmed and lower-cased, plus the
/// whitespace-separated terms every visible item must contain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub terms: Vec<String>,
}

/// Whitespace as browsers define it for `\s`, which also covers the BOM.
fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim_matches(is_space).to_lowercase();
        let terms = text
            .split(is_space)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Self { text, terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

pub fn tag_match(item: &Item, active_tag: Option<&str>) -> bool {
    match active_tag {
        None => true,
        Some(tag) => item.has_tag(tag),
    }
}

/// Every term must appear in the precomputed search text (AND).
pub fn text_match(item: &Item, query: &Query) -> bool {
    query.terms.iter().all(|term| item.search_text.contains(term.as_str()))
}

pub fn is_visible(item: &Item, query: &Query, active_tag: Option<&str>) -> bool {
    tag_match(item, active_tag) && text_match(item, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::TraceRecord;

    fn item(text: &str, tags: &[&str]) -> Item {
        Item::render(&TraceRecord {
            title: text.to_string(),
            context: String::new(),
            solution: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            slug: None,
        })
    }

    #[test]
    fn test_parse_normalizes_whitespace_and_case() {
        let q = Query::parse("  Foo   Bar ");
        assert_eq!(q.text, "foo   bar");
        assert_eq!(q.terms, vec!["foo", "bar"]);
        assert_eq!(q.terms, Query::parse("foo bar").terms);
    }

    #[test]
    fn test_parse_treats_bom_as_whitespace() {
        let q = Query::parse("\u{feff}Kafka\u{feff}lag\u{feff}");
        assert_eq!(q.text, "kafka\u{feff}lag");
        assert_eq!(q.terms, vec!["kafka", "lag"]);
        assert!(Query::parse("\u{feff}").is_empty());
        assert!(text_match(&item("kafka consumer lag", &[]), &q));
    }

    #[test]
    fn test_empty_query_has_no_terms() {
        assert!(Query::parse("").is_empty());
        assert!(Query::parse(" \t ").is_empty());
        assert!(text_match(&item("anything", &[]), &Query::parse("   ")));
    }

    #[test]
    fn test_terms_are_and_combined() {
        let it = item("alpha beta", &[]);
        assert!(text_match(&it, &Query::parse("alpha beta")));
        assert!(text_match(&it, &Query::parse("BETA alp")));
        assert!(!text_match(&it, &Query::parse("alpha gamma")));
    }

    #[test]
    fn test_substring_match_without_tokenization() {
        let it = item("PostgreSQL connection pooling", &[]);
        assert!(text_match(&it, &Query::parse("gresql pool")));
    }

    #[test]
    fn test_visibility_is_and_of_predicates() {
        let items = [
            item("kafka consumer", &["go"]),
            item("kafka producer", &["python"]),
            item("redis cache", &["go"]),
            item("plain", &[]),
        ];
        let queries = ["", "kafka", "redis cache", "nothing"];
        let tags = [None, Some("go"), Some("python"), Some("rust")];
        for it in &items {
            for raw in queries {
                let q = Query::parse(raw);
                for tag in tags {
                    assert_eq!(
                        is_visible(it, &q, tag),
                        tag_match(it, tag) && text_match(it, &q)
                    );
                }
            }
        }
        assert!(is_visible(&items[0], &Query::parse("kafka"), Some("go")));
        assert!(!is_visible(&items[1], &Query::parse("kafka"), Some("go")));
    }
}
