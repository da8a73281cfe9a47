use crate::formatting::FormatContext;
use crate::item::Item;
use crate::page::Page;
use crate::query::Query;
use crate::shared::table::{display_len, render_table, truncate_with_ellipsis};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use yansi::Paint;

pub const EMPTY_STATE_TEXT: &str = "No traces match your filters.";
const TITLE_MIN_WIDTH: usize = 20;

/// Terminal view of the trace list: count line, visible rows, empty state
/// and the address bar.
pub fn render_page(
    page: &Page,
    query: &Query,
    ctx: &FormatContext,
    columns: usize,
) -> String {
    let active = page.active_tags().first().copied();
    let visible: Vec<&Item> = page.visible_items().collect();

    let slug_width = visible.iter().map(|i| i.slug.chars().count()).max().unwrap_or(0);
    let tags_width = visible
        .iter()
        .map(|i| display_len(&FormatContext::new(false).format_tags(i.tags(), active)))
        .max()
        .unwrap_or(0);
    let title_width = columns
        .saturating_sub(slug_width + tags_width + 6)
        .max(TITLE_MIN_WIDTH);

    let rows: Vec<Vec<String>> = visible
        .iter()
        .map(|item| {
            let title = truncate_with_ellipsis(&item.title, title_width);
            vec![
                ctx.format_slug(&item.slug),
                ctx.highlight_terms(&title, &query.terms),
                ctx.format_tags(item.tags(), active),
            ]
        })
        .collect();

    let mut out: Vec<String> = Vec::new();
    if let Some(count) = &page.results_count {
        out.push(ctx.format_header(count));
    }
    if !rows.is_empty() {
        out.push(render_table(&rows));
    }
    if page.no_results == Some(true) {
        out.push(EMPTY_STATE_TEXT.to_string());
    }
    out.push(format!("URL: {}", ctx.format_location(&page.location.href())));
    out.join("\n")
}

/// Tag sidebar, most common first.
pub fn render_sidebar(page: &Page, ctx: &FormatContext) -> String {
    let rows: Vec<Vec<String>> = page
        .tag_links
        .iter()
        .map(|link| {
            vec![ctx.format_tag(&link.tag, link.active), link.count.to_string()]
        })
        .collect();
    render_table(&rows)
}

pub fn render_trace(item: &Item, related: &[&Item], ctx: &FormatContext) -> String {
    let mut out = String::new();
    out.push_str(&ctx.format_header(&format!("# {}", item.title)));
    out.push('\n');
    let tags = ctx.format_tags(item.tags(), None);
    if !tags.is_empty() {
        out.push_str(&tags);
        out.push('\n');
    }
    for (label, body) in [("Context", &item.context), ("Solution", &item.solution)] {
        if body.trim().is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(&ctx.format_header(&format!("## {label}")));
        out.push('\n');
        out.push_str(&render_markdown(body, ctx.use_color));
        out.push('\n');
    }
    if !related.is_empty() {
        out.push('\n');
        out.push_str(&ctx.format_header("## Related"));
        out.push('\n');
        for other in related {
            out.push_str(&format!("- {} ({})\n", other.title, ctx.format_slug(&other.slug)));
        }
    }
    out.trim_end().to_string()
}

#[derive(Clone, Copy)]
enum Style {
    Heading,
    Bullet,
    Rule,
    Code,
    Body,
}

pub fn render_markdown(input: &str, use_color: bool) -> String {
    let mut rendered = String::new();
    let mut list_depth: usize = 0;
    let mut in_code_block = false;

    for event in Parser::new(input) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                rendered.push('\n');
                let mark = match level {
                    HeadingLevel::H1 => "# ",
                    HeadingLevel::H2 => "## ",
                    HeadingLevel::H3 => "### ",
                    _ => "#### ",
                };
                push_styled(&mut rendered, mark, Style::Heading, use_color);
            }
            Event::End(TagEnd::Heading(_)) | Event::End(TagEnd::Paragraph) => {
                rendered.push('\n')
            }
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                rendered.push('\n');
            }
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
            }
            Event::Start(Tag::Item) => {
                rendered.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                push_styled(&mut rendered, "- ", Style::Bullet, use_color);
            }
            Event::End(TagEnd::Item) => {
                if !rendered.ends_with('\n') {
                    rendered.push('\n');
                }
            }
            Event::Text(t) => {
                let style = if in_code_block { Style::Code } else { Style::Body };
                push_styled(&mut rendered, &t, style, use_color)
            }
            Event::Code(t) => push_styled(&mut rendered, &t, Style::Code, use_color),
            Event::SoftBreak | Event::HardBreak => rendered.push('\n'),
            Event::Rule => {
                push_styled(&mut rendered, "\n---\n", Style::Rule, use_color);
            }
            Event::Html(t) => rendered.push_str(&t),
            _ => {}
        }
    }

    rendered.trim().to_string()
}

fn push_styled(buf: &mut String, text: &str, style: Style, use_color: bool) {
    if use_color {
        let painted = match style {
            Style::Heading => Paint::cyan(text).bold(),
            Style::Bullet => Paint::yellow(text).bold(),
            Style::Rule => Paint::new(text).dim(),
            Style::Code => Paint::blue(text),
            Style::Body => Paint::new(text),
        };
        buf.push_str(&painted.to_string());
    } else {
        buf.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::FilterController;
    use crate::item::{TraceRecord, parse_snapshot};

    #[test]
    fn test_render_markdown_plain() {
        let out = render_markdown(
            "## Steps\n\n- bump `max.poll.records`\n- restart\n\n```\nlag=0\n```",
            false,
        );
        assert!(out.starts_with("## Steps"));
        assert!(out.contains("- bump max.poll.records\n- restart"));
        assert!(out.contains("lag=0"));
    }

    #[test]
    fn test_render_trace_sections() {
        let item = Item::render(&TraceRecord {
            title: "Kafka lag".to_string(),
            context: "Consumers fall behind.".to_string(),
            solution: String::new(),
            tags: vec!["go".to_string()],
            slug: None,
        });
        let out = render_trace(&item, &[], &FormatContext::new(false));
        assert!(out.starts_with("# Kafka lag\n#go\n"));
        assert!(out.contains("## Context\nConsumers fall behind."));
        assert!(!out.contains("## Solution"));
        assert!(!out.contains("## Related"));
    }

    #[test]
    fn test_render_trace_related_section() {
        let record = |title: &str| TraceRecord {
            title: title.to_string(),
            context: "Body.".to_string(),
            solution: String::new(),
            tags: vec!["go".to_string()],
            slug: None,
        };
        let item = Item::render(&record("Kafka lag"));
        let other = Item::render(&record("Go modules"));
        let out = render_trace(&item, &[&other], &FormatContext::new(false));
        assert!(out.ends_with("## Related\n- Go modules (go-modules)"));
    }

    #[test]
    fn test_render_page_after_filtering() {
        let snapshot = parse_snapshot(
            r#"[{"title": "Kafka lag", "tags": ["go"]},
                {"title": "Redis cache", "tags": ["python"]}]"#,
        )
        .unwrap();
        let mut c =
            FilterController::attach(Page::from_snapshot(&snapshot, None)).unwrap();
        c.select_tag("go");
        let out = render_page(
            c.surface(),
            &Query::parse(""),
            &FormatContext::new(false),
            80,
        );
        assert_eq!(
            out,
            "1 trace matching #go\nkafka-lag | Kafka lag | [#go]\nURL: /browse/#go"
        );
    }

    #[test]
    fn test_render_page_empty_state() {
        let snapshot = parse_snapshot(r#"[{"title": "Kafka lag", "tags": ["go"]}]"#).unwrap();
        let mut c =
            FilterController::attach(Page::from_snapshot(&snapshot, None)).unwrap();
        c.set_query("redis", std::time::Instant::now());
        c.flush();
        let out = render_page(
            c.surface(),
            &Query::parse("redis"),
            &FormatContext::new(false),
            80,
        );
        assert_eq!(
            out,
            format!("0 traces matching \"redis\"\n{EMPTY_STATE_TEXT}\nURL: /browse/")
        );
    }

    #[test]
    fn test_render_sidebar_marks_active() {
        let snapshot = parse_snapshot(
            r#"[{"title": "a", "tags": ["go", "rust"]}, {"title": "b", "tags": ["go"]}]"#,
        )
        .unwrap();
        let page = Page::from_snapshot(&snapshot, Some("rust"));
        let c = FilterController::attach(page).unwrap();
        assert_eq!(
            render_sidebar(c.surface(), &FormatContext::new(false)),
            "#go     | 2\n[#rust] | 1"
        );
    }
}
