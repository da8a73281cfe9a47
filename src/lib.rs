pub mod args;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod formatting;
pub mod fragment;
pub mod item;
pub mod messages;
pub mod page;
pub mod query;
pub mod render;
pub mod session;
pub mod shared;
pub mod tags;

use crate::args::{CommonFlags, parse_common};
use crate::controller::FilterController;
use crate::formatting::FormatContext;
use crate::item::{load_snapshot, snapshot_path};
use crate::page::Page;
use crate::query::Query;
use crate::render::{render_page, render_sidebar, render_trace};
use crate::session::Session;
use crate::shared::table::terminal_columns;
use crate::tags::{RELATED_LIMIT, related};
use std::env;
use std::error::Error;
use std::io::{self, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const LOG_FILTER_DEFAULT: &str = "trace_filter=warn";

/// Logs go to stderr so command output stays clean. `RUST_LOG` overrides
/// the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LOG_FILTER_DEFAULT));
    // A subscriber may already be installed (tests call this repeatedly).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

pub fn entry() -> Result<(), Box<dyn Error>> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_help();
        return Ok(());
    }

    let cmd = args.remove(0);
    let path = snapshot_path();

    match cmd.as_str() {
        "list" | "ls" => list_traces(args, &path)?,
        "tags" => list_tags(args, &path)?,
        "view" => view_trace(args, &path)?,
        "session" => run_session(args, &path)?,
        "path" => println!("{}", path.display()),
        "help" | "-h" | "--help" => print_help(),
        other => {
            eprintln!("Unknown command: {other}");
            print_help();
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        "\
Trace filter
Usage:
  tf list [-s|--search <text>] [-t|--tag <tag>] [--fragment <hash>] [--plain]
                                  Filter the trace list and show the result count and URL
  tf tags [--fragment <hash>]     Tag sidebar, most common first
  tf view <slug> [--plain]        Render one trace and up to 5 related traces
  tf session [--fragment <hash>]  Interactive filtering on stdin:
                                    <text>      replace the search text (150ms debounce)
                                    //<text>    search for text starting with '/'
                                                (path-like text such as /etc/hosts works as is)
                                    /tag <tag>  click a tag (again to clear)
                                    /clear      empty the search
                                    /quit       exit
  tf path                         Show the snapshot path
  tf help                         Show this message

Environment:
  TRACE_FILTER_SNAPSHOT           Snapshot JSON (default: ./seed_traces.json)
  NO_COLOR                        Disable colored output
  RUST_LOG                        Log filter (default: trace_filter=warn)
"
    );
}

fn format_context(flags: &CommonFlags) -> FormatContext {
    if flags.plain { FormatContext::new(false) } else { FormatContext::from_env() }
}

/// Load the page and attach the controller, then replay the search text and
/// tag click given on the command line. `None` when the page cannot host
/// the filter.
fn prepare(
    flags: &CommonFlags,
    path: &Path,
) -> Result<Option<FilterController<Page>>, Box<dyn Error>> {
    let snapshot = load_snapshot(path)?;
    let page = Page::from_snapshot(&snapshot, flags.fragment.as_deref());
    let Ok(mut controller) = FilterController::attach(page) else {
        return Ok(None);
    };

    if let Some(text) = &flags.search {
        controller.set_query(text, Instant::now());
        controller.flush();
    }
    if let Some(tag) = &flags.tag {
        if !controller.select_tag(tag) {
            return Err(format!("Unknown tag {tag}").into());
        }
    }
    Ok(Some(controller))
}

fn list_traces(args: Vec<String>, path: &Path) -> Result<(), Box<dyn Error>> {
    let flags = parse_common(args, "list")?;
    if let Some(extra) = flags.positional.first() {
        return Err(format!("Unexpected argument for list: {extra}").into());
    }
    let Some(controller) = prepare(&flags, path)? else {
        return Ok(());
    };
    let query = Query::parse(&controller.state().query);
    let ctx = format_context(&flags);
    println!(
        "{}",
        render_page(controller.surface(), &query, &ctx, terminal_columns())
    );
    Ok(())
}

fn list_tags(args: Vec<String>, path: &Path) -> Result<(), Box<dyn Error>> {
    let flags = parse_common(args, "tags")?;
    let Some(controller) = prepare(&flags, path)? else {
        return Ok(());
    };
    let page = controller.into_surface();
    if page.tag_links.is_empty() {
        println!("No tags found.");
        return Ok(());
    }
    println!("{}", render_sidebar(&page, &format_context(&flags)));
    Ok(())
}

fn view_trace(args: Vec<String>, path: &Path) -> Result<(), Box<dyn Error>> {
    let flags = parse_common(args, "view")?;
    let slug = flags
        .positional
        .first()
        .ok_or("Usage: tf view <slug> [--plain]")?;
    let snapshot = load_snapshot(path)?;
    let page = Page::from_snapshot(&snapshot, None);
    let items = || page.items().iter().map(|e| &e.item);
    let item = items()
        .find(|i| &i.slug == slug)
        .ok_or_else(|| format!("Trace {slug} not found"))?;
    let related = related(item, items(), RELATED_LIMIT);
    println!("{}", render_trace(item, &related, &format_context(&flags)));
    Ok(())
}

fn run_session(args: Vec<String>, path: &Path) -> Result<(), Box<dyn Error>> {
    let flags = parse_common(args, "session")?;
    let Some(controller) = prepare(&flags, path)? else {
        return Ok(());
    };
    let ctx = format_context(&flags);
    Session::new(controller, io::stdout(), &ctx, terminal_columns())
        .run(BufReader::new(io::stdin()))?;
    Ok(())
}
