//! Interactive filtering over stdin.
//!
//! All controller work happens on the calling thread. A helper thread only
//! forwards raw lines; the loop waits for either the next line or the
//! pending debounce deadline, whichever comes first.

use crate::controller::FilterController;
use crate::formatting::FormatContext;
use crate::page::Page;
use crate::query::Query;
use crate::render::render_page;
use std::error::Error;
use std::io::{BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// New content of the search box.
    Input(String),
    /// Click on a tag control.
    Tag(String),
    Clear,
    Quit,
}

/// A line starting with `/` is a command, except `//text` (search for
/// `/text`) and path-like words such as `/etc/hosts`, which are search text.
pub fn parse_line(line: &str) -> Result<SessionCommand, String> {
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(SessionCommand::Input(line.to_string()));
    };
    if rest.starts_with('/') {
        return Ok(SessionCommand::Input(rest.to_string()));
    }
    let (cmd, arg) = match rest.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None => (rest.trim(), ""),
    };
    if cmd.contains('/') {
        return Ok(SessionCommand::Input(line.to_string()));
    }
    match cmd {
        "tag" | "t" if !arg.is_empty() => Ok(SessionCommand::Tag(arg.to_string())),
        "tag" | "t" => Err("Usage: /tag <tag>".to_string()),
        "clear" => Ok(SessionCommand::Clear),
        "quit" | "q" => Ok(SessionCommand::Quit),
        other => Err(format!("Unknown command: /{other}")),
    }
}

pub struct Session<'a, W: Write> {
    controller: FilterController<Page>,
    out: W,
    ctx: &'a FormatContext,
    columns: usize,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(
        controller: FilterController<Page>,
        out: W,
        ctx: &'a FormatContext,
        columns: usize,
    ) -> Self {
        Self { controller, out, ctx, columns }
    }

    /// Drive the controller until `/quit` or end of input. A search pass
    /// still pending at end of input runs before returning.
    pub fn run<R>(mut self, reader: R) -> Result<FilterController<Page>, Box<dyn Error>>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<String>();
        thread::spawn(move || {
            for line in reader.lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        self.print_status()?;
        loop {
            let received = match self.controller.next_deadline() {
                Some(deadline) => {
                    rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(line) => {
                    if !self.handle_line(&line)? {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.controller.poll(Instant::now()) {
                        self.print_status()?;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("input closed");
                    break;
                }
            }
        }
        if self.controller.flush() {
            self.print_status()?;
        }
        Ok(self.controller)
    }

    fn handle_line(&mut self, line: &str) -> Result<bool, Box<dyn Error>> {
        match parse_line(line) {
            Ok(SessionCommand::Input(text)) => {
                self.controller.set_query(&text, Instant::now());
            }
            Ok(SessionCommand::Clear) => {
                self.controller.set_query("", Instant::now());
            }
            Ok(SessionCommand::Tag(tag)) => {
                if self.controller.select_tag(&tag) {
                    self.print_status()?;
                } else {
                    writeln!(
                        self.out,
                        "Unknown tag {tag}. Available: {}",
                        self.controller.known_tags().join(", ")
                    )?;
                }
            }
            Ok(SessionCommand::Quit) => return Ok(false),
            Err(msg) => writeln!(self.out, "{msg}")?,
        }
        Ok(true)
    }

    fn print_status(&mut self) -> Result<(), Box<dyn Error>> {
        let query = Query::parse(&self.controller.state().query);
        let view = render_page(self.controller.surface(), &query, self.ctx, self.columns);
        writeln!(self.out, "{view}\n")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::parse_snapshot;
    use std::io::Cursor;

    fn controller() -> FilterController<Page> {
        let snapshot = parse_snapshot(
            r#"[{"title": "Kafka lag", "tags": ["go"]},
                {"title": "Kafka schema registry", "tags": ["java"]},
                {"title": "Redis cache", "tags": ["python"]}]"#,
        )
        .unwrap();
        FilterController::attach(Page::from_snapshot(&snapshot, None)).unwrap()
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("kafka"), Ok(SessionCommand::Input("kafka".into())));
        assert_eq!(parse_line("/tag go"), Ok(SessionCommand::Tag("go".into())));
        assert_eq!(parse_line("/t  c++ "), Ok(SessionCommand::Tag("c++".into())));
        assert_eq!(parse_line("/clear"), Ok(SessionCommand::Clear));
        assert_eq!(parse_line("/quit"), Ok(SessionCommand::Quit));
        assert!(parse_line("/tag").is_err());
        assert!(parse_line("/nope").is_err());
    }

    #[test]
    fn test_parse_line_passes_paths_as_search_text() {
        assert_eq!(
            parse_line("/etc/hosts"),
            Ok(SessionCommand::Input("/etc/hosts".into()))
        );
        assert_eq!(
            parse_line("/api/v1 timeout"),
            Ok(SessionCommand::Input("/api/v1 timeout".into()))
        );
        assert_eq!(parse_line("//etc"), Ok(SessionCommand::Input("/etc".into())));
        assert_eq!(parse_line("//tag go"), Ok(SessionCommand::Input("/tag go".into())));
        assert_eq!(parse_line("/bogus"), Err("Unknown command: /bogus".to_string()));
    }

    #[test]
    fn test_run_flushes_pending_query_at_end_of_input() {
        let ctx = FormatContext::new(false);
        let mut out = Vec::new();
        let input = Cursor::new("kaf\nkafka\n".to_string());
        let c = Session::new(controller(), &mut out, &ctx, 80).run(input).unwrap();
        assert_eq!(c.state().query, "kafka");
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Showing all 3 traces\n"));
        assert!(text.contains("2 traces matching \"kafka\""));
    }

    #[test]
    fn test_run_searches_for_slash_text() {
        let ctx = FormatContext::new(false);
        let mut out = Vec::new();
        let input = Cursor::new("//Kafka\n".to_string());
        let c = Session::new(controller(), &mut out, &ctx, 80).run(input).unwrap();
        assert_eq!(c.state().query, "/Kafka");
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Unknown command"));
        assert!(text.contains("0 traces matching \"/kafka\""));
    }

    #[test]
    fn test_run_tag_toggle_and_unknown_tag() {
        let ctx = FormatContext::new(false);
        let mut out = Vec::new();
        let input = Cursor::new("/tag go\n/tag rust\n/tag go\n/quit\n/tag java\n".to_string());
        let c = Session::new(controller(), &mut out, &ctx, 80).run(input).unwrap();
        assert!(c.state().active_tag.is_none());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1 trace matching #go"));
        assert!(text.contains("URL: /browse/#go"));
        assert!(text.contains("Unknown tag rust. Available: go, java, python"));
        assert!(text.trim_end().ends_with("URL: /browse/"));
    }
}
