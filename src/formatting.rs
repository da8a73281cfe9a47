use yansi::Paint;

/// Color palette for consistent theming
pub struct ColorPalette {
    pub primary: (u8, u8, u8),   // slugs, muted text
    pub secondary: (u8, u8, u8), // headers, counts
    pub location: (u8, u8, u8),  // URL line
    pub highlight: (u8, u8, u8), // search matches
}

impl ColorPalette {
    pub const CATPPUCCIN: Self = Self {
        primary: (108, 112, 134),   // Gray
        secondary: (148, 226, 213), // Teal
        location: (137, 180, 250),  // Blue
        highlight: (243, 139, 168), // Pink
    };
}

/// Formatting context passed through rendering pipeline
pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool) -> Self {
        Self { use_color, palette: ColorPalette::CATPPUCCIN }
    }

    pub fn from_env() -> Self {
        let use_color = std::env::var("NO_COLOR").is_err();
        Self::new(use_color)
    }

    fn paint(&self, text: &str, (r, g, b): (u8, u8, u8), bold: bool) -> String {
        if !self.use_color {
            return text.to_string();
        }
        let painted = Paint::rgb(text, r, g, b);
        if bold { painted.bold().to_string() } else { painted.to_string() }
    }

    pub fn format_slug(&self, slug: &str) -> String {
        self.paint(slug, self.palette.primary, false)
    }

    pub fn format_header(&self, text: &str) -> String {
        self.paint(text, self.palette.secondary, true)
    }

    pub fn format_location(&self, href: &str) -> String {
        self.paint(href, self.palette.location, false)
    }

    pub fn format_tag(&self, tag: &str, active: bool) -> String {
        let label = format!("#{tag}");
        let label = if active { format!("[{label}]") } else { label };
        self.paint(&label, crate::tags::color_for_tag(tag), true)
    }

    pub fn format_tags<'a>(
        &self,
        tags: impl Iterator<Item = &'a str>,
        active: Option<&str>,
    ) -> String {
        tags.filter(|t| !t.is_empty())
            .map(|t| self.format_tag(t, Some(t) == active))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Paint every case-insensitive occurrence of any term. Overlapping
    /// matches extend the painted run.
    pub fn highlight_terms(&self, text: &str, terms: &[String]) -> String {
        if !self.use_color || terms.is_empty() {
            return text.to_string();
        }
        let chars: Vec<char> = text.chars().collect();
        let lowered: Vec<char> =
            chars.iter().map(|c| c.to_lowercase().next().unwrap_or(*c)).collect();
        let mut marked = vec![false; chars.len()];
        for term in terms {
            let needle: Vec<char> = term.chars().collect();
            if needle.is_empty() || needle.len() > lowered.len() {
                continue;
            }
            for start in 0..=lowered.len() - needle.len() {
                if lowered[start..start + needle.len()] == needle[..] {
                    marked[start..start + needle.len()].fill(true);
                }
            }
        }

        let mut out = String::new();
        let mut run = String::new();
        let mut in_match = false;
        for (ch, hit) in chars.iter().zip(marked) {
            if hit != in_match {
                self.flush_run(&mut out, &mut run, in_match);
                in_match = hit;
            }
            run.push(*ch);
        }
        self.flush_run(&mut out, &mut run, in_match);
        out
    }

    fn flush_run(&self, out: &mut String, run: &mut String, highlighted: bool) {
        if run.is_empty() {
            return;
        }
        if highlighted {
            out.push_str(&self.paint(run, self.palette.highlight, false));
        } else {
            out.push_str(run);
        }
        run.clear();
    }
}
