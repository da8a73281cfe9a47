use std::error::Error;

pub struct ArgParser {
    iter: std::vec::IntoIter<String>,
    command_name: String,
}

impl ArgParser {
    pub fn new(args: Vec<String>, command_name: &str) -> Self {
        Self { iter: args.into_iter(), command_name: command_name.to_string() }
    }

    /// Extract a single tag from -t/--tag flag
    pub fn extract_tag(&mut self) -> Result<String, Box<dyn Error>> {
        match self.iter.next() {
            Some(v) => {
                let tag = crate::tags::normalize_tag(&v);
                if tag.is_empty() {
                    Err(format!("Invalid tag provided to {}", self.command_name)
                        .into())
                } else {
                    Ok(tag)
                }
            }
            None => Err(format!(
                "Provide a tag after -t/--tag for {}",
                self.command_name
            )
            .into()),
        }
    }

    /// Extract a string value for a flag
    pub fn extract_value(&mut self, flag: &str) -> Result<String, Box<dyn Error>> {
        self.iter.next().ok_or_else(|| {
            format!("Provide a value after {} for {}", flag, self.command_name)
                .into()
        })
    }

    /// Get next positional argument
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.iter.next()
    }
}

/// Flags shared by the filtering commands
#[derive(Default, Debug)]
pub struct CommonFlags {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub fragment: Option<String>,
    pub plain: bool,
    pub positional: Vec<String>,
}

/// Parse `-s/--search`, `-t/--tag`, `--fragment` and `--plain`; anything
/// else not starting with `-` is positional.
pub fn parse_common(
    args: Vec<String>,
    command_name: &str,
) -> Result<CommonFlags, Box<dyn Error>> {
    let mut flags = CommonFlags::default();
    let mut parser = ArgParser::new(args, command_name);
    while let Some(arg) = parser.next() {
        match arg.as_str() {
            "-s" | "--search" => flags.search = Some(parser.extract_value(&arg)?),
            "-t" | "--tag" => {
                if flags.tag.is_some() {
                    return Err(format!(
                        "Only one tag can be active for {command_name}"
                    )
                    .into());
                }
                flags.tag = Some(parser.extract_tag()?);
            }
            "--fragment" => {
                let raw = parser.extract_value(&arg)?;
                flags.fragment =
                    Some(crate::fragment::strip_hash(&raw).to_string());
            }
            "--plain" => flags.plain = true,
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(
                    format!("Unknown flag for {command_name}: {other}").into()
                );
            }
            other => flags.positional.push(other.to_string()),
        }
    }
    Ok(flags)
}
