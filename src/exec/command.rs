// src/exec/command.rs

//! Command template parsing and substitution.
//!
//! A template is a list of tokens. Each token is literal text with zero or
//! more named placeholders:
//!
//! ```toml
//! command = ["{path}", "{api_key}", "--id={unique_id}"]
//! ```
//!
//! `{{` and `}}` produce literal braces. Building a command yields both the
//! argv handed to the launcher and a display string for the console, in which
//! the API key is replaced by [`REDACTED_API_KEY`].

use std::fmt;

use crate::config::RunConfiguration;
use crate::errors::{HarnessError, Result};

/// Marker shown in place of the API key wherever a command is displayed.
pub const REDACTED_API_KEY: &str = "<API_KEY>";

/// Named values a template can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Path,
    ApiKey,
    UniqueId,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "path" => Some(Placeholder::Path),
            "api_key" => Some(Placeholder::ApiKey),
            "unique_id" => Some(Placeholder::UniqueId),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Placeholder::Path => "path",
            Placeholder::ApiKey => "api_key",
            Placeholder::UniqueId => "unique_id",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Value(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    segments: Vec<Segment>,
}

impl Token {
    fn parse(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(HarnessError::ConfigError(format!(
                            "unterminated placeholder in command token '{raw}'"
                        )));
                    }
                    let placeholder = Placeholder::from_name(name.trim()).ok_or_else(|| {
                        HarnessError::ConfigError(format!(
                            "unknown placeholder '{{{name}}}' in command token '{raw}' \
                             (expected {{path}}, {{api_key}} or {{unique_id}})"
                        ))
                    })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Value(placeholder));
                }
                '}' => {
                    return Err(HarnessError::ConfigError(format!(
                        "unmatched '}}' in command token '{raw}'"
                    )));
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() || segments.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    fn mentions(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Value(p) if *p == placeholder))
    }

    fn render(&self, config: &RunConfiguration, redact: bool) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Value(Placeholder::Path) => out.push_str(&config.path.to_string_lossy()),
                Segment::Value(Placeholder::ApiKey) if redact => out.push_str(REDACTED_API_KEY),
                Segment::Value(Placeholder::ApiKey) => out.push_str(&config.api_key),
                Segment::Value(Placeholder::UniqueId) => out.push_str(&config.unique_id),
            }
        }
        out
    }
}

/// Parsed command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    tokens: Vec<Token>,
}

impl CommandTemplate {
    /// Parse raw template tokens, rejecting unknown or malformed placeholders.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        if raw.is_empty() {
            return Err(HarnessError::ConfigError(
                "command template must contain at least one token".to_string(),
            ));
        }
        if raw[0].as_ref().trim().is_empty() {
            return Err(HarnessError::ConfigError(
                "first command token (the program) must not be empty".to_string(),
            ));
        }

        let tokens = raw
            .iter()
            .map(|t| Token::parse(t.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { tokens })
    }

    /// Whether any token refers to `placeholder`.
    pub fn mentions(&self, placeholder: Placeholder) -> bool {
        self.tokens.iter().any(|t| t.mentions(placeholder))
    }

    /// Substitute the run configuration into the template and append the
    /// extra program arguments.
    pub fn build(&self, config: &RunConfiguration) -> CommandLine {
        let argv: Vec<String> = self
            .tokens
            .iter()
            .map(|t| t.render(config, false))
            .chain(config.program_args.iter().cloned())
            .collect();

        let display = self
            .tokens
            .iter()
            .map(|t| t.render(config, true))
            .chain(config.program_args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");

        CommandLine { argv, display }
    }
}

impl Default for CommandTemplate {
    fn default() -> Self {
        let tokens = [Placeholder::Path, Placeholder::ApiKey, Placeholder::UniqueId]
            .into_iter()
            .map(|p| Token {
                segments: vec![Segment::Value(p)],
            })
            .collect();
        Self { tokens }
    }
}

/// A fully substituted command.
///
/// `Debug` only shows the redacted form so the API key never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandLine {
    argv: Vec<String>,
    display: String,
}

impl CommandLine {
    /// The argument vector to launch, carrying the real API key.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The command as shown on the console, API key redacted.
    pub fn display(&self) -> &str {
        &self.display
    }
}

impl fmt::Debug for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandLine")
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}
