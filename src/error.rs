//! Error types for loading catalog and editor configuration

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors that make a configuration unusable.
///
/// Any of these is fatal to catalog construction: a configuration that does
/// not match its schema is refused as a whole instead of being partially
/// applied.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Json {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("invalid TOML: {message}")]
    Toml { span: Option<Span>, message: String },

    #[error("schema violation at {path}: {message}")]
    Schema { path: String, message: String },
}

impl ConfigError {
    /// Create an I/O error for a file path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a schema violation error
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Locate the error in the source text, when the error carries a position
    pub fn span(&self, source: &str) -> Option<Span> {
        match self {
            ConfigError::Json { line, column, .. } => {
                let start = byte_offset(source, *line, *column);
                Some(start..(start + 1).min(source.len()))
            }
            ConfigError::Toml { span, .. } => span.clone(),
            ConfigError::Io { .. } | ConfigError::Schema { .. } => None,
        }
    }

    /// Format the error with source context using ariadne.
    ///
    /// Errors without a source position fall back to their plain message.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span(source) else {
            return self.to_string();
        };

        let message = match self {
            ConfigError::Json { message, .. } | ConfigError::Toml { message, .. } => {
                message.clone()
            }
            _ => self.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("malformed configuration")
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| self.to_string()),
            Err(_) => self.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Toml {
            span: err.span(),
            message: err.message().to_string(),
        }
    }
}

/// Convert a 1-based line/column pair into a byte offset, clamped to the source
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}
