//! Parser for the feedwatch configuration file.
//!
//! The file is a flat list of `option = value` entries with `#` comments:
//!
//! ```text
//! # feed to watch
//! url = "https://tracker.example.org/rss"
//! interval = 15
//! use-transmission = yes
//! patterns = {
//!     "ubuntu.*desktop-amd64"
//!     debian.*netinst
//! }
//! ```
//!
//! Values are either quoted (`"..."` or `'...'`, single line), braced
//! (`{ ... }`, may span lines) or a bare token. Parsing happens in two layers:
//!
//! - `lexer` turns the raw bytes into [`Entry`] values and reports
//!   structural problems as [`SyntaxError`]. These abort the whole load.
//! - `options` applies each entry to the [`Session`]. Bad values are logged
//!   and replaced by a fallback; they never stop the parse.
//!
//! A structural error does not roll back entries applied before it.
mod lexer;
mod options;
mod patterns;

pub use lexer::{Entry, Lexer, ValueKind};
pub use options::{apply, ConfigOption};
pub use patterns::{build_pattern_list, normalize, split, PatternError, PATTERN_DELIMITER};

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::session::Session;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Parse error at line {line}: {source}")]
    Syntax {
        line: usize,
        #[source]
        source: SyntaxError,
    },
}

/// Grammar violations that stop the parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("expected an option name")]
    EmptyOption,

    #[error("option name longer than {max} characters")]
    OptionTooLong { max: usize },

    #[error("option '{option}' needs a parameter")]
    MissingEquals { option: String },

    #[error("option '{option}' has a line break inside its quoted value")]
    NewlineInQuote { option: String },

    #[error("option '{option}' has no closing '{delimiter}'")]
    Unterminated { option: String, delimiter: char },

    #[error("option '{option}' has a parameter longer than {max} characters")]
    ValueTooLong { option: String, max: usize },
}

// ============================================================================
// Limits
// ============================================================================

/// Size ceilings applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserLimits {
    /// Longest accepted option name, in bytes.
    pub max_option_len: usize,
    /// Longest accepted raw value, in bytes. Also bounds the normalized
    /// pattern list.
    pub max_value_len: usize,
    /// Path options must be strictly shorter than this.
    pub max_path_len: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_option_len: 50,
            max_value_len: 2000,
            max_path_len: 4096,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Largest config file we are willing to read (1 MB).
const MAX_FILE_SIZE: u64 = 1_048_576;

/// Reads the file at `path` and applies its options to `session`.
///
/// - Missing file → `Err(ConfigError::NotFound)`
/// - File over 1 MB → `Err(ConfigError::TooLarge)`, nothing is read
/// - Malformed entry → `Err(ConfigError::Syntax)`, earlier entries stay applied
pub fn load(session: &mut Session, path: &Path) -> Result<(), ConfigError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_FILE_SIZE => {
            return Err(ConfigError::TooLarge(format!(
                "{} is {} bytes (max {} bytes)",
                path.display(),
                meta.len(),
                MAX_FILE_SIZE
            )));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(ConfigError::Io(e)),
        Ok(_) => {}
    }

    let content = match std::fs::read(path) {
        Ok(c) => c,
        // Deleted between metadata and read
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(ConfigError::Io(e)),
    };
    tracing::debug!(path = %path.display(), size = content.len(), "Read configuration file");

    parse_str(session, &content)?;
    tracing::info!(
        path = %path.display(),
        patterns = session.patterns.len(),
        interval = session.check_interval,
        "Loaded configuration"
    );
    Ok(())
}

/// Parses an in-memory configuration with the default [`ParserLimits`].
pub fn parse_str(session: &mut Session, input: &[u8]) -> Result<(), ConfigError> {
    parse_with_limits(session, input, &ParserLimits::default())
}

/// Parses an in-memory configuration, applying each entry as soon as it has
/// been scanned.
pub fn parse_with_limits(
    session: &mut Session,
    input: &[u8],
    limits: &ParserLimits,
) -> Result<(), ConfigError> {
    let mut lexer = Lexer::new(input, limits);
    while let Some(entry) = lexer.next() {
        match entry {
            Ok(entry) => apply(session, &entry, limits),
            Err(source) => {
                let line = lexer.entry_line();
                tracing::error!(line, error = %source, "Parse error in configuration");
                return Err(ConfigError::Syntax { line, source });
            }
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
