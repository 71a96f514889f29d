//! Error types for the GLSL to Cg translator
//!
//! Every failure the pipeline can hit is a variant here, so a batch of files
//! can report each one against its path and keep going.

use std::fmt;
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;
use thiserror::Error;

/// Result type alias for translator operations
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Main error type for the translator
#[derive(Error, Debug)]
pub enum TranslateError {
    // === Input selection errors ===
    #[error("Unsupported shader extension '{extension}' for {}", .path.display())]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("Unknown shader kind: {0}")]
    InvalidShaderKind(String),

    // === IO errors ===
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", .path.display())]
    InvalidEncoding {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },

    // === Parse errors ===
    #[error("Malformed {qualifier} declaration: expected {expected}, found {}", describe_token(.found))]
    MalformedDeclaration {
        qualifier: String,
        expected: String,
        found: String,
    },

    #[error("Unexpected token in {context}: expected '{expected}', found {}", describe_token(.found))]
    UnexpectedToken {
        expected: String,
        found: String,
        context: String,
    },

    #[error("Unbalanced '{delimiter}' in function '{function}'")]
    UnbalancedBraces { function: String, delimiter: char },

    #[error("No 'main' function found")]
    MissingMainFunction,

    #[error("More than one 'main' function defined")]
    DuplicateMainFunction,

    // === Configuration errors ===
    #[error("Invalid pattern for rewrite rule '{rule}': {source}")]
    InvalidRewritePattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

fn describe_token(token: &str) -> String {
    if token.is_empty() {
        "end of input".to_string()
    } else {
        format!("'{}'", token)
    }
}

// Helper constructors for common error patterns
impl TranslateError {
    /// Create an IO error bound to the file it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an unsupported extension error
    pub fn unsupported_extension(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::UnsupportedExtension {
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
        }
    }

    /// Create a malformed declaration error
    pub fn malformed_declaration(
        qualifier: impl fmt::Display,
        expected: impl fmt::Display,
        found: impl fmt::Display,
    ) -> Self {
        Self::MalformedDeclaration {
            qualifier: qualifier.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Create an unexpected token error
    pub fn unexpected_token(
        expected: impl fmt::Display,
        found: impl fmt::Display,
        context: impl fmt::Display,
    ) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
            context: context.to_string(),
        }
    }

    /// Create an unbalanced delimiter error
    pub fn unbalanced(function: impl fmt::Display, delimiter: char) -> Self {
        Self::UnbalancedBraces {
            function: function.to_string(),
            delimiter,
        }
    }
}
