/*!
 * Error types for the docwai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised when a source document fails structural preconditions.
///
/// A document that fails validation is never sent to translation; the run
/// continues with the remaining documents.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// The document is empty or whitespace-only
    #[error("document is empty")]
    EmptyDocument,

    /// The document does not start with a front-matter delimiter line
    #[error("document must start with ---")]
    MissingOpeningDelimiter,

    /// No closing front-matter delimiter line was found
    #[error("document must contain a second --- on its own line")]
    MissingClosingDelimiter,

    /// Nothing follows the front-matter block
    #[error("document must have body text after the second ---")]
    EmptyBody,

    /// A front-matter line does not match the `name: value` shape
    #[error("front-matter line is not in \"name: value\" format: {line:?}")]
    MalformedHeaderLine {
        /// The offending header line
        line: String,
    },
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider returned an empty or unusable completion
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// The request did not complete within the configured timeout
    #[error("translation request timed out after {0} seconds")]
    Timeout(u64),
}

/// Reinjection-time validation failures.
///
/// Both variants signal that the masked/translated round trip was broken and
/// the restored document cannot be trusted. The caller recovers by copying
/// the original, untranslated document to the output location.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReinjectError {
    /// The restored document no longer starts with the front-matter delimiter
    #[error("corrupt header, restored document must start with --- (got {head:?})")]
    CorruptHeader {
        /// Leading excerpt of the restored text
        head: String,
    },

    /// A protection marker survived reinjection
    #[error("protection marker leaked into restored document near {excerpt:?}")]
    LeakedMarker {
        /// Excerpt of the text surrounding the leaked marker
        excerpt: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Source document failed structural validation
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Reinjection validation failed
    #[error("Reinjection error: {0}")]
    Reinject(#[from] ReinjectError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
