/*!
 * Error types for the locadapt engine.
 *
 * This module contains custom error types for the three core subsystems,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Propagation policy: primary-path errors (segment translation, canonical
 * snapshot persistence) surface to the caller; secondary enrichment paths
 * (TM promotion, deep analysis, approval bookkeeping) absorb their errors
 * locally and only log them.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when calling the generative translation service
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

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors surfaced by the TM leverage engine's primary translate path
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The generative call failed or returned empty text. Recoverable by
    /// retry; the segment's stored state is left untouched.
    #[error("Translation unavailable: {0}")]
    Unavailable(String),

    /// Source text was empty, nothing to translate
    #[error("Source text is empty for segment {0}")]
    EmptySource(String),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl TranslationError {
    /// Whether a retry of the same call could reasonably succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::Unavailable(_) => true,
            TranslationError::EmptySource(_) => false,
            TranslationError::Provider(p) => !matches!(
                p,
                ProviderError::AuthenticationError(_) | ProviderError::ParseError(_)
            ),
        }
    }
}

/// Errors from the adaptation workflow state machine.
///
/// These are rejected synchronously and never mutate workflow state;
/// they indicate a caller/UI programming error, not an environmental one.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A phase was completed before its predecessors
    #[error("Phase {attempted} cannot be completed while phase {current} is still in progress")]
    PhaseOutOfOrder {
        /// Phase number the caller attempted to complete
        attempted: u8,
        /// The project's current phase
        current: u8,
    },

    /// Phase number outside 1..=7
    #[error("Invalid phase number: {0}")]
    InvalidPhase(u8),

    /// The outcome payload does not belong to the phase being completed
    #[error("Outcome for phase {outcome_phase} supplied when completing phase {attempted}")]
    OutcomeMismatch {
        /// Phase number being completed
        attempted: u8,
        /// Phase the supplied outcome actually belongs to
        outcome_phase: u8,
    },
}

/// Errors from the autosave/persistence controller
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The primary snapshot save failed after exhausting all retries.
    /// In-memory data is kept; the next debounce cycle or a force-save
    /// retries from scratch.
    #[error("Autosave failed after {attempts} attempts: {message}")]
    RetriesExhausted {
        /// Total attempts made
        attempts: u32,
        /// Last underlying error
        message: String,
    },

    /// A storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Snapshot serialization failed
    #[error("Failed to serialize snapshot: {0}")]
    Serialization(String),
}

/// Main engine error type that wraps all subsystem errors
#[derive(Error, Debug)]
pub enum AdaptationError {
    /// Error from the translation path
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the workflow state machine
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Error from the persistence controller
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AdaptationError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AdaptationError {
    fn from(error: std::io::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
