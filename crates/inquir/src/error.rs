//! Error types for inquir.
//!
//! The taxonomy separates conditions that are fatal to a prompt session
//! (configuration errors, a closed line interface) from conditions the
//! engine resolves internally (validation rejections are never surfaced as
//! error values; the engine re-presents the question instead).

use thiserror::Error;

/// The main error type for inquir operations.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Invalid or incomplete session configuration.
    ///
    /// Raised synchronously before any session starts, never mid-session.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// The line interface is closed.
    ///
    /// Reading after close (or after EOF on the input stream) fails with
    /// this variant. Fatal to the session only, not to the process.
    #[error("line interface is closed")]
    Closed,

    /// The session was interrupted and the user confirmed the exit.
    ///
    /// Only observable when [`exit_on_interrupt`] is disabled; otherwise
    /// the process terminates before this value is constructed.
    ///
    /// [`exit_on_interrupt`]: crate::config::SessionOptions::exit_on_interrupt
    #[error("session interrupted by user")]
    Interrupted,

    /// An asynchronous completion source failed.
    ///
    /// Fatal to that completion attempt only; the session continues.
    #[error("completion source error: {message}")]
    Completion {
        /// Description of the completion failure.
        message: String,
    },

    /// A coerce handler failed to produce an answer value.
    #[error("handler error: {message}")]
    Handler {
        /// Description of the handler failure.
        message: String,
    },

    /// An I/O error occurred on the input or output stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O error occurred with additional context.
    #[error("{context}: {source}")]
    IoWithContext {
        /// What operation was being performed.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for inquir operations.
pub type Result<T> = std::result::Result<T, PromptError>;

impl PromptError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a completion source error.
    pub fn completion(message: impl Into<String>) -> Self {
        Self::Completion {
            message: message.into(),
        }
    }

    /// Create a handler error.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler {
            message: message.into(),
        }
    }

    /// Create an I/O error with context.
    pub fn io_context(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoWithContext {
            context: context.into(),
            source,
        }
    }

    /// Check if this error means the line interface is gone.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Check if this is a confirmed user interrupt.
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
