//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use inquir::prelude::*;
//! ```

pub use crate::completion::CompletionSource;
pub use crate::config::{DelimiterSpec, SessionOptions};
pub use crate::engine::Prompter;
pub use crate::error::{PromptError, Result};
pub use crate::question::{AnswerKind, Coercer, Condition, Question, Validator};
pub use crate::registry::Registry;
pub use crate::response::{Response, Responses};
pub use crate::style::StyleTag;
