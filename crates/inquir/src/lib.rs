//! inquir: Interactive command-line prompting library
//!
//! This crate asks a user one or more questions on a terminal, collects
//! and validates the answers, and returns them to the calling program.
//! Questions live in named registries sharing one underlying store; the
//! prompt engine presents them sequentially, applying conditional-skip,
//! coercion, and validation handlers that may be synchronous or
//! asynchronous.
//!
//! # Features
//!
//! - **Async-first design** with Tokio: line reads, handler evaluation,
//!   and signal delivery are all uniform suspension points
//! - **Namespaced question registries** with stable, strictly increasing
//!   ids
//! - **Recoverable validation**: a rejected answer re-presents the same
//!   question instead of failing the session
//! - **Masked input** for secrets, rendering a mask glyph per keystroke
//! - **Completion sources**: fixed list, synchronous, or asynchronous
//! - **Interrupt handling** with a yes/no exit confirmation
//!
//! # Example
//!
//! ```ignore
//! use inquir::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let registry = Registry::named("setup");
//!     registry
//!         .add(Question::new("name").message("What is your name?"))
//!         .add(
//!             Question::new("age")
//!                 .message("How old are you?")
//!                 .kind(AnswerKind::Number),
//!         );
//!     let responses = registry.prompt().await?;
//!     println!("{} answers recorded", responses.len());
//!     Ok(())
//! }
//! ```

pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod line;
pub mod masked;
pub mod prelude;
pub mod question;
pub mod registry;
pub mod response;
pub mod signal;
pub mod style;

pub use completion::{Completer, CompletionSource};
pub use config::{DEFAULT_APP_NAME, DelimiterSpec, OptionsUpdate, SessionOptions};
pub use engine::Prompter;
pub use error::{PromptError, Result};
pub use line::{LineInterface, StdioLineInterface};
pub use masked::MaskedReader;
pub use question::{AnswerKind, Coercer, Condition, HandlerOutcome, Question, Validator};
pub use registry::{RegisteredQuestion, Registry, SharedStore, Store};
pub use response::{Response, Responses};
pub use signal::{DEFAULT_EVENTS, LifecycleEvent, SignalCoordinator};
pub use style::{StyleTag, Styler};
