//! Completion sources and the resolver that drives them.
//!
//! The source shape is a closed tagged variant selected explicitly at
//! configuration time: a fixed candidate list, a synchronous function of
//! the input line, or an asynchronous function whose failure is fatal to
//! that completion attempt (propagated, not swallowed).

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::Result;

type SyncSourceFn = dyn Fn(&str) -> Vec<String> + Send + Sync;
type AsyncSourceFn = dyn for<'a> Fn(&'a str) -> BoxFuture<'a, Result<Vec<String>>> + Send + Sync;

/// Where completion candidates come from.
#[derive(Clone, Default)]
pub enum CompletionSource {
    /// No completion configured.
    #[default]
    None,
    /// A fixed candidate list.
    Fixed(Vec<String>),
    /// A synchronous function of the input line.
    Sync(Arc<SyncSourceFn>),
    /// An asynchronous function of the input line.
    Async(Arc<AsyncSourceFn>),
}

impl CompletionSource {
    /// Build a fixed-list source.
    pub fn fixed<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fixed(candidates.into_iter().map(Into::into).collect())
    }

    /// Build a synchronous function source.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// Build an asynchronous function source.
    pub fn async_fn<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a str) -> BoxFuture<'a, Result<Vec<String>>> + Send + Sync + 'static,
    {
        Self::Async(Arc::new(f))
    }

    /// Check whether any completion behavior is configured.
    #[must_use]
    pub fn is_none(&self) -> bool {
        match self {
            Self::None => true,
            Self::Fixed(candidates) => candidates.is_empty(),
            Self::Sync(_) | Self::Async(_) => false,
        }
    }
}

impl fmt::Debug for CompletionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("CompletionSource::None"),
            Self::Fixed(candidates) => f.debug_tuple("CompletionSource::Fixed").field(candidates).finish(),
            Self::Sync(_) => f.write_str("CompletionSource::Sync(..)"),
            Self::Async(_) => f.write_str("CompletionSource::Async(..)"),
        }
    }
}

/// Produces the candidates matching an input line.
#[derive(Debug, Clone, Default)]
pub struct Completer {
    source: CompletionSource,
}

impl Completer {
    /// Create a completer over the given source.
    #[must_use]
    pub fn new(source: CompletionSource) -> Self {
        Self { source }
    }

    /// Resolve the candidates prefix-matching `line`.
    ///
    /// An absent source or empty fixed list yields no candidates. An
    /// asynchronous source error is propagated to the caller; it is fatal
    /// to this attempt only, not to the prompt session.
    pub async fn resolve(&self, line: &str) -> Result<Vec<String>> {
        let candidates = match &self.source {
            CompletionSource::None => return Ok(Vec::new()),
            CompletionSource::Fixed(candidates) => candidates.clone(),
            CompletionSource::Sync(f) => f(line),
            CompletionSource::Async(f) => f(line).await?,
        };
        Ok(filter_prefix(candidates, line))
    }
}

fn filter_prefix(candidates: Vec<String>, line: &str) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|c| c.starts_with(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    use crate::error::PromptError;

    #[tokio::test]
    async fn absent_source_yields_nothing() {
        let completer = Completer::new(CompletionSource::None);
        assert!(completer.resolve("a").await.expect("resolve").is_empty());

        let empty = Completer::new(CompletionSource::fixed(Vec::<String>::new()));
        assert!(empty.resolve("a").await.expect("resolve").is_empty());
    }

    #[tokio::test]
    async fn fixed_list_prefix_filtered() {
        let completer = Completer::new(CompletionSource::fixed(["add", "remove", "list"]));
        let matches = completer.resolve("a").await.expect("resolve");
        assert_eq!(matches, ["add"]);
    }

    #[tokio::test]
    async fn sync_function_source() {
        let completer = Completer::new(CompletionSource::sync(|_line| {
            vec!["alpha".to_string(), "beta".to_string()]
        }));
        let matches = completer.resolve("al").await.expect("resolve");
        assert_eq!(matches, ["alpha"]);
    }

    #[tokio::test]
    async fn async_function_source() {
        let completer = Completer::new(CompletionSource::async_fn(|_line| {
            async { Ok(vec!["alpha".to_string(), "always".to_string()]) }.boxed()
        }));
        let matches = completer.resolve("alw").await.expect("resolve");
        assert_eq!(matches, ["always"]);
    }

    #[tokio::test]
    async fn async_source_error_propagates() {
        let completer = Completer::new(CompletionSource::async_fn(|_line| {
            async { Err(PromptError::completion("backend unavailable")) }.boxed()
        }));
        let err = completer.resolve("x").await.expect_err("should fail");
        assert!(matches!(err, PromptError::Completion { .. }));
    }
}
