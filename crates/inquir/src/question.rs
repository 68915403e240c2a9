//! Question definitions and their attached handlers.
//!
//! Validate, coerce, and `when` handlers all follow one normalized
//! asynchronous contract: every invocation returns a boxed future, and
//! synchronous closures are wrapped to conform. This gives the prompt
//! engine a single uniform suspension point regardless of how a handler
//! was written.

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::response::Responses;

/// The kind of answer a question collects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKind {
    /// Free-form text (the default).
    #[default]
    String,
    /// A numeric answer, coerced to a JSON number.
    Number,
    /// A yes/no answer, coerced to a JSON boolean.
    Confirm,
}

/// The normalized result of a validate or `when` handler.
///
/// Handlers may return a boolean or a string; both are folded into a
/// truthiness test. A non-empty string is truthy, and doubles as the
/// message shown to the user when a validator rejects by other means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// A plain boolean verdict.
    Bool(bool),
    /// A textual verdict; truthy iff non-empty.
    Text(String),
}

impl HandlerOutcome {
    /// Normalize the outcome to a boolean.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// The textual payload, if the handler returned one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Bool(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

impl From<bool> for HandlerOutcome {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for HandlerOutcome {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for HandlerOutcome {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

type ConditionFn = dyn for<'a> Fn(&'a Responses) -> BoxFuture<'a, HandlerOutcome> + Send + Sync;
type ValidateFn =
    dyn for<'a> Fn(&'a Value, &'a Responses) -> BoxFuture<'a, HandlerOutcome> + Send + Sync;
type CoerceFn = dyn for<'a> Fn(&'a str, &'a Responses) -> BoxFuture<'a, Result<Value>> + Send + Sync;

/// A `when` handler deciding whether a question is presented at all.
pub struct Condition(Arc<ConditionFn>);

impl Condition {
    /// Wrap an asynchronous condition.
    pub fn new<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a Responses) -> BoxFuture<'a, HandlerOutcome> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap a synchronous condition returning a boolean or a string.
    pub fn sync<F, O>(f: F) -> Self
    where
        F: Fn(&Responses) -> O + Send + Sync + 'static,
        O: Into<HandlerOutcome>,
    {
        Self(Arc::new(move |responses| {
            let outcome = f(responses).into();
            async move { outcome }.boxed()
        }))
    }

    /// Evaluate the condition against the accumulated responses.
    pub async fn evaluate(&self, responses: &Responses) -> HandlerOutcome {
        (self.0)(responses).await
    }
}

impl Clone for Condition {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}

/// A validate handler judging a coerced answer.
pub struct Validator(Arc<ValidateFn>);

impl Validator {
    /// Wrap an asynchronous validator.
    pub fn new<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a Value, &'a Responses) -> BoxFuture<'a, HandlerOutcome>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap a synchronous validator returning a boolean or a string.
    pub fn sync<F, O>(f: F) -> Self
    where
        F: Fn(&Value, &Responses) -> O + Send + Sync + 'static,
        O: Into<HandlerOutcome>,
    {
        Self(Arc::new(move |answer, responses| {
            let outcome = f(answer, responses).into();
            async move { outcome }.boxed()
        }))
    }

    /// The always-true validator used when a question supplies none.
    #[must_use]
    pub fn always() -> Self {
        Self::sync(|_, _| true)
    }

    /// Run the validator against a coerced answer.
    pub async fn evaluate(&self, answer: &Value, responses: &Responses) -> HandlerOutcome {
        (self.0)(answer, responses).await
    }
}

impl Clone for Validator {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// A coerce handler transforming the raw typed answer into its value.
pub struct Coercer(Arc<CoerceFn>);

impl Coercer {
    /// Wrap an asynchronous coercer.
    pub fn new<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a str, &'a Responses) -> BoxFuture<'a, Result<Value>>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap a synchronous coercer.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&str, &Responses) -> Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(move |raw, responses| {
            let value = f(raw, responses);
            async move { value }.boxed()
        }))
    }

    /// Apply the coercer to a raw answer.
    pub async fn apply(&self, raw: &str, responses: &Responses) -> Result<Value> {
        (self.0)(raw, responses).await
    }
}

impl Clone for Coercer {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl fmt::Debug for Coercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Coercer(..)")
    }
}

/// A single prompt definition.
///
/// Owned by a [`Registry`](crate::registry::Registry) once added; replaced
/// wholesale on name overwrite, never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct Question {
    /// Unique name within a registry.
    pub name: String,
    /// Text shown to the user.
    pub message: String,
    /// Kind of answer collected.
    pub kind: AnswerKind,
    /// Value recorded when the user submits an empty line.
    pub default_value: Option<Value>,
    /// Whether input is read through the masked controller.
    pub masked: bool,
    /// Optional validation handler.
    pub validate: Option<Validator>,
    /// Optional coercion handler.
    pub coerce: Option<Coercer>,
    /// Optional conditional-skip handler.
    pub when: Option<Condition>,
}

impl Question {
    /// Create a new question with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the message shown to the user.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the answer kind.
    #[must_use]
    pub const fn kind(mut self, kind: AnswerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the default value recorded on empty input.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Flag the question for masked entry.
    #[must_use]
    pub const fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    /// Attach a validation handler.
    #[must_use]
    pub fn validate(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }

    /// Attach a coercion handler.
    #[must_use]
    pub fn coerce(mut self, coercer: Coercer) -> Self {
        self.coerce = Some(coercer);
        self
    }

    /// Attach a conditional-skip handler.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.when = Some(condition);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_truthiness() {
        assert!(HandlerOutcome::Bool(true).is_truthy());
        assert!(!HandlerOutcome::Bool(false).is_truthy());
        assert!(HandlerOutcome::Text("ok".into()).is_truthy());
        assert!(!HandlerOutcome::Text(String::new()).is_truthy());
    }

    #[test]
    fn outcome_message() {
        assert_eq!(HandlerOutcome::Bool(true).message(), None);
        assert_eq!(HandlerOutcome::Text("why".into()).message(), Some("why"));
    }

    #[test]
    fn question_builder() {
        let q = Question::new("age")
            .message("How old are you?")
            .kind(AnswerKind::Number)
            .default_value(30);

        assert_eq!(q.name, "age");
        assert_eq!(q.kind, AnswerKind::Number);
        assert_eq!(q.default_value, Some(Value::from(30)));
        assert!(!q.masked);
        assert!(q.validate.is_none());
    }

    #[tokio::test]
    async fn sync_validator_wrapped() {
        let v = Validator::sync(|answer: &Value, _: &Responses| {
            answer.as_str().is_some_and(|s| !s.is_empty())
        });
        let responses = Responses::default();
        assert!(v.evaluate(&Value::from("hi"), &responses).await.is_truthy());
        assert!(!v.evaluate(&Value::from(""), &responses).await.is_truthy());
    }

    #[tokio::test]
    async fn async_condition_wrapped() {
        let c = Condition::new(|responses: &Responses| {
            async move { HandlerOutcome::Bool(responses.is_empty()) }.boxed()
        });
        assert!(c.evaluate(&Responses::default()).await.is_truthy());
    }

    #[tokio::test]
    async fn default_validator_accepts_everything() {
        let v = Validator::always();
        let out = v.evaluate(&Value::Null, &Responses::default()).await;
        assert!(out.is_truthy());
    }
}
