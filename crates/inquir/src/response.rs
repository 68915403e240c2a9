//! Recorded prompt outcomes.

use serde::Serialize;
use serde_json::Value;

use crate::question::AnswerKind;

/// The recorded outcome of successfully presenting one question.
///
/// Created exactly once per presented question and immutable afterwards.
/// A failed validation attempt never produces a `Response`; the in-progress
/// candidate is discarded and the question re-presented.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Id of the source question within its registry.
    pub id: u64,
    /// Name of the source question.
    pub name: String,
    /// Answer kind of the source question.
    pub kind: AnswerKind,
    /// Echo of the question message.
    pub message: String,
    /// The post-coercion answer value.
    pub answer: Value,
    /// The pre-coercion answer exactly as typed.
    pub raw: String,
    /// Validation outcome; always `true` for a recorded response.
    pub valid: bool,
}

/// The ordered accumulation of responses for one prompt session.
///
/// Handlers receive a shared reference to this so `when`, `coerce`, and
/// `validate` can consult earlier answers.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Responses {
    items: Vec<Response>,
}

impl Responses {
    /// Create an empty accumulation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a response.
    pub fn push(&mut self, response: Response) {
        self.items.push(response);
    }

    /// Look up a response by question name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Response> {
        self.items.iter().find(|r| r.name == name)
    }

    /// The answer value for a question, if recorded.
    #[must_use]
    pub fn answer(&self, name: &str) -> Option<&Value> {
        self.get(name).map(|r| &r.answer)
    }

    /// The answer for a question as a string slice, if it is one.
    #[must_use]
    pub fn answer_str(&self, name: &str) -> Option<&str> {
        self.answer(name).and_then(Value::as_str)
    }

    /// Number of recorded responses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the responses in recording order.
    pub fn iter(&self) -> std::slice::Iter<'_, Response> {
        self.items.iter()
    }

    /// Consume the accumulation, yielding the ordered responses.
    #[must_use]
    pub fn into_vec(self) -> Vec<Response> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Responses {
    type Item = &'a Response;
    type IntoIter = std::slice::Iter<'a, Response>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: u64, name: &str, answer: Value) -> Response {
        Response {
            id,
            name: name.to_string(),
            kind: AnswerKind::String,
            message: format!("{name}?"),
            answer,
            raw: String::new(),
            valid: true,
        }
    }

    #[test]
    fn lookup_by_name() {
        let mut responses = Responses::new();
        responses.push(sample(0, "name", Value::from("Sam")));
        responses.push(sample(1, "age", Value::from(30)));

        assert_eq!(responses.len(), 2);
        assert_eq!(responses.answer_str("name"), Some("Sam"));
        assert_eq!(responses.answer("age"), Some(&Value::from(30)));
        assert!(responses.get("missing").is_none());
    }

    #[test]
    fn recording_order_preserved() {
        let mut responses = Responses::new();
        responses.push(sample(0, "a", Value::Null));
        responses.push(sample(1, "b", Value::Null));
        let names: Vec<_> = responses.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn serializes_as_list() {
        let mut responses = Responses::new();
        responses.push(sample(0, "a", Value::from("x")));
        let json = serde_json::to_value(&responses).expect("serialize");
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "a");
        assert_eq!(json[0]["kind"], "string");
    }
}
