//! Namespaced, ordered question registries.
//!
//! All registries share one underlying store with composite
//! (namespace, name) keys, so multiple independent question sets coexist
//! in a process without extra bookkeeping. A [`Registry`] is a cheap
//! handle: the namespace plus a reference to the shared store.
//!
//! Every question receives a strictly increasing id on insertion,
//! starting at 0 per namespace. Ids are never reused: re-adding an
//! existing name replaces the stored definition but burns a fresh id.
//! Only destroying the namespace resets numbering.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::config::SessionOptions;
use crate::engine::Prompter;
use crate::error::Result;
use crate::question::Question;
use crate::response::Response;

/// A question together with its registry-assigned id.
#[derive(Debug, Clone)]
pub struct RegisteredQuestion {
    /// Stable id within the namespace, assigned in insertion order.
    pub id: u64,
    /// The stored definition.
    pub question: Arc<Question>,
}

#[derive(Debug)]
struct StoredEntry {
    namespace: String,
    name: String,
    id: u64,
    question: Arc<Question>,
}

/// The shared underlying store for every namespace.
#[derive(Debug, Default)]
pub struct Store {
    /// Entries in storage order (insertion order; overwrites keep their
    /// original position).
    entries: Vec<StoredEntry>,
    /// Next id per namespace.
    counters: HashMap<String, u64>,
}

/// A store shared between registry handles.
pub type SharedStore = Arc<Mutex<Store>>;

impl Store {
    /// Create a fresh shared store, isolated from the process-wide one.
    #[must_use]
    pub fn new_shared() -> SharedStore {
        Arc::new(Mutex::new(Self::default()))
    }

    /// The process-wide store used by [`Registry::named`].
    #[must_use]
    pub fn shared() -> SharedStore {
        static STORE: OnceLock<SharedStore> = OnceLock::new();
        Arc::clone(STORE.get_or_init(Store::new_shared))
    }

    fn last_id(&self, namespace: &str) -> Option<u64> {
        self.entries
            .iter()
            .filter(|e| e.namespace == namespace)
            .map(|e| e.id)
            .max()
    }
}

/// A named, isolated collection of question definitions sharing one id
/// space.
#[derive(Debug, Clone)]
pub struct Registry {
    namespace: String,
    store: SharedStore,
}

impl Registry {
    /// Acquire the registry for `namespace` on the process-wide store,
    /// creating it on first reference.
    #[must_use]
    pub fn named(namespace: impl Into<String>) -> Self {
        Self::with_store(namespace, Store::shared())
    }

    /// Acquire the registry for `namespace` on an explicit store.
    ///
    /// Tests use this to keep namespaces isolated from the process-wide
    /// store.
    #[must_use]
    pub fn with_store(namespace: impl Into<String>, store: SharedStore) -> Self {
        let registry = Self {
            namespace: namespace.into(),
            store,
        };
        // Re-acquisition seeds the counter from the highest id present so
        // numbering continues rather than restarting.
        let mut guard = registry.lock();
        if !guard.counters.contains_key(&registry.namespace) {
            let next = guard.last_id(&registry.namespace).map_or(0, |id| id + 1);
            guard.counters.insert(registry.namespace.clone(), next);
        }
        drop(guard);
        registry
    }

    /// This registry's namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Check whether a question with the given name is stored.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.lock()
            .entries
            .iter()
            .any(|e| e.namespace == self.namespace && e.name == name)
    }

    /// Look up a question by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<RegisteredQuestion> {
        self.lock()
            .entries
            .iter()
            .find(|e| e.namespace == self.namespace && e.name == name)
            .map(|e| RegisteredQuestion {
                id: e.id,
                question: Arc::clone(&e.question),
            })
    }

    /// Every question in this namespace, in storage order.
    ///
    /// Storage order is insertion order; for a registry that never
    /// overwrites a name this equals id order.
    #[must_use]
    pub fn get_all(&self) -> Vec<RegisteredQuestion> {
        self.lock()
            .entries
            .iter()
            .filter(|e| e.namespace == self.namespace)
            .map(|e| RegisteredQuestion {
                id: e.id,
                question: Arc::clone(&e.question),
            })
            .collect()
    }

    /// Look up a question by id. Returns `None` when absent, never an
    /// error.
    #[must_use]
    pub fn get_by_id(&self, id: u64) -> Option<RegisteredQuestion> {
        self.get_all().into_iter().find(|q| q.id == id)
    }

    /// Add a question definition, reading the name from it.
    ///
    /// A definition with no resolvable name is a logged no-op; the call
    /// still returns the registry handle for chaining. Re-adding an
    /// existing name replaces the stored definition and assigns a fresh
    /// id.
    pub fn add(&self, question: Question) -> &Self {
        if question.name.is_empty() {
            tracing::warn!(
                namespace = %self.namespace,
                "discarding question with no resolvable name"
            );
            return self;
        }
        let name = question.name.clone();
        self.insert(name, question);
        self
    }

    /// Add a question definition under an explicit name.
    pub fn add_named(&self, name: impl Into<String>, mut question: Question) -> &Self {
        let name = name.into();
        if name.is_empty() {
            tracing::warn!(
                namespace = %self.namespace,
                "discarding question with no resolvable name"
            );
            return self;
        }
        question.name.clone_from(&name);
        self.insert(name, question);
        self
    }

    /// Add a sequence of question definitions in order.
    pub fn add_all(&self, questions: impl IntoIterator<Item = Question>) -> &Self {
        for question in questions {
            self.add(question);
        }
        self
    }

    /// Remove a question by name. Absent names are logged no-ops.
    pub fn remove(&self, name: &str) -> &Self {
        let mut guard = self.lock();
        let before = guard.entries.len();
        guard
            .entries
            .retain(|e| !(e.namespace == self.namespace && e.name == name));
        if guard.entries.len() == before {
            tracing::warn!(
                namespace = %self.namespace,
                name,
                "remove target not found"
            );
        }
        drop(guard);
        self
    }

    /// Remove a question by id, resolving the current name first. Absent
    /// ids are logged no-ops.
    pub fn remove_by_id(&self, id: u64) -> &Self {
        match self.get_by_id(id) {
            Some(found) => {
                self.remove(&found.question.name);
            }
            None => {
                tracing::warn!(namespace = %self.namespace, id, "remove target not found");
            }
        }
        self
    }

    /// Remove every entry for this namespace and reset id numbering, so a
    /// subsequent add restarts at 0.
    pub fn destroy(&self) {
        let mut guard = self.lock();
        guard.entries.retain(|e| e.namespace != self.namespace);
        guard.counters.insert(self.namespace.clone(), 0);
    }

    /// The highest id currently present, or `None` when empty.
    #[must_use]
    pub fn last_id(&self) -> Option<u64> {
        self.lock().last_id(&self.namespace)
    }

    /// Number of questions in this namespace.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock()
            .entries
            .iter()
            .filter(|e| e.namespace == self.namespace)
            .count()
    }

    /// Check whether the namespace holds no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present every question in this registry on the process standard
    /// streams with default options, resolving with the ordered responses.
    pub async fn prompt(&self) -> Result<Vec<Response>> {
        self.prompt_with_options(SessionOptions::default()).await
    }

    /// Present every question with explicit session options.
    pub async fn prompt_with_options(&self, options: SessionOptions) -> Result<Vec<Response>> {
        let mut prompter = Prompter::stdio(options);
        prompter.run(self).await
    }

    /// Present every question and additionally invoke `callback` with the
    /// responses on success.
    pub async fn prompt_with<F>(&self, callback: F) -> Result<Vec<Response>>
    where
        F: FnOnce(&[Response]),
    {
        let responses = self.prompt().await?;
        callback(&responses);
        Ok(responses)
    }

    fn insert(&self, name: String, question: Question) {
        let mut guard = self.lock();
        let id = {
            let counter = guard.counters.entry(self.namespace.clone()).or_insert(0);
            let id = *counter;
            *counter += 1;
            id
        };
        let entry = StoredEntry {
            namespace: self.namespace.clone(),
            name: name.clone(),
            id,
            question: Arc::new(question),
        };
        let existing = guard
            .entries
            .iter_mut()
            .find(|e| e.namespace == self.namespace && e.name == name);
        match existing {
            // Overwrite keeps the storage position but burns a fresh id.
            Some(slot) => *slot = entry,
            None => guard.entries.push(entry),
        }
        tracing::debug!(namespace = %self.namespace, name, id, "question registered");
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolated(namespace: &str) -> Registry {
        Registry::with_store(namespace, Store::new_shared())
    }

    #[test]
    fn ids_assigned_in_insertion_order() {
        let registry = isolated("setup");
        registry
            .add(Question::new("host"))
            .add(Question::new("port"))
            .add(Question::new("user"));

        assert_eq!(registry.get("host").expect("host").id, 0);
        assert_eq!(registry.get("port").expect("port").id, 1);
        assert_eq!(registry.get("user").expect("user").id, 2);
        assert_eq!(registry.last_id(), Some(2));
    }

    #[test]
    fn overwrite_burns_a_fresh_id() {
        let registry = isolated("setup");
        registry.add(Question::new("host")).add(Question::new("port"));
        registry.add(Question::new("host").message("again"));

        let host = registry.get("host").expect("host");
        assert_eq!(host.id, 2);
        assert_eq!(host.question.message, "again");
        assert_eq!(registry.len(), 2);

        // Storage order keeps the original position, so get_all is no
        // longer id-sorted after an overwrite.
        let ids: Vec<_> = registry.get_all().iter().map(|q| q.id).collect();
        assert_eq!(ids, [2, 1]);
    }

    #[test]
    fn destroy_resets_numbering() {
        let registry = isolated("setup");
        registry.add(Question::new("a")).add(Question::new("b"));
        registry.destroy();

        assert!(registry.is_empty());
        assert_eq!(registry.last_id(), None);

        registry.add(Question::new("c"));
        assert_eq!(registry.get("c").expect("c").id, 0);
    }

    #[test]
    fn namespaces_are_isolated() {
        let store = Store::new_shared();
        let a = Registry::with_store("a", Arc::clone(&store));
        let b = Registry::with_store("b", Arc::clone(&store));

        a.add(Question::new("x").message("from a"));
        b.add(Question::new("x").message("from b"));

        assert_eq!(a.get("x").expect("a.x").question.message, "from a");
        assert_eq!(b.get("x").expect("b.x").question.message, "from b");
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);

        a.destroy();
        assert!(a.is_empty());
        assert!(b.exists("x"));
    }

    #[test]
    fn unnamed_question_is_a_noop() {
        let registry = isolated("setup");
        registry.add(Question::default()).add(Question::new("ok"));

        assert_eq!(registry.len(), 1);
        // The discarded definition did not burn an id.
        assert_eq!(registry.get("ok").expect("ok").id, 0);
    }

    #[test]
    fn remove_by_id_and_missing_targets() {
        let registry = isolated("setup");
        registry.add(Question::new("a")).add(Question::new("b"));

        registry.remove_by_id(0);
        assert!(!registry.exists("a"));
        assert!(registry.exists("b"));

        // Absent targets never panic or error.
        registry.remove("ghost").remove_by_id(99);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reacquisition_continues_numbering() {
        let store = Store::new_shared();
        {
            let registry = Registry::with_store("setup", Arc::clone(&store));
            registry.add(Question::new("a")).add(Question::new("b"));
        }
        // Simulate a dropped counter entry: a fresh handle must seed from
        // the highest id present, not restart at 0.
        store
            .lock()
            .expect("store lock")
            .counters
            .remove("setup");

        let registry = Registry::with_store("setup", store);
        registry.add(Question::new("c"));
        assert_eq!(registry.get("c").expect("c").id, 2);
    }

    #[test]
    fn add_named_overrides_definition_name() {
        let registry = isolated("setup");
        registry.add_named("renamed", Question::new("original"));

        assert!(registry.exists("renamed"));
        assert!(!registry.exists("original"));
    }

    #[test]
    fn get_by_id_absent_is_none() {
        let registry = isolated("setup");
        registry.add(Question::new("a"));
        assert!(registry.get_by_id(7).is_none());
    }
}
