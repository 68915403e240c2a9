//! Integration tests for question registries and id assignment.

use inquir::{Question, Registry, Store};
use proptest::prelude::*;

fn isolated(namespace: &str) -> Registry {
    Registry::with_store(namespace, Store::new_shared())
}

#[test]
fn order_preservation() {
    let registry = isolated("setup");
    registry
        .add(Question::new("q0"))
        .add(Question::new("q1"))
        .add(Question::new("q2"));

    let names: Vec<_> = registry
        .get_all()
        .iter()
        .map(|q| q.question.name.clone())
        .collect();
    assert_eq!(names, ["q0", "q1", "q2"]);

    let ids: Vec<_> = registry.get_all().iter().map(|q| q.id).collect();
    assert_eq!(ids, [0, 1, 2]);
}

#[test]
fn namespace_isolation() {
    let store = Store::new_shared();
    let a = Registry::with_store("a", store.clone());
    let b = Registry::with_store("b", store);

    a.add(Question::new("x").message("for a"));
    b.add(Question::new("x").message("for b"));

    let from_a = a.get("x").expect("a.x");
    let from_b = b.get("x").expect("b.x");
    assert_eq!(from_a.question.message, "for a");
    assert_eq!(from_b.question.message, "for b");

    // Removing in one namespace leaves the other untouched.
    a.remove("x");
    assert!(!a.exists("x"));
    assert!(b.exists("x"));
}

#[test]
fn destroy_resets_numbering() {
    let registry = isolated("setup");
    registry.add(Question::new("a")).add(Question::new("b"));
    assert_eq!(registry.last_id(), Some(1));

    registry.destroy();
    assert_eq!(registry.last_id(), None);

    registry.add(Question::new("fresh"));
    assert_eq!(registry.get("fresh").expect("fresh").id, 0);
}

#[test]
fn bulk_registration_keeps_order() {
    let registry = isolated("setup");
    registry.add_all([
        Question::new("host"),
        Question::new("port"),
        Question::new("user"),
    ]);

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.get("user").expect("user").id, 2);
}

proptest! {
    /// Ids are strictly increasing by 1 from 0 for any add sequence
    /// without an intervening destroy, overwritten names included.
    #[test]
    fn id_monotonicity(names in proptest::collection::vec("[a-c]{1,2}", 1..32)) {
        let registry = Registry::with_store("prop", Store::new_shared());
        for (i, name) in names.iter().enumerate() {
            registry.add(Question::new(name.clone()));
            prop_assert_eq!(registry.last_id(), Some(i as u64));
        }
    }

    /// After a destroy the next add always restarts numbering at 0.
    #[test]
    fn destroy_always_restarts_at_zero(count in 1_usize..16) {
        let registry = Registry::with_store("prop", Store::new_shared());
        for i in 0..count {
            registry.add(Question::new(format!("q{i}")));
        }
        registry.destroy();
        registry.add(Question::new("restart"));
        prop_assert_eq!(registry.get("restart").expect("restart").id, 0);
    }
}
