//! Property tests for the closure, normalization and increment.

use crate::common::builders::EntryBuilder;
use crate::common::fixtures::example_snapshot;
use directory_core::entry::Modification;
use directory_core::schema::SchemaRegistry;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

const CLASSES: &[&str] = &[
    "top",
    "person",
    "organizationalPerson",
    "inetOrgPerson",
    "residentialPerson",
    "employee",
    "loginTracking",
    "posixAccount",
    "shadowAccount",
    "extensibleObject",
    "uidObject",
];

/// Ancestors by a breadth-first walk, independent of the closure code.
fn ancestors(registry: &SchemaRegistry, name: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut queue = vec![name.to_string()];
    while let Some(current) = queue.pop() {
        let Some(class) = registry.lookup_object_class(&current) else {
            continue;
        };
        for superior in &class.superiors {
            let Some(superior) = registry.lookup_object_class(superior) else {
                continue;
            };
            if superior.name() != "top" && found.insert(superior.oid.clone()) {
                queue.push(superior.oid.clone());
            }
        }
    }
    found
}

fn class_names() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(CLASSES, 1..CLASSES.len()).prop_shuffle()
}

proptest! {
    #[test]
    fn closure_matches_graph_walk(name in prop::sample::select(CLASSES)) {
        let snapshot = example_snapshot();
        let registry = snapshot.registry();
        let class = registry.lookup_object_class(name).unwrap();
        let entry = snapshot.closure().get(&class.oid).unwrap();

        let superiors: BTreeSet<String> = entry.superiors.iter().cloned().collect();
        prop_assert_eq!(superiors.len(), entry.superiors.len());
        prop_assert_eq!(&superiors, &ancestors(registry, name));

        for superior in &entry.superiors {
            let inherited = snapshot.closure().get(superior).unwrap();
            prop_assert!(inherited.must.is_subset(&entry.must));
            prop_assert!(inherited.may.is_subset(&entry.may));
        }
    }

    #[test]
    fn normalization_is_idempotent(names in class_names()) {
        let snapshot = example_snapshot();
        let validator = snapshot.validator();
        let mut builder = EntryBuilder::person("Alice");
        builder = builder.with("objectClass", names.clone());
        let entry = builder.build();

        let once = validator.normalize_object_classes(&entry).unwrap();
        let twice = validator.normalize_object_classes(&once).unwrap();
        prop_assert_eq!(&once, &twice);

        let classes = once.object_classes();
        prop_assert_eq!(classes[0], "top");
        let mut seen = HashSet::new();
        for class in &classes {
            prop_assert!(seen.insert(class.to_lowercase()), "duplicate {}", class);
        }
        for name in &names {
            prop_assert!(once.has_object_class(name));
        }
    }

    #[test]
    fn increment_adds_operand(start in -1_000_000i64..1_000_000, step in -1_000i64..1_000) {
        let snapshot = example_snapshot();
        let entry = EntryBuilder::person("Alice")
            .object_classes(["employee", "loginTracking"])
            .with("badgeNumber", ["1"])
            .with("loginCount", [start])
            .build();

        let modified = snapshot
            .applier()
            .apply(&entry, &[Modification::increment("loginCount", step)])
            .unwrap();
        let expected = (start + step).to_string();
        let actual: Vec<&str> = modified.get("loginCount").unwrap().texts().collect();
        prop_assert_eq!(actual, vec![expected.as_str()]);
    }
}
