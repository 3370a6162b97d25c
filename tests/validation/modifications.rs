//! Modify requests judged against the post-modification entry.

use crate::common::builders::EntryBuilder;
use crate::common::fixtures::{default_snapshot, example_snapshot};
use crate::common::{TestCoverage, ViolationKind};
use directory_core::entry::{Attribute, Entry, Modification, ModificationOperation, Value};
use directory_core::{SchemaSnapshot, SchemaViolation};

fn employee(snapshot: &SchemaSnapshot) -> Entry {
    let entry = EntryBuilder::person("Alice")
        .object_classes(["employee", "loginTracking"])
        .with("badgeNumber", ["42"])
        .with("loginCount", ["5"])
        .with("nickname", ["Ally"])
        .build();
    snapshot.check_entry(&entry).expect("employee fixture is valid")
}

fn texts(entry: &Entry, id: &str) -> Vec<String> {
    entry
        .get(id)
        .map(|attribute| attribute.texts().map(str::to_string).collect())
        .unwrap_or_default()
}

#[test]
fn test_modification_violation_kinds() {
    let snapshot = example_snapshot();
    let entry = employee(&snapshot);
    let applier = snapshot.applier();
    let mut coverage = TestCoverage::new();

    let cases: Vec<(ViolationKind, Vec<Modification>)> = vec![
        (
            ViolationKind::AttributeInUse,
            vec![Modification::add("nickname", ["ALLY"])],
        ),
        (
            ViolationKind::NoSuchAttribute,
            vec![Modification::remove("nickname", ["Al"])],
        ),
        (
            ViolationKind::NoSuchAttribute,
            vec![Modification::remove_all("mail")],
        ),
        (
            ViolationKind::IncrementOverflow,
            vec![Modification::increment("loginCount", i64::MAX)],
        ),
        (
            ViolationKind::IllegalModification,
            vec![Modification::increment("nickname", 1)],
        ),
        (
            ViolationKind::UnrecognizedAttribute,
            vec![Modification::replace("shoeSize", ["44"])],
        ),
    ];

    for (expected, modifications) in cases {
        let result = applier.apply(&entry, &modifications);
        match result {
            Err(violation) => {
                assert_eq!(
                    std::mem::discriminant(&violation),
                    std::mem::discriminant(&sample(expected)),
                    "{:?} raised {:?}",
                    modifications,
                    violation
                );
                coverage.mark_tested(expected);
            }
            Ok(modified) => panic!("{:?} should fail, got {:?}", modifications, modified),
        }
    }

    for kind in [
        ViolationKind::AttributeInUse,
        ViolationKind::NoSuchAttribute,
        ViolationKind::IncrementOverflow,
        ViolationKind::IllegalModification,
    ] {
        assert!(coverage.is_tested(kind), "{:?}", kind);
    }
}

fn sample(kind: ViolationKind) -> SchemaViolation {
    match kind {
        ViolationKind::AttributeInUse => SchemaViolation::AttributeInUse {
            attribute: String::new(),
            value: String::new(),
        },
        ViolationKind::NoSuchAttribute => SchemaViolation::no_such_attribute(""),
        ViolationKind::IncrementOverflow => SchemaViolation::IncrementOverflow {
            attribute: String::new(),
            increment: 0,
        },
        ViolationKind::IllegalModification => SchemaViolation::illegal_modification("", ""),
        _ => SchemaViolation::unrecognized(""),
    }
}

#[test]
fn test_increment_fixture_counter() {
    let snapshot = example_snapshot();
    let entry = employee(&snapshot);

    let modified = snapshot
        .check_modifications(&entry, &[Modification::increment("loginCount", 3)])
        .unwrap();
    assert_eq!(texts(&modified, "loginCount"), vec!["8"]);

    let modified = snapshot
        .check_modifications(&modified, &[Modification::increment("loginCount", -10)])
        .unwrap();
    assert_eq!(texts(&modified, "loginCount"), vec!["-2"]);

    // Absent attribute
    let reset = snapshot
        .check_modifications(&entry, &[Modification::remove_all("loginCount")])
        .unwrap();
    assert_violation!(
        snapshot.check_modifications(&reset, &[Modification::increment_by_one("loginCount")]),
        SchemaViolation::NoSuchAttribute { value: None, .. }
    );
}

#[test]
fn test_replace_table() {
    let snapshot = example_snapshot();
    let entry = employee(&snapshot);
    let applier = snapshot.applier();

    // Replace with values on an absent attribute adds it
    let added = applier
        .apply(&entry, &[Modification::replace("mail", ["alice@example.com"])])
        .unwrap();
    assert_eq!(texts(&added, "mail"), vec!["alice@example.com"]);

    // Replace with no values on an absent attribute is a no-op
    let unchanged = applier
        .apply(&entry, &[Modification::replace("mail", Vec::<String>::new())])
        .unwrap();
    assert_eq!(unchanged, entry);

    // Replace with no values removes a present attribute
    let removed = applier
        .apply(&entry, &[Modification::replace("nickname", Vec::<String>::new())])
        .unwrap();
    assert!(removed.get("nickname").is_none());

    // Replace swaps the value set wholesale
    let swapped = applier
        .apply(&entry, &[Modification::replace("nickname", ["Al", "Lissy"])])
        .unwrap();
    assert_eq!(texts(&swapped, "nickname"), vec!["Al", "Lissy"]);
}

#[test]
fn test_post_state_must_be_valid() {
    let snapshot = example_snapshot();
    let entry = employee(&snapshot);

    assert_violation!(
        snapshot.check_modifications(&entry, &[Modification::remove_all("badgeNumber")]),
        SchemaViolation::MissingMandatoryAttribute { .. }
    );
    assert_violation!(
        snapshot.check_modifications(&entry, &[Modification::add("badgeNumber", ["43"])]),
        SchemaViolation::MultiValuedSingleValueAttribute { .. }
    );
    assert_violation!(
        snapshot.check_modifications(&entry, &[Modification::add("uidNumber", ["1000"])]),
        SchemaViolation::AttributeNotAllowed { .. }
    );

    // Intermediate states may be invalid as long as the result is not
    let modified = snapshot
        .check_modifications(
            &entry,
            &[
                Modification::remove_all("badgeNumber"),
                Modification::add("badgeNumber", ["43"]),
            ],
        )
        .unwrap();
    assert_eq!(texts(&modified, "badgeNumber"), vec!["43"]);
}

#[test]
fn test_object_class_added_with_its_attributes() {
    let snapshot = default_snapshot();
    let entry = snapshot
        .check_entry(&EntryBuilder::inet_org_person("bob").build())
        .unwrap();

    let modifications = [
        Modification::add("objectClass", ["posixAccount"]),
        Modification::add("uidNumber", ["1000"]),
        Modification::add("gidNumber", ["100"]),
        Modification::add("homeDirectory", ["/home/bob"]),
    ];
    let modified = snapshot.check_modifications(&entry, &modifications).unwrap();
    assert!(modified.has_object_class("posixAccount"));

    // Without the attributes posixAccount requires
    assert_violation!(
        snapshot.check_modifications(&entry, &modifications[..1]),
        SchemaViolation::MissingMandatoryAttribute { .. }
    );
}

#[test]
fn test_failed_request_leaves_entry_untouched() {
    let snapshot = example_snapshot();
    let entry = employee(&snapshot);
    let original = entry.clone();

    let result = snapshot.check_modifications(
        &entry,
        &[
            Modification::replace("nickname", ["Changed"]),
            Modification::remove("nickname", ["Missing"]),
        ],
    );
    assert!(result.is_err());
    assert_eq!(entry, original);
}

#[test]
fn test_modifications_resolve_aliases() {
    let snapshot = default_snapshot();
    let entry = snapshot
        .check_entry(&EntryBuilder::person("Alice").with("sn", ["Smith", "Jones"]).build())
        .unwrap();

    let modified = snapshot
        .check_modifications(&entry, &[Modification::remove("surname", ["SMITH"])])
        .unwrap();
    assert_eq!(texts(&modified, "sn"), vec!["Jones"]);

    // Removing the last value drops the attribute, which sn cannot allow
    assert_violation!(
        snapshot.check_modifications(&modified, &[Modification::remove("sn", ["jones"])]),
        SchemaViolation::MissingMandatoryAttribute { .. }
    );
}

#[test]
fn test_increment_operand_must_be_integer() {
    let snapshot = example_snapshot();
    let entry = employee(&snapshot);
    let bad_operand = Modification::new(
        ModificationOperation::Increment,
        Attribute::new("loginCount", [Value::text("lots")]),
    );
    assert_violation!(
        snapshot.applier().apply(&entry, &[bad_operand]),
        SchemaViolation::IllegalModification { .. }
    );
}

#[test]
fn test_modifications_see_every_alias_of_a_type() {
    let snapshot = example_snapshot();
    let entry = EntryBuilder::person("Alice")
        .object_classes(["employee"])
        .with("badgeNumber", ["42"])
        .with("nickname", ["Ally"])
        .with("alias-name", ["Al"])
        .build();

    let modified = snapshot
        .check_modifications(&entry, &[Modification::remove("nickname", ["Al"])])
        .expect("value held under the other alias is removable");
    assert_eq!(texts(&modified, "nickname"), vec!["Ally"]);

    let employee = employee(&snapshot);
    let second_badge = Modification::add("1.3.6.1.4.1.99999.1.1", ["43"]);
    assert!(matches!(
        snapshot.check_modifications(&employee, &[second_badge]),
        Err(SchemaViolation::MultiValuedSingleValueAttribute { count: 2, .. })
    ));
}
