//! Entry validation, one case per violation kind the validator can raise.

use crate::common::builders::{EntryBuilder, PEOPLE};
use crate::common::fixtures::{default_snapshot, example_snapshot};
use crate::common::{TestCoverage, ViolationKind};
use directory_core::entry::{Entry, Value};
use directory_core::{SchemaSnapshot, SchemaViolation};

fn check(snapshot: &SchemaSnapshot, builder: EntryBuilder) -> Result<Entry, SchemaViolation> {
    snapshot.check_entry(&builder.build())
}

fn kind_of(violation: &SchemaViolation) -> ViolationKind {
    match violation {
        SchemaViolation::UnrecognizedAttribute { .. } => ViolationKind::UnrecognizedAttribute,
        SchemaViolation::UnknownObjectClass { .. } => ViolationKind::UnknownObjectClass,
        SchemaViolation::MissingStructuralObjectClass { .. } => {
            ViolationKind::MissingStructuralObjectClass
        }
        SchemaViolation::ConflictingStructuralObjectClasses { .. } => {
            ViolationKind::ConflictingStructuralObjectClasses
        }
        SchemaViolation::MissingMandatoryAttribute { .. } => ViolationKind::MissingMandatoryAttribute,
        SchemaViolation::MultiValuedSingleValueAttribute { .. } => {
            ViolationKind::MultiValuedSingleValueAttribute
        }
        SchemaViolation::AttributeNotAllowed { .. } => ViolationKind::AttributeNotAllowed,
        SchemaViolation::InvalidAttributeSyntax { .. } => ViolationKind::InvalidAttributeSyntax,
        SchemaViolation::RdnAttributeMissing { .. } => ViolationKind::RdnAttributeMissing,
        SchemaViolation::AttributeInUse { .. } => ViolationKind::AttributeInUse,
        SchemaViolation::NoSuchAttribute { .. } => ViolationKind::NoSuchAttribute,
        SchemaViolation::IncrementOverflow { .. } => ViolationKind::IncrementOverflow,
        SchemaViolation::IllegalModification { .. } => ViolationKind::IllegalModification,
        SchemaViolation::NoPermissionOnOperationalAttribute { .. } => {
            ViolationKind::NoPermissionOnOperationalAttribute
        }
        SchemaViolation::NotAllowedOnRdn { .. } => ViolationKind::NotAllowedOnRdn,
        SchemaViolation::ObjectClassModification { .. } => ViolationKind::ObjectClassModification,
    }
}

#[test]
fn test_every_entry_violation_kind() {
    let snapshot = example_snapshot();
    let cases = [
        (
            ViolationKind::UnrecognizedAttribute,
            EntryBuilder::person("Alice").with("favouriteColour", ["blue"]),
        ),
        (
            ViolationKind::UnknownObjectClass,
            EntryBuilder::person("Alice").object_classes(["person", "wizard"]),
        ),
        (
            ViolationKind::MissingStructuralObjectClass,
            EntryBuilder::new(&format!("uid=bob,{}", PEOPLE))
                .object_classes(["uidObject"])
                .with("uid", ["bob"]),
        ),
        (
            ViolationKind::ConflictingStructuralObjectClasses,
            EntryBuilder::person("Alice")
                .object_classes(["person", "account"])
                .with("uid", ["alice"]),
        ),
        (
            ViolationKind::MissingMandatoryAttribute,
            EntryBuilder::person("Alice").without("sn"),
        ),
        (
            ViolationKind::MultiValuedSingleValueAttribute,
            EntryBuilder::inet_org_person("carol").with("displayName", ["Carol", "Caz"]),
        ),
        (
            ViolationKind::AttributeNotAllowed,
            EntryBuilder::person("Alice").with("mail", ["alice@example.com"]),
        ),
        (
            ViolationKind::InvalidAttributeSyntax,
            EntryBuilder::posix_user("dave", 1000).with("uidNumber", ["one thousand"]),
        ),
        (
            ViolationKind::RdnAttributeMissing,
            EntryBuilder::person("Alice").with("cn", ["Alicia"]),
        ),
    ];

    let mut coverage = TestCoverage::new();
    for (expected, builder) in cases {
        let dn = builder.dn();
        let violation = check(&snapshot, builder).expect_err(&format!("{:?} should fail", expected));
        assert_eq!(kind_of(&violation), expected, "{} raised {:?}", dn, violation);
        coverage.mark_tested(expected);
    }

    for kind in [
        ViolationKind::UnrecognizedAttribute,
        ViolationKind::MissingMandatoryAttribute,
        ViolationKind::RdnAttributeMissing,
    ] {
        assert!(coverage.is_tested(kind));
    }
    // The remaining kinds come from modify requests and the schema stage
    assert_eq!(coverage.untested().len(), ViolationKind::ALL.len() - 9);
}

#[test]
fn test_inet_org_person_lists_every_missing_attribute() {
    let snapshot = default_snapshot();
    let entry = EntryBuilder::new(&format!("uid=jdoe,{}", PEOPLE))
        .object_classes(["inetOrgPerson"])
        .with("uid", ["jdoe"]);

    match check(&snapshot, entry) {
        Err(SchemaViolation::MissingMandatoryAttribute { dn, attributes }) => {
            assert_eq!(dn, format!("uid=jdoe,{}", PEOPLE));
            assert_eq!(attributes, vec!["cn", "sn"]);
        }
        other => panic!("Expected MissingMandatoryAttribute, got {:?}", other),
    }
}

#[test]
fn test_normalization_closes_object_classes() {
    let snapshot = example_snapshot();
    let entry = EntryBuilder::person("Erin")
        .object_classes(["employee", "loginTracking"])
        .with("badgeNumber", ["42"])
        .with("loginCount", ["0"]);

    let normalized = check(&snapshot, entry).expect("employee is valid");
    assert_eq!(
        normalized.object_classes(),
        vec!["top", "employee", "person", "loginTracking"]
    );
}

#[test]
fn test_object_class_values_are_case_insensitive() {
    let snapshot = default_snapshot();
    let normalized = check(
        &snapshot,
        EntryBuilder::person("Alice").object_classes(["PERSON", "Top", "person"]),
    )
    .unwrap();
    assert_eq!(normalized.object_classes(), vec!["top", "person"]);
}

#[test]
fn test_extensible_object_admits_any_known_attribute() {
    let snapshot = default_snapshot();
    let entry = EntryBuilder::person("Alice")
        .object_classes(["person", "extensibleObject"])
        .with("mail", ["alice@example.com"])
        .with("uidNumber", ["1001"]);
    assert!(check(&snapshot, entry).is_ok());

    // Unknown attributes stay unknown
    let entry = EntryBuilder::person("Alice")
        .object_classes(["person", "extensibleObject"])
        .with("favouriteColour", ["blue"]);
    assert_violation!(
        check(&snapshot, entry),
        SchemaViolation::UnrecognizedAttribute { .. }
    );
}

#[test]
fn test_inherited_structural_classes_do_not_conflict() {
    let snapshot = example_snapshot();
    let entry = EntryBuilder::person("Frank")
        .object_classes(["person", "organizationalPerson", "employee"])
        .with("badgeNumber", ["7"]);
    assert!(check(&snapshot, entry).is_ok());
}

#[test]
fn test_conflict_names_both_classes() {
    let snapshot = example_snapshot();
    let entry = EntryBuilder::inet_org_person("gina")
        .object_classes(["inetOrgPerson", "employee"])
        .with("badgeNumber", ["9"]);
    match check(&snapshot, entry) {
        Err(SchemaViolation::ConflictingStructuralObjectClasses { object_classes, .. }) => {
            assert!(object_classes.contains(&"inetOrgPerson".to_string()));
            assert!(object_classes.contains(&"employee".to_string()));
        }
        other => panic!("Expected ConflictingStructuralObjectClasses, got {:?}", other),
    }
}

#[test]
fn test_attribute_aliases_satisfy_must() {
    let snapshot = default_snapshot();
    let entry = EntryBuilder::new(&format!("cn=Hana,{}", PEOPLE))
        .object_classes(["person"])
        .with("commonName", ["Hana"])
        .with("surname", ["Ito"]);
    assert!(check(&snapshot, entry).is_ok());
}

#[test]
fn test_alias_name_with_hyphen() {
    let snapshot = example_snapshot();
    let entry = EntryBuilder::person("Ivan")
        .object_classes(["employee"])
        .with("badgeNumber", ["3"])
        .with("alias-name", ["Vanya"]);
    assert!(check(&snapshot, entry).is_ok());
}

#[test]
fn test_single_valued_integer_from_fixture() {
    let snapshot = example_snapshot();
    let entry = EntryBuilder::person("Jay")
        .object_classes(["employee"])
        .with("badgeNumber", ["1", "2"]);
    assert_violation!(
        check(&snapshot, entry),
        SchemaViolation::MultiValuedSingleValueAttribute { count: 2, .. }
    );

    let entry = EntryBuilder::person("Jay")
        .object_classes(["employee"])
        .with("badgeNumber", ["12a"]);
    assert_violation!(
        check(&snapshot, entry),
        SchemaViolation::InvalidAttributeSyntax { .. }
    );
}

#[test]
fn test_binary_values_for_octet_string() {
    let snapshot = default_snapshot();
    let entry = EntryBuilder::person("Kim").with_binary("userPassword", &[0xde, 0xad, 0xbe, 0xef]);
    let normalized = check(&snapshot, entry).unwrap();
    let password = normalized.get("userPassword").unwrap();
    assert!(matches!(password.values()[0], Value::Binary(_)));
}

#[test]
fn test_binary_text_value_is_coerced() {
    let snapshot = default_snapshot();
    let entry = EntryBuilder::person("Lee").with_binary("description", b"plain text");
    let normalized = check(&snapshot, entry).unwrap();
    assert_eq!(
        normalized.get("description").unwrap().values(),
        &[Value::from("plain text")]
    );
}

#[test]
fn test_rdn_check_can_be_disabled() {
    let snapshot = default_snapshot().with_rdn_check(false);
    let entry = EntryBuilder::person("Alice").with("cn", ["Alicia"]);
    assert!(check(&snapshot, entry).is_ok());
}

#[test]
fn test_empty_attributes_are_dropped() {
    let snapshot = default_snapshot();
    let entry = EntryBuilder::person("Mia").with("description", Vec::<String>::new());
    let normalized = check(&snapshot, entry).unwrap();
    assert!(normalized.get("description").is_none());
}

#[test]
fn test_one_type_under_two_ids_is_counted_once() {
    let snapshot = default_snapshot();
    let by_oid = EntryBuilder::posix_user("jdoe", 5).with("1.3.6.1.1.1.1.0", ["6"]);
    match check(&snapshot, by_oid) {
        Err(SchemaViolation::MultiValuedSingleValueAttribute { attribute, count }) => {
            assert_eq!(attribute, "uidNumber");
            assert_eq!(count, 2);
        }
        other => panic!("Expected MultiValuedSingleValueAttribute, got {:?}", other),
    }

    let same_value = EntryBuilder::posix_user("jdoe", 5).with("1.3.6.1.1.1.1.0", ["5"]);
    let merged = check(&snapshot, same_value).expect("repeated value collapses");
    assert_eq!(merged.get("uidNumber").unwrap().values(), &[Value::text("5")]);
    assert!(merged.get("1.3.6.1.1.1.1.0").is_none());

    let aliases = EntryBuilder::person("Alice").with("commonName", ["Ally", "alice"]);
    let merged = check(&snapshot, aliases).expect("aliases merge");
    assert_eq!(merged.get("cn").unwrap().texts().collect::<Vec<_>>(), vec!["Alice", "Ally"]);
    assert!(merged.get("commonName").is_none());
}

#[test]
fn test_object_class_named_by_oid() {
    let snapshot = default_snapshot();
    let entry = EntryBuilder::new(&format!("cn=A,{}", PEOPLE))
        .with("2.5.4.0", ["person"])
        .with("cn", ["A"])
        .with("sn", ["B"]);

    let normalized = check(&snapshot, entry).expect("objectClass by oid is accepted");
    assert_eq!(normalized.object_classes(), vec!["top", "person"]);
    assert!(normalized.get("2.5.4.0").is_none());
}
