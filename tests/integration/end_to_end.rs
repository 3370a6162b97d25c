//! Operations through the stock before, after and failure pipelines.

use crate::common::builders::{EntryBuilder, PEOPLE, SUFFIX};
use crate::common::fixtures::{admin, anonymous, partition, seeded_directory, seeded_example_directory};
use crate::common::{TestCoverage, ViolationKind};
use directory_core::entry::{Dn, Modification, Rdn};
use directory_core::interceptor::stages::operational::{
    CREATE_TIMESTAMP, CREATORS_NAME, ENTRY_UUID, MODIFIERS_NAME, MODIFY_TIMESTAMP,
};
use directory_core::operation::SearchContext;
use directory_core::{
    DirectoryCoreBuilder, DirectoryError, Filter, SchemaViolation, SearchScope,
};

fn dn(value: &str) -> Dn {
    Dn::parse(value).unwrap()
}

#[tokio::test]
async fn test_inet_org_person_lifecycle() {
    let core = seeded_directory().await;
    let context = admin();
    let jdoe = dn(&format!("uid=jdoe,{}", PEOPLE));

    // cn and sn are inherited from person
    let incomplete = EntryBuilder::new(&jdoe.to_string())
        .object_classes(["inetOrgPerson"])
        .with("uid", ["jdoe"])
        .build();
    let result = core.add(incomplete.clone(), &context).await;
    match result {
        Err(DirectoryError::Schema(SchemaViolation::MissingMandatoryAttribute { attributes, .. })) => {
            assert_eq!(attributes, vec!["cn", "sn"]);
        }
        other => panic!("Expected MissingMandatoryAttribute, got {:?}", other),
    }
    assert!(!core.has_entry(jdoe.clone(), &context).await.unwrap());

    let complete = EntryBuilder::inet_org_person("jdoe")
        .with("cn", ["John Doe"])
        .with("sn", ["Doe"])
        .with("mail", ["jdoe@example.com"])
        .build();
    core.add(complete, &context).await.unwrap();

    let stored = core.lookup(jdoe.clone(), &context).await.unwrap().unwrap();
    for class in ["top", "person", "organizationalPerson", "inetOrgPerson"] {
        assert!(stored.has_object_class(class), "missing {}", class);
    }
    assert_eq!(stored.object_classes().len(), 4);
    for attribute in [CREATE_TIMESTAMP, ENTRY_UUID, CREATORS_NAME] {
        assert!(stored.contains(attribute), "missing {}", attribute);
    }
    assert_eq!(
        stored.get(CREATORS_NAME).unwrap().texts().collect::<Vec<_>>(),
        vec!["cn=admin,dc=example,dc=com"]
    );

    core.modify(
        jdoe.clone(),
        vec![Modification::replace("mail", ["john.doe@example.com"])],
        &context,
    )
    .await
    .unwrap();
    let stored = core.lookup(jdoe.clone(), &context).await.unwrap().unwrap();
    assert!(stored.contains(MODIFY_TIMESTAMP));
    assert!(stored.contains(MODIFIERS_NAME));
    assert_eq!(
        stored.get("mail").unwrap().texts().collect::<Vec<_>>(),
        vec!["john.doe@example.com"]
    );

    core.delete(jdoe.clone(), &context).await.unwrap();
    assert!(core.lookup(jdoe, &context).await.unwrap().is_none());
}

#[tokio::test]
async fn test_schema_stage_violation_kinds() {
    let core = seeded_directory().await;
    let context = admin();
    let alice = EntryBuilder::person("Alice").build();
    core.add(alice.clone(), &context).await.unwrap();
    let mut coverage = TestCoverage::new();

    let result = core
        .modify(
            alice.dn().clone(),
            vec![Modification::replace(CREATE_TIMESTAMP, ["20240101000000Z"])],
            &context,
        )
        .await;
    assert_violation!(result, SchemaViolation::NoPermissionOnOperationalAttribute { .. });
    coverage.mark_tested(ViolationKind::NoPermissionOnOperationalAttribute);

    let result = core
        .modify(
            alice.dn().clone(),
            vec![Modification::replace("cn", ["Alicia"])],
            &context,
        )
        .await;
    assert_violation!(result, SchemaViolation::NotAllowedOnRdn { .. });
    coverage.mark_tested(ViolationKind::NotAllowedOnRdn);

    let result = core
        .modify(
            alice.dn().clone(),
            vec![Modification::replace("objectClass", Vec::<String>::new())],
            &context,
        )
        .await;
    assert_violation!(result, SchemaViolation::ObjectClassModification { .. });
    coverage.mark_tested(ViolationKind::ObjectClassModification);

    let result = core
        .modify(
            alice.dn().clone(),
            vec![Modification::increment_by_one("objectClass")],
            &context,
        )
        .await;
    assert_violation!(result, SchemaViolation::IllegalModification { .. });
    coverage.mark_tested(ViolationKind::IllegalModification);

    let entry = EntryBuilder::person("Bob")
        .with(ENTRY_UUID, ["5f0c2d1e-0000-4000-8000-000000000000"])
        .build();
    assert_violation!(
        core.add(entry, &context).await,
        SchemaViolation::NoPermissionOnOperationalAttribute { .. }
    );

    assert!(coverage.coverage_percentage() > 0.0);
    assert!(!coverage.untested().contains(&ViolationKind::NotAllowedOnRdn));

    // None of the rejected requests changed the stored entry
    let stored = core.lookup(alice.dn().clone(), &context).await.unwrap().unwrap();
    assert!(!stored.contains(MODIFY_TIMESTAMP));
    assert_eq!(stored.get("cn").unwrap().texts().collect::<Vec<_>>(), vec!["Alice"]);
}

#[tokio::test]
async fn test_rdn_value_may_gain_siblings() {
    let core = seeded_directory().await;
    let context = admin();
    let alice = EntryBuilder::person("Alice").build();
    core.add(alice.clone(), &context).await.unwrap();

    core.modify(
        alice.dn().clone(),
        vec![Modification::replace("cn", ["Alice", "Ali"])],
        &context,
    )
    .await
    .unwrap();
    core.modify(
        alice.dn().clone(),
        vec![Modification::remove("cn", ["Ali"])],
        &context,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_example_schema_employee() {
    let core = seeded_example_directory().await;
    let context = admin();
    let builder = EntryBuilder::person("Erin")
        .object_classes(["employee"])
        .with("badgeNumber", ["1001"])
        .with("nickname", ["E"]);
    let erin = builder.clone().build();

    assert_violation!(
        core.add(builder.without("badgeNumber").build(), &context).await,
        SchemaViolation::MissingMandatoryAttribute { .. }
    );
    core.add(erin.clone(), &context).await.unwrap();

    core.modify(
        erin.dn().clone(),
        vec![
            Modification::add("objectClass", ["loginTracking"]),
            Modification::add("loginCount", ["0"]),
        ],
        &context,
    )
    .await
    .unwrap();
    for _ in 0..3 {
        core.modify(
            erin.dn().clone(),
            vec![Modification::increment_by_one("loginCount")],
            &context,
        )
        .await
        .unwrap();
    }
    core.modify(
        erin.dn().clone(),
        vec![Modification::increment("loginCount", 5)],
        &context,
    )
    .await
    .unwrap();

    let stored = core.lookup(erin.dn().clone(), &context).await.unwrap().unwrap();
    assert_eq!(stored.get("loginCount").unwrap().texts().collect::<Vec<_>>(), vec!["8"]);
    assert_eq!(
        stored.object_classes(),
        vec!["top", "employee", "person", "loginTracking"]
    );

    let result = core
        .modify(
            erin.dn().clone(),
            vec![Modification::add("badgeNumber", ["1002"])],
            &context,
        )
        .await;
    assert_violation!(result, SchemaViolation::MultiValuedSingleValueAttribute { .. });
}

#[tokio::test]
async fn test_anonymous_sessions() {
    let core = seeded_directory().await;
    let entry = EntryBuilder::person("Mallory").build();

    let result = core.add(entry.clone(), &anonymous()).await;
    assert_directory_error!(result, DirectoryError::InsufficientAccessRights { .. });
    assert!(!core.has_entry(entry.dn().clone(), &anonymous()).await.unwrap());

    // Reads are open
    let found = core
        .search(dn(SUFFIX), SearchScope::Subtree, Filter::any_entry(), &anonymous())
        .await
        .unwrap();
    assert_eq!(found.count(), 3);

    let open = DirectoryCoreBuilder::new(partition())
        .allow_anonymous_writes(true)
        .build()
        .unwrap();
    open.add(EntryBuilder::domain().build(), &anonymous()).await.unwrap();
    let stored = open.lookup(dn(SUFFIX), &anonymous()).await.unwrap().unwrap();
    assert!(stored.contains(CREATE_TIMESTAMP));
    assert!(!stored.contains(CREATORS_NAME));
}

#[tokio::test]
async fn test_stamping_can_be_disabled() {
    let core = DirectoryCoreBuilder::new(partition())
        .stamp_operational_attributes(false)
        .build()
        .unwrap();
    core.add(EntryBuilder::domain().build(), &admin()).await.unwrap();
    let stored = core.lookup(dn(SUFFIX), &admin()).await.unwrap().unwrap();
    assert!(!stored.contains(CREATE_TIMESTAMP));
    assert!(!stored.contains(ENTRY_UUID));
}

#[tokio::test]
async fn test_rename_and_move() {
    let core = seeded_directory().await;
    let context = admin();
    core.add(EntryBuilder::inet_org_person("kim").build(), &context)
        .await
        .unwrap();

    core.rename(
        dn(&format!("uid=kim,{}", PEOPLE)),
        Rdn::new("cn", "kim"),
        false,
        &context,
    )
    .await
    .unwrap();
    let renamed = dn(&format!("cn=kim,{}", PEOPLE));
    let stored = core.lookup(renamed.clone(), &context).await.unwrap().unwrap();
    assert!(stored.contains("uid"));
    assert!(stored.contains(MODIFY_TIMESTAMP));

    core.move_entry(renamed, dn("ou=groups,dc=example,dc=com"), &context)
        .await
        .unwrap();
    assert!(
        core.has_entry(dn("cn=kim,ou=groups,dc=example,dc=com"), &context)
            .await
            .unwrap()
    );

    // Renaming onto a value the entry cannot hold
    let result = core
        .rename(
            dn("cn=kim,ou=groups,dc=example,dc=com"),
            Rdn::new("gidNumber", "100"),
            true,
            &context,
        )
        .await;
    assert_directory_error!(result, DirectoryError::Schema(_));
}

#[tokio::test]
async fn test_search_filters_and_limits() {
    let core = seeded_directory().await;
    let context = admin();
    for (uid, sn) in [("ann", "Smith"), ("ben", "Smithers"), ("cat", "Jones")] {
        core.add(
            EntryBuilder::inet_org_person(uid).with("sn", [sn]).build(),
            &context,
        )
        .await
        .unwrap();
    }

    let smiths = core
        .search(
            dn(PEOPLE),
            SearchScope::OneLevel,
            Filter::substring("sn", Some("smith"), &[], None),
            &context,
        )
        .await
        .unwrap();
    assert_eq!(smiths.count(), 2);

    let not_jones = core
        .search(
            dn(PEOPLE),
            SearchScope::OneLevel,
            Filter::and([
                Filter::equality("objectClass", "inetOrgPerson"),
                Filter::not(Filter::equality("sn", "JONES")),
            ]),
            &context,
        )
        .await
        .unwrap();
    assert_eq!(not_jones.count(), 2);

    let limited = core
        .search_with(
            SearchContext::new(dn(SUFFIX), SearchScope::Subtree, Filter::any_entry())
                .with_attributes(["objectClass"])
                .with_size_limit(2),
            &context,
        )
        .await
        .unwrap();
    let entries: Vec<_> = limited.collect();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| !entry.contains("cn")));

    let base_only = core
        .search(dn(PEOPLE), SearchScope::Base, Filter::any_entry(), &context)
        .await
        .unwrap();
    assert_eq!(base_only.remaining(), 1);
}

#[tokio::test]
async fn test_concurrent_writers_and_schema_update() {
    let core = seeded_directory().await;
    let context = admin();

    let adds = (0..16).map(|n| {
        let entry = EntryBuilder::person(&format!("user{:02}", n)).build();
        core.add(entry, &context)
    });
    let schema_update = async {
        core.load_schema_json(&crate::common::fixtures::load_schema("example"))
    };
    let (results, loaded) = futures::join!(futures::future::join_all(adds), schema_update);

    assert!(results.iter().all(Result::is_ok));
    loaded.unwrap();
    assert!(core.schema().registry().lookup_object_class("employee").is_some());

    let people = core
        .search(dn(PEOPLE), SearchScope::OneLevel, Filter::any_entry(), &context)
        .await
        .unwrap();
    assert_eq!(people.count(), 16);
}
