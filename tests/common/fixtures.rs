//! Test fixtures: schema documents, request contexts and seeded directories.

use super::builders::{EntryBuilder, SUFFIX};
use directory_core::entry::Dn;
use directory_core::nexus::InMemoryPartition;
use directory_core::operation::RequestContext;
use directory_core::schema::{SchemaRegistry, SchemaSnapshot};
use directory_core::{DirectoryCore, DirectoryCoreBuilder};
use std::path::PathBuf;

/// Path of a file under `tests/fixtures`
pub fn fixture_path(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(path)
}

/// Contents of a schema document under `tests/fixtures/schemas`
pub fn load_schema(name: &str) -> String {
    let path = fixture_path(&format!("schemas/{}.json", name));
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", path.display()))
}

/// Snapshot over the default embedded schemas
pub fn default_snapshot() -> SchemaSnapshot {
    SchemaSnapshot::new(SchemaRegistry::new().expect("embedded schemas load"))
}

/// Snapshot over the default schemas plus the `example` fixture document
pub fn example_snapshot() -> SchemaSnapshot {
    let mut registry = SchemaRegistry::new().expect("embedded schemas load");
    registry
        .load_schema_str(&load_schema("example"))
        .expect("example schema loads");
    SchemaSnapshot::new(registry)
}

pub fn admin() -> RequestContext {
    RequestContext::authenticated(Dn::parse("cn=admin,dc=example,dc=com").unwrap())
}

pub fn anonymous() -> RequestContext {
    RequestContext::new("anonymous-test")
}

/// Route `log` output to the test harness, `RUST_LOG` overrides the level.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

/// A directory with `dc=example,dc=com`, `ou=people` and `ou=groups`
pub async fn seeded_directory() -> DirectoryCore<InMemoryPartition> {
    init_logging();
    seed(DirectoryCoreBuilder::new(partition()).build().expect("directory builds")).await
}

/// Like [`seeded_directory`] with the `example` fixture schema loaded
pub async fn seeded_example_directory() -> DirectoryCore<InMemoryPartition> {
    init_logging();
    let core = DirectoryCoreBuilder::new(partition())
        .with_schema_json(load_schema("example"))
        .build()
        .expect("directory builds");
    seed(core).await
}

pub fn partition() -> InMemoryPartition {
    InMemoryPartition::with_suffix(Dn::parse(SUFFIX).unwrap())
}

async fn seed(core: DirectoryCore<InMemoryPartition>) -> DirectoryCore<InMemoryPartition> {
    let context = admin();
    for entry in [
        EntryBuilder::domain(),
        EntryBuilder::organizational_unit("people"),
        EntryBuilder::organizational_unit("groups"),
    ] {
        core.add(entry.build(), &context).await.expect("seed entry is valid");
    }
    core
}

/// Schema documents exercising registry error paths
pub mod schema_documents {
    pub const CYCLIC: &str = r#"{
        "name": "cyclic",
        "dependencies": ["core"],
        "objectClasses": [
            {"oid": "1.3.6.1.4.1.99999.3.1", "names": ["ouroboros"], "superiors": ["serpent"], "must": ["cn"]},
            {"oid": "1.3.6.1.4.1.99999.3.2", "names": ["serpent"], "superiors": ["ouroboros", "person"], "may": ["description"]}
        ]
    }"#;

    pub const UNDEFINED_SUPERIOR: &str = r#"{
        "name": "dangling",
        "dependencies": ["core"],
        "objectClasses": [
            {"oid": "1.3.6.1.4.1.99999.4.1", "names": ["orphanClass"], "superiors": ["noSuchClass"]}
        ]
    }"#;

    pub const UNDEFINED_SYNTAX: &str = r#"{
        "name": "badsyntax",
        "attributeTypes": [
            {"oid": "1.3.6.1.4.1.99999.4.2", "names": ["strange"], "syntax": "9.9.9.9"}
        ]
    }"#;

    pub const MISSING_DEPENDENCY: &str = r#"{
        "name": "needy",
        "dependencies": ["samba"],
        "attributeTypes": []
    }"#;
}
