//! # Directory Schema Validator
//!
//! A command-line utility for checking directory schema documents before they
//! are handed to the directory core.
//!
//! ## Overview
//!
//! Schema documents are JSON files holding syntaxes, attribute types and
//! object classes. The validator loads them on top of the embedded schema sets
//! and reports:
//! - JSON syntax and document shape errors
//! - Duplicate oids or names
//! - Superiors, MUST/MAY attributes and syntaxes that do not resolve
//! - The computed closure (superiors, MUST, MAY) of every object class
//!
//! ## Usage
//!
//! ```bash
//! # Check the embedded schema sets only
//! cargo run --bin schema-validator
//!
//! # Check one document
//! cargo run --bin schema-validator schemas/example.json
//!
//! # Check every *.json document in a directory, in file name order
//! cargo run --bin schema-validator ./schemas/
//! ```
//!
//! ## Output Example
//!
//! ```text
//! Loaded embedded schema sets: system, core, cosine, inetorgperson, nis
//! Validating: schemas/example.json
//!   ✓ Valid
//!
//! Object class closures:
//!   inetOrgPerson (2.16.840.1.113730.3.2.2) Structural
//!     superiors: person, organizationalPerson
//!     must: cn, sn
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: All documents are valid
//! - `1`: One or more documents are invalid or could not be read

use directory_core::schema::embedded::DEFAULT_SCHEMAS;
use directory_core::schema::{ObjectClassClosure, SchemaRegistry};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut registry = match SchemaRegistry::with_embedded_schemas(DEFAULT_SCHEMAS) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("❌ Embedded schemas failed to load: {}", e);
            process::exit(1);
        }
    };
    println!("Loaded embedded schema sets: {}", registry.loaded_schemas().join(", "));

    if let Some(path) = args.get(1) {
        let path = Path::new(path);
        let files = match collect_documents(path) {
            Ok(files) => files,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                eprintln!("Usage: {} [schema-file-or-directory]", args[0]);
                process::exit(1);
            }
        };

        let mut error_count = 0;
        for file in &files {
            println!("Validating: {}", file.display());
            match registry.load_schema_file(file) {
                Ok(()) => println!("  ✓ Valid"),
                Err(e) => {
                    eprintln!("  ❌ Invalid - {}", e);
                    error_count += 1;
                }
            }
        }

        println!("\nValidation Summary:");
        println!("  Valid documents: {}", files.len() - error_count);
        println!("  Invalid documents: {}", error_count);
        if error_count > 0 {
            process::exit(1);
        }
    }

    print_closures(&registry);
}

fn collect_documents(path: &Path) -> Result<Vec<PathBuf>, String> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(format!("'{}' is not a valid file or directory", path.display()));
    }

    let entries = fs::read_dir(path).map_err(|e| format!("cannot read directory: {}", e))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    // Documents may depend on each other; name them so they sort in load order
    files.sort();
    Ok(files)
}

fn print_closures(registry: &SchemaRegistry) {
    let closure = ObjectClassClosure::build(registry);
    let attribute_name = |oid: &String| {
        registry
            .lookup_attribute_type(oid)
            .map_or_else(|| oid.clone(), |at| at.name().to_string())
    };

    println!("\nObject class closures:");
    for object_class in registry.object_classes() {
        let Some(entry) = closure.get(&object_class.oid) else {
            continue;
        };
        let superiors: Vec<&str> = entry
            .superiors
            .iter()
            .filter_map(|oid| registry.lookup_object_class(oid))
            .map(|class| class.name())
            .collect();
        let must: BTreeSet<String> = entry.must.iter().map(&attribute_name).collect();

        println!(
            "  {} ({}) {:?}",
            object_class.name(),
            object_class.oid,
            object_class.kind
        );
        if !superiors.is_empty() {
            println!("    superiors: {}", superiors.join(", "));
        }
        if !must.is_empty() {
            println!("    must: {}", must.into_iter().collect::<Vec<_>>().join(", "));
        }
        println!("    may: {} attribute(s)", entry.may.len());
    }
}
