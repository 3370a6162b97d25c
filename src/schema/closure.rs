//! Object class closure: transitive superiors and aggregated MUST/MAY sets.
//!
//! The closure is computed for every object class in a registry at once and
//! must be rebuilt whenever an object class is added, since a superior's
//! attribute lists flow into all of its descendants.

use super::registry::{OBJECT_CLASS_OID, SchemaRegistry, TOP_OID};
use super::types::ObjectClass;
use log::{debug, trace};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Derived data for one object class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosureEntry {
    /// Transitive superior oids, excluding `top`, in first-seen post-order
    pub superiors: Vec<String>,
    /// MUST attribute oids of the class and all its superiors
    pub must: BTreeSet<String>,
    /// MAY attribute oids of the class and all its superiors
    pub may: BTreeSet<String>,
    /// `must ∪ may ∪ {objectClass}`
    pub allowed: BTreeSet<String>,
}

impl ClosureEntry {
    /// Whether `oid` is a strict ancestor of the class this entry describes.
    pub fn has_superior(&self, oid: &str) -> bool {
        self.superiors.iter().any(|superior| superior == oid)
    }
}

/// Closure of every object class in a registry, keyed by object class oid.
#[derive(Debug, Clone, Default)]
pub struct ObjectClassClosure {
    entries: HashMap<String, ClosureEntry>,
}

impl ObjectClassClosure {
    /// Compute the closure of every object class in the registry.
    pub fn build(registry: &SchemaRegistry) -> Self {
        let entries: HashMap<_, _> = registry
            .object_classes()
            .map(|object_class| (object_class.oid.clone(), Self::compute(registry, object_class)))
            .collect();
        debug!("Computed object class closure for {} classes", entries.len());
        Self { entries }
    }

    /// Compute the closure entry of a single object class.
    pub fn compute(registry: &SchemaRegistry, object_class: &ObjectClass) -> ClosureEntry {
        let mut seen = HashSet::from([object_class.oid.clone()]);
        let mut superiors = Vec::new();
        collect_superiors(registry, object_class, &mut seen, &mut superiors);

        let mut must = BTreeSet::new();
        let mut may = BTreeSet::new();
        let lineage = std::iter::once(object_class)
            .chain(superiors.iter().filter_map(|oid| registry.lookup_object_class(oid)));
        for class in lineage {
            must.extend(resolve(registry, &class.must));
            may.extend(resolve(registry, &class.may));
        }

        let mut allowed: BTreeSet<String> = must.union(&may).cloned().collect();
        allowed.insert(OBJECT_CLASS_OID.to_string());

        trace!(
            "Closure of {}: superiors={:?} must={:?}",
            object_class.name(),
            superiors,
            must
        );
        ClosureEntry {
            superiors,
            must,
            may,
            allowed,
        }
    }

    /// Closure entry for an object class oid.
    pub fn get(&self, oid: &str) -> Option<&ClosureEntry> {
        self.entries.get(oid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ClosureEntry)> {
        self.entries.iter()
    }
}

// Depth first; a superior is recorded after its own ancestors. The seen set
// keeps cyclic definitions from recursing forever.
fn collect_superiors(
    registry: &SchemaRegistry,
    object_class: &ObjectClass,
    seen: &mut HashSet<String>,
    out: &mut Vec<String>,
) {
    for name in &object_class.superiors {
        let Some(superior) = registry.lookup_object_class(name) else {
            continue;
        };
        if superior.oid == TOP_OID || !seen.insert(superior.oid.clone()) {
            continue;
        }
        collect_superiors(registry, superior, seen, out);
        out.push(superior.oid.clone());
    }
}

fn resolve<'r>(registry: &'r SchemaRegistry, names: &'r [String]) -> impl Iterator<Item = String> + 'r {
    names
        .iter()
        .filter_map(|name| registry.attribute_oid(name))
        .map(str::to_string)
}
