//! Dependency-aware ordering of JavaScript files.
//!
//! Each candidate is scanned for the class it defines and the classes it
//! references. References that resolve to another candidate become graph
//! edges, and the graph's topological order becomes the load order.

use rustc_hash::{FxHashMap, FxHashSet};

use super::{ContentProvider, DependencyGraph, scan};
use crate::error::BundleError;
use crate::logger::Reporter;

/// Reorder `candidates` so every file loads after the files it depends on.
///
/// Files in `ignore` skip scanning and are placed first in their original
/// relative order. Dependency-free files come next, then the rest in
/// topological order. On a dependency cycle the cycle is reported and
/// `candidates` is returned unchanged.
pub fn reorder(
    candidates: Vec<String>,
    provider: &dyn ContentProvider,
    ignore: &FxHashSet<String>,
    reporter: &dyn Reporter,
) -> Vec<String> {
    if candidates.len() < 2 {
        return candidates;
    }

    let (ignored, sortable): (Vec<&String>, Vec<&String>) =
        candidates.iter().partition(|path| ignore.contains(*path));

    let mut graph = DependencyGraph::new();
    let mut definitions: FxHashMap<String, &str> = FxHashMap::default();
    let mut references = Vec::with_capacity(sortable.len());

    for path in &sortable {
        let node = graph.create_node(path);
        let refs = match provider.read_string(path) {
            Ok(source) => scan(&source),
            Err(err) => {
                reporter.error("order", &BundleError::ResourceRead(err));
                Default::default()
            }
        };
        if let Some(class) = refs.defines {
            definitions.insert(class, path.as_str());
        }
        references.push((node, refs.references));
    }

    for (node, names) in references {
        for name in names {
            let Some(&file) = definitions.get(&name) else {
                continue;
            };
            let target = graph.create_node(file);
            if target != node {
                graph.add_edge(node, target);
            }
        }
    }

    let resolved = match graph.resolve_dependencies() {
        Ok(resolved) => resolved,
        Err(cycle) => {
            reporter.error("order", &BundleError::from(cycle));
            return candidates;
        }
    };

    let (leaves, dependents): (Vec<_>, Vec<_>) =
        resolved.into_iter().partition(|node| node.dependencies == 0);

    let mut ordered: Vec<String> = ignored.into_iter().cloned().collect();
    ordered.extend(leaves.into_iter().map(|node| node.name));
    ordered.extend(dependents.into_iter().map(|node| node.name));

    reporter.debug("order", &format!("{ordered:?}"));
    ordered
}
