//! Symbol-rooted traversal for the `callHierarchy` tool.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::graph::CallGraph;
use super::options::Direction;

/// Locate a function by symbol. Accepted forms, in match order: the
/// qualified id (`main.main`, `(pkg.Recv).Method`), the bare name, or
/// `pkgName.name` / `pkgPath.name`.
pub fn find_symbol(graph: &CallGraph, symbol: &str) -> Option<String> {
    if graph.functions.contains_key(symbol) {
        return Some(symbol.to_string());
    }
    graph
        .functions
        .values()
        .find(|f| {
            f.name == symbol
                || format!("{}.{}", f.package_name, f.name) == symbol
                || format!("{}.{}", f.package_path, f.name) == symbol
        })
        .map(|f| f.id.clone())
}

/// Entry points for a symbol-less hierarchy: `main`/`init` roots, falling
/// back to in-degree-zero nodes when the graph has no entry functions.
pub fn default_roots(graph: &CallGraph) -> Vec<String> {
    let roots = graph.entry_roots();
    if roots.is_empty() {
        graph.in_degree_zero()
    } else {
        roots
    }
}

/// Traverse the (already filtered) graph from the start nodes and return the
/// visited subgraph. `max_depth` counts edges from a start node; 0 disables
/// the limit.
pub fn traverse(
    graph: &CallGraph,
    starts: &[String],
    direction: Direction,
    max_depth: u32,
) -> CallGraph {
    let mut out_adj: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    let mut in_adj: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, call) in graph.calls.iter().enumerate() {
        out_adj.entry(call.caller.as_str()).or_default().push(idx);
        in_adj.entry(call.callee.as_str()).or_default().push(idx);
    }

    let mut kept: BTreeSet<usize> = BTreeSet::new();
    match direction {
        Direction::Downstream => walk(graph, &out_adj, starts, max_depth, false, &mut kept),
        Direction::Upstream => walk(graph, &in_adj, starts, max_depth, true, &mut kept),
        Direction::Both => {
            walk(graph, &out_adj, starts, max_depth, false, &mut kept);
            walk(graph, &in_adj, starts, max_depth, true, &mut kept);
        }
    }

    let mut sub = CallGraph::default();
    for idx in kept {
        let call = &graph.calls[idx];
        for id in [&call.caller, &call.callee] {
            if let Some(node) = graph.functions.get(id) {
                sub.functions.entry(id.clone()).or_insert_with(|| node.clone());
            }
        }
        sub.calls.push(call.clone());
    }
    sub
}

/// BFS over one adjacency; `upstream` selects which endpoint to continue
/// from. Collects the indexes of every edge crossed.
fn walk(
    graph: &CallGraph,
    adj: &BTreeMap<&str, Vec<usize>>,
    starts: &[String],
    max_depth: u32,
    upstream: bool,
    kept: &mut BTreeSet<usize>,
) {
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<(String, u32)> = VecDeque::new();
    for start in starts {
        if visited.insert(start.clone()) {
            queue.push_back((start.clone(), 0));
        }
    }

    while let Some((id, depth)) = queue.pop_front() {
        if max_depth > 0 && depth >= max_depth {
            continue;
        }
        let Some(edges) = adj.get(id.as_str()) else {
            continue;
        };
        for &idx in edges {
            kept.insert(idx);
            let call = &graph.calls[idx];
            let next = if upstream { &call.caller } else { &call.callee };
            if visited.insert(next.clone()) {
                queue.push_back((next.clone(), depth + 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract;
    use crate::analysis::graph::build;
    use crate::analysis::options::Algo;
    use crate::analysis::source::PackagedFile;

    fn fixture() -> CallGraph {
        let file = PackagedFile {
            package_path: "main".to_string(),
            summary: extract::extract_file(
                "main.go",
                r#"package main

func leaf() {}

func mid() {
	leaf()
}

func main() {
	mid()
}
"#,
            )
            .unwrap(),
        };
        build(&[file], Algo::Static).unwrap()
    }

    #[test]
    fn finds_symbols_by_several_forms() {
        let graph = fixture();
        assert_eq!(find_symbol(&graph, "main.main").as_deref(), Some("main.main"));
        assert_eq!(find_symbol(&graph, "mid").as_deref(), Some("main.mid"));
        assert!(find_symbol(&graph, "nope").is_none());
    }

    #[test]
    fn downstream_reaches_transitive_callees() {
        let graph = fixture();
        let sub = traverse(&graph, &["main.main".to_string()], Direction::Downstream, 0);
        assert!(sub.functions.contains_key("main.leaf"));
        assert_eq!(sub.calls.len(), 2);
    }

    #[test]
    fn upstream_reaches_callers() {
        let graph = fixture();
        let sub = traverse(&graph, &["main.leaf".to_string()], Direction::Upstream, 0);
        assert!(sub.functions.contains_key("main.main"));
        assert_eq!(sub.calls.len(), 2);
    }

    #[test]
    fn depth_bounds_the_walk() {
        let graph = fixture();
        let sub = traverse(&graph, &["main.main".to_string()], Direction::Downstream, 1);
        assert_eq!(sub.calls.len(), 1);
        assert!(!sub.functions.contains_key("main.leaf"));
    }

    #[test]
    fn default_roots_prefer_main() {
        let graph = fixture();
        assert_eq!(default_roots(&graph), vec!["main.main".to_string()]);
    }
}
