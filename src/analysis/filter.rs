//! Edge filtering over a built call graph.
//!
//! Every filter is edge-wise: an edge survives only when both endpoints pass
//! the inclusion filters and neither endpoint trips an exclusion. Functions
//! left on no surviving edge are dropped from the result.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::graph::{CallGraph, Function};
use super::options::AnalysisOptions;
use super::stdlib::is_internal_pkg;

/// Apply the option filters to a graph, producing the filtered view.
///
/// `max_depth` (when nonzero) limits edges to endpoints within that BFS depth
/// of the entry roots; disconnected nodes are treated as beyond the limit.
pub fn apply(graph: &CallGraph, opts: &AnalysisOptions) -> CallGraph {
    let focus_path = resolve_focus(graph, opts.focus.as_deref());
    let depth = if opts.max_depth > 0 {
        Some(depth_map(graph, opts.max_depth))
    } else {
        None
    };

    let mut out = CallGraph::default();
    for call in &graph.calls {
        let (Some(caller), Some(callee)) =
            (graph.functions.get(&call.caller), graph.functions.get(&call.callee))
        else {
            continue;
        };

        if let Some(depth) = &depth {
            if !depth.contains(call.caller.as_str()) || !depth.contains(call.callee.as_str()) {
                continue;
            }
        }
        if !edge_passes(caller, callee, opts, focus_path.as_deref()) {
            continue;
        }

        out.functions.entry(caller.id.clone()).or_insert_with(|| caller.clone());
        out.functions.entry(callee.id.clone()).or_insert_with(|| callee.clone());
        out.calls.push(call.clone());
    }

    out
}

/// Edge-wise predicate shared with the hierarchy traversal.
pub fn edge_passes(
    caller: &Function,
    callee: &Function,
    opts: &AnalysisOptions,
    focus_path: Option<&str>,
) -> bool {
    if opts.nostd
        && (caller.std
            || callee.std
            || is_internal_pkg(&caller.package_path)
            || is_internal_pkg(&callee.package_path))
    {
        return false;
    }
    if opts.nointer && !(caller.exported && callee.exported) {
        return false;
    }
    if !opts.limit_prefix.is_empty()
        && !(has_prefix(&caller.package_path, &opts.limit_prefix)
            && has_prefix(&callee.package_path, &opts.limit_prefix))
    {
        return false;
    }
    if !opts.limit_keyword.is_empty()
        && !(contains_any(&caller.package_path, &opts.limit_keyword)
            && contains_any(&callee.package_path, &opts.limit_keyword))
    {
        return false;
    }
    if !opts.ignore.is_empty()
        && (contains_any(&caller.package_path, &opts.ignore)
            || contains_any(&callee.package_path, &opts.ignore))
    {
        return false;
    }
    if let Some(focus) = focus_path {
        if caller.package_path != focus && callee.package_path != focus {
            return false;
        }
    }
    true
}

/// Resolve the focus option against the analyzed packages by path or name.
/// An unmatched focus disables focusing, mirroring the upstream behavior.
pub fn resolve_focus(graph: &CallGraph, focus: Option<&str>) -> Option<String> {
    let focus = focus?;
    graph
        .functions
        .values()
        .find(|f| f.package_path == focus || f.package_name == focus)
        .map(|f| f.package_path.clone())
}

fn has_prefix(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| path.starts_with(p.as_str()))
}

fn contains_any(path: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| path.contains(n.as_str()))
}

/// Minimal BFS depth of every node reachable within `max_depth` of the entry
/// roots (`main`/`init`, falling back to in-degree-zero nodes).
fn depth_map(graph: &CallGraph, max_depth: u32) -> BTreeSet<String> {
    let mut roots = graph.entry_roots();
    if roots.is_empty() {
        roots = graph.in_degree_zero();
    }

    let mut out: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for call in &graph.calls {
        out.entry(call.caller.as_str()).or_default().push(call.callee.as_str());
    }

    let mut depth: BTreeMap<String, u32> = BTreeMap::new();
    let mut queue: VecDeque<(String, u32)> = VecDeque::new();
    for root in roots {
        depth.insert(root.clone(), 0);
        queue.push_back((root, 0));
    }

    while let Some((id, d)) = queue.pop_front() {
        if d >= max_depth {
            continue;
        }
        if let Some(callees) = out.get(id.as_str()) {
            for callee in callees {
                if !depth.contains_key(*callee) {
                    depth.insert((*callee).to_string(), d + 1);
                    queue.push_back(((*callee).to_string(), d + 1));
                }
            }
        }
    }

    depth.into_keys().collect()
}
