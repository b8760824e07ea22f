//! Mermaid flowchart rendering.
//!
//! Emits `flowchart LR` text with compact numeric node ids and optional
//! nested `subgraph` grouping by package and/or receiver type. Output is
//! fully deterministic: groups, nodes, and edges are sorted.

use std::collections::BTreeMap;

use super::graph::{CallGraph, Function};
use super::options::GroupBy;

/// Assigns compact `N<k>` ids in first-use order.
#[derive(Default)]
struct IdIndex {
    ids: BTreeMap<String, usize>,
    next: usize,
}

impl IdIndex {
    fn resolve(&mut self, key: &str) -> String {
        if let Some(n) = self.ids.get(key) {
            return format!("N{n}");
        }
        self.next += 1;
        self.ids.insert(key.to_string(), self.next);
        format!("N{}", self.next)
    }
}

/// Render a call graph as Mermaid flowchart text.
pub fn render(graph: &CallGraph, group: &[GroupBy]) -> String {
    let mut out = String::from("flowchart LR\n");
    let mut ids = IdIndex::default();

    let by_pkg = group.contains(&GroupBy::Pkg);
    let by_type = group.contains(&GroupBy::Type);

    if by_pkg && by_type {
        // Nested grouping: package → receiver type → nodes.
        let mut nested: BTreeMap<&str, BTreeMap<&str, Vec<&Function>>> = BTreeMap::new();
        for node in graph.functions.values() {
            nested
                .entry(node.package_path.as_str())
                .or_default()
                .entry(type_group(node))
                .or_default()
                .push(node);
        }
        for (pkg, types) in nested {
            out.push_str(&format!("subgraph \"pkg:{pkg}\"\n"));
            for (typ, nodes) in types {
                out.push_str(&format!("subgraph \"type:{typ}\"\n"));
                for node in nodes {
                    write_node(&mut out, &mut ids, node);
                }
                out.push_str("end\n");
            }
            out.push_str("end\n");
        }
    } else if by_pkg {
        let mut groups: BTreeMap<&str, Vec<&Function>> = BTreeMap::new();
        for node in graph.functions.values() {
            groups.entry(node.package_path.as_str()).or_default().push(node);
        }
        for (pkg, nodes) in groups {
            out.push_str(&format!("subgraph \"pkg:{pkg}\"\n"));
            for node in nodes {
                write_node(&mut out, &mut ids, node);
            }
            out.push_str("end\n");
        }
    } else if by_type {
        let mut groups: BTreeMap<&str, Vec<&Function>> = BTreeMap::new();
        for node in graph.functions.values() {
            groups.entry(type_group(node)).or_default().push(node);
        }
        for (typ, nodes) in groups {
            out.push_str(&format!("subgraph \"type:{typ}\"\n"));
            for node in nodes {
                write_node(&mut out, &mut ids, node);
            }
            out.push_str("end\n");
        }
    } else {
        for node in graph.functions.values() {
            write_node(&mut out, &mut ids, node);
        }
    }

    let mut edges: Vec<(&str, &str)> = graph
        .calls
        .iter()
        .map(|c| (c.caller.as_str(), c.callee.as_str()))
        .collect();
    edges.sort_unstable();
    for (caller, callee) in edges {
        let from = ids.resolve(caller);
        let to = ids.resolve(callee);
        out.push_str(&format!("{from} --> {to}\n"));
    }

    out
}

fn type_group(node: &Function) -> &str {
    node.receiver.as_deref().filter(|r| !r.is_empty()).unwrap_or("func")
}

fn write_node(out: &mut String, ids: &mut IdIndex, node: &Function) {
    let mid = ids.resolve(&node.id);
    let label = if node.file.is_empty() {
        node.name.clone()
    } else {
        format!("{}<br/>{}:{}", node.name, node.file, node.line)
    };
    out.push_str(&format!("{mid}[\"{label}\"]\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::graph::Call;

    fn func(id: &str, name: &str, pkg: &str, receiver: Option<&str>) -> Function {
        Function {
            id: id.to_string(),
            name: name.to_string(),
            package_path: pkg.to_string(),
            package_name: pkg.rsplit('/').next().unwrap_or(pkg).to_string(),
            file: "main.go".to_string(),
            line: 10,
            exported: false,
            receiver: receiver.map(str::to_string),
            std: false,
        }
    }

    fn sample() -> CallGraph {
        let mut graph = CallGraph::default();
        for f in [
            func("main.main", "main", "main", None),
            func("main.hello", "hello", "main", None),
        ] {
            graph.functions.insert(f.id.clone(), f);
        }
        graph.calls.push(Call {
            caller: "main.main".to_string(),
            callee: "main.hello".to_string(),
            file: "main.go".to_string(),
            line: 12,
        });
        graph
    }

    #[test]
    fn renders_flowchart_header_and_edges() {
        let text = render(&sample(), &[]);
        assert!(text.starts_with("flowchart LR\n"));
        assert!(text.contains("[\"main<br/>main.go:10\"]"));
        assert!(text.contains(" --> "));
        assert!(!text.contains("subgraph"));
    }

    #[test]
    fn groups_by_package() {
        let text = render(&sample(), &[GroupBy::Pkg]);
        assert!(text.contains("subgraph \"pkg:main\"\n"));
        assert_eq!(text.matches("end\n").count(), 1);
    }

    #[test]
    fn nested_grouping_emits_type_subgraphs() {
        let mut graph = sample();
        let method = func("(main.Server).Run", "Run", "main", Some("Server"));
        graph.functions.insert(method.id.clone(), method);

        let text = render(&graph, &[GroupBy::Pkg, GroupBy::Type]);
        assert!(text.contains("subgraph \"pkg:main\"\n"));
        assert!(text.contains("subgraph \"type:func\"\n"));
        assert!(text.contains("subgraph \"type:Server\"\n"));
    }

    #[test]
    fn output_is_deterministic() {
        let a = render(&sample(), &[GroupBy::Pkg]);
        let b = render(&sample(), &[GroupBy::Pkg]);
        assert_eq!(a, b);
    }
}
