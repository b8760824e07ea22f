//! Call graph model and construction.
//!
//! Function ids use the Go convention: `pkgpath.Func` for plain functions and
//! `(pkgpath.Recv).Method` for methods. Calls into the standard library get
//! synthesized nodes so the `nostd` filter has something to include or drop.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;

use super::extract::CallTarget;
use super::options::Algo;
use super::source::PackagedFile;
use super::stdlib::is_std_pkg_path;
use super::AnalysisError;

/// Go predeclared functions; calls to these are never graph edges.
const BUILTINS: &[&str] = &[
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

/// A function node in the call graph.
#[derive(Debug, Clone, Serialize)]
pub struct Function {
    pub id: String,
    #[serde(rename = "func")]
    pub name: String,
    #[serde(rename = "packagePath")]
    pub package_path: String,
    #[serde(rename = "packageName")]
    pub package_name: String,
    /// Base file name, used in diagram labels.
    pub file: String,
    pub line: u32,
    pub exported: bool,
    #[serde(rename = "receiverType")]
    pub receiver: Option<String>,
    #[serde(rename = "isStd")]
    pub std: bool,
}

/// A call edge between two function ids.
#[derive(Debug, Clone, Serialize)]
pub struct Call {
    pub caller: String,
    pub callee: String,
    pub file: String,
    pub line: u32,
}

/// The call graph: deterministically ordered functions and edges.
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    pub functions: BTreeMap<String, Function>,
    pub calls: Vec<Call>,
}

impl CallGraph {
    /// Ids of the entry roots: `main.main` style mains plus package `init`
    /// functions.
    pub fn entry_roots(&self) -> Vec<String> {
        self.functions
            .values()
            .filter(|f| {
                f.receiver.is_none()
                    && ((f.name == "main" && f.package_name == "main") || f.name == "init")
            })
            .map(|f| f.id.clone())
            .collect()
    }

    /// Ids with no incoming edges; used as fallback roots.
    pub fn in_degree_zero(&self) -> Vec<String> {
        let targets: BTreeSet<&str> = self.calls.iter().map(|c| c.callee.as_str()).collect();
        self.functions
            .keys()
            .filter(|id| !targets.contains(id.as_str()))
            .cloned()
            .collect()
    }

    /// Drop functions that appear on no edge. The renderer only draws
    /// functions that participate in at least one call.
    pub fn prune_isolated(&mut self) {
        let used: BTreeSet<String> = self
            .calls
            .iter()
            .flat_map(|c| [c.caller.clone(), c.callee.clone()])
            .collect();
        self.functions.retain(|id, _| used.contains(id));
    }
}

fn function_id(package_path: &str, receiver: Option<&str>, name: &str) -> String {
    match receiver {
        Some(recv) => format!("({package_path}.{recv}).{name}"),
        None => format!("{package_path}.{name}"),
    }
}

fn is_exported(name: &str) -> bool {
    name.starts_with(|c: char| c.is_uppercase())
}

fn base_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Build the call graph from extracted files using the given algorithm.
pub fn build(files: &[PackagedFile], algo: Algo) -> Result<CallGraph, AnalysisError> {
    let mut graph = CallGraph::default();

    // Declaration pass: one node per function, plus resolution indexes.
    // plain: (package_path, name) → id; methods: name → ids.
    let mut plain: BTreeMap<(String, String), String> = BTreeMap::new();
    let mut methods: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut packages_by_name: BTreeMap<String, String> = BTreeMap::new();

    for file in files {
        packages_by_name
            .entry(file.summary.package_name.clone())
            .or_insert_with(|| file.package_path.clone());

        for decl in &file.summary.functions {
            let id = function_id(&file.package_path, decl.receiver.as_deref(), &decl.name);
            let node = Function {
                id: id.clone(),
                name: decl.name.clone(),
                package_path: file.package_path.clone(),
                package_name: file.summary.package_name.clone(),
                file: base_name(&file.summary.path),
                line: decl.line,
                exported: is_exported(&decl.name),
                receiver: decl.receiver.clone(),
                std: false,
            };
            match decl.receiver {
                Some(_) => methods.entry(decl.name.clone()).or_default().push(id.clone()),
                None => {
                    plain.insert((file.package_path.clone(), decl.name.clone()), id.clone());
                }
            }
            graph.functions.insert(id, node);
        }
    }

    // Resolution pass: turn call sites into edges.
    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
    let mut std_nodes: Vec<Function> = Vec::new();

    for file in files {
        for decl in &file.summary.functions {
            let caller = function_id(&file.package_path, decl.receiver.as_deref(), &decl.name);
            for call in &decl.calls {
                let callee = match &call.target {
                    CallTarget::Plain(name) => {
                        if BUILTINS.contains(&name.as_str()) {
                            continue;
                        }
                        plain.get(&(file.package_path.clone(), name.clone())).cloned()
                    }
                    CallTarget::Qualified { qualifier, name } => {
                        match file.summary.imports.get(qualifier) {
                            Some(import_path) => resolve_imported(
                                import_path,
                                name,
                                &plain,
                                &packages_by_name,
                                &mut std_nodes,
                            ),
                            // Receiver call: unambiguous under static, every
                            // name-matched method under cha/rta.
                            None => match methods.get(name) {
                                Some(ids) if algo == Algo::Static && ids.len() == 1 => {
                                    Some(ids[0].clone())
                                }
                                Some(ids) if algo != Algo::Static => {
                                    for id in ids {
                                        push_edge(
                                            &mut graph.calls,
                                            &mut seen,
                                            &caller,
                                            id,
                                            &file.summary.path,
                                            call.line,
                                        );
                                    }
                                    None
                                }
                                _ => None,
                            },
                        }
                    }
                };

                if let Some(callee) = callee {
                    push_edge(
                        &mut graph.calls,
                        &mut seen,
                        &caller,
                        &callee,
                        &file.summary.path,
                        call.line,
                    );
                }
            }
        }
    }

    for node in std_nodes {
        graph.functions.entry(node.id.clone()).or_insert(node);
    }

    graph.calls.sort_by(|a, b| (&a.caller, &a.callee).cmp(&(&b.caller, &b.callee)));

    if algo == Algo::Rta {
        restrict_to_entry_reachable(&mut graph)?;
    }

    graph.prune_isolated();
    Ok(graph)
}

fn push_edge(
    calls: &mut Vec<Call>,
    seen: &mut BTreeSet<(String, String)>,
    caller: &str,
    callee: &str,
    file: &str,
    line: u32,
) {
    if seen.insert((caller.to_string(), callee.to_string())) {
        calls.push(Call {
            caller: caller.to_string(),
            callee: callee.to_string(),
            file: file.to_string(),
            line,
        });
    }
}

/// Resolve `pkg.Name` through the import table: either a function in an
/// analyzed package, or a synthesized standard-library node.
fn resolve_imported(
    import_path: &str,
    name: &str,
    plain: &BTreeMap<(String, String), String>,
    packages_by_name: &BTreeMap<String, String>,
    std_nodes: &mut Vec<Function>,
) -> Option<String> {
    // Exact package-path match first, then package-name match (import paths
    // of analyzed targets rarely match verbatim without module metadata).
    let analyzed = plain
        .get(&(import_path.to_string(), name.to_string()))
        .cloned()
        .or_else(|| {
            let last = import_path.rsplit('/').next().unwrap_or(import_path);
            let pkg_path = packages_by_name.get(last)?;
            plain.get(&(pkg_path.clone(), name.to_string())).cloned()
        });
    if analyzed.is_some() {
        return analyzed;
    }

    if is_std_pkg_path(import_path) {
        let id = format!("{import_path}.{name}");
        std_nodes.push(Function {
            id: id.clone(),
            name: name.to_string(),
            package_path: import_path.to_string(),
            package_name: import_path.rsplit('/').next().unwrap_or(import_path).to_string(),
            file: String::new(),
            line: 0,
            exported: is_exported(name),
            receiver: None,
            std: true,
        });
        return Some(id);
    }

    None
}

/// RTA-style restriction: keep only what is reachable from `main`/`init`.
fn restrict_to_entry_reachable(graph: &mut CallGraph) -> Result<(), AnalysisError> {
    let mains: Vec<String> = graph
        .functions
        .values()
        .filter(|f| f.receiver.is_none() && f.name == "main" && f.package_name == "main")
        .map(|f| f.id.clone())
        .collect();
    if mains.is_empty() {
        return Err(AnalysisError::NoMainPackages);
    }

    let mut reachable: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    for root in graph.entry_roots() {
        if reachable.insert(root.clone()) {
            queue.push_back(root);
        }
    }

    let mut out: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for call in &graph.calls {
        out.entry(call.caller.as_str()).or_default().push(call.callee.as_str());
    }

    while let Some(id) = queue.pop_front() {
        if let Some(callees) = out.get(id.as_str()) {
            for callee in callees {
                if reachable.insert((*callee).to_string()) {
                    queue.push_back((*callee).to_string());
                }
            }
        }
    }

    graph.calls.retain(|c| reachable.contains(&c.caller));
    graph.functions.retain(|id, _| reachable.contains(id));
    Ok(())
}
