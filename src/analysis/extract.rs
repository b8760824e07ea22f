//! Tree-sitter based extraction of Go declarations and call sites.
//!
//! One [`FileSummary`] per source file: the package clause, the import table
//! (local name → import path), and every function/method declaration with the
//! call expressions found in its body. Resolution into a call graph happens
//! later, once all files of all targets are known.

use std::collections::BTreeMap;

use tree_sitter::{Node as TsNode, Parser, Tree};

use super::AnalysisError;

/// Extracted view of a single Go source file.
#[derive(Debug, Clone)]
pub struct FileSummary {
    /// File path as given to the extractor (used in labels and errors).
    pub path: String,
    pub package_name: String,
    /// Local import name → import path (`json` → `encoding/json`).
    pub imports: BTreeMap<String, String>,
    pub functions: Vec<FunctionDecl>,
}

/// A function or method declaration with its call sites.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    /// Receiver type name for methods, `None` for plain functions.
    pub receiver: Option<String>,
    /// 1-based declaration line.
    pub line: u32,
    pub calls: Vec<CallSite>,
}

/// A single call expression inside a function body.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub target: CallTarget,
    /// 1-based call line.
    pub line: u32,
}

/// Syntactic form of a call target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    /// `foo(...)` — bare identifier.
    Plain(String),
    /// `x.Foo(...)` — selector; the qualifier is an import name or a value.
    Qualified { qualifier: String, name: String },
}

/// Extract declarations and call sites from one Go source file.
pub fn extract_file(path: &str, source: &str) -> Result<FileSummary, AnalysisError> {
    let tree = parse_source(path, source)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(AnalysisError::Parse {
            message: "source contains syntax errors".to_string(),
            path: path.to_string(),
        });
    }

    let src = source.as_bytes();
    let mut summary = FileSummary {
        path: path.to_string(),
        package_name: String::new(),
        imports: BTreeMap::new(),
        functions: Vec::new(),
    };

    let mut cursor = root.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            match child.kind() {
                "package_clause" => {
                    if let Some(ident) = find_child_by_kind(child, "package_identifier") {
                        summary.package_name = node_text(ident, src);
                    }
                }
                "import_declaration" => visit_imports(child, src, &mut summary.imports),
                "function_declaration" => {
                    if let Some(decl) = visit_function(child, src) {
                        summary.functions.push(decl);
                    }
                }
                "method_declaration" => {
                    if let Some(decl) = visit_method(child, src) {
                        summary.functions.push(decl);
                    }
                }
                _ => {}
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    if summary.package_name.is_empty() {
        return Err(AnalysisError::Parse {
            message: "missing package clause".to_string(),
            path: path.to_string(),
        });
    }

    Ok(summary)
}

fn parse_source(path: &str, source: &str) -> Result<Tree, AnalysisError> {
    let mut parser = Parser::new();
    let language = tree_sitter_go::LANGUAGE;
    parser
        .set_language(&language.into())
        .map_err(|e| AnalysisError::Parse {
            message: format!("failed to load Go grammar: {e}"),
            path: path.to_string(),
        })?;
    parser.parse(source, None).ok_or_else(|| AnalysisError::Parse {
        message: "tree-sitter parse returned no tree".to_string(),
        path: path.to_string(),
    })
}

/// Collect import specs into the local-name → path table.
///
/// Handles both `import "foo"` and grouped `import ( ... )` forms. Blank and
/// dot imports contribute no callable name and are skipped.
fn visit_imports(node: TsNode<'_>, src: &[u8], imports: &mut BTreeMap<String, String>) {
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            match child.kind() {
                "import_spec" => visit_single_import(child, src, imports),
                "import_spec_list" => {
                    let mut inner = child.walk();
                    if inner.goto_first_child() {
                        loop {
                            let spec = inner.node();
                            if spec.kind() == "import_spec" {
                                visit_single_import(spec, src, imports);
                            }
                            if !inner.goto_next_sibling() {
                                break;
                            }
                        }
                    }
                }
                _ => {}
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

fn visit_single_import(node: TsNode<'_>, src: &[u8], imports: &mut BTreeMap<String, String>) {
    let path = match find_child_by_kind(node, "interpreted_string_literal") {
        Some(lit) => node_text(lit, src).trim_matches('"').to_string(),
        None => return,
    };

    if find_child_by_kind(node, "blank_identifier").is_some()
        || find_child_by_kind(node, "dot").is_some()
    {
        return;
    }

    let local = match find_child_by_kind(node, "package_identifier") {
        Some(alias) => node_text(alias, src),
        // Default local name is the last path segment.
        None => path.rsplit('/').next().unwrap_or(path.as_str()).to_string(),
    };

    imports.insert(local, path);
}

fn visit_function(node: TsNode<'_>, src: &[u8]) -> Option<FunctionDecl> {
    let name = find_child_by_kind(node, "identifier").map(|n| node_text(n, src))?;
    let mut decl = FunctionDecl {
        name,
        receiver: None,
        line: node.start_position().row as u32 + 1,
        calls: Vec::new(),
    };
    if let Some(body) = find_child_by_kind(node, "block") {
        extract_call_sites(body, src, &mut decl.calls);
    }
    Some(decl)
}

fn visit_method(node: TsNode<'_>, src: &[u8]) -> Option<FunctionDecl> {
    let name = find_child_by_kind(node, "field_identifier").map(|n| node_text(n, src))?;
    let mut decl = FunctionDecl {
        name,
        receiver: extract_receiver_type(node, src),
        line: node.start_position().row as u32 + 1,
        calls: Vec::new(),
    };
    if let Some(body) = find_child_by_kind(node, "block") {
        extract_call_sites(body, src, &mut decl.calls);
    }
    Some(decl)
}

/// Receiver type name from the first parameter list of a method declaration.
/// Handles both `c Circle` and `c *Circle` forms.
fn extract_receiver_type(node: TsNode<'_>, src: &[u8]) -> Option<String> {
    let params = find_child_by_kind(node, "parameter_list")?;
    let param = find_child_by_kind(params, "parameter_declaration")?;
    if let Some(type_id) = find_child_by_kind(param, "type_identifier") {
        return Some(node_text(type_id, src));
    }
    if let Some(ptr) = find_child_by_kind(param, "pointer_type") {
        if let Some(type_id) = find_child_by_kind(ptr, "type_identifier") {
            return Some(node_text(type_id, src));
        }
    }
    None
}

/// Recursively collect call expressions inside a body.
///
/// Function literal bodies are skipped: their calls belong to the closure,
/// not to the enclosing declaration.
fn extract_call_sites(node: TsNode<'_>, src: &[u8], calls: &mut Vec<CallSite>) {
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            match child.kind() {
                "call_expression" => {
                    if let Some(target) = call_target(child, src) {
                        calls.push(CallSite {
                            target,
                            line: child.start_position().row as u32 + 1,
                        });
                    }
                    // Nested calls in arguments or chained selectors.
                    extract_call_sites(child, src, calls);
                }
                "func_literal" => {}
                _ => extract_call_sites(child, src, calls),
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

/// Classify the callee of a call expression.
fn call_target(call: TsNode<'_>, src: &[u8]) -> Option<CallTarget> {
    let callee = call.named_child(0)?;
    match callee.kind() {
        "identifier" => Some(CallTarget::Plain(node_text(callee, src))),
        "selector_expression" => {
            let field = find_child_by_kind(callee, "field_identifier")?;
            let qualifier = callee.named_child(0)?;
            Some(CallTarget::Qualified {
                qualifier: node_text(qualifier, src),
                name: node_text(field, src),
            })
        }
        // Conversions, parenthesized and literal callees carry no resolvable
        // name at the syntax level.
        _ => None,
    }
}

fn node_text(node: TsNode<'_>, src: &[u8]) -> String {
    node.utf8_text(src).unwrap_or("<invalid utf8>").to_string()
}

/// Find the first child of a node with a given kind.
fn find_child_by_kind<'a>(node: TsNode<'a>, kind: &str) -> Option<TsNode<'a>> {
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if child.kind() == kind {
                return Some(child);
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    None
}
