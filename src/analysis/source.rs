//! Discovery and extraction of Go sources under the requested targets.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use super::extract::{self, FileSummary};
use super::AnalysisError;

/// A parsed source file tagged with the package path it belongs to.
#[derive(Debug, Clone)]
pub struct PackagedFile {
    pub package_path: String,
    pub summary: FileSummary,
}

/// Load and extract every Go source file under the given targets.
///
/// Targets must exist. Each directory is walked gitignore-aware; `_test.go`
/// files are skipped unless `tests` is set, as are hidden entries and
/// `vendor/` trees. File order is deterministic.
pub fn load(targets: &[PathBuf], tests: bool) -> Result<Vec<PackagedFile>, AnalysisError> {
    let mut out = Vec::new();

    for target in targets {
        if !target.exists() {
            return Err(AnalysisError::MissingTarget(target.display().to_string()));
        }

        for path in collect_go_files(target, tests)? {
            let source = std::fs::read_to_string(&path)?;
            let summary = extract::extract_file(&path.display().to_string(), &source)?;
            let package_path = package_path(target, &path, &summary.package_name);
            out.push(PackagedFile { package_path, summary });
        }
    }

    if out.is_empty() {
        let shown: Vec<String> = targets.iter().map(|t| t.display().to_string()).collect();
        return Err(AnalysisError::NoSources(shown.join(", ")));
    }

    Ok(out)
}

fn collect_go_files(target: &Path, tests: bool) -> Result<Vec<PathBuf>, AnalysisError> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }

    let mut files = Vec::new();
    let walker = WalkBuilder::new(target)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for entry in walker {
        let entry = entry.map_err(|e| AnalysisError::Walk(e.to_string()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".go") {
            continue;
        }
        if name.ends_with("_test.go") && !tests {
            continue;
        }
        if path.components().any(|c| c.as_os_str() == "vendor") {
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Derive a package path for a file under a target.
///
/// Files directly under the target root take the package-clause name; files
/// in subdirectories take `<target base>/<relative dir>`, which mirrors how
/// Go import paths nest without requiring module metadata.
fn package_path(target: &Path, file: &Path, package_name: &str) -> String {
    let rel_dir = file
        .parent()
        .and_then(|dir| dir.strip_prefix(target).ok())
        .unwrap_or_else(|| Path::new(""));

    if rel_dir.as_os_str().is_empty() {
        return package_name.to_string();
    }

    let rel: Vec<String> = rel_dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    match target.file_name() {
        Some(base) => format!("{}/{}", base.to_string_lossy(), rel.join("/")),
        None => rel.join("/"),
    }
}
