//! Standard-library classification for Go package paths.

/// Top-level packages of the Go standard library.
const STD_ROOTS: &[&str] = &[
    "archive", "bufio", "builtin", "bytes", "compress", "container", "context", "crypto",
    "database", "debug", "embed", "encoding", "errors", "expvar", "flag", "fmt", "go", "hash",
    "html", "image", "index", "io", "log", "math", "mime", "net", "os", "path", "plugin",
    "reflect", "regexp", "runtime", "sort", "strconv", "strings", "sync", "syscall", "testing",
    "text", "time", "unicode", "unsafe",
];

/// Whether a package path belongs to the Go standard library.
///
/// `main` is never std. Paths containing a dot are user packages (domain
/// imports like `github.com/...`). Multi-segment paths are std only when the
/// first segment is a known std root (`io/fs`, `math/bits`); single-segment
/// dotless paths are std.
pub fn is_std_pkg_path(path: &str) -> bool {
    if path == "main" {
        return false;
    }
    if path.contains('.') {
        return false;
    }
    if let Some((first, _)) = path.split_once('/') {
        return STD_ROOTS.contains(&first);
    }
    true
}

/// Whether a package path is an internal/runtime package, excluded alongside
/// the standard library when `nostd` is set.
pub fn is_internal_pkg(path: &str) -> bool {
    path.starts_with("internal/")
        || path.contains("/internal/")
        || path == "runtime"
        || path.starts_with("runtime/")
        || path == "sync"
        || path.starts_with("sync/")
}
