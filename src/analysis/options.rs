use std::path::PathBuf;
use std::str::FromStr;

use super::AnalysisError;

/// Call graph construction algorithm.
///
/// All three are syntax-level approximations: `static` resolves only
/// unambiguous direct calls, `cha` additionally links receiver calls to every
/// method of the same name, `rta` prunes `cha` to the nodes reachable from
/// the program's entry roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algo {
    Static,
    Cha,
    #[default]
    Rta,
}

impl Algo {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Cha => "cha",
            Self::Rta => "rta",
        }
    }
}

impl FromStr for Algo {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "cha" => Ok(Self::Cha),
            "rta" => Ok(Self::Rta),
            other => Err(AnalysisError::InvalidAlgo(other.to_string())),
        }
    }
}

/// Diagram grouping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Pkg,
    Type,
}

impl FromStr for GroupBy {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pkg" => Ok(Self::Pkg),
            "type" => Ok(Self::Type),
            other => Err(AnalysisError::InvalidGroup(other.to_string())),
        }
    }
}

/// Traversal direction for the call hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Downstream,
    Upstream,
    Both,
}

impl FromStr for Direction {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "downstream" => Ok(Self::Downstream),
            "upstream" => Ok(Self::Upstream),
            "both" => Ok(Self::Both),
            other => Err(AnalysisError::InvalidDirection(other.to_string())),
        }
    }
}

/// Resolved analysis options shared by both tools.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Target directories to analyze, already resolved against `dir`.
    pub targets: Vec<PathBuf>,
    pub focus: Option<String>,
    pub group: Vec<GroupBy>,
    /// Substring filters: both endpoints must match one.
    pub limit_keyword: Vec<String>,
    /// Prefix filters: both endpoints must match one.
    pub limit_prefix: Vec<String>,
    /// Substring excludes: either endpoint matching drops the edge.
    pub ignore: Vec<String>,
    pub nostd: bool,
    pub nointer: bool,
    pub tests: bool,
    pub algo: Algo,
    /// Maximum depth from the roots; 0 disables the limit.
    pub max_depth: u32,
}

impl AnalysisOptions {
    /// Parse grouping strategies from their wire form, trimming entries and
    /// rejecting unknown values.
    pub fn parse_group(values: &[String]) -> Result<Vec<GroupBy>, AnalysisError> {
        let mut group = Vec::new();
        for raw in values {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let parsed = trimmed.parse::<GroupBy>()?;
            if !group.contains(&parsed) {
                group.push(parsed);
            }
        }
        Ok(group)
    }

    /// Trim a filter list, dropping empty entries.
    pub fn clean_paths(values: &[String]) -> Vec<String> {
        values
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }
}
