//! Configuration Catalog
//!
//! Scans the working directory for installer configuration files and narrows
//! them down by target architecture:
//! - Architecture: the filter selected by the user (All / x64 / x86)
//! - CatalogRules: file extension and canonical default names
//! - CandidateSet: the visible files, plus which empty state applies
//!
//! The filesystem is the source of truth, so nothing here is cached.

use std::fs;
use std::path::Path;

/// Default configuration file extension
pub const CONFIG_EXTENSION: &str = ".xml";

/// Names pre-selected when present in the listing
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["Configuracao.xml", "Configuração.xml"];

/// Target CPU architecture used to filter configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Architecture {
    #[default]
    All,
    X64,
    X86,
}

impl Architecture {
    pub const CHOICES: [Architecture; 3] = [Architecture::All, Architecture::X64, Architecture::X86];

    /// Substring heuristic on the file name.
    /// "64" anywhere means x64; "86" or "32" anywhere means x86.
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            Architecture::All => true,
            Architecture::X64 => file_name.contains("64"),
            Architecture::X86 => file_name.contains("86") || file_name.contains("32"),
        }
    }

    /// Label shown next to the radio button
    pub fn label(&self) -> &'static str {
        match self {
            Architecture::All => "Todos",
            Architecture::X64 => "64 Bits (x64)",
            Architecture::X86 => "32 Bits (x86)",
        }
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Architecture::All => write!(f, "all"),
            Architecture::X64 => write!(f, "x64"),
            Architecture::X86 => write!(f, "x86"),
        }
    }
}

impl std::str::FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "todos" => Ok(Architecture::All),
            "x64" | "64" => Ok(Architecture::X64),
            "x86" | "86" | "32" => Ok(Architecture::X86),
            other => Err(format!("Unknown architecture: {}", other)),
        }
    }
}

/// Why the candidate set is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The directory holds no configuration files at all
    NoConfigFiles,
    /// Configuration files exist, but none match the architecture filter
    NoFilesForArchitecture,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoConfigFiles => "Nenhum arquivo XML encontrado",
            EmptyState::NoFilesForArchitecture => "Nenhum arquivo para esta arquitetura",
        }
    }
}

/// Matching rules for a directory scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRules {
    pub extension: String,
    pub default_names: Vec<String>,
}

impl Default for CatalogRules {
    fn default() -> Self {
        CatalogRules {
            extension: CONFIG_EXTENSION.to_string(),
            default_names: DEFAULT_CONFIG_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// Result of a directory scan under one architecture filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    candidates: Vec<String>,
    total_configs: usize,
    default_index: Option<usize>,
}

impl CandidateSet {
    /// Visible file names, sorted by name
    pub fn names(&self) -> &[String] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of configuration files before the architecture filter
    pub fn total_configs(&self) -> usize {
        self.total_configs
    }

    pub fn contains(&self, name: &str) -> bool {
        self.candidates.iter().any(|c| c == name)
    }

    /// Which empty case applies, or None when there is something to pick
    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.candidates.is_empty() {
            None
        } else if self.total_configs == 0 {
            Some(EmptyState::NoConfigFiles)
        } else {
            Some(EmptyState::NoFilesForArchitecture)
        }
    }

    pub fn can_launch(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Canonical default name if listed, else the first entry
    pub fn default_selection(&self) -> Option<&str> {
        self.default_index
            .or(if self.candidates.is_empty() { None } else { Some(0) })
            .and_then(|idx| self.candidates.get(idx))
            .map(|s| s.as_str())
    }
}

/// List configuration files directly inside `directory` that pass `filter`.
///
/// An unreadable or missing directory produces an empty set.
pub fn list_candidates(directory: &Path, filter: Architecture, rules: &CatalogRules) -> CandidateSet {
    let mut all_configs = scan_config_files(directory, &rules.extension);
    all_configs.sort();

    let total_configs = all_configs.len();
    let candidates: Vec<String> = all_configs
        .into_iter()
        .filter(|name| filter.matches(name))
        .collect();

    let default_index = candidates
        .iter()
        .position(|name| rules.default_names.iter().any(|d| d == name));

    tracing::debug!(
        "Catalog {:?} [{}]: {} of {} config files visible",
        directory,
        filter,
        candidates.len(),
        total_configs
    );

    CandidateSet {
        candidates,
        total_configs,
        default_index,
    }
}

/// `list_candidates` with the built-in extension and default names
pub fn list_candidates_default(directory: &Path, filter: Architecture) -> CandidateSet {
    list_candidates(directory, filter, &CatalogRules::default())
}

fn scan_config_files(directory: &Path, extension: &str) -> Vec<String> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Directory {:?} unreadable: {}", directory, e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(extension))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn dir_with(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in files {
            fs::write(dir.path().join(name), "<Configuration/>").unwrap();
        }
        dir
    }

    #[test]
    fn test_only_xml_files_directly_inside() {
        let dir = dir_with(&["a.xml", "b.txt", "setup.exe", "c.XML"]);
        fs::create_dir(dir.path().join("nested.xml")).unwrap();
        fs::write(dir.path().join("nested.xml").join("inner.xml"), "").unwrap();

        let set = list_candidates_default(dir.path(), Architecture::All);
        assert_eq!(set.names(), &["a.xml".to_string()]);
        assert_eq!(set.total_configs(), 1);
    }

    #[test]
    fn test_x64_filter_scenario() {
        let dir = dir_with(&["install-x64.xml", "install-x86.xml"]);

        let set = list_candidates_default(dir.path(), Architecture::X64);
        assert_eq!(set.names(), &["install-x64.xml".to_string()]);
        assert!(set.can_launch());
        assert_eq!(set.empty_state(), None);
    }

    #[test]
    fn test_x86_filter_accepts_32() {
        let dir = dir_with(&["office32.xml", "office-x86.xml", "office64.xml", "plain.xml"]);

        let set = list_candidates_default(dir.path(), Architecture::X86);
        assert_eq!(
            set.names(),
            &["office-x86.xml".to_string(), "office32.xml".to_string()]
        );
    }

    #[test]
    fn test_filtered_sets_are_subsets_of_all() {
        let dir = dir_with(&["a64.xml", "b86.xml", "c32.xml", "d.xml", "e2486.xml", "x64_32.xml"]);

        let all = list_candidates_default(dir.path(), Architecture::All);
        let x64 = list_candidates_default(dir.path(), Architecture::X64);
        let x86 = list_candidates_default(dir.path(), Architecture::X86);

        assert!(x64.names().iter().all(|n| all.contains(n)));
        assert!(x86.names().iter().all(|n| all.contains(n)));
        // Matches neither rule, only visible under All
        assert!(all.contains("d.xml"));
        assert!(!x64.contains("d.xml") && !x86.contains("d.xml"));
        // Plain substrings: "2486" holds "86" but not "64"
        assert!(!x64.contains("e2486.xml") && x86.contains("e2486.xml"));
        assert!(x64.contains("x64_32.xml") && x86.contains("x64_32.xml"));
    }

    #[test]
    fn test_listing_is_idempotent() {
        let dir = dir_with(&["z.xml", "a.xml", "m64.xml"]);

        let first = list_candidates_default(dir.path(), Architecture::All);
        let second = list_candidates_default(dir.path(), Architecture::All);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rescans_on_every_call() {
        let dir = dir_with(&["a.xml"]);
        assert_eq!(list_candidates_default(dir.path(), Architecture::All).len(), 1);

        fs::write(dir.path().join("b.xml"), "").unwrap();
        assert_eq!(list_candidates_default(dir.path(), Architecture::All).len(), 2);
    }

    #[test]
    fn test_default_selection_prefers_canonical_name() {
        let dir = dir_with(&["A.xml", "Configuracao.xml", "B.xml"]);

        let set = list_candidates_default(dir.path(), Architecture::All);
        assert_eq!(set.default_selection(), Some("Configuracao.xml"));
    }

    #[test]
    fn test_default_selection_accepts_accented_name() {
        let dir = dir_with(&["A.xml", "Configuração.xml"]);

        let set = list_candidates_default(dir.path(), Architecture::All);
        assert_eq!(set.default_selection(), Some("Configuração.xml"));
    }

    #[test]
    fn test_default_selection_falls_back_to_first() {
        let dir = dir_with(&["b.xml", "a.xml"]);

        let set = list_candidates_default(dir.path(), Architecture::All);
        assert_eq!(set.default_selection(), Some("a.xml"));
    }

    #[test]
    fn test_empty_directory_state() {
        let dir = dir_with(&[]);

        let set = list_candidates_default(dir.path(), Architecture::All);
        assert!(set.is_empty());
        assert!(!set.can_launch());
        assert_eq!(set.default_selection(), None);
        assert_eq!(set.empty_state(), Some(EmptyState::NoConfigFiles));
        assert_eq!(set.empty_state().unwrap().message(), "Nenhum arquivo XML encontrado");
    }

    #[test]
    fn test_architecture_mismatch_state() {
        let dir = dir_with(&["office-x86.xml"]);

        let set = list_candidates_default(dir.path(), Architecture::X64);
        assert!(!set.can_launch());
        assert_eq!(set.empty_state(), Some(EmptyState::NoFilesForArchitecture));
        assert_ne!(
            EmptyState::NoFilesForArchitecture.message(),
            EmptyState::NoConfigFiles.message()
        );
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let set = list_candidates_default(&missing, Architecture::All);
        assert_eq!(set.empty_state(), Some(EmptyState::NoConfigFiles));
    }

    #[test]
    fn test_custom_rules() {
        let dir = dir_with(&["office.cfg", "default.cfg", "other.xml"]);
        let rules = CatalogRules {
            extension: ".cfg".to_string(),
            default_names: vec!["default.cfg".to_string()],
        };

        let set = list_candidates(dir.path(), Architecture::All, &rules);
        assert_eq!(set.len(), 2);
        assert_eq!(set.default_selection(), Some("default.cfg"));
    }

    #[test]
    fn test_architecture_parse() {
        assert_eq!("x64".parse::<Architecture>(), Ok(Architecture::X64));
        assert_eq!("32".parse::<Architecture>(), Ok(Architecture::X86));
        assert_eq!("ALL".parse::<Architecture>(), Ok(Architecture::All));
        assert!("arm".parse::<Architecture>().is_err());
    }
}
