//! Renderer binary discovery

use std::path::{Path, PathBuf};

use crate::config::BridgeConfig;

/// File name of the Remix runtime shipped with the SDK
pub const DEFAULT_LIBRARY_FILE: &str = "d3d9.dll";

/// Probe order: working directory, then the SDK's `bin` folder
pub const DEFAULT_SEARCH_DIRS: [&str; 2] = [".", "bin"];

/// Outcome of a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedLibrary {
    /// Path to hand to the binder
    pub path: PathBuf,
    /// Whether a file was actually seen at `path`
    pub found: bool,
}

/// Probes a short ordered list of directories for the renderer binary
///
/// A miss is not an error: the locator warns and falls back to the primary
/// candidate so the loader reports the authoritative failure.
#[derive(Debug, Clone)]
pub struct LibraryLocator {
    file_name: PathBuf,
    search_dirs: Vec<PathBuf>,
    root: Option<PathBuf>,
}

impl LibraryLocator {
    /// Probe the default directories for `file_name`
    pub fn new(file_name: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            search_dirs: DEFAULT_SEARCH_DIRS.iter().map(PathBuf::from).collect(),
            root: None,
        }
    }

    /// Build from bridge configuration
    pub fn from_config(config: &BridgeConfig) -> Self {
        let locator = Self::new(&config.library_file_name).with_search_dirs(config.search_dirs.clone());
        match &config.search_root {
            Some(root) => locator.with_root(root),
            None => locator,
        }
    }

    /// Replace the probed directories
    pub fn with_search_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve search directories against `root`
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Candidate paths in probe order
    pub fn candidates(&self) -> Vec<PathBuf> {
        let base = self.root.as_deref().unwrap_or_else(|| Path::new(""));
        if self.search_dirs.is_empty() {
            return vec![base.join(&self.file_name)];
        }
        self.search_dirs
            .iter()
            .map(|dir| base.join(dir).join(&self.file_name))
            .collect()
    }

    /// Return the first candidate that exists, else the primary one
    pub fn locate(&self) -> LocatedLibrary {
        let candidates = self.candidates();

        if let Some(path) = candidates.iter().find(|path| path.metadata().is_ok()) {
            log::debug!("Found renderer library at {}", path.display());
            return LocatedLibrary {
                path: path.clone(),
                found: true,
            };
        }

        let probed: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        log::warn!(
            "Couldn't find {} (probed: {}). Is the SDK installed properly?",
            self.file_name.display(),
            probed.join(", ")
        );

        // candidates() never returns an empty list
        let primary = candidates.into_iter().next().unwrap_or_else(|| self.file_name.clone());
        LocatedLibrary {
            path: primary,
            found: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_default_candidates() {
        let locator = LibraryLocator::new("d3d9.dll");
        assert_eq!(
            locator.candidates(),
            vec![PathBuf::from("./d3d9.dll"), PathBuf::from("bin/d3d9.dll")]
        );
    }

    #[test]
    fn test_primary_wins_when_both_exist() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("d3d9.dll"));
        touch(&dir.path().join("bin").join("d3d9.dll"));

        let located = LibraryLocator::new("d3d9.dll").with_root(dir.path()).locate();
        assert!(located.found);
        assert_eq!(located.path, dir.path().join(".").join("d3d9.dll"));
    }

    #[test]
    fn test_secondary_used_when_primary_missing() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("bin").join("d3d9.dll"));

        let located = LibraryLocator::new("d3d9.dll").with_root(dir.path()).locate();
        assert!(located.found);
        assert_eq!(located.path, dir.path().join("bin").join("d3d9.dll"));
    }

    #[test]
    fn test_falls_back_to_primary_when_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        // A decoy in a directory that is not on the search list
        touch(&dir.path().join("lib").join("d3d9.dll"));

        let located = LibraryLocator::new("d3d9.dll").with_root(dir.path()).locate();
        assert!(!located.found);
        assert_eq!(located.path, dir.path().join(".").join("d3d9.dll"));
    }

    #[test]
    fn test_from_config_uses_custom_dirs() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("runtime").join("remix.dll"));

        let config = BridgeConfig::new("remix.dll")
            .with_search_dirs(["bin", "runtime"])
            .with_search_root(dir.path());
        let located = LibraryLocator::from_config(&config).locate();
        assert!(located.found);
        assert_eq!(located.path, dir.path().join("runtime").join("remix.dll"));
    }

    #[test]
    fn test_empty_search_list_probes_file_name_only() {
        let locator = LibraryLocator::new("d3d9.dll").with_search_dirs(Vec::<PathBuf>::new());
        assert_eq!(locator.candidates(), vec![PathBuf::from("d3d9.dll")]);
    }
}
