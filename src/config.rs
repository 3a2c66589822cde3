use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory holding the store, relative to the project root.
pub const STORE_DIR: &str = ".glassy";

/// Store database file name inside [`STORE_DIR`].
pub const STORE_FILE: &str = "store.db";

/// Environment variable overriding the store location.
pub const STORE_ENV: &str = "GLASSY_NOTES_STORE";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "GLASSY_LOG";

/// Where the notes store lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(STORE_DIR).join(STORE_FILE),
        }
    }
}

impl StoreConfig {
    /// Resolve from an explicit path, then the environment, then the project root.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return Self { path };
        }
        if let Some(path) = env::var_os(STORE_ENV).filter(|v| !v.is_empty()) {
            return Self {
                path: PathBuf::from(path),
            };
        }
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::under_root(&find_project_root(&cwd))
    }

    /// Default store location under a project root.
    pub fn under_root(root: &Path) -> Self {
        Self {
            path: root.join(STORE_DIR).join(STORE_FILE),
        }
    }
}

/// Find the project root by looking for .glassy/ or .git/
pub fn find_project_root(start: &Path) -> PathBuf {
    let mut current = start;
    loop {
        if current.join(STORE_DIR).exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return start.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.path, PathBuf::from(".glassy/store.db"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let config = StoreConfig::resolve(Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(config.path, PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn test_find_root_walks_up_to_git() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested), tmp.path());
    }

    #[test]
    fn test_find_root_prefers_nearest_store_dir() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        let inner = tmp.path().join("inner");
        fs::create_dir_all(inner.join(STORE_DIR)).unwrap();
        assert_eq!(find_project_root(&inner), inner);
        assert_eq!(
            StoreConfig::under_root(&inner).path,
            inner.join(".glassy").join("store.db")
        );
    }

    #[test]
    fn test_serialization() {
        let config = StoreConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: StoreConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
