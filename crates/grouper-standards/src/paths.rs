//! Annex directory path resolution.

use std::path::{Path, PathBuf};

/// Environment variable for overriding the annex directory.
pub const ANNEX_DIR_ENV_VAR: &str = "GROUPER_ANNEX_DIR";

/// Annex directory used when neither a flag nor the environment names one.
pub const DEFAULT_ANNEX_DIR: &str = "Prilohy";

/// Get the annex directory.
///
/// Resolution order:
/// 1. explicit path (command-line flag)
/// 2. `GROUPER_ANNEX_DIR` environment variable
/// 3. `Prilohy/` relative to the working directory
pub fn annex_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var(ANNEX_DIR_ENV_VAR) {
        Ok(root) if !root.trim().is_empty() => PathBuf::from(root),
        _ => PathBuf::from(DEFAULT_ANNEX_DIR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let root = annex_root(Some(Path::new("/tmp/annexes")));
        assert_eq!(root, PathBuf::from("/tmp/annexes"));
    }
}
