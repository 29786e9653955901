#![deny(unsafe_code)]

//! Optional `manifest.toml` pinning the annex files of one rule-book edition.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StandardsError;
use crate::hash::sha256_hex;

pub const MANIFEST_FILE: &str = "manifest.toml";
pub const MANIFEST_SCHEMA: &str = "grouper.annex-manifest";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestHeader,
    #[serde(default)]
    pub notes: Option<ManifestNotes>,
    pub pins: Pins,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestNotes {
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pins {
    /// Edition of the rule book, e.g. `531/2023 Z. z. (2024)`.
    pub rule_book: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
    #[serde(default)]
    pub notes: Option<String>,
}

pub fn load_manifest(path: &Path) -> Result<Manifest, StandardsError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| StandardsError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn validate_manifest(manifest: &Manifest) -> Result<(), StandardsError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(StandardsError::InvalidManifest {
            message: format!("unsupported schema: {}", manifest.manifest.schema),
        });
    }
    if manifest.manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(StandardsError::InvalidManifest {
            message: format!(
                "unsupported schema_version: {}",
                manifest.manifest.schema_version
            ),
        });
    }
    if manifest.pins.rule_book.trim().is_empty() {
        return Err(StandardsError::InvalidManifest {
            message: "pins.rule_book must not be empty".to_string(),
        });
    }
    for file in &manifest.files {
        validate_sha(&file.sha256, &file.path)?;
        validate_path(&file.path)?;
    }
    Ok(())
}

/// Check one listed file against its pinned digest.
pub fn verify_file(annex_dir: &Path, file: &ManifestFile) -> Result<(), StandardsError> {
    let full_path = annex_dir.join(&file.path);
    let bytes = std::fs::read(&full_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            StandardsError::MissingFile {
                path: full_path.clone(),
            }
        } else {
            StandardsError::io(full_path.clone(), e)
        }
    })?;

    let actual = sha256_hex(&bytes);
    let expected = file.sha256.to_ascii_lowercase();
    if actual != expected {
        return Err(StandardsError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok(())
}

fn validate_sha(sha: &str, path: &str) -> Result<(), StandardsError> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StandardsError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "expected 64 hex characters".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), StandardsError> {
    let candidate = Path::new(path);
    let escapes = candidate
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if path.is_empty() || escapes {
        return Err(StandardsError::InvalidManifest {
            message: format!("file path must stay inside the annex directory: {path}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(schema: &str, sha: &str, path: &str) -> Manifest {
        Manifest {
            manifest: ManifestHeader {
                schema: schema.to_string(),
                schema_version: 1,
            },
            notes: None,
            pins: Pins {
                rule_book: "2024".to_string(),
            },
            files: vec![ManifestFile {
                path: path.to_string(),
                sha256: sha.to_string(),
                notes: None,
            }],
        }
    }

    #[test]
    fn rejects_foreign_schema() {
        let sha = "a".repeat(64);
        let err = validate_manifest(&manifest("other", &sha, "p12.csv")).unwrap_err();
        assert!(matches!(err, StandardsError::InvalidManifest { .. }));
    }

    #[test]
    fn rejects_short_digest() {
        let err = validate_manifest(&manifest(MANIFEST_SCHEMA, "abc", "p12.csv")).unwrap_err();
        assert!(matches!(err, StandardsError::InvalidSha256 { .. }));
    }

    #[test]
    fn rejects_parent_paths() {
        let sha = "a".repeat(64);
        let err = validate_manifest(&manifest(MANIFEST_SCHEMA, &sha, "../p12.csv")).unwrap_err();
        assert!(matches!(err, StandardsError::InvalidManifest { .. }));
    }
}
