use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::compose::{detect_container_runtime, runtime_missing};
use crate::constants::REQUIRED_PROJECT_DIRS;
use crate::utils::{Result, ValidationIssue};

/// The parts of a compose file we care about
#[derive(Debug, Deserialize)]
pub struct ComposeDocument {
    /// `None` when the key is absent, `Some(None)` for `services:` with no value
    #[serde(default, deserialize_with = "present")]
    pub services: Option<Option<BTreeMap<String, serde_yaml::Value>>>,
}

/// Marks a key as present even when its value is null
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// The parts of a Keycloak realm export we care about
#[derive(Debug, Deserialize)]
pub struct RealmDocument {
    #[serde(default)]
    pub realm: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

fn read_existing(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ValidationIssue::MissingFile(path.to_path_buf()).into());
    }

    std::fs::read_to_string(path).map_err(|e| {
        ValidationIssue::Malformed {
            path: path.to_path_buf(),
            format: "file",
            message: e.to_string(),
        }
        .into()
    })
}

/// Validate a docker compose file: must parse and declare `services`
pub fn validate_compose_file(path: &Path) -> Result<ComposeDocument> {
    debug!("Validating compose file {}", path.display());
    let content = read_existing(path)?;

    let doc: ComposeDocument =
        serde_yaml::from_str(&content).map_err(|e| ValidationIssue::Malformed {
            path: path.to_path_buf(),
            format: "YAML",
            message: e.to_string(),
        })?;

    if doc.services.is_none() {
        return Err(ValidationIssue::MissingField {
            path: path.to_path_buf(),
            field: "services",
        }
        .into());
    }

    Ok(doc)
}

/// Validate a Keycloak realm file: must be JSON with a non-empty `realm`
pub fn validate_realm_file(path: &Path) -> Result<RealmDocument> {
    debug!("Validating realm file {}", path.display());
    let content = read_existing(path)?;

    let doc: RealmDocument =
        serde_json::from_str(&content).map_err(|e| ValidationIssue::Malformed {
            path: path.to_path_buf(),
            format: "JSON",
            message: e.to_string(),
        })?;

    if doc.realm.as_deref().map_or(true, str::is_empty) {
        return Err(ValidationIssue::MissingField {
            path: path.to_path_buf(),
            field: "realm",
        }
        .into());
    }

    Ok(doc)
}

/// Check that the project root has the expected directory layout
pub fn validate_project_structure(project_root: &Path) -> Result<()> {
    for dir in REQUIRED_PROJECT_DIRS {
        if !project_root.join(dir).is_dir() {
            return Err(ValidationIssue::MissingDirectory(PathBuf::from(dir)).into());
        }
    }
    Ok(())
}

/// Check that a container runtime is installed and return its name
pub fn validate_runtime_installation() -> Result<&'static str> {
    detect_container_runtime().ok_or_else(runtime_missing)
}
