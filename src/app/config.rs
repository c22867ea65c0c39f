use directories::BaseDirs;
use figment::{
    providers::{Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{CONFIG_FILE_NAME, DEFAULT_ENVIRONMENT, DEFAULT_KONG_PORT, PROJECT_ROOT_ENV};
use crate::utils::{DeployError, Result};

/// Deployment configuration persisted in `~/.kc-deploy.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding compose files and infrastructure definitions.
    /// Empty means "resolve at runtime".
    #[serde(default)]
    pub project_root: String,

    /// Environment used when `--env` is not given
    #[serde(default = "default_environment")]
    pub default_environment: String,

    /// Kong instances, in insertion order
    #[serde(default, rename = "kong_instances")]
    pub gateway_instances: Vec<GatewayInstance>,
}

/// A named Kong deployment bound to one Keycloak realm and one port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayInstance {
    pub name: String,
    pub realm: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl GatewayInstance {
    pub fn new(name: impl Into<String>, realm: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            realm: realm.into(),
            port,
        }
    }
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

fn default_port() -> u16 {
    DEFAULT_KONG_PORT
}

impl Default for Config {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self {
            project_root: cwd.display().to_string(),
            default_environment: default_environment(),
            gateway_instances: vec![
                GatewayInstance::new("kong-public", "kong-realm", 8000),
                GatewayInstance::new("kong-internal", "internal-realm", 9000),
            ],
        }
    }
}

impl Config {
    /// Baseline that partial config files are layered over
    fn empty() -> Self {
        Self {
            project_root: String::new(),
            default_environment: default_environment(),
            gateway_instances: Vec::new(),
        }
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing file is not an error: the built-in default is returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| DeployError::ConfigRead {
            path: path.clone(),
            source,
        })?;

        Figment::from(Serialized::defaults(Self::empty()))
            .merge(Yaml::string(&content))
            .extract()
            .map_err(|e| DeployError::ConfigParse {
                path,
                message: e.to_string(),
            })
    }

    /// Save configuration to `path`, or to the default location
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
        let write_err = |message: String| DeployError::ConfigWrite {
            path: path.clone(),
            message,
        };

        let yaml = serde_yaml::to_string(self).map_err(|e| write_err(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        std::fs::write(&path, yaml).map_err(|e| write_err(e.to_string()))?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Resolve the project root: explicit field, then environment, then cwd
    pub fn project_root(&self) -> PathBuf {
        self.project_root_from(
            std::env::var(PROJECT_ROOT_ENV).ok(),
            std::env::current_dir().ok(),
        )
    }

    fn project_root_from(&self, env_override: Option<String>, cwd: Option<PathBuf>) -> PathBuf {
        if !self.project_root.is_empty() {
            return PathBuf::from(&self.project_root);
        }

        if let Some(root) = env_override.filter(|r| !r.is_empty()) {
            return PathBuf::from(root);
        }

        cwd.unwrap_or_else(|| PathBuf::from("."))
    }

    /// Find a Kong instance by name
    pub fn find_instance(&self, name: &str) -> Result<&GatewayInstance> {
        self.gateway_instances
            .iter()
            .find(|i| i.name == name)
            .ok_or_else(|| DeployError::NotFound(name.to_string()))
    }

    /// Append a Kong instance; names must stay unique
    pub fn add_instance(&mut self, instance: GatewayInstance) -> Result<()> {
        if self.gateway_instances.iter().any(|i| i.name == instance.name) {
            return Err(DeployError::DuplicateName(instance.name));
        }

        self.gateway_instances.push(instance);
        Ok(())
    }

    /// Remove a Kong instance by name, keeping the others in order
    pub fn remove_instance(&mut self, name: &str) -> Result<GatewayInstance> {
        let index = self
            .gateway_instances
            .iter()
            .position(|i| i.name == name)
            .ok_or_else(|| DeployError::NotFound(name.to_string()))?;

        Ok(self.gateway_instances.remove(index))
    }
}

/// Default config file location: `$HOME/.kc-deploy.yaml`
pub fn default_config_path() -> PathBuf {
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    }
}
