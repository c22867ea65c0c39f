/// Constants module to avoid magic numbers in the codebase

// Configuration
pub const CONFIG_FILE_NAME: &str = ".kc-deploy.yaml";
pub const PROJECT_ROOT_ENV: &str = "KC_DEPLOY_PROJECT_ROOT";
pub const DEFAULT_ENVIRONMENT: &str = "dev";
pub const DEFAULT_KONG_PORT: u16 = 8000;

// Container runtimes, in order of preference. Both accept `compose`.
pub const CONTAINER_RUNTIMES: &[&str] = &["docker", "podman"];

// Project layout
pub const ENVIRONMENTS_DIR: &str = "compose/environments";
pub const REQUIRED_PROJECT_DIRS: &[&str] = &["infrastructure/keycloak", "infrastructure/kong", "compose"];

// Logs
pub const DEFAULT_LOG_TAIL: usize = 100;
