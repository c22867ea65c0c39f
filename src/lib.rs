pub mod app;
pub mod cli;
pub mod compose;
pub mod constants;
pub mod utils;
pub mod validate;

pub use app::{Config, GatewayInstance};
pub use compose::{Component, ComposeRunner, DockerCompose, ProcessRunner};
pub use utils::{DeployError, ValidationIssue};
