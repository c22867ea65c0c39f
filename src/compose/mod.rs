/// Compose process adapter module - Gateway
mod client;
mod component;
mod runner;

#[cfg(test)]
pub(crate) use client::testing;

pub use client::DockerCompose;
pub use component::Component;
pub(crate) use runner::runtime_missing;
pub use runner::{detect_container_runtime, ComposeRunner, ProcessRunner};
