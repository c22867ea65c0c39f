use std::path::{Path, PathBuf};

use super::component::Component;
use super::runner::ComposeRunner;
use crate::utils::Result;

/// Handles docker compose operations against one project root
pub struct DockerCompose<R> {
    runner: R,
    project_root: PathBuf,
    env_file: Option<PathBuf>,
}

impl<R: ComposeRunner> DockerCompose<R> {
    pub fn new(runner: R, project_root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            project_root: project_root.into(),
            env_file: None,
        }
    }

    /// Pass `--env-file` to every invocation
    pub fn with_env_file(mut self, env_file: impl Into<PathBuf>) -> Self {
        self.env_file = Some(env_file.into());
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn runner(&self) -> &R {
        &self.runner
    }

    /// Absolute path to a component's compose file
    pub fn compose_file(&self, component: Component) -> PathBuf {
        component.compose_file(&self.project_root)
    }

    /// `compose -f <file> [--env-file <env>]`
    fn base_args(&self, compose_file: &Path) -> Vec<String> {
        let mut args = vec![
            "compose".to_string(),
            "-f".to_string(),
            compose_file.display().to_string(),
        ];

        if let Some(env_file) = &self.env_file {
            args.push("--env-file".to_string());
            args.push(env_file.display().to_string());
        }

        args
    }

    /// Start services
    pub fn up(&self, compose_file: &Path, detach: bool) -> Result<()> {
        let mut args = self.base_args(compose_file);
        args.push("up".to_string());
        if detach {
            args.push("-d".to_string());
        }
        self.runner.run(&args)
    }

    /// Stop and remove services
    pub fn down(&self, compose_file: &Path, remove_volumes: bool) -> Result<()> {
        let mut args = self.base_args(compose_file);
        args.push("down".to_string());
        if remove_volumes {
            args.push("-v".to_string());
        }
        self.runner.run(&args)
    }

    /// Show logs; `tail == 0` shows everything
    pub fn logs(&self, compose_file: &Path, service: &str, follow: bool, tail: usize) -> Result<()> {
        let mut args = self.base_args(compose_file);
        args.push("logs".to_string());
        if follow {
            args.push("-f".to_string());
        }
        if tail > 0 {
            args.push("--tail".to_string());
            args.push(tail.to_string());
        }
        push_service(&mut args, service);
        self.runner.run(&args)
    }

    pub fn status(&self, compose_file: &Path) -> Result<()> {
        let mut args = self.base_args(compose_file);
        args.push("ps".to_string());
        self.runner.run(&args)
    }

    pub fn build(&self, compose_file: &Path, service: &str) -> Result<()> {
        let mut args = self.base_args(compose_file);
        args.push("build".to_string());
        push_service(&mut args, service);
        self.runner.run(&args)
    }

    pub fn pull(&self, compose_file: &Path) -> Result<()> {
        let mut args = self.base_args(compose_file);
        args.push("pull".to_string());
        self.runner.run(&args)
    }

    pub fn restart(&self, compose_file: &Path, service: &str) -> Result<()> {
        let mut args = self.base_args(compose_file);
        args.push("restart".to_string());
        push_service(&mut args, service);
        self.runner.run(&args)
    }

    /// Stop services without removing them
    pub fn stop(&self, compose_file: &Path, service: &str) -> Result<()> {
        let mut args = self.base_args(compose_file);
        args.push("stop".to_string());
        push_service(&mut args, service);
        self.runner.run(&args)
    }

    /// Run a command inside a running service container
    pub fn exec(&self, compose_file: &Path, service: &str, command: &[String]) -> Result<()> {
        let mut args = self.base_args(compose_file);
        args.push("exec".to_string());
        args.push(service.to_string());
        args.extend(command.iter().cloned());
        self.runner.run(&args)
    }

    /// True when the compose project has at least one container
    pub fn is_running(&self, compose_file: &Path) -> Result<bool> {
        let mut args = self.base_args(compose_file);
        args.push("ps".to_string());
        args.push("-q".to_string());
        let output = self.runner.capture(&args)?;
        Ok(!output.trim().is_empty())
    }
}

fn push_service(args: &mut Vec<String>, service: &str) {
    if !service.is_empty() {
        args.push(service.to_string());
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingRunner;
    use super::*;
    use pretty_assertions::assert_eq;

    fn compose() -> DockerCompose<RecordingRunner> {
        DockerCompose::new(RecordingRunner::default(), "/srv/kc")
    }

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_up_detached_with_env_file() {
        let dc = compose().with_env_file("/srv/kc/compose/environments/dev.env");
        let file = dc.compose_file(Component::FullStack);
        dc.up(&file, true).unwrap();

        assert_eq!(
            dc.runner().last(),
            argv(&[
                "compose",
                "-f",
                "/srv/kc/compose/docker-compose.full.yml",
                "--env-file",
                "/srv/kc/compose/environments/dev.env",
                "up",
                "-d",
            ])
        );
    }

    #[test]
    fn test_down_with_and_without_volumes() {
        let dc = compose();
        let file = dc.compose_file(Component::Gateway);

        dc.down(&file, false).unwrap();
        assert_eq!(
            dc.runner().last(),
            argv(&["compose", "-f", "/srv/kc/infrastructure/kong/docker-compose.yml", "down"])
        );

        dc.down(&file, true).unwrap();
        assert_eq!(dc.runner().last().last().map(String::as_str), Some("-v"));
    }

    #[test]
    fn test_logs_flags() {
        let dc = compose();
        let file = PathBuf::from("/c.yml");

        dc.logs(&file, "kong", true, 50).unwrap();
        assert_eq!(
            dc.runner().last(),
            argv(&["compose", "-f", "/c.yml", "logs", "-f", "--tail", "50", "kong"])
        );

        dc.logs(&file, "", false, 0).unwrap();
        assert_eq!(dc.runner().last(), argv(&["compose", "-f", "/c.yml", "logs"]));
    }

    #[test]
    fn test_service_scoped_commands() {
        let dc = compose().with_env_file("/e.env");
        let file = PathBuf::from("/c.yml");
        let base = ["compose", "-f", "/c.yml", "--env-file", "/e.env"];

        dc.restart(&file, "keycloak").unwrap();
        assert_eq!(dc.runner().last(), argv(&[&base[..], &["restart", "keycloak"][..]].concat()));

        dc.stop(&file, "").unwrap();
        assert_eq!(dc.runner().last(), argv(&[&base[..], &["stop"][..]].concat()));

        dc.build(&file, "backend").unwrap();
        assert_eq!(dc.runner().last(), argv(&[&base[..], &["build", "backend"][..]].concat()));

        dc.pull(&file).unwrap();
        assert_eq!(dc.runner().last(), argv(&[&base[..], &["pull"][..]].concat()));

        dc.status(&file).unwrap();
        assert_eq!(dc.runner().last(), argv(&[&base[..], &["ps"][..]].concat()));
    }

    #[test]
    fn test_exec_appends_command() {
        let dc = compose();
        let file = PathBuf::from("/c.yml");
        dc.exec(&file, "postgres", &argv(&["psql", "-U", "keycloak"])).unwrap();

        assert_eq!(
            dc.runner().last(),
            argv(&["compose", "-f", "/c.yml", "exec", "postgres", "psql", "-U", "keycloak"])
        );
    }

    #[test]
    fn test_is_running_trims_output() {
        let file = PathBuf::from("/c.yml");

        let idle = DockerCompose::new(
            RecordingRunner {
                stdout: "  \n".to_string(),
                ..RecordingRunner::default()
            },
            "/srv/kc",
        );
        assert!(!idle.is_running(&file).unwrap());
        assert_eq!(idle.runner().last(), argv(&["compose", "-f", "/c.yml", "ps", "-q"]));

        let busy = DockerCompose::new(
            RecordingRunner {
                stdout: "3f2a9c\n".to_string(),
                ..RecordingRunner::default()
            },
            "/srv/kc",
        );
        assert!(busy.is_running(&file).unwrap());
    }

    #[test]
    fn test_is_running_propagates_failure() {
        let dc = DockerCompose::new(RecordingRunner::checking_files(), "/srv/kc");
        let file = PathBuf::from("/definitely/not/here.yml");
        assert!(dc.is_running(&file).is_err());
    }
}
