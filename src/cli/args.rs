use clap::{builder::NonEmptyStringValueParser, Parser, Subcommand};
use std::path::PathBuf;

use crate::compose::Component;
use crate::constants::{DEFAULT_KONG_PORT, DEFAULT_LOG_TAIL};

#[derive(Parser, Debug)]
#[command(name = "kc-deploy")]
#[command(version)]
#[command(about = "Kong + Keycloak deployment CLI")]
#[command(long_about = "kc-deploy deploys and manages Kong + Keycloak infrastructure.

It provides commands for:
- Deploying individual components (Keycloak, Kong, full stack, multi-Kong)
- Managing multiple Kong instances
- Validating configurations
- Viewing status and logs")]
pub struct Cli {
    /// Config file (default is $HOME/.kc-deploy.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Environment (dev/prod), selects compose/environments/<env>.env.
    /// Defaults to the configured default_environment
    #[arg(long, global = true)]
    pub env: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Options shared by every command
    pub fn global_opts(&self) -> GlobalOpts {
        GlobalOpts {
            config_path: self.config.clone(),
            env: self.env.clone(),
        }
    }
}

/// Global flags, parsed once and passed down the command tree
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config_path: Option<PathBuf>,
    pub env: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy components
    Deploy {
        #[command(subcommand)]
        target: DeployTarget,
    },
    /// Stop and remove compose services
    Down {
        /// Component to stop, or `all`
        component: Option<String>,
        /// Remove volumes
        #[arg(long)]
        volumes: bool,
    },
    /// View the status of deployed components
    Status {
        /// Component to inspect (all when omitted)
        component: Option<String>,
    },
    /// View logs from compose services
    Logs {
        /// Component (keycloak, kong, full, multi-kong)
        component: String,
        /// Service within the component
        service: Option<String>,
        /// Follow log output
        #[arg(short, long)]
        follow: bool,
        /// Number of lines to show from the end (0 for all)
        #[arg(long, default_value_t = DEFAULT_LOG_TAIL)]
        tail: usize,
    },
    /// Restart compose services
    Restart {
        component: String,
        service: Option<String>,
    },
    /// Stop compose services without removing them
    Stop {
        component: String,
        service: Option<String>,
    },
    /// Build compose services
    Build {
        component: String,
        service: Option<String>,
    },
    /// Pull images for a component
    Pull { component: String },
    /// Execute a command in a running service container
    Exec {
        component: String,
        service: String,
        /// Command to run, e.g. `-- psql -U keycloak`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Perform health checks
    Health,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
    /// Manage Kong instances
    Kong {
        #[command(subcommand)]
        action: KongCommand,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployTarget {
    /// Deploy full stack
    #[command(alias = "full-stack")]
    Full,
    /// Deploy Keycloak + PostgreSQL
    #[command(alias = "identity-provider")]
    Keycloak,
    /// Deploy Kong instance
    #[command(alias = "gateway")]
    Kong,
    /// Deploy multiple Kong instances
    #[command(alias = "multi-gateway")]
    MultiKong,
}

impl DeployTarget {
    pub fn component(self) -> Component {
        match self {
            DeployTarget::Full => Component::FullStack,
            DeployTarget::Keycloak => Component::IdentityProvider,
            DeployTarget::Kong => Component::Gateway,
            DeployTarget::MultiKong => Component::MultiGateway,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate project structure, compose files and realm files
    Validate {
        /// Keycloak realm export (JSON) to check; may be repeated
        #[arg(long = "realm")]
        realms: Vec<PathBuf>,
    },
    /// Show current configuration
    Show,
    /// Initialize default configuration
    Init,
}

#[derive(Subcommand, Debug)]
pub enum KongCommand {
    /// Add new Kong instance
    Add {
        /// Kong instance name
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        name: String,
        /// Keycloak realm
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        realm: String,
        /// Kong port
        #[arg(long, default_value_t = DEFAULT_KONG_PORT)]
        port: u16,
    },
    /// Remove Kong instance
    Remove {
        /// Kong instance name
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        name: String,
    },
    /// List Kong instances
    List,
    /// Show one Kong instance
    Show {
        /// Kong instance name
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "kc-deploy", "down", "all", "--volumes", "--env", "prod", "-v",
        ])
        .unwrap();

        let opts = cli.global_opts();
        assert_eq!(opts.env.as_deref(), Some("prod"));
        assert!(cli.verbose);
        match cli.command {
            Commands::Down { component, volumes } => {
                assert_eq!(component.as_deref(), Some("all"));
                assert!(volumes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_deploy_aliases() {
        let cli = Cli::try_parse_from(["kc-deploy", "deploy", "multi-gateway"]).unwrap();
        match cli.command {
            Commands::Deploy { target } => assert_eq!(target.component(), Component::MultiGateway),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_logs_defaults() {
        let cli = Cli::try_parse_from(["kc-deploy", "logs", "kong"]).unwrap();
        match cli.command {
            Commands::Logs { service, follow, tail, .. } => {
                assert!(service.is_none());
                assert!(!follow);
                assert_eq!(tail, 100);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_kong_add_requires_realm() {
        assert!(Cli::try_parse_from(["kc-deploy", "kong", "add", "--name", "kong-edge"]).is_err());

        let cli = Cli::try_parse_from([
            "kc-deploy", "kong", "add", "--name", "kong-edge", "--realm", "edge-realm",
        ])
        .unwrap();
        match cli.command {
            Commands::Kong {
                action: KongCommand::Add { port, .. },
            } => assert_eq!(port, 8000),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_kong_names_must_not_be_empty() {
        for argv in [
            &["kc-deploy", "kong", "add", "--name", "", "--realm", "edge-realm"][..],
            &["kc-deploy", "kong", "add", "--name", "kong-edge", "--realm", ""][..],
            &["kc-deploy", "kong", "remove", "--name", ""][..],
            &["kc-deploy", "kong", "show", "--name", ""][..],
        ] {
            assert!(Cli::try_parse_from(argv).is_err(), "accepted {argv:?}");
        }
    }

    #[test]
    fn test_exec_passes_hyphenated_command() {
        let cli = Cli::try_parse_from([
            "kc-deploy", "exec", "keycloak", "postgres", "--", "psql", "-U", "keycloak",
        ])
        .unwrap();
        match cli.command {
            Commands::Exec { command, .. } => assert_eq!(command, vec!["psql", "-U", "keycloak"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
