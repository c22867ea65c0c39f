use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{
    app::{default_config_path, Config, GatewayInstance},
    compose::{Component, ComposeRunner, DockerCompose, ProcessRunner},
    constants::ENVIRONMENTS_DIR,
    validate::{
        validate_compose_file, validate_project_structure, validate_realm_file,
        validate_runtime_installation,
    },
};

use super::{Cli, Commands, ConfigCommand, GlobalOpts, KongCommand};

/// Compose files checked by `config validate`
const VALIDATED_COMPONENTS: [Component; 3] = [
    Component::FullStack,
    Component::IdentityProvider,
    Component::Gateway,
];

/// Handle CLI subcommands
pub fn handle_command(cli: &Cli) -> Result<()> {
    let opts = cli.global_opts();

    match &cli.command {
        Commands::Deploy { target } => deploy(&opts, target.component()),
        Commands::Down { component, volumes } => down(&opts, component.as_deref(), *volumes),
        Commands::Status { component } => status(&opts, component.as_deref()),
        Commands::Logs {
            component,
            service,
            follow,
            tail,
        } => {
            let component = parse_component(component)?;
            let (config, dc) = open_compose(&opts)?;
            debug!("Showing logs for {} (root {})", component, config.project_root);
            dc.logs(
                &dc.compose_file(component),
                service.as_deref().unwrap_or_default(),
                *follow,
                *tail,
            )
            .with_context(|| format!("failed to show logs for {}", component))
        }
        Commands::Restart { component, service } => {
            let component = parse_component(component)?;
            let (_, dc) = open_compose(&opts)?;
            dc.restart(&dc.compose_file(component), service.as_deref().unwrap_or_default())
                .with_context(|| format!("failed to restart {}", component))?;
            println!("{} {} restarted", "✓".green(), component.display_name());
            Ok(())
        }
        Commands::Stop { component, service } => {
            let component = parse_component(component)?;
            let (_, dc) = open_compose(&opts)?;
            dc.stop(&dc.compose_file(component), service.as_deref().unwrap_or_default())
                .with_context(|| format!("failed to stop {}", component))?;
            println!("{} {} stopped", "✓".green(), component.display_name());
            Ok(())
        }
        Commands::Build { component, service } => {
            let component = parse_component(component)?;
            let (_, dc) = open_compose(&opts)?;
            dc.build(&dc.compose_file(component), service.as_deref().unwrap_or_default())
                .with_context(|| format!("failed to build {}", component))?;
            println!("{} {} built", "✓".green(), component.display_name());
            Ok(())
        }
        Commands::Pull { component } => {
            let component = parse_component(component)?;
            let (_, dc) = open_compose(&opts)?;
            dc.pull(&dc.compose_file(component))
                .with_context(|| format!("failed to pull images for {}", component))
        }
        Commands::Exec {
            component,
            service,
            command,
        } => {
            let component = parse_component(component)?;
            let (_, dc) = open_compose(&opts)?;
            dc.exec(&dc.compose_file(component), service, command)
                .with_context(|| format!("failed to exec in {} service '{}'", component, service))
        }
        Commands::Health => health(&opts),
        Commands::Config { action } => handle_config(&opts, action),
        Commands::Kong { action } => handle_kong(&opts, action),
    }
}

fn load_config(opts: &GlobalOpts) -> Result<Config> {
    Config::load(opts.config_path.as_deref()).context("failed to load config")
}

fn save_config(opts: &GlobalOpts, config: &Config) -> Result<()> {
    config
        .save(opts.config_path.as_deref())
        .context("failed to save config")
}

fn parse_component(name: &str) -> Result<Component> {
    Ok(name.parse::<Component>()?)
}

/// Load config and bind a compose adapter to the detected runtime
fn open_compose(opts: &GlobalOpts) -> Result<(Config, DockerCompose<ProcessRunner>)> {
    let config = load_config(opts)?;
    let runner = ProcessRunner::detect()?;
    let dc = compose_for(runner, opts, &config);
    Ok((config, dc))
}

/// Build the adapter for the resolved project root and environment.
///
/// The env file is only passed along when it exists on disk.
fn compose_for<R: ComposeRunner>(runner: R, opts: &GlobalOpts, config: &Config) -> DockerCompose<R> {
    let project_root = config.project_root();
    let env_file = env_file_path(&project_root, &environment(opts, config));
    let dc = DockerCompose::new(runner, project_root);

    if env_file.exists() {
        dc.with_env_file(env_file)
    } else {
        debug!("No env file at {}, running without --env-file", env_file.display());
        dc
    }
}

fn environment(opts: &GlobalOpts, config: &Config) -> String {
    opts.env
        .clone()
        .unwrap_or_else(|| config.default_environment.clone())
}

fn env_file_path(project_root: &Path, env: &str) -> PathBuf {
    project_root.join(ENVIRONMENTS_DIR).join(format!("{}.env", env))
}

fn deploy(opts: &GlobalOpts, component: Component) -> Result<()> {
    let (config, dc) = open_compose(opts)?;

    println!("Deploying {}...", component.display_name());
    println!("Environment: {}", environment(opts, &config));
    println!("Project Root: {}", dc.project_root().display());

    dc.up(&dc.compose_file(component), true)
        .with_context(|| format!("failed to deploy {}", component.display_name()))?;

    println!(
        "{} {} deployed successfully!",
        "✓".green(),
        component.display_name()
    );
    Ok(())
}

fn down(opts: &GlobalOpts, component: Option<&str>, volumes: bool) -> Result<()> {
    let target = match component {
        None | Some("all") => None,
        Some(name) => Some(parse_component(name)?),
    };
    let (_, dc) = open_compose(opts)?;

    match target {
        None => down_all(&dc, volumes, &mut std::io::stdout().lock()),
        Some(component) => {
            println!("Stopping {}...", component.display_name());
            dc.down(&dc.compose_file(component), volumes)
                .with_context(|| format!("failed to stop {}", component.display_name()))?;
            println!(
                "{} {} stopped successfully!",
                "✓".green(),
                component.display_name()
            );
            Ok(())
        }
    }
}

/// Stop every component, reporting failures and carrying on
fn down_all<R: ComposeRunner>(
    dc: &DockerCompose<R>,
    volumes: bool,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Stopping all components...")?;

    for component in Component::ALL {
        let name = component.display_name();
        writeln!(out, "Stopping {}...", name)?;

        match dc.down(&dc.compose_file(component), volumes) {
            Ok(()) => writeln!(out, "  {} {} stopped", "✓".green(), name)?,
            Err(e) => {
                warn!("Failed to stop {}: {}", component, e);
                writeln!(out, "  {} Failed to stop {}: {}", "Warning:".yellow(), name, e)?;
            }
        }
    }

    writeln!(out, "{} All components stopped", "✓".green())?;
    Ok(())
}

fn status(opts: &GlobalOpts, component: Option<&str>) -> Result<()> {
    let target = component.map(parse_component).transpose()?;
    let (_, dc) = open_compose(opts)?;

    match target {
        None => status_all(&dc, &mut std::io::stdout().lock()),
        Some(component) => {
            println!("=== {} Status ===", component.display_name());
            dc.status(&dc.compose_file(component))
                .with_context(|| format!("failed to get status of {}", component))
        }
    }
}

/// Show status of every component, reporting failures and carrying on
fn status_all<R: ComposeRunner>(dc: &DockerCompose<R>, out: &mut impl Write) -> Result<()> {
    for (i, component) in Component::ALL.into_iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "=== {} Status ===", component.display_name())?;
        out.flush()?;

        if let Err(e) = dc.status(&dc.compose_file(component)) {
            writeln!(out, "{} not running or error: {}", component.display_name(), e)?;
        }
    }
    Ok(())
}

fn health(opts: &GlobalOpts) -> Result<()> {
    let config = load_config(opts)?;
    let mut out = std::io::stdout().lock();

    writeln!(out, "Running health checks...")?;

    let runtime = match validate_runtime_installation() {
        Ok(runtime) => runtime,
        Err(e) => {
            writeln!(out, "  [ERROR] Container Runtime: {}", e)?;
            return Ok(());
        }
    };
    writeln!(out, "  [OK] Container Runtime: {}", runtime)?;

    let dc = compose_for(ProcessRunner::new(runtime), opts, &config);
    health_report(&dc, &mut out)
}

/// Report whether each configured component is running
fn health_report<R: ComposeRunner>(dc: &DockerCompose<R>, out: &mut impl Write) -> Result<()> {
    for component in Component::ALL {
        let file = dc.compose_file(component);
        let name = component.display_name();

        if !file.exists() {
            writeln!(out, "  [SKIP] {}: no compose file", name)?;
            continue;
        }

        match dc.is_running(&file) {
            Ok(true) => writeln!(out, "  [OK] {}: running", name)?,
            Ok(false) => writeln!(out, "  [WARNING] {}: not running", name)?,
            Err(e) => writeln!(out, "  [ERROR] {}: {}", name, e)?,
        }
    }

    writeln!(out, "{} Health checks completed", "✓".green())?;
    Ok(())
}

fn handle_config(opts: &GlobalOpts, action: &ConfigCommand) -> Result<()> {
    match action {
        ConfigCommand::Validate { realms } => {
            let config = load_config(opts)?;
            let project_root = config.project_root();
            let mut out = std::io::stdout().lock();

            writeln!(out, "Validating configuration...")?;

            validate_project_structure(&project_root)
                .context("project structure validation failed")?;
            writeln!(out, "{} Project structure is valid", "✓".green())?;

            report_compose_files(&project_root, &mut out)?;
            report_realm_files(realms, &mut out)?;

            match validate_runtime_installation() {
                Ok(runtime) => writeln!(out, "{} Container runtime: {}", "✓".green(), runtime)?,
                Err(e) => writeln!(out, "{} {}", "⚠ Warning:".yellow(), e)?,
            }

            writeln!(out, "\n{} Configuration validation completed", "✓".green())?;
            Ok(())
        }
        ConfigCommand::Show => {
            let config = load_config(opts)?;

            println!("Current Configuration:");
            println!("---------------------");
            println!("Project Root:        {}", config.project_root);
            println!("Default Environment: {}", config.default_environment);
            println!("Kong Instances:      {}", config.gateway_instances.len());

            for (i, instance) in config.gateway_instances.iter().enumerate() {
                println!("\n  Instance {}:", i + 1);
                print_instance(instance, "    ");
            }
            Ok(())
        }
        ConfigCommand::Init => {
            let path = opts.config_path.clone().unwrap_or_else(default_config_path);
            Config::default()
                .save(Some(path.as_path()))
                .context("failed to save config")?;

            println!("{} Configuration initialized at: {}", "✓".green(), path.display());
            Ok(())
        }
    }
}

/// Validate compose files; failures are warnings. Returns the warning count.
fn report_compose_files(project_root: &Path, out: &mut impl Write) -> Result<usize> {
    let mut warnings = 0;

    for component in VALIDATED_COMPONENTS {
        let relative = component.compose_path();
        match validate_compose_file(&component.compose_file(project_root)) {
            Ok(_) => writeln!(out, "{} {} is valid", "✓".green(), relative)?,
            Err(e) => {
                warnings += 1;
                writeln!(
                    out,
                    "{} {} validation failed: {}",
                    "⚠ Warning:".yellow(),
                    relative,
                    e
                )?;
            }
        }
    }

    Ok(warnings)
}

/// Validate realm exports; failures are warnings. Returns the warning count.
fn report_realm_files(realms: &[PathBuf], out: &mut impl Write) -> Result<usize> {
    let mut warnings = 0;

    for path in realms {
        match validate_realm_file(path) {
            Ok(doc) => writeln!(
                out,
                "{} {} is valid (realm '{}')",
                "✓".green(),
                path.display(),
                doc.realm.unwrap_or_default()
            )?,
            Err(e) => {
                warnings += 1;
                writeln!(out, "{} {}", "⚠ Warning:".yellow(), e)?;
            }
        }
    }

    Ok(warnings)
}

fn handle_kong(opts: &GlobalOpts, action: &KongCommand) -> Result<()> {
    match action {
        KongCommand::Add { name, realm, port } => {
            let mut config = load_config(opts)?;
            config
                .add_instance(GatewayInstance::new(name.as_str(), realm.as_str(), *port))
                .context("failed to add Kong instance")?;
            save_config(opts, &config)?;

            println!("{} Kong instance '{}' added successfully!", "✓".green(), name);
            println!("  Realm: {}", realm);
            println!("  Port: {}", port);
            Ok(())
        }
        KongCommand::Remove { name } => {
            let mut config = load_config(opts)?;
            config
                .remove_instance(name)
                .context("failed to remove Kong instance")?;
            save_config(opts, &config)?;

            println!("{} Kong instance '{}' removed successfully!", "✓".green(), name);
            Ok(())
        }
        KongCommand::List => {
            let config = load_config(opts)?;

            if config.gateway_instances.is_empty() {
                println!("No Kong instances configured");
                return Ok(());
            }

            println!("Kong Instances:");
            println!("---------------");
            for instance in &config.gateway_instances {
                print_instance(instance, "  ");
                println!();
            }
            Ok(())
        }
        KongCommand::Show { name } => {
            let config = load_config(opts)?;
            let instance = config.find_instance(name)?;
            print_instance(instance, "");
            Ok(())
        }
    }
}

fn print_instance(instance: &GatewayInstance, indent: &str) {
    println!("{}Name:  {}", indent, instance.name);
    println!("{}Realm: {}", indent, instance.realm);
    println!("{}Port:  {}", indent, instance.port);
}
