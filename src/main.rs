//! mule-deployer CLI - validate, package and deploy Mule applications
//!
//! Usage: mule-deployer [OPTIONS] <COMMAND>
//!
//! Commands:
//!   validate  Check the project layout and dependencies
//!   package   Validate and write the deployable archive
//!   resolve   Print the fully resolved deployment configuration
//!   deploy    Deploy, replacing an existing deployment
//!   undeploy  Remove the application from its target
//!   redeploy  Undeploy, then deploy fresh

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mule_deployer::application::{DeployOptions, DeployOutcome};
use mule_deployer::error::{DeployError, DeployResult};
use mule_deployer::presentation::cli::{ArchiveArgs, Cli, Commands};
use mule_deployer::presentation::factory::{self, ConcreteDriver, RuntimeProvider};
use mule_deployer::presentation::output::{self, OutputFormat};

/// Environment variable holding a tracing filter, e.g. `mule_deployer=debug`
const LOG_ENV: &str = "MULE_DEPLOYER_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = OutputFormat::from_json_flag(cli.json);

    match run(&cli, format) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err, format),
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(err: &anyhow::Error, format: OutputFormat) -> ExitCode {
    let Some(deploy_err) = err.downcast_ref::<DeployError>() else {
        eprintln!("Error: {:#}", err);
        return ExitCode::FAILURE;
    };

    match format {
        OutputFormat::Json => println!("{}", output::error_json(deploy_err)),
        OutputFormat::Text => eprintln!("Error: {}", deploy_err),
    }
    ExitCode::from(deploy_err.kind().exit_code() as u8)
}

fn run(cli: &Cli, format: OutputFormat) -> Result<()> {
    let properties = factory::create_property_source(&cli.properties).map_err(DeployError::from)?;
    let events = factory::create_event_sink(cli.json, cli.verbose);
    let driver = factory::create_driver(properties, RuntimeProvider::new(), events);

    match &cli.command {
        Commands::Validate => cmd_validate(&driver, &cli.project, format),
        Commands::Package { archive } => cmd_package(&driver, &cli.project, archive, format),
        Commands::Resolve => cmd_resolve(&driver, &cli.project, format),
        Commands::Deploy {
            archive,
            no_package,
            also,
        } => {
            let mut roots = vec![cli.project.clone()];
            roots.extend(also.iter().cloned());
            cmd_deploy(&driver, &roots, archive, !no_package, format)
        }
        Commands::Undeploy => {
            let options = load(&cli.project)?;
            print_outcome(&driver.undeploy(&options)?, format);
            Ok(())
        }
        Commands::Redeploy {
            archive,
            no_package,
        } => {
            let options = with_archive_args(load(&cli.project)?, archive).with_package(!no_package);
            print_outcome(&driver.redeploy(&options)?, format);
            Ok(())
        }
    }
}

/// Load project options, printing unknown-key warnings to stderr
fn load(project_root: &Path) -> DeployResult<DeployOptions> {
    let (options, warnings) = factory::load_options(project_root)?;
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(options)
}

fn with_archive_args(options: DeployOptions, archive: &ArchiveArgs) -> DeployOptions {
    let mut includes = options.includes.clone();
    includes.extend(archive.includes.iter().cloned());
    let mut excludes = options.excludes.clone();
    excludes.extend(archive.excludes.iter().cloned());
    options.with_includes(includes).with_excludes(excludes)
}

fn cmd_validate(driver: &ConcreteDriver, project: &Path, format: OutputFormat) -> Result<()> {
    let options = load(project)?;
    driver.validate(&options)?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "event": "result",
                "valid": true,
                "project": options.project.artifact_id,
            })
        ),
        OutputFormat::Text => println!("[OK] {} is a valid Mule project", options.project.artifact_id),
    }
    Ok(())
}

fn cmd_package(
    driver: &ConcreteDriver,
    project: &Path,
    archive: &ArchiveArgs,
    format: OutputFormat,
) -> Result<()> {
    let options = with_archive_args(load(project)?, archive);
    let packaged = driver.package(&options)?;

    match format {
        OutputFormat::Json => println!("{}", output::archive_json(&packaged)),
        OutputFormat::Text => println!("{}", output::archive_text(&packaged)),
    }
    Ok(())
}

fn cmd_resolve(driver: &ConcreteDriver, project: &Path, format: OutputFormat) -> Result<()> {
    let options = load(project)?;
    let resolved = driver.resolve(&options)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&resolved)?),
        OutputFormat::Text => println!("{}", serde_json::to_string_pretty(&resolved)?),
    }
    Ok(())
}

fn cmd_deploy(
    driver: &ConcreteDriver,
    roots: &[PathBuf],
    archive: &ArchiveArgs,
    package: bool,
    format: OutputFormat,
) -> Result<()> {
    let batch = roots
        .iter()
        .map(|root| load(root).map(|options| with_archive_args(options, archive).with_package(package)))
        .collect::<DeployResult<Vec<_>>>()?;

    if let [options] = batch.as_slice() {
        print_outcome(&driver.deploy(options)?, format);
        return Ok(());
    }

    let mut first_error = None;
    for result in driver.deploy_all(&batch) {
        match result {
            Ok(outcome) => print_outcome(&outcome, format),
            Err(err) => {
                if format == OutputFormat::Json {
                    println!("{}", output::error_json(&err));
                } else {
                    eprintln!("Error: {}", err);
                }
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn print_outcome(outcome: &DeployOutcome, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", output::outcome_json(outcome)),
        OutputFormat::Text => println!("{}", output::outcome_text(outcome)),
    }
}
