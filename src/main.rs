//! tfplan-assert CLI entrypoint.
//!
//! This is the main entrypoint for the tfplan-assert command-line tool.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tfplan_assert::checker::{CheckMode, CheckReport};
use tfplan_assert::cli::{Cli, Commands, OutputFormat, OutputFormatter};
use tfplan_assert::config::{AssertConfig, ConfigParser, ConfigValidator, find_config_file};
use tfplan_assert::error::{ConfigError, EXIT_CHECK_FAILED, Result};
use tfplan_assert::plan::{DEFAULT_MAX_DEPTH, Plan, PlanDocument};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// File name written by `init`.
const CONFIG_FILE_NAME: &str = "tfplan-assert.yaml";

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.output);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool, output: OutputFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if output.is_json() {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Main entry point.
fn run(cli: Cli) -> Result<ExitCode> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Init { path, force } => cmd_init(&path, force),
        Commands::Validate { warnings } => cmd_validate(cli.config.as_ref(), warnings, &formatter),
        Commands::Check {
            plan,
            mode,
            max_depth,
        } => cmd_check(
            cli.config.as_ref(),
            &CheckOverrides {
                plan,
                mode,
                max_depth,
            },
            &formatter,
        ),
        Commands::Show { plan } => cmd_show(cli.config.as_ref(), plan, &formatter),
        Commands::Count { expression, plan } => {
            cmd_count(cli.config.as_ref(), &expression, plan, &formatter)
        }
        Commands::Query { expression, plan } => {
            cmd_query(cli.config.as_ref(), &expression, plan, &formatter)
        }
    }
}

/// Command-line values that replace the expectations file settings.
#[derive(Debug, Default)]
struct CheckOverrides {
    plan: Option<PathBuf>,
    mode: Option<CheckMode>,
    max_depth: Option<usize>,
}

/// Write a template expectations file.
fn cmd_init(path: &Path, force: bool) -> Result<ExitCode> {
    info!("Initializing expectations file in: {}", path.display());

    let config_path = path.join(CONFIG_FILE_NAME);

    if !force && config_path.exists() {
        eprintln!("Configuration file already exists: {}", config_path.display());
        eprintln!("Use --force to overwrite.");
        return Ok(ExitCode::SUCCESS);
    }

    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }

    let config_template = include_str!("../templates/tfplan-assert.yaml");
    std::fs::write(&config_path, config_template)?;
    eprintln!("Created: {}", config_path.display());

    eprintln!("\nNext steps:");
    eprintln!("  1. terraform show -json plan.out > terraform.plan.json");
    eprintln!("  2. Edit {CONFIG_FILE_NAME} with the resources you expect");
    eprintln!("  3. Run 'tfplan-assert validate' to check the file");
    eprintln!("  4. Run 'tfplan-assert check' to check the plan");

    Ok(ExitCode::SUCCESS)
}

/// Validate the expectations file.
fn cmd_validate(
    config_path: Option<&PathBuf>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let (config_file, config) = load_config(config_path)?;
    info!("Validating configuration: {}", config_file.display());

    let result = ConfigValidator::new().validate(&config)?;
    print!("{}", formatter.format_validation(&config, &result, show_warnings));

    Ok(ExitCode::SUCCESS)
}

/// Check the expected resources against a plan.
fn cmd_check(
    config_path: Option<&PathBuf>,
    overrides: &CheckOverrides,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let (config_file, mut config) = load_config(config_path)?;

    if let Some(mode) = overrides.mode {
        config.mode = mode;
    }
    if let Some(depth) = overrides.max_depth {
        config.plan.max_depth = depth;
    }
    if let Some(plan) = &overrides.plan {
        config.plan.path = plan.display().to_string();
    }

    ConfigValidator::new().validate(&config)?;

    let plan_path = match &overrides.plan {
        Some(plan) => plan.clone(),
        None => config.plan_path(config_file.parent()),
    };
    debug!("Checking {} with max depth {}", plan_path.display(), config.plan.max_depth);

    let plan = Plan::read(&plan_path, config.plan.max_depth)?;
    let report = CheckReport::run(config.mode, &config.resources, &plan);
    print!("{}", formatter.format_report(&report));

    Ok(if report.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_CHECK_FAILED)
    })
}

/// Show the flattened resource index.
fn cmd_show(
    config_path: Option<&PathBuf>,
    plan: Option<PathBuf>,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let (plan_path, max_depth) = match plan {
        Some(plan) => (plan, DEFAULT_MAX_DEPTH),
        None => {
            let (config_file, config) = load_config(config_path)?;
            (config.plan_path(config_file.parent()), config.plan.max_depth)
        }
    };

    let plan = Plan::read(&plan_path, max_depth)?;
    print!("{}", formatter.format_index(&plan));

    Ok(ExitCode::SUCCESS)
}

/// Count the resources of a module.
fn cmd_count(
    config_path: Option<&PathBuf>,
    expression: &str,
    plan: Option<PathBuf>,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let document = PlanDocument::read(resolve_plan_path(config_path, plan)?)?;
    let count = document.count_resources(expression)?;
    print!("{}", formatter.format_count(expression, count));

    Ok(ExitCode::SUCCESS)
}

/// Print a sub-document of the plan.
fn cmd_query(
    config_path: Option<&PathBuf>,
    expression: &str,
    plan: Option<PathBuf>,
    formatter: &OutputFormatter,
) -> Result<ExitCode> {
    let document = PlanDocument::read(resolve_plan_path(config_path, plan)?)?;

    match document.query(expression)? {
        Some(result) => {
            print!("{}", formatter.format_query(&result));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("No value at {expression}");
            Ok(ExitCode::from(EXIT_CHECK_FAILED))
        }
    }
}

/// Resolves the expectations file path.
fn resolve_config_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(ConfigError::FileNotFound { path: path.clone() }.into());
    }

    let cwd = std::env::current_dir()?;
    find_config_file(&cwd)
}

/// Loads the expectations file, its `.env` and the environment overrides.
fn load_config(config_path: Option<&PathBuf>) -> Result<(PathBuf, AssertConfig)> {
    let config_file = resolve_config_path(config_path)?;
    debug!("Using configuration: {}", config_file.display());

    let parser = ConfigParser::new().with_base_path(
        config_file
            .parent()
            .unwrap_or_else(|| Path::new(".")),
    );
    parser.load_dotenv()?;

    let config = parser.load_with_env(&config_file)?;
    Ok((config_file, config))
}

/// Picks the plan file from the command line or the expectations file.
fn resolve_plan_path(config_path: Option<&PathBuf>, plan: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(plan) = plan {
        return Ok(plan);
    }

    let (config_file, config) = load_config(config_path)?;
    Ok(config.plan_path(config_file.parent()))
}
