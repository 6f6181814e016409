//! # shapecheck
//!
//! Validate JSON documents against a schema descriptor.
//!
//! ## Usage
//!
//! ```bash
//! # Check documents against a schema
//! shapecheck check --schema user.schema.json users/*.json
//!
//! # Machine-readable output
//! shapecheck check --schema user.schema.json data.json --format json
//!
//! # Show the type a descriptor builds
//! shapecheck explain --schema user.schema.json
//!
//! # Initialize configuration
//! shapecheck init
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use shapecheck_cli::{
    config::{CliArgs, ConfigManager, OutputFormat},
    error::{CliError, ConfigError},
    loader,
    report::{Reporter, check_documents},
};

#[derive(Parser)]
#[command(name = "shapecheck")]
#[command(
    author,
    version,
    about = "Validate JSON documents against schema descriptors",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate JSON documents against a schema
    Check {
        /// Schema descriptor file
        #[arg(short, long)]
        schema: PathBuf,

        /// Documents to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// List only leaf issues
        #[arg(long, conflicts_with = "tree")]
        flatten: bool,

        /// Show the full issue tree
        #[arg(long)]
        tree: bool,

        /// Show parse scores next to issues
        #[arg(long)]
        show_scores: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize a new shapecheck configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "shapecheck.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Print the type a schema descriptor builds
    Explain {
        /// Schema descriptor file
        #[arg(short, long)]
        schema: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Check {
            schema,
            files,
            format,
            flatten,
            tree,
            show_scores,
            no_color,
            config,
        } => {
            let args = CliArgs {
                format,
                color: no_color.then_some(false),
                flatten: if tree { Some(false) } else { flatten.then_some(true) },
                show_scores: show_scores.then_some(true),
            };
            cmd_check(schema, files, args, config)
        }

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Explain { schema } => cmd_explain(schema),
    }
}

/// Check command implementation.
fn cmd_check(
    schema: PathBuf,
    files: Vec<PathBuf>,
    args: CliArgs,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = ConfigManager::load(config_path.as_deref())?;
    let config = ConfigManager::merge_cli_args(config, &args);

    let ty = loader::load_schema(&schema)?;
    let reports = check_documents(&ty, &files)?;

    let reporter = Reporter::new(config.output);
    print!("{}", reporter.render(&reports)?);

    let failed = reports.iter().filter(|r| !r.is_valid()).count();
    if failed > 0 {
        return Err(CliError::Validation {
            failed,
            total: reports.len(),
        });
    }
    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    if output.exists() && !force {
        return Err(ConfigError::AlreadyExists { path: output }.into());
    }

    let content = ConfigManager::default_config_content();
    std::fs::write(&output, content)?;

    println!(
        "{} Created configuration file: {}",
        "✓".green(),
        output.display()
    );

    Ok(())
}

/// Explain command implementation.
fn cmd_explain(schema: PathBuf) -> Result<(), CliError> {
    let ty = loader::load_schema(&schema)?;
    println!("{} {} builds a {} type", "✓".green(), schema.display(), ty.name().cyan());
    println!("{:#?}", ty);
    Ok(())
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
