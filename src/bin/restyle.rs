//! CLI for restyle.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use restyle::prelude::*;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "restyle")]
#[command(author, version, about = "Migrate hardcoded styling literals to named references", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a migration
    Run {
        /// Migration config (.yaml, .yml or .json)
        #[arg(short, long, default_value = "restyle.yaml")]
        config: PathBuf,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Print a diff for every changed file
        #[arg(long)]
        diff: bool,
    },

    /// Validate a migration and list the files it selects
    Check {
        /// Migration config (.yaml, .yml or .json)
        #[arg(short, long, default_value = "restyle.yaml")]
        config: PathBuf,
    },

    /// Write a starter migration config
    Init {
        /// Where to write the config
        #[arg(default_value = "restyle.yaml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            dry_run,
            diff,
        } => cmd_run(&config, dry_run, diff),
        Commands::Check { config } => cmd_check(&config),
        Commands::Init { path } => cmd_init(&path),
    }
}

fn load(path: &Path) -> Result<MigrationConfig> {
    let config = MigrationConfig::load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid migration '{}'", config.name))?;
    Ok(config)
}

fn display_root(config: &MigrationConfig, config_path: &Path) -> PathBuf {
    config.display_root.clone().unwrap_or_else(|| {
        config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    })
}

fn cmd_run(config_path: &Path, dry_run: bool, diff: bool) -> Result<()> {
    let config = load(config_path)?;
    tracing::info!(migration = %config.name, dry_run, "starting migration");

    let candidates = config
        .selector()
        .select()
        .context("Failed to resolve file patterns")?;

    let mut engine = config.engine()?;
    if dry_run {
        engine = engine.dry_run();
    }

    let mut reporter = Reporter::stdout().display_root(display_root(&config, config_path));
    if diff {
        let style = if std::io::stdout().is_terminal() {
            DiffStyle::Color
        } else {
            DiffStyle::Plain
        };
        reporter = reporter.show_diffs(style);
    }

    engine
        .run(&candidates, reporter)
        .context("Migration failed")?;
    Ok(())
}

fn cmd_check(config_path: &Path) -> Result<()> {
    let config = load(config_path)?;
    let candidates = config
        .selector()
        .select()
        .context("Failed to resolve file patterns")?;
    let engine = config.engine()?;
    let root = display_root(&config, config_path);

    println!("Migration: {}", config.name);
    if let Some(declaration) = &config.declaration {
        println!("Declaration: {declaration}");
    }
    println!("Rules ({}):", engine.rules().len());
    for (index, rule) in engine.rules().describe().iter().enumerate() {
        println!("  {index:>2}. {rule}");
    }
    println!("Excluded as already migrated: {}", config.exclude.len());
    println!("Candidates ({}):", candidates.len());
    for candidate in &candidates {
        let path = candidate.path.strip_prefix(&root).unwrap_or(&candidate.path);
        match candidate.source {
            CandidateSource::Pattern => println!("  {}", path.display()),
            CandidateSource::Listed => println!("  {} (listed)", path.display()),
        }
    }
    Ok(())
}

fn cmd_init(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    let yaml = MigrationConfig::sample().to_yaml_string()?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
