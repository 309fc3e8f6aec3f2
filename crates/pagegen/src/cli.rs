//! Command-line surface for the `pagegen` binary.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::generate::PageGenerator;
use crate::infra::config::{CliOverrides, Config};

/// Generate a numbered batch of static HTML pages from a fixed template.
#[derive(Parser, Debug)]
#[command(name = "pagegen", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub source: ConfigArgs,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write every page of the batch (default).
    Generate(OutputArgs),
    /// List the files a run would write without touching the filesystem.
    Plan(OutputArgs),
    /// Print the resolved configuration as TOML.
    Config,
    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Where configuration comes from and which values to override.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Config file layered on top of the global and workspace files.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory the pages are written to.
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// First index of the batch (inclusive).
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub start: Option<i64>,

    /// Last index of the batch (inclusive).
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub end: Option<i64>,
}

impl ConfigArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            output_directory: self.output_dir.clone(),
            start: self.start,
            end: self.end,
        }
    }

    fn load(&self) -> Result<Config> {
        Ok(Config::load(self.config.as_deref())?.with_overrides(&self.overrides()))
    }
}

#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the parsed command, writing user-facing output to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let command = cli
        .command
        .unwrap_or(Command::Generate(OutputArgs::default()));

    match command {
        Command::Generate(args) => {
            let config = cli.source.load()?.to_generator_config()?;
            let report = PageGenerator::new(config).generate()?;
            if args.json {
                serde_json::to_writer_pretty(&mut *out, &report)
                    .context("failed to serialize report")?;
                writeln!(out)?;
            } else if !cli.quiet {
                writeln!(
                    out,
                    "Wrote {} page(s) to {}",
                    report.count(),
                    report.output_directory.display()
                )?;
            }
        }
        Command::Plan(args) => {
            let config = cli.source.load()?.to_generator_config()?;
            let plan = PageGenerator::new(config).plan()?;
            if args.json {
                serde_json::to_writer_pretty(&mut *out, &plan)
                    .context("failed to serialize plan")?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", plan.listing())?;
            }
        }
        Command::Config => {
            let config = cli.source.load()?;
            write!(out, "{}", config.to_toml()?)?;
        }
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pagegen", out);
        }
    }
    Ok(())
}
