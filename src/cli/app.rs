//! Main CLI application structure

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::Output;
use super::{capture, diff_cmd, snapshots};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "drift")]
#[command(author, version, about = "Track changes in GitHub Projects over time")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Directory holding captured snapshots
    #[arg(long, global = true)]
    pub state_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture the current state of a GitHub Project
    Capture {
        /// GitHub Project number
        #[arg(long, short = 'p')]
        project_number: u32,

        /// GitHub organization owning the project (defaults to the
        /// authenticated user's projects)
        #[arg(long, short = 'o')]
        organization: Option<String>,

        /// Field name containing the start date
        #[arg(long, default_value = "Start")]
        start_field: String,

        /// Field name containing the end date
        #[arg(long, default_value = "End")]
        end_field: String,

        /// GitHub API token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Compare project states between two points in time
    Diff {
        /// GitHub Project number
        #[arg(long, short = 'p')]
        project_number: u32,

        /// Start timestamp (ISO 8601, e.g. 2024-01-01T15:04:05Z)
        #[arg(long, short = 'f', conflicts_with = "range", requires = "to")]
        from: Option<String>,

        /// End timestamp (ISO 8601)
        #[arg(long, short = 't', conflicts_with = "range", requires = "from")]
        to: Option<String>,

        /// Human-readable time range (e.g. "last 2 days", "last 1 week")
        #[arg(long, short = 'r')]
        range: Option<String>,

        /// Keep only items matching attribute=value on both sides
        #[arg(long)]
        filter: Option<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: ReportFormat,

        /// Days of delay considered moderate risk
        #[arg(long)]
        moderate_risk: Option<i64>,

        /// Days of delay considered high risk
        #[arg(long)]
        high_risk: Option<i64>,

        /// Days of delay considered extreme risk
        #[arg(long)]
        extreme_risk: Option<i64>,
    },

    /// List captured snapshots for a project
    Snapshots {
        /// GitHub Project number
        #[arg(long, short = 'p')]
        project_number: u32,
    },
}

/// Diff output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
    Table,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.verbose);
    let config = Config::load()?;

    output.verbose("drift starting");

    match cli.command {
        Commands::Capture {
            project_number,
            organization,
            start_field,
            end_field,
            token,
        } => capture::run(
            &output,
            &config,
            capture::CaptureArgs {
                project_number,
                organization,
                start_field,
                end_field,
                token,
                state_dir: cli.state_dir,
            },
        )?,

        Commands::Diff {
            project_number,
            from,
            to,
            range,
            filter,
            format,
            moderate_risk,
            high_risk,
            extreme_risk,
        } => diff_cmd::run(
            &output,
            &config,
            diff_cmd::DiffArgs {
                project_number,
                from,
                to,
                range,
                filter,
                format,
                moderate_risk,
                high_risk,
                extreme_risk,
                state_dir: cli.state_dir,
            },
        )?,

        Commands::Snapshots { project_number } => {
            snapshots::run(&output, &config, project_number, cli.state_dir.as_deref())?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}
