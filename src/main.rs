use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use duespan::OutputFormat;
use duespan::commands;
use duespan::config;

#[derive(Parser)]
#[command(name = "due")]
#[command(about = "Milestone date-span calculator and tracker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the time remaining between two dates
    Span {
        #[arg(help = "Start date (e.g. 2024-01-01)")]
        start: String,
        #[arg(help = "End date (e.g. 2024-01-05)")]
        end: String,
        #[arg(long, help = "Pin 'now' for reproducible output (e.g. 2024-06-01T10:00:00)")]
        as_of: Option<String>,
        #[arg(long, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
    },

    /// Manage milestone records
    Milestone(MilestoneArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct MilestoneArgs {
    #[command(subcommand)]
    action: MilestoneAction,
}

#[derive(Subcommand)]
enum MilestoneAction {
    /// Add a milestone
    Add {
        #[arg(help = "Milestone name")]
        name: String,
        #[arg(long, help = "Start date")]
        start: String,
        #[arg(long, help = "End date")]
        end: String,
        #[arg(long, help = "Status (pending, active, completed)")]
        status: Option<String>,
    },
    /// List milestones with their time-remaining readout
    List {
        #[arg(long, help = "Filter by status")]
        status: Option<String>,
        #[arg(long, help = "Pin 'now' for reproducible output")]
        as_of: Option<String>,
        #[arg(long, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
    },
    /// Show one milestone
    Show {
        #[arg(help = "Milestone ID")]
        id: u32,
        #[arg(long, help = "Pin 'now' for reproducible output")]
        as_of: Option<String>,
    },
    /// Mark a milestone completed
    Done {
        #[arg(help = "Milestone ID")]
        id: u32,
        #[arg(long, help = "Preview without changing anything")]
        dry_run: bool,
    },
    /// Delete a milestone
    Remove {
        #[arg(help = "Milestone ID")]
        id: u32,
        #[arg(long, help = "Preview without deleting")]
        dry_run: bool,
    },
}

#[derive(Parser)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Set { key: String, value: String },
    Get { key: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load().unwrap_or_else(|_| {
        // Initial load fails if the file is missing; defaults are fine then
        eprintln!("Warning: No config found. Run 'due config set ...' to create one.");
        config::Config::default()
    });

    match &cli.command {
        Commands::Span {
            start,
            end,
            as_of,
            format,
        } => {
            commands::span::span(&config, start, end, as_of.as_deref(), *format)?;
        }
        Commands::Milestone(args) => match &args.action {
            MilestoneAction::Add {
                name,
                start,
                end,
                status,
            } => {
                commands::milestone::add(&config, name, start, end, status.as_deref())?;
            }
            MilestoneAction::List {
                status,
                as_of,
                format,
            } => {
                commands::milestone::list(&config, status.as_deref(), as_of.as_deref(), *format)?;
            }
            MilestoneAction::Show { id, as_of } => {
                commands::milestone::show(&config, *id, as_of.as_deref())?;
            }
            MilestoneAction::Done { id, dry_run } => {
                commands::milestone::done(&config, *id, *dry_run)?;
            }
            MilestoneAction::Remove { id, dry_run } => {
                commands::milestone::remove(&config, *id, *dry_run)?;
            }
        },
        Commands::Config(args) => match &args.action {
            ConfigAction::List => commands::config::list(&config)?,
            ConfigAction::Set { key, value } => commands::config::set(key, value)?,
            ConfigAction::Get { key } => commands::config::get(key, &config)?,
        },
    }

    Ok(())
}
