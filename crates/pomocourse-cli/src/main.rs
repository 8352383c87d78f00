use std::io;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pomocourse", version, about = "PomoCourse study planner CLI")]
struct Cli {
    /// Act as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Today's plan and progress
    Today,
    /// Record completed focus minutes for today
    Log {
        /// Minutes of focused work
        minutes: u32,
    },
    /// Study plan management
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Course-wide statistics
    Stats,
    /// Badge list
    Badges,
    /// Timer length settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Write the document as JSON
    Export {
        /// File or directory to write to (stdout when omitted)
        #[arg(long)]
        out: Option<std::path::PathBuf>,
    },
    /// Replace the document with a previously exported one
    Import {
        /// Path to the JSON backup
        file: std::path::PathBuf,
    },
    /// Pomodoro timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    pomocourse_core::calendar::parse_iso(s).map_err(|e| e.to_string())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("POMOCOURSE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let clock = commands::Clock::new(cli.today);

    let result = match cli.command {
        Commands::Today => commands::progress::today(&clock),
        Commands::Log { minutes } => commands::progress::log(minutes, &clock),
        Commands::Schedule { action } => commands::schedule::run(action, &clock),
        Commands::Stats => commands::progress::stats(&clock),
        Commands::Badges => commands::progress::badges(&clock),
        Commands::Settings { action } => commands::settings::run(action, &clock),
        Commands::Config { action } => commands::config::run(action),
        Commands::Export { out } => commands::backup::export(out, &clock),
        Commands::Import { file } => commands::backup::import(&file, &clock),
        Commands::Timer { action } => commands::timer::run(action, &clock),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pomocourse", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
