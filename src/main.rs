use clap::{Parser, Subcommand};
use rank_tracker::{
    api::BridgeClient,
    config::Settings,
    ladder::{division_numeral, Ladder},
    tracker::{CycleReport, PlayerRow, RankTracker},
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod signals;
mod tui_main;

#[derive(Parser)]
#[clap(name = "rank-tracker")]
#[clap(about = "Track ranked score progress for a list of players", long_about = None)]
struct Cli {
    /// Settings file (defaults to config/default and config/local)
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live table, refreshed every polling interval
    Watch,

    /// Run a single polling cycle and print the table
    Once,

    /// Print the score breakpoints built from the rank scale
    Ladder,

    /// Write a starter settings file
    Init {
        /// Where to write the file
        #[clap(default_value = "config/default.json")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { path } = &cli.command {
        Settings::write_default(path)?;
        println!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    let settings = load_settings(cli.config.as_ref())?;

    // The TUI installs its own silent subscriber
    if !matches!(cli.command, Commands::Watch) {
        init_logging(&settings.app.log_level);
    }

    if let Err(e) = settings.validate() {
        error!("Invalid settings: {}", e);
        return Err(anyhow::anyhow!(e));
    }

    match cli.command {
        Commands::Ladder => {
            let ladder = Ladder::build(&settings.rank_scale()?);
            print_ladder(&ladder);
        }

        Commands::Once => {
            let client = BridgeClient::new(&settings.api)?;
            let mut tracker = RankTracker::from_settings(&settings, client)?;

            let mut shutdown = signals::shutdown_listener();
            if let Some(report) = tracker.refresh_until(signals::requested(&mut shutdown)).await {
                print_report(&report);
            }

            let flushed = tracker.shutdown()?;
            info!("Saved {} snapshots", flushed.written);
        }

        Commands::Watch => {
            let client = BridgeClient::new(&settings.api)?;
            let mut tracker = RankTracker::from_settings(&settings, client)?;
            let mut shutdown = signals::shutdown_listener();

            let result = tui_main::run_tui(
                &mut tracker,
                &settings.app.name,
                settings.refresh_interval(),
                &mut shutdown,
            )
            .await;
            let flushed = tracker.shutdown();

            result?;
            let flushed = flushed?;
            println!("Saved {} snapshots", flushed.written);
        }

        Commands::Init { .. } => {}
    }

    Ok(())
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    let settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::new()?,
    };
    Ok(settings)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_ladder(ladder: &Ladder) {
    println!("{:<12} {:<8} {:>8}", "Tier", "Division", "Score");
    for bp in ladder.breakpoints() {
        let numeral = division_numeral(bp.division);
        println!("{:<12} {:<8} {:>8}", bp.tier, numeral, bp.score);
    }
    println!("{:<12} {:<8} {:>8}", ladder.terminal_tier(), "-", "top");
}

fn print_report(report: &CycleReport) {
    let rows: Vec<[String; 7]> = report.rows.iter().map(PlayerRow::cells).collect();

    let mut widths = PlayerRow::HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = PlayerRow::HEADERS.iter().map(|h| h.to_string()).collect();
    println!("{}", format_line(&header, &widths));
    println!(
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-")
    );
    for row in &rows {
        println!("{}", format_line(row, &widths));
    }

    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
