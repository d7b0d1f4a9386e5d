// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// Use library instead of local modules
use cost_eras::{export, Dashboard, Era, EraMetrics, MemoryPage, Profile, SlotKind};

/// Cost of living across 1965, 1995 and 2025
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal dashboard (default)
    Ui {
        /// Household profile shown first
        #[arg(short, long, default_value = "single")]
        profile: Profile,
    },
    /// Render the dashboard once and print the metric cards
    Show {
        #[arg(short, long, default_value = "single")]
        profile: Profile,

        /// Print the full page snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write per-era metrics as CSV
    Export {
        /// Limit to one profile (both by default)
        #[arg(short, long)]
        profile: Option<Profile>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Ui { profile: Profile::default() }) {
        Command::Ui { profile } => {
            // Log lines would tear the alternate screen
            init_logging("warn");
            run_ui_mode(profile)?;
        }
        Command::Show { profile, json } => {
            init_logging("info");
            run_show(profile, json)?;
        }
        Command::Export { profile, output } => {
            init_logging("info");
            run_export(profile, output)?;
        }
    }

    Ok(())
}

fn run_show(profile: Profile, json: bool) -> Result<()> {
    let mut dashboard = Dashboard::load(MemoryPage::standard())?;
    dashboard.select_profile(profile)?;
    let page = dashboard.presenter();

    if json {
        let snapshot = serde_json::to_string_pretty(&page.snapshot())
            .context("Failed to serialize page snapshot")?;
        println!("{}", snapshot);
        return Ok(());
    }

    println!("🏠 Cost of Living - {} household", profile);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for era in Era::ALL {
        let slot = |kind: SlotKind| page.text(&kind.id(era)).unwrap_or("-").to_string();
        let severity = page
            .slot(&SlotKind::Ratio.id(era))
            .and_then(|s| s.style)
            .map(|s| s.as_str())
            .unwrap_or("-");

        println!(
            "\n{}  income {:>10}  house {:>10}  {} ({})",
            era,
            slot(SlotKind::Income),
            slot(SlotKind::HousePrice),
            slot(SlotKind::Ratio),
            severity
        );

        let metrics = EraMetrics::compute(cost_eras::dataset::get(profile), era);
        for cost in &metrics.monthly_costs {
            println!(
                "      {:<11} {:>3}%  {:>8}/month",
                cost.category.label(),
                cost.percentage,
                cost_eras::currency::compact(cost.monthly)
            );
        }
    }

    Ok(())
}

fn run_export(profile: Option<Profile>, output: Option<PathBuf>) -> Result<()> {
    let profiles: Vec<Profile> = match profile {
        Some(p) => vec![p],
        None => Profile::ALL.to_vec(),
    };

    match output {
        Some(path) => {
            println!("📤 Exporting era metrics...");
            let count = export::export_to_file(&path, &profiles)?;
            println!("✓ Wrote {} rows to {:?}", count, path);
        }
        None => {
            let rows = export::rows(&profiles);
            export::write_csv(io::stdout().lock(), &rows)?;
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(profile: Profile) -> Result<()> {
    let mut app = ui::App::new(profile)?;
    ui::run_ui(&mut app)?;

    println!("\n✅ Dashboard closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_profile: Profile) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print once: cargo run -- show --profile couple");
    std::process::exit(1);
}
