mod config;
mod display;
mod division;
mod form;
mod parser;
mod session;
mod web;

use std::path::{Path, PathBuf};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use division::{allocate, AllocationResult, ResourcePool};
use display::{print_distribution, write_distribution_to_file};
use form::export_results_to_csv;
use parser::load_crew;

#[derive(Parser)]
#[command(name = "treasure-split", about = "Divides a treasure vault across a pirate crew by priority")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the web UI
    Serve {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        bind: Option<String>,
    },
    /// Divide a vault across a crew roster CSV (columns: name, priority)
    Divide {
        #[arg(long)]
        crew: PathBuf,
        #[arg(long, default_value_t = 0)]
        gems: u64,
        #[arg(long, default_value_t = 0)]
        gold: u64,
        #[arg(long, default_value_t = 0)]
        diamonds: u64,
        /// Write a text report here
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the distribution as CSV here
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port, bind } => {
            let mut cfg = config::load()?;
            if let Some(port) = port {
                cfg.port = port;
            }
            if let Some(bind) = bind {
                cfg.bind_address = bind;
            }

            println!("Access the site at http://localhost:{}", cfg.port);
            web::start_server(cfg).await?;
        }
        Command::Divide { crew, gems, gold, diamonds, output, csv } => {
            let pool = ResourcePool::new(gems, gold, diamonds);
            let results = run_divide(&crew, &pool, output.as_deref(), csv.as_deref())?;
            print_distribution(&pool, &results)?;
            if let Some(path) = output {
                println!("Distribution saved to {}", path.display());
            }
            if let Some(path) = csv {
                println!("CSV saved to {}", path.display());
            }
        }
    }

    Ok(())
}

/// Loads a roster, divides the vault across it and writes whichever
/// reports were asked for
fn run_divide(
    crew_path: &Path,
    pool: &ResourcePool,
    output: Option<&Path>,
    csv: Option<&Path>,
) -> Result<Vec<AllocationResult>, Box<dyn std::error::Error>> {
    info!(path = %crew_path.display(), "loading crew roster");
    let members = load_crew(crew_path)?;
    info!(count = members.len(), "crew loaded");

    let results = allocate(pool, &members);

    if let Some(path) = output {
        write_distribution_to_file(path, pool, &results)?;
    }
    if let Some(path) = csv {
        export_results_to_csv(path, &results)?;
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divide_reads_roster_and_writes_reports() {
        let dir = tempfile::tempdir().unwrap();
        let roster = dir.path().join("crew.csv");
        std::fs::write(&roster, "name,priority\nAnne,1\nMary,2\nCabin Boy,0\n").unwrap();
        let report = dir.path().join("report.txt");
        let csv = dir.path().join("results.csv");

        let pool = ResourcePool::new(100, 0, 0);
        let results = run_divide(&roster, &pool, Some(report.as_path()), Some(csv.as_path())).unwrap();

        let gems: Vec<u64> = results.iter().map(|r| r.gems_received).collect();
        assert_eq!(gems, vec![67, 33, 0]);

        let text = std::fs::read_to_string(&report).unwrap();
        assert!(text.contains("Anne: 67 gems, 0 gold, 0 diamonds"));
        let exported = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(exported, "pirate,gems,gold,diamonds\nAnne,67,0,0\nMary,33,0,0\nCabin Boy,0,0,0\n");
    }

    #[test]
    fn divide_with_no_eligible_crew_writes_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let roster = dir.path().join("crew.csv");
        std::fs::write(&roster, "name,priority\nAnne,0\n").unwrap();
        let report = dir.path().join("report.txt");

        let results = run_divide(&roster, &ResourcePool::new(5, 5, 5), Some(report.as_path()), None).unwrap();
        assert!(results.is_empty());
        assert!(std::fs::read_to_string(&report).unwrap().contains("[NO ELIGIBLE CREW]"));
    }

    #[test]
    fn divide_reports_missing_roster() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_divide(&dir.path().join("nope.csv"), &ResourcePool::default(), None, None);
        assert!(err.is_err());
    }
}
