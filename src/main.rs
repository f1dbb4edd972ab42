use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::Path;

mod category;
mod expand;
mod generate;
mod prices;
mod scrape;
mod types;
mod variant_data;

pub use types::*;

pub const SEARCH_API_URL: &str = "https://aucs34.ksearchnet.com/cs/v2/search";
pub const API_KEY: &str = "klevu-173190000117617559";

pub const DEFAULT_CSV: &str = "briscoes_products_clean.csv";
pub const DEFAULT_HTML: &str = "briscoes_deals.html";

#[derive(Parser)]
#[command(name = "briscoes-deals")]
#[command(about = "Briscoes product scraper and deal finder site generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the product search API into a CSV table
    Scrape {
        /// Target number of products to fetch
        #[arg(long, default_value_t = 14000)]
        total: usize,
        /// Products per request
        #[arg(long, default_value_t = 1000)]
        batch: usize,
        /// Output CSV file
        #[arg(short, long, default_value = DEFAULT_CSV)]
        output: String,
    },
    /// Generate the static deal finder page from the CSV table
    Generate {
        /// Input CSV file
        #[arg(short, long, default_value = DEFAULT_CSV)]
        input: String,
        /// Output HTML file
        #[arg(short, long, default_value = DEFAULT_HTML)]
        output: String,
    },
    /// Remove generated files (CSV table and HTML page)
    Clean,
}

fn run_clean() -> Result<()> {
    println!("Cleaning generated files...");

    for name in [DEFAULT_CSV, DEFAULT_HTML] {
        let path = Path::new(name);
        if path.exists() {
            fs::remove_file(path)?;
            println!("  Removed {}", name);
        }
    }

    println!("Clean complete!");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            total,
            batch,
            output,
        } => scrape::run_scrape(total, batch, &output),
        Commands::Generate { input, output } => generate::run_generate(&input, &output),
        Commands::Clean => run_clean(),
    }
}
