use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdf_book::constants::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfb", about = "Print-ready picture book PDFs", version)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the book PDF (and page images, if configured)
    Build {
        /// Book config (YAML or JSON)
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Show page statistics without rendering anything
    Stats {
        /// Book config (YAML or JSON)
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Build { config } => {
            let report = pdf_book::build_book(&config)
                .await
                .with_context(|| format!("Failed to build {}", config.display()))?;
            println!("Created {} ({} pages)", report.pdf_path.display(), report.pages);
            if !report.images.is_empty() {
                println!("  Page images: {}", report.images.len());
            }
        }

        Commands::Stats { config } => {
            let stats = pdf_book::load_statistics(&config)
                .await
                .with_context(|| format!("Failed to read {}", config.display()))?;
            println!("Book Statistics:");
            println!("  Entries: {}", stats.entries);
            println!("  Pages: {}", stats.pages);
            println!("  Left pages: {}", stats.left_pages);
            println!("  Right pages: {}", stats.right_pages);
            println!("  Spreads: {}", stats.spreads);
            if let Some(page) = stats.first_spread_page {
                println!("  First spread on page: {}", page);
            }
            if stats.multi_page_entries > 0 {
                println!("  Entries spanning 3+ pages: {}", stats.multi_page_entries);
            }
        }
    }

    Ok(())
}
