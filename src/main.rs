//! Shogi results CLI
//!
//! Scrapes the monthly match results tables into JSON files.

use clap::{Parser, Subcommand};
use shogi_results::{Config, Result};

#[derive(Parser)]
#[command(name = "shogi-results")]
#[command(about = "Scrape monthly shogi match results into JSON", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape results pages and write one JSON file per month
    Scrape {
        /// Scrape a single month (e.g. "201804") instead of every month
        #[arg(short, long)]
        month: Option<String>,
        /// Cache directory for HTML files
        #[arg(long)]
        cache: Option<String>,
        /// Use only cached files (no network requests)
        #[arg(long)]
        offline: bool,
        /// Output directory (overrides config)
        #[arg(long)]
        out: Option<String>,
    },
    /// Parse a saved results page and print its matches
    Parse {
        /// HTML file to parse
        file: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write a default config file
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Scrape {
            month,
            cache,
            offline,
            out,
        } => commands::scrape(&config, month, cache, offline, out),
        Commands::Parse { file, json } => commands::parse(&config, &file, json),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use shogi_results::data::months::{months_between, YearMonth};
    use shogi_results::data::{output, ResultsScraper, TableScanner};
    use shogi_results::Match;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Run 'shogi-results scrape -m 201804' to fetch one month");
        println!("  3. Run 'shogi-results scrape' to fetch every month");

        Ok(())
    }

    pub fn scrape(
        config: &Config,
        month: Option<String>,
        cache: Option<String>,
        offline: bool,
        out: Option<String>,
    ) -> Result<()> {
        let mut scraper = ResultsScraper::from_config(&config.source.host, &config.fetch)?;

        if let Some(cache_dir) = cache {
            println!("Using cache directory: {}", cache_dir);
            scraper = scraper.with_cache(&cache_dir);
        }

        if offline {
            println!("Offline mode: using cached files only");
            scraper = scraper.offline_only(true);
        }

        let months = match month {
            Some(m) => vec![YearMonth::parse(&m)?],
            None => {
                let since = YearMonth::new(config.source.since_year, config.source.since_month)?;
                let now = YearMonth::of(chrono::Local::now().date_naive());
                months_between(since, now)
            }
        };

        let out_dir = out.unwrap_or_else(|| config.output.dir.clone());
        let mut total = 0;

        for month in months {
            let matches = scraper.fetch_month(month)?;
            total += matches.len();
            let path = output::write_month(&out_dir, month, &matches)?;
            println!("Output: {}", path.display());
        }

        println!("Wrote {} matches", total);
        Ok(())
    }

    pub fn parse(config: &Config, file: &str, json: bool) -> Result<()> {
        let html = std::fs::read_to_string(file)?;
        let matches = TableScanner::new()
            .with_host(config.source.host.as_str())
            .scan_html(&html)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&matches)?);
        } else {
            print_table(&matches);
        }

        Ok(())
    }

    fn print_table(matches: &[Match]) {
        println!(
            "{:<23} {:<20} {:<24} {:<24}",
            "Date", "Match", "First", "Second"
        );
        println!("{}", "-".repeat(94));

        for m in matches {
            let dates = if m.is_single_day() {
                m.begin_date.format("%Y/%m/%d").to_string()
            } else {
                format!(
                    "{} - {}",
                    m.begin_date.format("%Y/%m/%d"),
                    m.end_date.format("%m/%d")
                )
            };
            println!(
                "{:<23} {:<20} {:<24} {:<24}",
                dates,
                m.match_name,
                format!("{} ({})", m.first_player.name.trim(), m.first_player.result),
                format!("{} ({})", m.second_player.name.trim(), m.second_player.result),
            );
        }

        println!("\n{} matches", matches.len());
    }
}
