use clap::{Parser, Subcommand};
use factcheck::{
    AutoUpdater, ClaimService, ClaimStore, GamificationState, MockAnalyzer, UpdaterConfig,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "factcheck", about = "Fact-check corpus and news ingestion service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one ingestion cycle and print the structured result
    Update,
    /// Run the daily update scheduler until terminated
    Schedule,
    /// Search the fact-check corpus
    Search {
        query: String,
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
    /// Print corpus statistics
    Stats,
    /// List the most recently stored fact-checks
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Seed the corpus with sample fact-checks
    Seed,
    /// Verify a single claim with the built-in analyzer
    Verify { claim: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = UpdaterConfig::from_env();

    match cli.command {
        Command::Update => {
            let updater = AutoUpdater::from_config(&config).await?;
            let outcome = updater.run_once().await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Schedule => {
            let updater = AutoUpdater::from_config(&config).await?;
            updater.run_scheduled().await;
        }
        Command::Search { query, limit } => {
            let store = ClaimStore::open(&config.database_url).await?;
            let matches = store.search(&query, limit).await?;
            if matches.is_empty() {
                println!("No matching fact-checks.");
            }
            for m in matches {
                println!("{}", m);
            }
        }
        Command::Stats => {
            let store = ClaimStore::open(&config.database_url).await?;
            let stats = store.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Recent { limit } => {
            let store = ClaimStore::open(&config.database_url).await?;
            for record in store.recent(limit).await? {
                println!(
                    "[{}] {} — {} ({})",
                    record.created_at.format("%Y-%m-%d"),
                    record.claim,
                    record.verdict,
                    record.source
                );
            }
        }
        Command::Seed => {
            let store = ClaimStore::open(&config.database_url).await?;
            let count = store.seed_sample_data().await?;
            info!("Seeded {} records into {}", count, config.database_url);
        }
        Command::Verify { claim } => {
            let store = ClaimStore::open(&config.database_url).await?;
            let service = ClaimService::new(store, Box::new(MockAnalyzer::new("cli")));
            let report = service.verify(&claim, GamificationState::default()).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
