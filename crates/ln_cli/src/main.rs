use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ln_core::{ArticleFetcher, FetchFailurePolicy, ItemOutcome, NoDelay, Pacer, Result, Settings};
use ln_scrappers::{ArticleScraper, NewsAggregator, DEFAULT_RECENT_COUNT};
use ln_search::NaverNewsClient;
use ln_web::AppState;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Recent Naver news for a stock, scraped and cleaned", long_about = None)]
pub struct Cli {
    /// YAML settings file
    #[arg(long, env = "LASTNEWS_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "NAVER_CLIENT_ID", hide_env_values = true)]
    naver_client_id: Option<String>,
    #[arg(long, env = "NAVER_CLIENT_SECRET", hide_env_values = true)]
    naver_client_secret: Option<String>,
    /// What to do when one article cannot be fetched (overrides the settings file)
    #[arg(long, value_enum)]
    on_fetch_error: Option<FetchFailurePolicy>,
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve GET /last-news/{stock}
    Serve {
        /// Address to listen on (overrides the settings file)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the most recent articles for a query as JSON
    News {
        query: String,
        #[arg(short, default_value_t = DEFAULT_RECENT_COUNT)]
        n: u32,
        /// Skip the pause between article fetches
        #[arg(long)]
        no_delay: bool,
        /// Print every article's result instead of applying the failure policy
        #[arg(long)]
        outcomes: bool,
    },
    /// Print the cleaned text of a single article page
    Article { url: String },
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?
        .with_credentials(cli.naver_client_id.clone(), cli.naver_client_secret.clone());
    if let Some(policy) = cli.on_fetch_error {
        settings.on_fetch_error = policy;
    }
    Ok(settings)
}

fn build_aggregator(settings: &Settings, client: reqwest::Client, pacer: Arc<dyn Pacer>) -> Result<NewsAggregator> {
    settings.validate()?;
    let search = NaverNewsClient::new(client.clone(), &settings.search_endpoint, settings.credentials()?)?;
    let scraper = ArticleScraper::new(client, &settings.cleaning)?;
    Ok(NewsAggregator::new(Arc::new(search), Arc::new(scraper), pacer).with_policy(settings.on_fetch_error))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    ln_core::logging::init_logging(&cli.log_level);

    let settings = load_settings(&cli)?;
    let client = reqwest::Client::new();

    match &cli.command {
        Commands::Serve { bind } => {
            let pacer = Arc::new(settings.pacing.random_delay()?);
            let aggregator = build_aggregator(&settings, client, pacer)?;
            let bind = bind.clone().unwrap_or_else(|| settings.bind.clone());
            let listener = tokio::net::TcpListener::bind(bind.as_str()).await?;
            info!("🚀 Listening on http://{}", listener.local_addr()?);
            info!("🧹 Fetch failures: {:?}", aggregator.policy());
            ln_web::serve(
                listener,
                AppState {
                    aggregator: Arc::new(aggregator),
                },
            )
            .await?;
        }
        Commands::News {
            query,
            n,
            no_delay,
            outcomes,
        } => {
            let pacer: Arc<dyn Pacer> = if *no_delay {
                Arc::new(NoDelay)
            } else {
                Arc::new(settings.pacing.random_delay()?)
            };
            let aggregator = build_aggregator(&settings, client, pacer)?;
            info!("🦗 Fetching {} recent articles for {:?}", n, query);
            if *outcomes {
                let results = aggregator.collect_outcomes(query, *n).await?;
                let failed = results.iter().filter(|o| !o.is_fetched()).count();
                for outcome in &results {
                    match outcome {
                        ItemOutcome::Fetched(record) => println!("{}", serde_json::to_string(record)?),
                        ItemOutcome::Failed { link, reason, .. } => eprintln!("❌ {}: {}", link, reason),
                    }
                }
                info!("✨ {} fetched, {} failed", results.len() - failed, failed);
            } else {
                let records = aggregator.recent_news(query, *n).await?;
                println!("{}", serde_json::to_string_pretty(&records)?);
                info!("✨ Done: {} articles", records.len());
            }
        }
        Commands::Article { url } => {
            let scraper = ArticleScraper::new(client, &settings.cleaning)?;
            let text = scraper.fetch_and_clean(url).await?;
            println!("{}", text);
        }
    }

    Ok(())
}
