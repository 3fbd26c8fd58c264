use clap::{Parser, Subcommand};
use margincast::application::bootstrap::bootstrap;
use margincast::config::Config;
use margincast::domain::types::FeatureInput;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Margin call forecasting and what-if analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forecast margin calls for the next three business dates
    Forecast {
        #[arg(long)]
        client: String,
    },
    /// Evaluate a single hypothetical day for a client
    WhatIf {
        #[arg(long)]
        client: String,
        #[arg(long)]
        mtm: f64,
        #[arg(long)]
        collateral: f64,
        #[arg(long)]
        threshold: f64,
        #[arg(long)]
        volatility: f64,
        #[arg(long)]
        interest_rate: f64,
        #[arg(long)]
        mta: f64,
        /// Let the grounded generation step produce the full prediction
        /// instead of the model ensemble
        #[arg(long)]
        generation_only: bool,
    },
    /// Ask a free-form question against the historical data
    Ask {
        #[arg(long)]
        query: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    info!("loading artifacts");
    let forecaster = bootstrap(&config)?;

    match cli.command {
        Command::Forecast { client } => {
            let results = forecaster.forecast(&client).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::WhatIf {
            client,
            mtm,
            collateral,
            threshold,
            volatility,
            interest_rate,
            mta,
            generation_only,
        } => {
            let input = FeatureInput {
                client,
                mtm,
                collateral,
                threshold,
                volatility,
                interest_rate,
                mta,
            };
            let result = if generation_only {
                forecaster.what_if_llm(input).await?
            } else {
                forecaster.what_if(input).await?
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Ask { query } => {
            let answer = forecaster.ask(&query).await?;
            println!("{answer}");
        }
    }

    Ok(())
}
