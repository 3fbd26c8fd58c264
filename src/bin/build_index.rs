use clap::Parser;
use margincast::application::dataset::HistoricalDataset;
use margincast::config::Config;
use margincast::domain::ports::EmbeddingService;
use margincast::infrastructure::azure_openai::AzureOpenAiClient;
use margincast::infrastructure::index::{IndexedDocument, VectorIndex};
use std::path::PathBuf;
use tracing::info;

/// Rebuilds the vector index snapshot from the historical dataset.
/// The index has no incremental-update contract: run this again whenever
/// the dataset changes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the historical dataset CSV (defaults to HISTORICAL_DATA_PATH)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Path for the output snapshot (defaults to VECTOR_INDEX_PATH)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Rows embedded per API request
    #[arg(long, default_value_t = 64)]
    batch_size: usize,
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

    let args = Args::parse();
    let config = Config::from_env()?;

    let input = args.input.unwrap_or(config.historical_data_path.clone());
    let output = args.output.unwrap_or(config.vector_index_path.clone());

    let dataset = HistoricalDataset::load(&input)?;
    let documents = dataset.documents();
    info!("embedding {} documents", documents.len());

    let client = AzureOpenAiClient::new(&config);

    let mut indexed = Vec::with_capacity(documents.len());
    for batch in documents.chunks(args.batch_size) {
        let embeddings = client.embed_batch(batch).await?;
        for (text, embedding) in batch.iter().zip(embeddings) {
            indexed.push(IndexedDocument {
                text: text.clone(),
                embedding,
            });
        }
        info!("embedded {}/{} documents", indexed.len(), documents.len());
    }

    let index = VectorIndex::from_documents(indexed);
    index.save(&output)?;

    println!("Indexed {} historical records into {:?}", index.len(), output);
    Ok(())
}
