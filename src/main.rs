//! crop-advisor CLI application
//!
//! Command-line interface for indexing a PDF corpus and asking questions
//! against it.

use clap::{Parser, Subcommand};
use crop_advisor::provider::AzureEmbeddingClient;
use crop_advisor::{Config, DocumentLoader, DocumentSplitter, EmbeddingIndexer, session};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "crop-advisor")]
#[command(about = "Retrieval-augmented crop advisory over a corpus of agricultural PDFs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the vector index from a directory of PDFs
    Index {
        /// Directory holding the PDF corpus
        #[arg(long, default_value = "data/pdfs")]
        pdf_dir: PathBuf,

        /// Directory the index bundle is written to
        #[arg(long, default_value = "data/index")]
        index_dir: PathBuf,

        /// Chunk size in characters
        #[arg(long, default_value = "1000")]
        chunk_size: usize,

        /// Overlap between consecutive chunks in characters
        #[arg(long, default_value = "200")]
        overlap: usize,

        /// Chunks per embedding request
        #[arg(long, default_value = "50")]
        batch_size: usize,
    },

    /// Ask a single question against the indexed corpus
    Ask {
        /// The question to ask
        question: String,

        /// Number of chunks retrieved as context
        #[arg(short = 'k', long, default_value = "4")]
        top_k: usize,
    },

    /// Interactive question-and-answer session
    Chat,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            pdf_dir,
            index_dir,
            chunk_size,
            overlap,
            batch_size,
        } => {
            index_command(pdf_dir, index_dir, chunk_size, overlap, batch_size).await?;
        }
        Commands::Ask { question, top_k } => {
            ask_command(question, top_k).await?;
        }
        Commands::Chat => {
            chat_command().await?;
        }
    }

    Ok(())
}

async fn index_command(
    pdf_dir: PathBuf,
    index_dir: PathBuf,
    chunk_size: usize,
    overlap: usize,
    batch_size: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::from_env()?;
    config.paths.pdf_dir = pdf_dir;
    config.paths.index_dir = index_dir;
    config.chunking.chunk_size = chunk_size;
    config.chunking.chunk_overlap = overlap;
    config.indexing.batch_size = batch_size;

    println!("📚 Loading PDFs from {}...", config.paths.pdf_dir.display());
    let pages = DocumentLoader::load_pdfs(&config.paths.pdf_dir)?;
    if pages.is_empty() {
        eprintln!("❌ No readable PDF pages found, nothing to index");
        return Ok(());
    }
    println!("   Loaded {} page(s)", pages.len());

    let splitter = DocumentSplitter::new(config.chunking.clone())?;
    let chunks = splitter.split(&pages);
    if chunks.is_empty() {
        eprintln!("❌ No chunks produced from the loaded pages, nothing to index");
        return Ok(());
    }
    println!("   Split into {} chunk(s)", chunks.len());

    let embedder = Arc::new(AzureEmbeddingClient::new(&config.azure)?);
    let indexer = EmbeddingIndexer::new(embedder, config.indexing.clone())?;

    println!("🧠 Embedding chunks (this may take a while)...");
    let progress = ProgressBar::new(chunks.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} chunks embedded")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let index = indexer
        .build_and_save_with_progress(&chunks, &config.paths.index_dir, |done, _total| {
            progress.set_position(done as u64);
        })
        .await?;
    progress.finish();

    println!("✅ Indexing complete!");
    println!("   📊 Chunks: {}", index.len());
    println!("   📐 Dimension: {}", index.dimension());
    println!("   📋 Index: {}", config.paths.index_dir.display());

    Ok(())
}

async fn ask_command(question: String, top_k: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::from_env()?;
    config.retrieval.top_k = top_k;

    let advisor = session::get_or_init(&config).await?;
    let answer = advisor.ask(&question).await?;

    println!("{}", answer);
    Ok(())
}

async fn chat_command() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let advisor = session::get_or_init(&config).await?;

    println!("🌾 Crop advisory chat");
    println!(
        "   Corpus: {} chunk(s) indexed",
        advisor.retriever().chunk_count()
    );
    println!("   Type 'quit' or 'exit' to end the session");
    println!();

    loop {
        print!("❓ Question: ");
        use std::io::{self, Write};
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "exit" {
            println!("👋 Goodbye!");
            break;
        }

        match advisor.ask(input).await {
            Ok(answer) => {
                println!("\n{}\n", answer);
            }
            Err(e) => {
                // The session must survive a failed exchange.
                log::error!("Answer generation failed: {}", e);
                println!("\nSorry, I couldn't answer that right now ({}). Please try again.\n", e);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["crop-advisor", "ask", "how do I control locusts?"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from(["crop-advisor", "index", "--chunk-size", "500"]);
        assert!(cli.is_ok());
    }
}
