use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use resrank::analysis::{missing_terms, relevant_terms_per_category};
use resrank::api::{create_router, AppState};
use resrank::document::normalize_text;
use resrank::loader;
use resrank::{CategoryFilter, RankOutcome, RankRequest, RankerConfig, ResumeRanker, Source, Submission};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Rank resumes against a job description with BM25", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Overrides {
    /// Term frequency saturation
    #[arg(long, global = true)]
    k1: Option<f64>,

    /// Length normalization strength
    #[arg(long, global = true)]
    b: Option<f64>,

    /// Number of results to show
    #[arg(short = 'n', long, global = true)]
    top_n: Option<usize>,

    /// "all" or comma-separated categories, e.g. "SALES, HR"
    #[arg(long, global = true)]
    categories: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank resumes for a job description
    Rank {
        #[arg(short, long, default_value = "Resume.csv")]
        data: PathBuf,

        /// Job description
        #[arg(short, long)]
        query: String,

        /// Resume file to place within the ranking
        #[arg(short, long)]
        resume: Option<PathBuf>,
    },
    /// Show the most relevant terms per category
    Terms {
        #[arg(short, long, default_value = "Resume.csv")]
        data: PathBuf,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(short, long, default_value = "Resume.csv")]
        data: PathBuf,

        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
}

fn load_config(cli: &Cli) -> Result<RankerConfig> {
    let mut config = match &cli.config {
        Some(path) => RankerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RankerConfig::default(),
    };

    let overrides = &cli.overrides;
    if let Some(k1) = overrides.k1 {
        config.k1 = k1;
    }
    if let Some(b) = overrides.b {
        config.b = b;
    }
    if let Some(top_n) = overrides.top_n {
        config.top_n = top_n;
    }
    if let Some(categories) = &overrides.categories {
        config.categories = categories.parse::<CategoryFilter>()?;
    }

    config.validate()?;
    Ok(config)
}

fn rank(ranker: &ResumeRanker, data: PathBuf, query: String, resume: Option<PathBuf>) -> Result<()> {
    let config = ranker.config();
    let mut request = RankRequest::new(query.clone()).with_categories(config.categories.clone());

    let uploaded = match resume {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read resume {}", path.display()))?;
            request = request.submit(Submission::new(text.clone()));
            Some(text)
        }
        None => None,
    };

    let start = Instant::now();
    let ranking = match ranker
        .rank_csv_path(&data, request)
        .with_context(|| format!("Failed to rank resumes from {}", data.display()))?
    {
        RankOutcome::Ranked(ranking) => ranking,
        RankOutcome::NoDocuments => bail!("No resumes found for categories: {}", config.categories),
    };
    let duration = start.elapsed();

    println!("Ranked {} resumes in {:?}", ranking.ranked.len(), duration);
    println!();
    println!("Top Ranked Resumes with Scores:");
    for (i, doc) in ranking.top(config.top_n).iter().enumerate() {
        println!("Rank {}: {} [{}, {}] {:.4}", i + 1, doc.id, doc.category, doc.source, doc.score);
    }

    if let Some(text) = uploaded {
        println!();
        match ranking.focus {
            Some(placement) => println!(
                "Your resume ranks {} of {} with score {:.4}",
                placement.rank,
                ranking.ranked.len(),
                placement.score
            ),
            None => println!("Your resume was not ranked"),
        }

        let missing = missing_terms(&query, &normalize_text(&text), ranker.scorer().tokenizer());
        if !missing.is_empty() {
            println!("Missing terms: {}", missing.join(", "));
        }
    }

    Ok(())
}

fn terms(ranker: &ResumeRanker, data: PathBuf) -> Result<()> {
    let config = ranker.config();
    let documents = loader::load_documents_from_path(&data, &config.categories, Source::Corpus)
        .with_context(|| format!("Failed to load resumes from {}", data.display()))?;

    let relevant = relevant_terms_per_category(&documents, ranker.scorer().tokenizer(), config.top_n);

    println!("Most Relevant Terms by Category:");
    for (category, terms) in relevant {
        println!();
        println!("Category: {}", category);
        for term in terms {
            println!("{}: {}", term.term, term.count);
        }
    }

    Ok(())
}

async fn serve(ranker: ResumeRanker, data: PathBuf, addr: String) -> Result<()> {
    if !data.exists() {
        bail!("Resume data {} does not exist", data.display());
    }

    let state = Arc::new(AppState {
        ranker,
        corpus_path: data,
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("resrank=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let ranker = ResumeRanker::new(config)?;

    match cli.command {
        Command::Rank { data, query, resume } => rank(&ranker, data, query, resume),
        Command::Terms { data } => terms(&ranker, data),
        Command::Serve { data, addr } => serve(ranker, data, addr).await,
    }
}
