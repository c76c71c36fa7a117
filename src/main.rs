use analytics::{CategoryBreakdown, LongevityEngine};
use api_client::SnapshotFetcher;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use configuration::ConfigArgs;
use core_types::{FinancialSnapshot, ScoreResult};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// The main entry point for the longevity scorer.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.config.load()?;
    // Held until exit so the file writer flushes.
    let _guard = configuration::init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Serve(args) => {
            let addr = match args.addr {
                Some(addr) => addr,
                None => settings.server.socket_addr()?,
            };
            web_server::run_server(addr, &settings).await
        }
        Commands::Score(args) => handle_score(args, &settings).await,
        Commands::Evaluate(args) => handle_evaluate(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Scores how likely a listed company is to endure, from its public financials.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Fetch and score one or more listed companies.
    Score(ScoreArgs),
    /// Score a snapshot stored as a flat JSON object, without touching the network.
    Evaluate(EvaluateArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Listen address; defaults to `server.host`:`server.port` from the configuration.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[derive(Parser, Clone, Copy)]
struct OutputArgs {
    /// Print one JSON object per company instead of a table.
    #[arg(long)]
    json: bool,

    /// Include the factor-by-factor breakdown.
    #[arg(long)]
    detailed: bool,
}

#[derive(Parser)]
struct ScoreArgs {
    /// Ticker symbols, e.g. AAPL MSFT.
    #[arg(required = true)]
    symbols: Vec<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Parser)]
struct EvaluateArgs {
    /// Path to a JSON file holding the snapshot.
    file: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// One scored company, ready for printing.
struct Scored {
    name: String,
    result: ScoreResult,
    breakdown: Vec<CategoryBreakdown>,
}

impl Scored {
    fn new(name: String, engine: &LongevityEngine, snapshot: &FinancialSnapshot) -> Self {
        Self {
            name,
            result: engine.calculate(snapshot),
            breakdown: engine.explain(snapshot),
        }
    }
}

/// Fetches every symbol concurrently. A symbol that fails is reported and
/// does not stop the others.
async fn handle_score(args: ScoreArgs, settings: &configuration::Settings) -> anyhow::Result<()> {
    let fetcher = Arc::new(SnapshotFetcher::from_config(&settings.api)?);
    let engine = LongevityEngine::new();

    let progress_bar = ProgressBar::new(args.symbols.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let tasks: Vec<_> = args
        .symbols
        .iter()
        .map(|symbol| {
            let fetcher = fetcher.clone();
            let symbol = symbol.clone();
            let pb_clone = progress_bar.clone();

            tokio::spawn(async move {
                pb_clone.set_message(format!("Fetching {}...", symbol));
                let snapshot = fetcher.fetch_snapshot(&symbol).await;
                pb_clone.inc(1);
                snapshot.map(|s| Scored::new(symbol.to_uppercase(), &engine, &s))
            })
        })
        .collect();

    let results = join_all(tasks).await;
    progress_bar.finish_and_clear();

    let mut scored = Vec::new();
    let mut failures = 0usize;
    for (symbol, result) in args.symbols.iter().zip(results) {
        match result {
            Ok(Ok(company)) => scored.push(company),
            Ok(Err(e)) => {
                failures += 1;
                tracing::error!(symbol = %symbol, error = %e, "Scoring failed.");
                eprintln!("{}: {}", symbol, e);
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: task failed: {}", symbol, e);
            }
        }
    }

    print_scores(&scored, args.output)?;

    if failures > 0 {
        anyhow::bail!("{} of {} symbols could not be scored", failures, args.symbols.len());
    }
    Ok(())
}

/// Scores a snapshot file from disk.
fn handle_evaluate(args: EvaluateArgs) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(&args.file)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    let snapshot = FinancialSnapshot::from_json_value(&value)?;

    let name = args
        .file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());
    let engine = LongevityEngine::new();

    print_scores(&[Scored::new(name, &engine, &snapshot)], args.output)
}

// ==============================================================================
// Output
// ==============================================================================

fn print_scores(scored: &[Scored], output: OutputArgs) -> anyhow::Result<()> {
    if output.json {
        for company in scored {
            let mut line = json!({
                "symbol": company.name,
                "score": company.result.score,
                "components": company.result.components,
            });
            if output.detailed {
                line["breakdown"] = serde_json::to_value(&company.breakdown)?;
            }
            println!("{}", line);
        }
        return Ok(());
    }

    if scored.is_empty() {
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec!["Company".to_string(), "Longevity".to_string()];
    header.extend(core_types::Category::ALL.iter().map(|c| c.label().to_string()));
    table.set_header(header);

    for company in scored {
        let mut row = vec![company.name.clone(), format!("{:.2}", company.result.score)];
        row.extend(company.result.components.iter().map(|(_, v)| format!("{:.2}", v)));
        table.add_row(row);
    }
    println!("{table}");

    if output.detailed {
        for company in scored {
            println!("\n{}", company.name);
            println!("{}", breakdown_table(&company.breakdown));
        }
    }
    Ok(())
}

fn breakdown_table(breakdown: &[CategoryBreakdown]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Category", "Factor", "Value", "Target", "Normalized", "Points"]);

    for category in breakdown {
        if let Some(error) = &category.error {
            table.add_row(vec![
                category.category.label().to_string(),
                format!("zeroed: {}", error),
                String::new(),
                String::new(),
                String::new(),
                "0.00".to_string(),
            ]);
            continue;
        }
        for factor in &category.factors {
            table.add_row(vec![
                category.category.label().to_string(),
                factor.name.to_string(),
                format!("{:.4}", factor.value),
                format!("{:.4}", factor.target),
                format!("{:.3}", factor.normalized),
                format!("{:.2}", factor.points),
            ]);
        }
        table.add_row(vec![
            category.category.label().to_string(),
            "subtotal".to_string(),
            String::new(),
            String::new(),
            format!("x {:.2}", category.weight),
            format!("{:.2}", category.score),
        ]);
    }
    table
}
