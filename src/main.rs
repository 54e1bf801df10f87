use analytics::PerformanceCharts;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use configuration::{Config, CumulativeAlphaScope};
use core_types::{Article, MetricKind};
use engine::DashboardEngine;

/// The main entry point for the Stockboard dashboard backend.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load FMP_API_KEY and friends from a .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config()?;
    let _guard = configuration::logging::init_tracing(&config.logging)?;
    if cli.strict {
        config.fallback.strict = true;
    }

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args, config).await,
        Commands::Charts(args) => handle_charts(args, config).await,
        Commands::News(args) => handle_news(args, config).await,
        Commands::Snapshot(args) => handle_snapshot(args, config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Stock-versus-benchmark performance dashboard: charts, news and metrics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Report upstream and data errors instead of serving mock data.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Print the four performance charts for a ticker.
    Charts(ChartsArgs),
    /// Print stock news for a ticker, or general market articles.
    News(NewsArgs),
    /// Print point-in-time alpha, beta, z-score and relative performance.
    Snapshot(SnapshotArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct ChartsArgs {
    /// The ticker to compare against the benchmark (e.g., "IBM").
    #[arg(long)]
    ticker: Option<String>,

    /// Print the raw JSON payload instead of a summary table.
    #[arg(long)]
    json: bool,

    /// Which alpha history the cumulative alpha covers.
    #[arg(long, value_enum)]
    cumulative_alpha_scope: Option<CumulativeAlphaScope>,
}

#[derive(Parser)]
struct NewsArgs {
    #[arg(long)]
    ticker: Option<String>,

    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct SnapshotArgs {
    #[arg(long)]
    ticker: Option<String>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let addr = web_server::server_addr(&config)?;
    web_server::run_server(addr, config).await
}

async fn handle_charts(args: ChartsArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(scope) = args.cumulative_alpha_scope {
        config.analytics.cumulative_alpha_scope = scope;
    }
    let engine = DashboardEngine::new(config)?;
    let charts = engine.performance_charts(args.ticker.as_deref()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&charts)?);
    } else {
        println!("{}", charts_table(&charts));
    }
    Ok(())
}

async fn handle_news(args: NewsArgs, config: Config) -> anyhow::Result<()> {
    let engine = DashboardEngine::new(config)?;
    let articles = engine.articles(args.ticker.as_deref()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
    } else {
        println!("{}", articles_table(&articles));
    }
    Ok(())
}

async fn handle_snapshot(args: SnapshotArgs, config: Config) -> anyhow::Result<()> {
    let engine = DashboardEngine::new(config)?;
    let snapshot = engine.snapshot(args.ticker.as_deref()).await?;

    let show = |value: Option<String>| value.unwrap_or_else(|| "n/a".to_string());
    let mut table = new_table(vec!["Metric", "Value"]);
    table.add_row(vec!["Symbol".to_string(), snapshot.symbol.clone()]);
    table.add_row(vec!["Benchmark".to_string(), snapshot.benchmark.clone()]);
    table.add_row(vec!["Alpha (daily)".to_string(), show(snapshot.alpha.map(|v| format!("{:+.5}", v)))]);
    table.add_row(vec!["Beta".to_string(), show(snapshot.beta.map(|v| format!("{:.3}", v)))]);
    table.add_row(vec!["Z-score".to_string(), show(snapshot.z_score.map(|v| format!("{:+.2}", v)))]);
    table.add_row(vec![
        "Relative performance".to_string(),
        show(snapshot.relative_performance_pct.map(|v| format!("{:+.2}%", v))),
    ]);
    table.add_row(vec!["Latest price".to_string(), show(snapshot.latest_price.map(|p| p.to_string()))]);
    println!("{}", table);
    Ok(())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn charts_table(charts: &PerformanceCharts) -> Table {
    let mut table = new_table(vec!["Metric", "Value", "Change", "Points", "From", "To"]);
    for kind in MetricKind::ALL {
        let summary = charts.get(kind);
        table.add_row(vec![
            kind.key().to_string(),
            summary.value.clone(),
            summary.change.clone(),
            summary.values.len().to_string(),
            summary.dates.first().cloned().unwrap_or_default(),
            summary.dates.last().cloned().unwrap_or_default(),
        ]);
    }
    table
}

fn articles_table(articles: &[Article]) -> Table {
    let mut table = new_table(vec!["Date", "Title", "Site", "Link"]);
    for article in articles {
        table.add_row(vec![
            article.date.clone(),
            article.title.clone(),
            article.site.clone(),
            article.link.clone(),
        ]);
    }
    table
}
