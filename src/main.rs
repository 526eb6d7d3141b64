use analytics::{Candidate, MetricsEngine, MetricsReport, Verdict, compare};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use configuration::PortfolioDefinition;
use core_types::{PriceMatrix, PriceSeries, ReturnSeries, ValueSeries};
use futures::future::join_all;
use market_data::{MIN_OBSERVATIONS, MarketDataClient, YahooFinanceClient};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The main entry point for the Vantage portfolio analyzer.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging, controlled by RUST_LOG (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Buy-and-hold return and risk analytics for user-defined stock portfolios.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the configured portfolio(s) and print a metrics report.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles the orchestration of a full analysis run: fetch, align, construct,
/// compute, render.
async fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = configuration::load_config(&args.config)?;
    let client = Arc::new(YahooFinanceClient::new(&config.data_source));
    let period = config.analysis.period.clone();
    let risk_free_rate = config.analysis.risk_free_rate;

    info!(
        period = %period,
        risk_free_rate,
        "Starting analysis of '{}'{}",
        config.portfolio_a.name,
        match &config.portfolio_b {
            Some(b) => format!(" vs '{}'", b.name),
            None => String::new(),
        }
    );

    // The benchmark is shared by every portfolio, so it is fetched exactly
    // once. A benchmark failure degrades the run to absolute metrics only
    // rather than aborting it.
    let benchmark = match &config.data_source.benchmark_symbol {
        Some(symbol) => match client.fetch_benchmark(symbol, &period).await {
            Ok(series) => Some(Arc::new(series)),
            Err(e) => {
                warn!(%symbol, "Benchmark fetch failed, continuing without it: {e}");
                None
            }
        },
        None => None,
    };

    // Each portfolio is analyzed as an independent concurrent task; one
    // portfolio failing must not take the other's report down with it.
    let definitions: Vec<PortfolioDefinition> =
        std::iter::once(config.portfolio_a.clone())
            .chain(config.portfolio_b.clone())
            .collect();

    let tasks: Vec<_> = definitions
        .into_iter()
        .map(|definition| {
            let client = Arc::clone(&client);
            let benchmark = benchmark.clone();
            let period = period.clone();

            tokio::spawn(async move {
                let name = definition.name.clone();
                let result = analyze_portfolio(
                    client.as_ref(),
                    &definition,
                    &period,
                    benchmark.as_deref(),
                    risk_free_rate,
                )
                .await;
                (name, result)
            })
        })
        .collect();

    let mut completed: Vec<(String, MetricsReport)> = Vec::new();
    for joined in join_all(tasks).await {
        let (name, result) = joined?;
        match result {
            Ok(report) => completed.push((name, report)),
            Err(e) => error!("Analysis of '{name}' failed: {e:#}"),
        }
    }

    if completed.is_empty() {
        anyhow::bail!("no portfolio could be analyzed");
    }

    println!("{}", render_reports(&completed));

    if let [(name_a, report_a), (name_b, report_b)] = completed.as_slice() {
        let verdict = compare(report_a, report_b);
        println!("\nVerdict: {}", describe_verdict(verdict, name_a, name_b));
    }

    Ok(())
}

/// Runs the full pipeline for one portfolio: fetch every holding's history,
/// align it (together with the benchmark, when present) onto a common date
/// index, construct the base-100 value series, and compute the metrics.
async fn analyze_portfolio(
    client: &dyn MarketDataClient,
    definition: &PortfolioDefinition,
    period: &str,
    benchmark: Option<&PriceSeries>,
    risk_free_rate: f64,
) -> anyhow::Result<MetricsReport> {
    let symbols = definition.symbols();
    let histories = client.fetch_daily_closes(&symbols, period).await?;

    let (values, benchmark_returns) = build_series(&histories, definition, benchmark)?;
    let returns = portfolio::daily_returns(&values)?;

    let report =
        MetricsEngine::new(risk_free_rate).compute(&values, &returns, benchmark_returns.as_ref())?;
    info!(
        portfolio = %definition.name,
        observations = returns.len(),
        "Analysis complete"
    );
    Ok(report)
}

/// Turns raw per-symbol histories into the portfolio value series and, when a
/// benchmark is present, its date-aligned daily return series.
///
/// The benchmark joins the alignment so that portfolio and benchmark returns
/// come out on exactly the same trading days; it is then split back out
/// before construction, since it carries no weight.
fn build_series(
    histories: &[PriceSeries],
    definition: &PortfolioDefinition,
    benchmark: Option<&PriceSeries>,
) -> anyhow::Result<(ValueSeries, Option<ReturnSeries>)> {
    let weights = definition.weight_vector()?;

    let mut all = histories.to_vec();
    if let Some(bench) = benchmark {
        // A benchmark that is itself a holding is already in the matrix.
        if !definition.holdings.contains_key(bench.symbol()) {
            all.push(bench.clone());
        }
    }
    let matrix = portfolio::align(&all)?;

    // Disjoint histories are a data-availability condition, reported as such
    // before the benchmark split can turn it into a confusing column error.
    if matrix.is_empty() {
        anyhow::bail!(
            "no overlapping trading days in the fetched history for '{}'",
            definition.name
        );
    }
    // Each symbol passed the per-symbol minimum, but the intersection can
    // still come out shorter.
    if matrix.len() < MIN_OBSERVATIONS {
        warn!(
            portfolio = %definition.name,
            rows = matrix.len(),
            need = MIN_OBSERVATIONS,
            "Aligned history is shorter than the per-symbol minimum"
        );
    }

    let (holdings, benchmark_values) = match benchmark {
        Some(bench) => {
            let mut columns = BTreeMap::new();
            for symbol in &definition.symbols() {
                let column = matrix
                    .column(symbol)
                    .ok_or_else(|| anyhow::anyhow!("aligned matrix lost column '{symbol}'"))?;
                columns.insert(symbol.clone(), column.to_vec());
            }
            let holdings = PriceMatrix::new(matrix.dates().to_vec(), columns)?;

            let bench_column = matrix.column(bench.symbol()).ok_or_else(|| {
                anyhow::anyhow!("aligned matrix lost benchmark '{}'", bench.symbol())
            })?;
            let bench_values =
                ValueSeries::new(matrix.dates().to_vec(), bench_column.to_vec())?;

            (holdings, Some(bench_values))
        }
        None => (matrix, None),
    };

    let values = portfolio::construct(&holdings, &weights)?;
    let benchmark_returns = benchmark_values
        .map(|series| portfolio::daily_returns(&series))
        .transpose()?;

    Ok((values, benchmark_returns))
}

// ==============================================================================
// Report Rendering
// ==============================================================================

fn render_reports(reports: &[(String, MetricsReport)]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec![Cell::new("Metric")];
    header.extend(reports.iter().map(|(name, _)| Cell::new(name)));
    table.set_header(header);

    let percent_rows: [(&str, fn(&MetricsReport) -> f64); 6] = [
        ("Total Return", |r| r.total_return),
        ("Annual Return", |r| r.annual_return),
        ("CAGR", |r| r.cagr),
        ("Annual Volatility", |r| r.annual_volatility),
        ("Max Drawdown", |r| r.max_drawdown),
        ("VaR 95% (daily)", |r| r.value_at_risk_95),
    ];
    for (label, field) in percent_rows {
        add_row(&mut table, reports, label, |r| format_percent(field(r)));
    }

    let ratio_rows: [(&str, fn(&MetricsReport) -> f64); 4] = [
        ("Sharpe Ratio", |r| r.sharpe_ratio),
        ("Sortino Ratio", |r| r.sortino_ratio),
        ("Calmar Ratio", |r| r.calmar_ratio),
        ("Skewness", |r| r.skewness),
    ];
    for (label, field) in ratio_rows {
        add_row(&mut table, reports, label, |r| format!("{:.2}", field(r)));
    }

    // Benchmark-relative rows only appear when at least one report has them.
    if reports.iter().any(|(_, r)| r.has_benchmark_metrics()) {
        add_row(&mut table, reports, "Information Ratio", |r| {
            format_optional(r.information_ratio, |v| format!("{v:.2}"))
        });
        add_row(&mut table, reports, "Beta", |r| {
            format_optional(r.beta, |v| format!("{v:.2}"))
        });
        add_row(&mut table, reports, "Alpha", |r| {
            format_optional(r.alpha, format_percent)
        });
    }

    table
}

fn add_row(
    table: &mut Table,
    reports: &[(String, MetricsReport)],
    label: &str,
    render: impl Fn(&MetricsReport) -> String,
) {
    let mut row = vec![Cell::new(label)];
    row.extend(reports.iter().map(|(_, report)| Cell::new(render(report))));
    table.add_row(row);
}

fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn format_optional(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    match value {
        Some(v) => render(v),
        None => "n/a".to_string(),
    }
}

/// The verdict rendered with the configured portfolio names. Built from the
/// verdict structure directly, so names are free to contain anything.
fn describe_verdict(verdict: Verdict, name_a: &str, name_b: &str) -> String {
    let name = |candidate: Candidate| match candidate {
        Candidate::A => name_a,
        Candidate::B => name_b,
    };
    match verdict {
        Verdict::BothBetter(winner) => format!(
            "{} wins on both growth (CAGR) and risk-adjusted return (Sharpe)",
            name(winner)
        ),
        Verdict::HigherReturn(winner) => format!(
            "{} delivered the higher CAGR, but its risk-adjusted return was not confirmed superior",
            name(winner)
        ),
        Verdict::Comparable => "The portfolios delivered comparable growth".to_string(),
    }
}
