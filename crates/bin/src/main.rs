//! Contrail CLI binary.
//!
//! Provides the command-line interface for comparing US airline financials.

mod config;
mod filings;

use clap::{Args, Parser, Subcommand, ValueEnum};
use config::Config;
use contrail::{Fleet, UsCarriers};
use contrail_compare::{ComparisonTable, Selection, align};
use contrail_data::edgar::EdgarClient;
use contrail_data::{InsightRequest, load_csv};
use contrail_metrics::{
    Metric, MetricDeriver, MetricGroup, Partition, PartitionData, Quarter, available_metrics,
};
use contrail_output::{ComparisonReport, ExportFormat, Exporter, NOT_YET_REPORTED, RowRecord};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "contrail")]
#[command(about = "Contrail: side-by-side comparison of US airline financials", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to <config dir>/contrail/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Carrier financials CSV (overrides the config file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare carriers against a base carrier over a range of periods
    Compare {
        #[command(flatten)]
        query: QueryArgs,

        /// Fiscal years (all years when omitted)
        #[arg(long, value_delimiter = ',')]
        years: Vec<i32>,

        /// Quarters for the quarterly partition: 1-4 or Q1-Q4 (all when omitted)
        #[arg(long, value_delimiter = ',')]
        quarters: Vec<Quarter>,

        /// Metrics by name, e.g. "Net Margin,Load Factor"
        #[arg(long, value_delimiter = ',', conflicts_with = "group")]
        metrics: Vec<Metric>,

        /// Metric group: all, earnings or unit-performance
        #[arg(long)]
        group: Option<MetricGroup>,

        /// Summarize only the latest selected period
        #[arg(long)]
        snapshot: bool,
    },

    /// Show the latest reported period for every carrier
    Latest {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// List metrics with their definitions
    Metrics {
        /// Only list one group
        #[arg(long)]
        group: Option<MetricGroup>,
    },

    /// List covered carriers
    Airlines,

    /// Summarize the SEC filings released for a fiscal period
    Filings {
        /// Carrier codes, comma separated
        airlines: String,

        /// Fiscal year
        year: i32,

        /// FY or a quarter (1-4, Q1-Q4)
        period: Quarter,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Dataset partition
    #[arg(long, value_enum, default_value = "fy")]
    partition: PartitionArg,

    /// Carriers to compare, comma separated (all when omitted)
    #[arg(long, value_delimiter = ',')]
    airlines: Vec<String>,

    /// Base carrier for percent differences
    #[arg(long)]
    base: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Keep reported units instead of millions and cents
    #[arg(long)]
    no_rescale: bool,

    /// Hide percent-difference columns
    #[arg(long)]
    no_compare: bool,

    /// Write to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PartitionArg {
    /// Full-year figures
    Fy,
    /// Quarterly figures
    #[value(alias = "q")]
    Quarterly,
}

impl From<PartitionArg> for Partition {
    fn from(arg: PartitionArg) -> Self {
        match arg {
            PartitionArg::Fy => Self::FullYear,
            PartitionArg::Quarterly => Self::Quarterly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Aligned text tables
    Text,
    /// Markdown tables
    Markdown,
    /// One CSV record per comparison row
    Csv,
    /// Pretty-printed JSON records
    Json,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.dataset = Some(data);
    }

    match cli.command {
        Commands::Compare {
            query,
            years,
            quarters,
            metrics,
            group,
            snapshot,
        } => {
            let data = load_partition(&config, query.partition.into())?;
            let selection =
                resolve_selection(&config, &data, &query, years, quarters, metrics, group)?;
            let table = align(&data, &selection)?;
            let content = if snapshot {
                render_compare_snapshot(&table, &query)?
            } else {
                render_periods(&table, &query)?
            };
            emit(&content, query.output.as_ref())?;
        }
        Commands::Latest { query } => {
            let data = load_partition(&config, query.partition.into())?;
            let selection = resolve_latest(&config, &data, &query)?;
            let table = align(&data, &selection)?;
            emit(&render_latest(&table, &query)?, query.output.as_ref())?;
        }
        Commands::Metrics { group } => list_metrics(group),
        Commands::Airlines => list_airlines(),
        Commands::Filings {
            airlines,
            year,
            period,
        } => {
            show_filings(&config, &airlines, year, period).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_partition(
    config: &Config,
    partition: Partition,
) -> Result<PartitionData, Box<dyn std::error::Error>> {
    let path = config
        .dataset
        .as_ref()
        .ok_or("No dataset configured; pass --data or set `dataset` in the config file")?;
    let dataset = load_csv(path)?;
    let data = MetricDeriver::new().derive(&dataset).partition(partition);
    if data.is_empty() {
        return Err(format!("The dataset has no {partition} observations").into());
    }
    info!(
        partition = %partition,
        observations = data.len(),
        carriers = data.entities().len(),
        "Prepared partition"
    );
    Ok(data)
}

/// Carrier codes to compare: the requested ones, or every carrier in the data.
fn resolve_entities(data: &PartitionData, requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        data.entities()
    } else {
        requested.iter().map(|c| c.trim().to_uppercase()).collect()
    }
}

/// Base carrier: the flag, else the configured base if it is compared, else
/// the first compared carrier.
fn resolve_base(config: &Config, query: &QueryArgs, entities: &[String]) -> Option<String> {
    query
        .base
        .as_ref()
        .map(|b| b.trim().to_uppercase())
        .or_else(|| {
            config
                .base
                .as_ref()
                .map(|b| b.trim().to_uppercase())
                .filter(|b| entities.contains(b))
        })
        .or_else(|| entities.first().cloned())
}

const fn rescale(config: &Config, query: &QueryArgs) -> bool {
    config.rescale && !query.no_rescale
}

fn resolve_selection(
    config: &Config,
    data: &PartitionData,
    query: &QueryArgs,
    years: Vec<i32>,
    quarters: Vec<Quarter>,
    metrics: Vec<Metric>,
    group: Option<MetricGroup>,
) -> Result<Selection, Box<dyn std::error::Error>> {
    let entities = resolve_entities(data, &query.airlines);
    let base = resolve_base(config, query, &entities).unwrap_or_default();
    let years = if years.is_empty() { data.years() } else { years };
    let quarters = if quarters.is_empty() {
        data.quarters()
    } else {
        quarters
    };

    let builder = Selection::builder()
        .entities(entities)
        .base(base)
        .years(years)
        .quarters(quarters)
        .rescale(rescale(config, query));
    let builder = if metrics.is_empty() {
        builder.metric_group(group.unwrap_or(MetricGroup::All), data)
    } else {
        builder.metrics(metrics)
    };

    Ok(builder.build()?)
}

fn resolve_latest(
    config: &Config,
    data: &PartitionData,
    query: &QueryArgs,
) -> Result<Selection, Box<dyn std::error::Error>> {
    let entities = resolve_entities(data, &query.airlines);
    let base = resolve_base(config, query, &entities).unwrap_or_default();

    let selection = if query.airlines.is_empty() {
        Selection::latest(data, &base)?
    } else {
        let latest = data
            .latest_period()
            .ok_or("The dataset has no observations")?;
        Selection::builder()
            .entities(entities)
            .base(base)
            .year(latest.year)
            .quarter(latest.quarter)
            .metric_group(MetricGroup::All, data)
            .build()?
    };

    Ok(selection.with_rescale(rescale(config, query)))
}

fn render_periods(
    table: &ComparisonTable,
    query: &QueryArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let report = ComparisonReport::new(table).compare(!query.no_compare);
    Ok(match query.format {
        OutputFormat::Text => report.to_ascii_table(),
        OutputFormat::Markdown => report.to_markdown(),
        OutputFormat::Csv => table.export_to_string(ExportFormat::Csv)?,
        OutputFormat::Json => table.export_to_string(ExportFormat::PrettyJson)?,
    })
}

/// Latest selected period of a comparison, one column per carrier.
fn render_compare_snapshot(
    table: &ComparisonTable,
    query: &QueryArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let report = ComparisonReport::new(table).compare(!query.no_compare);
    render_snapshot(table, &report, query.format)
}

fn render_latest(
    table: &ComparisonTable,
    query: &QueryArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let report = ComparisonReport::new(table)
        .title("Latest Results")
        .placeholder(NOT_YET_REPORTED)
        .compare(!query.no_compare);
    render_snapshot(table, &report, query.format)
}

fn render_snapshot(
    table: &ComparisonTable,
    report: &ComparisonReport<'_>,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let Some(period) = table.latest_period() else {
        return Ok("No periods matched the selection.\n".to_string());
    };
    let rows: Vec<RowRecord> = table
        .snapshot(period)
        .into_iter()
        .map(RowRecord::from)
        .collect();
    Ok(match format {
        OutputFormat::Text => report.snapshot_ascii(period),
        OutputFormat::Markdown => report.snapshot_markdown(period),
        OutputFormat::Csv => rows.export_to_string(ExportFormat::Csv)?,
        OutputFormat::Json => rows.export_to_string(ExportFormat::PrettyJson)?,
    })
}

fn emit(content: &str, output: Option<&PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn list_metrics(group: Option<MetricGroup>) {
    let members = group.and_then(|g| g.members());

    println!("Metrics");
    println!("=======\n");

    for info in available_metrics() {
        if members.is_some_and(|m| !m.contains(&info.metric)) {
            continue;
        }
        let kind = if info.formula.is_some() {
            "derived"
        } else {
            "reported"
        };
        println!("{:<20} {:<9} {}", info.name, kind, info.description);
    }
}

fn list_airlines() {
    let fleet = UsCarriers::new();

    println!("Covered carriers: {}\n", fleet.size());
    for carrier in fleet.carriers() {
        println!(
            "  {:<4} {:<32} CIK {:<7} {}",
            carrier.code, carrier.name, carrier.cik, carrier.investor_relations
        );
    }
}

async fn show_filings(
    config: &Config,
    airlines: &str,
    year: i32,
    period: Quarter,
) -> Result<(), Box<dyn std::error::Error>> {
    let requests: Vec<InsightRequest> = airlines
        .split(',')
        .filter(|code| !code.trim().is_empty())
        .map(|code| InsightRequest::new(code, year, period))
        .collect();
    if requests.is_empty() {
        return Err("No carriers given".into());
    }

    let client = EdgarClient::with_config(config.edgar.clone())?;
    let digest = UsCarriers::new().filing_digest(client);

    let pb = filings::progress_bar(requests.len());
    pb.set_message("Fetching SEC filings...");
    let results =
        filings::collect_insights(&digest, requests, config.concurrency, Some(&pb)).await;
    pb.finish_and_clear();

    for (request, text) in results {
        println!("{}", "=".repeat(80));
        println!("{request}");
        println!("{}", "-".repeat(80));
        println!("{}", text.trim_end());
    }
    println!("{}", "=".repeat(80));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contrail_metrics::{Dataset, Observation};

    fn query(airlines: &[&str], base: Option<&str>) -> QueryArgs {
        QueryArgs {
            partition: PartitionArg::Quarterly,
            airlines: airlines.iter().map(|a| a.to_string()).collect(),
            base: base.map(str::to_string),
            format: OutputFormat::Text,
            no_rescale: false,
            no_compare: false,
            output: None,
        }
    }

    fn data() -> PartitionData {
        let mut observations = Vec::new();
        for carrier in ["AAL", "DAL", "UAL"] {
            for quarter in [Quarter::Q1, Quarter::Q2] {
                observations.push(
                    Observation::new(carrier, 2023, quarter)
                        .with(Metric::TotalRevenue, 12.0e9)
                        .with(Metric::NetIncome, 0.5e9),
                );
            }
        }
        let dataset = Dataset::new(observations).unwrap();
        MetricDeriver::new()
            .derive(&dataset)
            .partition(Partition::Quarterly)
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "contrail",
            "compare",
            "--partition",
            "q",
            "--airlines",
            "aal,dal",
            "--quarters",
            "1,Q2",
            "--metrics",
            "Net Margin,Total Revenue",
        ])
        .unwrap();
        let Commands::Compare {
            query,
            quarters,
            metrics,
            ..
        } = cli.command
        else {
            panic!("expected compare");
        };
        assert_eq!(query.airlines, ["aal", "dal"]);
        assert_eq!(quarters, [Quarter::Q1, Quarter::Q2]);
        assert_eq!(metrics, [Metric::NetMargin, Metric::TotalRevenue]);
    }

    #[test]
    fn test_filings_arguments() {
        let cli = Cli::try_parse_from(["contrail", "filings", "AAL,UAL", "2023", "FY"]).unwrap();
        let Commands::Filings {
            airlines,
            year,
            period,
        } = cli.command
        else {
            panic!("expected filings");
        };
        assert_eq!(airlines, "AAL,UAL");
        assert_eq!(year, 2023);
        assert_eq!(period, Quarter::FullYear);
    }

    #[test]
    fn test_metrics_conflict_with_group() {
        let result = Cli::try_parse_from([
            "contrail",
            "compare",
            "--metrics",
            "Net Margin",
            "--group",
            "earnings",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_base_resolution() {
        let entities = vec!["DAL".to_string(), "UAL".to_string()];
        let config = Config {
            base: Some("ual".to_string()),
            ..Config::default()
        };

        assert_eq!(
            resolve_base(&config, &query(&[], Some("dal")), &entities).as_deref(),
            Some("DAL")
        );
        assert_eq!(
            resolve_base(&config, &query(&[], None), &entities).as_deref(),
            Some("UAL")
        );
        // A configured base outside the comparison falls back to the first carrier
        let config = Config {
            base: Some("AAL".to_string()),
            ..Config::default()
        };
        assert_eq!(
            resolve_base(&config, &query(&[], None), &entities).as_deref(),
            Some("DAL")
        );
    }

    #[test]
    fn test_empty_selection_means_all() {
        let data = data();
        let selection = resolve_selection(
            &Config::default(),
            &data,
            &query(&[], None),
            vec![],
            vec![],
            vec![],
            None,
        )
        .unwrap();

        assert_eq!(selection.entities(), ["AAL", "DAL", "UAL"]);
        assert_eq!(selection.base(), "AAL");
        assert_eq!(selection.quarters().len(), 2);
        assert!(selection.metrics().contains(&Metric::NetMargin));
        assert!(selection.rescale());
    }

    #[test]
    fn test_compare_snapshot_uses_latest_selected_period() {
        let cli = Cli::try_parse_from([
            "contrail",
            "compare",
            "--partition",
            "q",
            "--quarters",
            "1",
            "--snapshot",
        ])
        .unwrap();
        let Commands::Compare {
            query,
            quarters,
            snapshot,
            ..
        } = cli.command
        else {
            panic!("expected compare");
        };
        assert!(snapshot);

        let data = data();
        let selection = resolve_selection(
            &Config::default(),
            &data,
            &query,
            vec![],
            quarters,
            vec![Metric::NetMargin],
            None,
        )
        .unwrap();
        let table = align(&data, &selection).unwrap();

        let text = render_compare_snapshot(&table, &query).unwrap();
        assert!(text.contains("Airline Comparison vs AAL (2023Q1)"));
        assert!(!text.contains("2023Q2"));

        let mut args = query;
        args.format = OutputFormat::Markdown;
        let text = render_compare_snapshot(&table, &args).unwrap();
        assert!(text.starts_with("# Summary of 2023Q1 Metrics"));

        args.format = OutputFormat::Csv;
        let csv = render_compare_snapshot(&table, &args).unwrap();
        // Header plus one record per carrier
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.lines().skip(1).all(|line| line.starts_with("2023Q1,")));
    }

    #[test]
    fn test_latest_for_subset() {
        let data = data();
        let mut args = query(&["ual", "dal"], None);
        args.no_rescale = true;
        let selection = resolve_latest(&Config::default(), &data, &args).unwrap();

        assert_eq!(selection.entities(), ["UAL", "DAL"]);
        assert_eq!(selection.base(), "UAL");
        assert!(selection.quarters().contains(&Quarter::Q2));
        assert!(!selection.rescale());

        let table = align(&data, &selection).unwrap();
        let text = render_latest(&table, &args).unwrap();
        assert!(text.contains("Latest Results (2023Q2)"));
    }
}
