//! Player Value — builds the data behind the player value dashboards.
//!
//! Every subcommand writes a renderer-ready document to stdout; logs go to
//! stderr.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use playervalue_core::{AppConfig, PlayerValueError, Record};
use playervalue_reporting::source::write_records;
use playervalue_reporting::synthetic::{retention_sankey, simulate_population, transition_sankey};
use playervalue_reporting::{aggregate, AreaChart, CsvSource, MonthBucket, SegmentTable};
use playervalue_segmentation::SegmentSelection;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "player-value")]
#[command(about = "Player value segment timelines and flow diagrams")]
#[command(version)]
struct Cli {
    /// TOML config file (default: player-value.toml)
    #[arg(long, env = "PLAYER_VALUE_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count players per segment for every month
    Timeline {
        /// Player value CSV (overrides config)
        #[arg(short, long)]
        input: Option<String>,

        /// Use a simulated population instead of a CSV
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Synthetic segment → churned/retained/reactivated Sankey diagram
    Retention {
        /// Random seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Synthetic segment-to-segment transition Sankey diagram
    Transitions {
        /// Comma-separated source segments (overrides config)
        #[arg(long)]
        source: Option<String>,

        /// Comma-separated target segments (overrides config)
        #[arg(long)]
        target: Option<String>,

        /// Random seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write a simulated player value CSV
    Simulate {
        /// Output CSV path
        #[arg(short, long)]
        output: String,

        /// Number of players (overrides config)
        #[arg(long)]
        players: Option<usize>,

        /// Number of months (overrides config)
        #[arg(long)]
        months: Option<u32>,

        /// First month, YYYY-MM (overrides config)
        #[arg(long)]
        start: Option<String>,

        /// Random seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// Month-by-segment table as CSV
    Csv,
    /// Month-by-segment table as a JSON array
    Json,
    /// Area chart document
    Chart,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "player_value=info,playervalue_reporting=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // A file named on the command line (or via PLAYER_VALUE_CONFIG) must
    // load; only the implicit default file may fall back.
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config file {path}"))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        }),
    };

    match cli.command {
        Commands::Timeline {
            input,
            synthetic,
            format,
        } => {
            if let Some(path) = input {
                config.input.path = path;
            }
            let records = if synthetic {
                simulated_records(&config)?
            } else {
                let source = CsvSource::from_config(&config.input);
                source
                    .load()
                    .with_context(|| format!("loading player values from {}", source.path().display()))?
            };

            let rows = aggregate(&records)?;
            info!(records = records.len(), months = rows.len(), "Timeline ready");

            let output = match format {
                OutputFormat::Csv => SegmentTable::from_rows(&rows).export_csv()?,
                OutputFormat::Json => SegmentTable::from_rows(&rows).export_json()?,
                OutputFormat::Chart => serde_json::to_string_pretty(&AreaChart::from_rows(&rows))?,
            };
            print_document(&output);
        }
        Commands::Retention { seed } => {
            let seed = seed.unwrap_or(config.synthetic.seed);
            let diagram = retention_sankey(seed);
            info!(
                seed,
                links = diagram.links.len(),
                total_flow = diagram.total_flow(),
                "Synthetic retention flow ready"
            );
            print_document(&serde_json::to_string_pretty(&diagram)?);
        }
        Commands::Transitions {
            source,
            target,
            seed,
        } => {
            let sources = SegmentSelection::parse(
                "source",
                source.as_deref().unwrap_or(&config.flows.source_segments),
            )?;
            let targets = SegmentSelection::parse(
                "target",
                target.as_deref().unwrap_or(&config.flows.target_segments),
            )?;
            let seed = seed.unwrap_or(config.synthetic.seed);

            let diagram = transition_sankey(seed, &sources, &targets);
            info!(
                seed,
                sources = sources.len(),
                targets = targets.len(),
                links = diagram.links.len(),
                total_flow = diagram.total_flow(),
                "Synthetic transition flow ready"
            );
            print_document(&serde_json::to_string_pretty(&diagram)?);
        }
        Commands::Simulate {
            output,
            players,
            months,
            start,
            seed,
        } => {
            if let Some(players) = players {
                config.synthetic.players = players;
            }
            if let Some(months) = months {
                config.synthetic.months = months;
            }
            if let Some(start) = start {
                config.synthetic.start_month = start;
            }
            if let Some(seed) = seed {
                config.synthetic.seed = seed;
            }
            let records = simulated_records(&config)?;
            write_records(&output, &records)?;
        }
    }

    Ok(())
}

fn simulated_records(config: &AppConfig) -> Result<Vec<Record>, PlayerValueError> {
    let synthetic = &config.synthetic;
    let start = MonthBucket::parse(&synthetic.start_month).ok_or_else(|| {
        PlayerValueError::Config(format!(
            "synthetic.start_month {:?} is not a calendar month",
            synthetic.start_month
        ))
    })?;
    if synthetic
        .players
        .checked_mul(synthetic.months as usize)
        .is_none()
    {
        return Err(PlayerValueError::Config(format!(
            "{} players over {} months is too many records",
            synthetic.players, synthetic.months
        )));
    }
    info!(
        seed = synthetic.seed,
        players = synthetic.players,
        months = synthetic.months,
        start = %start,
        "Simulating player values"
    );
    Ok(simulate_population(
        synthetic.seed,
        synthetic.players,
        synthetic.months,
        start,
    ))
}

fn print_document(document: &str) {
    if document.ends_with('\n') {
        print!("{document}");
    } else {
        println!("{document}");
    }
}
