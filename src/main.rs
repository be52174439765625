//! CLI entry point for the traffic volume predictor.
//!
//! Fits a Bayesian network on historical counts for one segment and compares
//! its hourly predictions with the evaluation years, or dumps the learned
//! CPDs.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use traffic_volume_predictor::config::{DEFAULT_INPUT, PipelineConfig};
use traffic_volume_predictor::output::{
    CsvExport, TextChart, print_cpds, print_json, print_pretty, render_report,
};
use traffic_volume_predictor::parser::load_table;
use traffic_volume_predictor::pipeline::split::DateRange;
use traffic_volume_predictor::run::{fit, run_file};

#[derive(Parser)]
#[command(name = "traffic_volume_predictor")]
#[command(about = "Predict hourly traffic volume categories from NYC traffic counts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit on the training years and compare predictions with the evaluation years
    Evaluate {
        #[command(flatten)]
        data: DataArgs,

        /// Evaluation range start (inclusive, YYYY-MM-DD)
        #[arg(long, default_value = "2017-01-01")]
        eval_start: NaiveDate,

        /// Evaluation range end (exclusive, YYYY-MM-DD)
        #[arg(long, default_value = "2019-01-01")]
        eval_end: NaiveDate,

        /// Optional: CSV file to append per-hour comparisons to
        #[arg(long)]
        export: Option<String>,

        /// Also log the full report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Fit on the training years and print the learned CPDs
    Cpds {
        #[command(flatten)]
        data: DataArgs,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Path to the traffic volume counts CSV
    #[arg(value_name = "FILE", default_value = DEFAULT_INPUT)]
    input: String,

    /// Segment to fit the model for
    #[arg(short, long)]
    segment: Option<String>,

    /// Training range start (inclusive, YYYY-MM-DD)
    #[arg(long, default_value = "2012-01-01")]
    train_start: NaiveDate,

    /// Training range end (exclusive, YYYY-MM-DD)
    #[arg(long, default_value = "2017-01-01")]
    train_end: NaiveDate,

    /// BDeu equivalent sample size
    #[arg(long)]
    ess: Option<f64>,
}

impl DataArgs {
    fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig {
            training: DateRange::new(self.train_start, self.train_end),
            ..PipelineConfig::default()
        };
        if let Some(segment) = &self.segment {
            config.segment_id = segment.clone();
        }
        if let Some(ess) = self.ess {
            config.equivalent_sample_size = ess;
        }
        config
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/traffic_volume_predictor.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("traffic_volume_predictor.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            data,
            eval_start,
            eval_end,
            export,
            json,
        } => {
            let mut config = data.config();
            config.evaluation = DateRange::new(eval_start, eval_end);

            let run = run_file(&data.input, &config)?;

            render_report(&run.report, &mut TextChart)?;
            if let Some(path) = export {
                render_report(&run.report, &mut CsvExport { path: path.clone() })?;
                info!(path = %path, "Exported comparisons");
            }

            print_pretty(&run.report);
            if json {
                print_json(&run.report)?;
            }
        }
        Commands::Cpds { data } => {
            let config = data.config();
            let table = load_table(&data.input, &config.interval_labels, &config.segment_id)?;
            let (_, model) = fit(table, &config)?;

            info!("Learned CPDs:");
            print_cpds(&model.cpds());
        }
    }

    Ok(())
}
