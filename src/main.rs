extern crate serde;

mod age_group;
mod chart;
mod config;
mod error;
mod pipeline;
mod records;
mod source;

use std::fs::{self, File};
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use polars::frame::DataFrame;
use polars::prelude::*;
use polars_io::parquet::ParquetWriter;
use reqwest::Client;
use sysinfo::{ProcessExt, System, SystemExt};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use chart::BarChart;
use config::{Args, Config};
use error::PipelineError;

static RAW_DIR: &str = "raw";
static SILVER_DIR: &str = "silver";
static GOLD_DIR: &str = "gold";
static RAW_FILE_NAME: &str = "hypertension.csv";
static SILVER_FILE_NAME: &str = "hypertension.parquet";
static GOLD_FILE_STEM: &str = "hypertension_risk";
static CHART_FILE_NAME: &str = "chart.json";

/// Resident memory of this process in bytes, or 0 when it cannot be read.
fn monitor_memory() -> u64 {
    let Ok(pid) = sysinfo::get_current_pid() else {
        return 0;
    };
    let mut system = System::new();
    system.refresh_process(pid);
    system.process(pid).map(|p| p.memory()).unwrap_or(0)
}

fn stage_dir(output_dir: &Path, stage: &str) -> Result<std::path::PathBuf, PipelineError> {
    let dir = output_dir.join(stage);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn write_csv<P: AsRef<Path>>(path: P, df: &mut DataFrame) -> Result<(), PipelineError> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(df)?;
    Ok(())
}

pub fn write_parquet<P: AsRef<Path>>(path: P, df: &mut DataFrame) -> Result<(), PipelineError> {
    let file = File::create(path)?;
    ParquetWriter::new(file).finish(df)?;
    Ok(())
}

async fn run(config: Config) -> Result<(), PipelineError> {
    let client = Client::new();
    let dataset = source::load_dataset(&client, &config.source).await?;

    if let Some(output_dir) = &config.output_dir {
        let path = stage_dir(output_dir, RAW_DIR)?.join(RAW_FILE_NAME);
        tokio::fs::write(&path, &dataset.raw).await?;
        info!("raw layer written to {}", path.display());
    }

    let records = pipeline::filter_by_age_groups(&dataset.records, &config.groups);
    if !config.groups.is_empty() {
        info!(
            "{} of {} records fall in the selected age groups",
            records.len(),
            dataset.records.len()
        );
    }
    if records.is_empty() {
        warn!("no records to aggregate");
    }

    info!("aggregating risk by sex and age group");
    let rows = pipeline::aggregate(&records)?;
    let mut gold = pipeline::rows_to_frame(&rows)?;
    debug!("gold shape: {:?}", gold.shape());

    println!("{}", gold);

    if let Some(output_dir) = &config.output_dir {
        let mut silver = pipeline::classify(&records)?;
        let path = stage_dir(output_dir, SILVER_DIR)?.join(SILVER_FILE_NAME);
        write_parquet(&path, &mut silver)?;
        info!("silver layer written to {}", path.display());

        let gold_dir = stage_dir(output_dir, GOLD_DIR)?;
        write_csv(gold_dir.join(format!("{}.csv", GOLD_FILE_STEM)), &mut gold)?;
        write_parquet(gold_dir.join(format!("{}.parquet", GOLD_FILE_STEM)), &mut gold)?;

        let chart = BarChart::from_rows(&rows);
        tokio::fs::write(gold_dir.join(CHART_FILE_NAME), chart.to_json()?).await?;
        info!("gold layer written to {}", gold_dir.display());
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder().with_env_filter(env).init();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!("arguments: {:?}", args);

    let start_time = Instant::now();
    let start_memory = monitor_memory();

    let config = Config::from(args);
    info!("CSV source: {}", config.source);

    if let Err(e) = run(config).await {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }

    let end_memory = monitor_memory();
    info!("time elapsed: {:?}", start_time.elapsed());
    info!("memory used: {} bytes", end_memory.saturating_sub(start_memory));
}
