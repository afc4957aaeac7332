use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use famc_builder::utils::logging::{create_year_progress_bar, finish_progress_bar};
use famc_builder::{FamilyConfig, FamilyPipeline, ParquetStore, RunReport};
use log::info;
use rayon::prelude::*;

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

/// Build the family table of one or more survey years
#[derive(Debug, Parser)]
#[command(name = "famc", version, about)]
struct Cli {
    /// Directory holding one `<table>_<year>.parquet` file per table
    #[arg(long)]
    data_dir: PathBuf,

    /// Survey year to process, repeat for several years
    #[arg(long = "year", required = true)]
    years: Vec<i32>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the run reports as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FamilyConfig::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => FamilyConfig::default(),
    };
    info!("{config}");

    // Fail on an unknown year before touching any table
    for year in &cli.years {
        config.wage_floor(*year)?;
    }

    let threads = num_cpus::get().min(cli.years.len()).max(1);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("configuring the worker pool")?;

    let start = Instant::now();
    let pb = create_year_progress_bar(cli.years.len() as u64);
    let results: Vec<anyhow::Result<RunReport>> = cli
        .years
        .par_iter()
        .map(|&year| {
            let mut store = ParquetStore::open(&cli.data_dir)?;
            let report = FamilyPipeline::new(&config)
                .run(&mut store, year)
                .with_context(|| format!("building families for {year}"))?;
            pb.inc(1);
            Ok(report)
        })
        .collect();
    finish_progress_bar(&pb, Some("done"));

    let reports = results.into_iter().collect::<anyhow::Result<Vec<_>>>()?;
    for report in &reports {
        info!("{report}");
    }
    info!(
        "Processed {} years in {:?}",
        reports.len(),
        start.elapsed()
    );

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&reports)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!("Run report written to {}", path.display());
    }

    Ok(())
}
