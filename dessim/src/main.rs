//! Next-event simulation application.
#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::default_trait_access)]

use std::fs::File;
use std::path::PathBuf;

use clap::Clap;
use eyre::WrapErr;
use itertools::Itertools;

use dessim::{
    sweep, Config, CsvSink, InventoryConfig, MultiStream, NullSink, PolicyReport,
    QueueingConfig, QueueingReport, QueueingSystem,
};

/// Output format of the reports.
#[derive(strum::EnumString, strum::ToString)]
#[strum(serialize_all = "lowercase")]
enum Format {
    /// Fixed-width text with the input parameters echoed back.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Runs next-event simulations: a single-server queueing system or a
/// single-product inventory system, depending on the configuration.
#[derive(Clap)]
#[clap(version, author)]
struct Opt {
    /// Path to the JSON simulation configuration.
    #[clap(long)]
    config: PathBuf,

    /// Write a CSV trace of fired events to this file.
    #[clap(long)]
    trace: Option<PathBuf>,

    /// Output format.
    #[clap(short, long, possible_values = &["text", "json"], default_value = "text")]
    format: Format,

    /// Verbosity.
    #[clap(short, long, parse(from_occurrences))]
    verbose: i32,

    /// Store the logs in this file.
    #[clap(long)]
    log_output: Option<PathBuf>,

    /// Do not log to the stderr.
    #[clap(long)]
    no_stderr: bool,
}

/// Set up a logger based on the given user options.
fn set_up_logger(opt: &Opt) -> Result<(), fern::InitError> {
    let log_level = match opt.verbose {
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        3 => log::LevelFilter::Trace,
        _ => log::LevelFilter::Warn,
    };
    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
        .level(log_level);
    let dispatch = if let Some(path) = &opt.log_output {
        let _ = std::fs::remove_file(path);
        dispatch.chain(
            std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .append(false)
                .open(path)?,
        )
    } else {
        dispatch
    };
    let dispatch = if opt.no_stderr {
        dispatch
    } else {
        dispatch.chain(std::io::stderr())
    };
    dispatch.apply()?;
    Ok(())
}

fn run_queueing(
    opt: &Opt,
    config: &QueueingConfig,
    streams: &mut MultiStream,
) -> eyre::Result<QueueingReport> {
    let system = QueueingSystem::new(config)?;
    if let Some(path) = &opt.trace {
        let file = File::create(path)
            .wrap_err_with(|| format!("unable to create trace file: {}", path.display()))?;
        let mut sink = CsvSink::new(file)?;
        let report = system.run(streams, &mut sink)?;
        sink.into_inner()
            .map_err(|error| eyre::eyre!("unable to flush trace file: {}", error))?;
        Ok(report)
    } else {
        Ok(system.run(streams, &mut NullSink)?)
    }
}

fn run_inventory(
    opt: &Opt,
    config: &InventoryConfig,
    streams: &mut MultiStream,
) -> eyre::Result<Vec<PolicyReport>> {
    if let Some(path) = &opt.trace {
        let file = File::create(path)
            .wrap_err_with(|| format!("unable to create trace file: {}", path.display()))?;
        let mut sink = CsvSink::new(file)?;
        let reports = sweep(config, streams, &mut sink)?;
        sink.into_inner()
            .map_err(|error| eyre::eyre!("unable to flush trace file: {}", error))?;
        Ok(reports)
    } else {
        Ok(sweep(config, streams, &mut NullSink)?)
    }
}

fn print_queueing(config: &QueueingConfig, report: &QueueingReport) {
    println!("----Single-Server Queueing System----\n");
    println!(
        "Mean inter-arrival time: {:.6} minutes",
        config.interarrival_mean
    );
    println!("Mean service time: {:.6} minutes", config.service_mean);
    println!("Number of customers: {}\n", config.target_delays);
    println!("{}", report);
}

fn print_inventory(config: &InventoryConfig, reports: &[PolicyReport]) {
    println!("------Single-Product Inventory System------\n");
    println!("Initial inventory level: {} items", config.initial_level);
    println!("Number of demand sizes: {}", config.demand_cdf.len());
    println!(
        "Distribution function of demand sizes: {}",
        config
            .demand_cdf
            .iter()
            .format_with(" ", |probability, f| f(&format_args!("{:.2}", probability))),
    );
    println!("Mean inter-demand time: {:.2} months", config.interdemand_mean);
    println!(
        "Delivery lag range: {:.2} to {:.2} months",
        config.lag.min, config.lag.max
    );
    println!("Length of simulation: {} months", config.horizon_months);
    println!(
        "Costs: K = {:.2}, i = {:.2}, h = {:.2}, pi = {:.2}",
        config.costs.setup, config.costs.per_unit, config.costs.holding, config.costs.shortage
    );
    println!("Number of policies: {}\n", config.policies.len());
    println!("{}", PolicyReport::table_header());
    println!("{}", reports.iter().format("\n"));
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let opt = Opt::parse();
    set_up_logger(&opt)?;
    let file = File::open(&opt.config)
        .wrap_err_with(|| format!("unable to open config file: {}", opt.config.display()))?;
    let config: Config =
        serde_json::from_reader(file).wrap_err("unable to parse configuration")?;
    let mut streams = MultiStream::new();
    match config {
        Config::Queueing(config) => {
            let report = run_queueing(&opt, &config, &mut streams)?;
            match opt.format {
                Format::Text => print_queueing(&config, &report),
                Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
        Config::Inventory(config) => {
            let reports = run_inventory(&opt, &config, &mut streams)?;
            match opt.format {
                Format::Text => print_inventory(&config, &reports),
                Format::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            }
        }
    }
    Ok(())
}
