//! Generates randomized simulation input files.

use clap::Clap;
use itertools::iproduct;
use rand_chacha::{rand_core::SeedableRng, ChaChaRng};
use rand_distr::{Distribution, Exp, Uniform};

use dessim::{Config, Costs, InventoryConfig, Lag, Policy, QueueingConfig, StreamId};

const DEFAULT_MAX_EVENTS: u64 = 10_000_000;

#[derive(strum::EnumString)]
#[strum(serialize_all = "lowercase")]
enum System {
    Queueing,
    Inventory,
}

/// Generates input for the next-event simulations and prints it to the
/// standard output as JSON.
#[derive(Clap)]
#[clap(version, author)]
struct Opts {
    /// System to generate a configuration for.
    #[clap(short, long, possible_values = &["queueing", "inventory"])]
    system: System,

    /// Seed to use for random number generator.
    #[clap(long)]
    seed: Option<u64>,

    /// Number of customers to delay in the queueing system.
    #[clap(long, default_value = "1000")]
    target_delays: u64,

    /// Number of demand sizes in the generated distribution.
    #[clap(long, default_value = "4")]
    demand_sizes: usize,

    /// Length of the inventory simulation in months.
    #[clap(long, default_value = "120")]
    months: u32,
}

fn queueing_config(opts: &Opts, rng: &mut ChaChaRng) -> QueueingConfig {
    let interarrival_mean = Uniform::new(0.5, 2.0).sample(rng);
    // Keep the queue stable: the service rate stays above the arrival rate.
    let service_mean = interarrival_mean * Uniform::new(0.3, 0.9).sample(rng);
    QueueingConfig {
        interarrival_mean,
        service_mean,
        target_delays: opts.target_delays,
        capacity: None,
        arrival_stream: StreamId::from(1),
        service_stream: StreamId::from(2),
        rounding_decimals: None,
        max_events: DEFAULT_MAX_EVENTS,
    }
}

fn inventory_config(opts: &Opts, rng: &mut ChaChaRng) -> eyre::Result<InventoryConfig> {
    let weight_distr = Exp::new(1.0).map_err(|_| eyre::eyre!("invalid weight distribution"))?;
    let weights: Vec<f64> = (0..opts.demand_sizes.max(1))
        .map(|_| weight_distr.sample(rng))
        .collect();
    let total: f64 = weights.iter().sum();
    let mut accumulated = 0.0;
    let mut demand_cdf: Vec<f64> = weights
        .iter()
        .map(|weight| {
            accumulated += weight / total;
            accumulated
        })
        .collect();
    // Normalization leaves the last entry within rounding error of 1; pin it.
    *demand_cdf.last_mut().expect("at least one demand size") = 1.0;
    let min_lag = Uniform::new(0.25, 0.75).sample(rng);
    let policies = iproduct!(vec![20, 40, 60], vec![40, 60, 80, 100])
        .filter(|(small_s, big_s)| small_s < big_s)
        .map(|(small_s, big_s)| Policy { small_s, big_s })
        .collect();
    Ok(InventoryConfig {
        initial_level: 60,
        horizon_months: opts.months,
        policies,
        demand_cdf,
        interdemand_mean: Uniform::new(0.05, 0.25).sample(rng),
        costs: Costs {
            setup: 32.0,
            per_unit: 3.0,
            holding: 1.0,
            shortage: 5.0,
        },
        lag: Lag {
            min: min_lag,
            max: min_lag + Uniform::new(0.25, 0.5).sample(rng),
        },
        interdemand_stream: StreamId::from(1),
        demand_stream: StreamId::from(2),
        lag_stream: StreamId::from(3),
        rounding_decimals: None,
        max_events: DEFAULT_MAX_EVENTS,
    })
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let opts: Opts = Opts::parse();

    let mut rng = opts
        .seed
        .map_or_else(ChaChaRng::from_entropy, ChaChaRng::seed_from_u64);

    let config = match opts.system {
        System::Queueing => Config::Queueing(queueing_config(&opts, &mut rng)),
        System::Inventory => Config::Inventory(inventory_config(&opts, &mut rng)?),
    };

    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &config)?;
    println!();

    Ok(())
}
