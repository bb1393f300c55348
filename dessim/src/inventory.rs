//! Single-product periodic-review inventory system.
//!
//! Demands of random size arrive with exponential inter-demand times and
//! draw the inventory level down; the level is reviewed at every whole
//! month, and when it has fallen below the reorder point `s`, an order
//! bringing it back up to `S` is placed and delivered after a uniformly
//! distributed lag. Each run ends at the configured horizon; the sweep
//! repeats the run for every configured `(s, S)` policy against the same
//! stream generator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calendar::{Calendar, EventKind};
use crate::error::{ConfigError, Error};
use crate::queueing::default_max_events;
use crate::report::PolicyReport;
use crate::rng::{StreamId, UnitSource};
use crate::stats::SignSplit;
use crate::trace::{TraceRecord, TraceSink};
use crate::variate::{DiscreteCdf, Exponential, Rounding, Uniform};

/// Events driving the inventory system, in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum InventoryEvent {
    /// An outstanding order is delivered.
    OrderArrival,
    /// A demand draws the inventory level down.
    Demand,
    /// The periodic review of the inventory level.
    Evaluate,
    /// The end of the simulated horizon.
    End,
}

impl EventKind for InventoryEvent {
    fn all() -> &'static [Self] {
        &[Self::OrderArrival, Self::Demand, Self::Evaluate, Self::End]
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// A periodic-review reorder policy: order up to `S` whenever the level has
/// fallen below `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// The reorder point `s`.
    pub small_s: i64,
    /// The order-up-to level `S`.
    pub big_s: i64,
}

impl Policy {
    fn validate(self) -> Result<Self, ConfigError> {
        if self.small_s > self.big_s {
            Err(ConfigError::PolicyOrder {
                small_s: self.small_s,
                big_s: self.big_s,
            })
        } else {
            Ok(self)
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:2},{:4})", self.small_s, self.big_s)
    }
}

/// Cost coefficients of the inventory system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Costs {
    /// Fixed cost of placing an order.
    pub setup: f64,
    /// Cost of each ordered unit.
    pub per_unit: f64,
    /// Cost of holding one unit for one month.
    pub holding: f64,
    /// Cost of one backordered unit for one month.
    pub shortage: f64,
}

impl Costs {
    fn validate(self) -> Result<Self, ConfigError> {
        for &(name, value) in &[
            ("setup cost", self.setup),
            ("per-unit cost", self.per_unit),
            ("holding cost", self.holding),
            ("shortage cost", self.shortage),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        Ok(self)
    }
}

/// Uniform delivery lag range, in months.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lag {
    /// Shortest possible lag.
    pub min: f64,
    /// Longest possible lag.
    pub max: f64,
}

fn default_interdemand_stream() -> StreamId {
    StreamId::from(1)
}

fn default_demand_stream() -> StreamId {
    StreamId::from(2)
}

fn default_lag_stream() -> StreamId {
    StreamId::from(3)
}

/// Configuration of the inventory system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Inventory level at the start of each run.
    pub initial_level: i64,
    /// Length of each run, in months.
    pub horizon_months: u32,
    /// Policies to evaluate, in order.
    pub policies: Vec<Policy>,
    /// Ascending cumulative probabilities of demand sizes `1..=n`.
    pub demand_cdf: Vec<f64>,
    /// Mean time between demands, in months.
    pub interdemand_mean: f64,
    /// Cost coefficients.
    pub costs: Costs,
    /// Delivery lag range.
    pub lag: Lag,
    /// Stream feeding inter-demand times.
    #[serde(default = "default_interdemand_stream")]
    pub interdemand_stream: StreamId,
    /// Stream feeding demand sizes.
    #[serde(default = "default_demand_stream")]
    pub demand_stream: StreamId,
    /// Stream feeding delivery lags.
    #[serde(default = "default_lag_stream")]
    pub lag_stream: StreamId,
    /// Decimal digits to round unit draws to before transforming, if any.
    #[serde(default)]
    pub rounding_decimals: Option<u32>,
    /// Safety valve against non-terminating configurations.
    #[serde(default = "default_max_events")]
    pub max_events: u64,
}

/// The inventory system's state, its calendar, and its statistics for one
/// policy run.
pub struct InventorySystem {
    calendar: Calendar<InventoryEvent>,
    policy: Policy,
    horizon: f64,
    max_events: u64,
    level: i64,
    outstanding: i64,
    interdemand: Exponential,
    demand_size: DiscreteCdf,
    lag: Uniform,
    costs: Costs,
    ordering_cost: f64,
    level_areas: SignSplit,
}

impl InventorySystem {
    /// Constructs a system evaluating `policy` from a validated
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first violated constraint.
    pub fn new(config: &InventoryConfig, policy: Policy) -> Result<Self, ConfigError> {
        if config.horizon_months == 0 {
            return Err(ConfigError::ZeroCount {
                name: "horizon_months",
            });
        }
        if config.lag.min < 0.0 {
            return Err(ConfigError::Negative {
                name: "delivery lag",
                value: config.lag.min,
            });
        }
        let rounding = Rounding::from(config.rounding_decimals);
        Ok(Self {
            calendar: Calendar::new(),
            policy: policy.validate()?,
            horizon: f64::from(config.horizon_months),
            max_events: config.max_events,
            level: config.initial_level,
            outstanding: 0,
            interdemand: Exponential::new(
                config.interdemand_mean,
                config.interdemand_stream,
                rounding,
            )?,
            demand_size: DiscreteCdf::new(config.demand_cdf.clone(), config.demand_stream)?,
            lag: Uniform::new(config.lag.min, config.lag.max, config.lag_stream)?,
            costs: config.costs.validate()?,
            ordering_cost: 0.0,
            level_areas: SignSplit::default(),
        })
    }

    /// Runs the system to its horizon and reports the average monthly costs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EventLimitExceeded`] when the configured event
    /// budget runs out before the horizon.
    #[allow(clippy::cast_precision_loss)]
    pub fn run(
        mut self,
        source: &mut impl UnitSource,
        sink: &mut impl TraceSink<InventoryEvent>,
    ) -> Result<PolicyReport, Error> {
        // No order is outstanding at the start, so order arrival is left
        // unscheduled; the first review happens immediately.
        self.calendar
            .schedule(InventoryEvent::Demand, self.interdemand.sample(source));
        self.calendar.schedule(InventoryEvent::Evaluate, 0.0);
        self.calendar.schedule(InventoryEvent::End, self.horizon);
        let mut events = 0;
        loop {
            events += 1;
            if events > self.max_events {
                return Err(Error::EventLimitExceeded(self.max_events));
            }
            let kind = self.calendar.advance()?;
            let clock = self.calendar.clock();
            self.level_areas.observe(self.level as f64, clock);
            sink.record(TraceRecord {
                index: events,
                kind,
                clock,
            });
            match kind {
                InventoryEvent::OrderArrival => self.order_arrival(),
                InventoryEvent::Demand => self.demand(source),
                InventoryEvent::Evaluate => self.evaluate(source),
                InventoryEvent::End => break,
            }
        }
        let avg_ordering_cost = self.ordering_cost / self.horizon;
        let avg_holding_cost = self.costs.holding * self.level_areas.holding_area() / self.horizon;
        let avg_shortage_cost =
            self.costs.shortage * self.level_areas.shortage_area() / self.horizon;
        Ok(PolicyReport {
            policy: self.policy,
            avg_total_cost: avg_ordering_cost + avg_holding_cost + avg_shortage_cost,
            avg_ordering_cost,
            avg_holding_cost,
            avg_shortage_cost,
        })
    }

    fn order_arrival(&mut self) {
        self.level += self.outstanding;
        log::trace!(
            "[{:.6}] order of {} delivered, level {}",
            self.calendar.clock(),
            self.outstanding,
            self.level,
        );
        self.outstanding = 0;
        self.calendar.cancel(InventoryEvent::OrderArrival);
    }

    #[allow(clippy::cast_possible_wrap)]
    fn demand(&mut self, source: &mut impl UnitSource) {
        let clock = self.calendar.clock();
        let size = self.demand_size.sample(source) as i64 + 1;
        self.level -= size;
        log::trace!("[{:.6}] demand of {}, level {}", clock, size, self.level);
        self.calendar
            .schedule(InventoryEvent::Demand, clock + self.interdemand.sample(source));
    }

    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&mut self, source: &mut impl UnitSource) {
        let clock = self.calendar.clock();
        if self.level < self.policy.small_s {
            self.outstanding = self.policy.big_s - self.level;
            self.ordering_cost +=
                self.costs.setup + self.costs.per_unit * self.outstanding as f64;
            self.calendar
                .schedule(InventoryEvent::OrderArrival, clock + self.lag.sample(source));
            log::debug!(
                "[{:.6}] level {} below {}, ordered {}",
                clock,
                self.level,
                self.policy.small_s,
                self.outstanding,
            );
        }
        // The next review happens in a month regardless of the decision.
        self.calendar.schedule(InventoryEvent::Evaluate, clock + 1.0);
    }
}

/// Evaluates every configured policy in order against the same stream
/// generator, resetting all other state between runs.
///
/// # Errors
///
/// Returns a [`ConfigError`] for an invalid configuration, or the first
/// run-time [`Error`] encountered; reports of preceding policies are
/// discarded in that case.
pub fn sweep(
    config: &InventoryConfig,
    source: &mut impl UnitSource,
    sink: &mut impl TraceSink<InventoryEvent>,
) -> Result<Vec<PolicyReport>, Error> {
    if config.policies.is_empty() {
        return Err(ConfigError::ZeroCount { name: "policies" }.into());
    }
    // Reject the whole sweep before the first run rather than in the middle.
    for &policy in &config.policies {
        policy.validate()?;
    }
    config
        .policies
        .iter()
        .map(|&policy| InventorySystem::new(config, policy)?.run(source, sink))
        .collect()
}
