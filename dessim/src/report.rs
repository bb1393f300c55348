//! Summary statistics emitted by finished runs.
//!
//! Only runs that reach their stopping event produce a report. The exact
//! text rendering lives with the binary; the `Display` implementations here
//! provide the canonical fixed-width forms.

use std::fmt;

use serde::Serialize;

use crate::inventory::Policy;

/// Statistics of one queueing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueingReport {
    /// Average time a delayed customer spent waiting.
    pub mean_delay: f64,
    /// Time-average number of waiting customers.
    pub mean_queue_length: f64,
    /// Fraction of the run the server was busy.
    pub utilization: f64,
    /// Simulation time at which the delay target was reached.
    pub end_time: f64,
    /// Number of customers delayed, equal to the configured target.
    pub customers_delayed: u64,
    /// Number of arrivals processed.
    pub arrivals: u64,
    /// Number of departures processed.
    pub departures: u64,
}

impl fmt::Display for QueueingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average delay in queue: {:.6}", self.mean_delay)?;
        writeln!(f, "Average number in queue: {:.6}", self.mean_queue_length)?;
        writeln!(f, "Server utilization: {:.6}", self.utilization)?;
        write!(f, "Time simulation ended: {:.6}", self.end_time)
    }
}

/// Average monthly costs of one inventory policy run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyReport {
    /// The evaluated policy.
    pub policy: Policy,
    /// Sum of the three cost components.
    pub avg_total_cost: f64,
    /// Average monthly ordering cost.
    pub avg_ordering_cost: f64,
    /// Average monthly holding cost.
    pub avg_holding_cost: f64,
    /// Average monthly shortage cost.
    pub avg_shortage_cost: f64,
}

impl PolicyReport {
    /// Header line matching the `Display` row layout.
    #[must_use]
    pub fn table_header() -> &'static str {
        " Policy        Avg_total_cost     Avg_ordering_cost      Avg_holding_cost     Avg_shortage_cost"
    }
}

impl fmt::Display for PolicyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:19.2} {:19.2} {:19.2} {:19.2}",
            self.policy,
            self.avg_total_cost,
            self.avg_ordering_cost,
            self.avg_holding_cost,
            self.avg_shortage_cost,
        )
    }
}
