//! Error taxonomy of the simulation engine.

/// Raised while validating configuration, always before any run starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A mean, cost, or similar quantity that must be strictly positive is not.
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A quantity that must not be negative is.
    #[error("{name} must not be negative, got {value}")]
    Negative {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A count that must be at least 1 is 0.
    #[error("{name} must be at least 1")]
    ZeroCount {
        /// Name of the offending parameter.
        name: &'static str,
    },

    /// A stream id outside of the generator's table.
    #[error("stream id {0} is out of bounds (valid streams are 1 through 100)")]
    StreamOutOfBounds(usize),

    /// An empty cumulative probability table.
    #[error("cumulative distribution must have at least one entry")]
    EmptyDistribution,

    /// A cumulative probability table entry out of (0, 1] or not ascending.
    #[error("cumulative distribution entry #{index} is invalid: {value}")]
    MalformedDistribution {
        /// Position of the offending entry.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// The last entry of a cumulative probability table is not 1 within tolerance.
    #[error("cumulative distribution must reach 1, got {0}")]
    IncompleteDistribution(f64),

    /// A reorder policy with the reorder point above the order-up-to level.
    #[error("policy ({small_s}, {big_s}) has s > S")]
    PolicyOrder {
        /// Reorder point.
        small_s: i64,
        /// Order-up-to level.
        big_s: i64,
    },

    /// A delivery lag range with the lower bound above the upper bound.
    #[error("delivery lag range is inverted: {min} > {max}")]
    InvertedRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

/// Any way a simulation run can fail.
///
/// A run that fails produces no report: partially accumulated statistics are
/// discarded along with the system state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The configuration was rejected before the run started.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The waiting line grew beyond its configured bound.
    #[error("queue capacity {capacity} exceeded at time {time}")]
    CapacityExceeded {
        /// The configured bound.
        capacity: usize,
        /// Simulation time of the rejected arrival.
        time: f64,
    },

    /// No event kind had a finite scheduled time. Handlers are required to
    /// keep at least one kind scheduled, so this indicates a defect in one
    /// of them.
    #[error("event list exhausted at time {0}")]
    EventListExhausted(f64),

    /// The safety valve against non-terminating configurations.
    #[error("exceeded the maximum of {0} events without reaching the stopping condition")]
    EventLimitExceeded(u64),
}
