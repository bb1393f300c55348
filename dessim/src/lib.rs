//! Next-event time-advance simulation.
//!
//! The crate implements a small deterministic discrete-event core: a
//! multi-stream pseudorandom generator with bit-exact reproducibility, a
//! variate library, a fixed-slot event calendar with its clock, and
//! time-weighted statistics accumulators. The core is instantiated by two
//! systems: a single-server queueing delay system and a periodic-review
//! `(s, S)` inventory system evaluated over a list of reorder policies.
//!
//! # Running a simulation
//!
//! A simulation is constructed from a [`Config`], typically parsed from a
//! JSON file, and driven against a [`MultiStream`] generator and a trace
//! sink:
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use dessim::{Config, MultiStream, NullSink, QueueingSystem};
//!
//! let config = r#"{
//!     "system": "queueing",
//!     "interarrival_mean": 1.0,
//!     "service_mean": 0.5,
//!     "target_delays": 100
//! }"#;
//! let mut streams = MultiStream::new();
//! if let Config::Queueing(config) = serde_json::from_str(config)? {
//!     let report = QueueingSystem::new(&config)?.run(&mut streams, &mut NullSink)?;
//!     assert_eq!(report.customers_delayed, 100);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::default_trait_access,
    clippy::inline_always
)]

mod calendar;
pub use calendar::{Calendar, EventKind, UNSCHEDULED};

mod config;
pub use config::Config;

mod error;
pub use error::{ConfigError, Error};

mod inventory;
pub use inventory::{
    sweep, Costs, InventoryConfig, InventoryEvent, InventorySystem, Lag, Policy,
};

mod queue;
pub use queue::BoundedFifo;

mod queueing;
pub use queueing::{QueueingConfig, QueueingEvent, QueueingSystem};

mod report;
pub use report::{PolicyReport, QueueingReport};

mod rng;
pub use rng::{MultiStream, StreamId, UnitSource, STREAM_COUNT};

mod stats;
pub use stats::{SignSplit, TimeWeighted};

mod trace;
pub use trace::{CsvSink, MemorySink, NullSink, TraceRecord, TraceSink};

mod variate;
pub use variate::{DiscreteCdf, Exponential, Rounding, Uniform};
