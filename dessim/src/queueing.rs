//! Single-server queueing system.
//!
//! Customers arrive with exponential inter-arrival times, wait in a bounded
//! FIFO while the server is busy, and are served with exponential service
//! times. The run stops once the configured number of customers have been
//! delayed (a customer served on arrival counts as delayed with zero wait).

use serde::{Deserialize, Serialize};

use crate::calendar::{Calendar, EventKind};
use crate::error::{ConfigError, Error};
use crate::queue::BoundedFifo;
use crate::report::QueueingReport;
use crate::rng::{StreamId, UnitSource};
use crate::stats::TimeWeighted;
use crate::trace::{TraceRecord, TraceSink};
use crate::variate::{Exponential, Rounding};

/// Events driving the queueing system, in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum QueueingEvent {
    /// A customer arrives.
    Arrival,
    /// The customer in service departs.
    Departure,
}

impl EventKind for QueueingEvent {
    fn all() -> &'static [Self] {
        &[Self::Arrival, Self::Departure]
    }

    fn slot(self) -> usize {
        self as usize
    }
}

fn default_arrival_stream() -> StreamId {
    StreamId::from(1)
}

fn default_service_stream() -> StreamId {
    StreamId::from(2)
}

pub(crate) fn default_max_events() -> u64 {
    10_000_000
}

/// Configuration of the queueing system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueingConfig {
    /// Mean inter-arrival time.
    pub interarrival_mean: f64,
    /// Mean service time.
    pub service_mean: f64,
    /// The run stops once this many customers have been delayed.
    pub target_delays: u64,
    /// Bound on the waiting line; defaults to `target_delays`.
    #[serde(default)]
    pub capacity: Option<usize>,
    /// Stream feeding inter-arrival times.
    #[serde(default = "default_arrival_stream")]
    pub arrival_stream: StreamId,
    /// Stream feeding service times.
    #[serde(default = "default_service_stream")]
    pub service_stream: StreamId,
    /// Decimal digits to round unit draws to before transforming, if any.
    #[serde(default)]
    pub rounding_decimals: Option<u32>,
    /// Safety valve against non-terminating configurations.
    #[serde(default = "default_max_events")]
    pub max_events: u64,
}

impl QueueingConfig {
    #[allow(clippy::cast_possible_truncation)]
    fn capacity(&self) -> usize {
        self.capacity.unwrap_or(self.target_delays as usize)
    }
}

/// The queueing system's state, its calendar, and its statistics.
pub struct QueueingSystem {
    calendar: Calendar<QueueingEvent>,
    interarrival: Exponential,
    service: Exponential,
    target_delays: u64,
    max_events: u64,
    server_busy: bool,
    waiting: BoundedFifo<f64>,
    customers_delayed: u64,
    total_delay: f64,
    arrivals: u64,
    departures: u64,
    queue_length: TimeWeighted,
    server_status: TimeWeighted,
}

impl QueueingSystem {
    /// Constructs a system from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first violated constraint.
    pub fn new(config: &QueueingConfig) -> Result<Self, ConfigError> {
        if config.target_delays == 0 {
            return Err(ConfigError::ZeroCount {
                name: "target_delays",
            });
        }
        let rounding = Rounding::from(config.rounding_decimals);
        Ok(Self {
            calendar: Calendar::new(),
            interarrival: Exponential::new(
                config.interarrival_mean,
                config.arrival_stream,
                rounding,
            )?,
            service: Exponential::new(config.service_mean, config.service_stream, rounding)?,
            target_delays: config.target_delays,
            max_events: config.max_events,
            server_busy: false,
            waiting: BoundedFifo::new(config.capacity()),
            customers_delayed: 0,
            total_delay: 0.0,
            arrivals: 0,
            departures: 0,
            queue_length: TimeWeighted::default(),
            server_status: TimeWeighted::default(),
        })
    }

    /// Runs the system until the delay target is reached and reports its
    /// statistics.
    ///
    /// # Errors
    ///
    /// - [`Error::CapacityExceeded`] when an arrival finds the waiting line
    ///   full.
    /// - [`Error::EventLimitExceeded`] when the configured event budget runs
    ///   out before the delay target is reached.
    #[allow(clippy::cast_precision_loss)]
    pub fn run(
        mut self,
        source: &mut impl UnitSource,
        sink: &mut impl TraceSink<QueueingEvent>,
    ) -> Result<QueueingReport, Error> {
        self.calendar
            .schedule(QueueingEvent::Arrival, self.interarrival.sample(source));
        let mut events = 0;
        while self.customers_delayed < self.target_delays {
            events += 1;
            if events > self.max_events {
                return Err(Error::EventLimitExceeded(self.max_events));
            }
            let kind = self.calendar.advance()?;
            let clock = self.calendar.clock();
            self.queue_length.observe(self.waiting.len() as f64, clock);
            self.server_status
                .observe(if self.server_busy { 1.0 } else { 0.0 }, clock);
            sink.record(TraceRecord {
                index: events,
                kind,
                clock,
            });
            match kind {
                QueueingEvent::Arrival => self.arrive(source)?,
                QueueingEvent::Departure => self.depart(source),
            }
        }
        let clock = self.calendar.clock();
        Ok(QueueingReport {
            mean_delay: self.total_delay / self.customers_delayed as f64,
            mean_queue_length: self.queue_length.area() / clock,
            utilization: self.server_status.area() / clock,
            end_time: clock,
            customers_delayed: self.customers_delayed,
            arrivals: self.arrivals,
            departures: self.departures,
        })
    }

    fn arrive(&mut self, source: &mut impl UnitSource) -> Result<(), Error> {
        self.arrivals += 1;
        let clock = self.calendar.clock();
        self.calendar
            .schedule(QueueingEvent::Arrival, clock + self.interarrival.sample(source));
        if self.server_busy {
            log::trace!("[{:.6}] customer {} joins the queue", clock, self.arrivals);
            self.waiting
                .push(clock)
                .map_err(|_| Error::CapacityExceeded {
                    capacity: self.waiting.capacity(),
                    time: clock,
                })?;
        } else {
            // Served on arrival: delayed for zero time.
            log::trace!("[{:.6}] customer {} enters service", clock, self.arrivals);
            self.customers_delayed += 1;
            self.server_busy = true;
            self.calendar
                .schedule(QueueingEvent::Departure, clock + self.service.sample(source));
        }
        Ok(())
    }

    fn depart(&mut self, source: &mut impl UnitSource) {
        self.departures += 1;
        let clock = self.calendar.clock();
        match self.waiting.pop() {
            None => {
                log::trace!("[{:.6}] server goes idle", clock);
                self.server_busy = false;
                self.calendar.cancel(QueueingEvent::Departure);
            }
            Some(arrived) => {
                self.total_delay += clock - arrived;
                self.customers_delayed += 1;
                self.calendar
                    .schedule(QueueingEvent::Departure, clock + self.service.sample(source));
            }
        }
    }
}
