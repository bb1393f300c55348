//! Structured event tracing.
//!
//! The run loops report every fired event to an injected sink, which keeps
//! the state machines decoupled from any particular output medium. The
//! production sink streams CSV records; tests use the in-memory sink.

use std::io;

use serde::Serialize;

/// One fired event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceRecord<K> {
    /// 1-based position of the event within its run.
    pub index: u64,
    /// The kind of event that fired.
    pub kind: K,
    /// Simulation time at which it fired.
    pub clock: f64,
}

/// Receives one record per fired event, in firing order.
pub trait TraceSink<K> {
    /// Called by the run loop after the clock has advanced to the event and
    /// before its handler runs.
    fn record(&mut self, record: TraceRecord<K>);
}

/// Discards all records.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl<K> TraceSink<K> for NullSink {
    fn record(&mut self, _: TraceRecord<K>) {}
}

/// Keeps all records in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink<K> {
    records: Vec<TraceRecord<K>>,
}

impl<K> MemorySink<K> {
    /// Constructs an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// All received records, in firing order.
    #[must_use]
    pub fn records(&self) -> &[TraceRecord<K>] {
        &self.records
    }
}

impl<K> TraceSink<K> for MemorySink<K> {
    fn record(&mut self, record: TraceRecord<K>) {
        self.records.push(record);
    }
}

/// Streams records as CSV rows.
pub struct CsvSink<W: io::Write> {
    writer: csv::Writer<W>,
}

impl<W: io::Write> CsvSink<W> {
    /// Constructs a sink writing to `writer`, emitting a header row first.
    ///
    /// # Errors
    ///
    /// Fails when the header cannot be written.
    pub fn new(writer: W) -> csv::Result<Self> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&["event", "kind", "clock"])?;
        Ok(Self { writer })
    }

    /// Flushes buffered rows and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Fails when flushing fails.
    pub fn into_inner(self) -> Result<W, csv::IntoInnerError<csv::Writer<W>>> {
        self.writer.into_inner()
    }
}

impl<W, K> TraceSink<K> for CsvSink<W>
where
    W: io::Write,
    K: std::fmt::Display,
{
    fn record(&mut self, record: TraceRecord<K>) {
        let row = &[
            record.index.to_string(),
            record.kind.to_string(),
            format!("{:.6}", record.clock),
        ];
        if let Err(error) = self.writer.write_record(row) {
            log::error!("failed to write trace record: {}", error);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, strum::Display)]
    enum Kind {
        Tick,
        Tock,
    }

    fn record(index: u64, kind: Kind, clock: f64) -> TraceRecord<Kind> {
        TraceRecord { index, kind, clock }
    }

    #[test]
    fn test_memory_sink_keeps_firing_order() {
        let mut sink = MemorySink::new();
        sink.record(record(1, Kind::Tick, 0.25));
        sink.record(record(2, Kind::Tock, 1.5));
        assert_eq!(
            sink.records(),
            &[record(1, Kind::Tick, 0.25), record(2, Kind::Tock, 1.5)]
        );
    }

    #[test]
    fn test_csv_sink_rows() {
        let mut sink = CsvSink::new(Vec::new()).unwrap();
        sink.record(record(1, Kind::Tick, 0.25));
        sink.record(record(2, Kind::Tock, 1.5));
        let written = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(written, "event,kind,clock\n1,Tick,0.250000\n2,Tock,1.500000\n");
    }
}
