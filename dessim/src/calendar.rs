//! Event calendar and simulation clock.
//!
//! The calendar keeps one slot per event kind: the time of that kind's next
//! occurrence, or [`UNSCHEDULED`] when none is pending. Advancing scans the
//! slots in the kind's fixed declaration order and moves the clock to the
//! smallest scheduled time; on a tie the kind declared first wins. The
//! linear scan relies on the event set being small and closed; a calendar
//! over arbitrary event types would need a priority queue instead.

use std::marker::PhantomData;

use ordered_float::OrderedFloat;

use crate::error::Error;

/// Sentinel time of an event kind with no pending occurrence.
pub const UNSCHEDULED: f64 = f64::INFINITY;

/// A closed set of event kinds driving one system.
///
/// The order of [`all`](EventKind::all) is the fixed tie-break priority.
pub trait EventKind: Copy + PartialEq + std::fmt::Debug + std::fmt::Display + 'static {
    /// Every kind, in tie-break priority order.
    fn all() -> &'static [Self];

    /// The calendar slot of this kind; kinds must map to `0..all().len()`.
    fn slot(self) -> usize;
}

/// The event calendar of a single system, which also owns that system's
/// clock.
#[derive(Debug, Clone)]
pub struct Calendar<K> {
    times: Vec<f64>,
    clock: f64,
    _kind: PhantomData<K>,
}

impl<K: EventKind> Default for Calendar<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EventKind> Calendar<K> {
    /// Constructs an empty calendar with the clock at 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            times: vec![UNSCHEDULED; K::all().len()],
            clock: 0.0,
            _kind: PhantomData,
        }
    }

    /// Current simulation time. Never decreases.
    #[must_use]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Schedules the next occurrence of `kind` at `time`, replacing any
    /// previously scheduled occurrence.
    pub fn schedule(&mut self, kind: K, time: f64) {
        debug_assert!(
            time >= self.clock,
            "{} scheduled at {} in the past of {}",
            kind,
            time,
            self.clock,
        );
        self.times[kind.slot()] = time;
    }

    /// Removes the pending occurrence of `kind`, if any.
    pub fn cancel(&mut self, kind: K) {
        self.times[kind.slot()] = UNSCHEDULED;
    }

    /// The pending occurrence time of `kind`, or `None` if it has none.
    #[must_use]
    pub fn scheduled(&self, kind: K) -> Option<f64> {
        let time = self.times[kind.slot()];
        if time.is_finite() {
            Some(time)
        } else {
            None
        }
    }

    /// Advances the clock to the earliest scheduled time and returns the
    /// kind occurring then. Ties resolve to the kind declared first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EventListExhausted`] when no kind is scheduled.
    /// Handlers must keep at least one kind scheduled while a run is
    /// active, so hitting this is a defect in a handler.
    pub fn advance(&mut self) -> Result<K, Error> {
        let (kind, time) = K::all()
            .iter()
            .map(|&kind| (kind, self.times[kind.slot()]))
            .min_by_key(|&(_, time)| OrderedFloat(time))
            .expect("event kind sets are non-empty");
        if time.is_finite() {
            self.clock = time;
            Ok(kind)
        } else {
            Err(Error::EventListExhausted(self.clock))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
    enum Kind {
        First,
        Second,
        Third,
    }

    impl EventKind for Kind {
        fn all() -> &'static [Self] {
            &[Self::First, Self::Second, Self::Third]
        }

        fn slot(self) -> usize {
            self as usize
        }
    }

    #[test]
    fn test_advance_picks_minimum_and_moves_clock() {
        let mut calendar = Calendar::<Kind>::new();
        calendar.schedule(Kind::First, 2.0);
        calendar.schedule(Kind::Second, 1.0);
        calendar.schedule(Kind::Third, 3.0);
        assert_eq!(calendar.advance(), Ok(Kind::Second));
        assert_eq!(calendar.clock(), 1.0);
        calendar.schedule(Kind::Second, 5.0);
        assert_eq!(calendar.advance(), Ok(Kind::First));
        assert_eq!(calendar.clock(), 2.0);
    }

    #[test]
    fn test_ties_resolve_to_declaration_order() {
        let mut calendar = Calendar::<Kind>::new();
        calendar.schedule(Kind::Third, 1.0);
        calendar.schedule(Kind::Second, 1.0);
        assert_eq!(calendar.advance(), Ok(Kind::Second));
        calendar.cancel(Kind::Second);
        assert_eq!(calendar.advance(), Ok(Kind::Third));
    }

    #[test]
    fn test_cancel_unschedules() {
        let mut calendar = Calendar::<Kind>::new();
        calendar.schedule(Kind::First, 1.0);
        assert_eq!(calendar.scheduled(Kind::First), Some(1.0));
        calendar.cancel(Kind::First);
        assert_eq!(calendar.scheduled(Kind::First), None);
        assert_eq!(calendar.advance(), Err(Error::EventListExhausted(0.0)));
    }

    #[test]
    fn test_exhausted_calendar_is_an_error() {
        let mut calendar = Calendar::<Kind>::new();
        calendar.schedule(Kind::First, 1.5);
        assert_eq!(calendar.advance(), Ok(Kind::First));
        calendar.cancel(Kind::First);
        assert_eq!(calendar.advance(), Err(Error::EventListExhausted(1.5)));
    }
}
