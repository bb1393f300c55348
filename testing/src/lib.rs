//! Deterministic unit-uniform sources for tests.

#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::default_trait_access)]

use std::collections::VecDeque;

use dessim::{StreamId, UnitSource};

/// A source producing a scripted sequence of draws, so unit tests can
/// exercise samplers and state machines with exactly chosen values.
///
/// The stream id is ignored: every stream reads from the same script. Once
/// a finite script runs out, requesting another draw panics unless a
/// repeating value was configured.
pub struct ScriptedSource {
    draws: VecDeque<f64>,
    repeating: Option<f64>,
}

impl ScriptedSource {
    /// A source that produces `value` forever.
    #[must_use]
    pub fn repeating(value: f64) -> Self {
        Self {
            draws: VecDeque::new(),
            repeating: Some(value),
        }
    }

    /// Appends draws to the end of the script.
    pub fn extend<I: IntoIterator<Item = f64>>(&mut self, draws: I) {
        self.draws.extend(draws);
    }
}

impl From<Vec<f64>> for ScriptedSource {
    fn from(draws: Vec<f64>) -> Self {
        Self {
            draws: draws.into(),
            repeating: None,
        }
    }
}

impl UnitSource for ScriptedSource {
    fn unit(&mut self, _: StreamId) -> f64 {
        self.draws
            .pop_front()
            .or(self.repeating)
            .expect("scripted source exhausted")
    }
}

/// Adapts any [`rand::Rng`] into a [`UnitSource`], for tests that want
/// arbitrary rather than scripted draws.
///
/// Draws are mapped into `(0, 1]` so that logarithms of draws stay finite.
pub struct RngSource<R>(pub R);

impl<R: rand::Rng> UnitSource for RngSource<R> {
    fn unit(&mut self, _: StreamId) -> f64 {
        1.0 - self.0.gen::<f64>()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn stream() -> StreamId {
        StreamId::from(1)
    }

    #[test]
    fn test_scripted_draws_in_order() {
        let mut source = ScriptedSource::from(vec![0.25, 0.75]);
        assert_eq!(source.unit(stream()), 0.25);
        assert_eq!(source.unit(stream()), 0.75);
    }

    #[test]
    #[should_panic(expected = "scripted source exhausted")]
    fn test_exhausted_script_panics() {
        let mut source = ScriptedSource::from(vec![0.25]);
        source.unit(stream());
        source.unit(stream());
    }

    #[test]
    fn test_repeating_value_never_runs_out() {
        let mut source = ScriptedSource::repeating(0.5);
        source.extend(vec![0.1]);
        assert_eq!(source.unit(stream()), 0.1);
        assert_eq!(source.unit(stream()), 0.5);
        assert_eq!(source.unit(stream()), 0.5);
    }

    #[test]
    fn test_rng_source_stays_within_half_open_unit_interval() {
        use rand::SeedableRng;
        let mut source = RngSource(rand::rngs::StdRng::seed_from_u64(17));
        for _ in 0..1000 {
            let unit = source.unit(stream());
            assert!(unit > 0.0 && unit <= 1.0);
        }
    }
}
