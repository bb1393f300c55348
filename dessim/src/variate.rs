//! Random variates derived from unit-interval draws.
//!
//! Every sampler holds the id of the stream it consumes, so two samplers on
//! different streams are statistically independent by construction.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rng::{StreamId, UnitSource};

/// Rounding applied to a unit draw before it is transformed into a variate.
///
/// Some models round draws to a fixed number of decimal digits before
/// taking the logarithm; this is an explicit, per-sampler policy rather
/// than a hard-coded behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Rounding {
    /// Use the draw as-is.
    Exact,
    /// Round the draw to the given number of decimal digits. A draw that
    /// rounds to 0 is used unrounded, so `ln` never sees 0.
    Decimals(u32),
}

impl Default for Rounding {
    fn default() -> Self {
        Self::Exact
    }
}

impl From<Option<u32>> for Rounding {
    fn from(decimals: Option<u32>) -> Self {
        decimals.map_or(Self::Exact, Self::Decimals)
    }
}

impl Rounding {
    fn apply(self, unit: f64) -> f64 {
        match self {
            Self::Exact => unit,
            Self::Decimals(digits) => {
                #[allow(clippy::cast_possible_wrap)]
                let scale = 10_f64.powi(digits as i32);
                let rounded = (unit * scale).round() / scale;
                if rounded > 0.0 {
                    rounded
                } else {
                    unit
                }
            }
        }
    }
}

/// Exponentially distributed variates with the given mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    mean: f64,
    stream: StreamId,
    rounding: Rounding,
}

impl Exponential {
    /// Constructs a sampler drawing from `stream`.
    ///
    /// # Errors
    ///
    /// The mean must be finite and strictly positive, and the stream id must
    /// be within the generator's table.
    pub fn new(mean: f64, stream: StreamId, rounding: Rounding) -> Result<Self, ConfigError> {
        if !mean.is_finite() || mean <= 0.0 {
            return Err(ConfigError::NonPositive {
                name: "exponential mean",
                value: mean,
            });
        }
        Ok(Self {
            mean,
            stream: stream.validate()?,
            rounding,
        })
    }

    /// Draws the next variate: `-mean * ln(u)`.
    pub fn sample(&self, source: &mut impl UnitSource) -> f64 {
        -self.mean * self.rounding.apply(source.unit(self.stream)).ln()
    }
}

/// Discrete empirical distribution given by a cumulative probability table.
///
/// Sampling returns the index of the first entry whose cumulative
/// probability strictly exceeds the draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteCdf {
    cumulative: Vec<f64>,
    stream: StreamId,
}

/// Tolerance for the final entry of a cumulative table reaching 1.
const CDF_TOLERANCE: f64 = 1e-6;

impl DiscreteCdf {
    /// Constructs a sampler over the given ascending cumulative table.
    ///
    /// # Errors
    ///
    /// The table must be non-empty, each entry must lie in `(0, 1]` and be
    /// no smaller than its predecessor, and the last entry must equal 1
    /// within a small tolerance.
    pub fn new(cumulative: Vec<f64>, stream: StreamId) -> Result<Self, ConfigError> {
        if cumulative.is_empty() {
            return Err(ConfigError::EmptyDistribution);
        }
        let mut previous = 0.0;
        for (index, &value) in cumulative.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 || value > 1.0 || value < previous {
                return Err(ConfigError::MalformedDistribution { index, value });
            }
            previous = value;
        }
        let last = *cumulative.last().expect("table is non-empty");
        if last < 1.0 - CDF_TOLERANCE {
            return Err(ConfigError::IncompleteDistribution(last));
        }
        Ok(Self {
            cumulative,
            stream: stream.validate()?,
        })
    }

    /// Draws the next index.
    pub fn sample(&self, source: &mut impl UnitSource) -> usize {
        let unit = source.unit(self.stream);
        self.cumulative
            .iter()
            .position(|&cumulative| unit < cumulative)
            // The last entry may fall short of the draw by the validation
            // tolerance; the final index absorbs that sliver.
            .unwrap_or(self.cumulative.len() - 1)
    }

    /// The cumulative probabilities, ascending.
    #[must_use]
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }
}

/// Continuously uniform variates over `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    low: f64,
    high: f64,
    stream: StreamId,
}

impl Uniform {
    /// Constructs a sampler drawing from `stream`.
    ///
    /// # Errors
    ///
    /// The bounds must be finite with `low <= high`, and the stream id must
    /// be within the generator's table.
    pub fn new(low: f64, high: f64, stream: StreamId) -> Result<Self, ConfigError> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(ConfigError::InvertedRange {
                min: low,
                max: high,
            });
        }
        Ok(Self {
            low,
            high,
            stream: stream.validate()?,
        })
    }

    /// Draws the next variate: `low + u * (high - low)`.
    pub fn sample(&self, source: &mut impl UnitSource) -> f64 {
        self.low + source.unit(self.stream) * (self.high - self.low)
    }
}
