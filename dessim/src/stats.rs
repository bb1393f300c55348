//! Time-weighted statistics.
//!
//! A time-weighted statistic integrates a piecewise-constant state variable
//! over simulated time with the rectangle rule. The accumulators here must
//! be observed exactly once per event, with the value that held since the
//! previous observation, before the event's handler mutates any state.

/// Accumulates the area under one piecewise-constant variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeWeighted {
    area: f64,
    last_observed: f64,
}

impl TimeWeighted {
    /// Adds `value * (now - last observation time)` to the area.
    pub fn observe(&mut self, value: f64, now: f64) {
        self.area += value * (now - self.last_observed);
        self.last_observed = now;
    }

    /// The accumulated area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.area
    }
}

/// Accumulates a signed level into two separate areas: the level itself
/// while it is non-negative (holding), and its magnitude while it is
/// negative (shortage). Each observation feeds exactly one of the two.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignSplit {
    holding: f64,
    shortage: f64,
    last_observed: f64,
}

impl SignSplit {
    /// Adds the level's contribution over `(last observation, now]` to the
    /// holding or shortage area, depending on its sign.
    pub fn observe(&mut self, level: f64, now: f64) {
        let elapsed = now - self.last_observed;
        if level < 0.0 {
            self.shortage -= level * elapsed;
        } else {
            self.holding += level * elapsed;
        }
        self.last_observed = now;
    }

    /// Area accumulated while the level was non-negative.
    #[must_use]
    pub fn holding_area(&self) -> f64 {
        self.holding
    }

    /// Magnitude of the area accumulated while the level was negative.
    #[must_use]
    pub fn shortage_area(&self) -> f64 {
        self.shortage
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use float_cmp::approx_eq;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_rectangle_rule() {
        let mut accumulator = TimeWeighted::default();
        accumulator.observe(0.0, 1.0);
        accumulator.observe(2.0, 2.5);
        accumulator.observe(1.0, 4.0);
        assert!(approx_eq!(f64, accumulator.area(), 2.0 * 1.5 + 1.0 * 1.5));
    }

    #[test]
    fn test_zero_elapsed_time_contributes_nothing() {
        let mut accumulator = TimeWeighted::default();
        accumulator.observe(5.0, 2.0);
        let area = accumulator.area();
        accumulator.observe(7.0, 2.0);
        assert_eq!(accumulator.area(), area);
    }

    #[test]
    fn test_sign_split_feeds_exactly_one_side() {
        let mut split = SignSplit::default();
        split.observe(3.0, 1.0);
        assert_eq!((split.holding_area(), split.shortage_area()), (3.0, 0.0));
        split.observe(-2.0, 3.0);
        assert_eq!((split.holding_area(), split.shortage_area()), (3.0, 4.0));
        split.observe(0.0, 5.0);
        assert_eq!((split.holding_area(), split.shortage_area()), (3.0, 4.0));
    }

    /// Reconstructing the area from the observation trace must reproduce the
    /// accumulated value.
    #[quickcheck]
    fn prop_area_reconstructs_from_trace(steps: Vec<(i8, u8)>) -> bool {
        let mut accumulator = TimeWeighted::default();
        let mut split = SignSplit::default();
        let mut now = 0.0;
        let mut trace = Vec::new();
        for &(value, elapsed) in &steps {
            now += f64::from(elapsed) / 8.0;
            accumulator.observe(f64::from(value), now);
            split.observe(f64::from(value), now);
            trace.push((f64::from(value), now));
        }
        let mut area = 0.0;
        let mut split_areas = (0.0_f64, 0.0_f64);
        let mut last = 0.0;
        for (value, at) in trace {
            area += value * (at - last);
            if value < 0.0 {
                split_areas.1 -= value * (at - last);
            } else {
                split_areas.0 += value * (at - last);
            }
            last = at;
        }
        approx_eq!(f64, accumulator.area(), area, ulps = 4)
            && approx_eq!(f64, split.holding_area(), split_areas.0, ulps = 4)
            && approx_eq!(f64, split.shortage_area(), split_areas.1, ulps = 4)
    }
}
