use serde::Serialize;

/// Linear trend fitted over an ordered series.
///
/// Values are indexed by zero-based period position. The model is immutable:
/// fitting again produces a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendModel {
    slope: f64,
    intercept: f64,
    n_observed: usize,
    n_points: usize,
}

impl TrendModel {
    /// `n_observed` is the series length in periods, `n_points` the number of
    /// non-null values that went into the fit.
    pub fn new(slope: f64, intercept: f64, n_observed: usize, n_points: usize) -> Self {
        Self {
            slope,
            intercept,
            n_observed,
            n_points,
        }
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn n_observed(&self) -> usize {
        self.n_observed
    }

    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Fitted value at a period index.
    pub fn value_at(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }

    /// True when fewer than two points were available and the slope was
    /// forced to zero.
    pub fn is_degenerate(&self) -> bool {
        self.n_points < 2
    }

    /// True when at least one observed value backs the model.
    pub fn has_data(&self) -> bool {
        self.n_points > 0
    }
}
