//! Linear trend fitting and projection over period series.
//!
//! Fit quality is measured on the same series the model was fitted to; there
//! is no hold-out split.

mod seasonal;

pub use seasonal::{DayOfWeek, MonthOfYear, NoSeasonality, SeasonalFactor, SeasonalIndex};

use std::collections::BTreeMap;

use hecon_model::{Granularity, Period, Record, TrendModel};
use serde::{Deserialize, Serialize};

use crate::aggregate::Metric;
use crate::stats::{mean, std_dev};

/// Share of projected demand attributed to the emergency department.
pub const EMERGENCY_SHARE: f64 = 0.72;
/// Share of projected demand attributed to inpatient admission.
pub const INPATIENT_SHARE: f64 = 0.28;

/// How forecasts are produced, chosen by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastStrategy {
    /// No forecasts.
    Disabled,
    /// Linear trend with fixed calendar factors.
    #[default]
    Simple,
    /// Linear trend with factors estimated from the series.
    Advanced,
}

impl ForecastStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            ForecastStrategy::Disabled => "disabled",
            ForecastStrategy::Simple => "simple",
            ForecastStrategy::Advanced => "advanced",
        }
    }
}

/// Whether projected values are counts (rounded) or amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Count,
    Amount,
}

/// Contiguous period series; gaps inside the observed range are explicit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub periods: Vec<Period>,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn last_period(&self) -> Option<Period> {
        self.periods.last().copied()
    }

    /// Values that are present, in order.
    pub fn observed(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }
}

/// Builds the per-period series of `metric` over records' episode end dates.
///
/// Periods without records are `Some(0.0)` for [`Metric::Encounters`] and
/// `None` otherwise.
pub fn period_series(records: &[Record], granularity: Granularity, metric: Metric) -> Series {
    let mut sums: BTreeMap<Period, Option<f64>> = BTreeMap::new();
    for record in records {
        let Some(end) = record.episode_end() else {
            continue;
        };
        let entry = sums
            .entry(Period::from_date(end.date(), granularity))
            .or_insert(None);
        if let Some(value) = metric.value(record).filter(|v| v.is_finite()) {
            *entry = Some(entry.unwrap_or(0.0) + value);
        }
    }
    let (Some(first), Some(last)) = (sums.keys().next().copied(), sums.keys().next_back().copied())
    else {
        return Series::default();
    };

    let gap = match metric {
        Metric::Encounters => Some(0.0),
        _ => None,
    };
    let mut series = Series::default();
    let mut current = first;
    loop {
        series.periods.push(current);
        series
            .values
            .push(sums.get(&current).copied().unwrap_or(gap));
        if current >= last {
            break;
        }
        current = current.next();
    }
    series
}

/// Ordinary least squares of value against zero-based index.
///
/// `None` points are skipped but keep their index. With fewer than two
/// points, or no spread in the indexes, the slope is zero and the intercept
/// is the mean of the available values (zero when there are none).
pub fn fit_trend(values: &[Option<f64>]) -> TrendModel {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(idx, value)| value.filter(|v| v.is_finite()).map(|v| (idx as f64, v)))
        .collect();
    let n_observed = values.len();
    let n_points = points.len();
    let y_values: Vec<f64> = points.iter().map(|(_, y)| *y).collect();
    let y_mean = mean(&y_values).unwrap_or(0.0);
    if n_points < 2 {
        return TrendModel::new(0.0, y_mean, n_observed, n_points);
    }

    let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n_points as f64;
    let numerator: f64 = points.iter().map(|(x, y)| (x - x_mean) * (y - y_mean)).sum();
    let denominator: f64 = points.iter().map(|(x, _)| (x - x_mean).powi(2)).sum();
    if denominator == 0.0 {
        return TrendModel::new(0.0, y_mean, n_observed, n_points);
    }
    let slope = numerator / denominator;
    TrendModel::new(slope, y_mean - slope * x_mean, n_observed, n_points)
}

/// Goodness of fit on the fitting series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FitQuality {
    pub mean_absolute_deviation: Option<f64>,
    /// `None` with fewer than two points or a constant series.
    pub r_squared: Option<f64>,
}

pub fn fit_quality(model: &TrendModel, values: &[Option<f64>]) -> FitQuality {
    let pairs: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(idx, value)| {
            value
                .filter(|v| v.is_finite())
                .map(|v| (v, model.value_at(idx)))
        })
        .collect();
    if pairs.is_empty() {
        return FitQuality::default();
    }
    let deviations: Vec<f64> = pairs.iter().map(|(y, fit)| (y - fit).abs()).collect();
    let mean_absolute_deviation = mean(&deviations);

    let observed: Vec<f64> = pairs.iter().map(|(y, _)| *y).collect();
    let r_squared = mean(&observed).and_then(|y_mean| {
        let ss_tot: f64 = observed.iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = pairs.iter().map(|(y, fit)| (y - fit).powi(2)).sum();
        (pairs.len() >= 2 && ss_tot > 0.0).then(|| 1.0 - ss_res / ss_tot)
    });
    FitQuality {
        mean_absolute_deviation,
        r_squared,
    }
}

/// Projected value for one future period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub period: Period,
    /// `None` when the model had no data.
    pub value: Option<f64>,
}

/// Projects `horizon` periods after `last_period`.
///
/// Step `i` (from 1) evaluates the trend at index `n_observed + i - 1`,
/// applies the seasonal factor of its period and floors at zero.
pub fn predict(
    model: &TrendModel,
    last_period: Period,
    horizon: usize,
    seasonal: &dyn SeasonalFactor,
    kind: ValueKind,
) -> Vec<ForecastPoint> {
    let mut points = Vec::with_capacity(horizon);
    let mut period = last_period;
    for step in 1..=horizon {
        period = period.next();
        let value = model.has_data().then(|| {
            let raw = model.value_at(model.n_observed() + step - 1) * seasonal.factor(&period);
            let floored = raw.max(0.0);
            match kind {
                ValueKind::Count => floored.round(),
                ValueKind::Amount => floored,
            }
        });
        points.push(ForecastPoint { period, value });
    }
    points
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Historical,
    Forecast,
}

/// One row of a history-plus-forecast table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnifiedPoint {
    pub period: Period,
    pub actual: Option<f64>,
    pub prediction: Option<f64>,
    pub kind: PointKind,
}

/// Past periods echo their actual value as the prediction; future periods
/// have no actual.
pub fn unified_series(history: &Series, forecast: &[ForecastPoint]) -> Vec<UnifiedPoint> {
    let past = history
        .periods
        .iter()
        .zip(&history.values)
        .map(|(period, value)| UnifiedPoint {
            period: *period,
            actual: *value,
            prediction: *value,
            kind: PointKind::Historical,
        });
    let future = forecast.iter().map(|point| UnifiedPoint {
        period: point.period,
        actual: None,
        prediction: point.value,
        kind: PointKind::Forecast,
    });
    past.chain(future).collect()
}

/// A fitted series and its projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub strategy: ForecastStrategy,
    pub seasonality: &'static str,
    pub model: TrendModel,
    pub quality: FitQuality,
    pub points: Vec<ForecastPoint>,
    /// Fewer than two observed points; the slope was forced to zero.
    pub degenerate: bool,
}

/// Fixed calendar factor for a series granularity.
fn calendar_factor(granularity: Granularity) -> Box<dyn SeasonalFactor> {
    match granularity {
        Granularity::Day => Box::new(DayOfWeek),
        Granularity::Month => Box::new(MonthOfYear),
        Granularity::Quarter | Granularity::Year => Box::new(NoSeasonality),
    }
}

/// Fits and projects `series` with `strategy`.
///
/// Returns `None` when forecasting is disabled or the series is empty.
pub fn forecast_series(
    series: &Series,
    horizon: usize,
    strategy: ForecastStrategy,
    kind: ValueKind,
) -> Option<Forecast> {
    if strategy == ForecastStrategy::Disabled {
        return None;
    }
    let last_period = series.last_period()?;
    let model = fit_trend(&series.values);
    let quality = fit_quality(&model, &series.values);
    let seasonal: Box<dyn SeasonalFactor> = match strategy {
        ForecastStrategy::Advanced => Box::new(SeasonalIndex::estimate(
            &series.periods,
            &series.values,
            &model,
        )),
        _ => calendar_factor(last_period.granularity()),
    };
    let points = predict(&model, last_period, horizon, seasonal.as_ref(), kind);
    if model.is_degenerate() {
        tracing::debug!(
            n_observed = model.n_observed(),
            n_points = model.n_points(),
            "forecast series too short, flat projection"
        );
    }
    Some(Forecast {
        strategy,
        seasonality: seasonal.name(),
        degenerate: model.is_degenerate(),
        model,
        quality,
        points,
    })
}

/// Projected daily patients and their service split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemandPoint {
    pub period: Period,
    pub patients: Option<u64>,
    pub emergency: Option<u64>,
    pub inpatient: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandForecast {
    pub forecast: Forecast,
    pub points: Vec<DemandPoint>,
    pub historical_mean: Option<f64>,
    pub historical_std_dev: Option<f64>,
    /// `100 - coefficient of variation`, never below 60.
    pub estimated_precision_pct: Option<f64>,
}

/// Daily encounter forecast. Every projected day has at least one patient.
pub fn demand_forecast(
    records: &[Record],
    horizon_days: usize,
    strategy: ForecastStrategy,
) -> Option<DemandForecast> {
    let series = period_series(records, Granularity::Day, Metric::Encounters);
    let forecast = forecast_series(&series, horizon_days, strategy, ValueKind::Count)?;
    let observed = series.observed();
    let historical_mean = mean(&observed);
    let historical_std_dev = std_dev(&observed);
    let estimated_precision_pct = match (historical_mean, historical_std_dev) {
        (Some(avg), Some(sd)) if avg > 0.0 => Some((100.0 - sd / avg * 100.0).max(60.0)),
        _ => None,
    };

    let points = forecast
        .points
        .iter()
        .map(|point| {
            let patients = point.value.map(|v| (v as u64).max(1));
            DemandPoint {
                period: point.period,
                patients,
                emergency: patients.map(|p| (p as f64 * EMERGENCY_SHARE) as u64),
                inpatient: patients.map(|p| (p as f64 * INPATIENT_SHARE) as u64),
            }
        })
        .collect();

    Some(DemandForecast {
        forecast,
        points,
        historical_mean,
        historical_std_dev,
        estimated_precision_pct,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostForecast {
    pub forecast: Forecast,
    pub table: Vec<UnifiedPoint>,
    pub monthly_mean: Option<f64>,
    /// Slope relative to the monthly mean, in percent per month.
    pub growth_pct: Option<f64>,
}

/// Monthly billed-cost forecast with its history echoed in `table`.
pub fn cost_forecast(
    records: &[Record],
    horizon_months: usize,
    strategy: ForecastStrategy,
) -> Option<CostForecast> {
    let series = period_series(records, Granularity::Month, Metric::BilledCost);
    let forecast = forecast_series(&series, horizon_months, strategy, ValueKind::Amount)?;
    let monthly_mean = mean(&series.observed());
    let growth_pct = monthly_mean
        .filter(|avg| *avg > 0.0)
        .map(|avg| forecast.model.slope() / avg * 100.0);
    Some(CostForecast {
        table: unified_series(&series, &forecast.points),
        forecast,
        monthly_mean,
        growth_pct,
    })
}
