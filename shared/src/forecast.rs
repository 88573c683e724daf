//! Demand forecasting algorithms.
//!
//! Three independent closed-form estimators over a product's recent sales
//! history. All functions here are pure: the caller supplies the history
//! snapshot, the trend score and the current weekday, so the scheduled sweep,
//! the on-demand endpoint and the tests all run exactly the same code.

use chrono::Weekday;

use crate::models::ForecastAlgorithm;

/// Minimum number of history rows required before any forecast is produced.
/// Fewer rows is a skipped computation, not an error.
pub const MIN_HISTORY: usize = 7;

/// Day-of-week demand multipliers, Sunday through Saturday.
pub const SEASONAL_MULTIPLIERS: [f64; 7] = [0.9, 1.1, 1.2, 1.1, 1.3, 1.4, 1.0];

/// One observed day of sales, most recent first in the input slice.
#[derive(Debug, Clone, Copy)]
pub struct Observation {
    pub forecast_quantity: i32,
    pub actual_quantity: Option<i32>,
}

impl Observation {
    /// The observed value for the day: the closed actual when present,
    /// otherwise the planning figure. Falling back to the planning figure is
    /// the defined missing-data policy, not an error.
    pub fn value(&self) -> f64 {
        f64::from(self.actual_quantity.unwrap_or(self.forecast_quantity))
    }
}

/// Output of one algorithm: predicted quantity and a confidence in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastPoint {
    pub quantity: i32,
    pub confidence: i32,
    pub algorithm: ForecastAlgorithm,
}

/// Run all three algorithms over a history snapshot.
///
/// `history` is ordered most recent first (descending date), at most 30
/// rows. Returns `None` when fewer than [`MIN_HISTORY`] observations are
/// available. The three results are independent; no reconciliation or
/// best-pick happens here.
pub fn generate(
    history: &[Observation],
    trend_score: i32,
    today: Weekday,
) -> Option<[ForecastPoint; 3]> {
    if history.len() < MIN_HISTORY {
        return None;
    }

    Some([
        linear_trend(history),
        seasonal_average(history, today),
        trend_adjusted(history, trend_score),
    ])
}

/// Least-squares line over the history in chronological order (oldest at
/// index 0), extrapolated one step past the newest observation.
pub fn linear_trend(history: &[Observation]) -> ForecastPoint {
    let n = history.len() as f64;

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;

    // Input is newest-first; index chronologically for the fit.
    for (i, obs) in history.iter().rev().enumerate() {
        let x = i as f64;
        let y = obs.value();
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    let quantity = ((slope * n + intercept).round()).max(0.0) as i32;

    // Larger residual spread means lower confidence, floor 30, ceiling 95.
    let mut sum_sq_err = 0.0;
    for (i, obs) in history.iter().rev().enumerate() {
        let predicted = slope * i as f64 + intercept;
        let err = predicted - obs.value();
        sum_sq_err += err * err;
    }
    let mse = sum_sq_err / n;
    let confidence = (95.0 - 2.0 * mse).clamp(30.0, 95.0).round() as i32;

    ForecastPoint {
        quantity,
        confidence,
        algorithm: ForecastAlgorithm::Linear,
    }
}

/// Average of the most recent 7 observations scaled by the day-of-week
/// multiplier for the *current* calendar day (not the data's dates).
pub fn seasonal_average(history: &[Observation], today: Weekday) -> ForecastPoint {
    let recent = &history[..history.len().min(7)];
    let average = recent.iter().map(Observation::value).sum::<f64>() / recent.len() as f64;

    let multiplier = SEASONAL_MULTIPLIERS[today.num_days_from_sunday() as usize];
    let quantity = ((average * multiplier).round()).max(0.0) as i32;
    let confidence = (60 + 5 * recent.len() as i32).min(95);

    ForecastPoint {
        quantity,
        confidence,
        algorithm: ForecastAlgorithm::Seasonal,
    }
}

/// Average of the most recent 3 observations scaled by the product's trend
/// score: a score of 10 raises the estimate 20%, a score of 0 lowers it 20%.
/// Shorter histories average whatever is there; an empty one predicts 0.
pub fn trend_adjusted(history: &[Observation], trend_score: i32) -> ForecastPoint {
    let recent = &history[..history.len().min(3)];
    let base = if recent.is_empty() {
        0.0
    } else {
        recent.iter().map(Observation::value).sum::<f64>() / recent.len() as f64
    };

    let multiplier = 0.8 + (f64::from(trend_score) / 10.0) * 0.4;
    let quantity = ((base * multiplier).round()).max(0.0) as i32;
    let confidence = (50 + 4 * trend_score).min(95);

    ForecastPoint {
        quantity,
        confidence,
        algorithm: ForecastAlgorithm::TrendAdjusted,
    }
}
