//! Alert decision predicates.
//!
//! The pure half of the alert monitor: given a snapshot of product or sales
//! state, decide whether a condition holds and how severe it is. The backend
//! sweep owns the persistence, dedup queries and delivery around these.

use crate::models::{AlertPriority, AlertType};

/// Relative deviation above which a forecast-deviation alert opens.
pub const DEVIATION_THRESHOLD: f64 = 0.30;

/// Relative deviation above which the alert is raised at high priority.
pub const DEVIATION_HIGH: f64 = 0.50;

/// Days a forecast-deviation alert keeps suppressing new ones. Other alert
/// types suppress for as long as they stay unresolved.
pub const DEVIATION_WINDOW_DAYS: i64 = 3;

/// An unresolved alert already open for a product, as the monitor sees it
/// when deciding whether to open another.
#[derive(Debug, Clone, Copy)]
pub struct OpenAlert {
    pub alert_type: AlertType,
    pub age_days: i64,
}

/// Decide whether a new alert of `candidate` type should open given the
/// product's currently unresolved alerts.
///
/// STOCK_OUT and STOCK_LOW dedup as one group: an open alert of either kind
/// suppresses both. FORECAST_DEVIATION suppresses only within
/// [`DEVIATION_WINDOW_DAYS`]; past the window a fresh deviation alert opens
/// even if the old one was never resolved. Every other type suppresses
/// itself while unresolved.
pub fn should_open(candidate: AlertType, open_alerts: &[OpenAlert]) -> bool {
    !open_alerts.iter().any(|open| suppresses(open, candidate))
}

fn suppresses(open: &OpenAlert, candidate: AlertType) -> bool {
    match candidate {
        AlertType::StockOut | AlertType::StockLow => matches!(
            open.alert_type,
            AlertType::StockOut | AlertType::StockLow
        ),
        AlertType::ForecastDeviation => {
            open.alert_type == AlertType::ForecastDeviation
                && open.age_days < DEVIATION_WINDOW_DAYS
        }
        other => open.alert_type == other,
    }
}

/// Stock-level condition detected for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockCondition {
    /// Stock is exactly zero.
    Out,
    /// Stock is positive but at or below the minimum threshold.
    Low,
}

impl StockCondition {
    pub fn priority(&self) -> AlertPriority {
        match self {
            StockCondition::Out => AlertPriority::Critical,
            StockCondition::Low => AlertPriority::High,
        }
    }
}

/// Classify a product's stock level against its minimum threshold.
pub fn stock_condition(current_stock: i32, min_stock: i32) -> Option<StockCondition> {
    if current_stock == 0 {
        Some(StockCondition::Out)
    } else if current_stock <= min_stock {
        Some(StockCondition::Low)
    } else {
        None
    }
}

/// True when the stock level has reached the configured reorder level.
pub fn reorder_needed(current_stock: i32, reorder_level: i32) -> bool {
    current_stock <= reorder_level
}

/// Relative gap between actual and forecasted sales quantity.
///
/// Returns `None` when the forecast is not positive (division guard); such
/// rows never raise a deviation alert.
pub fn forecast_deviation(actual: i32, forecast: i32) -> Option<f64> {
    if forecast <= 0 {
        return None;
    }
    Some((f64::from(actual) - f64::from(forecast)).abs() / f64::from(forecast))
}

/// Priority for a deviation that already passed [`DEVIATION_THRESHOLD`].
pub fn deviation_priority(deviation: f64) -> AlertPriority {
    if deviation > DEVIATION_HIGH {
        AlertPriority::High
    } else {
        AlertPriority::Medium
    }
}
