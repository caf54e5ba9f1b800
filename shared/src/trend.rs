//! Weight trend analysis
//!
//! Fits an ordinary least-squares line to the most recent weight
//! observations and reports direction, calendar-normalized weekly rate
//! and a confidence score (absolute Pearson correlation).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health_metrics::{round_to, MS_PER_DAY};
use crate::models::WeightEntry;

/// Number of most recent entries the fit looks at
pub const TREND_WINDOW: usize = 10;

/// Below this many kg/week the trend counts as stable
pub const STABLE_RATE_KG_PER_WEEK: f64 = 0.1;

/// Trend direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPrediction {
    pub next_week_weight: f64,
}

/// Result of a trend fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub direction: TrendDirection,
    /// kg per calendar week, always non-negative
    pub rate: f64,
    /// 0..=1
    pub confidence: f64,
    pub prediction: TrendPrediction,
}

impl TrendResult {
    /// The "no signal" result
    pub fn flat(weight: f64) -> Self {
        Self {
            direction: TrendDirection::Stable,
            rate: 0.0,
            confidence: 0.0,
            prediction: TrendPrediction {
                next_week_weight: weight,
            },
        }
    }
}

/// Analyze the trend of a ledger view (most recent first)
///
/// Uses the [`TREND_WINDOW`] most recent entries, oldest first.
pub fn analyze_trend(entries_newest_first: &[WeightEntry]) -> TrendResult {
    let window = &entries_newest_first[..entries_newest_first.len().min(TREND_WINDOW)];
    let mut points: Vec<(DateTime<Utc>, f64)> =
        window.iter().map(|e| (e.recorded_at, e.weight)).collect();
    points.sort_by_key(|(at, _)| *at);
    fit_trend(&points)
}

/// Fit a trend to `(timestamp, weight)` points sorted oldest first
///
/// Points are regressed against their index, not their timestamp; the
/// slope is converted to kg/week using the mean spacing between points.
/// The prediction is the fitted value one index step past the last
/// point.
pub fn fit_trend(points: &[(DateTime<Utc>, f64)]) -> TrendResult {
    if points.len() < 2 {
        return TrendResult::flat(points.first().map(|(_, w)| *w).unwrap_or(0.0));
    }

    let n = points.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, (_, y)) in points.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let mean_x = sum_x / n;
    let mean_y = sum_y / n;
    let (mut covariance, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (i, (_, y)) in points.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // A flat series carries no signal: no slope, no confidence
    let denominator = n * sum_xx - sum_x * sum_x;
    let (slope, confidence) = if var_x <= 0.0 || var_y <= 0.0 || denominator == 0.0 {
        (0.0, 0.0)
    } else {
        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let correlation = covariance / (var_x.sqrt() * var_y.sqrt());
        (slope, correlation.abs().min(1.0))
    };
    let intercept = (sum_y - slope * sum_x) / n;

    let first = points[0].0;
    let last = points[points.len() - 1].0;
    let span_days = (last - first).num_milliseconds() as f64 / MS_PER_DAY as f64;
    let rate_per_week = if span_days > 0.0 {
        slope * 7.0 / (span_days / (n - 1.0))
    } else {
        0.0
    };

    let direction = if rate_per_week.abs() < STABLE_RATE_KG_PER_WEEK {
        TrendDirection::Stable
    } else if rate_per_week > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    TrendResult {
        direction,
        rate: rate_per_week.abs(),
        confidence,
        prediction: TrendPrediction {
            next_week_weight: round_to(slope * n + intercept, 1),
        },
    }
}
