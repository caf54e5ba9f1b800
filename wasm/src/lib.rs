//! BW Diet WASM Module
//!
//! Browser bindings for the body metric formulas and the weight trend
//! fit. Enum arguments are passed as their serialized names
//! (`"male"`, `"very_active"`, `"lose"`); unknown names yield the same
//! 0 sentinel as out-of-domain numbers.

use chrono::{DateTime, TimeZone, Utc};
use wasm_bindgen::prelude::*;

use bw_diet_shared::{health_metrics, trend, ActivityLevel, Gender, GoalType, TrendDirection};

/// Calculate BMI from weight (kg) and height (cm), one decimal
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    health_metrics::calculate_bmi(weight_kg, height_cm)
}

/// Harris-Benedict BMR in kcal/day
#[wasm_bindgen]
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: &str) -> f64 {
    match gender.parse::<Gender>() {
        Ok(gender) => health_metrics::calculate_bmr(weight_kg, height_cm, age_years, gender),
        Err(_) => 0.0,
    }
}

#[wasm_bindgen]
pub fn calculate_tdee(bmr: f64, activity_level: &str) -> f64 {
    match activity_level.parse::<ActivityLevel>() {
        Ok(level) => health_metrics::calculate_tdee(bmr, level),
        Err(_) => 0.0,
    }
}

#[wasm_bindgen]
pub fn calculate_daily_calorie_target(tdee: f64, goal_type: &str, weekly_goal_kg: f64) -> f64 {
    match goal_type.parse::<GoalType>() {
        Ok(goal) => health_metrics::calculate_daily_calorie_target(tdee, goal, weekly_goal_kg),
        Err(_) => 0.0,
    }
}

#[wasm_bindgen]
pub fn calculate_calories_burned(met: f64, weight_kg: f64, duration_minutes: f64) -> f64 {
    health_metrics::calculate_calories_burned(met, weight_kg, duration_minutes)
}

/// Days to target; -1 when the weekly goal is not positive
#[wasm_bindgen]
pub fn calculate_days_to_target(current_kg: f64, target_kg: f64, weekly_goal_kg: f64) -> i64 {
    health_metrics::calculate_days_to_target(current_kg, target_kg, weekly_goal_kg)
}

/// Fit a trend to parallel weight / timestamp (ms since epoch) arrays
///
/// Returns `[direction, rate, confidence, next_week_weight]` where
/// direction is 1 (increasing), -1 (decreasing) or 0 (stable). Pairs
/// beyond the shorter array and invalid timestamps are ignored.
#[wasm_bindgen]
pub fn analyze_trend(weights: &[f64], timestamps_ms: &[f64]) -> Vec<f64> {
    let mut points: Vec<(DateTime<Utc>, f64)> = weights
        .iter()
        .zip(timestamps_ms)
        .filter_map(|(weight, ms)| {
            Utc.timestamp_millis_opt(*ms as i64)
                .single()
                .map(|at| (at, *weight))
        })
        .collect();
    points.sort_by_key(|(at, _)| *at);
    let start = points.len().saturating_sub(trend::TREND_WINDOW);

    let result = trend::fit_trend(&points[start..]);
    let direction = match result.direction {
        TrendDirection::Increasing => 1.0,
        TrendDirection::Decreasing => -1.0,
        TrendDirection::Stable => 0.0,
    };
    vec![
        direction,
        result.rate,
        result.confidence,
        result.prediction.next_week_weight,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: f64 = 86_400_000.0;

    #[test]
    fn test_formulas_delegate() {
        assert_eq!(calculate_bmi(70.0, 175.0), 22.9);
        assert_eq!(calculate_bmr(60.0, 160.0, 25, "female"), 1390.0);
        assert_eq!(calculate_bmr(60.0, 160.0, 25, "other"), 0.0);
        assert_eq!(calculate_tdee(1390.0, "sedentary"), 1668.0);
        assert_eq!(calculate_daily_calorie_target(2000.0, "maintain", 0.5), 2000.0);
        assert_eq!(calculate_days_to_target(80.0, 70.0, 0.0), -1);
    }

    #[test]
    fn test_trend_from_parallel_arrays() {
        let weights = [80.0, 79.8, 79.6, 79.4, 79.2];
        let timestamps: Vec<f64> = (0..5).map(|i| 1_700_000_000_000.0 + i as f64 * DAY_MS).collect();
        let result = analyze_trend(&weights, &timestamps);
        assert_eq!(result[0], -1.0);
        assert!((result[1] - 1.4).abs() < 1e-9);
        assert_eq!(result[3], 79.0);
    }

    #[test]
    fn test_trend_uses_most_recent_window() {
        // unsorted input; the 10 most recent points are flat
        let mut weights = vec![70.0; 10];
        let mut timestamps: Vec<f64> = (5..15).map(|i| i as f64 * DAY_MS).collect();
        weights.extend([90.0, 85.0, 80.0]);
        timestamps.extend([0.0, DAY_MS, 2.0 * DAY_MS]);
        let result = analyze_trend(&weights, &timestamps);
        assert_eq!(result, vec![0.0, 0.0, 0.0, 70.0]);
    }

    #[test]
    fn test_trend_with_no_points() {
        assert_eq!(analyze_trend(&[], &[]), vec![0.0, 0.0, 0.0, 0.0]);
    }
}
