//! Goal progress and projection
//!
//! Compares the actual weight against the trajectory implied by the
//! weekly goal and estimates the days left to the target.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health_metrics::MS_PER_DAY;
use crate::models::{GoalType, Profile};

/// Band around the expected weight that still counts as on track
pub const ON_TRACK_TOLERANCE_KG: f64 = 0.5;

/// Progress toward the weight goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    /// 0..=100
    pub percentage: f64,
    pub on_track: bool,
    /// `None` when no positive weekly goal is set
    pub days_remaining: Option<u32>,
    /// Revised expectation, only present when off track
    pub adjusted_target: Option<f64>,
}

impl GoalProgress {
    /// Progress when there is nothing to project from
    pub fn unknown() -> Self {
        Self {
            percentage: 0.0,
            on_track: false,
            days_remaining: None,
            adjusted_target: None,
        }
    }
}

/// Raw progress percentage toward the target (not clamped)
///
/// Loss: share of `start - target` already lost. Gain: share of
/// `target - start` already gained. Maintain: always 100. A zero or
/// wrong-way total yields 0.
pub fn progress_percentage(goal_type: GoalType, start_kg: f64, current_kg: f64, target_kg: f64) -> f64 {
    let (total, so_far) = match goal_type {
        GoalType::Maintain => return 100.0,
        GoalType::Lose => (start_kg - target_kg, start_kg - current_kg),
        GoalType::Gain => (target_kg - start_kg, current_kg - start_kg),
    };
    if total > 0.0 {
        so_far / total * 100.0
    } else {
        0.0
    }
}

/// Clamp a progress percentage into [0, 100]; non-finite values become 0
pub fn clamp_percentage(percentage: f64) -> f64 {
    if percentage.is_finite() {
        percentage.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Project goal progress at `now`
///
/// The expected weight is `current + weekly_goal × weeks_elapsed` for
/// both loss and gain goals. `weekly_goal` is stored as a positive
/// magnitude, so for loss goals this expectation moves the wrong way;
/// the formula is kept as is until the sign convention is settled.
pub fn project_goal(profile: &Profile, progress: f64, now: DateTime<Utc>) -> GoalProgress {
    let current = profile.current_weight;

    let days_elapsed = (now - profile.start_date)
        .num_milliseconds()
        .div_euclid(MS_PER_DAY);
    let weeks_elapsed = days_elapsed as f64 / 7.0;

    let expected_change = profile.weekly_goal * weeks_elapsed;
    let expected_weight = match profile.goal_type {
        GoalType::Lose | GoalType::Gain => current + expected_change,
        GoalType::Maintain => current,
    };

    let on_track = (current - expected_weight).abs() <= ON_TRACK_TOLERANCE_KG;

    let days_remaining = if profile.weekly_goal > 0.0 {
        let remaining = (profile.target_weight - current).abs();
        let days = (remaining / profile.weekly_goal * 7.0).ceil();
        Some(days.max(0.0) as u32)
    } else {
        None
    };

    GoalProgress {
        percentage: clamp_percentage(progress),
        on_track,
        days_remaining,
        adjusted_target: if on_track { None } else { Some(expected_weight) },
    }
}
