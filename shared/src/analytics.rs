//! Combined analytics report
//!
//! Trend, goal progress and insights computed from one immutable
//! snapshot of [`ProfileState`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::insights::{generate_insights, Insight};
use crate::projection::{project_goal, GoalProgress};
use crate::state::ProfileState;
use crate::trend::{analyze_trend, TrendResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub weight_trend: TrendResult,
    pub goal_progress: GoalProgress,
    pub insights: Vec<Insight>,
}

impl AnalyticsReport {
    /// Report shown before there is enough data to analyze
    pub fn insufficient_data(current_weight: Option<f64>) -> Self {
        Self {
            weight_trend: TrendResult::flat(current_weight.unwrap_or(0.0)),
            goal_progress: GoalProgress::unknown(),
            insights: Vec::new(),
        }
    }
}

/// Analyze a state at `now`
///
/// Needs a profile and at least two ledger entries; otherwise the
/// insufficient-data report is returned.
pub fn analyze(state: &ProfileState, now: DateTime<Utc>) -> AnalyticsReport {
    let Some(profile) = state.profile() else {
        return AnalyticsReport::insufficient_data(None);
    };
    let ledger = state.ledger();
    if ledger.len() < 2 {
        return AnalyticsReport::insufficient_data(state.current_weight());
    }

    let weight_trend = analyze_trend(ledger.entries());
    let goal_progress = project_goal(profile, state.weight_progress(), now);
    let insights = generate_insights(
        profile,
        &weight_trend,
        &goal_progress,
        ledger,
        state.preferences().language,
        now,
    );

    AnalyticsReport {
        weight_trend,
        goal_progress,
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::InsightKind;
    use crate::models::{GoalType, ProfileUpdate};
    use crate::trend::TrendDirection;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 7, 0, 0).unwrap()
    }

    fn losing_state(days: i64) -> ProfileState {
        let mut state = ProfileState::new();
        state.set_profile_at(
            &ProfileUpdate {
                current_weight: Some(80.0),
                target_weight: Some(70.0),
                goal_type: Some(GoalType::Lose),
                weekly_goal: Some(0.5),
                ..Default::default()
            },
            start(),
        );
        for d in 0..days {
            state.add_weight_entry_at(80.0 - 0.1 * d as f64, None, None, start() + Duration::days(d));
        }
        state
    }

    #[test]
    fn test_without_profile() {
        let report = analyze(&ProfileState::new(), start());
        assert_eq!(report, AnalyticsReport::insufficient_data(None));
    }

    #[test]
    fn test_single_entry_is_insufficient() {
        let state = losing_state(1);
        let report = analyze(&state, start());
        assert_eq!(report.weight_trend.direction, TrendDirection::Stable);
        assert_eq!(report.weight_trend.prediction.next_week_weight, 80.0);
        assert_eq!(report.goal_progress.days_remaining, None);
        assert!(report.insights.is_empty());
    }

    #[test]
    fn test_steady_daily_loss_report() {
        let state = losing_state(8);
        let now = start() + Duration::days(7);
        let report = analyze(&state, now);

        assert_eq!(report.weight_trend.direction, TrendDirection::Decreasing);
        assert!((report.weight_trend.rate - 0.7).abs() < 1e-9);
        // 80 -> 79.3 of a 10 kg goal
        assert!((report.goal_progress.percentage - 7.0).abs() < 1e-9);
        assert_eq!(
            report.insights.iter().map(|i| i.kind).collect::<Vec<_>>(),
            vec![InsightKind::NeedsFocus, InsightKind::SteadyLoss]
        );
    }

    #[test]
    fn test_report_is_deterministic() {
        let state = losing_state(4);
        let now = start() + Duration::days(10);
        assert_eq!(analyze(&state, now), analyze(&state, now));
    }
}
