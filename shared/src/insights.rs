//! Rule-based insight generation
//!
//! Rules are evaluated in a fixed priority order and every rule that
//! fires contributes one insight. Rules are independent: there is no
//! suppression, reordering or deduplication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::WeightHistoryLedger;
use crate::models::{GoalType, Language, Profile};
use crate::projection::GoalProgress;
use crate::trend::{TrendDirection, TrendResult};

/// Progress above this percentage counts as near the goal
pub const NEAR_GOAL_PERCENT: f64 = 75.0;

/// Progress below this percentage prompts more focus
pub const LOW_PROGRESS_PERCENT: f64 = 25.0;

/// Trend confidence needed before direction-based rules fire
pub const CONFIDENT_TREND: f64 = 0.7;

/// Days in the logging-consistency window
pub const CONSISTENCY_WINDOW_DAYS: i64 = 7;

/// Rate above `weekly_goal × this` is flagged as too fast
pub const FAST_CHANGE_FACTOR: f64 = 1.5;

/// Insight severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Success,
    Warning,
    Info,
    Error,
}

/// Which rule produced an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    NearGoal,
    NeedsFocus,
    TrendingWrongWay,
    SteadyLoss,
    LogMoreOften,
    ChangingTooFast,
}

/// A user-facing insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Insight {
    fn new(kind: InsightKind, insight_type: InsightType, message: String, action: &str) -> Self {
        Self {
            kind,
            insight_type,
            message,
            action: Some(action.to_string()),
        }
    }
}

/// Evaluate every rule against one snapshot
pub fn generate_insights(
    profile: &Profile,
    trend: &TrendResult,
    progress: &GoalProgress,
    ledger: &WeightHistoryLedger,
    language: Language,
    now: DateTime<Utc>,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if progress.percentage > NEAR_GOAL_PERCENT {
        insights.push(near_goal(language));
    }

    if progress.percentage < LOW_PROGRESS_PERCENT && progress.days_remaining.is_some_and(|d| d > 0) {
        insights.push(needs_focus(language));
    }

    let confident_loss_goal = trend.confidence > CONFIDENT_TREND && profile.goal_type == GoalType::Lose;

    if confident_loss_goal && trend.direction == TrendDirection::Increasing {
        insights.push(trending_wrong_way(language));
    }

    if confident_loss_goal && trend.direction == TrendDirection::Decreasing {
        insights.push(steady_loss(trend.rate, language));
    }

    let window_start = now - Duration::days(CONSISTENCY_WINDOW_DAYS);
    if ledger.count_since(window_start) < CONSISTENCY_WINDOW_DAYS as usize {
        insights.push(log_more_often(language));
    }

    if trend.rate > profile.weekly_goal * FAST_CHANGE_FACTOR {
        insights.push(changing_too_fast(language));
    }

    insights
}

fn near_goal(language: Language) -> Insight {
    let (message, action) = match language {
        Language::Ko => ("목표 달성까지 얼마 남지 않았어요! 🎉", "꾸준히 현재 패턴을 유지하세요"),
        Language::En => ("You're almost at your goal! 🎉", "Keep up your current routine"),
    };
    Insight::new(InsightKind::NearGoal, InsightType::Success, message.to_string(), action)
}

fn needs_focus(language: Language) -> Insight {
    let (message, action) = match language {
        Language::Ko => ("목표 달성을 위해 더 집중해보세요", "식단과 운동 계획을 점검해보세요"),
        Language::En => ("Try to focus more on reaching your goal", "Review your diet and exercise plan"),
    };
    Insight::new(InsightKind::NeedsFocus, InsightType::Info, message.to_string(), action)
}

fn trending_wrong_way(language: Language) -> Insight {
    let (message, action) = match language {
        Language::Ko => ("체중이 증가 추세입니다", "칼로리 섭취량을 확인해보세요"),
        Language::En => ("Your weight is trending upward", "Check your calorie intake"),
    };
    Insight::new(InsightKind::TrendingWrongWay, InsightType::Warning, message.to_string(), action)
}

fn steady_loss(rate: f64, language: Language) -> Insight {
    let (message, action) = match language {
        Language::Ko => (
            format!("체중이 순조롭게 감소하고 있어요 (주 {:.1}kg)", rate),
            "현재 방식을 계속 유지하세요",
        ),
        Language::En => (
            format!("Your weight is dropping steadily ({:.1} kg/week)", rate),
            "Keep doing what you're doing",
        ),
    };
    Insight::new(InsightKind::SteadyLoss, InsightType::Success, message, action)
}

fn log_more_often(language: Language) -> Insight {
    let (message, action) = match language {
        Language::Ko => (
            "더 정확한 분석을 위해 매일 체중을 기록해보세요",
            "일정한 시간에 체중을 측정하세요",
        ),
        Language::En => (
            "Log your weight daily for a more accurate analysis",
            "Weigh yourself at the same time each day",
        ),
    };
    Insight::new(InsightKind::LogMoreOften, InsightType::Info, message.to_string(), action)
}

fn changing_too_fast(language: Language) -> Insight {
    let (message, action) = match language {
        Language::Ko => ("목표보다 빠른 속도로 변화하고 있어요", "건강한 속도로 조절해보세요"),
        Language::En => (
            "Your weight is changing faster than your target rate",
            "Ease off to a healthier pace",
        ),
    };
    Insight::new(InsightKind::ChangingTooFast, InsightType::Warning, message.to_string(), action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProfileUpdate, WeightEntry};
    use crate::trend::TrendPrediction;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
    }

    fn lose_profile() -> Profile {
        Profile::with_defaults(Uuid::new_v4(), now() - Duration::days(30)).apply(&ProfileUpdate {
            goal_type: Some(GoalType::Lose),
            weekly_goal: Some(0.5),
            ..Default::default()
        })
    }

    fn trend(direction: TrendDirection, rate: f64, confidence: f64) -> TrendResult {
        TrendResult {
            direction,
            rate,
            confidence,
            prediction: TrendPrediction {
                next_week_weight: 70.0,
            },
        }
    }

    fn progress(percentage: f64, days_remaining: Option<u32>) -> GoalProgress {
        GoalProgress {
            percentage,
            on_track: true,
            days_remaining,
            adjusted_target: None,
        }
    }

    fn daily_ledger(days: i64) -> WeightHistoryLedger {
        WeightHistoryLedger::from_entries(
            (0..days)
                .map(|d| WeightEntry::record(None, 70.0, None, None, now() - Duration::days(d)))
                .collect(),
        )
    }

    fn kinds(insights: &[Insight]) -> Vec<InsightKind> {
        insights.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_near_goal_with_steady_loss() {
        let insights = generate_insights(
            &lose_profile(),
            &trend(TrendDirection::Decreasing, 0.5, 0.9),
            &progress(80.0, Some(10)),
            &daily_ledger(7),
            Language::En,
            now(),
        );
        assert_eq!(kinds(&insights), vec![InsightKind::NearGoal, InsightKind::SteadyLoss]);
        assert_eq!(insights[1].message, "Your weight is dropping steadily (0.5 kg/week)");
        assert_eq!(insights[1].insight_type, InsightType::Success);
    }

    #[test]
    fn test_all_warning_rules_fire_in_order() {
        let insights = generate_insights(
            &lose_profile(),
            &trend(TrendDirection::Increasing, 1.0, 0.95),
            &progress(10.0, Some(40)),
            &daily_ledger(3),
            Language::Ko,
            now(),
        );
        assert_eq!(
            kinds(&insights),
            vec![
                InsightKind::NeedsFocus,
                InsightKind::TrendingWrongWay,
                InsightKind::LogMoreOften,
                InsightKind::ChangingTooFast,
            ]
        );
        assert_eq!(insights[1].message, "체중이 증가 추세입니다");
    }

    #[test]
    fn test_low_confidence_skips_direction_rules() {
        let insights = generate_insights(
            &lose_profile(),
            &trend(TrendDirection::Increasing, 0.2, 0.5),
            &progress(50.0, Some(20)),
            &daily_ledger(7),
            Language::En,
            now(),
        );
        assert!(insights.is_empty());
    }

    #[test]
    fn test_needs_focus_requires_days_remaining() {
        let insights = generate_insights(
            &lose_profile(),
            &trend(TrendDirection::Stable, 0.0, 0.0),
            &progress(10.0, None),
            &daily_ledger(7),
            Language::En,
            now(),
        );
        assert!(insights.is_empty());
    }

    #[test]
    fn test_old_entries_do_not_count_toward_consistency() {
        let stale = WeightHistoryLedger::from_entries(
            (10..20)
                .map(|d| WeightEntry::record(None, 70.0, None, None, now() - Duration::days(d)))
                .collect(),
        );
        let insights = generate_insights(
            &lose_profile(),
            &trend(TrendDirection::Stable, 0.0, 0.0),
            &progress(50.0, Some(20)),
            &stale,
            Language::En,
            now(),
        );
        assert_eq!(kinds(&insights), vec![InsightKind::LogMoreOften]);
    }

    #[test]
    fn test_same_snapshot_same_insights() {
        let profile = lose_profile();
        let t = trend(TrendDirection::Increasing, 1.0, 0.95);
        let p = progress(10.0, Some(40));
        let ledger = daily_ledger(2);
        let first = generate_insights(&profile, &t, &p, &ledger, Language::En, now());
        let second = generate_insights(&profile, &t, &p, &ledger, Language::En, now());
        assert_eq!(first, second);
    }
}
