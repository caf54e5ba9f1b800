//! Health metrics calculations module
//!
//! Provides the body metric formulas: BMI, BMR, TDEE, calorie targets,
//! exercise energy expenditure, per-serving nutrition scaling and
//! time-to-target estimates.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Sentinels, not errors**: Out-of-domain input yields 0 (or
//!    [`INDEFINITE_DAYS`]) instead of a failure
//! 3. **Metric units**: kilograms, centimeters, kcal

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ActivityLevel, DietGoals, Gender, GoalType, Language, Profile};

/// Approximate energy content of 1 kg of body mass
pub const KCAL_PER_KG: f64 = 7700.0;

/// Calorie floor for weight-loss targets
pub const MIN_DAILY_CALORIES: f64 = 1200.0;

/// Sentinel returned by [`calculate_days_to_target`] when no rate is set
pub const INDEFINITE_DAYS: i64 = -1;

/// Within this distance the target counts as reached (100 g)
pub const TARGET_REACHED_TOLERANCE_KG: f64 = 0.1;

/// Default daily water target in ml
pub const DEFAULT_WATER_TARGET_ML: f64 = 2000.0;

/// Milliseconds in a calendar day
pub const MS_PER_DAY: i64 = 86_400_000;

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// BMI category (Asia-Pacific cut-offs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    ObeseClass1,
    ObeseClass2,
    ObeseClass3,
}

impl BmiCategory {
    /// Get a human-readable label
    pub fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (BmiCategory::Underweight, Language::Ko) => "저체중",
            (BmiCategory::Normal, Language::Ko) => "정상",
            (BmiCategory::Overweight, Language::Ko) => "과체중",
            (BmiCategory::ObeseClass1, Language::Ko) => "비만 1단계",
            (BmiCategory::ObeseClass2, Language::Ko) => "비만 2단계",
            (BmiCategory::ObeseClass3, Language::Ko) => "고도비만",
            (BmiCategory::Underweight, Language::En) => "Underweight",
            (BmiCategory::Normal, Language::En) => "Normal",
            (BmiCategory::Overweight, Language::En) => "Overweight",
            (BmiCategory::ObeseClass1, Language::En) => "Obese (Class I)",
            (BmiCategory::ObeseClass2, Language::En) => "Obese (Class II)",
            (BmiCategory::ObeseClass3, Language::En) => "Severely obese",
        }
    }
}

/// Calculate BMI from weight and height, rounded to one decimal
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return 0.0;
    }
    let height_m = height_cm / 100.0;
    round_to(weight_kg / (height_m * height_m), 1)
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 23.0 {
        BmiCategory::Normal
    } else if bmi < 25.0 {
        BmiCategory::Overweight
    } else if bmi < 30.0 {
        BmiCategory::ObeseClass1
    } else if bmi < 35.0 {
        BmiCategory::ObeseClass2
    } else {
        BmiCategory::ObeseClass3
    }
}

// ============================================================================
// BMR and TDEE Calculations
// ============================================================================

/// Calculate BMR using the revised Harris-Benedict equation, rounded
///
/// Men: BMR = 88.362 + 13.397 × weight(kg) + 4.799 × height(cm) - 5.677 × age(y)
/// Women: BMR = 447.593 + 9.247 × weight(kg) + 3.098 × height(cm) - 4.330 × age(y)
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> f64 {
    if weight_kg <= 0.0 || height_cm <= 0.0 || age_years == 0 {
        return 0.0;
    }
    let age = f64::from(age_years);
    let bmr = match gender {
        Gender::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age,
        Gender::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age,
    };
    bmr.round()
}

/// Calculate Total Daily Energy Expenditure, rounded
///
/// TDEE = BMR × Activity Multiplier
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    if bmr <= 0.0 {
        return 0.0;
    }
    (bmr * activity_level.multiplier()).round()
}

/// Calculate the daily calorie target for a goal
///
/// The deficit or surplus is `weekly_goal × 7700 / 7` kcal/day. Loss
/// targets never drop below [`MIN_DAILY_CALORIES`].
pub fn calculate_daily_calorie_target(tdee: f64, goal_type: GoalType, weekly_goal_kg: f64) -> f64 {
    if tdee <= 0.0 {
        return 0.0;
    }

    let daily_adjustment = weekly_goal_kg * KCAL_PER_KG / 7.0;

    match goal_type {
        GoalType::Maintain => tdee,
        GoalType::Lose => (tdee - daily_adjustment).round().max(MIN_DAILY_CALORIES),
        GoalType::Gain => (tdee + daily_adjustment).round(),
    }
}

// ============================================================================
// Exercise and Nutrition
// ============================================================================

/// Calculate calories burned during exercise
///
/// Calories = MET × weight(kg) × duration(hours)
pub fn calculate_calories_burned(met: f64, weight_kg: f64, duration_minutes: f64) -> f64 {
    if met <= 0.0 || weight_kg <= 0.0 || duration_minutes <= 0.0 {
        return 0.0;
    }
    (met * weight_kg * duration_minutes / 60.0).round()
}

/// Nutrition values for a quantity of food
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionInfo {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

/// Scale per-100g nutrition to a serving size in grams
///
/// Calories are rounded to whole kcal, macros to one decimal. A
/// non-positive serving returns the per-100g values unchanged.
pub fn calculate_nutrition_per_serving(per_100g: &NutritionInfo, serving_g: f64) -> NutritionInfo {
    if serving_g <= 0.0 {
        return *per_100g;
    }
    let multiplier = serving_g / 100.0;
    NutritionInfo {
        calories: (per_100g.calories * multiplier).round(),
        protein: round_to(per_100g.protein * multiplier, 1),
        carbohydrates: round_to(per_100g.carbohydrates * multiplier, 1),
        fat: round_to(per_100g.fat * multiplier, 1),
    }
}

/// Split a calorie budget into macro targets
///
/// 25% protein and 45% carbohydrate at 4 kcal/g, 30% fat at 9 kcal/g.
pub fn diet_goals_for(daily_calories: f64) -> DietGoals {
    let calories = daily_calories.max(0.0);
    DietGoals {
        daily_calorie_target: calories,
        protein_target: (calories * 0.25 / 4.0).round(),
        carb_target: (calories * 0.45 / 4.0).round(),
        fat_target: (calories * 0.30 / 9.0).round(),
        water_target: DEFAULT_WATER_TARGET_ML,
    }
}

/// Diet goals derived from a profile's TDEE and weekly goal
pub fn recommended_goals(profile: &Profile) -> DietGoals {
    let calories =
        calculate_daily_calorie_target(profile.tdee(), profile.goal_type, profile.weekly_goal);
    diet_goals_for(calories)
}

// ============================================================================
// Time to target
// ============================================================================

/// Days needed to reach the target at the weekly rate
///
/// Returns 0 when already within 100 g of the target and
/// [`INDEFINITE_DAYS`] when the weekly goal is not positive.
pub fn calculate_days_to_target(current_kg: f64, target_kg: f64, weekly_goal_kg: f64) -> i64 {
    let difference = (target_kg - current_kg).abs();
    if difference <= TARGET_REACHED_TOLERANCE_KG {
        return 0;
    }
    if weekly_goal_kg <= 0.0 {
        return INDEFINITE_DAYS;
    }
    (difference / weekly_goal_kg * 7.0).ceil() as i64
}

/// Estimated date the target is reached
///
/// Falls back to `now` when no positive day count exists.
pub fn calculate_target_date(
    start_date: DateTime<Utc>,
    current_kg: f64,
    target_kg: f64,
    weekly_goal_kg: f64,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let days = calculate_days_to_target(current_kg, target_kg, weekly_goal_kg);
    if days <= 0 {
        return now;
    }
    start_date + Duration::days(days)
}
