//! Data models for the BW Diet engine
//!
//! Field names serialize in camelCase so a snapshot written by the
//! browser front end loads unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::health_metrics::{calculate_bmi, calculate_bmr, calculate_tdee};
use crate::units::UnitSystem;

// ============================================================================
// Profile enums
// ============================================================================

/// Gender used by the BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    #[default]
    Female,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Activity level tiers, ordered from least to most active
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little to no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    #[default]
    Moderate,
    /// Heavy exercise 6-7 days/week
    Active,
    /// Very heavy exercise, physical job
    VeryActive,
}

impl ActivityLevel {
    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" => Ok(ActivityLevel::VeryActive),
            _ => Err(format!(
                "Unknown activity level: {} (expected sedentary, light, moderate, active, very_active)",
                s
            )),
        }
    }
}

/// Direction of the weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    #[default]
    Lose,
    Maintain,
    Gain,
}

impl std::str::FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lose" => Ok(GoalType::Lose),
            "maintain" => Ok(GoalType::Maintain),
            "gain" => Ok(GoalType::Gain),
            _ => Err(format!("Unknown goal type: {}", s)),
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

/// User profile with derived body metrics
///
/// `bmi`, `bmr` and `tdee` are private: they are recomputed from the
/// input fields every time a new profile record is built and can only
/// be read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub age: u32,
    pub gender: Gender,
    /// Height in centimeters
    pub height: f64,
    /// Current weight in kilograms
    pub current_weight: f64,
    /// Target weight in kilograms
    pub target_weight: f64,
    pub activity_level: ActivityLevel,
    pub goal_type: GoalType,
    /// Weekly change goal in kg/week (non-negative magnitude)
    pub weekly_goal: f64,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    bmi: f64,
    #[serde(default)]
    bmr: f64,
    #[serde(default)]
    tdee: f64,
}

impl Profile {
    /// Build the first profile from onboarding defaults
    pub fn with_defaults(id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: String::new(),
            email: None,
            age: 25,
            gender: Gender::Female,
            height: 160.0,
            current_weight: 60.0,
            target_weight: 55.0,
            activity_level: ActivityLevel::Moderate,
            goal_type: GoalType::Lose,
            weekly_goal: 0.5,
            start_date: now,
            target_date: None,
            bmi: 0.0,
            bmr: 0.0,
            tdee: 0.0,
        }
        .recomputed()
    }

    /// Build a new profile record from this one plus a partial update
    pub fn apply(&self, update: &ProfileUpdate) -> Self {
        let mut next = self.clone();
        if let Some(name) = &update.name {
            next.name = name.clone();
        }
        if let Some(email) = &update.email {
            next.email = Some(email.clone());
        }
        if let Some(age) = update.age {
            next.age = age;
        }
        if let Some(gender) = update.gender {
            next.gender = gender;
        }
        if let Some(height) = update.height {
            next.height = height;
        }
        if let Some(weight) = update.current_weight {
            next.current_weight = weight;
        }
        if let Some(target) = update.target_weight {
            next.target_weight = target;
        }
        if let Some(level) = update.activity_level {
            next.activity_level = level;
        }
        if let Some(goal_type) = update.goal_type {
            next.goal_type = goal_type;
        }
        if let Some(weekly) = update.weekly_goal {
            next.weekly_goal = weekly;
        }
        if let Some(start) = update.start_date {
            next.start_date = start;
        }
        if let Some(target_date) = update.target_date {
            next.target_date = Some(target_date);
        }
        next.recomputed()
    }

    /// Build a new profile record with a different current weight
    pub fn with_current_weight(&self, weight_kg: f64) -> Self {
        Self {
            current_weight: weight_kg,
            ..self.clone()
        }
        .recomputed()
    }

    /// Recompute the derived metrics from the input fields
    pub(crate) fn recomputed(mut self) -> Self {
        self.bmi = calculate_bmi(self.current_weight, self.height);
        self.bmr = calculate_bmr(self.current_weight, self.height, self.age, self.gender);
        self.tdee = calculate_tdee(self.bmr, self.activity_level);
        self
    }

    /// Body mass index (0 when inputs are out of domain)
    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    /// Basal metabolic rate in kcal/day (0 when inputs are out of domain)
    pub fn bmr(&self) -> f64 {
        self.bmr
    }

    /// Total daily energy expenditure in kcal/day (0 when inputs are out of domain)
    pub fn tdee(&self) -> f64 {
        self.tdee
    }
}

/// Partial profile update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goal_type: Option<GoalType>,
    pub weekly_goal: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub target_date: Option<NaiveDate>,
}

impl ProfileUpdate {
    /// True when the update carries no field at all
    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }
}

// ============================================================================
// Weight entries
// ============================================================================

/// A dated weight observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub id: Uuid,
    /// Owning profile; absent when recorded before a profile existed
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub user_id: Option<Uuid>,
    /// Weight in kilograms
    pub weight: f64,
    #[serde(rename = "date")]
    pub recorded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_mass: Option<f64>,
    /// Profile weight this entry replaced when it was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) displaced_weight: Option<f64>,
}

impl WeightEntry {
    /// Create a fresh entry stamped at `now`
    pub fn record(
        user_id: Option<Uuid>,
        weight: f64,
        note: Option<String>,
        body_fat: Option<f64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            weight,
            recorded_at: now,
            note,
            body_fat,
            muscle_mass: None,
            displaced_weight: None,
        }
    }

    /// Build a new entry record from this one plus a partial update
    pub fn apply(&self, update: &WeightEntryUpdate) -> Self {
        let mut next = self.clone();
        if let Some(weight) = update.weight {
            next.weight = weight;
        }
        if let Some(recorded_at) = update.recorded_at {
            next.recorded_at = recorded_at;
        }
        if let Some(note) = &update.note {
            next.note = Some(note.clone());
        }
        if let Some(body_fat) = update.body_fat {
            next.body_fat = Some(body_fat);
        }
        if let Some(muscle_mass) = update.muscle_mass {
            next.muscle_mass = Some(muscle_mass);
        }
        next
    }
}

/// Partial weight entry update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightEntryUpdate {
    pub weight: Option<f64>,
    pub recorded_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub body_fat: Option<f64>,
    pub muscle_mass: Option<f64>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// Diet goals
// ============================================================================

/// Daily nutrition targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietGoals {
    /// kcal/day
    pub daily_calorie_target: f64,
    /// grams/day
    pub protein_target: f64,
    /// grams/day
    pub carb_target: f64,
    /// grams/day
    pub fat_target: f64,
    /// ml/day
    pub water_target: f64,
}

// ============================================================================
// Preferences
// ============================================================================

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ko" | "korean" => Ok(Language::Ko),
            "en" | "english" => Ok(Language::En),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub weight_reminder: bool,
    pub meal_reminder: bool,
    pub exercise_reminder: bool,
    pub weekly_report: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            weight_reminder: true,
            meal_reminder: true,
            exercise_reminder: false,
            weekly_report: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyPreferences {
    pub share_progress: bool,
    pub public_profile: bool,
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub units: UnitSystem,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub notifications: NotificationPreferences,
    #[serde(default)]
    pub privacy: PrivacyPreferences,
}

impl Preferences {
    /// Shallow merge: nested groups are replaced whole
    pub fn apply(&self, update: &PreferencesUpdate) -> Self {
        Self {
            units: update.units.unwrap_or(self.units),
            language: update.language.unwrap_or(self.language),
            theme: update.theme.unwrap_or(self.theme),
            notifications: update.notifications.unwrap_or(self.notifications),
            privacy: update.privacy.unwrap_or(self.privacy),
        }
    }
}

/// Partial preferences update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferencesUpdate {
    pub units: Option<UnitSystem>,
    pub language: Option<Language>,
    pub theme: Option<Theme>,
    pub notifications: Option<NotificationPreferences>,
    pub privacy: Option<PrivacyPreferences>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_onboarding_form() {
        let now = Utc::now();
        let profile = Profile::with_defaults(Uuid::new_v4(), now);
        assert_eq!(profile.age, 25);
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.goal_type, GoalType::Lose);
        assert_eq!(profile.start_date, now);
        // 60kg at 160cm
        assert_eq!(profile.bmi(), 23.4);
        assert!(profile.tdee() > profile.bmr());
    }

    #[test]
    fn test_apply_recomputes_derived_metrics() {
        let profile = Profile::with_defaults(Uuid::new_v4(), Utc::now());
        let updated = profile.apply(&ProfileUpdate {
            current_weight: Some(70.0),
            height: Some(170.0),
            ..Default::default()
        });
        assert_eq!(updated.bmi(), 24.2);
        assert_ne!(updated.bmr(), profile.bmr());
        // the source record is untouched
        assert_eq!(profile.current_weight, 60.0);
    }

    #[test]
    fn test_activity_level_ordering() {
        assert!(ActivityLevel::Sedentary < ActivityLevel::Light);
        assert!(ActivityLevel::Active < ActivityLevel::VeryActive);
        assert_eq!("very_active".parse::<ActivityLevel>(), Ok(ActivityLevel::VeryActive));
        assert_eq!("very-active".parse::<ActivityLevel>(), Ok(ActivityLevel::VeryActive));
    }

    #[test]
    fn test_entry_accepts_empty_user_id() {
        let json = r#"{
            "id": "6f1c2b43-64f0-4b53-9b1e-8f6a2f7c9d10",
            "userId": "",
            "weight": 72.5,
            "date": "2024-03-01T08:00:00.000Z"
        }"#;
        let entry: WeightEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.user_id, None);
        assert_eq!(entry.weight, 72.5);
        assert_eq!(entry.note, None);
    }

    #[test]
    fn test_preferences_shallow_merge() {
        let prefs = Preferences::default();
        let merged = prefs.apply(&PreferencesUpdate {
            language: Some(Language::En),
            privacy: Some(PrivacyPreferences {
                share_progress: true,
                public_profile: false,
            }),
            ..Default::default()
        });
        assert_eq!(merged.language, Language::En);
        assert!(merged.privacy.share_progress);
        assert_eq!(merged.theme, Theme::Light);
        assert!(merged.notifications.weight_reminder);
    }
}
