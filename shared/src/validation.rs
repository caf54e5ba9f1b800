//! Input validation functions
//!
//! Range checks used at the boundary before anything reaches
//! [`crate::state::ProfileState`]. The engine itself never rejects
//! numeric input; out-of-domain values only produce sentinel results.
//! Request structs in [`crate::types`] use the `validator` derive for the
//! same ranges.

use crate::models::{GoalType, Language, Profile};

pub const MIN_AGE: u32 = 15;
pub const MAX_AGE: u32 = 100;
pub const MIN_HEIGHT_CM: f64 = 100.0;
pub const MAX_HEIGHT_CM: f64 = 250.0;
pub const MIN_WEIGHT_KG: f64 = 30.0;
pub const MAX_WEIGHT_KG: f64 = 300.0;
pub const MIN_WEEKLY_GOAL_KG: f64 = 0.1;
pub const MAX_WEEKLY_GOAL_KG: f64 = 2.0;

fn check_range(value: f64, min: f64, max: f64, what: &str, unit: &str) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be a valid number", what));
    }
    if value < min {
        return Err(format!("{} must be at least {} {}", what, min, unit));
    }
    if value > max {
        return Err(format!("{} must be at most {} {}", what, max, unit));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if name.chars().count() > 50 {
        return Err("Name too long".to_string());
    }
    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    let email_regex = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|e| format!("Email pattern failed to compile: {}", e))?;
    if !email_regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

pub fn validate_age(age: u32) -> Result<(), String> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(format!("Age must be between {} and {}", MIN_AGE, MAX_AGE));
    }
    Ok(())
}

pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    check_range(height_cm, MIN_HEIGHT_CM, MAX_HEIGHT_CM, "Height", "cm")
}

pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    check_range(weight_kg, MIN_WEIGHT_KG, MAX_WEIGHT_KG, "Weight", "kg")
}

pub fn validate_target_weight(weight_kg: f64) -> Result<(), String> {
    check_range(weight_kg, MIN_WEIGHT_KG, MAX_WEIGHT_KG, "Target weight", "kg")
}

/// Weekly goal in kg/week
pub fn validate_weekly_goal(kg_per_week: f64) -> Result<(), String> {
    check_range(kg_per_week, MIN_WEEKLY_GOAL_KG, MAX_WEEKLY_GOAL_KG, "Weekly goal", "kg")
}

/// Muscle mass cannot exceed the weight it was measured with
pub fn validate_muscle_mass(muscle_kg: f64, weight_kg: f64) -> Result<(), String> {
    if !muscle_kg.is_finite() || muscle_kg < 0.0 {
        return Err("Muscle mass must be a positive number".to_string());
    }
    if muscle_kg > weight_kg {
        return Err("Muscle mass cannot exceed body weight".to_string());
    }
    Ok(())
}

/// Validate a complete profile, collecting every failing field
///
/// The weekly goal is only checked for loss and gain goals; maintenance
/// profiles may carry 0.
pub fn validate_profile(profile: &Profile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut check = |field: &str, result: Result<(), String>| {
        if let Err(message) = result {
            errors.push(ValidationError::new(field, &message));
        }
    };

    check("name", validate_name(&profile.name));
    if let Some(email) = &profile.email {
        check("email", validate_email(email));
    }
    check("age", validate_age(profile.age));
    check("height", validate_height_cm(profile.height));
    check("currentWeight", validate_weight(profile.current_weight));
    check("targetWeight", validate_target_weight(profile.target_weight));
    if profile.goal_type != GoalType::Maintain {
        check("weeklyGoal", validate_weekly_goal(profile.weekly_goal));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map field names to display labels
pub fn get_field_display_label(field_name: &str, language: Language) -> &str {
    match (field_name, language) {
        ("name", Language::Ko) => "이름",
        ("name", Language::En) => "Name",
        ("email", Language::Ko) => "이메일",
        ("email", Language::En) => "Email",
        ("age", Language::Ko) => "나이",
        ("age", Language::En) => "Age",
        ("height", Language::Ko) => "키",
        ("height", Language::En) => "Height",
        ("currentWeight" | "weight", Language::Ko) => "현재 체중",
        ("currentWeight" | "weight", Language::En) => "Current Weight",
        ("targetWeight", Language::Ko) => "목표 체중",
        ("targetWeight", Language::En) => "Target Weight",
        ("weeklyGoal", Language::Ko) => "주간 목표",
        ("weeklyGoal", Language::En) => "Weekly Goal",
        ("bodyFat", Language::Ko) => "체지방률",
        ("bodyFat", Language::En) => "Body Fat",
        ("muscleMass", Language::Ko) => "근육량",
        ("muscleMass", Language::En) => "Muscle Mass",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self, language: Language) -> String {
        format!("{}: {}", get_field_display_label(&self.field, language), self.message)
    }
}
