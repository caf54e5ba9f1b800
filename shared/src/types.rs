//! Boundary request types
//!
//! What a user submits, in kg and cm. Each request validates with the
//! `validator` derive and then converts into the partial update the
//! state container applies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::CoreResult;
use crate::models::{
    ActivityLevel, DietGoals, Gender, GoalType, ProfileUpdate, WeightEntryUpdate,
};
use crate::units::UnitSystem;

/// Profile form submission; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(range(min = 15, max = 100))]
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    #[validate(range(min = 100.0, max = 250.0))]
    pub height: Option<f64>,
    #[validate(range(min = 30.0, max = 300.0))]
    pub current_weight: Option<f64>,
    #[validate(range(min = 30.0, max = 300.0))]
    pub target_weight: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goal_type: Option<GoalType>,
    #[validate(range(min = 0.1, max = 2.0))]
    pub weekly_goal: Option<f64>,
    pub target_date: Option<NaiveDate>,
}

impl ProfileRequest {
    /// Convert weight and height from display units to kg and cm
    pub fn normalized(mut self, units: UnitSystem) -> Self {
        self.height = self.height.map(|v| units.input_height(v));
        self.current_weight = self.current_weight.map(|v| units.input_weight(v));
        self.target_weight = self.target_weight.map(|v| units.input_weight(v));
        self.weekly_goal = self.weekly_goal.map(|v| units.input_weight(v));
        self
    }

    /// Validate, then convert into a profile update
    pub fn into_update(self) -> CoreResult<ProfileUpdate> {
        self.validate()?;
        Ok(ProfileUpdate {
            name: self.name.map(|n| n.trim().to_string()),
            email: self.email,
            age: self.age,
            gender: self.gender,
            height: self.height,
            current_weight: self.current_weight,
            target_weight: self.target_weight,
            activity_level: self.activity_level,
            goal_type: self.goal_type,
            weekly_goal: self.weekly_goal,
            start_date: None,
            target_date: self.target_date,
        })
    }
}

/// New weight observation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogWeightRequest {
    #[validate(range(min = 30.0, max = 300.0))]
    pub weight: f64,
    #[validate(length(max = 200))]
    pub note: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub body_fat: Option<f64>,
}

impl LogWeightRequest {
    pub fn normalized(mut self, units: UnitSystem) -> Self {
        self.weight = units.input_weight(self.weight);
        self
    }

    /// Validated `(weight, note, body_fat)` ready for the ledger
    pub fn into_parts(self) -> CoreResult<(f64, Option<String>, Option<f64>)> {
        self.validate()?;
        let note = self.note.filter(|n| !n.trim().is_empty());
        Ok((self.weight, note, self.body_fat))
    }
}

/// Edit of an existing weight entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWeightRequest {
    #[validate(range(min = 30.0, max = 300.0))]
    pub weight: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    #[validate(length(max = 200))]
    pub note: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub body_fat: Option<f64>,
    #[validate(range(min = 0.0, max = 300.0))]
    pub muscle_mass: Option<f64>,
}

impl UpdateWeightRequest {
    pub fn normalized(mut self, units: UnitSystem) -> Self {
        self.weight = self.weight.map(|v| units.input_weight(v));
        self.muscle_mass = self.muscle_mass.map(|v| units.input_weight(v));
        self
    }

    pub fn into_update(self) -> CoreResult<WeightEntryUpdate> {
        self.validate()?;
        Ok(WeightEntryUpdate {
            weight: self.weight,
            recorded_at: self.date,
            note: self.note,
            body_fat: self.body_fat,
            muscle_mass: self.muscle_mass,
        })
    }
}

/// Manually entered daily nutrition targets
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GoalsRequest {
    #[validate(range(min = 800.0, max = 6000.0))]
    pub daily_calorie_target: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub protein_target: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub carb_target: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub fat_target: f64,
    #[validate(range(min = 0.0, max = 10000.0))]
    pub water_target: f64,
}

impl GoalsRequest {
    pub fn into_goals(self) -> CoreResult<DietGoals> {
        self.validate()?;
        Ok(DietGoals {
            daily_calorie_target: self.daily_calorie_target,
            protein_target: self.protein_target,
            carb_target: self.carb_target,
            fat_target: self.fat_target,
            water_target: self.water_target,
        })
    }
}
