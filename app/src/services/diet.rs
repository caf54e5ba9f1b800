//! Diet service
//!
//! Applies user-facing mutations to the profile state: validates the
//! request, converts display units to kg/cm, swaps in the new state and
//! hands a fresh snapshot to the store. Reads never touch the store.
//!
//! A failed save does not undo the mutation. The failure is logged, the
//! service stays dirty, and [`DietService::flush`] retries and reports it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bw_diet_shared::projection::clamp_percentage;
use bw_diet_shared::validation::{validate_muscle_mass, validate_profile};
use bw_diet_shared::{
    analyze, calculate_daily_calorie_target, calculate_days_to_target, calculate_target_date,
    classify_bmi, load_state, recommended_goals, AnalyticsReport, BmiCategory, DietGoals,
    GoalsRequest, LogWeightRequest, PersistedSnapshot, Preferences, PreferencesUpdate, Profile,
    ProfileRequest, ProfileState, SnapshotStore, UpdateWeightRequest, WeightEntry,
    INDEFINITE_DAYS,
};

use crate::error::{AppError, AppResult};

/// Computed body metrics for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub current_weight: f64,
    pub target_weight: f64,
    pub bmi: Option<f64>,
    pub bmi_category: Option<BmiCategory>,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub daily_calorie_target: f64,
    /// `None` when no positive weekly goal is set
    pub days_to_target: Option<i64>,
    pub estimated_target_date: DateTime<Utc>,
    pub progress_percent: f64,
}

pub struct DietService<S: SnapshotStore> {
    store: S,
    state: ProfileState,
    dirty: bool,
}

impl<S> DietService<S>
where
    S: SnapshotStore,
    AppError: From<S::Error>,
{
    /// Load the stored state, or start fresh on first run
    pub fn open(store: S) -> AppResult<Self> {
        let state = load_state(&store)?;
        debug!(
            onboarded = state.is_onboarded(),
            entries = state.ledger().len(),
            "Opened diet state"
        );
        Ok(Self {
            store,
            state,
            dirty: false,
        })
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    /// True while a save has failed and not yet been retried
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn profile_required(&self) -> AppResult<&Profile> {
        self.state
            .profile()
            .ok_or_else(|| AppError::NotFound("No profile yet; run `onboard` or `profile set` first".to_string()))
    }

    /// Hand the current state to the store
    fn persist(&mut self) {
        match self.store.save(&PersistedSnapshot::capture(&self.state)) {
            Ok(()) => self.dirty = false,
            Err(e) => {
                warn!(error = %e, "Failed to save snapshot; changes are kept in memory");
                self.dirty = true;
            }
        }
    }

    /// Retry a failed save, reporting the error if it fails again
    pub fn flush(&mut self) -> AppResult<()> {
        if !self.dirty {
            return Ok(());
        }
        self.store
            .save(&PersistedSnapshot::capture(&self.state))
            .map_err(AppError::from)?;
        self.dirty = false;
        info!("Saved snapshot after earlier failure");
        Ok(())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Merge profile fields given in display units
    pub fn set_profile(&mut self, request: ProfileRequest) -> AppResult<Profile> {
        let units = self.state.preferences().units;
        let update = request.normalized(units).into_update()?;
        if update.is_empty() {
            return Err(AppError::Validation("No profile fields given".to_string()));
        }
        let profile = self.state.set_profile(&update).clone();
        info!(
            profile_id = %profile.id,
            bmi = profile.bmi(),
            tdee = profile.tdee(),
            "Profile updated"
        );
        self.persist();
        Ok(profile)
    }

    pub fn set_goals(&mut self, request: GoalsRequest) -> AppResult<DietGoals> {
        let goals = request.into_goals()?;
        self.state.set_goals(goals.clone());
        info!(calories = goals.daily_calorie_target, "Diet goals set");
        self.persist();
        Ok(goals)
    }

    /// Replace diet goals with ones derived from the profile
    pub fn recommend_goals(&mut self) -> AppResult<DietGoals> {
        let goals = recommended_goals(self.profile_required()?);
        self.state.set_goals(goals.clone());
        info!(calories = goals.daily_calorie_target, "Recommended diet goals applied");
        self.persist();
        Ok(goals)
    }

    pub fn log_weight(&mut self, request: LogWeightRequest) -> AppResult<WeightEntry> {
        self.log_weight_at(request, Utc::now())
    }

    /// Record a weight given in display units, stamped at `now`
    pub fn log_weight_at(&mut self, request: LogWeightRequest, now: DateTime<Utc>) -> AppResult<WeightEntry> {
        let units = self.state.preferences().units;
        let (weight, note, body_fat) = request.normalized(units).into_parts()?;
        let entry = self.state.add_weight_entry_at(weight, note, body_fat, now);
        info!(entry_id = %entry.id, weight = entry.weight, "Weight logged");
        self.persist();
        Ok(entry)
    }

    pub fn remove_weight(&mut self, id: Uuid) -> AppResult<WeightEntry> {
        let removed = self
            .state
            .remove_weight_entry(id)
            .ok_or_else(|| AppError::NotFound(format!("Weight entry {}", id)))?;
        info!(
            entry_id = %id,
            current_weight = ?self.state.current_weight(),
            "Weight entry removed"
        );
        self.persist();
        Ok(removed)
    }

    pub fn update_weight(&mut self, id: Uuid, request: UpdateWeightRequest) -> AppResult<WeightEntry> {
        let units = self.state.preferences().units;
        let update = request.normalized(units).into_update()?;
        let existing = self
            .state
            .ledger()
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Weight entry {}", id)))?;
        if let Some(muscle_mass) = update.muscle_mass {
            let weight = update.weight.unwrap_or(existing.weight);
            validate_muscle_mass(muscle_mass, weight).map_err(AppError::Validation)?;
        }
        if !self.state.update_weight_entry(id, &update) {
            return Err(AppError::NotFound(format!("Weight entry {}", id)));
        }
        let entry = self
            .state
            .ledger()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Weight entry {}", id)))?;
        info!(entry_id = %id, weight = entry.weight, "Weight entry updated");
        self.persist();
        Ok(entry)
    }

    pub fn update_preferences(&mut self, update: &PreferencesUpdate) -> Preferences {
        let preferences = self.state.update_preferences(update).clone();
        info!(
            units = %preferences.units,
            language = ?preferences.language,
            "Preferences updated"
        );
        self.persist();
        preferences
    }

    /// Create the profile, apply recommended goals and mark onboarding done
    ///
    /// The profile must pass full validation before anything changes.
    pub fn onboard(&mut self, request: ProfileRequest) -> AppResult<Profile> {
        let units = self.state.preferences().units;
        let update = request.normalized(units).into_update()?;

        let mut candidate = self.state.clone();
        let profile = candidate.set_profile(&update).clone();
        if let Err(errors) = validate_profile(&profile) {
            let language = self.state.preferences().language;
            let messages: Vec<String> = errors.iter().map(|e| e.user_message(language)).collect();
            return Err(AppError::Validation(messages.join("; ")));
        }

        candidate.set_goals(recommended_goals(&profile));
        candidate.complete_onboarding();
        self.state = candidate;
        info!(profile_id = %profile.id, "Onboarding completed");
        self.persist();
        Ok(profile)
    }

    /// Drop all user data
    pub fn reset(&mut self) {
        self.state.reset_user();
        info!("User data reset");
        self.persist();
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn metrics(&self) -> AppResult<MetricsSummary> {
        self.metrics_at(Utc::now())
    }

    pub fn metrics_at(&self, now: DateTime<Utc>) -> AppResult<MetricsSummary> {
        let profile = self.profile_required()?;
        let bmi = self.state.bmi();
        let days = calculate_days_to_target(
            profile.current_weight,
            profile.target_weight,
            profile.weekly_goal,
        );
        Ok(MetricsSummary {
            current_weight: profile.current_weight,
            target_weight: profile.target_weight,
            bmi,
            bmi_category: bmi.map(classify_bmi),
            bmr: self.state.bmr(),
            tdee: self.state.tdee(),
            daily_calorie_target: calculate_daily_calorie_target(
                profile.tdee(),
                profile.goal_type,
                profile.weekly_goal,
            ),
            days_to_target: (days != INDEFINITE_DAYS).then_some(days),
            estimated_target_date: calculate_target_date(
                profile.start_date,
                profile.current_weight,
                profile.target_weight,
                profile.weekly_goal,
                now,
            ),
            progress_percent: clamp_percentage(self.state.weight_progress()),
        })
    }

    pub fn analyze(&self) -> AnalyticsReport {
        self.analyze_at(Utc::now())
    }

    pub fn analyze_at(&self, now: DateTime<Utc>) -> AnalyticsReport {
        analyze(&self.state, now)
    }
}
