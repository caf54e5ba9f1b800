//! Profile state container
//!
//! Owns the profile, diet goals, preferences and weight ledger, and
//! exposes the computed accessors the display layer reads.
//!
//! # Design Principles
//!
//! 1. **Replace, never patch**: every mutation builds new records and
//!    swaps them in whole
//! 2. **Cheap cloning**: all fields are `Arc`-backed, so a clone is a
//!    consistent snapshot that later mutations cannot disturb
//! 3. **No persistence inside**: loading and saving go through
//!    [`crate::snapshot`]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::ledger::WeightHistoryLedger;
use crate::models::{
    DietGoals, Preferences, PreferencesUpdate, Profile, ProfileUpdate, WeightEntry,
    WeightEntryUpdate,
};
use crate::projection::progress_percentage;

/// Owner of all persisted user state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    profile: Option<Arc<Profile>>,
    goals: Option<Arc<DietGoals>>,
    preferences: Arc<Preferences>,
    ledger: WeightHistoryLedger,
    is_onboarded: bool,
}

impl ProfileState {
    /// Empty first-run state
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a state from loaded parts; derived metrics are recomputed
    pub fn from_parts(
        profile: Option<Profile>,
        goals: Option<DietGoals>,
        preferences: Preferences,
        weight_history: Vec<WeightEntry>,
        is_onboarded: bool,
    ) -> Self {
        Self {
            profile: profile.map(|p| Arc::new(p.recomputed())),
            goals: goals.map(Arc::new),
            preferences: Arc::new(preferences),
            ledger: WeightHistoryLedger::from_entries(weight_history),
            is_onboarded,
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Merge a partial profile update, creating the profile if needed
    pub fn set_profile(&mut self, update: &ProfileUpdate) -> &Profile {
        self.set_profile_at(update, Utc::now())
    }

    /// [`Self::set_profile`] with an explicit clock for new profiles
    pub fn set_profile_at(&mut self, update: &ProfileUpdate, now: DateTime<Utc>) -> &Profile {
        let base = match &self.profile {
            Some(existing) => existing.as_ref().clone(),
            None => Profile::with_defaults(Uuid::new_v4(), now),
        };
        self.profile.insert(Arc::new(base.apply(update)))
    }

    pub fn set_goals(&mut self, goals: DietGoals) {
        self.goals = Some(Arc::new(goals));
    }

    pub fn update_preferences(&mut self, update: &PreferencesUpdate) -> &Preferences {
        self.preferences = Arc::new(self.preferences.apply(update));
        &self.preferences
    }

    /// Record a weight observation stamped now
    pub fn add_weight_entry(
        &mut self,
        weight: f64,
        note: Option<String>,
        body_fat: Option<f64>,
    ) -> WeightEntry {
        self.add_weight_entry_at(weight, note, body_fat, Utc::now())
    }

    /// Record a weight observation stamped at `now`
    ///
    /// When the entry is the most recent one, its weight becomes the
    /// profile's current weight and the weight it replaces is
    /// remembered on the entry. A back-dated entry leaves the current
    /// weight alone.
    pub fn add_weight_entry_at(
        &mut self,
        weight: f64,
        note: Option<String>,
        body_fat: Option<f64>,
        now: DateTime<Utc>,
    ) -> WeightEntry {
        let mut entry = WeightEntry::record(self.profile.as_ref().map(|p| p.id), weight, note, body_fat, now);
        entry.displaced_weight = self.profile.as_ref().map(|p| p.current_weight);
        let id = entry.id;

        let ledger = self.ledger.with_entry(entry.clone());
        if ledger.latest().is_some_and(|e| e.id == id) {
            if let Some(profile) = &self.profile {
                self.profile = Some(Arc::new(profile.with_current_weight(weight)));
            }
        }

        let stored = ledger.get(id).cloned().unwrap_or(entry);
        self.ledger = ledger;
        stored
    }

    /// Remove an entry by id; unknown ids are ignored
    ///
    /// Removing the most recent entry restores the current weight it
    /// replaced, falling back to the next most recent entry.
    pub fn remove_weight_entry(&mut self, id: Uuid) -> Option<WeightEntry> {
        let was_latest = self.ledger.latest().is_some_and(|e| e.id == id);
        let (ledger, removed) = self.ledger.without(id)?;

        if was_latest {
            let restored = removed
                .displaced_weight
                .or_else(|| ledger.latest().map(|e| e.weight));
            if let (Some(profile), Some(weight)) = (&self.profile, restored) {
                self.profile = Some(Arc::new(profile.with_current_weight(weight)));
            }
        }

        self.ledger = ledger;
        Some(removed)
    }

    /// Merge fields into an entry; returns false for unknown ids
    pub fn update_weight_entry(&mut self, id: Uuid, update: &WeightEntryUpdate) -> bool {
        match self.ledger.with_update(id, update) {
            Some(ledger) => {
                self.ledger = ledger;
                true
            }
            None => false,
        }
    }

    pub fn complete_onboarding(&mut self) {
        self.is_onboarded = true;
    }

    /// Drop everything back to first-run state
    pub fn reset_user(&mut self) {
        *self = Self::new();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_deref()
    }

    pub fn goals(&self) -> Option<&DietGoals> {
        self.goals.as_deref()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn ledger(&self) -> &WeightHistoryLedger {
        &self.ledger
    }

    pub fn is_onboarded(&self) -> bool {
        self.is_onboarded
    }

    /// Current weight, `None` without a profile
    pub fn current_weight(&self) -> Option<f64> {
        self.profile()
            .map(|p| p.current_weight)
            .filter(|w| *w > 0.0)
    }

    pub fn latest_weight_entry(&self) -> Option<&WeightEntry> {
        self.ledger.latest()
    }

    /// Raw progress toward the target weight, in percent
    ///
    /// The start weight is the oldest ledger entry, or the current
    /// weight when the ledger is empty. Not clamped.
    pub fn weight_progress(&self) -> f64 {
        let Some(profile) = self.profile() else {
            return 0.0;
        };
        let start = self
            .ledger
            .oldest()
            .map(|e| e.weight)
            .unwrap_or(profile.current_weight);
        progress_percentage(profile.goal_type, start, profile.current_weight, profile.target_weight)
    }

    pub fn bmi(&self) -> Option<f64> {
        self.profile().map(Profile::bmi).filter(|v| *v > 0.0)
    }

    pub fn bmr(&self) -> Option<f64> {
        self.profile().map(Profile::bmr).filter(|v| *v > 0.0)
    }

    pub fn tdee(&self) -> Option<f64> {
        self.profile().map(Profile::tdee).filter(|v| *v > 0.0)
    }
}
