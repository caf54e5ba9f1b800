//! BW Diet Shared Library
//!
//! The metrics & analytics engine: body metric formulas, the weight
//! history ledger, trend analysis, goal projection and rule-based
//! insights, plus the profile state container that ties them together.
//! Everything here is synchronous and free of I/O; persistence is
//! reached only through the [`snapshot::SnapshotStore`] port.

pub mod analytics;
pub mod errors;
pub mod health_metrics;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod projection;
pub mod snapshot;
pub mod state;
pub mod trend;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use analytics::{analyze, AnalyticsReport};
pub use errors::*;
pub use health_metrics::*;
pub use insights::{generate_insights, Insight, InsightKind, InsightType};
pub use ledger::WeightHistoryLedger;
pub use models::{
    ActivityLevel, DietGoals, Gender, GoalType, Language, NotificationPreferences, Preferences,
    PreferencesUpdate, PrivacyPreferences, Profile, ProfileUpdate, Theme, WeightEntry,
    WeightEntryUpdate,
};
pub use projection::{project_goal, GoalProgress};
pub use snapshot::{
    load_state, LoadError, MemorySnapshotStore, PersistedSnapshot, SnapshotStore, SNAPSHOT_KEY,
    SNAPSHOT_VERSION,
};
pub use state::ProfileState;
pub use trend::{analyze_trend, TrendDirection, TrendPrediction, TrendResult};
pub use types::{GoalsRequest, LogWeightRequest, ProfileRequest, UpdateWeightRequest};
pub use units::UnitSystem;
