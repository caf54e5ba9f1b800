//! Common test utilities for integration tests
//!
//! Each test gets its own temp directory holding the snapshot file.

use std::path::PathBuf;

use bw_diet_app::services::DietService;
use bw_diet_app::store::JsonFileStore;
use bw_diet_shared::ProfileRequest;
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

/// Test application wrapper
pub struct TestApp {
    pub dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.path().join("bw-diet-user-storage.json")
    }

    /// Open a fresh service over the snapshot file, as each CLI run does
    pub fn service(&self) -> DietService<JsonFileStore> {
        DietService::open(JsonFileStore::new(self.snapshot_path(), true))
            .expect("Failed to open service")
    }
}

pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 7, 30, 0).unwrap() + chrono::Duration::days(n)
}

/// A complete onboarding form: 80 kg toward 70 kg at 0.5 kg/week
pub fn onboarding_request() -> ProfileRequest {
    ProfileRequest {
        name: Some("Jiwoo".to_string()),
        email: Some("jiwoo@example.com".to_string()),
        age: Some(30),
        gender: Some(bw_diet_shared::Gender::Male),
        height: Some(175.0),
        current_weight: Some(80.0),
        target_weight: Some(70.0),
        activity_level: Some(bw_diet_shared::ActivityLevel::Light),
        goal_type: Some(bw_diet_shared::GoalType::Lose),
        weekly_goal: Some(0.5),
        target_date: None,
    }
}
