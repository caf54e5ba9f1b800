//! Integration tests for the diet service over the JSON file store

mod common;

use std::fs;

use bw_diet_app::error::AppError;
use bw_diet_app::services::DietService;
use bw_diet_app::store::JsonFileStore;
use bw_diet_shared::{
    recommended_goals, CoreError, InsightKind, Language, LogWeightRequest, PreferencesUpdate,
    ProfileRequest, TrendDirection, UnitSystem, UpdateWeightRequest,
};
use common::{day, onboarding_request, TestApp};
use uuid::Uuid;

fn log(weight: f64) -> LogWeightRequest {
    LogWeightRequest {
        weight,
        note: None,
        body_fat: None,
    }
}

#[test]
fn test_onboarding_persists_profile_and_goals() {
    let app = TestApp::new();
    let profile = app.service().onboard(onboarding_request()).unwrap();

    let reopened = app.service();
    let state = reopened.state();
    assert!(state.is_onboarded());
    assert_eq!(state.profile(), Some(&profile));
    assert_eq!(state.goals(), Some(&recommended_goals(&profile)));
    assert_eq!(state.bmi(), Some(26.1));
}

#[test]
fn test_invalid_onboarding_changes_nothing() {
    let app = TestApp::new();
    let mut service = app.service();
    let request = ProfileRequest {
        name: None,
        ..onboarding_request()
    };

    let err = service.onboard(request).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(err.is_user_error());
    assert!(service.state().profile().is_none());
    assert!(!app.snapshot_path().exists());
}

#[test]
fn test_out_of_range_profile_field_is_rejected() {
    let app = TestApp::new();
    let mut service = app.service();
    let err = service
        .set_profile(ProfileRequest {
            height: Some(40.0),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, AppError::Core(CoreError::Validation(_))));
}

#[test]
fn test_weight_log_survives_reload_and_removal_restores() {
    let app = TestApp::new();
    app.service().onboard(onboarding_request()).unwrap();

    let entry = app.service().log_weight_at(log(79.2), day(1)).unwrap();
    assert_eq!(app.service().state().current_weight(), Some(79.2));

    let removed = app.service().remove_weight(entry.id).unwrap();
    assert_eq!(removed.id, entry.id);

    let state = app.service().state().clone();
    assert!(state.ledger().is_empty());
    assert_eq!(state.current_weight(), Some(80.0));
}

#[test]
fn test_unknown_entry_is_not_found() {
    let app = TestApp::new();
    let mut service = app.service();
    service.log_weight_at(log(70.0), day(0)).unwrap();

    assert!(matches!(service.remove_weight(Uuid::new_v4()), Err(AppError::NotFound(_))));
    let update = UpdateWeightRequest {
        note: Some("typo".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        service.update_weight(Uuid::new_v4(), update),
        Err(AppError::NotFound(_))
    ));
    assert_eq!(service.state().ledger().len(), 1);
}

#[test]
fn test_update_entry_resorts_history() {
    let app = TestApp::new();
    let mut service = app.service();
    let early = service.log_weight_at(log(71.0), day(0)).unwrap();
    service.log_weight_at(log(70.5), day(1)).unwrap();

    let moved = service
        .update_weight(
            early.id,
            UpdateWeightRequest {
                date: Some(day(2)),
                muscle_mass: Some(31.5),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(moved.muscle_mass, Some(31.5));

    let reopened = app.service();
    assert_eq!(reopened.state().latest_weight_entry().map(|e| e.id), Some(early.id));
}

#[test]
fn test_muscle_mass_cannot_exceed_entry_weight() {
    let app = TestApp::new();
    let mut service = app.service();
    let entry = service.log_weight_at(log(70.0), day(0)).unwrap();

    let err = service
        .update_weight(
            entry.id,
            UpdateWeightRequest {
                muscle_mass: Some(80.0),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(service.state().ledger().get(entry.id).and_then(|e| e.muscle_mass), None);

    // checked against the edited weight when both change
    let updated = service
        .update_weight(
            entry.id,
            UpdateWeightRequest {
                weight: Some(90.0),
                muscle_mass: Some(80.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.muscle_mass, Some(80.0));
}

#[test]
fn test_back_dated_log_keeps_current_weight() {
    let app = TestApp::new();
    let mut service = app.service();
    service.onboard(onboarding_request()).unwrap();
    let latest = service.log_weight_at(log(79.0), day(0)).unwrap();
    service
        .update_weight(
            latest.id,
            UpdateWeightRequest {
                date: Some(day(10)),
                ..Default::default()
            },
        )
        .unwrap();

    let back_dated = service.log_weight_at(log(78.0), day(1)).unwrap();
    assert_eq!(service.state().current_weight(), Some(79.0));

    service.remove_weight(back_dated.id).unwrap();
    let reopened = app.service();
    assert_eq!(reopened.state().current_weight(), Some(79.0));
    assert_eq!(reopened.state().latest_weight_entry().map(|e| e.id), Some(latest.id));
}

#[test]
fn test_imperial_input_is_stored_in_kg() {
    let app = TestApp::new();
    let mut service = app.service();
    service.update_preferences(&PreferencesUpdate {
        units: Some(UnitSystem::Imperial),
        ..Default::default()
    });

    let entry = service.log_weight_at(log(176.0), day(0)).unwrap();
    assert!((entry.weight - 79.832192).abs() < 1e-6);

    // 40 lb is below the 30 kg floor once converted
    assert!(service.log_weight_at(log(40.0), day(1)).is_err());
}

#[test]
fn test_analysis_after_a_week_of_logging() {
    let app = TestApp::new();
    let mut service = app.service();
    service.onboard(onboarding_request()).unwrap();
    service.update_preferences(&PreferencesUpdate {
        language: Some(Language::En),
        ..Default::default()
    });
    for d in 0..8 {
        service
            .log_weight_at(log(80.0 - 0.1 * d as f64), day(d))
            .unwrap();
    }

    let report = app.service().analyze_at(day(7));
    assert_eq!(report.weight_trend.direction, TrendDirection::Decreasing);
    assert!(report
        .insights
        .iter()
        .any(|i| i.kind == InsightKind::SteadyLoss && i.message.contains("0.7 kg/week")));
}

#[test]
fn test_analysis_needs_two_entries() {
    let app = TestApp::new();
    let mut service = app.service();
    service.onboard(onboarding_request()).unwrap();
    service.log_weight_at(log(79.5), day(0)).unwrap();

    let report = service.analyze_at(day(1));
    assert_eq!(report.weight_trend.direction, TrendDirection::Stable);
    assert_eq!(report.weight_trend.prediction.next_week_weight, 79.5);
    assert!(report.insights.is_empty());
}

#[test]
fn test_metrics_require_profile() {
    let app = TestApp::new();
    let mut service = app.service();
    assert!(matches!(service.metrics(), Err(AppError::NotFound(_))));

    service.onboard(onboarding_request()).unwrap();
    let metrics = service.metrics_at(day(0)).unwrap();
    // 10 kg at 0.5 kg/week
    assert_eq!(metrics.days_to_target, Some(140));
    assert_eq!(metrics.bmi, Some(26.1));
    assert!(metrics.daily_calorie_target >= 1200.0);
}

#[test]
fn test_failed_save_keeps_change_and_flush_reports() {
    let app = TestApp::new();
    let parent = app.dir.path().join("nested");
    let store = JsonFileStore::new(parent.join("user.json"), true);
    let mut service = DietService::open(store).unwrap();

    // A regular file where the parent directory should be
    fs::write(&parent, "not a directory").unwrap();
    let entry = service.log_weight_at(log(70.0), day(0)).unwrap();

    assert!(service.is_dirty());
    assert_eq!(service.state().latest_weight_entry().map(|e| e.id), Some(entry.id));
    assert!(matches!(service.flush(), Err(AppError::Storage(_))));
}

#[test]
fn test_reset_clears_stored_state() {
    let app = TestApp::new();
    app.service().onboard(onboarding_request()).unwrap();
    app.service().log_weight_at(log(79.0), day(1)).unwrap();

    app.service().reset();

    let state = app.service().state().clone();
    assert!(!state.is_onboarded());
    assert!(state.profile().is_none());
    assert!(state.ledger().is_empty());
}

#[test]
fn test_newer_snapshot_schema_refuses_to_open() {
    let app = TestApp::new();
    fs::write(app.snapshot_path(), r#"{ "state": {}, "version": 9 }"#).unwrap();
    let result = DietService::open(JsonFileStore::new(app.snapshot_path(), true));
    assert!(matches!(result, Err(AppError::Core(CoreError::UnsupportedSchema(9)))));
}
