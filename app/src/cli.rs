//! Command line front end
//!
//! Every mutating command loads the snapshot, applies one mutation
//! through [`DietService`] and saves. Output goes to any `Write` so the
//! commands can be driven from tests.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use uuid::Uuid;

use bw_diet_shared::{
    calculate_bmi, calculate_bmr, calculate_calories_burned, calculate_daily_calorie_target,
    calculate_days_to_target, calculate_target_date, calculate_tdee, classify_bmi, ActivityLevel,
    AnalyticsReport, DietGoals, Gender, GoalType, GoalsRequest, Language, LogWeightRequest,
    NotificationPreferences, Preferences, PreferencesUpdate, PrivacyPreferences, Profile,
    ProfileRequest, SnapshotStore, Theme, UnitSystem, UpdateWeightRequest, WeightEntry,
    INDEFINITE_DAYS,
};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::services::{DietService, ExportService, MetricsSummary};

/// BW Diet - body metrics and weight analytics
#[derive(Parser, Debug)]
#[command(name = "bw-diet")]
#[command(version, about = "Track weight and body metrics, and get trend insights", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Snapshot file override (defaults to storage.path)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Profile management
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Daily nutrition targets
    Goals {
        #[command(subcommand)]
        action: GoalsCommand,
    },

    /// Weight history
    Weight {
        #[command(subcommand)]
        action: WeightCommand,
    },

    /// Display preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsCommand,
    },

    /// Create the profile, apply recommended goals and finish onboarding
    Onboard(ProfileArgs),

    /// Delete all stored data
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Show computed body metrics
    Metrics,

    /// Show trend, goal progress and insights
    Analyze,

    /// Export data to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },

    /// Evaluate a single formula
    Calc {
        #[command(subcommand)]
        action: CalcCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Update profile fields (weights and height in display units)
    Set(ProfileArgs),
    /// Show the profile
    Show,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub age: Option<u32>,
    /// male or female
    #[arg(long)]
    pub gender: Option<Gender>,
    #[arg(long)]
    pub height: Option<f64>,
    #[arg(long)]
    pub current_weight: Option<f64>,
    #[arg(long)]
    pub target_weight: Option<f64>,
    /// sedentary, light, moderate, active or very_active
    #[arg(long)]
    pub activity: Option<ActivityLevel>,
    /// lose, maintain or gain
    #[arg(long)]
    pub goal: Option<GoalType>,
    /// Weight change per week
    #[arg(long)]
    pub weekly_goal: Option<f64>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub target_date: Option<NaiveDate>,
}

impl From<ProfileArgs> for ProfileRequest {
    fn from(args: ProfileArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            age: args.age,
            gender: args.gender,
            height: args.height,
            current_weight: args.current_weight,
            target_weight: args.target_weight,
            activity_level: args.activity,
            goal_type: args.goal,
            weekly_goal: args.weekly_goal,
            target_date: args.target_date,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum GoalsCommand {
    /// Set targets manually
    Set {
        /// kcal/day
        #[arg(long)]
        calories: f64,
        /// g/day
        #[arg(long)]
        protein: f64,
        /// g/day
        #[arg(long)]
        carbs: f64,
        /// g/day
        #[arg(long)]
        fat: f64,
        /// ml/day
        #[arg(long, default_value_t = 2000.0)]
        water: f64,
    },
    /// Derive targets from the profile's TDEE and weekly goal
    Recommend,
    /// Show current targets
    Show,
}

#[derive(Subcommand, Debug)]
pub enum WeightCommand {
    /// Record a weight in display units
    Add {
        weight: f64,
        #[arg(long)]
        note: Option<String>,
        /// Body fat percentage
        #[arg(long)]
        body_fat: Option<f64>,
    },
    /// Remove an entry by id
    Remove { id: Uuid },
    /// Edit an entry
    Update {
        id: Uuid,
        #[arg(long)]
        weight: Option<f64>,
        /// RFC 3339 timestamp
        #[arg(long)]
        date: Option<DateTime<Utc>>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        body_fat: Option<f64>,
        #[arg(long)]
        muscle_mass: Option<f64>,
    },
    /// List entries, most recent first
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
    /// Change preferences; unspecified ones are kept
    Set {
        /// metric or imperial
        #[arg(long)]
        units: Option<UnitSystem>,
        /// ko or en
        #[arg(long)]
        language: Option<Language>,
        /// light, dark or auto
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long)]
        weight_reminder: Option<bool>,
        #[arg(long)]
        meal_reminder: Option<bool>,
        #[arg(long)]
        exercise_reminder: Option<bool>,
        #[arg(long)]
        weekly_report: Option<bool>,
        #[arg(long)]
        share_progress: Option<bool>,
        #[arg(long)]
        public_profile: Option<bool>,
    },
    /// Show preferences
    Show,
}

#[derive(Subcommand, Debug)]
pub enum CalcCommand {
    /// Body mass index from kg and cm
    Bmi { weight: f64, height: f64 },
    /// Basal metabolic rate (Harris-Benedict)
    Bmr {
        weight: f64,
        height: f64,
        age: u32,
        gender: Gender,
    },
    /// Total daily energy expenditure
    Tdee { bmr: f64, activity: ActivityLevel },
    /// Daily calorie target
    Calories {
        tdee: f64,
        goal: GoalType,
        weekly_goal: f64,
    },
    /// Calories burned by an activity
    Burned { met: f64, weight: f64, minutes: f64 },
    /// Days needed to reach a target weight
    Days {
        current: f64,
        target: f64,
        weekly_goal: f64,
    },
    /// Date a target weight is reached
    TargetDate {
        current: f64,
        target: f64,
        weekly_goal: f64,
        /// Start of the plan (RFC 3339), defaults to now
        #[arg(long)]
        start: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Weight history
    Csv,
    /// Full snapshot
    Json,
}

/// Execute a parsed command
pub fn run<S, W>(
    command: Command,
    json: bool,
    service: &mut DietService<S>,
    config: &AppConfig,
    out: &mut W,
) -> Result<()>
where
    S: SnapshotStore,
    AppError: From<S::Error>,
    W: Write,
{
    let prefs = service.state().preferences().clone();
    let printer = Printer {
        json,
        units: prefs.units,
        language: prefs.language,
    };

    match command {
        Command::Profile { action } => match action {
            ProfileCommand::Set(args) => {
                let profile = service.set_profile(args.into())?;
                printer.profile(out, &profile)?;
            }
            ProfileCommand::Show => match service.state().profile() {
                Some(profile) => printer.profile(out, profile)?,
                None => writeln!(out, "No profile yet")?,
            },
        },

        Command::Goals { action } => {
            let goals = match action {
                GoalsCommand::Set {
                    calories,
                    protein,
                    carbs,
                    fat,
                    water,
                } => service.set_goals(GoalsRequest {
                    daily_calorie_target: calories,
                    protein_target: protein,
                    carb_target: carbs,
                    fat_target: fat,
                    water_target: water,
                })?,
                GoalsCommand::Recommend => service.recommend_goals()?,
                GoalsCommand::Show => match service.state().goals() {
                    Some(goals) => goals.clone(),
                    None => {
                        writeln!(out, "No diet goals yet")?;
                        return Ok(());
                    }
                },
            };
            printer.goals(out, &goals)?;
        }

        Command::Weight { action } => match action {
            WeightCommand::Add {
                weight,
                note,
                body_fat,
            } => {
                let entry = service.log_weight(LogWeightRequest {
                    weight,
                    note,
                    body_fat,
                })?;
                printer.entries(out, std::slice::from_ref(&entry))?;
            }
            WeightCommand::Remove { id } => {
                let removed = service.remove_weight(id)?;
                printer.entries(out, std::slice::from_ref(&removed))?;
            }
            WeightCommand::Update {
                id,
                weight,
                date,
                note,
                body_fat,
                muscle_mass,
            } => {
                let entry = service.update_weight(
                    id,
                    UpdateWeightRequest {
                        weight,
                        date,
                        note,
                        body_fat,
                        muscle_mass,
                    },
                )?;
                printer.entries(out, std::slice::from_ref(&entry))?;
            }
            WeightCommand::List { limit } => {
                printer.entries(out, service.state().ledger().recent(limit))?;
            }
        },

        Command::Prefs { action } => {
            let preferences = match action {
                PrefsCommand::Set {
                    units,
                    language,
                    theme,
                    weight_reminder,
                    meal_reminder,
                    exercise_reminder,
                    weekly_report,
                    share_progress,
                    public_profile,
                } => {
                    let notifications = NotificationPreferences {
                        weight_reminder: weight_reminder.unwrap_or(prefs.notifications.weight_reminder),
                        meal_reminder: meal_reminder.unwrap_or(prefs.notifications.meal_reminder),
                        exercise_reminder: exercise_reminder
                            .unwrap_or(prefs.notifications.exercise_reminder),
                        weekly_report: weekly_report.unwrap_or(prefs.notifications.weekly_report),
                    };
                    let privacy = PrivacyPreferences {
                        share_progress: share_progress.unwrap_or(prefs.privacy.share_progress),
                        public_profile: public_profile.unwrap_or(prefs.privacy.public_profile),
                    };
                    service.update_preferences(&PreferencesUpdate {
                        units,
                        language,
                        theme,
                        notifications: Some(notifications),
                        privacy: Some(privacy),
                    })
                }
                PrefsCommand::Show => prefs,
            };
            printer.preferences(out, &preferences)?;
        }

        Command::Onboard(args) => {
            let profile = service.onboard(args.into())?;
            printer.profile(out, &profile)?;
            if let Some(goals) = service.state().goals() {
                printer.goals(out, goals)?;
            }
        }

        Command::Reset { yes } => {
            if !yes {
                bail!("Refusing to delete all data without --yes");
            }
            service.reset();
            writeln!(out, "All data deleted")?;
        }

        Command::Metrics => {
            let metrics = service.metrics()?;
            printer.metrics(out, &metrics)?;
        }

        Command::Analyze => {
            let report = service.analyze();
            printer.report(out, &report)?;
        }

        Command::Export { output, format } => {
            let content = match format {
                ExportFormat::Csv => ExportService::weight_csv(service.state())?,
                ExportFormat::Json => ExportService::snapshot_json(service.state())?,
            };
            fs::write(&output, content)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            writeln!(out, "Exported to {}", output.display())?;
        }

        Command::Calc { action } => calc(action, json, config.display.language, out)?,
    }

    Ok(())
}

fn calc<W: Write>(action: CalcCommand, json: bool, language: Language, out: &mut W) -> Result<()> {
    let value = match action {
        CalcCommand::Bmi { weight, height } => {
            let bmi = calculate_bmi(weight, height);
            if json {
                return print_json(
                    out,
                    &serde_json::json!({ "bmi": bmi, "category": classify_bmi(bmi) }),
                );
            }
            writeln!(out, "{:.1} ({})", bmi, classify_bmi(bmi).label(language))?;
            return Ok(());
        }
        CalcCommand::Bmr {
            weight,
            height,
            age,
            gender,
        } => calculate_bmr(weight, height, age, gender),
        CalcCommand::Tdee { bmr, activity } => calculate_tdee(bmr, activity),
        CalcCommand::Calories {
            tdee,
            goal,
            weekly_goal,
        } => calculate_daily_calorie_target(tdee, goal, weekly_goal),
        CalcCommand::Burned {
            met,
            weight,
            minutes,
        } => calculate_calories_burned(met, weight, minutes),
        CalcCommand::Days {
            current,
            target,
            weekly_goal,
        } => {
            let days = calculate_days_to_target(current, target, weekly_goal);
            if json {
                return print_json(out, &serde_json::json!({ "days": days }));
            }
            if days == INDEFINITE_DAYS {
                writeln!(out, "indefinite")?;
            } else {
                writeln!(out, "{}", days)?;
            }
            return Ok(());
        }
        CalcCommand::TargetDate {
            current,
            target,
            weekly_goal,
            start,
        } => {
            let now = Utc::now();
            let date = calculate_target_date(start.unwrap_or(now), current, target, weekly_goal, now);
            if json {
                return print_json(out, &serde_json::json!({ "targetDate": date }));
            }
            writeln!(out, "{}", date.date_naive())?;
            return Ok(());
        }
    };

    if json {
        print_json(out, &serde_json::json!({ "value": value }))
    } else {
        writeln!(out, "{}", value)?;
        Ok(())
    }
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Renders results in the user's units and language
struct Printer {
    json: bool,
    units: UnitSystem,
    language: Language,
}

impl Printer {
    fn ko(&self) -> bool {
        self.language == Language::Ko
    }

    fn label<'a>(&self, ko: &'a str, en: &'a str) -> &'a str {
        if self.ko() {
            ko
        } else {
            en
        }
    }

    fn profile<W: Write>(&self, out: &mut W, profile: &Profile) -> Result<()> {
        if self.json {
            return print_json(out, profile);
        }
        writeln!(out, "{}: {}", self.label("이름", "Name"), profile.name)?;
        writeln!(
            out,
            "{}: {} / {}",
            self.label("키 / 체중", "Height / weight"),
            self.units.format_height(profile.height),
            self.units.format_weight(profile.current_weight)
        )?;
        writeln!(
            out,
            "{}: {} ({:?}, {:.1} {}/week)",
            self.label("목표", "Goal"),
            self.units.format_weight(profile.target_weight),
            profile.goal_type,
            self.units.display_weight(profile.weekly_goal),
            self.units.weight_unit()
        )?;
        writeln!(
            out,
            "BMI {:.1} | BMR {:.0} kcal | TDEE {:.0} kcal",
            profile.bmi(),
            profile.bmr(),
            profile.tdee()
        )?;
        Ok(())
    }

    fn goals<W: Write>(&self, out: &mut W, goals: &DietGoals) -> Result<()> {
        if self.json {
            return print_json(out, goals);
        }
        writeln!(
            out,
            "{:.0} kcal | P {:.0} g | C {:.0} g | F {:.0} g | {} {:.0} ml",
            goals.daily_calorie_target,
            goals.protein_target,
            goals.carb_target,
            goals.fat_target,
            self.label("물", "water"),
            goals.water_target
        )?;
        Ok(())
    }

    fn entries<W: Write>(&self, out: &mut W, entries: &[WeightEntry]) -> Result<()> {
        if self.json {
            return print_json(out, entries);
        }
        if entries.is_empty() {
            writeln!(out, "{}", self.label("기록이 없습니다", "No entries"))?;
        }
        for entry in entries {
            write!(
                out,
                "{}  {}  {}",
                entry.id,
                entry.recorded_at.format("%Y-%m-%d %H:%M"),
                self.units.format_weight(entry.weight)
            )?;
            if let Some(body_fat) = entry.body_fat {
                write!(out, "  {:.1}%", body_fat)?;
            }
            if let Some(note) = &entry.note {
                write!(out, "  {}", note)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn preferences<W: Write>(&self, out: &mut W, preferences: &Preferences) -> Result<()> {
        if self.json {
            return print_json(out, preferences);
        }
        writeln!(
            out,
            "units={} language={:?} theme={:?}",
            preferences.units, preferences.language, preferences.theme
        )?;
        Ok(())
    }

    fn metrics<W: Write>(&self, out: &mut W, metrics: &MetricsSummary) -> Result<()> {
        if self.json {
            return print_json(out, metrics);
        }
        writeln!(
            out,
            "{}: {} → {}",
            self.label("체중", "Weight"),
            self.units.format_weight(metrics.current_weight),
            self.units.format_weight(metrics.target_weight)
        )?;
        if let (Some(bmi), Some(category)) = (metrics.bmi, metrics.bmi_category) {
            writeln!(out, "BMI: {:.1} ({})", bmi, category.label(self.language))?;
        }
        if let (Some(bmr), Some(tdee)) = (metrics.bmr, metrics.tdee) {
            writeln!(out, "BMR: {:.0} kcal | TDEE: {:.0} kcal", bmr, tdee)?;
        }
        writeln!(
            out,
            "{}: {:.0} kcal",
            self.label("일일 권장 칼로리", "Daily calorie target"),
            metrics.daily_calorie_target
        )?;
        match metrics.days_to_target {
            Some(days) => writeln!(
                out,
                "{}: {} ({})",
                self.label("목표까지 남은 일수", "Days to target"),
                days,
                metrics.estimated_target_date.date_naive()
            )?,
            None => writeln!(
                out,
                "{}",
                self.label("주간 목표가 없어 기간을 계산할 수 없습니다", "No weekly goal set")
            )?,
        }
        writeln!(
            out,
            "{}: {:.0}%",
            self.label("진행률", "Progress"),
            metrics.progress_percent
        )?;
        Ok(())
    }

    fn report<W: Write>(&self, out: &mut W, report: &AnalyticsReport) -> Result<()> {
        if self.json {
            return print_json(out, report);
        }
        let trend = &report.weight_trend;
        writeln!(
            out,
            "{}: {:?} ({:.2} {}/week, {} {:.0}%)",
            self.label("추세", "Trend"),
            trend.direction,
            self.units.display_weight(trend.rate),
            self.units.weight_unit(),
            self.label("신뢰도", "confidence"),
            trend.confidence * 100.0
        )?;
        writeln!(
            out,
            "{}: {}",
            self.label("다음 주 예상", "Next week"),
            self.units.format_weight(trend.prediction.next_week_weight)
        )?;

        let progress = &report.goal_progress;
        writeln!(
            out,
            "{}: {:.0}% ({})",
            self.label("진행률", "Progress"),
            progress.percentage,
            if progress.on_track {
                self.label("순조로움", "on track")
            } else {
                self.label("조정 필요", "off track")
            }
        )?;
        if let Some(days) = progress.days_remaining {
            writeln!(out, "{}: {}", self.label("남은 일수", "Days remaining"), days)?;
        }
        for insight in &report.insights {
            write!(out, "- {}", insight.message)?;
            if let Some(action) = &insight.action {
                write!(out, " ({})", action)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
