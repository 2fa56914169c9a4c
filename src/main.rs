//! Application shell and persistent user settings.

use dirs_next as dirs;
use eframe::{App, Frame, NativeOptions, egui};
use rfd::FileDialog;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use log::info;

mod builder;
mod catalog;
mod collection;
mod export;
mod history;
mod ids;
mod metrics;
mod model;
mod plotting;
mod records;
mod store;
mod views;
mod workouts;

use builder::WorkoutBuilder;
use collection::{EditableCollection, ValidationError};
use metrics::MetricCard;
use model::{Exercise, MuscleGroup, WorkoutCategory};
use records::PersonalRecords;
use store::{SaveOutcome, Store, StoreError};
use workouts::WorkoutList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            WeightUnit::Lbs => " lbs",
            WeightUnit::Kg => " kg",
        }
    }

    fn label(self) -> &'static str {
        match self {
            WeightUnit::Lbs => "Pounds (lbs)",
            WeightUnit::Kg => "Kilograms (kg)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum View {
    #[default]
    Dashboard,
    LogWorkout,
    History,
}

impl View {
    const ALL: [View; 3] = [View::Dashboard, View::LogWorkout, View::History];

    fn label(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::LogWorkout => "Log Workout",
            View::History => "History",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum HistoryTab {
    #[default]
    ByCategory,
    ByMuscle,
    All,
    Recent,
}

fn default_history_days() -> usize {
    30
}

fn default_recent_count() -> usize {
    5
}

fn default_muscle_group() -> MuscleGroup {
    MuscleGroup::Chest
}

/// Persistent configuration for user preferences.
///
/// Serialized to a JSON file in the user's config directory. Every field
/// carries a serde default so files written by older versions still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Settings {
    #[serde(default)]
    default_view: View,
    #[serde(default)]
    weight_unit: WeightUnit,
    /// Overrides the location of the data file.
    #[serde(default)]
    store_path: Option<String>,
    #[serde(default = "default_history_days")]
    history_days: usize,
    #[serde(default = "default_recent_count")]
    recent_count: usize,
    #[serde(default = "default_muscle_group")]
    last_muscle_group: MuscleGroup,
    #[serde(default)]
    last_category: WorkoutCategory,
}

impl Settings {
    const FILE: &'static str = "hypertrack_settings.json";

    fn path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&data) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("Ignoring malformed settings in {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match serde_json::to_string_pretty(self) {
                Ok(data) => {
                    if let Err(e) = std::fs::write(&path, data) {
                        log::error!("Failed to save settings to {}: {e}", path.display());
                    }
                }
                Err(e) => log::error!("Failed to serialize settings: {e}"),
            }
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_view: View::Dashboard,
            weight_unit: WeightUnit::Lbs,
            store_path: None,
            history_days: default_history_days(),
            recent_count: default_recent_count(),
            last_muscle_group: default_muscle_group(),
            last_category: WorkoutCategory::Push,
        }
    }
}

struct HyperTrackApp {
    store: Store,
    settings: Settings,
    settings_dirty: bool,
    view: View,
    show_settings: bool,
    show_about: bool,
    store_path_input: String,
    metrics: Vec<MetricCard>,
    records: PersonalRecords,
    muscle_group: MuscleGroup,
    exercises: EditableCollection<Exercise>,
    category: WorkoutCategory,
    workout_list: WorkoutList,
    builder: WorkoutBuilder,
    history_tab: HistoryTab,
    /// Logged workouts grouped by category, as shown in the history view.
    history: Vec<(WorkoutCategory, Vec<model::Workout>)>,
    status: Option<(String, Instant)>,
}

impl Default for HyperTrackApp {
    fn default() -> Self {
        let settings = Settings::load();
        let store = Store::open_default(settings.store_path.as_deref());
        Self::new(settings, store)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl HyperTrackApp {
    fn new(settings: Settings, store: Store) -> Self {
        let muscle_group = settings.last_muscle_group;
        let category = settings.last_category;
        match store.path() {
            Some(path) => info!("Using data file {}", path.display()),
            None => info!("Using in-memory storage"),
        }
        Self {
            metrics: metrics::dashboard_cards(&store, settings.weight_unit),
            records: PersonalRecords::load(&store),
            exercises: EditableCollection::load(&store, muscle_group.storage_key()),
            workout_list: WorkoutList::load(&store, category),
            history: history::workouts_by_category(&store),
            builder: WorkoutBuilder::new(today()),
            view: settings.default_view,
            store_path_input: settings.store_path.clone().unwrap_or_default(),
            store,
            settings,
            settings_dirty: false,
            show_settings: false,
            show_about: false,
            muscle_group,
            category,
            history_tab: HistoryTab::default(),
            status: None,
        }
    }

    /// Re-read everything the dashboard shows from the store.
    fn refresh_dashboard(&mut self) {
        self.metrics = metrics::dashboard_cards(&self.store, self.settings.weight_unit);
        self.records = PersonalRecords::load(&self.store);
        self.exercises = EditableCollection::load(&self.store, self.muscle_group.storage_key());
        self.workout_list = WorkoutList::load(&self.store, self.category);
    }

    fn set_view(&mut self, view: View) {
        if view == self.view {
            return;
        }
        match view {
            View::Dashboard => self.refresh_dashboard(),
            View::History => self.refresh_history(),
            View::LogWorkout => {}
        }
        self.view = view;
    }

    fn refresh_history(&mut self) {
        self.history = history::workouts_by_category(&self.store);
    }

    fn select_muscle_group(&mut self, group: MuscleGroup) {
        if group == self.muscle_group {
            return;
        }
        self.muscle_group = group;
        self.exercises = EditableCollection::load(&self.store, group.storage_key());
        self.settings.last_muscle_group = group;
        self.settings_dirty = true;
    }

    fn select_category(&mut self, category: WorkoutCategory) {
        if category == self.category {
            return;
        }
        self.workout_list.cancel_exercise(&mut self.store);
        self.category = category;
        self.workout_list = WorkoutList::load(&self.store, category);
        self.settings.last_category = category;
        self.settings_dirty = true;
    }

    fn set_weight_unit(&mut self, unit: WeightUnit) {
        self.settings.weight_unit = unit;
        self.settings_dirty = true;
        self.metrics = metrics::dashboard_cards(&self.store, unit);
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    /// Tell the user how a save went.
    fn report(&mut self, outcome: SaveOutcome, done: &str) {
        match outcome {
            SaveOutcome::Persisted => self.notify(done),
            SaveOutcome::Unpersisted => {
                self.notify(format!("{done}, but it could not be written to disk"))
            }
        }
    }

    fn report_invalid(&mut self, err: ValidationError) {
        log::debug!("Rejected save: {err}");
        self.notify(err.to_string());
    }

    fn log_workout(&mut self) {
        match self.builder.save(&mut self.store, today()) {
            Ok((workout, outcome)) => {
                self.report(outcome, &format!("Logged {}", workout.name));
                self.metrics = metrics::dashboard_cards(&self.store, self.settings.weight_unit);
                if workout.category == self.category {
                    self.workout_list = WorkoutList::load(&self.store, self.category);
                }
            }
            Err(e) => self.report_invalid(e),
        }
    }

    fn delete_workout(&mut self, id: &str) {
        let name = self.workout_list.get(id).map(|w| w.name.clone());
        if let Some(outcome) = self.workout_list.delete_workout(&mut self.store, id) {
            let name = name.unwrap_or_else(|| "workout".into());
            self.report(outcome, &format!("Deleted {name}"));
            self.metrics = metrics::dashboard_cards(&self.store, self.settings.weight_unit);
        }
    }

    fn export_workouts(&mut self, path: &Path) {
        let all = history::all_newest_first(&history::workouts_by_category(&self.store));
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        let result = if is_csv {
            export::save_workouts_csv(path, &all).map_err(|e| e.to_string())
        } else {
            export::save_workouts_json(path, &all).map_err(|e| e.to_string())
        };
        match result {
            Ok(()) => {
                info!("Exported {} workouts to {}", all.len(), path.display());
                self.notify(format!("Exported {} workouts", all.len()));
            }
            Err(e) => {
                log::error!("Failed to export workouts: {e}");
                self.notify("Export failed");
            }
        }
    }

    fn back_up(&mut self, path: &Path) {
        match self.store.export_to(path) {
            Ok(()) => self.notify(format!("Backed up to {}", path.display())),
            Err(e) => {
                log::error!("Backup failed: {e}");
                self.notify("Backup failed");
            }
        }
    }

    fn restore(&mut self, path: &Path) -> Result<usize, StoreError> {
        let result = self.store.import_from(path);
        // The namespace is replaced even when writing it back fails.
        self.refresh_dashboard();
        self.refresh_history();
        match &result {
            Ok(count) => {
                info!("Restored {count} entries from {}", path.display());
                self.notify(format!("Restored {count} entries"));
            }
            Err(e) => {
                log::error!("Restore failed: {e}");
                self.notify("Restore failed");
            }
        }
        result
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.show_settings = true;
                        ui.close_menu();
                    }
                    if ui.button("Export Workouts").clicked() {
                        if let Some(path) = FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .add_filter("CSV", &["csv"])
                            .save_file()
                        {
                            self.export_workouts(&path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Back Up Data").clicked() {
                        if let Some(path) = FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .set_file_name("hypertrack-backup.json")
                            .save_file()
                        {
                            self.back_up(&path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Restore Data").clicked() {
                        if let Some(path) =
                            FileDialog::new().add_filter("JSON", &["json"]).pick_file()
                        {
                            let _ = self.restore(&path);
                        }
                        ui.close_menu();
                    }
                    if ui.button("About").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });
                ui.separator();
                let mut selected = self.view;
                for view in View::ALL {
                    ui.selectable_value(&mut selected, view, view.label());
                }
                self.set_view(selected);
            });
        });
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        let mut unit = self.settings.weight_unit;
        egui::Window::new("Settings")
            .open(&mut open)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label("Start on");
                        egui::ComboBox::from_id_source("default_view_combo")
                            .selected_text(self.settings.default_view.label())
                            .show_ui(ui, |ui| {
                                for view in View::ALL {
                                    if ui
                                        .selectable_value(
                                            &mut self.settings.default_view,
                                            view,
                                            view.label(),
                                        )
                                        .changed()
                                    {
                                        self.settings_dirty = true;
                                    }
                                }
                            });
                        ui.end_row();

                        ui.label("Weight unit");
                        egui::ComboBox::from_id_source("weight_unit_combo")
                            .selected_text(unit.label())
                            .show_ui(ui, |ui| {
                                ui.selectable_value(&mut unit, WeightUnit::Lbs, WeightUnit::Lbs.label());
                                ui.selectable_value(&mut unit, WeightUnit::Kg, WeightUnit::Kg.label());
                            });
                        ui.end_row();

                        ui.label("History days");
                        if ui
                            .add(egui::DragValue::new(&mut self.settings.history_days).clamp_range(1..=365))
                            .changed()
                        {
                            self.settings_dirty = true;
                        }
                        ui.end_row();

                        ui.label("Recent workouts");
                        if ui
                            .add(egui::DragValue::new(&mut self.settings.recent_count).clamp_range(1..=50))
                            .changed()
                        {
                            self.settings_dirty = true;
                        }
                        ui.end_row();

                        ui.label("Data file");
                        ui.horizontal(|ui| {
                            ui.add(
                                egui::TextEdit::singleline(&mut self.store_path_input)
                                    .hint_text("default location"),
                            );
                            if ui.button("Apply").clicked() {
                                let trimmed = self.store_path_input.trim();
                                self.settings.store_path =
                                    (!trimmed.is_empty()).then(|| trimmed.to_string());
                                self.settings_dirty = true;
                            }
                        });
                        ui.end_row();
                    });
                match self.store.path() {
                    Some(path) => ui.small(format!(
                        "Currently using {} ({} entries)",
                        path.display(),
                        self.store.keys().count()
                    )),
                    None => ui.small("Data is kept in memory only"),
                };
                ui.small("A new data file takes effect on the next start.");
            });
        self.show_settings = open;
        if unit != self.settings.weight_unit {
            self.set_weight_unit(unit);
        }
    }

    fn about_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("About")
            .open(&mut self.show_about)
            .show(ctx, |ui| {
                ui.heading("HyperTrack");
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.label("Log workouts on the Log Workout page or from a category list on the dashboard.");
                ui.label("Double-check weights before saving; values are stored exactly as typed.");
                ui.label(format!(
                    "Set {} to choose where data is kept.",
                    store::STORE_ENV
                ));
                if !self.store.is_persistent() {
                    ui.colored_label(
                        egui::Color32::YELLOW,
                        "Storage is unavailable; changes are lost when the app closes.",
                    );
                }
            });
    }

    fn status_toast(&mut self, ctx: &egui::Context) {
        if self
            .status
            .as_ref()
            .is_some_and(|(_, start)| start.elapsed() >= Duration::from_secs(3))
        {
            self.status = None;
        }
        if let Some((message, _)) = &self.status {
            egui::Area::new(egui::Id::new("status_toast"))
                .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(message);
                    });
                });
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

impl App for HyperTrackApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.menu_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.view {
                View::Dashboard => self.dashboard_ui(ui),
                View::LogWorkout => self.builder_ui(ui),
                View::History => self.history_ui(ui),
            });
        });

        self.new_workout_window(ctx);
        if self.show_settings {
            self.settings_window(ctx);
        }
        if self.show_about {
            self.about_window(ctx);
        }
        self.status_toast(ctx);

        if self.settings_dirty {
            self.settings.save();
            self.settings_dirty = false;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let options = NativeOptions::default();
    eframe::run_native(
        "HyperTrack",
        options,
        Box::new(|_cc| Box::new(HyperTrackApp::default())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SetField;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn app() -> HyperTrackApp {
        HyperTrackApp::new(Settings::default(), Store::in_memory())
    }

    fn fill_builder(app: &mut HyperTrackApp) {
        let id = app.builder.active_id();
        app.builder.set_exercise_name(id, "Bench Press");
        let set = app.builder.add_set(id).unwrap();
        app.builder.update_set(id, set, SetField::Weight, "185");
        app.builder.update_set(id, set, SetField::Reps, "8");
    }

    #[test]
    fn settings_roundtrip() {
        let s = Settings {
            default_view: View::History,
            weight_unit: WeightUnit::Kg,
            store_path: Some("/tmp/hypertrack.json".into()),
            history_days: 14,
            recent_count: 3,
            last_muscle_group: MuscleGroup::Quads,
            last_category: WorkoutCategory::ShouldersTraps,
        };
        let json = serde_json::to_string(&s).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, loaded);
    }

    #[test]
    fn missing_settings_fields_use_defaults() {
        let loaded: Settings = serde_json::from_str(r#"{"weight_unit":"Kg"}"#).unwrap();
        assert_eq!(loaded.weight_unit, WeightUnit::Kg);
        assert_eq!(loaded.history_days, 30);
        assert_eq!(loaded.last_muscle_group, MuscleGroup::Chest);
        assert_eq!(loaded.default_view, View::Dashboard);
    }

    #[test]
    fn settings_persistence() {
        use std::env;
        use std::fs;

        let _guard = ENV_MUTEX.lock().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let prev_config = env::var_os("XDG_CONFIG_HOME");
        unsafe {
            env::set_var("XDG_CONFIG_HOME", dir.path());
        }

        let mut s = Settings::default();
        s.weight_unit = WeightUnit::Kg;
        s.last_category = WorkoutCategory::Legs;
        s.save();
        let loaded = Settings::load();
        assert_eq!(loaded, s);

        let path = Settings::path().unwrap();
        fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load(), Settings::default());

        if let Some(val) = prev_config {
            unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            }
        } else {
            unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }

    #[test]
    fn logging_and_deleting_moves_the_counter() {
        let mut app = app();
        assert_eq!(app.metrics[0].value(), "0");

        fill_builder(&mut app);
        app.log_workout();
        assert_eq!(app.metrics[0].value(), "1");
        assert_eq!(app.workout_list.workouts().len(), 1);
        let workout = app.workout_list.workouts()[0].clone();
        assert_eq!(workout.name, "Push Day");
        assert_eq!(workout.exercises[0].sets.len(), 1);

        app.delete_workout(&workout.id);
        assert_eq!(app.metrics[0].value(), "0");
        assert!(app.workout_list.workouts().is_empty());
        assert!(app.store.load_list::<model::Workout>("workouts-push").is_empty());
    }

    #[test]
    fn incomplete_workout_is_rejected_with_message() {
        let mut app = app();
        app.log_workout();
        let (message, _) = app.status.clone().unwrap();
        assert_eq!(message, ValidationError::NoCompleteExercise.to_string());
        assert_eq!(app.store.get(metrics::TOTAL_WORKOUTS), None);
    }

    #[test]
    fn switching_tabs_loads_that_collection() {
        let mut app = app();
        app.store
            .set("exercises-back", r#"[{"id":"exercise-1","name":"Row","weight":"135","reps":"10","notes":""}]"#)
            .unwrap();
        app.select_muscle_group(MuscleGroup::Back);
        assert_eq!(app.exercises.len(), 1);
        assert_eq!(app.settings.last_muscle_group, MuscleGroup::Back);
        assert!(app.settings_dirty);

        app.select_category(WorkoutCategory::Legs);
        assert_eq!(app.workout_list.category(), WorkoutCategory::Legs);
    }

    #[test]
    fn history_is_reloaded_when_entered() {
        let mut app = app();
        assert!(app.history.is_empty());
        fill_builder(&mut app);
        app.log_workout();
        assert!(app.history.is_empty());

        app.set_view(View::History);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].0, WorkoutCategory::Push);
        let id = app.history[0].1[0].id.clone();

        app.set_view(View::Dashboard);
        app.delete_workout(&id);
        app.set_view(View::History);
        assert!(app.history.is_empty());
    }

    #[test]
    fn backup_restores_into_another_app() {
        let dir = tempfile::tempdir().unwrap();
        let backup = dir.path().join("backup.json");

        let mut first = app();
        fill_builder(&mut first);
        first.log_workout();
        first.back_up(&backup);

        let mut second = app();
        assert_eq!(second.restore(&backup).unwrap(), 2);
        assert_eq!(second.metrics[0].value(), "1");
        assert_eq!(second.workout_list.workouts().len(), 1);
    }
}
