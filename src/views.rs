//! Rendering of the three main views and the new-workout window.
//!
//! Widgets never mutate persisted state while a row list is being drawn.
//! Clicks are collected as actions and applied once drawing is done.

use crate::builder::SetField;
use crate::catalog::{self, ALL_SPLITS};
use crate::history::{self, WorkoutSummary};
use crate::metrics;
use crate::model::{
    ALL_CATEGORIES, ALL_MUSCLE_GROUPS, Exercise, LIST_CATEGORIES, SetEntry, Workout,
    WorkoutExercise,
};
use crate::plotting::{self, TRACKED_LIFTS};
use crate::records::RecordField;
use crate::store::SaveOutcome;
use crate::{HistoryTab, HyperTrackApp, today};
use chrono::NaiveDate;
use eframe::egui;
use egui_extras::DatePickerButton;
use egui_plot::{Legend, Plot};

enum CardAction {
    Edit(usize),
    Save(usize),
    Cancel(usize),
    Reset(usize),
}

enum RecordAction {
    Edit,
    Save,
    Cancel,
    Prev,
    Next,
}

enum RowAction {
    Create,
    Edit(String),
    Save,
    Cancel,
    Delete(String),
}

enum ListAction {
    NewWorkout,
    DeleteWorkout(String),
    EditExercise(String, usize),
    AddExercise(String),
    DeleteExercise(String, usize),
    SaveExercise,
    CancelExercise,
}

enum BuilderAction {
    Select(u32),
    AddExercise,
    RemoveExercise(u32),
    Rename(u32, String),
    AddSet(u32),
    UpdateSet(u32, u32, SetField, String),
    RemoveSet(u32, u32),
    Save,
    Reset,
}

fn sets_text(exercise: &WorkoutExercise) -> String {
    if exercise.sets.is_empty() {
        return "no sets".into();
    }
    exercise
        .sets
        .iter()
        .map(|s| format!("{} x {}", s.weight, s.reps))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Editor for one exercise of a workout: name, notes and its sets.
fn exercise_editor(ui: &mut egui::Ui, exercise: &mut WorkoutExercise, id_salt: &str) {
    ui.horizontal(|ui| {
        ui.label("Exercise");
        ui.add(egui::TextEdit::singleline(&mut exercise.name).hint_text("Exercise name"));
    });
    let mut remove = None;
    egui::Grid::new(format!("{id_salt}_sets"))
        .num_columns(4)
        .striped(true)
        .show(ui, |ui| {
            ui.strong("Set");
            ui.strong("Weight");
            ui.strong("Reps");
            ui.end_row();
            for (i, set) in exercise.sets.iter_mut().enumerate() {
                ui.label(format!("{}", i + 1));
                ui.add(egui::TextEdit::singleline(&mut set.weight).desired_width(70.0));
                ui.add(egui::TextEdit::singleline(&mut set.reps).desired_width(50.0));
                if ui.small_button("Remove").clicked() {
                    remove = Some(i);
                }
                ui.end_row();
            }
        });
    if let Some(i) = remove {
        exercise.sets.remove(i);
    }
    if ui.button("Add Set").clicked() {
        let id = exercise.next_set_id();
        exercise.sets.push(SetEntry {
            id,
            ..SetEntry::default()
        });
    }
    ui.horizontal(|ui| {
        ui.label("Notes");
        ui.text_edit_singleline(&mut exercise.notes);
    });
}

fn workout_details(ui: &mut egui::Ui, workout: &Workout) {
    if !workout.notes.is_empty() {
        ui.weak(&workout.notes);
    }
    for e in &workout.exercises {
        ui.label(format!("{}: {}", e.name, sets_text(e)));
    }
}

fn summary_line(summary: &WorkoutSummary, suffix: &str, today: NaiveDate) -> String {
    format!(
        "{} ({}) - {} exercises, {} sets, {:.0}{} lifted, {}",
        summary.name,
        summary.category.label(),
        summary.exercises,
        summary.sets,
        summary.volume,
        suffix,
        history::days_ago(summary.date, today)
    )
}

impl HyperTrackApp {
    pub(crate) fn dashboard_ui(&mut self, ui: &mut egui::Ui) {
        self.metric_cards_ui(ui);
        ui.add_space(8.0);
        self.records_ui(ui);
        ui.add_space(8.0);
        self.exercise_table_ui(ui);
        ui.add_space(8.0);
        self.workout_list_ui(ui);
    }

    fn metric_cards_ui(&mut self, ui: &mut egui::Ui) {
        let mut actions = Vec::new();
        ui.horizontal_wrapped(|ui| {
            for (i, card) in self.metrics.iter_mut().enumerate() {
                ui.push_id(card.key(), |ui| ui.group(|ui| {
                    ui.vertical(|ui| {
                        ui.strong(&card.title);
                        ui.weak(&card.subtitle);
                        if let Some(buffer) = card.edit_buffer_mut() {
                            ui.add(egui::TextEdit::singleline(buffer).desired_width(80.0));
                            ui.horizontal(|ui| {
                                if ui.button("Save").clicked() {
                                    actions.push(CardAction::Save(i));
                                }
                                if ui.button("Cancel").clicked() {
                                    actions.push(CardAction::Cancel(i));
                                }
                                if ui.button("Reset").clicked() {
                                    actions.push(CardAction::Reset(i));
                                }
                            });
                        } else {
                            ui.heading(card.display());
                            if ui.small_button("Edit").clicked() {
                                actions.push(CardAction::Edit(i));
                            }
                        }
                    });
                }));
            }
        });
        for action in actions {
            match action {
                CardAction::Edit(i) => {
                    if let Some(card) = self.metrics.get_mut(i) {
                        card.start_edit();
                    }
                }
                CardAction::Save(i) => {
                    let outcome = self
                        .metrics
                        .get_mut(i)
                        .and_then(|card| card.save(&mut self.store));
                    if let Some(outcome) = outcome {
                        self.report(outcome, "Saved");
                    }
                }
                CardAction::Cancel(i) => {
                    if let Some(card) = self.metrics.get_mut(i) {
                        card.cancel();
                    }
                }
                CardAction::Reset(i) => {
                    let outcome = self
                        .metrics
                        .get_mut(i)
                        .map(|card| card.reset(&mut self.store));
                    if let Some(outcome) = outcome {
                        self.report(outcome, "Reset");
                    }
                }
            }
        }
    }

    fn records_ui(&mut self, ui: &mut egui::Ui) {
        let mut action = None;
        let mut edits = Vec::new();
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.heading("Personal Records");
                if !self.records.is_editing() && ui.small_button("Edit").clicked() {
                    action = Some(RecordAction::Edit);
                }
            });
            if let Some(staged) = self.records.staged() {
                egui::Grid::new("records_edit_grid")
                    .num_columns(3)
                    .show(ui, |ui| {
                        ui.strong("Exercise");
                        ui.strong("Weight");
                        ui.strong("Date");
                        ui.end_row();
                        for (i, record) in staged.iter().enumerate() {
                            for (field, value) in [
                                (RecordField::Exercise, &record.exercise),
                                (RecordField::Weight, &record.weight),
                                (RecordField::Date, &record.date),
                            ] {
                                let mut text = value.clone();
                                if ui
                                    .add(egui::TextEdit::singleline(&mut text).desired_width(120.0))
                                    .changed()
                                {
                                    edits.push((i, field, text));
                                }
                            }
                            ui.end_row();
                        }
                    });
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        action = Some(RecordAction::Save);
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(RecordAction::Cancel);
                    }
                });
            } else {
                ui.horizontal(|ui| {
                    if ui.button("<").clicked() {
                        action = Some(RecordAction::Prev);
                    }
                    match self.records.current() {
                        Some(record) => {
                            ui.vertical(|ui| {
                                ui.strong(&record.exercise);
                                ui.heading(&record.weight);
                                ui.weak(&record.date);
                            });
                        }
                        None => {
                            ui.label("No records yet");
                        }
                    }
                    if ui.button(">").clicked() {
                        action = Some(RecordAction::Next);
                    }
                });
                let current = self.records.carousel.index();
                let dots: String = (0..self.records.records().len())
                    .map(|i| if i == current { '●' } else { '○' })
                    .collect();
                ui.label(dots);
            }
        });
        for (index, field, value) in edits {
            self.records.update(index, field, &value);
        }
        match action {
            Some(RecordAction::Edit) => self.records.start_edit(),
            Some(RecordAction::Save) => {
                if let Some(outcome) = self.records.save(&mut self.store) {
                    self.report(outcome, "Personal records saved");
                }
            }
            Some(RecordAction::Cancel) => self.records.cancel(&self.store),
            Some(RecordAction::Prev) => self.records.prev(),
            Some(RecordAction::Next) => self.records.next(),
            None => {}
        }
    }

    fn exercise_table_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading(format!("Exercise Log ({})", self.exercises.len()));
        let mut group = self.muscle_group;
        ui.horizontal_wrapped(|ui| {
            for g in ALL_MUSCLE_GROUPS {
                ui.selectable_value(&mut group, g, g.label());
            }
        });
        self.select_muscle_group(group);

        let rows: Vec<Exercise> = self.exercises.rows().to_vec();
        let editing = self.exercises.editing_id().map(str::to_string);
        let mut action = None;
        egui::Grid::new("exercise_table")
            .num_columns(5)
            .striped(true)
            .show(ui, |ui| {
                ui.strong("Exercise");
                ui.strong("Weight");
                ui.strong("Reps");
                ui.strong("Notes");
                ui.end_row();
                for row in &rows {
                    if editing.as_deref() == Some(row.id.as_str()) {
                        if let Some(staged) = self.exercises.staged_mut() {
                            Self::exercise_row_editor(ui, staged, &mut action);
                        }
                    } else {
                        ui.label(&row.name);
                        ui.label(&row.weight);
                        ui.label(&row.reps);
                        ui.label(&row.notes);
                        ui.horizontal(|ui| {
                            if ui.small_button("Edit").clicked() {
                                action = Some(RowAction::Edit(row.id.clone()));
                            }
                            if ui.small_button("Delete").clicked() {
                                action = Some(RowAction::Delete(row.id.clone()));
                            }
                        });
                    }
                    ui.end_row();
                }
                if self.exercises.is_creating() {
                    if let Some(staged) = self.exercises.staged_mut() {
                        Self::exercise_row_editor(ui, staged, &mut action);
                    }
                    ui.end_row();
                }
            });
        if self.exercises.is_empty() && !self.exercises.is_creating() {
            ui.weak("No exercises logged for this muscle group yet.");
        }
        if !self.exercises.is_creating() && ui.button("Add Exercise").clicked() {
            action = Some(RowAction::Create);
        }

        match action {
            Some(RowAction::Create) => {
                self.exercises.start_create(Exercise::default());
            }
            Some(RowAction::Edit(id)) => {
                self.exercises.start_edit(&id);
            }
            Some(RowAction::Save) => match self.exercises.save(&mut self.store) {
                Ok(outcome) => self.report(outcome, "Exercise saved"),
                Err(e) => self.report_invalid(e),
            },
            Some(RowAction::Cancel) => self.exercises.cancel(),
            Some(RowAction::Delete(id)) => {
                if let Some((removed, outcome)) = self.exercises.delete(&mut self.store, &id) {
                    self.report(outcome, &format!("Deleted {}", removed.name));
                }
            }
            None => {}
        }
    }

    fn exercise_row_editor(ui: &mut egui::Ui, staged: &mut Exercise, action: &mut Option<RowAction>) {
        ui.add(egui::TextEdit::singleline(&mut staged.name).hint_text("Name"));
        ui.add(egui::TextEdit::singleline(&mut staged.weight).desired_width(70.0));
        ui.add(egui::TextEdit::singleline(&mut staged.reps).desired_width(50.0));
        ui.text_edit_singleline(&mut staged.notes);
        ui.horizontal(|ui| {
            if ui.small_button("Save").clicked() {
                *action = Some(RowAction::Save);
            }
            if ui.small_button("Cancel").clicked() {
                *action = Some(RowAction::Cancel);
            }
        });
    }

    fn workout_list_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Workouts");
        let mut category = self.category;
        ui.horizontal_wrapped(|ui| {
            for c in LIST_CATEGORIES {
                ui.selectable_value(&mut category, c, c.label());
            }
        });
        self.select_category(category);

        let workouts: Vec<Workout> = self.workout_list.workouts().to_vec();
        let editing = self
            .workout_list
            .editing_exercise()
            .map(|(id, index)| (id.to_string(), index));
        let mut action = None;

        if ui.button("New Workout").clicked() {
            action = Some(ListAction::NewWorkout);
        }
        if workouts.is_empty() {
            ui.weak("No workouts in this category yet.");
        }
        for workout in &workouts {
            egui::CollapsingHeader::new(format!("{} - {}", workout.name, workout.date))
                .id_source(&workout.id)
                .show(ui, |ui| {
                    if !workout.notes.is_empty() {
                        ui.weak(&workout.notes);
                    }
                    for (index, exercise) in workout.exercises.iter().enumerate() {
                        let is_edited = editing
                            .as_ref()
                            .is_some_and(|(id, i)| id == &workout.id && *i == index);
                        if is_edited {
                            ui.group(|ui| {
                                if let Some(staged) = self.workout_list.edited_exercise_mut() {
                                    exercise_editor(ui, staged, &format!("{}_{index}", workout.id));
                                }
                                ui.horizontal(|ui| {
                                    if ui.button("Save").clicked() {
                                        action = Some(ListAction::SaveExercise);
                                    }
                                    if ui.button("Cancel").clicked() {
                                        action = Some(ListAction::CancelExercise);
                                    }
                                });
                            });
                        } else {
                            ui.horizontal(|ui| {
                                ui.label(format!("{}: {}", exercise.name, sets_text(exercise)));
                                if ui.small_button("Edit").clicked() {
                                    action = Some(ListAction::EditExercise(workout.id.clone(), index));
                                }
                                if ui.small_button("Delete").clicked() {
                                    action = Some(ListAction::DeleteExercise(workout.id.clone(), index));
                                }
                            });
                        }
                    }
                    ui.horizontal(|ui| {
                        if ui.button("Add Exercise").clicked() {
                            action = Some(ListAction::AddExercise(workout.id.clone()));
                        }
                        if ui.button("Delete Workout").clicked() {
                            action = Some(ListAction::DeleteWorkout(workout.id.clone()));
                        }
                    });
                });
        }

        match action {
            Some(ListAction::NewWorkout) => {
                self.workout_list.cancel_exercise(&mut self.store);
                self.workout_list.begin_new_workout(today());
                self.workout_list.add_exercise_to_new();
            }
            Some(ListAction::DeleteWorkout(id)) => self.delete_workout(&id),
            Some(ListAction::EditExercise(id, index)) => {
                self.workout_list
                    .start_edit_exercise(&mut self.store, &id, index);
            }
            Some(ListAction::AddExercise(id)) => {
                if let Some(outcome) = self.workout_list.add_exercise_to(&mut self.store, &id) {
                    if outcome == SaveOutcome::Unpersisted {
                        self.report(outcome, "Exercise added");
                    }
                }
            }
            Some(ListAction::DeleteExercise(id, index)) => {
                if let Some(outcome) = self
                    .workout_list
                    .delete_exercise(&mut self.store, &id, index)
                {
                    self.report(outcome, "Exercise deleted");
                }
            }
            Some(ListAction::SaveExercise) => {
                match self.workout_list.save_exercise(&mut self.store) {
                    Ok(outcome) => self.report(outcome, "Exercise saved"),
                    Err(e) => self.report_invalid(e),
                }
            }
            Some(ListAction::CancelExercise) => self.workout_list.cancel_exercise(&mut self.store),
            None => {}
        }
    }

    pub(crate) fn new_workout_window(&mut self, ctx: &egui::Context) {
        if !self.workout_list.is_creating() {
            return;
        }
        let mut open = true;
        let mut save = false;
        let mut cancel = false;
        let mut add_exercise = false;
        let mut remove_exercise = None;
        let title = format!("New {} Workout", self.category.label());
        egui::Window::new(title)
            .id(egui::Id::new("new_workout_window"))
            .open(&mut open)
            .show(ctx, |ui| {
                let Some(workout) = self.workout_list.new_workout_mut() else {
                    return;
                };
                egui::Grid::new("new_workout_grid")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label("Name");
                        ui.text_edit_singleline(&mut workout.name);
                        ui.end_row();
                        ui.label("Date");
                        ui.add(DatePickerButton::new(&mut workout.date).id_source("new_workout_date"));
                        ui.end_row();
                        ui.label("Notes");
                        ui.text_edit_multiline(&mut workout.notes);
                        ui.end_row();
                    });
                ui.separator();
                for (i, exercise) in workout.exercises.iter_mut().enumerate() {
                    ui.group(|ui| {
                        exercise_editor(ui, exercise, &format!("new_workout_{i}"));
                        if ui.small_button("Remove Exercise").clicked() {
                            remove_exercise = Some(i);
                        }
                    });
                }
                if ui.button("Add Exercise").clicked() {
                    add_exercise = true;
                }
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save Workout").clicked() {
                        save = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if let Some(i) = remove_exercise {
            self.workout_list.remove_exercise_from_new(i);
        }
        if add_exercise {
            self.workout_list.add_exercise_to_new();
        }
        if save {
            match self.workout_list.save_new_workout(&mut self.store) {
                Ok(outcome) => {
                    self.report(outcome, "Workout saved");
                    self.metrics = metrics::dashboard_cards(&self.store, self.settings.weight_unit);
                }
                Err(e) => self.report_invalid(e),
            }
        }
        if cancel || !open {
            self.workout_list.cancel_new_workout();
        }
    }

    pub(crate) fn builder_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Log Workout");
        egui::Grid::new("builder_grid")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Date");
                ui.add(DatePickerButton::new(&mut self.builder.date).id_source("builder_date"));
                ui.end_row();

                ui.label("Category");
                egui::ComboBox::from_id_source("builder_category")
                    .selected_text(self.builder.category.label())
                    .show_ui(ui, |ui| {
                        for c in ALL_CATEGORIES {
                            ui.selectable_value(&mut self.builder.category, c, c.label());
                        }
                    });
                ui.end_row();

                ui.label("Name");
                let hint = self.builder.category.default_workout_name();
                ui.add(egui::TextEdit::singleline(&mut self.builder.name).hint_text(hint));
                ui.end_row();

                ui.label("Notes");
                ui.text_edit_multiline(&mut self.builder.notes);
                ui.end_row();
            });
        ui.separator();

        let mut actions = Vec::new();
        let active = self.builder.active_exercise().clone();
        ui.horizontal_wrapped(|ui| {
            for (i, e) in self.builder.exercises().iter().enumerate() {
                let label = if e.name.trim().is_empty() {
                    format!("Exercise {}", i + 1)
                } else {
                    e.name.clone()
                };
                if ui.selectable_label(e.id == self.builder.active_id(), label).clicked() {
                    actions.push(BuilderAction::Select(e.id));
                }
            }
            if ui.button("+ Exercise").clicked() {
                actions.push(BuilderAction::AddExercise);
            }
        });

        ui.group(|ui| {
            let mut name = active.name.clone();
            ui.horizontal(|ui| {
                ui.label("Exercise");
                if ui
                    .add(egui::TextEdit::singleline(&mut name).hint_text("Type or pick an exercise"))
                    .changed()
                {
                    actions.push(BuilderAction::Rename(active.id, name.clone()));
                }
                egui::ComboBox::from_id_source("catalog_picker")
                    .selected_text("Catalog")
                    .show_ui(ui, |ui| {
                        for split in ALL_SPLITS {
                            ui.strong(split.label());
                            for known in catalog::names_for(split) {
                                if ui.selectable_label(active.name == known, known).clicked() {
                                    actions.push(BuilderAction::Rename(active.id, known.to_string()));
                                }
                            }
                        }
                    });
            });
            if catalog::info_for(&active.name).is_none() && !active.name.trim().is_empty() {
                let suggestions = catalog::suggest(&active.name, 5);
                if !suggestions.is_empty() {
                    ui.horizontal_wrapped(|ui| {
                        ui.weak("Did you mean");
                        for s in suggestions {
                            if ui.small_button(s).clicked() {
                                actions.push(BuilderAction::Rename(active.id, s.to_string()));
                            }
                        }
                    });
                }
            }
            if let Some(muscle) = catalog::muscle_for(&active.name) {
                ui.weak(format!("Works {}", muscle.label()));
            }

            egui::Grid::new("builder_sets")
                .num_columns(4)
                .striped(true)
                .show(ui, |ui| {
                    ui.strong("Set");
                    ui.strong("Weight");
                    ui.strong("Reps");
                    ui.end_row();
                    for (i, set) in active.sets.iter().enumerate() {
                        ui.label(format!("{}", i + 1));
                        let mut weight = set.weight.clone();
                        if ui
                            .add(egui::TextEdit::singleline(&mut weight).desired_width(70.0))
                            .changed()
                        {
                            actions.push(BuilderAction::UpdateSet(active.id, set.id, SetField::Weight, weight));
                        }
                        let mut reps = set.reps.clone();
                        if ui
                            .add(egui::TextEdit::singleline(&mut reps).desired_width(50.0))
                            .changed()
                        {
                            actions.push(BuilderAction::UpdateSet(active.id, set.id, SetField::Reps, reps));
                        }
                        if ui.small_button("Remove").clicked() {
                            actions.push(BuilderAction::RemoveSet(active.id, set.id));
                        }
                        ui.end_row();
                    }
                });
            ui.horizontal(|ui| {
                if ui.button("Add Set").clicked() {
                    actions.push(BuilderAction::AddSet(active.id));
                }
                let removable = self.builder.exercises().len() > 1;
                if ui
                    .add_enabled(removable, egui::Button::new("Remove Exercise"))
                    .clicked()
                {
                    actions.push(BuilderAction::RemoveExercise(active.id));
                }
            });
        });

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Save Workout").clicked() {
                actions.push(BuilderAction::Save);
            }
            if ui.button("Reset").clicked() {
                actions.push(BuilderAction::Reset);
            }
        });

        for action in actions {
            match action {
                BuilderAction::Select(id) => {
                    self.builder.set_active(id);
                }
                BuilderAction::AddExercise => {
                    self.builder.add_exercise();
                }
                BuilderAction::RemoveExercise(id) => {
                    self.builder.remove_exercise(id);
                }
                BuilderAction::Rename(id, name) => {
                    self.builder.set_exercise_name(id, &name);
                }
                BuilderAction::AddSet(id) => {
                    self.builder.add_set(id);
                }
                BuilderAction::UpdateSet(exercise, set, field, value) => {
                    self.builder.update_set(exercise, set, field, &value);
                }
                BuilderAction::RemoveSet(exercise, set) => {
                    self.builder.remove_set(exercise, set);
                }
                BuilderAction::Save => self.log_workout(),
                BuilderAction::Reset => self.builder.reset(today()),
            }
        }
    }

    pub(crate) fn history_ui(&mut self, ui: &mut egui::Ui) {
        let today = today();
        let suffix = self.settings.weight_unit.suffix();
        let by_category = &self.history;
        let all = history::all_newest_first(by_category);

        ui.heading("History");
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.history_tab, HistoryTab::ByCategory, "By Category");
            ui.selectable_value(&mut self.history_tab, HistoryTab::ByMuscle, "By Muscle Group");
            ui.selectable_value(&mut self.history_tab, HistoryTab::All, "All Workouts");
            ui.selectable_value(&mut self.history_tab, HistoryTab::Recent, "Recent");
        });
        ui.separator();

        if all.is_empty() {
            ui.weak("No workouts logged yet.");
        }
        match self.history_tab {
            HistoryTab::ByCategory => {
                for (category, workouts) in by_category {
                    egui::CollapsingHeader::new(format!("{} ({})", category.label(), workouts.len()))
                        .id_source(category.slug())
                        .show(ui, |ui| {
                            for w in workouts {
                                Self::history_entry(ui, w, suffix, today);
                            }
                        });
                }
            }
            HistoryTab::ByMuscle => {
                egui::Grid::new("muscle_frequency")
                    .num_columns(3)
                    .striped(true)
                    .show(ui, |ui| {
                        ui.strong("Muscle Group");
                        ui.strong("Workouts");
                        ui.strong("Last Worked");
                        ui.end_row();
                        for f in history::muscle_group_frequency(&all) {
                            ui.label(f.group.label());
                            ui.label(f.workouts.to_string());
                            ui.label(
                                f.last_worked
                                    .map(|d| history::days_ago(d, today))
                                    .unwrap_or_else(|| "Never".into()),
                            );
                            ui.end_row();
                        }
                    });
            }
            HistoryTab::All => {
                for w in &all {
                    Self::history_entry(ui, w, suffix, today);
                }
            }
            HistoryTab::Recent => {
                for w in &history::recent(by_category, self.settings.recent_count) {
                    Self::history_entry(ui, w, suffix, today);
                }
            }
        }

        ui.separator();
        ui.strong(format!("Workouts per day, last {} days", self.settings.history_days));
        let series = history::workouts_per_day(&all, self.settings.history_days, today);
        let labels: Vec<String> = series
            .iter()
            .map(|(d, _)| d.format("%b %-d").to_string())
            .collect();
        Plot::new("workouts_per_day")
            .height(180.0)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _chars, _| {
                let i = mark.value.round();
                if i < 0.0 || (mark.value - i).abs() > f64::EPSILON {
                    return String::new();
                }
                labels.get(i as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(plotting::workouts_per_day_chart(&series));
            });

        ui.strong("Heaviest set per month");
        let best = history::monthly_best(&all, &TRACKED_LIFTS);
        if best.is_empty() {
            ui.weak("Log Bench Press, Squat or Deadlift to see progress.");
        }
        Plot::new("lift_progress")
            .height(200.0)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_formatter(move |mark, _chars, _| plotting::month_label(mark.value))
            .show(ui, |plot_ui| {
                for line in plotting::lift_progress_lines(&best) {
                    plot_ui.line(line);
                }
            });
    }

    fn history_entry(ui: &mut egui::Ui, workout: &Workout, suffix: &str, today: NaiveDate) {
        let summary = history::summarize(workout);
        egui::CollapsingHeader::new(summary_line(&summary, suffix, today))
            .id_source(format!("history_{}", workout.id))
            .show(ui, |ui| {
                ui.weak(workout.date.format("%A, %B %-d, %Y").to_string());
                workout_details(ui, workout);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkoutCategory;

    fn exercise(sets: &[(&str, &str)]) -> WorkoutExercise {
        WorkoutExercise {
            id: 1,
            name: "Bench Press".into(),
            sets: sets
                .iter()
                .enumerate()
                .map(|(i, (w, r))| SetEntry {
                    id: i as u32 + 1,
                    weight: (*w).into(),
                    reps: (*r).into(),
                })
                .collect(),
            notes: String::new(),
        }
    }

    #[test]
    fn sets_are_listed_in_order() {
        assert_eq!(sets_text(&exercise(&[("185", "8"), ("195", "5")])), "185 x 8, 195 x 5");
        assert_eq!(sets_text(&exercise(&[])), "no sets");
    }

    #[test]
    fn summary_line_mentions_totals() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let summary = WorkoutSummary {
            id: "push-1".into(),
            name: "Push Day".into(),
            category: WorkoutCategory::Push,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            exercises: 2,
            sets: 5,
            volume: 4200.0,
        };
        assert_eq!(
            summary_line(&summary, " lbs", today),
            "Push Day (Push) - 2 exercises, 5 sets, 4200 lbs lifted, Yesterday"
        );
    }

    #[test]
    fn dashboard_renders_with_staged_rows() {
        let mut app = HyperTrackApp::new(crate::Settings::default(), crate::Store::in_memory());
        app.exercises.start_create(Exercise::default());
        app.workout_list.begin_new_workout(today());
        let ctx = egui::Context::default();
        let _ = ctx.run(Default::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                app.dashboard_ui(ui);
                app.builder_ui(ui);
                app.history_ui(ui);
            });
            app.new_workout_window(ctx);
        });
        assert!(app.exercises.is_creating());
        assert!(app.workout_list.is_creating());
    }
}
