use crate::collection::{EditableCollection, Record, ValidationError};
use crate::metrics::{self, TOTAL_WORKOUTS};
use crate::model::{SetEntry, Workout, WorkoutCategory, WorkoutExercise};
use crate::store::{SaveOutcome, Store};
use chrono::NaiveDate;

/// Exercise of a stored workout copied out for editing.
#[derive(Debug, Clone, PartialEq)]
struct ExerciseEdit {
    workout_id: String,
    index: usize,
    staged: WorkoutExercise,
    /// The exercise was appended to the workout just to be edited and is
    /// taken out again if the edit is cancelled.
    appended: bool,
}

/// Workouts logged under one category, with whole-workout creation and
/// per-exercise editing.
#[derive(Debug, Clone)]
pub struct WorkoutList {
    category: WorkoutCategory,
    workouts: EditableCollection<Workout>,
    exercise_edit: Option<ExerciseEdit>,
}

impl WorkoutList {
    /// Load the workouts stored under the category's key. The key decides the
    /// category, whatever the stored record says.
    pub fn load(store: &Store, category: WorkoutCategory) -> Self {
        let workouts =
            EditableCollection::load_with(store, category.storage_key(), |w: &mut Workout| {
                if w.category != category {
                    log::debug!("Refiling workout `{}` under {}", w.id, category.slug());
                    w.category = category;
                }
            });
        Self {
            category,
            workouts,
            exercise_edit: None,
        }
    }

    pub fn category(&self) -> WorkoutCategory {
        self.category
    }

    pub fn workouts(&self) -> &[Workout] {
        self.workouts.rows()
    }

    pub fn get(&self, id: &str) -> Option<&Workout> {
        self.workouts.get(id)
    }

    // New workout dialog

    pub fn is_creating(&self) -> bool {
        self.workouts.is_creating()
    }

    pub fn begin_new_workout(&mut self, today: NaiveDate) {
        self.exercise_edit = None;
        self.workouts.start_create(Workout::new(self.category, today));
    }

    pub fn new_workout_mut(&mut self) -> Option<&mut Workout> {
        if self.workouts.is_creating() {
            self.workouts.staged_mut()
        } else {
            None
        }
    }

    pub fn add_exercise_to_new(&mut self) -> Option<u32> {
        let w = self.new_workout_mut()?;
        let id = w.next_exercise_id();
        w.exercises.push(WorkoutExercise {
            id,
            sets: vec![SetEntry {
                id: 1,
                ..SetEntry::default()
            }],
            ..WorkoutExercise::default()
        });
        Some(id)
    }

    pub fn remove_exercise_from_new(&mut self, index: usize) -> bool {
        match self.new_workout_mut() {
            Some(w) if index < w.exercises.len() => {
                w.exercises.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Store the new workout and bump the workout counter.
    ///
    /// Like the builder, this needs a name and at least one named exercise
    /// with a complete set. Incomplete exercises and sets are left out of the
    /// stored workout. On failure the dialog keeps everything as entered.
    pub fn save_new_workout(&mut self, store: &mut Store) -> Result<SaveOutcome, ValidationError> {
        let staged = self
            .new_workout_mut()
            .ok_or(ValidationError::NothingStaged)?;
        staged.validate()?;
        staged.drop_incomplete();
        let saved = self.workouts.save(store)?;
        let (_, counter) = metrics::adjust_counter(store, TOTAL_WORKOUTS, 1);
        Ok(saved.and(counter))
    }

    pub fn cancel_new_workout(&mut self) {
        if self.workouts.is_creating() {
            self.workouts.cancel();
        }
    }

    /// Delete a workout and take it off the workout counter.
    pub fn delete_workout(&mut self, store: &mut Store, id: &str) -> Option<SaveOutcome> {
        let (removed, outcome) = self.workouts.delete(store, id)?;
        if self
            .exercise_edit
            .as_ref()
            .is_some_and(|e| e.workout_id == removed.id)
        {
            self.exercise_edit = None;
        }
        let (_, counter) = metrics::adjust_counter(store, TOTAL_WORKOUTS, -1);
        log::info!("Deleted workout {}", removed.id);
        Some(outcome.and(counter))
    }

    // Editing exercises of stored workouts

    pub fn editing_exercise(&self) -> Option<(&str, usize)> {
        self.exercise_edit
            .as_ref()
            .map(|e| (e.workout_id.as_str(), e.index))
    }

    pub fn edited_exercise_mut(&mut self) -> Option<&mut WorkoutExercise> {
        self.exercise_edit.as_mut().map(|e| &mut e.staged)
    }

    /// Stage exercise `index` of workout `workout_id`, dropping whatever
    /// was staged before.
    pub fn start_edit_exercise(&mut self, store: &mut Store, workout_id: &str, index: usize) -> bool {
        let Some(target) = self
            .workouts
            .get(workout_id)
            .and_then(|w| w.exercises.get(index))
            .map(|e| e.id)
        else {
            return false;
        };
        self.cancel_exercise(store);
        self.cancel_new_workout();
        // Cancelling may have removed an appended exercise, so look it up again.
        let Some((index, exercise)) = self.workouts.get(workout_id).and_then(|w| {
            w.exercises
                .iter()
                .enumerate()
                .find(|(_, e)| e.id == target)
                .map(|(i, e)| (i, e.clone()))
        }) else {
            return false;
        };
        self.exercise_edit = Some(ExerciseEdit {
            workout_id: workout_id.to_string(),
            index,
            staged: exercise,
            appended: false,
        });
        true
    }

    /// Append an empty exercise to a stored workout and start editing it.
    pub fn add_exercise_to(&mut self, store: &mut Store, workout_id: &str) -> Option<SaveOutcome> {
        self.cancel_exercise(store);
        self.cancel_new_workout();
        let mut appended = None;
        let outcome = self.workouts.update(store, workout_id, |w| {
            let exercise = WorkoutExercise {
                id: w.next_exercise_id(),
                ..WorkoutExercise::default()
            };
            w.exercises.push(exercise.clone());
            appended = Some((w.exercises.len() - 1, exercise));
        })?;
        let (index, staged) = appended?;
        self.exercise_edit = Some(ExerciseEdit {
            workout_id: workout_id.to_string(),
            index,
            staged,
            appended: true,
        });
        Some(outcome)
    }

    pub fn save_exercise(&mut self, store: &mut Store) -> Result<SaveOutcome, ValidationError> {
        let edit = self
            .exercise_edit
            .as_ref()
            .ok_or(ValidationError::NothingStaged)?;
        edit.staged.validate()?;
        let Some(edit) = self.exercise_edit.take() else {
            return Err(ValidationError::NothingStaged);
        };
        let outcome = self.workouts.update(store, &edit.workout_id, |w| {
            if let Some(slot) = w.exercises.get_mut(edit.index) {
                *slot = edit.staged.clone();
            }
        });
        outcome.ok_or(ValidationError::NothingStaged)
    }

    /// Drop the staged exercise. An exercise appended only for this edit is
    /// removed from its workout again.
    pub fn cancel_exercise(&mut self, store: &mut Store) {
        let Some(edit) = self.exercise_edit.take() else {
            return;
        };
        if edit.appended {
            self.workouts.update(store, &edit.workout_id, |w| {
                if w.exercises.get(edit.index).map(|e| e.id) == Some(edit.staged.id) {
                    w.exercises.remove(edit.index);
                }
            });
        }
    }

    pub fn delete_exercise(&mut self, store: &mut Store, workout_id: &str, index: usize) -> Option<SaveOutcome> {
        let mut removed = false;
        let outcome = self.workouts.update(store, workout_id, |w| {
            if index < w.exercises.len() {
                w.exercises.remove(index);
                removed = true;
            }
        })?;
        if !removed {
            return None;
        }
        let clear = match &mut self.exercise_edit {
            Some(edit) if edit.workout_id == workout_id => {
                if edit.index > index {
                    edit.index -= 1;
                    false
                } else {
                    edit.index == index
                }
            }
            _ => false,
        };
        if clear {
            self.exercise_edit = None;
        }
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn with_workout() -> (Store, WorkoutList, String) {
        let mut store = Store::in_memory();
        let mut list = WorkoutList::load(&store, WorkoutCategory::Push);
        list.begin_new_workout(day());
        list.new_workout_mut().unwrap().name = "Heavy Push".into();
        list.add_exercise_to_new();
        let ex = &mut list.new_workout_mut().unwrap().exercises[0];
        ex.name = "Bench Press".into();
        ex.sets[0].weight = "185".into();
        ex.sets[0].reps = "8".into();
        list.add_exercise_to_new();
        let ex = &mut list.new_workout_mut().unwrap().exercises[1];
        ex.name = "Dips".into();
        ex.sets[0].weight = "BW".into();
        ex.sets[0].reps = "12".into();
        list.save_new_workout(&mut store).unwrap();
        let id = list.workouts()[0].id.clone();
        (store, list, id)
    }

    #[test]
    fn new_workout_requires_name() {
        let mut store = Store::in_memory();
        let mut list = WorkoutList::load(&store, WorkoutCategory::Legs);
        list.begin_new_workout(day());
        assert_eq!(
            list.save_new_workout(&mut store),
            Err(ValidationError::EmptyName)
        );
        assert!(list.workouts().is_empty());
        assert!(list.is_creating());
        list.cancel_new_workout();
        assert!(!list.is_creating());
        assert!(store.get(TOTAL_WORKOUTS).is_none());
    }

    #[test]
    fn blank_dialog_workout_is_rejected() {
        let mut store = Store::in_memory();
        let mut list = WorkoutList::load(&store, WorkoutCategory::Push);
        list.begin_new_workout(day());
        list.add_exercise_to_new();
        list.new_workout_mut().unwrap().name = "x".into();
        assert_eq!(
            list.save_new_workout(&mut store),
            Err(ValidationError::NoCompleteExercise)
        );
        assert!(list.workouts().is_empty());
        assert!(store.get(TOTAL_WORKOUTS).is_none());
        assert!(store.load_list::<Workout>("workouts-push").is_empty());
        assert_eq!(list.new_workout_mut().unwrap().exercises.len(), 1);
    }

    #[test]
    fn dialog_save_drops_incomplete_parts() {
        let mut store = Store::in_memory();
        let mut list = WorkoutList::load(&store, WorkoutCategory::Push);
        list.begin_new_workout(day());
        list.new_workout_mut().unwrap().name = "Mixed".into();
        list.add_exercise_to_new();
        list.add_exercise_to_new();
        list.add_exercise_to_new();
        let w = list.new_workout_mut().unwrap();
        w.exercises[0].name = "Bench Press".into();
        w.exercises[0].sets[0].weight = "185".into();
        w.exercises[0].sets[0].reps = "8".into();
        w.exercises[0].sets.push(SetEntry {
            id: 2,
            weight: "185".into(),
            reps: String::new(),
        });
        w.exercises[1].name = "Dips".into();
        w.exercises[2].sets[0].weight = "50".into();
        w.exercises[2].sets[0].reps = "10".into();
        assert_eq!(list.save_new_workout(&mut store), Ok(SaveOutcome::Persisted));

        let saved: Vec<Workout> = store.load_list("workouts-push");
        assert_eq!(saved[0].exercises.len(), 1);
        assert_eq!(saved[0].exercises[0].name, "Bench Press");
        assert_eq!(saved[0].exercises[0].sets.len(), 1);
        assert_eq!(store.get(TOTAL_WORKOUTS), Some("1"));
    }

    #[test]
    fn create_and_delete_adjust_counter() {
        let (mut store, mut list, id) = with_workout();
        assert_eq!(list.workouts().len(), 1);
        assert!(id.starts_with("push-"));
        assert_eq!(store.get(TOTAL_WORKOUTS), Some("1"));
        let saved: Vec<Workout> = store.load_list("workouts-push");
        assert_eq!(saved[0].exercises.len(), 2);

        assert_eq!(list.delete_workout(&mut store, &id), Some(SaveOutcome::Persisted));
        assert!(list.workouts().is_empty());
        assert_eq!(store.get(TOTAL_WORKOUTS), Some("0"));
        assert!(store.load_list::<Workout>("workouts-push").is_empty());
    }

    #[test]
    fn editing_second_exercise_discards_first() {
        let (mut store, mut list, id) = with_workout();
        assert!(list.start_edit_exercise(&mut store, &id, 0));
        list.edited_exercise_mut().unwrap().name = "Changed".into();
        assert!(list.start_edit_exercise(&mut store, &id, 1));
        assert_eq!(list.editing_exercise(), Some((id.as_str(), 1)));
        list.edited_exercise_mut().unwrap().notes = "slow".into();
        list.save_exercise(&mut store).unwrap();

        let saved: Vec<Workout> = store.load_list("workouts-push");
        assert_eq!(saved[0].exercises[0].name, "Bench Press");
        assert_eq!(saved[0].exercises[1].notes, "slow");
    }

    #[test]
    fn exercise_name_is_required() {
        let (mut store, mut list, id) = with_workout();
        list.start_edit_exercise(&mut store, &id, 0);
        list.edited_exercise_mut().unwrap().name.clear();
        assert_eq!(list.save_exercise(&mut store), Err(ValidationError::EmptyName));
        assert!(list.editing_exercise().is_some());
    }

    #[test]
    fn cancelled_append_is_spliced_out() {
        let (mut store, mut list, id) = with_workout();
        list.add_exercise_to(&mut store, &id).unwrap();
        assert_eq!(list.get(&id).unwrap().exercises.len(), 3);
        assert_eq!(list.editing_exercise(), Some((id.as_str(), 2)));
        list.cancel_exercise(&mut store);
        assert_eq!(list.get(&id).unwrap().exercises.len(), 2);
        let saved: Vec<Workout> = store.load_list("workouts-push");
        assert_eq!(saved[0].exercises.len(), 2);
    }

    #[test]
    fn saved_append_stays() {
        let (mut store, mut list, id) = with_workout();
        list.add_exercise_to(&mut store, &id).unwrap();
        list.edited_exercise_mut().unwrap().name = "Lateral Raise".into();
        list.save_exercise(&mut store).unwrap();
        let saved: Vec<Workout> = store.load_list("workouts-push");
        assert_eq!(saved[0].exercises[2].name, "Lateral Raise");
        assert_eq!(saved[0].exercises[2].id, 3);
    }

    #[test]
    fn delete_exercise_shifts_pending_edit() {
        let (mut store, mut list, id) = with_workout();
        list.start_edit_exercise(&mut store, &id, 1);
        assert!(list.delete_exercise(&mut store, &id, 0).is_some());
        assert_eq!(list.editing_exercise(), Some((id.as_str(), 0)));
        assert!(list.delete_exercise(&mut store, &id, 5).is_none());
        list.delete_exercise(&mut store, &id, 0);
        assert!(list.editing_exercise().is_none());
        assert!(list.get(&id).unwrap().exercises.is_empty());
    }

    #[test]
    fn load_files_workouts_under_their_key() {
        let mut store = Store::in_memory();
        store
            .set(
                "workouts-pull",
                r#"[{"id":"pull-1","name":"Back Day","date":"2025-05-30","exercises":[
                    {"name":"Barbell Row","weight":"155","reps":"8","sets":"3","notes":""}
                ]}]"#,
            )
            .unwrap();
        let list = WorkoutList::load(&store, WorkoutCategory::Pull);
        let w = &list.workouts()[0];
        assert_eq!(w.category, WorkoutCategory::Pull);
        assert_eq!(w.exercises[0].id, 1);
        assert_eq!(w.exercises[0].sets.len(), 3);
    }
}
