//! Composes a single workout with several exercises before it is logged.

use crate::collection::{EditableCollection, ValidationError};
use crate::ids;
use crate::metrics::{self, TOTAL_WORKOUTS};
use crate::model::{SetEntry, Workout, WorkoutCategory, WorkoutExercise};
use crate::store::{SaveOutcome, Store};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Weight,
    Reps,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutBuilder {
    pub date: NaiveDate,
    pub category: WorkoutCategory,
    pub name: String,
    pub notes: String,
    exercises: Vec<WorkoutExercise>,
    active: u32,
}

fn blank_exercise(id: u32) -> WorkoutExercise {
    WorkoutExercise {
        id,
        ..WorkoutExercise::default()
    }
}

impl WorkoutBuilder {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today,
            category: WorkoutCategory::Push,
            name: String::new(),
            notes: String::new(),
            exercises: vec![blank_exercise(1)],
            active: 1,
        }
    }

    pub fn reset(&mut self, today: NaiveDate) {
        let category = self.category;
        *self = Self::new(today);
        self.category = category;
    }

    pub fn exercises(&self) -> &[WorkoutExercise] {
        &self.exercises
    }

    pub fn active_id(&self) -> u32 {
        self.active
    }

    /// The active exercise, or the first one if the active id went stale.
    pub fn active_exercise(&self) -> &WorkoutExercise {
        self.exercises
            .iter()
            .find(|e| e.id == self.active)
            .unwrap_or(&self.exercises[0])
    }

    pub fn set_active(&mut self, id: u32) -> bool {
        if self.exercises.iter().any(|e| e.id == id) {
            self.active = id;
            true
        } else {
            false
        }
    }

    pub fn exercise_mut(&mut self, id: u32) -> Option<&mut WorkoutExercise> {
        self.exercises.iter_mut().find(|e| e.id == id)
    }

    /// Add an empty exercise and make it active.
    pub fn add_exercise(&mut self) -> u32 {
        let id = ids::next_local_id(self.exercises.iter().map(|e| e.id));
        self.exercises.push(blank_exercise(id));
        self.active = id;
        id
    }

    /// Remove an exercise. The last remaining exercise cannot be removed.
    pub fn remove_exercise(&mut self, id: u32) -> bool {
        if self.exercises.len() <= 1 {
            return false;
        }
        let before = self.exercises.len();
        self.exercises.retain(|e| e.id != id);
        if self.exercises.len() == before {
            return false;
        }
        self.active = self.exercises[0].id;
        true
    }

    pub fn set_exercise_name(&mut self, id: u32, name: &str) -> bool {
        match self.exercise_mut(id) {
            Some(ex) => {
                ex.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn add_set(&mut self, exercise_id: u32) -> Option<u32> {
        let ex = self.exercise_mut(exercise_id)?;
        let id = ex.next_set_id();
        ex.sets.push(SetEntry {
            id,
            ..SetEntry::default()
        });
        Some(id)
    }

    pub fn update_set(&mut self, exercise_id: u32, set_id: u32, field: SetField, value: &str) -> bool {
        let Some(set) = self
            .exercise_mut(exercise_id)
            .and_then(|ex| ex.sets.iter_mut().find(|s| s.id == set_id))
        else {
            return false;
        };
        match field {
            SetField::Weight => set.weight = value.to_string(),
            SetField::Reps => set.reps = value.to_string(),
        }
        true
    }

    pub fn remove_set(&mut self, exercise_id: u32, set_id: u32) -> bool {
        let Some(ex) = self.exercise_mut(exercise_id) else {
            return false;
        };
        let before = ex.sets.len();
        ex.sets.retain(|s| s.id != set_id);
        ex.sets.len() != before
    }

    /// Produce the workout to be logged.
    ///
    /// Only named exercises with at least one set holding both weight and
    /// reps are kept, and only their complete sets. At least one such
    /// exercise is required.
    pub fn build(&self) -> Result<Workout, ValidationError> {
        let exercises: Vec<WorkoutExercise> = self
            .exercises
            .iter()
            .filter_map(WorkoutExercise::completed)
            .collect();
        if exercises.is_empty() {
            return Err(ValidationError::NoCompleteExercise);
        }
        let name = if self.name.trim().is_empty() {
            self.category.default_workout_name()
        } else {
            self.name.trim().to_string()
        };
        Ok(Workout {
            id: ids::generate(self.category.slug()),
            name,
            category: self.category,
            date: self.date,
            notes: self.notes.trim().to_string(),
            exercises,
        })
    }

    /// Log the workout under its category, bump the workout counter and
    /// start over.
    pub fn save(
        &mut self,
        store: &mut Store,
        today: NaiveDate,
    ) -> Result<(Workout, SaveOutcome), ValidationError> {
        let workout = self.build()?;
        let mut list = EditableCollection::<Workout>::load(store, self.category.storage_key());
        let outcome = list.push(store, workout.clone());
        let (_, counter) = metrics::adjust_counter(store, TOTAL_WORKOUTS, 1);
        log::info!(
            "Logged {} with {} exercises under `{}`",
            workout.id,
            workout.exercises.len(),
            list.key()
        );
        self.reset(today);
        Ok((workout, outcome.and(counter)))
    }
}
