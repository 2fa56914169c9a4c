// Records persisted in the store
use crate::collection::{Record, ValidationError};
use crate::ids;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Muscle groups that each own an exercise log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Triceps,
    Biceps,
    Abs,
    Traps,
    Quads,
    Hamstrings,
    Calves,
    OtherLegs,
}

pub const ALL_MUSCLE_GROUPS: [MuscleGroup; 11] = [
    MuscleGroup::Chest,
    MuscleGroup::Back,
    MuscleGroup::Shoulders,
    MuscleGroup::Triceps,
    MuscleGroup::Biceps,
    MuscleGroup::Abs,
    MuscleGroup::Traps,
    MuscleGroup::Quads,
    MuscleGroup::Hamstrings,
    MuscleGroup::Calves,
    MuscleGroup::OtherLegs,
];

impl MuscleGroup {
    pub fn slug(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Triceps => "triceps",
            MuscleGroup::Biceps => "biceps",
            MuscleGroup::Abs => "abs",
            MuscleGroup::Traps => "traps",
            MuscleGroup::Quads => "quads",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Calves => "calves",
            MuscleGroup::OtherLegs => "other-legs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Abs => "Abs",
            MuscleGroup::Traps => "Traps",
            MuscleGroup::Quads => "Quads",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Calves => "Calves",
            MuscleGroup::OtherLegs => "Other Legs",
        }
    }

    pub fn storage_key(self) -> String {
        format!("exercises-{}", self.slug())
    }
}

/// Category a workout is filed under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum WorkoutCategory {
    #[default]
    Push,
    Pull,
    Legs,
    Chest,
    Back,
    Arms,
    ShouldersTraps,
    Upper,
    Lower,
    Full,
    Custom,
}

/// Categories shown as workout list tabs on the dashboard.
pub const LIST_CATEGORIES: [WorkoutCategory; 7] = [
    WorkoutCategory::Push,
    WorkoutCategory::Pull,
    WorkoutCategory::Legs,
    WorkoutCategory::Chest,
    WorkoutCategory::Back,
    WorkoutCategory::Arms,
    WorkoutCategory::ShouldersTraps,
];

pub const ALL_CATEGORIES: [WorkoutCategory; 11] = [
    WorkoutCategory::Push,
    WorkoutCategory::Pull,
    WorkoutCategory::Legs,
    WorkoutCategory::Chest,
    WorkoutCategory::Back,
    WorkoutCategory::Arms,
    WorkoutCategory::ShouldersTraps,
    WorkoutCategory::Upper,
    WorkoutCategory::Lower,
    WorkoutCategory::Full,
    WorkoutCategory::Custom,
];

impl WorkoutCategory {
    pub fn slug(self) -> &'static str {
        match self {
            WorkoutCategory::Push => "push",
            WorkoutCategory::Pull => "pull",
            WorkoutCategory::Legs => "legs",
            WorkoutCategory::Chest => "chest",
            WorkoutCategory::Back => "back",
            WorkoutCategory::Arms => "arms",
            WorkoutCategory::ShouldersTraps => "shoulders-traps",
            WorkoutCategory::Upper => "upper",
            WorkoutCategory::Lower => "lower",
            WorkoutCategory::Full => "full",
            WorkoutCategory::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkoutCategory::Push => "Push",
            WorkoutCategory::Pull => "Pull",
            WorkoutCategory::Legs => "Legs",
            WorkoutCategory::Chest => "Chest",
            WorkoutCategory::Back => "Back",
            WorkoutCategory::Arms => "Arms",
            WorkoutCategory::ShouldersTraps => "Shoulders & Traps",
            WorkoutCategory::Upper => "Upper Body",
            WorkoutCategory::Lower => "Lower Body",
            WorkoutCategory::Full => "Full Body",
            WorkoutCategory::Custom => "Custom",
        }
    }

    pub fn storage_key(self) -> String {
        format!("workouts-{}", self.slug())
    }

    /// Name given to a logged workout that was not named explicitly.
    pub fn default_workout_name(self) -> String {
        match self {
            WorkoutCategory::Upper
            | WorkoutCategory::Lower
            | WorkoutCategory::Full
            | WorkoutCategory::Custom => format!("{} Workout", self.label()),
            _ => format!("{} Day", self.label()),
        }
    }
}

/// Row of a muscle-group exercise log.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub weight: String,
    pub reps: String,
    pub notes: String,
}

impl Record for Exercise {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn id_prefix(&self) -> &str {
        "exercise"
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SetEntry {
    pub id: u32,
    pub weight: String,
    pub reps: String,
}

impl SetEntry {
    pub fn is_complete(&self) -> bool {
        !self.weight.trim().is_empty() && !self.reps.trim().is_empty()
    }
}

/// Exercise performed as part of a workout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "WorkoutExerciseRepr")]
pub struct WorkoutExercise {
    pub id: u32,
    pub name: String,
    pub sets: Vec<SetEntry>,
    pub notes: String,
}

impl WorkoutExercise {
    pub fn next_set_id(&self) -> u32 {
        ids::next_local_id(self.sets.iter().map(|s| s.id))
    }

    pub fn has_complete_set(&self) -> bool {
        self.sets.iter().any(SetEntry::is_complete)
    }

    /// This exercise with only its complete sets, or `None` when it is
    /// unnamed or has no complete set.
    pub fn completed(&self) -> Option<WorkoutExercise> {
        if self.name.trim().is_empty() || !self.has_complete_set() {
            return None;
        }
        Some(WorkoutExercise {
            id: self.id,
            name: self.name.trim().to_string(),
            sets: self.sets.iter().filter(|s| s.is_complete()).cloned().collect(),
            notes: self.notes.clone(),
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            Err(ValidationError::EmptyName)
        } else {
            Ok(())
        }
    }
}

/// Accepted on-disk shapes of a workout exercise.
///
/// Older workout lists stored `weight`, `reps` and a set count directly on the
/// exercise; those are expanded into that many identical sets.
#[derive(Deserialize)]
#[serde(untagged)]
enum WorkoutExerciseRepr {
    Nested {
        #[serde(default)]
        id: u32,
        #[serde(default)]
        name: String,
        sets: Vec<SetEntry>,
        #[serde(default)]
        notes: String,
    },
    Flat {
        #[serde(default)]
        name: String,
        #[serde(default)]
        weight: String,
        #[serde(default)]
        reps: String,
        #[serde(default)]
        sets: String,
        #[serde(default)]
        notes: String,
    },
}

impl From<WorkoutExerciseRepr> for WorkoutExercise {
    fn from(repr: WorkoutExerciseRepr) -> Self {
        match repr {
            WorkoutExerciseRepr::Nested {
                id,
                name,
                sets,
                notes,
            } => WorkoutExercise {
                id,
                name,
                sets,
                notes,
            },
            WorkoutExerciseRepr::Flat {
                name,
                weight,
                reps,
                sets,
                notes,
            } => {
                let count = sets.trim().parse::<u32>().unwrap_or(0);
                let sets = if count == 0 && weight.trim().is_empty() && reps.trim().is_empty() {
                    Vec::new()
                } else {
                    (1..=count.max(1))
                        .map(|id| SetEntry {
                            id,
                            weight: weight.clone(),
                            reps: reps.clone(),
                        })
                        .collect()
                };
                WorkoutExercise {
                    id: 0,
                    name,
                    sets,
                    notes,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: WorkoutCategory,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
}

impl Workout {
    pub fn new(category: WorkoutCategory, date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            category,
            date,
            notes: String::new(),
            exercises: Vec::new(),
        }
    }

    pub fn next_exercise_id(&self) -> u32 {
        ids::next_local_id(self.exercises.iter().map(|e| e.id))
    }

    pub fn set_count(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// Drop unnamed exercises, exercises without a complete set, and
    /// incomplete sets.
    pub fn drop_incomplete(&mut self) {
        self.exercises = self
            .exercises
            .iter()
            .filter_map(WorkoutExercise::completed)
            .collect();
    }
}

impl Record for Workout {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn id_prefix(&self) -> &str {
        self.category.slug()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !self
            .exercises
            .iter()
            .any(|e| !e.name.trim().is_empty() && e.has_complete_set())
        {
            return Err(ValidationError::NoCompleteExercise);
        }
        Ok(())
    }

    /// Give exercises and sets that were stored without one a local id.
    fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        let mut next = self.next_exercise_id();
        for ex in &mut self.exercises {
            if ex.id == 0 || !seen.insert(ex.id) {
                ex.id = next;
                seen.insert(next);
                next += 1;
            }
            let mut set_ids = std::collections::HashSet::new();
            let mut next_set = ex.next_set_id();
            for set in &mut ex.sets {
                if set.id == 0 || !set_ids.insert(set.id) {
                    set.id = next_set;
                    set_ids.insert(next_set);
                    next_set += 1;
                }
            }
        }
    }
}

/// Best lift shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalRecord {
    pub exercise: String,
    pub weight: String,
    pub date: String,
}

impl PersonalRecord {
    pub fn unset(exercise: &str, weight: &str) -> Self {
        Self {
            exercise: exercise.to_string(),
            weight: weight.to_string(),
            date: "Not set".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_follow_slugs() {
        assert_eq!(MuscleGroup::OtherLegs.storage_key(), "exercises-other-legs");
        assert_eq!(
            WorkoutCategory::ShouldersTraps.storage_key(),
            "workouts-shoulders-traps"
        );
        assert_eq!(WorkoutCategory::ShouldersTraps.label(), "Shoulders & Traps");
    }

    #[test]
    fn category_serializes_as_slug() {
        let json = serde_json::to_string(&WorkoutCategory::ShouldersTraps).unwrap();
        assert_eq!(json, "\"shoulders-traps\"");
        for c in ALL_CATEGORIES {
            let json = serde_json::to_string(&c).unwrap();
            assert_eq!(json.trim_matches('"'), c.slug());
        }
    }

    #[test]
    fn workout_date_is_plain_text() {
        let w = Workout::new(
            WorkoutCategory::Push,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        );
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["date"], "2025-06-01");
        assert_eq!(json["category"], "push");
    }

    #[test]
    fn exercise_without_id_loads_with_defaults() {
        let ex: Exercise =
            serde_json::from_str(r#"{"name":"Incline Press","weight":"135","reps":"10"}"#)
                .unwrap();
        assert!(ex.id.is_empty());
        assert_eq!(ex.name, "Incline Press");
        assert!(ex.notes.is_empty());
    }

    #[test]
    fn flat_exercise_expands_into_sets() {
        let ex: WorkoutExercise = serde_json::from_str(
            r#"{"name":"Bench Press","weight":"185","reps":"8","sets":"3","notes":""}"#,
        )
        .unwrap();
        assert_eq!(ex.sets.len(), 3);
        assert!(ex.sets.iter().all(|s| s.weight == "185" && s.reps == "8"));
        assert_eq!(
            ex.sets.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn empty_flat_exercise_has_no_sets() {
        let ex: WorkoutExercise = serde_json::from_str(
            r#"{"name":"","weight":"","reps":"","sets":"","notes":""}"#,
        )
        .unwrap();
        assert!(ex.sets.is_empty());
    }

    #[test]
    fn nested_exercise_roundtrips() {
        let ex = WorkoutExercise {
            id: 2,
            name: "Squat".into(),
            sets: vec![SetEntry {
                id: 1,
                weight: "225".into(),
                reps: "5".into(),
            }],
            notes: "belt".into(),
        };
        let json = serde_json::to_string(&ex).unwrap();
        let back: WorkoutExercise = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ex);
    }

    #[test]
    fn normalize_assigns_missing_local_ids() {
        let mut w: Workout = serde_json::from_str(
            r#"{"id":"push-1","name":"Heavy Push","date":"2025-06-01","exercises":[
                {"name":"Bench Press","weight":"185","reps":"8","sets":"2","notes":""},
                {"name":"Dips","weight":"BW","reps":"10","sets":"1","notes":""}
            ]}"#,
        )
        .unwrap();
        w.normalize();
        let ids: Vec<u32> = w.exercises.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(w.set_count(), 3);
    }

    #[test]
    fn default_names() {
        assert_eq!(WorkoutCategory::Push.default_workout_name(), "Push Day");
        assert_eq!(
            WorkoutCategory::Full.default_workout_name(),
            "Full Body Workout"
        );
    }
}
