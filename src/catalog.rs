use phf::phf_map;

use crate::model::MuscleGroup;

/// Training split an exercise usually belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Push,
    Pull,
    Legs,
}

pub const ALL_SPLITS: [Split; 3] = [Split::Push, Split::Pull, Split::Legs];

impl Split {
    pub fn label(self) -> &'static str {
        match self {
            Split::Push => "Push",
            Split::Pull => "Pull",
            Split::Legs => "Legs",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExerciseInfo {
    pub split: Split,
    pub muscle: MuscleGroup,
}

pub static EXERCISES: phf::Map<&'static str, ExerciseInfo> = phf_map! {
    "Bench Press" => ExerciseInfo { split: Split::Push, muscle: MuscleGroup::Chest },
    "Incline Bench Press" => ExerciseInfo { split: Split::Push, muscle: MuscleGroup::Chest },
    "Chest Fly" => ExerciseInfo { split: Split::Push, muscle: MuscleGroup::Chest },
    "Shoulder Press" => ExerciseInfo { split: Split::Push, muscle: MuscleGroup::Shoulders },
    "Overhead Press" => ExerciseInfo { split: Split::Push, muscle: MuscleGroup::Shoulders },
    "Lateral Raise" => ExerciseInfo { split: Split::Push, muscle: MuscleGroup::Shoulders },
    "Tricep Pushdown" => ExerciseInfo { split: Split::Push, muscle: MuscleGroup::Triceps },
    "Tricep Extension" => ExerciseInfo { split: Split::Push, muscle: MuscleGroup::Triceps },
    "Deadlift" => ExerciseInfo { split: Split::Pull, muscle: MuscleGroup::Back },
    "Pull-up" => ExerciseInfo { split: Split::Pull, muscle: MuscleGroup::Back },
    "Barbell Row" => ExerciseInfo { split: Split::Pull, muscle: MuscleGroup::Back },
    "Lat Pulldown" => ExerciseInfo { split: Split::Pull, muscle: MuscleGroup::Back },
    "Face Pull" => ExerciseInfo { split: Split::Pull, muscle: MuscleGroup::Shoulders },
    "Shrug" => ExerciseInfo { split: Split::Pull, muscle: MuscleGroup::Traps },
    "Bicep Curl" => ExerciseInfo { split: Split::Pull, muscle: MuscleGroup::Biceps },
    "Hammer Curl" => ExerciseInfo { split: Split::Pull, muscle: MuscleGroup::Biceps },
    "Squat" => ExerciseInfo { split: Split::Legs, muscle: MuscleGroup::Quads },
    "Leg Press" => ExerciseInfo { split: Split::Legs, muscle: MuscleGroup::Quads },
    "Leg Extension" => ExerciseInfo { split: Split::Legs, muscle: MuscleGroup::Quads },
    "Romanian Deadlift" => ExerciseInfo { split: Split::Legs, muscle: MuscleGroup::Hamstrings },
    "Leg Curl" => ExerciseInfo { split: Split::Legs, muscle: MuscleGroup::Hamstrings },
    "Calf Raise" => ExerciseInfo { split: Split::Legs, muscle: MuscleGroup::Calves },
    "Hip Thrust" => ExerciseInfo { split: Split::Legs, muscle: MuscleGroup::OtherLegs },
    "Hanging Leg Raise" => ExerciseInfo { split: Split::Legs, muscle: MuscleGroup::Abs },
};

/// Lookup by exact name, then ignoring case and a trailing plural `s`.
pub fn info_for(exercise: &str) -> Option<&'static ExerciseInfo> {
    if let Some(info) = EXERCISES.get(exercise) {
        return Some(info);
    }
    let wanted = exercise.trim().to_lowercase();
    let singular = wanted.strip_suffix('s').unwrap_or(&wanted);
    EXERCISES.entries().find_map(|(name, info)| {
        let name = name.to_lowercase();
        (name == wanted || name == singular).then_some(info)
    })
}

pub fn muscle_for(exercise: &str) -> Option<MuscleGroup> {
    info_for(exercise).map(|i| i.muscle)
}

/// Sorted exercise names for one split.
pub fn names_for(split: Split) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = EXERCISES
        .entries()
        .filter(|(_, info)| info.split == split)
        .map(|(name, _)| *name)
        .collect();
    names.sort_unstable();
    names
}

/// Catalog names resembling `query`, best match first.
pub fn suggest(query: &str, limit: usize) -> Vec<&'static str> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<(f64, &'static str)> = EXERCISES
        .keys()
        .map(|name| {
            let lower = name.to_lowercase();
            let score = if lower.contains(&query) {
                1.0
            } else {
                strsim::jaro_winkler(&query, &lower)
            };
            (score, *name)
        })
        .filter(|(score, _)| *score >= 0.8)
        .collect();
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.cmp(b.1))
    });
    scored.into_iter().take(limit).map(|(_, n)| n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_plural() {
        assert_eq!(muscle_for("Bench Press"), Some(MuscleGroup::Chest));
        assert_eq!(muscle_for("bench press"), Some(MuscleGroup::Chest));
        assert_eq!(muscle_for("Pull-ups"), Some(MuscleGroup::Back));
        assert_eq!(muscle_for("Underwater Basket Weaving"), None);
    }

    #[test]
    fn names_grouped_by_split() {
        let legs = names_for(Split::Legs);
        assert!(legs.contains(&"Squat"));
        assert!(!legs.contains(&"Deadlift"));
        let mut sorted = legs.clone();
        sorted.sort();
        assert_eq!(legs, sorted);
        let total: usize = ALL_SPLITS.iter().map(|s| names_for(*s).len()).sum();
        assert_eq!(total, EXERCISES.len());
    }

    #[test]
    fn suggestions_match_typos_and_fragments() {
        assert_eq!(suggest("Bench Pres", 1), vec!["Bench Press"]);
        assert!(suggest("curl", 5).contains(&"Leg Curl"));
        assert!(suggest("", 5).is_empty());
        assert!(suggest("zzzzzz", 5).is_empty());
    }
}
