// Derived views over the logged workouts
use crate::catalog;
use crate::model::{ALL_CATEGORIES, ALL_MUSCLE_GROUPS, MuscleGroup, Workout, WorkoutCategory};
use crate::store::Store;
use crate::workouts::WorkoutList;
use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern is valid"));

/// First number appearing in free text, e.g. `185` in `"185 lbs"` or `25` in
/// `"BW+25"`.
pub fn parse_amount(text: &str) -> Option<f64> {
    NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Condensed description of a workout used by history lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSummary {
    pub id: String,
    pub name: String,
    pub category: WorkoutCategory,
    pub date: NaiveDate,
    pub exercises: usize,
    pub sets: usize,
    pub volume: f64,
}

/// Summarize a workout. Volume adds weight × reps over sets where both
/// contain a number.
pub fn summarize(workout: &Workout) -> WorkoutSummary {
    let volume = workout
        .exercises
        .iter()
        .flat_map(|e| &e.sets)
        .filter_map(|s| Some(parse_amount(&s.weight)? * parse_amount(&s.reps)?))
        .sum();
    WorkoutSummary {
        id: workout.id.clone(),
        name: workout.name.clone(),
        category: workout.category,
        date: workout.date,
        exercises: workout.exercises.len(),
        sets: workout.set_count(),
        volume,
    }
}

/// Every category that has at least one logged workout, with its workouts
/// newest first.
pub fn workouts_by_category(store: &Store) -> Vec<(WorkoutCategory, Vec<Workout>)> {
    ALL_CATEGORIES
        .iter()
        .filter_map(|c| {
            let mut workouts = WorkoutList::load(store, *c).workouts().to_vec();
            if workouts.is_empty() {
                return None;
            }
            sort_newest_first(&mut workouts);
            Some((*c, workouts))
        })
        .collect()
}

pub fn all_newest_first(by_category: &[(WorkoutCategory, Vec<Workout>)]) -> Vec<Workout> {
    let mut all: Vec<Workout> = by_category
        .iter()
        .flat_map(|(_, w)| w.iter().cloned())
        .collect();
    sort_newest_first(&mut all);
    all
}

pub fn recent(by_category: &[(WorkoutCategory, Vec<Workout>)], n: usize) -> Vec<Workout> {
    let mut all = all_newest_first(by_category);
    all.truncate(n);
    all
}

fn sort_newest_first(workouts: &mut [Workout]) {
    workouts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
}

/// How often a muscle group was trained and when it was last worked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MuscleFrequency {
    pub group: MuscleGroup,
    pub workouts: usize,
    pub last_worked: Option<NaiveDate>,
}

/// Count, per muscle group, the workouts containing at least one exercise
/// for that group. Exercises missing from the catalog are not counted.
pub fn muscle_group_frequency(workouts: &[Workout]) -> Vec<MuscleFrequency> {
    let mut map: BTreeMap<MuscleGroup, (usize, Option<NaiveDate>)> = BTreeMap::new();
    for w in workouts {
        let groups: HashSet<MuscleGroup> = w
            .exercises
            .iter()
            .filter_map(|e| catalog::muscle_for(&e.name))
            .collect();
        for g in groups {
            let entry = map.entry(g).or_insert((0, None));
            entry.0 += 1;
            entry.1 = entry.1.max(Some(w.date));
        }
    }
    ALL_MUSCLE_GROUPS
        .iter()
        .map(|g| {
            let (workouts, last_worked) = map.get(g).copied().unwrap_or((0, None));
            MuscleFrequency {
                group: *g,
                workouts,
                last_worked,
            }
        })
        .collect()
}

/// Human friendly distance between `date` and `today`.
pub fn days_ago(date: NaiveDate, today: NaiveDate) -> String {
    match (today - date).num_days() {
        d if d < 0 => date.format("%b %-d, %Y").to_string(),
        0 => "Today".into(),
        1 => "Yesterday".into(),
        d => format!("{d} days ago"),
    }
}

/// Number of workouts on each of the `days` days ending with `today`,
/// oldest first.
pub fn workouts_per_day(workouts: &[Workout], days: usize, today: NaiveDate) -> Vec<(NaiveDate, usize)> {
    if days == 0 {
        return Vec::new();
    }
    let start = today - Duration::days(days as i64 - 1);
    let mut counts: BTreeMap<NaiveDate, usize> = (0..days as i64)
        .map(|i| (start + Duration::days(i), 0))
        .collect();
    for w in workouts {
        if let Some(c) = counts.get_mut(&w.date) {
            *c += 1;
        }
    }
    counts.into_iter().collect()
}

/// Heaviest logged set per month for each requested lift, keyed by lift
/// name and ordered by month.
pub fn monthly_best(workouts: &[Workout], lifts: &[&str]) -> BTreeMap<String, Vec<(NaiveDate, f64)>> {
    let mut best: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for w in workouts {
        let Some(month) = NaiveDate::from_ymd_opt(w.date.year(), w.date.month(), 1) else {
            continue;
        };
        for e in &w.exercises {
            let Some(lift) = lifts.iter().find(|l| l.eq_ignore_ascii_case(e.name.trim())) else {
                continue;
            };
            let heaviest = e
                .sets
                .iter()
                .filter_map(|s| parse_amount(&s.weight))
                .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |a| a.max(w))));
            if let Some(weight) = heaviest {
                let slot = best
                    .entry(lift.to_string())
                    .or_default()
                    .entry(month)
                    .or_insert(weight);
                *slot = slot.max(weight);
            }
        }
    }
    best.into_iter()
        .map(|(lift, months)| (lift, months.into_iter().collect()))
        .collect()
}
