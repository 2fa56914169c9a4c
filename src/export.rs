use crate::history::parse_amount;
use crate::model::Workout;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

pub fn write_csv<T: Serialize>(writer: impl Write, records: &[T]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(Into::into)
}

/// One logged set, flattened with its workout and exercise.
#[derive(Debug, Serialize, PartialEq)]
pub struct SetRow<'a> {
    pub workout_id: &'a str,
    pub workout: &'a str,
    pub category: &'static str,
    pub date: String,
    pub exercise: &'a str,
    pub set: usize,
    pub weight: &'a str,
    pub reps: &'a str,
    pub weight_value: Option<f64>,
    pub reps_value: Option<f64>,
}

pub fn set_rows(workouts: &[Workout]) -> Vec<SetRow<'_>> {
    let mut rows = Vec::new();
    for w in workouts {
        let date = w.date.format("%Y-%m-%d").to_string();
        for e in &w.exercises {
            for (i, s) in e.sets.iter().enumerate() {
                rows.push(SetRow {
                    workout_id: &w.id,
                    workout: &w.name,
                    category: w.category.slug(),
                    date: date.clone(),
                    exercise: &e.name,
                    set: i + 1,
                    weight: &s.weight,
                    reps: &s.reps,
                    weight_value: parse_amount(&s.weight),
                    reps_value: parse_amount(&s.reps),
                });
            }
        }
    }
    rows
}

pub fn save_workouts_csv<P: AsRef<Path>>(path: P, workouts: &[Workout]) -> csv::Result<()> {
    write_csv(std::fs::File::create(path)?, &set_rows(workouts))
}

pub fn save_workouts_json<P: AsRef<Path>>(path: P, workouts: &[Workout]) -> std::io::Result<()> {
    write_json(workouts, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SetEntry, WorkoutCategory, WorkoutExercise};
    use chrono::NaiveDate;

    fn workouts() -> Vec<Workout> {
        vec![Workout {
            id: "push-1".into(),
            name: "Push Day".into(),
            category: WorkoutCategory::Push,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            notes: String::new(),
            exercises: vec![WorkoutExercise {
                id: 1,
                name: "Bench Press".into(),
                sets: vec![
                    SetEntry {
                        id: 1,
                        weight: "185".into(),
                        reps: "8".into(),
                    },
                    SetEntry {
                        id: 2,
                        weight: "BW".into(),
                        reps: "10".into(),
                    },
                ],
                notes: String::new(),
            }],
        }]
    }

    #[test]
    fn csv_has_one_row_per_set() {
        let mut out = Vec::new();
        write_csv(&mut out, &set_rows(&workouts())).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "workout_id,workout,category,date,exercise,set,weight,reps,weight_value,reps_value"
        );
        assert_eq!(lines[1], "push-1,Push Day,push,2025-06-01,Bench Press,1,185,8,185.0,8.0");
        assert_eq!(lines[2], "push-1,Push Day,push,2025-06-01,Bench Press,2,BW,10,,10.0");
    }

    #[test]
    fn json_export_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workouts.json");
        save_workouts_json(&path, &workouts()).unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        let back: Vec<Workout> = serde_json::from_str(&data).unwrap();
        assert_eq!(back, workouts());
    }
}
