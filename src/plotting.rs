use chrono::{Datelike, NaiveDate};
use egui_plot::{Bar, BarChart, Line, PlotPoints};
use std::collections::BTreeMap;

/// Lifts drawn on the progression chart.
pub const TRACKED_LIFTS: [&str; 3] = ["Bench Press", "Squat", "Deadlift"];

/// Bar positions for a per-day series: x is the day index, y the count.
pub fn per_day_points(series: &[(NaiveDate, usize)]) -> Vec<[f64; 2]> {
    series
        .iter()
        .enumerate()
        .map(|(i, (_, count))| [i as f64, *count as f64])
        .collect()
}

pub fn workouts_per_day_chart(series: &[(NaiveDate, usize)]) -> BarChart {
    let bars: Vec<Bar> = per_day_points(series)
        .into_iter()
        .zip(series)
        .map(|([x, y], (date, _))| Bar::new(x, y).name(date.format("%b %-d").to_string()))
        .collect();
    BarChart::new(bars).name("Workouts")
}

/// Points of a monthly series with x as days since the common era.
pub fn progress_points(series: &[(NaiveDate, f64)]) -> Vec<[f64; 2]> {
    series
        .iter()
        .map(|(d, v)| [d.num_days_from_ce() as f64, *v])
        .collect()
}

pub fn lift_progress_lines(best: &BTreeMap<String, Vec<(NaiveDate, f64)>>) -> Vec<Line> {
    best.iter()
        .map(|(lift, series)| Line::new(PlotPoints::from(progress_points(series))).name(lift))
        .collect()
}

/// Axis label for an x value produced by [`progress_points`].
pub fn month_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{x:.0}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn per_day_points_use_index() {
        let series = vec![(date("2025-06-01"), 1), (date("2025-06-02"), 0)];
        assert_eq!(per_day_points(&series), vec![[0.0, 1.0], [1.0, 0.0]]);
    }

    #[test]
    fn progress_points_use_day_number() {
        let d = date("2025-05-01");
        let pts = progress_points(&[(d, 175.0)]);
        assert_eq!(pts, vec![[d.num_days_from_ce() as f64, 175.0]]);
        assert_eq!(month_label(pts[0][0]), "May 2025");
    }

    #[test]
    fn one_line_per_lift() {
        let mut best = BTreeMap::new();
        best.insert("Squat".to_string(), vec![(date("2025-05-01"), 225.0)]);
        best.insert("Deadlift".to_string(), vec![(date("2025-05-01"), 265.0)]);
        assert_eq!(lift_progress_lines(&best).len(), 2);
    }
}
