use crate::WeightUnit;
use crate::store::{SaveOutcome, Store};

pub const TOTAL_WORKOUTS: &str = "totalWorkouts";
pub const CURRENT_WEIGHT: &str = "currentWeight";
pub const BODY_FAT: &str = "bodyFat";

const DEFAULT_VALUE: &str = "0";

/// Single editable value on the dashboard, stored as raw text under its key.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    key: &'static str,
    pub title: String,
    pub subtitle: String,
    pub suffix: String,
    value: String,
    editing: Option<String>,
}

impl MetricCard {
    pub fn load(store: &Store, key: &'static str, title: &str, subtitle: &str, suffix: &str) -> Self {
        let mut card = Self {
            key,
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            suffix: suffix.to_string(),
            value: DEFAULT_VALUE.to_string(),
            editing: None,
        };
        card.reload(store);
        card
    }

    /// Pick up the stored value again, dropping any unsaved edit.
    pub fn reload(&mut self, store: &Store) {
        self.value = store
            .get(self.key)
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_VALUE.to_string());
        self.editing = None;
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn display(&self) -> String {
        format!("{}{}", self.value, self.suffix)
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn start_edit(&mut self) {
        self.editing = Some(self.value.clone());
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut String> {
        self.editing.as_mut()
    }

    /// Commit the edit buffer. Returns `None` when nothing was being edited.
    pub fn save(&mut self, store: &mut Store) -> Option<SaveOutcome> {
        let value = self.editing.take()?;
        self.value = value.trim().to_string();
        Some(SaveOutcome::from_result(
            store.set(self.key, self.value.clone()),
            self.key,
        ))
    }

    pub fn cancel(&mut self) {
        self.editing = None;
    }

    /// Forget the stored value so the card shows its default again.
    pub fn reset(&mut self, store: &mut Store) -> SaveOutcome {
        let outcome = SaveOutcome::from_result(store.remove(self.key), self.key);
        self.reload(store);
        outcome
    }
}

/// The three value cards shown at the top of the dashboard.
pub fn dashboard_cards(store: &Store, unit: WeightUnit) -> Vec<MetricCard> {
    let year = chrono::Local::now().format("%Y");
    vec![
        MetricCard::load(
            store,
            TOTAL_WORKOUTS,
            &format!("Total Workouts ({year})"),
            "Start tracking today!",
            "",
        ),
        MetricCard::load(
            store,
            CURRENT_WEIGHT,
            "Current Weight",
            "Tap to update",
            unit.suffix(),
        ),
        MetricCard::load(store, BODY_FAT, "Body Fat %", "Tap to update", "%"),
    ]
}

/// Interpret stored counter text. Anything that is not a non-negative whole
/// number counts as zero.
pub fn parse_counter(text: &str) -> u64 {
    let text = text.trim();
    text.parse::<u64>()
        .ok()
        .or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(|v| v.floor() as u64)
        })
        .unwrap_or(0)
}

/// Add `delta` to the counter stored under `key`, never going below zero.
pub fn adjust_counter(store: &mut Store, key: &str, delta: i64) -> (u64, SaveOutcome) {
    let current = store.get(key).map(parse_counter).unwrap_or(0);
    let next = if delta >= 0 {
        current.saturating_add(delta as u64)
    } else {
        current.saturating_sub(delta.unsigned_abs())
    };
    log::debug!("Counter `{key}`: {current} -> {next}");
    let outcome = SaveOutcome::from_result(store.set(key, next.to_string()), key);
    (next, outcome)
}
