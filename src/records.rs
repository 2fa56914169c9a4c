use crate::model::PersonalRecord;
use crate::store::{SaveOutcome, Store};

pub const STORAGE_KEY: &str = "personalRecords";

pub fn default_records() -> Vec<PersonalRecord> {
    vec![
        PersonalRecord::unset("Bench Press", "0"),
        PersonalRecord::unset("Squat", "0"),
        PersonalRecord::unset("Overhead Press", "0"),
        PersonalRecord::unset("Pull-up", "BW+0"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Exercise,
    Weight,
    Date,
}

/// Index into a list that wraps around at both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
}

impl Carousel {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self, len: usize) {
        self.index = if len == 0 || self.index + 1 >= len {
            0
        } else {
            self.index + 1
        };
    }

    pub fn prev(&mut self, len: usize) {
        self.index = match (len, self.index) {
            (0, _) => 0,
            (len, 0) => len - 1,
            (len, i) => (i - 1).min(len - 1),
        };
    }

    pub fn current<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.get(self.index).or_else(|| items.first())
    }
}

/// The personal records card: a fixed list edited as a whole.
#[derive(Debug, Clone)]
pub struct PersonalRecords {
    records: Vec<PersonalRecord>,
    staged: Option<Vec<PersonalRecord>>,
    pub carousel: Carousel,
}

impl PersonalRecords {
    pub fn load(store: &Store) -> Self {
        Self {
            records: store.load_list_or(STORAGE_KEY, default_records()),
            staged: None,
            carousel: Carousel::default(),
        }
    }

    pub fn records(&self) -> &[PersonalRecord] {
        &self.records
    }

    pub fn current(&self) -> Option<&PersonalRecord> {
        self.carousel.current(&self.records)
    }

    pub fn next(&mut self) {
        self.carousel.next(self.records.len());
    }

    pub fn prev(&mut self) {
        self.carousel.prev(self.records.len());
    }

    pub fn is_editing(&self) -> bool {
        self.staged.is_some()
    }

    pub fn staged(&self) -> Option<&[PersonalRecord]> {
        self.staged.as_deref()
    }

    pub fn start_edit(&mut self) {
        self.staged = Some(self.records.clone());
    }

    pub fn update(&mut self, index: usize, field: RecordField, value: &str) -> bool {
        match self.field_mut(index, field) {
            Some(target) => {
                *target = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Mutable access to one staged field, for binding to a text input.
    pub fn field_mut(&mut self, index: usize, field: RecordField) -> Option<&mut String> {
        let record = self.staged.as_mut()?.get_mut(index)?;
        Some(match field {
            RecordField::Exercise => &mut record.exercise,
            RecordField::Weight => &mut record.weight,
            RecordField::Date => &mut record.date,
        })
    }

    pub fn save(&mut self, store: &mut Store) -> Option<SaveOutcome> {
        let staged = self.staged.take()?;
        self.records = staged;
        Some(SaveOutcome::from_result(
            store.save_list(STORAGE_KEY, &self.records),
            "personal records",
        ))
    }

    /// Drop the staged copy and reload what was last persisted.
    pub fn cancel(&mut self, store: &Store) {
        self.staged = None;
        self.records = store.load_list_or(STORAGE_KEY, default_records());
    }
}
