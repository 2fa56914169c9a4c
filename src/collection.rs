//! Editable, persisted list of records.
//!
//! Every editable table in the application follows the same lifecycle: rows
//! are viewed read-only, one row at a time may be copied into a staging buffer
//! for editing (or a brand new row staged for creation), and saving writes the
//! staged row back into the list which is then persisted immediately.

use crate::ids;
use crate::store::{SaveOutcome, Store};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A name is required")]
    EmptyName,
    #[error("Add at least one named exercise with a set that has weight and reps")]
    NoCompleteExercise,
    #[error("Nothing is being edited")]
    NothingStaged,
}

/// A record stored in an [`EditableCollection`].
pub trait Record: Clone {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    /// Prefix used when generating a new id for this record.
    fn id_prefix(&self) -> &str;
    fn name(&self) -> &str;

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name().trim().is_empty() {
            Err(ValidationError::EmptyName)
        } else {
            Ok(())
        }
    }

    /// Repair a record right after it was loaded.
    fn normalize(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditState<T> {
    Viewing,
    Editing { id: String, staged: T },
    Creating { staged: T },
}

#[derive(Debug, Clone)]
pub struct EditableCollection<T> {
    key: String,
    rows: Vec<T>,
    state: EditState<T>,
}

impl<T> EditableCollection<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    /// Load the collection stored under `key`.
    ///
    /// Rows saved without an id get one derived from their position so they
    /// can be addressed. The same stored list always yields the same ids, and
    /// they are written back on the next mutation.
    pub fn load(store: &Store, key: impl Into<String>) -> Self {
        Self::load_with(store, key, |_| {})
    }

    /// Like [`EditableCollection::load`], applying `fix` to every row before
    /// missing ids are generated. Fixes are kept in memory until the next
    /// mutation persists the collection.
    pub fn load_with<F: FnMut(&mut T)>(store: &Store, key: impl Into<String>, mut fix: F) -> Self {
        let key = key.into();
        let mut rows: Vec<T> = store.load_list(&key);
        for row in &mut rows {
            row.normalize();
            fix(row);
        }
        let mut taken: HashSet<String> = rows.iter().map(|r| r.id().to_string()).collect();
        for (pos, row) in rows.iter_mut().enumerate() {
            if row.id().is_empty() {
                let id = ids::positional(row.id_prefix(), pos, &taken);
                taken.insert(id.clone());
                row.set_id(id);
            }
        }
        log::debug!("Loaded {} rows from `{key}`", rows.len());
        Self {
            key,
            rows,
            state: EditState::Viewing,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.state {
            EditState::Editing { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn is_creating(&self) -> bool {
        matches!(self.state, EditState::Creating { .. })
    }

    pub fn staged(&self) -> Option<&T> {
        match &self.state {
            EditState::Viewing => None,
            EditState::Editing { staged, .. } | EditState::Creating { staged } => Some(staged),
        }
    }

    pub fn staged_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            EditState::Viewing => None,
            EditState::Editing { staged, .. } | EditState::Creating { staged } => Some(staged),
        }
    }

    /// Stage a copy of row `id` for editing.
    ///
    /// Unsaved changes to any previously staged row are dropped. Returns
    /// `false` and leaves the state untouched when no row has that id.
    pub fn start_edit(&mut self, id: &str) -> bool {
        let Some(row) = self.get(id).cloned() else {
            return false;
        };
        if self.staged().is_some() {
            log::debug!("Discarding unsaved changes in `{}`", self.key);
        }
        self.state = EditState::Editing {
            id: id.to_string(),
            staged: row,
        };
        true
    }

    /// Stage a new row built from `template` with a freshly generated id,
    /// returning that id.
    pub fn start_create(&mut self, mut template: T) -> String {
        let id = ids::generate(template.id_prefix());
        template.set_id(id.clone());
        if self.staged().is_some() {
            log::debug!("Discarding unsaved changes in `{}`", self.key);
        }
        self.state = EditState::Creating { staged: template };
        id
    }

    pub fn cancel(&mut self) {
        self.state = EditState::Viewing;
    }

    /// Write the staged row into the collection and persist it.
    ///
    /// A row that fails validation stays staged and the collection is left
    /// unchanged.
    pub fn save(&mut self, store: &mut Store) -> Result<SaveOutcome, ValidationError> {
        let staged = self.staged().ok_or(ValidationError::NothingStaged)?;
        staged.validate()?;
        match std::mem::replace(&mut self.state, EditState::Viewing) {
            EditState::Editing { id, staged } => {
                match self.rows.iter_mut().find(|r| r.id() == id) {
                    Some(row) => *row = staged,
                    None => self.rows.push(staged),
                }
            }
            EditState::Creating { staged } => self.rows.push(staged),
            EditState::Viewing => return Err(ValidationError::NothingStaged),
        }
        Ok(self.persist(store))
    }

    /// Append an already validated row and persist it.
    pub fn push(&mut self, store: &mut Store, mut row: T) -> SaveOutcome {
        if row.id().is_empty() {
            let id = ids::generate(row.id_prefix());
            row.set_id(id);
        }
        self.rows.push(row);
        self.persist(store)
    }

    /// Mutate row `id` in place and persist the result.
    pub fn update<F: FnOnce(&mut T)>(
        &mut self,
        store: &mut Store,
        id: &str,
        f: F,
    ) -> Option<SaveOutcome> {
        let row = self.rows.iter_mut().find(|r| r.id() == id)?;
        f(row);
        Some(self.persist(store))
    }

    /// Remove row `id` and persist. Deleting the row being edited also drops
    /// its staged changes.
    pub fn delete(&mut self, store: &mut Store, id: &str) -> Option<(T, SaveOutcome)> {
        let pos = self.rows.iter().position(|r| r.id() == id)?;
        let removed = self.rows.remove(pos);
        if self.editing_id() == Some(id) {
            self.cancel();
        }
        Some((removed, self.persist(store)))
    }

    fn persist(&self, store: &mut Store) -> SaveOutcome {
        SaveOutcome::from_result(store.save_list(&self.key, &self.rows), &self.key)
    }
}
