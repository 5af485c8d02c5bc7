// Task store: owns the task list, the current filter and persistence

use crate::codec::{decode_tasks, encode_tasks};
use crate::error::{Field, FieldError, StorageError, StoreError, ValidationError};
use crate::filter::Filter;
use crate::storage::KeyValueStore;
use crate::task::{Task, TaskId, TaskTime, now_ms};
use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Storage key used when none is configured
pub const DEFAULT_SLOT_KEY: &str = "tasks";

/// Counters computed over the full, unfiltered task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// What changed, so a presentation layer knows what to redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Task list mutated: redraw the list and the counters
    Tasks,
    /// Filter selection changed: redraw the list only
    Filter,
    /// Edit mode entered or left
    Editing,
}

type Listener = Box<dyn FnMut(Change)>;

/// Exclusive owner of the task list and its persisted copy
///
/// Every mutation is written through to storage before it returns. If the
/// write fails the in-memory list is restored and the error is returned, so
/// memory and storage never disagree.
pub struct TaskStore<S: KeyValueStore> {
    storage: S,
    slot_key: String,
    tasks: Vec<Task>,
    filter: Filter,
    editing: Option<TaskId>,
    last_id: TaskId,
    listener: Option<Listener>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Open a store over `storage` using the default slot key
    pub fn open(storage: S) -> Self {
        Self::with_slot(storage, DEFAULT_SLOT_KEY)
    }

    /// Open a store over `storage`, loading whatever is in `slot_key`
    pub fn with_slot(storage: S, slot_key: impl Into<String>) -> Self {
        let mut store = Self {
            storage,
            slot_key: slot_key.into(),
            tasks: Vec::new(),
            filter: Filter::All,
            editing: None,
            last_id: 0,
            listener: None,
        };
        store.load();
        store
    }

    /// Replace in-memory state with the persisted list
    ///
    /// Unreadable or malformed data yields an empty list.
    pub fn load(&mut self) {
        let blob = match self.storage.get(&self.slot_key) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(slot = %self.slot_key, error = %e, "Failed to read storage slot, starting empty");
                None
            }
        };

        self.tasks = decode_tasks(blob.as_deref());
        self.last_id = self.last_id.max(self.tasks.iter().map(|t| t.id).max().unwrap_or(0));
        self.editing = None;
    }

    /// Write the full task list to the storage slot
    pub fn save(&mut self) -> Result<(), StorageError> {
        let blob = encode_tasks(&self.tasks)?;
        self.storage.set(&self.slot_key, &blob)?;
        debug!(slot = %self.slot_key, count = self.tasks.len(), "Saved tasks");
        Ok(())
    }

    /// Register the callback invoked after every state change
    pub fn set_listener(&mut self, listener: impl FnMut(Change) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    /// All tasks, newest first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a task and put it at the front of the list
    ///
    /// `time` is the raw `HH:MM` input; blank means "missing".
    pub fn add(&mut self, text: &str, time: &str) -> Result<TaskId, StoreError> {
        let mut errors = Vec::new();
        let text = text.trim();
        if text.is_empty() {
            errors.push(FieldError {
                field: Field::Text,
                message: "Task text cannot be empty".to_string(),
            });
        }
        let time = match parse_time(time) {
            Ok(Some(time)) => Some(time),
            Ok(None) => {
                errors.push(FieldError {
                    field: Field::Time,
                    message: "Task time is required".to_string(),
                });
                None
            }
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let time = match time {
            Some(time) if errors.is_empty() => time,
            _ => return Err(ValidationError { errors }.into()),
        };

        let id = self.next_id()?;
        let task = Task::new(id, text, time, Utc::now());

        let previous = self.tasks.clone();
        self.tasks.insert(0, task);
        self.commit(previous)?;

        info!(id, "Added task");
        Ok(id)
    }

    /// Flip the completion state of a task
    ///
    /// Returns `Ok(false)` if no task has that id.
    pub fn toggle(&mut self, id: TaskId) -> Result<bool, StoreError> {
        let Some(index) = self.position(id) else {
            debug!(id, "toggle: task not found");
            return Ok(false);
        };

        let previous = self.tasks.clone();
        self.tasks[index].completed = !self.tasks[index].completed;
        self.commit(previous)?;

        debug!(id, completed = self.tasks[index].completed, "Toggled task");
        Ok(true)
    }

    /// Remove a task
    ///
    /// The caller is responsible for obtaining user confirmation first.
    /// Returns `Ok(false)` if no task has that id.
    pub fn delete(&mut self, id: TaskId) -> Result<bool, StoreError> {
        let Some(index) = self.position(id) else {
            debug!(id, "delete: task not found");
            return Ok(false);
        };

        let previous = self.tasks.clone();
        self.tasks.remove(index);
        self.commit(previous)?;

        if self.editing == Some(id) {
            self.editing = None;
            self.notify(Change::Editing);
        }

        info!(id, "Deleted task");
        Ok(true)
    }

    /// Replace the text and, when supplied, the time of a task
    ///
    /// Blank `new_text` is rejected. Blank `new_time` keeps the existing
    /// time. Returns `Ok(false)` if no task has that id.
    pub fn edit(&mut self, id: TaskId, new_text: &str, new_time: &str) -> Result<bool, StoreError> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Err(ValidationError::single(Field::Text, "Task text cannot be empty").into());
        }
        let new_time = parse_time(new_time).map_err(|e| ValidationError { errors: vec![e] })?;

        let Some(index) = self.position(id) else {
            debug!(id, "edit: task not found");
            return Ok(false);
        };

        let previous = self.tasks.clone();
        let task = &mut self.tasks[index];
        task.text = new_text.to_string();
        if let Some(time) = new_time {
            task.time = time;
        }
        self.commit(previous)?;

        debug!(id, "Edited task");
        Ok(true)
    }

    // ========================================================================
    // Edit mode
    // ========================================================================

    /// Task currently being edited, if any
    pub fn editing(&self) -> Option<TaskId> {
        self.editing
    }

    /// Enter edit mode for a task; `false` if no task has that id
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        if self.position(id).is_none() {
            debug!(id, "begin_edit: task not found");
            return false;
        }
        self.editing = Some(id);
        self.notify(Change::Editing);
        true
    }

    /// Leave edit mode without changing anything
    pub fn cancel_edit(&mut self) {
        if self.editing.take().is_some() {
            self.notify(Change::Editing);
        }
    }

    /// Apply an edit and leave edit mode on success
    ///
    /// Edit mode is kept when the input is rejected so the user can fix it.
    pub fn save_edit(&mut self, id: TaskId, new_text: &str, new_time: &str) -> Result<bool, StoreError> {
        let changed = self.edit(id, new_text, new_time)?;
        if self.editing == Some(id) {
            self.editing = None;
            self.notify(Change::Editing);
        }
        Ok(changed)
    }

    // ========================================================================
    // Views
    // ========================================================================

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Select the filter used by `filtered_view`
    ///
    /// Accepts a `Filter` or a raw name; unknown names select `All`.
    pub fn set_filter(&mut self, filter: impl Into<Filter>) {
        self.filter = filter.into();
        debug!(filter = %self.filter, "Filter changed");
        self.notify(Change::Filter);
    }

    /// Tasks passing the current filter, newest first
    pub fn filtered_view(&self) -> Vec<&Task> {
        self.filtered_view_for(self.filter)
    }

    /// Tasks passing `filter`, evaluated against today's local date
    pub fn filtered_view_for(&self, filter: Filter) -> Vec<&Task> {
        self.filtered_view_on(filter, Local::now().date_naive())
    }

    /// Tasks passing `filter` with an explicit notion of "today"
    pub fn filtered_view_on(&self, filter: Filter, today: NaiveDate) -> Vec<&Task> {
        filter.apply(&self.tasks, today)
    }

    pub fn stats(&self) -> Stats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Stats {
            total,
            completed,
            pending: total - completed,
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn next_id(&mut self) -> Result<TaskId, StoreError> {
        let next = self
            .last_id
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted(self.last_id))?;
        let id = now_ms().max(next);
        self.last_id = id;
        Ok(id)
    }

    /// Persist the mutated list, restoring `previous` if that fails
    fn commit(&mut self, previous: Vec<Task>) -> Result<(), StoreError> {
        if let Err(e) = self.save() {
            warn!(slot = %self.slot_key, error = %e, "Failed to persist tasks, reverting");
            self.tasks = previous;
            return Err(e.into());
        }
        self.notify(Change::Tasks);
        Ok(())
    }

    fn notify(&mut self, change: Change) {
        if let Some(listener) = self.listener.as_mut() {
            listener(change);
        }
    }
}

/// Parse raw time input: blank is `None`, anything else must be `HH:MM`
fn parse_time(raw: &str) -> Result<Option<TaskTime>, FieldError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    raw.parse::<TaskTime>().map(Some).map_err(|e| FieldError {
        field: Field::Time,
        message: e.to_string(),
    })
}
