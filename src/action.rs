// User actions on individual tasks and their dispatch

use crate::error::StoreError;
use crate::storage::KeyValueStore;
use crate::store::TaskStore;
use crate::task::{Task, TaskId};
use tracing::debug;

/// Action a presentation layer raises against a single task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Flip completion state
    Toggle(TaskId),
    /// Enter edit mode for the task
    Edit(TaskId),
    /// Remove the task, subject to confirmation
    Delete(TaskId),
    /// Apply edited text and time and leave edit mode
    SaveEdit { id: TaskId, text: String, time: String },
    /// Leave edit mode without changes
    CancelEdit,
}

/// Asks the user to confirm a destructive action
pub trait Confirm {
    fn confirm_delete(&mut self, task: &Task) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Task) -> bool,
{
    fn confirm_delete(&mut self, task: &Task) -> bool {
        self(task)
    }
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Run an action against the store
    ///
    /// Returns whether any state changed. Deletes that the user declines,
    /// and actions on unknown ids, change nothing.
    pub fn dispatch(&mut self, action: Action, confirm: &mut dyn Confirm) -> Result<bool, StoreError> {
        debug!(?action, "dispatch");
        match action {
            Action::Toggle(id) => self.toggle(id),
            Action::Edit(id) => Ok(self.begin_edit(id)),
            Action::Delete(id) => {
                let confirmed = match self.get(id) {
                    Some(task) => confirm.confirm_delete(task),
                    None => return Ok(false),
                };
                if !confirmed {
                    debug!(id, "delete declined");
                    return Ok(false);
                }
                self.delete(id)
            }
            Action::SaveEdit { id, text, time } => self.save_edit(id, &text, &time),
            Action::CancelEdit => {
                let was_editing = self.editing().is_some();
                self.cancel_edit();
                Ok(was_editing)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn always(answer: bool) -> impl FnMut(&Task) -> bool {
        move |_: &Task| answer
    }

    #[test]
    fn test_dispatch_toggle() {
        let mut store = TaskStore::open(MemoryStorage::new());
        let id = store.add("Buy milk", "09:00").unwrap();

        assert!(store.dispatch(Action::Toggle(id), &mut always(true)).unwrap());
        assert!(store.get(id).unwrap().completed);
    }

    #[test]
    fn test_dispatch_delete_requires_confirmation() {
        let mut store = TaskStore::open(MemoryStorage::new());
        let id = store.add("Buy milk", "09:00").unwrap();

        assert!(!store.dispatch(Action::Delete(id), &mut always(false)).unwrap());
        assert!(store.get(id).is_some());

        assert!(store.dispatch(Action::Delete(id), &mut always(true)).unwrap());
        assert!(store.get(id).is_none());
    }

    #[test]
    fn test_dispatch_delete_unknown_does_not_prompt() {
        let mut store = TaskStore::open(MemoryStorage::new());
        let mut prompted = false;

        let changed = store
            .dispatch(Action::Delete(7), &mut |_: &Task| {
                prompted = true;
                true
            })
            .unwrap();

        assert!(!changed);
        assert!(!prompted);
    }

    #[test]
    fn test_dispatch_confirm_sees_task() {
        let mut store = TaskStore::open(MemoryStorage::new());
        let id = store.add("Call Bob", "14:30").unwrap();
        let mut seen = String::new();

        store
            .dispatch(Action::Delete(id), &mut |task: &Task| {
                seen = task.text.clone();
                false
            })
            .unwrap();

        assert_eq!(seen, "Call Bob");
    }

    #[test]
    fn test_dispatch_edit_flow() {
        let mut store = TaskStore::open(MemoryStorage::new());
        let id = store.add("Buy milk", "09:00").unwrap();

        assert!(store.dispatch(Action::Edit(id), &mut always(true)).unwrap());
        assert_eq!(store.editing(), Some(id));

        let save = Action::SaveEdit {
            id,
            text: "Buy bread".to_string(),
            time: "".to_string(),
        };
        assert!(store.dispatch(save, &mut always(true)).unwrap());
        assert_eq!(store.editing(), None);
        assert_eq!(store.get(id).unwrap().text, "Buy bread");

        store.dispatch(Action::Edit(id), &mut always(true)).unwrap();
        assert!(store.dispatch(Action::CancelEdit, &mut always(true)).unwrap());
        assert!(!store.dispatch(Action::CancelEdit, &mut always(true)).unwrap());
    }
}
