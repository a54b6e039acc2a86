//! The to-do list.
//!
//! Items are kept in insertion order and written back as a whole after every
//! change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::ids::next_id;
use crate::storage::PersistentStore;

pub const TASKS_KEY: &str = "tasks";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn matches(self, item: &TaskItem) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !item.completed,
            TaskFilter::Completed => item.completed,
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskFilter::All => "all",
            TaskFilter::Active => "active",
            TaskFilter::Completed => "completed",
        })
    }
}

impl FromStr for TaskFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TaskFilter::All),
            "active" => Ok(TaskFilter::Active),
            "completed" | "done" => Ok(TaskFilter::Completed),
            other => Err(ValidationError::UnknownFilter(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

#[derive(Debug)]
pub struct TaskList {
    store: PersistentStore,
    items: Vec<TaskItem>,
}

impl TaskList {
    /// Load the list; a damaged stored list starts over empty.
    pub fn load(store: PersistentStore) -> Self {
        let items = match store.load_json::<Vec<TaskItem>>(TASKS_KEY) {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable task list");
                Vec::new()
            }
        };
        Self { store, items }
    }

    fn persist(&self) {
        self.store.save_json(TASKS_KEY, &self.items);
    }

    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&TaskItem> {
        self.items.iter().find(|t| t.id == id)
    }

    /// Append a task. Blank text is ignored and returns `None`.
    pub fn add(&mut self, text: &str) -> Option<&TaskItem> {
        if text.trim().is_empty() {
            return None;
        }
        let id = next_id(self.items.iter().map(|t| t.id));
        self.items.push(TaskItem {
            id,
            text: text.to_string(),
            completed: false,
        });
        self.persist();
        tracing::debug!(id, "task added");
        self.items.last()
    }

    /// Flip completion. `None` for an unknown id.
    pub fn toggle(&mut self, id: i64) -> Option<&TaskItem> {
        let index = self.items.iter().position(|t| t.id == id)?;
        self.items[index].completed = !self.items[index].completed;
        self.persist();
        self.items.get(index)
    }

    /// Remove a task. Returns whether anything was removed.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn filtered(&self, filter: TaskFilter) -> Vec<&TaskItem> {
        self.items.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn counts(&self) -> TaskCounts {
        let completed = self.items.iter().filter(|t| t.completed).count();
        TaskCounts {
            total: self.items.len(),
            active: self.items.len() - completed,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_toggle_delete_persist() {
        let store = PersistentStore::in_memory();
        let mut list = TaskList::load(store.clone());
        let a = list.add("write report").unwrap().id;
        let b = list.add("call bank").unwrap().id;
        assert_ne!(a, b);

        assert!(list.toggle(a).unwrap().completed);
        assert!(list.delete(b));
        assert!(!list.delete(b));

        let reloaded = TaskList::load(store);
        assert_eq!(
            reloaded.items(),
            &[TaskItem {
                id: a,
                text: "write report".into(),
                completed: true,
            }]
        );
    }

    #[test]
    fn blank_text_ignored() {
        let mut list = TaskList::load(PersistentStore::in_memory());
        assert!(list.add("   ").is_none());
        assert!(list.add("").is_none());
        assert!(list.items().is_empty());
    }

    #[test]
    fn text_kept_as_entered() {
        let mut list = TaskList::load(PersistentStore::in_memory());
        assert_eq!(list.add("  padded ").unwrap().text, "  padded ");
    }

    #[test]
    fn filters_and_counts() {
        let mut list = TaskList::load(PersistentStore::in_memory());
        let a = list.add("a").unwrap().id;
        list.add("b");
        list.add("c");
        list.toggle(a);

        assert_eq!(list.filtered(TaskFilter::All).len(), 3);
        assert_eq!(list.filtered(TaskFilter::Active).len(), 2);
        let done = list.filtered(TaskFilter::Completed);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, a);
        assert_eq!(
            list.counts(),
            TaskCounts {
                total: 3,
                active: 2,
                completed: 1,
            }
        );
    }

    #[test]
    fn unknown_id_is_noop() {
        let mut list = TaskList::load(PersistentStore::in_memory());
        assert!(list.toggle(42).is_none());
        assert!(!list.delete(42));
    }

    #[test]
    fn filter_parsing() {
        assert_eq!("active".parse::<TaskFilter>().unwrap(), TaskFilter::Active);
        assert_eq!("completed".parse::<TaskFilter>().unwrap(), TaskFilter::Completed);
        assert!(matches!(
            "someday".parse::<TaskFilter>(),
            Err(ValidationError::UnknownFilter(name)) if name == "someday"
        ));
        assert_eq!(TaskFilter::default(), TaskFilter::All);
    }

    #[test]
    fn reads_list_written_in_browser_shape() {
        let store = PersistentStore::in_memory();
        store.set(TASKS_KEY, r#"[{"id":1700000000000,"text":"x","completed":false}]"#);
        let list = TaskList::load(store);
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].id, 1_700_000_000_000);
    }
}
