//! Per-run shared accumulator ("general state")
//!
//! One slot per declared task, each starting as an empty object. A fresh
//! state is created for every top-level run and threaded by handle into
//! every command invocation of that run; it is the only channel by which
//! one task's outcome becomes visible to another.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::{Map, Value};

/// The shared accumulator threaded through every command invocation of a
/// single run.
///
/// Cloning is cheap (handle semantics): every clone addresses the same
/// slots. By convention a command writes only into the slot named after
/// its own task, so concurrent tasks never contend on the same slot; the
/// map itself tolerates concurrent access from any number of tasks.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    slots: Arc<DashMap<String, Value>>,
}

impl RunState {
    /// Fresh state with one empty slot per task name.
    pub fn for_tasks<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = DashMap::new();
        for name in names {
            slots.insert(name.into(), Value::Object(Map::new()));
        }
        Self {
            slots: Arc::new(slots),
        }
    }

    /// Read a deep copy of one slot.
    pub fn get(&self, task: &str) -> Option<Value> {
        self.slots.get(task).map(|slot| slot.clone())
    }

    /// Mutate one slot in place. A slot is created as an empty object if
    /// the task was never declared; creation is atomic under the map, so
    /// concurrent first writes cannot race.
    pub fn update<F>(&self, task: &str, f: F)
    where
        F: FnOnce(&mut Value),
    {
        let mut slot = self
            .slots
            .entry(task.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        f(&mut slot);
    }

    /// Deep, independent copy of every slot, keyed by task name.
    pub fn snapshot(&self) -> Value {
        let mut map = Map::new();
        for entry in self.slots.iter() {
            map.insert(entry.key().clone(), entry.value().clone());
        }
        Value::Object(map)
    }
}
