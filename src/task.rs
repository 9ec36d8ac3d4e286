//! Serial task execution
//!
//! A task's subtasks run strictly in order: subtask `i` reaches a terminal
//! state before subtask `i + 1` starts. The first failure stops the task
//! and becomes its outcome; accumulator writes made by already-completed
//! subtasks stay in place.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::command::Command;
use crate::error::StagehandError;
use crate::params::{build_params, SubtaskParams};
use crate::script::SubtaskSpec;
use crate::state::RunState;

/// Per-subtask results for one task, in declared order.
pub type SubtaskResults = Vec<Value>;

/// A subtask spec with its capability resolved from the registry.
pub(crate) struct PlannedSubtask {
    pub(crate) spec: SubtaskSpec,
    pub(crate) capability: Arc<dyn Command>,
}

/// A task compiled at engine construction. Capabilities are bound once,
/// here; dispatch never consults the registry again.
pub(crate) struct TaskPlan {
    pub(crate) name: Arc<str>,
    pub(crate) subtasks: Vec<PlannedSubtask>,
}

/// One invocation: resolved parameters bound to their capability.
struct BoundSubtask {
    params: SubtaskParams,
    capability: Arc<dyn Command>,
}

impl BoundSubtask {
    /// Invoke the capability once; a failure is wrapped with the task and
    /// command names that produced it.
    async fn invoke(self) -> Result<Value, StagehandError> {
        let task = self.params.task.to_string();
        let command = self.params.command.clone();
        self.capability
            .call(self.params)
            .await
            .map_err(|source| StagehandError::Command {
                task,
                command,
                source,
            })
    }
}

/// Execute one task against the given data tree and run accumulator.
pub(crate) async fn run(
    plan: &TaskPlan,
    data: &Value,
    general: &RunState,
) -> Result<SubtaskResults, StagehandError> {
    let params_list = build_params(
        &plan.name,
        plan.subtasks.iter().map(|planned| &planned.spec),
        data,
        general,
    );

    let mut results = Vec::with_capacity(params_list.len());
    for (planned, params) in plan.subtasks.iter().zip(params_list) {
        debug!(task = %plan.name, command = %params.command, "invoking subtask");
        let bound = BoundSubtask {
            params,
            capability: Arc::clone(&planned.capability),
        };
        match bound.invoke().await {
            Ok(value) => results.push(value),
            Err(err) => {
                warn!(task = %plan.name, error = %err, "subtask failed, aborting task");
                return Err(err);
            }
        }
    }

    Ok(results)
}
