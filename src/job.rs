//! Job orchestration
//!
//! Steps run strictly in order. Within a step every named task is spawned
//! concurrently; the step joins all of them before deciding its outcome.
//! A failing task fails its step and the job, but in-flight siblings
//! always run to completion: their accumulator writes land, their results
//! are discarded from the reported outcome. Once a step fails, no later
//! step starts.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::StagehandError;
use crate::state::RunState;
use crate::task::{self, SubtaskResults, TaskPlan};

/// Ordered per-task results for one step, following declared task order.
pub type StepResults = Vec<SubtaskResults>;

/// Ordered per-step results for one job.
pub type JobResults = Vec<StepResults>;

/// Execute a job's steps strictly in order.
pub(crate) async fn run(
    job: &str,
    steps: &[Vec<Arc<TaskPlan>>],
    data: &Arc<Value>,
    general: &RunState,
) -> Result<JobResults, StagehandError> {
    let mut job_results = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        debug!(job, step = index, tasks = step.len(), "starting step");
        job_results.push(run_step(step, data, general).await?);
    }

    Ok(job_results)
}

/// Launch every task in the step, wait for all of them to reach a terminal
/// state, then report either the ordered results or the first failure in
/// declared task order (completion order never influences the outcome).
async fn run_step(
    step: &[Arc<TaskPlan>],
    data: &Arc<Value>,
    general: &RunState,
) -> Result<StepResults, StagehandError> {
    let mut join_set = JoinSet::new();
    let mut slot_by_id = HashMap::with_capacity(step.len());

    for (slot, plan) in step.iter().enumerate() {
        let plan = Arc::clone(plan);
        let data = Arc::clone(data);
        let general = general.clone();
        let handle = join_set.spawn(async move {
            let outcome = task::run(&plan, &data, &general).await;
            (slot, outcome)
        });
        slot_by_id.insert(handle.id(), slot);
    }

    // Join barrier: drained to exhaustion, so a failed task never aborts
    // its in-flight siblings.
    let mut outcomes: Vec<Option<Result<SubtaskResults, StagehandError>>> =
        (0..step.len()).map(|_| None).collect();

    while let Some(joined) = join_set.join_next_with_id().await {
        match joined {
            Ok((_id, (slot, outcome))) => outcomes[slot] = Some(outcome),
            Err(join_error) => {
                // A panicking capability is a terminal state for its task;
                // siblings keep running.
                if let Some(&slot) = slot_by_id.get(&join_error.id()) {
                    warn!(task = %step[slot].name, "task panicked");
                    outcomes[slot] = Some(Err(StagehandError::TaskPanicked {
                        task: step[slot].name.to_string(),
                    }));
                }
            }
        }
    }

    let mut results = Vec::with_capacity(step.len());
    for (plan, outcome) in step.iter().zip(outcomes) {
        match outcome {
            Some(Ok(task_results)) => results.push(task_results),
            Some(Err(err)) => {
                warn!(task = %plan.name, error = %err, "step failed, aborting job");
                return Err(err);
            }
            // A spawned task that produced no join result at all is
            // indistinguishable from a panic.
            None => {
                return Err(StagehandError::TaskPanicked {
                    task: plan.name.to_string(),
                })
            }
        }
    }

    Ok(results)
}
