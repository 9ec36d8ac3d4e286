//! Engine facade
//!
//! Constructed once from a command registry and a script; immutable
//! afterwards apart from the per-run accumulator. Capabilities and job
//! steps are resolved into plans at construction, so dispatch never
//! performs a name lookup that can fail.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, instrument};

use crate::command::CommandRegistry;
use crate::error::StagehandError;
use crate::job::{self, JobResults};
use crate::params::{build_params, SubtaskParams};
use crate::script::Script;
use crate::state::RunState;
use crate::task::{self, PlannedSubtask, SubtaskResults, TaskPlan};
use crate::validate::validate;

pub struct Engine {
    commands: CommandRegistry,
    script: Script,
    data: Arc<Value>,
    plans: HashMap<String, Arc<TaskPlan>>,
    jobs: HashMap<String, Vec<Vec<Arc<TaskPlan>>>>,
    /// Accumulator of the most recently started run, kept only so
    /// `snapshot_state` stays meaningful between runs. Each run owns a
    /// fresh state; concurrent runs never share slots.
    latest: Mutex<RunState>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("script", &self.script)
            .field("plans", &self.plans.keys().collect::<Vec<_>>())
            .field("jobs", &self.jobs.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Engine {
    /// Validate the configuration and compile it into execution plans.
    ///
    /// On any violation the engine is not constructed; the error carries
    /// every violation found.
    pub fn new(commands: CommandRegistry, script: Script) -> Result<Self, StagehandError> {
        let report = validate(&commands, &script);
        if !report.is_empty() {
            return Err(StagehandError::Config(report));
        }

        let mut plans = HashMap::with_capacity(script.tasks.len());
        for (name, specs) in &script.tasks {
            let subtasks = specs
                .iter()
                .map(|spec| PlannedSubtask {
                    spec: spec.clone(),
                    capability: commands
                        .capability(&spec.command)
                        .expect("command presence verified by validation"),
                })
                .collect();
            plans.insert(
                name.clone(),
                Arc::new(TaskPlan {
                    name: Arc::from(name.as_str()),
                    subtasks,
                }),
            );
        }

        let mut jobs = HashMap::with_capacity(script.jobs.len());
        for (name, steps) in &script.jobs {
            let resolved = steps
                .iter()
                .map(|step| {
                    step.iter()
                        .map(|task| {
                            Arc::clone(
                                plans
                                    .get(task)
                                    .expect("task presence verified by validation"),
                            )
                        })
                        .collect()
                })
                .collect();
            jobs.insert(name.clone(), resolved);
        }

        let latest = Mutex::new(RunState::for_tasks(script.tasks.keys().cloned()));
        let data = Arc::new(script.data.clone());

        Ok(Self {
            commands,
            script,
            data,
            plans,
            jobs,
            latest,
        })
    }

    /// Run one task's subtasks strictly in order, short-circuiting on the
    /// first failure. A fresh accumulator is created for the run.
    #[instrument(skip(self))]
    pub async fn run_task(&self, name: &str) -> Result<SubtaskResults, StagehandError> {
        let plan = self
            .plans
            .get(name)
            .ok_or_else(|| StagehandError::UnknownTask {
                name: name.to_string(),
            })?;

        let general = self.fresh_state();
        debug!(task = name, "starting task run");
        task::run(plan, &self.data, &general).await
    }

    /// Run a job: steps strictly in order, tasks within a step
    /// concurrently. A fresh accumulator is created for the run.
    #[instrument(skip(self))]
    pub async fn run(&self, name: &str) -> Result<JobResults, StagehandError> {
        let steps = self
            .jobs
            .get(name)
            .ok_or_else(|| StagehandError::UnknownJob {
                name: name.to_string(),
            })?;

        let general = self.fresh_state();
        debug!(job = name, steps = steps.len(), "starting job run");
        job::run(name, steps, &self.data, &general).await
    }

    /// The invocation parameters one run of the task would receive, built
    /// against a fresh (all slots empty) accumulator. Intended for
    /// inspection and testing.
    pub fn resolved_params(&self, name: &str) -> Result<Vec<SubtaskParams>, StagehandError> {
        let specs = self
            .script
            .tasks
            .get(name)
            .ok_or_else(|| StagehandError::UnknownTask {
                name: name.to_string(),
            })?;

        let task: Arc<str> = Arc::from(name);
        let general = RunState::for_tasks(self.script.tasks.keys().cloned());
        Ok(build_params(&task, specs.iter(), &self.data, &general))
    }

    /// Deep, independent copy of the most recent run's accumulator as an
    /// object keyed by task name. Mutating the copy never affects the
    /// engine.
    pub fn snapshot_state(&self) -> Value {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.snapshot()
    }

    /// Read-only view of the script as captured at construction.
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Read-only name → description view of the registered commands.
    pub fn command_descriptions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.commands.descriptions()
    }

    /// Create the accumulator for a new run and publish it as the latest.
    fn fresh_state(&self) -> RunState {
        let general = RunState::for_tasks(self.script.tasks.keys().cloned());
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        *latest = general.clone();
        general
    }
}
