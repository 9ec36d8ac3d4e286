//! Engine error types
//!
//! Configuration and name errors are raised before any run state is
//! touched; command failures abort the remainder of their task and job but
//! never roll back accumulator writes already made.

use thiserror::Error;

use crate::validate::ValidationReport;

#[derive(Error, Debug)]
pub enum StagehandError {
    /// The configuration failed the construction gate. Carries every
    /// violation found, not just the first.
    #[error("invalid configuration:\n{0}")]
    Config(ValidationReport),

    /// `run_task` was given a name with no declared task.
    #[error("unknown task '{name}'")]
    UnknownTask { name: String },

    /// `run` was given a name with no declared job.
    #[error("unknown job '{name}'")]
    UnknownJob { name: String },

    /// A command capability reported failure. The structured fields name
    /// the invocation that produced it.
    #[error("command '{command}' failed in task '{task}': {source}")]
    Command {
        task: String,
        command: String,
        #[source]
        source: anyhow::Error,
    },

    /// A command capability panicked while its task was running in a step.
    /// Sibling tasks still run to completion.
    #[error("task '{task}' panicked during execution")]
    TaskPanicked { task: String },
}
