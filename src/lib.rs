//! Stagehand - declarative task and job execution engine
//!
//! A script declares tasks (ordered command invocations) and jobs (serial
//! steps of concurrently-run tasks). The engine executes them against
//! registered command capabilities, threading a per-run shared accumulator
//! through every invocation so tasks can record and later inspect each
//! other's outcomes.

pub mod command;
pub mod engine;
pub mod error;
pub mod job;
pub mod params;
pub mod path;
pub mod script;
pub mod state;
pub mod task;
pub mod validate;

pub use command::{from_fn, Command, CommandRegistry};
pub use engine::Engine;
pub use error::StagehandError;
pub use job::{JobResults, StepResults};
pub use params::SubtaskParams;
pub use script::{Script, SubtaskSpec};
pub use state::RunState;
pub use task::SubtaskResults;
pub use validate::{ValidationReport, Violation};
