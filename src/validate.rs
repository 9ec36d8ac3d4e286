//! Configuration validation
//!
//! One explicit pass over the registry and script, run once at engine
//! construction. Collects every violation found rather than stopping at
//! the first; a single report describes everything that is wrong.

use std::fmt;

use thiserror::Error;

use crate::command::CommandRegistry;
use crate::script::Script;

/// A single configuration violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("no commands are registered")]
    NoCommands,

    #[error("command '{command}' has an empty description")]
    EmptyDescription { command: String },

    #[error("script declares no tasks")]
    NoTasks,

    #[error("script declares no jobs")]
    NoJobs,

    #[error("task '{task}' subtask {index} references unknown command '{command}'")]
    UnknownCommand {
        task: String,
        index: usize,
        command: String,
    },

    #[error("task '{task}' subtask {index} has an empty tag")]
    EmptyTag { task: String, index: usize },

    #[error("task '{task}' subtask {index} has an empty key")]
    EmptyKey { task: String, index: usize },

    #[error("job '{job}' step {step} references unknown task '{task}'")]
    UnknownTask {
        job: String,
        step: usize,
        task: String,
    },
}

/// Every violation found in one validation pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {violation}")?;
        }
        Ok(())
    }
}

/// Validate a registry/script pair, collecting all violations.
pub fn validate(commands: &CommandRegistry, script: &Script) -> ValidationReport {
    let mut report = ValidationReport::default();

    if commands.is_empty() {
        report.push(Violation::NoCommands);
    }
    for (name, description) in commands.descriptions() {
        if description.is_empty() {
            report.push(Violation::EmptyDescription {
                command: name.to_string(),
            });
        }
    }

    if script.tasks.is_empty() {
        report.push(Violation::NoTasks);
    }
    if script.jobs.is_empty() {
        report.push(Violation::NoJobs);
    }

    for (task, specs) in &script.tasks {
        for (index, spec) in specs.iter().enumerate() {
            if !commands.contains(&spec.command) {
                report.push(Violation::UnknownCommand {
                    task: task.clone(),
                    index,
                    command: spec.command.clone(),
                });
            }
            if spec.tags.iter().any(|tag| tag.is_empty()) {
                report.push(Violation::EmptyTag {
                    task: task.clone(),
                    index,
                });
            }
            if spec.keys.iter().any(|key| key.is_empty()) {
                report.push(Violation::EmptyKey {
                    task: task.clone(),
                    index,
                });
            }
        }
    }

    for (job, steps) in &script.jobs {
        for (step, names) in steps.iter().enumerate() {
            for task in names {
                if !script.tasks.contains_key(task) {
                    report.push(Violation::UnknownTask {
                        job: job.clone(),
                        step,
                        task: task.clone(),
                    });
                }
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{from_fn, CommandRegistry};
    use futures::FutureExt;
    use serde_json::json;

    fn noop_registry() -> CommandRegistry {
        CommandRegistry::new().register("noop", "Does nothing", {
            from_fn(|_params| async move { Ok(json!(null)) }.boxed())
        })
    }

    #[test]
    fn accepts_a_well_formed_configuration() {
        let script = Script::from_yaml(
            r#"
tasks:
  only:
    - c: noop
jobs:
  go:
    - [only]
"#,
        )
        .unwrap();

        let report = validate(&noop_registry(), &script);
        assert!(report.is_empty(), "unexpected violations: {report}");
    }

    #[test]
    fn collects_every_violation_in_one_pass() {
        let registry = CommandRegistry::new().register("noop", "", {
            from_fn(|_params| async move { Ok(json!(null)) }.boxed())
        });
        let script = Script::from_yaml(
            r#"
tasks:
  broken:
    - c: missing
      t: [""]
      k: [""]
jobs:
  go:
    - [broken, ghost]
"#,
        )
        .unwrap();

        let report = validate(&registry, &script);
        let violations = report.violations();
        assert_eq!(violations.len(), 5);
        assert!(violations.contains(&Violation::EmptyDescription {
            command: "noop".to_string()
        }));
        assert!(violations.contains(&Violation::UnknownCommand {
            task: "broken".to_string(),
            index: 0,
            command: "missing".to_string()
        }));
        assert!(violations.contains(&Violation::EmptyTag {
            task: "broken".to_string(),
            index: 0
        }));
        assert!(violations.contains(&Violation::EmptyKey {
            task: "broken".to_string(),
            index: 0
        }));
        assert!(violations.contains(&Violation::UnknownTask {
            job: "go".to_string(),
            step: 0,
            task: "ghost".to_string()
        }));
    }

    #[test]
    fn rejects_empty_tables() {
        let report = validate(&CommandRegistry::new(), &Script::default());
        assert!(report.violations().contains(&Violation::NoCommands));
        assert!(report.violations().contains(&Violation::NoTasks));
        assert!(report.violations().contains(&Violation::NoJobs));
    }

    #[test]
    fn report_lists_one_violation_per_line() {
        let report = validate(&CommandRegistry::new(), &Script::default());
        let rendered = report.to_string();
        assert_eq!(rendered.lines().count(), report.violations().len());
        assert!(rendered.lines().all(|line| line.starts_with("- ")));
    }
}
