//! Invocation parameters
//!
//! One `SubtaskParams` record is built per subtask, in declared order,
//! before the task starts executing.

use std::sync::Arc;

use serde_json::Value;

use crate::path;
use crate::script::SubtaskSpec;
use crate::state::RunState;

/// Everything a command receives for one invocation.
#[derive(Debug, Clone)]
pub struct SubtaskParams {
    /// Name of the task this invocation belongs to.
    pub task: Arc<str>,
    /// Name of the command being invoked.
    pub command: String,
    /// Labels declared on the subtask.
    pub tags: Vec<String>,
    /// Dotted paths declared on the subtask.
    pub keys: Vec<String>,
    /// Resolution of each key against the script data, in key order. An
    /// absent path yields `Value::Null`, never an error.
    pub data: Vec<Value>,
    /// Shared handle to the run accumulator. Writes made here are visible
    /// to every later lookup in the same run, including by concurrently
    /// running tasks.
    pub general: RunState,
}

/// Build one params record per subtask spec, in declared order.
pub(crate) fn build_params<'a, I>(
    task: &Arc<str>,
    specs: I,
    data: &Value,
    general: &RunState,
) -> Vec<SubtaskParams>
where
    I: IntoIterator<Item = &'a SubtaskSpec>,
{
    specs
        .into_iter()
        .map(|spec| SubtaskParams {
            task: Arc::clone(task),
            command: spec.command.clone(),
            tags: spec.tags.clone(),
            keys: spec.keys.clone(),
            data: spec
                .keys
                .iter()
                .map(|key| path::resolve(data, key).unwrap_or(Value::Null))
                .collect(),
            general: general.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(command: &str, keys: &[&str]) -> SubtaskSpec {
        SubtaskSpec {
            command: command.to_string(),
            tags: Vec::new(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn one_record_per_spec_in_declared_order() {
        let task: Arc<str> = Arc::from("metadata");
        let specs = [spec("read_data", &["metadata"]), spec("beautify", &[])];
        let data = json!({"metadata": {"license": "MIT"}});
        let general = RunState::for_tasks(["metadata"]);

        let params = build_params(&task, specs.iter(), &data, &general);

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].command, "read_data");
        assert_eq!(params[0].data, vec![json!({"license": "MIT"})]);
        assert_eq!(params[1].command, "beautify");
        assert!(params[1].data.is_empty());
    }

    #[test]
    fn data_preserves_key_order_and_marks_absent_as_null() {
        let task: Arc<str> = Arc::from("probe");
        let specs = [spec(
            "read_data",
            &["metadata.license", "metadata.missing", "metadata.author"],
        )];
        let data = json!({"metadata": {"author": "olivier", "license": "MIT"}});
        let general = RunState::for_tasks(["probe"]);

        let params = build_params(&task, specs.iter(), &data, &general);

        assert_eq!(
            params[0].data,
            vec![json!("MIT"), Value::Null, json!("olivier")]
        );
    }

    #[test]
    fn general_state_is_shared_not_copied() {
        let task: Arc<str> = Arc::from("metadata");
        let specs = [spec("read_data", &[])];
        let general = RunState::for_tasks(["metadata"]);

        let params = build_params(&task, specs.iter(), &Value::Null, &general);

        general.update("metadata", |slot| {
            slot["status"] = json!("OK");
        });
        assert_eq!(
            params[0].general.get("metadata"),
            Some(json!({"status": "OK"}))
        );
    }
}
