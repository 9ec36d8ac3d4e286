//! Script data model
//!
//! A script declares named tasks (ordered command invocations), named jobs
//! (serial steps of concurrently-run tasks), and the data tree that subtask
//! keys resolve against. Scripts are plain data and deserialize from YAML
//! or JSON.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// One command invocation inside a task.
///
/// Wire shape follows the compact form `{c, t, k}`; long names are accepted
/// as aliases.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubtaskSpec {
    /// Name of the registered command to invoke.
    #[serde(rename = "c", alias = "command")]
    pub command: String,
    /// Free-form labels carried through to the invocation.
    #[serde(rename = "t", alias = "tags", default)]
    pub tags: Vec<String>,
    /// Dotted paths resolved against the script data, in order.
    #[serde(rename = "k", alias = "keys", default)]
    pub keys: Vec<String>,
}

/// A declarative script: tasks, jobs, and the input data tree.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    /// Task name → ordered subtask specs.
    #[serde(default)]
    pub tasks: HashMap<String, Vec<SubtaskSpec>>,
    /// Job name → ordered steps; each step names the tasks that run
    /// concurrently before the next step starts.
    #[serde(default)]
    pub jobs: HashMap<String, Vec<Vec<String>>>,
    /// Arbitrary JSON-like tree addressed by subtask keys.
    #[serde(default)]
    pub data: Value,
}

impl Script {
    /// Parse a script from YAML (JSON is a YAML subset, so either works).
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
