//! Command capability trait and registry
//!
//! A command is a named capability invoked with resolved subtask
//! parameters, producing a result value or a failure exactly once. The
//! registry maps names to capabilities; it is assembled before engine
//! construction and never mutated afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::params::SubtaskParams;

/// A caller-supplied capability.
#[async_trait]
pub trait Command: Send + Sync {
    async fn call(&self, params: SubtaskParams) -> Result<Value>;
}

struct FnCommand<F> {
    f: F,
}

#[async_trait]
impl<F> Command for FnCommand<F>
where
    F: Fn(SubtaskParams) -> BoxFuture<'static, Result<Value>> + Send + Sync,
{
    async fn call(&self, params: SubtaskParams) -> Result<Value> {
        (self.f)(params).await
    }
}

/// Wrap a closure returning a boxed future into a [`Command`].
///
/// ```
/// use futures::FutureExt;
/// use serde_json::json;
///
/// let echo = stagehand::from_fn(|params| {
///     async move { Ok(json!(params.data)) }.boxed()
/// });
/// ```
pub fn from_fn<F>(f: F) -> Arc<dyn Command>
where
    F: Fn(SubtaskParams) -> BoxFuture<'static, Result<Value>> + Send + Sync + 'static,
{
    Arc::new(FnCommand { f })
}

#[derive(Clone)]
struct RegisteredCommand {
    description: String,
    capability: Arc<dyn Command>,
}

/// Name → capability mapping consumed at engine construction.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, RegisteredCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability under `name`, builder-style. A later
    /// registration under the same name replaces the earlier one.
    pub fn register(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        capability: Arc<dyn Command>,
    ) -> Self {
        self.commands.insert(
            name.into(),
            RegisteredCommand {
                description: description.into(),
                capability,
            },
        );
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Iterate name → description pairs.
    pub fn descriptions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.commands
            .iter()
            .map(|(name, cmd)| (name.as_str(), cmd.description.as_str()))
    }

    pub(crate) fn capability(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands
            .get(name)
            .map(|cmd| Arc::clone(&cmd.capability))
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.commands
                    .iter()
                    .map(|(name, cmd)| (name, &cmd.description)),
            )
            .finish()
    }
}
