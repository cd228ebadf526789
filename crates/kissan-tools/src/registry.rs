//! Tool registry for agent capabilities.

use async_trait::async_trait;
use kissan_core::KissanError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Definition of a tool an agent can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool (unique within a registry).
    pub name: String,
    /// What the tool does and when an agent should reach for it.
    pub description: String,
    /// JSON Schema describing the tool's arguments.
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self { name: name.into(), description: description.into(), parameters }
    }

    /// Definition whose arguments are all required strings
    pub fn with_string_args(
        name: impl Into<String>,
        description: impl Into<String>,
        args: &[(&str, &str)],
    ) -> Self {
        Self::new(name, description, string_args_schema(args, &[]))
    }
}

/// Object schema with required string properties plus optional extra properties
pub(crate) fn string_args_schema(required: &[(&str, &str)], optional: &[(&str, Value)]) -> Value {
    let mut properties = Map::new();
    for (name, description) in required {
        properties
            .insert(name.to_string(), json!({ "type": "string", "description": description }));
    }
    for (name, schema) in optional {
        properties.insert(name.to_string(), schema.clone());
    }
    let required: Vec<&str> = required.iter().map(|(name, _)| *name).collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Errors that can occur when executing a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error(transparent)]
    Domain(#[from] KissanError),
}

/// A capability an agent can invoke with JSON arguments.
#[async_trait]
pub trait AgentTool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Run the tool; the output is JSON for the agent to read back.
    async fn execute(&self, args: Value) -> Result<Value, ToolError>;
}

/// Registry of tools, addressed by name.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn AgentTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: impl AgentTool + 'static) {
        let def = tool.definition();
        self.tools.insert(def.name, Arc::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentTool>> {
        self.tools.get(name).cloned()
    }

    /// All tool definitions, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<_> = self.tools.values().map(|t| t.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tracing::debug!(tool = name, "Executing tool");
        tool.execute(args).await
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Required string argument
pub(crate) fn str_arg<'a>(args: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    match args.get(name) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(ToolError::InvalidArguments(format!("'{}' must be a string", name))),
        None => Err(ToolError::InvalidArguments(format!("missing '{}'", name))),
    }
}

/// Optional integer argument
pub(crate) fn opt_i64_arg(args: &Value, name: &str) -> Result<Option<i64>, ToolError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| ToolError::InvalidArguments(format!("'{}' must be an integer", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl AgentTool for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::with_string_args("echo", "Echoes the input", &[("message", "Text")])
        }

        async fn execute(&self, args: Value) -> Result<Value, ToolError> {
            let message = str_arg(&args, "message")?;
            Ok(json!({ "echo": message }))
        }
    }

    #[tokio::test]
    async fn test_tool_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        assert!(registry.contains("echo"));
        assert_eq!(registry.len(), 1);

        let result = registry.execute("echo", json!({"message": "hello"})).await.unwrap();
        assert_eq!(result, json!({"echo": "hello"}));
    }

    #[tokio::test]
    async fn test_tool_not_found() {
        let registry = ToolRegistry::new();
        let result = registry.execute("nonexistent", json!({})).await;

        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_and_mistyped_arguments() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let missing = registry.execute("echo", json!({})).await;
        assert!(matches!(missing, Err(ToolError::InvalidArguments(msg)) if msg.contains("message")));

        let mistyped = registry.execute("echo", json!({"message": 3})).await;
        assert!(matches!(mistyped, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn test_string_args_schema() {
        let schema = string_args_schema(
            &[("name", "Plot name"), ("email", "Owner email")],
            &[("image_index", json!({"type": "integer"}))],
        );
        assert_eq!(schema["required"], json!(["name", "email"]));
        assert_eq!(schema["properties"]["name"]["type"], "string");
        assert_eq!(schema["properties"]["image_index"]["type"], "integer");
    }

    #[test]
    fn test_opt_i64_arg() {
        assert_eq!(opt_i64_arg(&json!({}), "i").unwrap(), None);
        assert_eq!(opt_i64_arg(&json!({"i": null}), "i").unwrap(), None);
        assert_eq!(opt_i64_arg(&json!({"i": -2}), "i").unwrap(), Some(-2));
        assert!(opt_i64_arg(&json!({"i": "two"}), "i").is_err());
    }
}
