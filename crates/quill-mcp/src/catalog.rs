//! Tool catalog: descriptors, input schemas and bound handlers
//!
//! The catalog is built once at start-up and never changes afterwards, which is
//! why the initialize handshake advertises `listChanged: false`.

use crate::error::McpError;
use crate::invoker::{Arguments, ToolError, ToolOutput};
use quill_domain::ContentRepository;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Function executing one tool against the content backend
pub type ToolHandler = fn(&dyn ContentRepository, Arguments) -> Result<ToolOutput, ToolError>;

/// Declared type of a tool argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// JSON string
    String,
    /// Whole number; integer-valued strings are accepted and coerced
    Integer,
}

/// Schema of a single argument
#[derive(Debug, Clone, Serialize)]
pub struct PropertySchema {
    /// Declared type
    #[serde(rename = "type")]
    pub kind: PropertyType,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,

    /// Value used when the caller omits the argument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Allowed values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<&'static [&'static str]>,
}

impl PropertySchema {
    fn of(kind: PropertyType) -> Self {
        Self {
            kind,
            description: None,
            default: None,
            allowed: None,
        }
    }

    /// A string argument
    pub fn string() -> Self {
        Self::of(PropertyType::String)
    }

    /// An integer argument
    pub fn integer() -> Self {
        Self::of(PropertyType::Integer)
    }

    /// Attach a description
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Attach a default value
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Restrict to a fixed set of values
    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    /// Check the type of a supplied value, coercing integer-valued strings
    fn coerce(&self, name: &str, value: Value) -> Result<Value, ToolError> {
        let value = match self.kind {
            PropertyType::Integer => coerce_integer(&value)
                .map(Value::from)
                .ok_or_else(|| expected(name, "integer"))?,
            PropertyType::String => match value {
                Value::String(_) => value,
                _ => return Err(expected(name, "string")),
            },
        };

        if let (Some(allowed), Value::String(s)) = (self.allowed, &value) {
            if !allowed.contains(&s.as_str()) {
                return Err(ToolError::Invalid(format!(
                    "Invalid argument '{}': {} (expected one of: {})",
                    name,
                    s,
                    allowed.join(", ")
                )));
            }
        }

        Ok(value)
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn expected(name: &str, kind: &str) -> ToolError {
    ToolError::Invalid(format!("Invalid argument '{}': expected {}", name, kind))
}

/// JSON-Schema-like description of a tool's arguments
///
/// Properties keep declaration order.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    properties: Vec<(&'static str, PropertySchema)>,
    required: Vec<&'static str>,
}

impl InputSchema {
    /// Schema without properties
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an optional property
    pub fn property(mut self, name: &'static str, schema: PropertySchema) -> Self {
        self.properties.push((name, schema));
        self
    }

    /// Add a required property
    pub fn required(mut self, name: &'static str, schema: PropertySchema) -> Self {
        self.required.push(name);
        self.property(name, schema)
    }

    /// Look up a property by name
    pub fn get(&self, name: &str) -> Option<&PropertySchema> {
        self.properties
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, schema)| schema)
    }

    /// Names of required properties
    pub fn required_names(&self) -> &[&'static str] {
        &self.required
    }

    /// Validate caller arguments and fill in defaults
    ///
    /// Null counts as omitted. Properties the schema does not declare are dropped.
    pub fn apply(&self, mut raw: Map<String, Value>) -> Result<Arguments, ToolError> {
        let mut prepared = Map::new();

        for (name, schema) in &self.properties {
            match raw.remove(*name).filter(|v| !v.is_null()) {
                Some(value) => {
                    prepared.insert(name.to_string(), schema.coerce(name, value)?);
                }
                None if self.required.contains(name) => {
                    return Err(ToolError::Invalid(format!(
                        "Missing required argument: {}",
                        name
                    )));
                }
                None => {
                    if let Some(default) = &schema.default {
                        prepared.insert(name.to_string(), default.clone());
                    }
                }
            }
        }

        Ok(Arguments::new(prepared))
    }
}

impl Serialize for InputSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Properties<'a>(&'a [(&'static str, PropertySchema)]);

        impl Serialize for Properties<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (name, schema) in self.0 {
                    map.serialize_entry(name, schema)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "object")?;
        map.serialize_entry("properties", &Properties(&self.properties))?;
        if !self.required.is_empty() {
            map.serialize_entry("required", &self.required)?;
        }
        map.end()
    }
}

/// Tool definition advertised by `tools/list`
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    /// Tool name, unique within the catalog
    pub name: &'static str,
    /// Tool description
    pub description: &'static str,
    /// Input schema (JSON Schema)
    #[serde(rename = "inputSchema")]
    pub input_schema: InputSchema,
}

/// A descriptor bound to the handler that executes it
#[derive(Clone)]
pub struct Tool {
    descriptor: ToolDescriptor,
    handler: ToolHandler,
}

impl Tool {
    /// Bind a handler to a descriptor
    pub fn new(
        name: &'static str,
        description: &'static str,
        input_schema: InputSchema,
        handler: ToolHandler,
    ) -> Self {
        Self {
            descriptor: ToolDescriptor {
                name,
                description,
                input_schema,
            },
            handler,
        }
    }

    /// Advertised definition
    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// Tool name
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    /// Validate `arguments` against the schema and run the handler
    pub fn call(
        &self,
        repository: &dyn ContentRepository,
        arguments: Map<String, Value>,
    ) -> Result<ToolOutput, ToolError> {
        let arguments = self.descriptor.input_schema.apply(arguments)?;
        (self.handler)(repository, arguments)
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.descriptor.name)
            .finish_non_exhaustive()
    }
}

/// Ordered, read-only registry of tools
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<Tool>,
}

impl ToolCatalog {
    /// Build a catalog, rejecting repeated names
    pub fn new(tools: Vec<Tool>) -> Result<Self, McpError> {
        let mut seen = HashSet::new();
        for tool in &tools {
            if !seen.insert(tool.name()) {
                return Err(McpError::DuplicateTool(tool.name().to_string()));
            }
        }
        Ok(Self { tools })
    }

    /// The seven content tools, in advertised order
    pub fn standard() -> Self {
        Self {
            tools: crate::tools::standard_tools(),
        }
    }

    /// Descriptors in declaration order
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        self.tools.iter().map(Tool::descriptor).collect()
    }

    /// Find a tool by name
    pub fn find(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Number of tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
