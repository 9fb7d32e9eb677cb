//! Tool descriptors and parameter schemas.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use spacewh_auth::{Category, Requirement};

/// JSON type a parameter must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// JSON string.
    String,
    /// Whole number.
    Integer,
    /// Any number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// JSON object.
    Object,
    /// JSON array.
    Array,
    /// Anything.
    Any,
}

impl ParamKind {
    /// Returns `true` if `value` has this kind.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Any => true,
        }
    }

    /// Lowercase kind name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Any => "any",
        }
    }
}

/// One declared tool parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name.
    pub name: String,
    /// Expected JSON kind.
    pub kind: ParamKind,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Whether the caller must supply it.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl ToolParameter {
    /// A required parameter.
    #[must_use]
    pub fn required(name: impl Into<String>, kind: ParamKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
        }
    }

    /// An optional parameter.
    #[must_use]
    pub fn optional(name: impl Into<String>, kind: ParamKind, description: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }
}

/// Registered tool metadata.
///
/// # Example
///
/// ```
/// use spacewh_runtime::tools::{ParamKind, ToolDescriptor, ToolParameter};
/// use spacewh_auth::Category;
///
/// let tool = ToolDescriptor::new("ingest", "Ingest document", Category::WRITE_KNOWLEDGE)
///     .describe("Adds a document to the knowledge store")
///     .param(ToolParameter::required("path", ParamKind::String, "Document path"));
///
/// let req = tool.requirement();
/// assert_eq!(req.capability, "tool:ingest");
/// assert!(req.categories.contains(Category::WRITE_KNOWLEDGE));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique id.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the tool does.
    #[serde(default)]
    pub description: String,
    /// Semantic version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Category tag.
    pub category: Category,
    /// Additional categories the mode must allow.
    #[serde(default = "Category::empty")]
    pub required: Category,
    /// Declared parameters.
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl ToolDescriptor {
    /// Descriptor with no parameters.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            version: default_version(),
            category,
            required: Category::empty(),
            parameters: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Adds required categories.
    #[must_use]
    pub fn requires(mut self, categories: Category) -> Self {
        self.required |= categories;
        self
    }

    /// Adds a parameter.
    #[must_use]
    pub fn param(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Everything the mode must allow: the tag plus the required set.
    #[must_use]
    pub fn categories(&self) -> Category {
        self.category | self.required
    }

    /// Gate requirement for invoking this tool.
    #[must_use]
    pub fn requirement(&self) -> Requirement {
        Requirement::new(format!("tool:{}", self.id)).with_categories(self.categories())
    }

    /// Checks `params` against the declared parameters.
    ///
    /// Missing required parameters and kind mismatches are reported;
    /// undeclared parameters are allowed. An explicit `null` for an
    /// optional parameter counts as absent.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self, params: &Map<String, Value>) -> Result<(), String> {
        for parameter in &self.parameters {
            match params.get(&parameter.name) {
                None | Some(Value::Null) if parameter.required => {
                    return Err(format!("missing required parameter '{}'", parameter.name));
                }
                None | Some(Value::Null) => {}
                Some(value) if !parameter.kind.accepts(value) => {
                    return Err(format!(
                        "parameter '{}' must be {}",
                        parameter.name,
                        parameter.kind.name()
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo() -> ToolDescriptor {
        ToolDescriptor::new("echo", "Echo", Category::BASIC_TOOLS)
            .param(ToolParameter::required("message", ParamKind::String, "Text"))
            .param(ToolParameter::optional("repeat", ParamKind::Integer, "Count"))
    }

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn valid_params_pass() {
        assert!(echo().validate(&params(json!({"message": "hi"}))).is_ok());
        assert!(echo()
            .validate(&params(json!({"message": "hi", "repeat": 2, "extra": true})))
            .is_ok());
        assert!(echo()
            .validate(&params(json!({"message": "hi", "repeat": null})))
            .is_ok());
    }

    #[test]
    fn missing_required_param() {
        let err = echo().validate(&params(json!({}))).expect_err("missing");
        assert!(err.contains("message"), "got: {err}");
    }

    #[test]
    fn wrong_kind() {
        let err = echo()
            .validate(&params(json!({"message": "hi", "repeat": 1.5})))
            .expect_err("not an integer");
        assert!(err.contains("integer"), "got: {err}");
    }

    #[test]
    fn kinds_accept_expected_values() {
        assert!(ParamKind::Number.accepts(&json!(1.5)));
        assert!(ParamKind::Number.accepts(&json!(2)));
        assert!(!ParamKind::Integer.accepts(&json!("2")));
        assert!(ParamKind::Array.accepts(&json!([])));
        assert!(ParamKind::Any.accepts(&json!(null)));
    }

    #[test]
    fn requirement_includes_required_categories() {
        let tool = ToolDescriptor::new("purge", "Purge", Category::ADMIN_TOOLS)
            .requires(Category::WRITE_KNOWLEDGE);
        assert_eq!(
            tool.requirement().categories,
            Category::ADMIN_TOOLS | Category::WRITE_KNOWLEDGE
        );
        assert_eq!(tool.requirement().min_level, None);
    }

    #[test]
    fn descriptor_deserializes_with_defaults() {
        let tool: ToolDescriptor = serde_json::from_value(json!({
            "id": "search",
            "name": "Search",
            "category": "READ_KNOWLEDGE"
        }))
        .expect("deserialize");
        assert_eq!(tool.version, "0.1.0");
        assert_eq!(tool.category, Category::READ_KNOWLEDGE);
        assert!(tool.parameters.is_empty());
    }
}
