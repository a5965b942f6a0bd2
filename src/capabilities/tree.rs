//! Declarative capability tree.
//!
//! A [`Capability`] is a named action the remote agent can invoke; its
//! [`Attribute`]s describe the parameters. Attributes are typed — boolean,
//! integer, or a nested object of further attributes — and leaves hold the
//! current value, updated by dispatch. Tree shape is fixed once the registry
//! is built; only leaf values mutate afterwards, and only from the dispatch
//! path.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// New value delivered to an attribute handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeUpdate {
    Bool(bool),
    Int(i64),
}

/// Callback invoked with the freshly stored value when dispatch writes a
/// leaf attribute.
pub type AttributeHandler = Arc<dyn Fn(&AttributeUpdate) + Send + Sync>;

/// Kind and storage of one attribute.
pub(crate) enum AttributeState {
    Bool(Mutex<bool>),
    Int(Mutex<i64>),
    Object(Vec<Attribute>),
}

/// One parameter of a capability.
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) state: AttributeState,
    pub(crate) required: bool,
    pub(crate) handler: Option<AttributeHandler>,
}

impl Attribute {
    /// A boolean leaf, initially `false`.
    pub fn bool(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::leaf(name, description, AttributeState::Bool(Mutex::new(false)))
    }

    /// An integer leaf, initially `0`.
    pub fn int(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::leaf(name, description, AttributeState::Int(Mutex::new(0)))
    }

    /// A nested object of attributes.
    pub fn group(
        name: impl Into<String>,
        description: impl Into<String>,
        children: Vec<Attribute>,
    ) -> Self {
        Self::leaf(name, description, AttributeState::Object(children))
    }

    fn leaf(name: impl Into<String>, description: impl Into<String>, state: AttributeState) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            state,
            required: false,
            handler: None,
        }
    }

    /// Mark this attribute as required in the generated schema.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Install a handler invoked whenever dispatch stores a new value.
    pub fn on_change(mut self, handler: impl Fn(&AttributeUpdate) + Send + Sync + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// JSON Schema type name for this attribute's kind.
    pub fn kind_name(&self) -> &'static str {
        match self.state {
            AttributeState::Bool(_) => "boolean",
            AttributeState::Int(_) => "integer",
            AttributeState::Object(_) => "object",
        }
    }

    /// Nested attributes; empty for leaves.
    pub fn children(&self) -> &[Attribute] {
        match &self.state {
            AttributeState::Object(children) => children,
            _ => &[],
        }
    }

    /// Current value of a boolean leaf.
    pub fn bool_value(&self) -> Option<bool> {
        match &self.state {
            AttributeState::Bool(slot) => Some(*slot.lock()),
            _ => None,
        }
    }

    /// Current value of an integer leaf.
    pub fn int_value(&self) -> Option<i64> {
        match &self.state {
            AttributeState::Int(slot) => Some(*slot.lock()),
            _ => None,
        }
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("kind", &self.kind_name())
            .field("required", &self.required)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// A remotely invokable action with its parameter attributes.
#[derive(Debug)]
pub struct Capability {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) attributes: Vec<Attribute>,
}

impl Capability {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            attributes: Vec::new(),
        }
    }

    /// Append an attribute; declaration order is schema order.
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}
