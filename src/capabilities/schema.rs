//! Schema generation for the capability tree.
//!
//! Each capability becomes one function tool whose `parameters` object is
//! emitted recursively from its attributes. At every level the `required`
//! array is exactly the ordered subset of that level's required direct
//! children, and the key is omitted entirely when the subset is empty.

use serde_json::{Map, Value};

use crate::capabilities::tree::{Attribute, Capability};
use realtime_protocol::ToolDefinition;

/// The function tool advertised for one capability.
pub(crate) fn tool_for(capability: &Capability) -> ToolDefinition {
    ToolDefinition::function(
        capability.name(),
        capability.description(),
        parameters_for(capability.attributes()),
    )
}

/// `{"type":"object","properties":{…},"required":[…]?}` for one attribute
/// level.
fn parameters_for(attributes: &[Attribute]) -> Value {
    let mut parameters = Map::new();
    parameters.insert("type".to_string(), Value::String("object".to_string()));
    parameters.insert("properties".to_string(), properties_for(attributes));
    if let Some(required) = required_for(attributes) {
        parameters.insert("required".to_string(), required);
    }
    Value::Object(parameters)
}

fn properties_for(attributes: &[Attribute]) -> Value {
    let mut properties = Map::new();
    for attribute in attributes {
        let mut property = Map::new();
        property.insert(
            "type".to_string(),
            Value::String(attribute.kind_name().to_string()),
        );
        property.insert(
            "description".to_string(),
            Value::String(attribute.description().to_string()),
        );
        if attribute.kind_name() == "object" {
            property.insert(
                "properties".to_string(),
                properties_for(attribute.children()),
            );
            if let Some(required) = required_for(attribute.children()) {
                property.insert("required".to_string(), required);
            }
        }
        properties.insert(attribute.name().to_string(), Value::Object(property));
    }
    Value::Object(properties)
}

/// Ordered subset of required direct children; `None` when empty.
fn required_for(attributes: &[Attribute]) -> Option<Value> {
    let required: Vec<Value> = attributes
        .iter()
        .filter(|attribute| attribute.is_required())
        .map(|attribute| Value::String(attribute.name().to_string()))
        .collect();
    (!required.is_empty()).then(|| Value::Array(required))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn light_capability() -> Capability {
        Capability::new("SetLightState", "Changes the state of the light")
            .attribute(
                Attribute::bool("LightState", "New light state (true or false is expected)")
                    .required(),
            )
            .attribute(Attribute::group(
                "LightColor",
                "Set light color of red, green and blue",
                vec![
                    Attribute::int("red", "Red value in the range of 0-255").required(),
                    Attribute::int("green", "Green value in the range of 0-255").required(),
                    Attribute::int("blue", "Blue value in the range of 0-255").required(),
                ],
            ))
    }

    #[test]
    fn test_tool_schema_shape() {
        let ToolDefinition::Function {
            name,
            description,
            parameters,
        } = tool_for(&light_capability());

        assert_eq!(name, "SetLightState");
        assert_eq!(description, "Changes the state of the light");
        assert_eq!(
            parameters,
            json!({
                "type": "object",
                "properties": {
                    "LightState": {
                        "type": "boolean",
                        "description": "New light state (true or false is expected)"
                    },
                    "LightColor": {
                        "type": "object",
                        "description": "Set light color of red, green and blue",
                        "properties": {
                            "red": {"type": "integer", "description": "Red value in the range of 0-255"},
                            "green": {"type": "integer", "description": "Green value in the range of 0-255"},
                            "blue": {"type": "integer", "description": "Blue value in the range of 0-255"}
                        },
                        "required": ["red", "green", "blue"]
                    }
                },
                "required": ["LightState"]
            })
        );
    }

    #[test]
    fn test_required_is_ordered_subset() {
        let capability = Capability::new("Mixed", "mixed requirements")
            .attribute(Attribute::int("a", "first").required())
            .attribute(Attribute::int("b", "second"))
            .attribute(Attribute::bool("c", "third").required());
        let ToolDefinition::Function { parameters, .. } = tool_for(&capability);
        assert_eq!(parameters["required"], json!(["a", "c"]));
    }

    #[test]
    fn test_required_omitted_when_empty() {
        let capability = Capability::new("Loose", "nothing required")
            .attribute(Attribute::int("a", "first"))
            .attribute(Attribute::bool("b", "second"));
        let ToolDefinition::Function { parameters, .. } = tool_for(&capability);
        assert!(parameters.get("required").is_none());
        // nested levels too
        let capability = Capability::new("Nested", "optional group").attribute(Attribute::group(
            "g",
            "group",
            vec![Attribute::int("x", "optional leaf")],
        ));
        let ToolDefinition::Function { parameters, .. } = tool_for(&capability);
        assert!(parameters["properties"]["g"].get("required").is_none());
    }

    #[test]
    fn test_property_order_is_declaration_order() {
        let ToolDefinition::Function { parameters, .. } = tool_for(&light_capability());
        let keys: Vec<&String> = parameters["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["LightState", "LightColor"]);
    }
}
