//! Dispatch of remote function calls onto the capability tree.
//!
//! Dispatch is forgiving by contract: an unregistered call name, unparseable
//! arguments, a missing field, or a mistyped field never aborts processing —
//! each problem is logged and the remaining fields and siblings continue.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::capabilities::tree::{Attribute, AttributeState, AttributeUpdate, Capability};

/// Route one function call payload to the matching capability.
pub(crate) fn dispatch_call(capabilities: &[Capability], name: &str, arguments: &str) {
    let Some(capability) = capabilities.iter().find(|c| c.name() == name) else {
        debug!(call = name, "no capability registered for call");
        return;
    };
    let payload: Value = match serde_json::from_str(arguments) {
        Ok(value) => value,
        Err(err) => {
            warn!(call = name, error = %err, "function call arguments did not parse");
            return;
        }
    };
    let Some(object) = payload.as_object() else {
        warn!(call = name, "function call arguments are not an object");
        return;
    };
    for attribute in capability.attributes() {
        apply(name, attribute, object);
    }
}

/// Apply one payload field to one attribute, recursing into groups.
fn apply(call: &str, attribute: &Attribute, payload: &Map<String, Value>) {
    let Some(value) = payload.get(attribute.name()) else {
        if attribute.is_required() {
            warn!(call, attribute = attribute.name(), "missing required attribute");
        }
        return;
    };
    match (&attribute.state, value) {
        (AttributeState::Bool(slot), Value::Bool(flag)) => {
            *slot.lock() = *flag;
            notify(attribute, AttributeUpdate::Bool(*flag));
        }
        (AttributeState::Int(slot), Value::Number(number)) => {
            // Fractional values truncate toward zero.
            let int = number
                .as_i64()
                .or_else(|| number.as_f64().map(|float| float as i64))
                .unwrap_or_default();
            *slot.lock() = int;
            notify(attribute, AttributeUpdate::Int(int));
        }
        (AttributeState::Object(children), Value::Object(nested)) => {
            for child in children {
                apply(call, child, nested);
            }
        }
        _ => {
            warn!(
                call,
                attribute = attribute.name(),
                expected = attribute.kind_name(),
                "attribute value has mismatched type, skipping"
            );
        }
    }
}

fn notify(attribute: &Attribute, update: AttributeUpdate) {
    if let Some(handler) = &attribute.handler {
        handler(&update);
    }
}
