//! The diagnostic-handler capability.
//!
//! Error handlers that want a dedicated rendering on the diagnostic page
//! implement [`DiagnosticHandler`] and are passed to templates through
//! [`handler_value`]. The default rule set recognizes them with
//! [`is_handler`] instead of inspecting their concrete type.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use minijinja::value::{Enumerator, Object, ObjectRepr, Value};

/// A component that handles errors and can describe itself.
pub trait DiagnosticHandler: fmt::Debug + Send + Sync {
    /// Short, human-readable handler name.
    fn name(&self) -> &str;

    /// Key/value details shown under the handler name.
    fn details(&self) -> BTreeMap<String, Value> {
        BTreeMap::new()
    }
}

/// Template-facing wrapper around a [`DiagnosticHandler`].
///
/// Exposes `name` and `details` as attributes.
#[derive(Debug)]
pub struct HandlerObject(Arc<dyn DiagnosticHandler>);

impl HandlerObject {
    pub fn handler(&self) -> &dyn DiagnosticHandler {
        &*self.0
    }
}

impl Object for HandlerObject {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "name" => Some(Value::from(self.0.name())),
            "details" => Some(Value::from_iter(self.0.details())),
            _ => None,
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Str(&["name", "details"])
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<handler {}>", self.0.name())
    }
}

/// Wraps a handler so it can be dumped and inspected from templates.
pub fn handler_value<H: DiagnosticHandler + 'static>(handler: H) -> Value {
    Value::from_object(HandlerObject(Arc::new(handler)))
}

/// Returns `true` if `value` was produced by [`handler_value`].
pub fn is_handler(value: &Value) -> bool {
    value.downcast_object_ref::<HandlerObject>().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dumper::ValueType;

    #[derive(Debug)]
    struct JsonResponder;

    impl DiagnosticHandler for JsonResponder {
        fn name(&self) -> &str {
            "json-responder"
        }

        fn details(&self) -> BTreeMap<String, Value> {
            let mut details = BTreeMap::new();
            details.insert("pretty".to_string(), Value::from(true));
            details
        }
    }

    #[test]
    fn test_capability_check() {
        let value = handler_value(JsonResponder);
        assert!(is_handler(&value));
        assert!(!is_handler(&Value::from("json-responder")));
    }

    #[test]
    fn test_handler_is_an_object() {
        assert_eq!(ValueType::of(&handler_value(JsonResponder)), ValueType::Object);
    }

    #[test]
    fn test_attributes() {
        let value = handler_value(JsonResponder);
        assert_eq!(value.get_attr("name").unwrap().as_str(), Some("json-responder"));

        let details = value.get_attr("details").unwrap();
        assert!(details.get_attr("pretty").unwrap().is_true());
        assert_eq!(value.to_string(), "<handler json-responder>");
    }
}
