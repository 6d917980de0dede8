//! Coarse value categories used for dumper matching.

use std::fmt;
use std::str::FromStr;

use minijinja::functions::BoxedFunction;
use minijinja::value::{Value, ValueKind};

use crate::error::RenderError;

/// A small, closed category of a runtime value.
///
/// This is coarser than the value's concrete type: every map is
/// a `Map`, every custom object that is not a function is an `Object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Map,
    Object,
    Callable,
}

impl ValueType {
    /// All categories, in declaration order.
    pub const ALL: [ValueType; 9] = [
        ValueType::Null,
        ValueType::Boolean,
        ValueType::Integer,
        ValueType::Float,
        ValueType::String,
        ValueType::Array,
        ValueType::Map,
        ValueType::Object,
        ValueType::Callable,
    ];

    /// Computes the category of `value`.
    pub fn of(value: &Value) -> Self {
        match value.kind() {
            ValueKind::Undefined | ValueKind::None => ValueType::Null,
            ValueKind::Bool => ValueType::Boolean,
            ValueKind::Number if value.is_integer() => ValueType::Integer,
            ValueKind::Number => ValueType::Float,
            ValueKind::String | ValueKind::Bytes => ValueType::String,
            ValueKind::Seq | ValueKind::Iterable => ValueType::Array,
            ValueKind::Map => ValueType::Map,
            _ if value.downcast_object_ref::<BoxedFunction>().is_some() => ValueType::Callable,
            _ => ValueType::Object,
        }
    }

    /// The tag string matched by `Equals` and `Pattern` rules.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Map => "map",
            ValueType::Object => "object",
            ValueType::Callable => "callable",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| RenderError::InvalidArgument(format!("unknown value type tag '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Opaque;

    impl minijinja::value::Object for Opaque {
        fn repr(self: &Arc<Self>) -> minijinja::value::ObjectRepr {
            minijinja::value::ObjectRepr::Plain
        }
    }

    #[test]
    fn test_scalars() {
        assert_eq!(ValueType::of(&Value::from(())), ValueType::Null);
        assert_eq!(ValueType::of(&Value::UNDEFINED), ValueType::Null);
        assert_eq!(ValueType::of(&Value::from(false)), ValueType::Boolean);
        assert_eq!(ValueType::of(&Value::from(3)), ValueType::Integer);
        assert_eq!(ValueType::of(&Value::from(3.5)), ValueType::Float);
        assert_eq!(ValueType::of(&Value::from("s")), ValueType::String);
    }

    #[test]
    fn test_composites() {
        assert_eq!(ValueType::of(&Value::from(vec![1, 2])), ValueType::Array);

        let mut map = BTreeMap::new();
        map.insert("k", 1);
        assert_eq!(ValueType::of(&Value::from_serialize(&map)), ValueType::Map);
    }

    #[test]
    fn test_serialized_struct_is_map() {
        #[derive(serde::Serialize)]
        struct Point {
            x: i32,
        }
        assert_eq!(ValueType::of(&Value::from_serialize(Point { x: 1 })), ValueType::Map);
    }

    #[test]
    fn test_objects_and_callables() {
        assert_eq!(ValueType::of(&Value::from_object(Opaque)), ValueType::Object);

        let func = Value::from_function(|a: i64| a + 1);
        assert_eq!(ValueType::of(&func), ValueType::Callable);
    }

    #[test]
    fn test_tag_round_trip() {
        for ty in ValueType::ALL {
            assert_eq!(ty.as_str().parse::<ValueType>().unwrap(), ty);
        }
        assert!("resource".parse::<ValueType>().is_err());
    }
}
