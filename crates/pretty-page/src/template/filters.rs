//! MiniJinja filter registration.

use minijinja::{Environment, Value};

use super::helpers::{escape_but_preserve_uris, slug, to_text};
use crate::dumper::ValueType;

/// Registers the filter forms of the text helpers on an environment.
///
/// These mirror the `tpl` methods for use in filter position:
///
/// ```jinja
/// <a href="#{{ name | slug }}">{{ message | escape_uris }}</a>
/// {% if value | type_of == "array" %}...{% endif %}
/// ```
pub fn register_filters(env: &mut Environment<'static>) {
    env.add_filter("slug", |value: Value| -> String { slug(&to_text(&value)) });

    // Output contains anchors, so it must bypass auto-escaping.
    env.add_filter("escape_uris", |value: Value| -> Value {
        Value::from_safe_string(escape_but_preserve_uris(&to_text(&value)))
    });

    env.add_filter("type_of", |value: Value| -> &'static str {
        ValueType::of(&value).as_str()
    });
}
