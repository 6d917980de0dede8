//! The `tpl` object available inside every template.
//!
//! Each execution binds a [`RenderContext`] as `tpl`. Templates use it to
//! escape text, build slugs, pick defaults, run other templates, and dump
//! nested values:
//!
//! ```jinja
//! <h2 id="{{ tpl.slug(name) }}">{{ tpl.escape_uris(message) }}</h2>
//! {{ tpl.template("views/frames.html.jinja", {"frames": frames}) }}
//! {% for item in value %}{{ tpl.dump(item) }}{% endfor %}
//! ```
//!
//! | Method | Result |
//! |--------|--------|
//! | `escape(x)` | HTML-escaped text (safe string) |
//! | `escape_uris(x)` | escaped text with URIs turned into anchors (safe string) |
//! | `slug(x)` | lower-case slug |
//! | `pick(x, fallback)` | `x` if truthy, else `fallback` |
//! | `template(name, vars?)` | output of another template (safe string) |
//! | `dump(v, ...)` | dumper output for each value (safe string) |
//! | `type_of(v)` | coarse type tag, e.g. `"array"` |
//!
//! The context is handed to the template explicitly as a variable; it is a
//! new binding per execution and carries no per-call state of its own.

use std::fmt;
use std::fs;
use std::sync::Arc;

use minijinja::value::{from_args, Object, ObjectRepr, Value};
use minijinja::{Error, ErrorKind, State};

use super::helpers::{escape, escape_but_preserve_uris, pick, slug, to_text};
use super::resolver::{TemplateResolver, Variables};
use crate::dumper::{DumperRegistry, ValueType};
use crate::error::{RenderError, Result};

/// Name under which the context is bound in every template.
pub const CONTEXT_VARIABLE: &str = "tpl";

/// Facade exposed to template bodies.
#[derive(Clone)]
pub struct RenderContext {
    resolver: TemplateResolver,
    dumper: Option<DumperRegistry>,
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("search_paths", &self.resolver.search_paths())
            .field("has_dumper", &self.dumper.is_some())
            .finish()
    }
}

impl RenderContext {
    /// A context that can run templates but has no dumper attached.
    pub fn new(resolver: TemplateResolver) -> Self {
        Self {
            resolver,
            dumper: None,
        }
    }

    /// A context whose `tpl.dump(...)` dispatches through `dumper`.
    pub fn with_dumper(resolver: TemplateResolver, dumper: DumperRegistry) -> Self {
        Self {
            resolver,
            dumper: Some(dumper),
        }
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    pub fn dumper(&self) -> Option<&DumperRegistry> {
        self.dumper.as_ref()
    }

    /// Resolves, reads and renders `name` with `variables` plus `tpl`.
    pub fn execute(&self, name: &str, variables: Option<Variables>) -> Result<String> {
        let path = self.resolver.resolve(name)?;
        let source = fs::read_to_string(&path).map_err(|e| RenderError::io(&path, e))?;

        let mut ctx = variables.unwrap_or_default();
        ctx.insert(CONTEXT_VARIABLE.to_string(), Value::from_object(self.clone()));

        let output = self
            .resolver
            .environment()
            .render_named_str(name, &source, &ctx)?;
        Ok(output)
    }

    fn call_template(&self, args: &[Value]) -> std::result::Result<Value, Error> {
        let (name, vars): (&str, Option<Value>) = from_args(args)?;
        let variables = match vars {
            Some(map) => Some(value_to_variables(&map)?),
            None => None,
        };
        self.execute(name, variables)
            .map(Value::from_safe_string)
            .map_err(RenderError::into_minijinja)
    }

    fn call_dump(&self, args: &[Value]) -> std::result::Result<Value, Error> {
        let Some(dumper) = &self.dumper else {
            return Ok(Value::from_safe_string(String::new()));
        };
        dumper
            .dump(args)
            .map(Value::from_safe_string)
            .map_err(RenderError::into_minijinja)
    }
}

impl Object for RenderContext {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn call_method(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> std::result::Result<Value, Error> {
        match method {
            "escape" => {
                let (raw,): (Value,) = from_args(args)?;
                Ok(Value::from_safe_string(escape(&to_text(&raw))))
            }
            "escape_uris" => {
                let (raw,): (Value,) = from_args(args)?;
                Ok(Value::from_safe_string(escape_but_preserve_uris(&to_text(
                    &raw,
                ))))
            }
            "slug" => {
                let (raw,): (Value,) = from_args(args)?;
                Ok(Value::from(slug(&to_text(&raw))))
            }
            "pick" => {
                let (value, fallback): (Value, Value) = from_args(args)?;
                Ok(pick(value, fallback))
            }
            "type_of" => {
                let (value,): (Value,) = from_args(args)?;
                Ok(Value::from(ValueType::of(&value).as_str()))
            }
            "template" => self.call_template(args),
            "dump" => self.call_dump(args),
            _ => Err(Error::new(
                ErrorKind::UnknownMethod,
                format!("tpl has no method named {}", method),
            )),
        }
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<render context>")
    }
}

/// Converts a map value (dict literal or keyword arguments) into variables.
fn value_to_variables(map: &Value) -> std::result::Result<Variables, Error> {
    if ValueType::of(map) != ValueType::Map {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("template variables must be a map, got {}", ValueType::of(map)),
        ));
    }
    let mut variables = Variables::new();
    for key in map.try_iter()? {
        let value = map.get_item(&key)?;
        variables.insert(to_text(&key), value);
    }
    Ok(variables)
}
