//! Pluggable rendering of arbitrary runtime values.
//!
//! A [`DumperRegistry`] holds an ordered list of [`DumperRule`]s. Each rule
//! pairs a [`Matcher`] with the name of a template; dumping a value finds the
//! matching rule (see [`registry`] for the ordering contract) and executes its
//! template with two variables:
//!
//! - `value`: the value itself
//! - `type`: its [`ValueType`] tag (`"array"`, `"map"`, ...)
//!
//! Composite dumpers call `tpl.dump(child)` for their children, so nested
//! values render recursively through the same registry. There is no cycle
//! detection: a self-referencing value recurses until the stack gives out.

mod handler;
pub mod registry;
mod rule;
mod value_type;

pub use handler::{handler_value, is_handler, DiagnosticHandler, HandlerObject};
pub use registry::{default_rules, DumperRegistry};
pub use rule::{DumperRule, Matcher, ValuePredicate};
pub use value_type::ValueType;
