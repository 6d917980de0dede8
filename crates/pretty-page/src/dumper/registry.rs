//! Ordered, first-match-wins dispatch of values to dumper templates.
//!
//! # Rule Ordering
//!
//! Rules come in two tiers:
//!
//! 1. **Specific rules** (`Equals`, `Pattern`, `Predicate`) are evaluated in
//!    insertion order; the first match wins.
//! 2. **Catch-all rules** ([`Matcher::All`]) are the fallback. They are only
//!    consulted when no specific rule matched, and the earliest-added one
//!    wins.
//!
//! A catch-all therefore never shadows a specific rule, whether it was added
//! first (as the default set does) or last. Rule sets written for a strict
//! first-match dumper, where a catch-all added first shadows everything after
//! it, behave differently here: their later specific rules now apply. Between two specific rules,
//! insertion order is the only tie-breaker: a broad `Pattern(".*")` added
//! early shadows an `Equals(array)` added later.
//!
//! ```text
//! added   rule                          [1, 2]     "x"
//! 1       generic  All                             fallback
//! 2       array    Equals(array)        match
//! 3       object   Equals(object)
//! ```
//!
//! # Failure Policy
//!
//! [`DumperRegistry::dump`] is fail-soft: an unmatched value produces no
//! output, and a value whose template fails is logged and skipped while the
//! rest of the batch still renders. [`DumperRegistry::dump_value`] is the
//! strict single-value variant that propagates errors.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use minijinja::value::Value;

use super::handler::is_handler;
use super::rule::{DumperRule, Matcher};
use super::value_type::ValueType;
use crate::error::{RenderError, Result};
use crate::template::{RenderContext, TemplateResolver, Variables};

/// Template used by the default catch-all rule.
pub const GENERIC_TEMPLATE: &str = "views/dumper/generic.html.jinja";
/// Template used by the default array rule.
pub const ARRAY_TEMPLATE: &str = "views/dumper/array.html.jinja";
/// Template used by the default map rule.
pub const MAP_TEMPLATE: &str = "views/dumper/map.html.jinja";
/// Template used by the default object rule.
pub const OBJECT_TEMPLATE: &str = "views/dumper/object.html.jinja";
/// Template used by the default handler rule.
pub const HANDLER_TEMPLATE: &str = "views/dumper/handler.html.jinja";

/// Ordered dumper rules plus the resolver used to render matches.
///
/// Like [`TemplateResolver`], this is a cheap handle: clones share the same
/// rule list. The registry refers to the resolver but does not own its
/// search paths or cache.
#[derive(Debug, Clone)]
pub struct DumperRegistry {
    resolver: TemplateResolver,
    rules: Arc<RwLock<Vec<DumperRule>>>,
}

impl DumperRegistry {
    /// Creates a registry with no rules.
    pub fn new(resolver: TemplateResolver) -> Self {
        Self {
            resolver,
            rules: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a registry with the default rule set, in this order:
    ///
    /// | Rule | Matcher | Template |
    /// |------|---------|----------|
    /// | `generic` | `All` | [`GENERIC_TEMPLATE`] |
    /// | `array` | `Equals(array)` | [`ARRAY_TEMPLATE`] |
    /// | `map` | `Equals(map)` | [`MAP_TEMPLATE`] |
    /// | `handler` | `Predicate(is_handler)` | [`HANDLER_TEMPLATE`] |
    /// | `object` | `Equals(object)` | [`OBJECT_TEMPLATE`] |
    ///
    /// Handlers are objects too; `handler` is added before `object` so it wins.
    pub fn with_defaults(resolver: TemplateResolver) -> Self {
        let registry = Self::new(resolver);
        registry.add_rules(default_rules());
        registry
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    /// Appends a rule. It is evaluated after every existing rule.
    pub fn add_rule(&self, rule: DumperRule) {
        tracing::debug!(name = rule.name(), template = rule.template(), matcher = ?rule.matcher(), "adding dumper rule");
        self.write_rules().push(rule);
    }

    /// Appends several rules, keeping their order.
    pub fn add_rules<I: IntoIterator<Item = DumperRule>>(&self, rules: I) {
        for rule in rules {
            self.add_rule(rule);
        }
    }

    /// Replaces the whole rule list.
    pub fn set_rules(&self, rules: Vec<DumperRule>) {
        *self.write_rules() = rules;
    }

    /// Removes every rule.
    pub fn clear(&self) {
        self.write_rules().clear();
    }

    /// Returns a snapshot of the rules in evaluation order.
    pub fn rules(&self) -> Vec<DumperRule> {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.rules.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the first rule matching `value`, if any.
    pub fn matching_rule(&self, value: &Value) -> Option<DumperRule> {
        first_match(&self.rules(), value, ValueType::of(value)).cloned()
    }

    /// Renders each value through its first matching rule, in order, and
    /// concatenates the output.
    ///
    /// Unmatched values produce nothing. A value whose template fails is
    /// logged with `tracing::warn!` and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidArgument`] if `values` is empty.
    pub fn dump(&self, values: &[Value]) -> Result<String> {
        if values.is_empty() {
            return Err(RenderError::InvalidArgument(
                "dump expects at least one value".into(),
            ));
        }

        // Snapshot so templates that touch the registry never race the loop.
        let rules = self.rules();
        let mut output = String::new();
        for value in values {
            match self.render_with(&rules, value) {
                Ok(Some(rendered)) => output.push_str(&rendered),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(error = %err, value_type = %ValueType::of(value), "dumper failed, skipping value");
                }
            }
        }
        Ok(output)
    }

    /// Renders a single value, propagating failures.
    ///
    /// Returns `Ok(None)` when no rule matches.
    pub fn dump_value(&self, value: &Value) -> Result<Option<String>> {
        self.render_with(&self.rules(), value)
    }

    fn render_with(&self, rules: &[DumperRule], value: &Value) -> Result<Option<String>> {
        let ty = ValueType::of(value);
        let Some(rule) = first_match(rules, value, ty) else {
            tracing::trace!(value_type = %ty, "no dumper matched");
            return Ok(None);
        };

        let mut variables = Variables::new();
        variables.insert("value".to_string(), value.clone());
        variables.insert("type".to_string(), Value::from(ty.as_str()));

        RenderContext::with_dumper(self.resolver.clone(), self.clone())
            .execute(rule.template(), Some(variables))
            .map(Some)
    }

    fn write_rules(&self) -> RwLockWriteGuard<'_, Vec<DumperRule>> {
        self.rules.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn first_match<'a>(rules: &'a [DumperRule], value: &Value, ty: ValueType) -> Option<&'a DumperRule> {
    rules
        .iter()
        .filter(|rule| !rule.is_fallback())
        .find(|rule| rule.matches(value, ty))
        .or_else(|| rules.iter().find(|rule| rule.is_fallback()))
}

/// The rules installed by [`DumperRegistry::with_defaults`].
pub fn default_rules() -> Vec<DumperRule> {
    vec![
        DumperRule::builtin("generic", GENERIC_TEMPLATE, Matcher::All),
        DumperRule::builtin("array", ARRAY_TEMPLATE, Matcher::Equals(ValueType::Array)),
        DumperRule::builtin("map", MAP_TEMPLATE, Matcher::Equals(ValueType::Map)),
        DumperRule::builtin("handler", HANDLER_TEMPLATE, Matcher::predicate(is_handler)),
        DumperRule::builtin("object", OBJECT_TEMPLATE, Matcher::Equals(ValueType::Object)),
    ]
}
