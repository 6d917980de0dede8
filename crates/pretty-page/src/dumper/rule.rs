//! Dumper rules: a match condition paired with the template that renders matches.

use std::fmt;
use std::sync::Arc;

use minijinja::value::Value;
use regex::Regex;

use super::value_type::ValueType;
use crate::error::{RenderError, Result};

/// Predicate over a runtime value, used by [`Matcher::Predicate`].
pub type ValuePredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// How a rule decides whether it applies to a value.
///
/// The set of match kinds is closed; evaluation is an exhaustive match, so an
/// unrecognized kind cannot occur at dump time.
#[derive(Clone)]
pub enum Matcher {
    /// Matches every value.
    All,
    /// Matches values whose coarse type equals the given one.
    Equals(ValueType),
    /// Matches values whose coarse type tag matches the pattern.
    Pattern(Regex),
    /// Matches values for which the predicate returns `true`.
    Predicate(ValuePredicate),
}

impl Matcher {
    /// Builds an `Equals` matcher from a type tag such as `"array"`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidArgument`] for an unknown tag.
    pub fn equals_tag(tag: &str) -> Result<Self> {
        Ok(Matcher::Equals(tag.parse()?))
    }

    /// Builds a `Pattern` matcher, compiling `pattern` as a regex.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidArgument`] if the pattern does not compile.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Matcher::Pattern)
            .map_err(|e| RenderError::InvalidArgument(format!("invalid pattern '{}': {}", pattern, e)))
    }

    /// Builds a `Predicate` matcher from a closure.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Matcher::Predicate(Arc::new(f))
    }

    /// Evaluates the matcher. `ty` is the precomputed coarse type of `value`.
    pub fn matches(&self, value: &Value, ty: ValueType) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Equals(expected) => *expected == ty,
            Matcher::Pattern(re) => re.is_match(ty.as_str()),
            Matcher::Predicate(f) => f(value),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::All => f.write_str("All"),
            Matcher::Equals(ty) => write!(f, "Equals({})", ty),
            Matcher::Pattern(re) => write!(f, "Pattern({:?})", re.as_str()),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A named `(matcher, template)` pair.
///
/// The name is a diagnostic label only; uniqueness is not enforced.
#[derive(Debug, Clone)]
pub struct DumperRule {
    name: String,
    template: String,
    matcher: Matcher,
}

impl DumperRule {
    /// Creates a rule.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidArgument`] if `name` or `template` is empty.
    pub fn new(name: impl Into<String>, template: impl Into<String>, matcher: Matcher) -> Result<Self> {
        let name = name.into();
        let template = template.into();
        if name.trim().is_empty() {
            return Err(RenderError::InvalidArgument(
                "dumper name must not be empty".into(),
            ));
        }
        if template.trim().is_empty() {
            return Err(RenderError::InvalidArgument(format!(
                "dumper '{}' has an empty template name",
                name
            )));
        }
        Ok(Self {
            name,
            template,
            matcher,
        })
    }

    /// Rules shipped with the crate; names and templates are known non-empty.
    pub(crate) fn builtin(name: &'static str, template: &'static str, matcher: Matcher) -> Self {
        Self {
            name: name.to_string(),
            template: template.to_string(),
            matcher,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// `true` for catch-all rules, which only apply when no other rule matched.
    pub fn is_fallback(&self) -> bool {
        matches!(self.matcher, Matcher::All)
    }

    /// Shorthand for `self.matcher().matches(value, ty)`.
    pub fn matches(&self, value: &Value, ty: ValueType) -> bool {
        self.matcher.matches(value, ty)
    }
}
