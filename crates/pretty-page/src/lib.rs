//! # Pretty Page - Diagnostic HTML Pages for Captured Errors
//!
//! `pretty-page` turns an already-captured error (a name, a message and a set
//! of named values) into a self-contained HTML page. It is built from three
//! layers that can also be used on their own:
//!
//! - **Resources**: named files looked up through an ordered list of search
//!   roots, where later roots override earlier ones. See [`ResourceStore`].
//! - **Templates**: MiniJinja files executed with caller variables plus a
//!   `tpl` helper object (escaping, slugs, defaults, nested templates, value
//!   dumps). See [`TemplateResolver`] and [`RenderContext`].
//! - **Dumpers**: an ordered rule list mapping runtime values to the template
//!   that renders them. See [`DumperRegistry`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pretty_page::{ErrorPage, ErrorReport};
//!
//! let page = ErrorPage::with_defaults();
//! let html = page
//!     .render(
//!         &ErrorReport::new("ConfigError", "missing key 'port' in app.yaml")
//!             .with_variable("keys", vec!["host", "timeout"]),
//!     )
//!     .unwrap();
//! assert!(html.contains("ConfigError"));
//! ```
//!
//! ## Overriding Templates
//!
//! Search paths added later win, so an application can replace any shipped
//! view by providing a file with the same relative name:
//!
//! ```rust,no_run
//! use pretty_page::ErrorPage;
//!
//! let page = ErrorPage::with_defaults();
//! page.resolver().add_search_path("./templates"); // ./templates/views/layout.html.jinja wins
//! ```
//!
//! ## Dumping Values
//!
//! ```rust,no_run
//! use pretty_page::{DumperRegistry, DumperRule, Matcher, TemplateResolver, Value};
//!
//! let resolver = TemplateResolver::with_search_paths(["./templates"]);
//! let dumper = DumperRegistry::with_defaults(resolver);
//! dumper.add_rule(
//!     DumperRule::new("numbers", "views/dumper/number.html.jinja", Matcher::pattern("^(integer|float)$").unwrap())
//!         .unwrap(),
//! );
//! let html = dumper.dump(&[Value::from(42)]).unwrap();
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (resolution, rule registration, skipped
//! values) and never installs a subscriber.

pub mod dumper;
mod error;
pub mod page;
mod resource;
pub mod template;

// Error type
pub use error::{RenderError, Result};

// Resource lookup
pub use resource::ResourceStore;

// Template exports
pub use template::{RenderContext, TemplateResolver, Variables, CONTEXT_VARIABLE, TEMPLATE_EXTENSIONS};

// Dumper exports
pub use dumper::{
    default_rules, handler_value, is_handler, DiagnosticHandler, DumperRegistry, DumperRule,
    HandlerObject, Matcher, ValuePredicate, ValueType,
};

// Page exports
pub use page::{
    AssetCompiler, ErrorPage, ErrorReport, PageAttributes, ShallowAssetCompiler, BUILTIN_RESOURCES,
};

// Re-exported so callers can build values without a direct dependency.
pub use minijinja::Value;
