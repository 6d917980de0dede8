//! Template resolution and execution.
//!
//! Templates are MiniJinja files located through layered search roots:
//!
//! ```rust,ignore
//! let resolver = TemplateResolver::new();
//! resolver.add_search_path(builtin_resources);
//! resolver.add_search_path("./my-overrides"); // checked first
//!
//! let html = resolver.execute("views/layout.html.jinja", Some(vars))?;
//! ```
//!
//! Every template receives its variables plus `tpl`, the [`RenderContext`]
//! offering escaping, slugs, defaults, nested templates and value dumps.
//!
//! ## Key Types
//!
//! - [`TemplateResolver`]: resolves names, executes templates
//! - [`RenderContext`]: the `tpl` object seen by templates
//! - [`helpers`]: the text helpers behind `tpl`, usable directly

mod context;
pub mod filters;
pub mod helpers;
mod resolver;

pub use context::{RenderContext, CONTEXT_VARIABLE};
pub use resolver::{TemplateResolver, Variables, TEMPLATE_EXTENSIONS};
