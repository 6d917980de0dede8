//! Named template resolution and isolated execution.
//!
//! [`TemplateResolver`] turns a logical template name into rendered output:
//!
//! 1. The name is resolved to a file through the owned
//!    [`ResourceStore`](crate::resource::ResourceStore) (last-added root wins,
//!    first result cached).
//! 2. The file is read and rendered by MiniJinja with a context built from
//!    the caller's [`Variables`] plus a `tpl` binding (see
//!    [`RenderContext`](super::RenderContext)).
//!
//! Output is always buffered: [`execute`](TemplateResolver::execute) returns
//! the rendered `String`, and nested calls (`tpl.template(...)`,
//! `tpl.dump(...)`) return their output as a value that the calling template
//! inlines.
//!
//! # Scope Isolation
//!
//! Every execution gets its own context map. Nothing a template binds with
//! `{% set %}` is visible to the caller, to sibling executions, or to later
//! calls.
//!
//! # Sharing
//!
//! A `TemplateResolver` is a cheap handle. Clones share the same search
//! roots and cache, which is how the dumper registry and the rendering
//! context refer back to the resolver without owning a copy of it.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use super::context::RenderContext;
use super::filters::register_filters;
use crate::error::Result;
use crate::resource::ResourceStore;

/// Variables bound into a single template execution.
pub type Variables = BTreeMap<String, Value>;

/// Recognized template extensions, stripped before choosing the escape mode.
pub const TEMPLATE_EXTENSIONS: &[&str] = &[".jinja", ".jinja2", ".j2"];

#[derive(Debug)]
struct Inner {
    store: RwLock<ResourceStore>,
    env: Environment<'static>,
}

/// Resolves named templates across layered search roots and executes them.
///
/// # Example
///
/// ```rust,ignore
/// use pretty_page::{TemplateResolver, Variables};
/// use minijinja::Value;
///
/// let resolver = TemplateResolver::new();
/// resolver.add_search_path("./resources");
///
/// let mut vars = Variables::new();
/// vars.insert("message".into(), Value::from("disk full"));
/// let html = resolver.execute("views/alert.html.jinja", Some(vars))?;
/// ```
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    inner: Arc<Inner>,
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateResolver {
    /// Creates a resolver with no search paths.
    pub fn new() -> Self {
        Self::with_store(ResourceStore::new())
    }

    /// Creates a resolver over an existing store.
    pub fn with_store(store: ResourceStore) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(auto_escape_for);
        register_filters(&mut env);

        Self {
            inner: Arc::new(Inner {
                store: RwLock::new(store),
                env,
            }),
        }
    }

    /// Creates a resolver with the given search paths, lowest priority first.
    pub fn with_search_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_store(ResourceStore::with_roots(paths))
    }

    /// Adds a search path that takes priority over all existing ones.
    pub fn add_search_path(&self, path: impl Into<PathBuf>) {
        self.store_mut().add_root(path);
    }

    /// Replaces all search paths. Already-resolved names stay cached.
    pub fn set_search_paths<I, P>(&self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.store_mut().set_roots(paths);
    }

    /// Returns the search paths in registration order.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        self.store().roots().to_vec()
    }

    /// Resolves a resource name to its absolute location.
    ///
    /// # Errors
    ///
    /// See [`ResourceStore::resolve`].
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if let Some(path) = self.store().cached(name) {
            return Ok(path.to_path_buf());
        }
        self.store_mut().resolve(name)
    }

    /// Reports whether a resource exists in any search path.
    pub fn has(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Executes the named template with the given variables.
    ///
    /// The template sees the variables plus `tpl`, a
    /// [`RenderContext`] without a dumper registry attached; a caller-supplied
    /// `tpl` variable is shadowed.
    ///
    /// # Errors
    ///
    /// - Resolution errors ([`NotFound`](crate::RenderError::NotFound),
    ///   [`Misconfigured`](crate::RenderError::Misconfigured)) unchanged.
    /// - [`Template`](crate::RenderError::Template) for failures inside the
    ///   template body, such as referencing an unbound variable.
    pub fn execute(&self, name: &str, variables: Option<Variables>) -> Result<String> {
        RenderContext::new(self.clone()).execute(name, variables)
    }

    pub(crate) fn environment(&self) -> &Environment<'static> {
        &self.inner.env
    }

    fn store(&self) -> RwLockReadGuard<'_, ResourceStore> {
        self.inner.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn store_mut(&self) -> RwLockWriteGuard<'_, ResourceStore> {
        self.inner.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// HTML auto-escaping for `*.html`/`*.htm` templates, none otherwise.
fn auto_escape_for(name: &str) -> AutoEscape {
    let base = TEMPLATE_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(name);
    if base.ends_with(".html") || base.ends_with(".htm") {
        AutoEscape::Html
    } else {
        AutoEscape::None
    }
}
