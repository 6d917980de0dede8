//! Layered resource lookup with memoized results.
//!
//! A [`ResourceStore`] maps a logical resource name (`"views/layout.html.jinja"`,
//! `"css/base.css"`) to an absolute path by scanning an ordered list of search
//! roots.
//!
//! # Resolution Order
//!
//! Roots are scanned from the **last added** to the first. A root registered
//! later overrides every root registered before it, so an application can add
//! its own directory after the built-in one and replace individual templates:
//!
//! ```rust,ignore
//! let mut store = ResourceStore::new();
//! store.add_root("/usr/share/pretty-page/resources"); // built-in defaults
//! store.add_root("./my-templates");                    // wins on conflict
//! ```
//!
//! # Caching
//!
//! The first successful resolution of a name is cached for the lifetime of
//! the store. Later lookups return the cached path without touching the
//! filesystem, even if roots are added or replaced afterwards. The cache is
//! never invalidated: the store backs a one-shot diagnostic render, where a
//! rescan on every lookup buys nothing.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{RenderError, Result};

/// Ordered search roots plus the cache of resolved names.
#[derive(Debug, Default, Clone)]
pub struct ResourceStore {
    roots: Vec<PathBuf>,
    cache: HashMap<String, PathBuf>,
}

impl ResourceStore {
    /// Creates a store with no search roots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given roots, lowest priority first.
    pub fn with_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            cache: HashMap::new(),
        }
    }

    /// Appends a search root. It takes priority over every existing root.
    pub fn add_root(&mut self, root: impl Into<PathBuf>) {
        self.roots.push(root.into());
    }

    /// Replaces the whole root list. The cache is left untouched.
    pub fn set_roots<I, P>(&mut self, roots: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.roots = roots.into_iter().map(Into::into).collect();
    }

    /// Returns the registered roots in registration order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Returns the cached path for `name`, if it was resolved before.
    pub fn cached(&self, name: &str) -> Option<&Path> {
        self.cache.get(name).map(PathBuf::as_path)
    }

    /// Number of cached resolutions.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Resolves `name` to the path of a readable file.
    ///
    /// # Errors
    ///
    /// - [`RenderError::Misconfigured`] if no roots are registered and the
    ///   name is not cached.
    /// - [`RenderError::NotFound`] if no root contains a readable file.
    pub fn resolve(&mut self, name: &str) -> Result<PathBuf> {
        if let Some(path) = self.cache.get(name) {
            tracing::trace!(name, path = %path.display(), "resource cache hit");
            return Ok(path.clone());
        }

        let path = self.scan(name)?;
        tracing::debug!(name, path = %path.display(), "resolved resource");
        self.cache.insert(name.to_string(), path.clone());
        Ok(path)
    }

    /// Reports whether `name` resolves, without failing.
    ///
    /// A successful probe caches the result just like [`resolve`](Self::resolve).
    pub fn has(&mut self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    fn scan(&self, name: &str) -> Result<PathBuf> {
        if self.roots.is_empty() {
            return Err(RenderError::Misconfigured {
                name: name.to_string(),
            });
        }

        let relative = name.trim_start_matches('/');
        self.roots
            .iter()
            .rev()
            .map(|root| root.join(relative))
            .find(|candidate| is_readable_file(candidate))
            .ok_or_else(|| RenderError::NotFound {
                name: name.to_string(),
                roots: self.roots.clone(),
            })
    }
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}
