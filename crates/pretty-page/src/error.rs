//! Error types for resource resolution and rendering.
//!
//! [`RenderError`] is the single error type returned by every public operation.
//! It keeps resolution failures ([`RenderError::NotFound`],
//! [`RenderError::Misconfigured`]) apart from failures inside a template body
//! ([`RenderError::Template`]), so callers can tell a broken setup from a
//! broken template.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for all page rendering operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// No search root contains the requested resource.
    #[error("resource could not be located: '{name}' in the following paths:\n{}", display_roots(.roots))]
    NotFound {
        /// The logical resource name that was requested
        name: String,
        /// Every root that was scanned, in registration order
        roots: Vec<PathBuf>,
    },

    /// Resolution was attempted before any search root was registered.
    #[error("no resource paths available, cannot locate resource '{name}'")]
    Misconfigured {
        /// The logical resource name that was requested
        name: String,
    },

    /// Malformed input to a registration or attribute call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A template failed while executing (syntax error, undefined variable, ...).
    #[error("template error: {0}")]
    Template(String),

    /// A resolved resource could not be read.
    #[error("failed to read '{}': {message}", .path.display())]
    Io {
        /// The resolved path that failed to read
        path: PathBuf,
        /// The underlying I/O error message
        message: String,
    },
}

/// Result type for page rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

fn display_roots(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl RenderError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Wraps this error for transport through a MiniJinja callback.
    ///
    /// The original error travels as the source, so [`From<minijinja::Error>`]
    /// can restore it once the outermost render returns.
    pub(crate) fn into_minijinja(self) -> minijinja::Error {
        use minijinja::ErrorKind;

        let kind = match self {
            RenderError::NotFound { .. } => ErrorKind::TemplateNotFound,
            _ => ErrorKind::InvalidOperation,
        };
        minijinja::Error::new(kind, self.to_string()).with_source(self)
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        // Nested template calls wrap our own error; walk the source chain so a
        // NotFound raised three templates deep is still a NotFound here.
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            if let Some(render_err) = inner.downcast_ref::<RenderError>() {
                return render_err.clone();
            }
            source = inner.source();
        }
        RenderError::Template(err.to_string())
    }
}
