//! The complete error page: attributes, asset bundling and layout rendering.
//!
//! ```rust,ignore
//! let page = ErrorPage::with_defaults();
//! let html = page.render(
//!     &ErrorReport::new("ParseError", "unexpected token at line 3")
//!         .with_variable("input", "let x = ;"),
//! )?;
//! ```

pub mod assets;
pub mod attributes;
mod error_page;

pub use assets::{minify_css, AssetCompiler, ShallowAssetCompiler};
pub use attributes::PageAttributes;
pub use error_page::{ErrorPage, ErrorReport, BUILTIN_RESOURCES, URL_PREFIX};
