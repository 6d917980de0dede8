//! Stylesheet and script bundling.

use std::fs;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{RenderError, Result};

/// Whitespace around CSS punctuation, dropped by [`ShallowAssetCompiler::compile_css`].
static CSS_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*([;{}:,])\s*").expect("CSS punctuation pattern is valid")
});

/// Turns resolved asset files into the inline text embedded in the page.
///
/// Paths are expected to come from a resolver, so they exist and are readable;
/// a read failure is still reported as [`RenderError::Io`].
pub trait AssetCompiler: Send + Sync {
    /// Reads every file and joins the contents with `\n`, in order.
    fn compile_contents(&self, files: &[PathBuf]) -> Result<String> {
        let contents = files
            .iter()
            .map(|path| fs::read_to_string(path).map_err(|e| RenderError::io(path, e)))
            .collect::<Result<Vec<_>>>()?;
        Ok(contents.join("\n"))
    }

    fn compile_css(&self, files: &[PathBuf]) -> Result<String>;

    fn compile_js(&self, files: &[PathBuf]) -> Result<String>;
}

/// Concatenates assets, with a whitespace-only pass over CSS.
///
/// Scripts are concatenated untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShallowAssetCompiler;

impl ShallowAssetCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl AssetCompiler for ShallowAssetCompiler {
    fn compile_css(&self, files: &[PathBuf]) -> Result<String> {
        let compiled = self.compile_contents(files)?;
        Ok(minify_css(&compiled))
    }

    fn compile_js(&self, files: &[PathBuf]) -> Result<String> {
        self.compile_contents(files)
    }
}

/// Removes whitespace before and after `;`, `{`, `}`, `:` and `,`.
pub fn minify_css(css: &str) -> String {
    CSS_PUNCTUATION.replace_all(css, "$1").into_owned()
}
