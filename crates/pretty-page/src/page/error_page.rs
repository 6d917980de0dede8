//! Full-page rendering of a captured error.

use std::fmt;
use std::path::PathBuf;

use minijinja::Value;
use tracing::debug;

use super::assets::{AssetCompiler, ShallowAssetCompiler};
use super::attributes::{
    PageAttributes, PAGE_TITLE, TEMPLATE_JAVASCRIPTS, TEMPLATE_RESOURCE, TEMPLATE_STYLESHEETS,
};
use crate::dumper::DumperRegistry;
use crate::error::{RenderError, Result};
use crate::template::{RenderContext, TemplateResolver, Variables};

/// Resources shipped with the crate: the layout, the dumper views and the
/// base stylesheet.
pub const BUILTIN_RESOURCES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources");

/// Prefix marking a stylesheet or script entry as a URL rather than a resource.
pub const URL_PREFIX: char = '@';

/// An error that has already been captured, ready for display.
#[derive(Debug, Clone, Default)]
pub struct ErrorReport {
    pub name: String,
    pub message: String,
    /// Named values shown below the message, in insertion order.
    pub variables: Vec<(String, Value)>,
}

impl ErrorReport {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            variables: Vec::new(),
        }
    }

    /// Appends a named value to the report.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.push((name.into(), value.into()));
        self
    }
}

/// Renders [`ErrorReport`]s through a layout template.
///
/// The layout receives:
///
/// | Variable | Content |
/// |----------|---------|
/// | `title` | the `page.title` attribute |
/// | `stylesheet` | compiled CSS of every stylesheet resource (safe string) |
/// | `javascript` | compiled JS of every script resource (safe string) |
/// | `links` | stylesheet URLs, from `@`-prefixed entries |
/// | `scripts` | script URLs, from `@`-prefixed entries |
/// | `name`, `message` | from the report |
/// | `variables` | the report's `(name, value)` pairs |
///
/// plus `tpl`, with `tpl.dump(...)` bound to the page's dumper registry.
pub struct ErrorPage {
    resolver: TemplateResolver,
    dumper: DumperRegistry,
    attributes: PageAttributes,
    compiler: Box<dyn AssetCompiler>,
}

impl fmt::Debug for ErrorPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorPage")
            .field("resolver", &self.resolver)
            .field("dumper", &self.dumper)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl ErrorPage {
    /// Creates a page over an existing resolver and dumper, with default
    /// attributes and the [`ShallowAssetCompiler`].
    pub fn new(resolver: TemplateResolver, dumper: DumperRegistry) -> Self {
        Self {
            resolver,
            dumper,
            attributes: PageAttributes::default(),
            compiler: Box::new(ShallowAssetCompiler),
        }
    }

    /// Creates a page over [`BUILTIN_RESOURCES`] with the default dumper rules.
    ///
    /// Further search paths added to [`resolver`](Self::resolver) take
    /// precedence over the built-in files.
    pub fn with_defaults() -> Self {
        let resolver = TemplateResolver::with_search_paths([BUILTIN_RESOURCES]);
        let dumper = DumperRegistry::with_defaults(resolver.clone());
        Self::new(resolver, dumper)
    }

    /// Replaces the asset compiler.
    pub fn with_compiler(mut self, compiler: impl AssetCompiler + 'static) -> Self {
        self.compiler = Box::new(compiler);
        self
    }

    /// Replaces the attributes.
    pub fn with_attributes(mut self, attributes: PageAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    pub fn dumper(&self) -> &DumperRegistry {
        &self.dumper
    }

    pub fn attributes(&self) -> &PageAttributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut PageAttributes {
        &mut self.attributes
    }

    /// Renders the full page for `report`.
    ///
    /// # Errors
    ///
    /// - [`RenderError::InvalidArgument`] if `template.resource` is not a string
    /// - [`RenderError::NotFound`] if the layout or an asset resource is missing
    /// - [`RenderError::Template`] if the layout fails to render
    pub fn render(&self, report: &ErrorReport) -> Result<String> {
        let layout = self.attributes.get_str(TEMPLATE_RESOURCE).ok_or_else(|| {
            RenderError::InvalidArgument(format!("attribute '{}' must be a string", TEMPLATE_RESOURCE))
        })?;

        let (links, css_files) = self.split_assets(TEMPLATE_STYLESHEETS)?;
        let (scripts, js_files) = self.split_assets(TEMPLATE_JAVASCRIPTS)?;

        debug!(
            layout,
            name = %report.name,
            stylesheets = css_files.len(),
            javascripts = js_files.len(),
            "rendering error page"
        );

        let title = self
            .attributes
            .get_str(PAGE_TITLE)
            .unwrap_or_default()
            .to_string();

        let variables: Vec<Value> = report
            .variables
            .iter()
            .map(|(name, value)| Value::from(vec![Value::from(name.as_str()), value.clone()]))
            .collect();

        let mut vars = Variables::new();
        vars.insert("title".into(), Value::from(title));
        vars.insert(
            "stylesheet".into(),
            Value::from_safe_string(self.compiler.compile_css(&css_files)?),
        );
        vars.insert(
            "javascript".into(),
            Value::from_safe_string(self.compiler.compile_js(&js_files)?),
        );
        vars.insert("links".into(), Value::from(links));
        vars.insert("scripts".into(), Value::from(scripts));
        vars.insert("name".into(), Value::from(report.name.as_str()));
        vars.insert("message".into(), Value::from(report.message.as_str()));
        vars.insert("variables".into(), Value::from(variables));

        RenderContext::with_dumper(self.resolver.clone(), self.dumper.clone())
            .execute(layout, Some(vars))
    }

    /// Splits an asset list into URLs and resolved resource paths.
    fn split_assets(&self, attribute: &str) -> Result<(Vec<String>, Vec<PathBuf>)> {
        let mut urls = Vec::new();
        let mut files = Vec::new();
        for entry in self.attributes.get_strings(attribute) {
            match entry.strip_prefix(URL_PREFIX) {
                Some(url) => urls.push(url.to_string()),
                None => files.push(self.resolver.resolve(&entry)?),
            }
        }
        Ok((urls, files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dumper::{DumperRule, Matcher};
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_file(dir: &Path, relative_path: &str, content: &str) {
        let full_path = dir.join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }

    fn page_over(root: &TempDir) -> ErrorPage {
        let resolver = TemplateResolver::with_search_paths([root.path()]);
        let dumper = DumperRegistry::new(resolver.clone());
        ErrorPage::new(resolver, dumper)
    }

    #[test]
    fn test_layout_receives_page_variables() {
        let root = TempDir::new().unwrap();
        create_file(
            root.path(),
            "views/layout.html.jinja",
            "{{ title }}|{{ name }}|{{ message }}|{% for k, v in variables %}{{ k }}={{ v }};{% endfor %}",
        );
        create_file(root.path(), "css/base.css", "");

        let out = page_over(&root)
            .render(
                &ErrorReport::new("LogicError", "a < b")
                    .with_variable("x", 1)
                    .with_variable("y", "two"),
            )
            .unwrap();

        assert_eq!(
            out,
            "Whoops! There was an error!|LogicError|a &lt; b|x=1;y=two;"
        );
    }

    #[test]
    fn test_assets_are_compiled_and_urls_split() {
        let root = TempDir::new().unwrap();
        // Plain-text layout so the URLs are not HTML-escaped.
        create_file(
            root.path(),
            "views/layout.txt",
            "<style>{{ stylesheet }}</style>{% for l in links %}[{{ l }}]{% endfor %}<script>{{ javascript }}</script>{% for s in scripts %}[{{ s }}]{% endfor %}",
        );
        create_file(root.path(), "css/base.css", "p { color : red }");
        create_file(root.path(), "js/app.js", "go( 1 );");

        let mut page = page_over(&root);
        page.attributes_mut()
            .set(TEMPLATE_RESOURCE, "views/layout.txt")
            .unwrap();
        page.attributes_mut()
            .merge(TEMPLATE_STYLESHEETS, vec![json!("@https://cdn.example.com/r.css")])
            .unwrap();
        page.attributes_mut()
            .merge(
                TEMPLATE_JAVASCRIPTS,
                vec![json!("js/app.js"), json!("@https://cdn.example.com/a.js")],
            )
            .unwrap();

        let out = page.render(&ErrorReport::new("E", "m")).unwrap();
        assert_eq!(
            out,
            "<style>p{color:red}</style>[https://cdn.example.com/r.css]<script>go( 1 );</script>[https://cdn.example.com/a.js]"
        );
    }

    #[test]
    fn test_missing_stylesheet_is_not_found() {
        let root = TempDir::new().unwrap();
        create_file(root.path(), "views/layout.html.jinja", "ok");

        let err = page_over(&root).render(&ErrorReport::new("E", "m")).unwrap_err();
        match err {
            RenderError::NotFound { name, .. } => assert_eq!(name, "css/base.css"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_layout_attribute_must_be_string() {
        let root = TempDir::new().unwrap();
        let mut page = page_over(&root);
        page.attributes_mut().set(TEMPLATE_RESOURCE, 5).unwrap();

        assert!(matches!(
            page.render(&ErrorReport::new("E", "m")),
            Err(RenderError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_custom_title_and_layout() {
        let root = TempDir::new().unwrap();
        create_file(root.path(), "other.html.jinja", "<h1>{{ title }}</h1>");

        let attributes = PageAttributes::from_yaml(
            "template.resource: other.html.jinja\ntemplate.stylesheets: []\npage.title: Broken\n",
        )
        .unwrap();
        let page = page_over(&root).with_attributes(attributes);

        assert_eq!(page.render(&ErrorReport::default()).unwrap(), "<h1>Broken</h1>");
    }

    #[test]
    fn test_layout_can_dump_through_registry() {
        let root = TempDir::new().unwrap();
        create_file(
            root.path(),
            "views/layout.html.jinja",
            "{% for k, v in variables %}{{ tpl.dump(v) }}{% endfor %}",
        );
        create_file(root.path(), "css/base.css", "");
        create_file(root.path(), "d/any.txt", "<{{ type }}>");

        let page = page_over(&root);
        page.dumper()
            .add_rule(DumperRule::new("any", "d/any.txt", Matcher::All).unwrap());

        let out = page
            .render(&ErrorReport::new("E", "m").with_variable("v", vec![1, 2]))
            .unwrap();
        assert_eq!(out, "<array>");
    }
}
