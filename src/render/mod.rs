//! Page rendering
//!
//! Two named templates, `edit.html` and `view.html`, loaded once at startup and
//! rendered into a buffer so a failed render never leaks partial output.

use minijinja::{context, Environment, UndefinedBehavior};
use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use crate::page::Page;

/// Logical views a page can be rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    View,
    Edit,
}

impl View {
    pub const ALL: [Self; 2] = [Self::Edit, Self::View];

    pub const fn name(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }

    pub const fn template_name(self) -> &'static str {
        match self {
            Self::View => "view.html",
            Self::Edit => "edit.html",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("load template {}: {source}", path.display())]
    Load { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Template(#[from] minijinja::Error),
}

/// Immutable template set shared by all requests
#[derive(Debug)]
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    /// Load `edit.html` and `view.html` from `dir`. Missing or malformed templates fail.
    pub fn load(dir: &Path) -> Result<Self, RenderError> {
        let mut sources = Vec::with_capacity(View::ALL.len());
        for view in View::ALL {
            let path = dir.join(view.template_name());
            let source =
                std::fs::read_to_string(&path).map_err(|source| RenderError::Load { path, source })?;
            sources.push((view, source));
        }
        Self::from_sources(sources)
    }

    /// Build a renderer from in-memory template sources
    pub fn from_sources<S>(sources: impl IntoIterator<Item = (View, S)>) -> Result<Self, RenderError>
    where
        S: Into<Cow<'static, str>>,
    {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        for (view, source) in sources {
            env.add_template_owned(view.template_name(), source)?;
        }
        Ok(Self { env })
    }

    /// Render `page` with the template for `view`
    pub fn render(&self, view: View, page: &Page) -> Result<String, RenderError> {
        let template = self.env.get_template(view.template_name())?;
        let body = String::from_utf8_lossy(&page.body);
        let html = template.render(context! {
            title => page.title.as_str(),
            body => body.as_ref(),
        })?;
        Ok(html)
    }
}
