// Application state module
// Holds everything a request needs: config, page store and the loaded templates

use std::path::Path;

use super::types::Config;
use crate::page::PageStore;
use crate::render::{PageRenderer, RenderError};

/// Application state
///
/// Built once before the listener starts and shared read-only through `Arc`.
pub struct AppState {
    pub config: Config,
    pub store: PageStore,
    pub renderer: PageRenderer,
}

impl AppState {
    /// Build state from config, loading both templates from `pages.template_dir`
    pub fn new(config: &Config) -> Result<Self, RenderError> {
        let renderer = PageRenderer::load(Path::new(&config.pages.template_dir))?;
        Ok(Self::with_renderer(config, renderer))
    }

    /// Build state around an already constructed renderer
    pub fn with_renderer(config: &Config, renderer: PageRenderer) -> Self {
        Self {
            config: config.clone(),
            store: PageStore::new(&config.pages.data_dir),
            renderer,
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::View;

    #[test]
    fn test_access_log_flag_follows_config() {
        let mut cfg = Config::load_from("does-not-exist/config").unwrap();
        let renderer = || PageRenderer::from_sources([(View::View, ""), (View::Edit, "")]).unwrap();

        cfg.logging.access_log = false;
        assert!(!AppState::with_renderer(&cfg, renderer()).access_log_enabled());

        cfg.logging.access_log = true;
        assert!(AppState::with_renderer(&cfg, renderer()).access_log_enabled());
    }
}
