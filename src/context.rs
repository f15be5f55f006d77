use crate::config::{self, Config, ConfigLoader};
use crate::error::Result;
use crate::ogr::OgrOptions;
use crate::themes::ThemeCatalog;
use std::path::Path;

/// Application context that combines configuration, environment variables, and CLI arguments
pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    /// Load the config file (explicit path, `KCGIS_CONFIG`, or the default
    /// location), apply environment overrides and validate the result.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from(path)?,
            None => ConfigLoader::load()?,
        };
        Self::from_config(config, |key| std::env::var(key).ok())
    }

    /// Build a context from an already loaded config.
    ///
    /// Priority: ENV > config > default
    pub fn from_config<F>(mut config: Config, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env("KCGIS_BASE_URL") {
            config.fetch.base_url = url;
        }
        if let Some(path) = env("KCGIS_OGR2OGR") {
            config.ogr.ogr2ogr = path;
        }
        if let Some(path) = env("KCGIS_OGRINFO") {
            config.ogr.ogrinfo = path;
        }

        config::validate(&config).into_result()?;
        Ok(Self { config })
    }

    /// Apply a `--base-url` flag on top of file and environment settings.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Result<Self> {
        if let Some(url) = base_url {
            self.config.fetch.base_url = url;
            config::validate(&self.config).into_result()?;
        }
        Ok(self)
    }

    pub fn catalog(&self) -> ThemeCatalog {
        ThemeCatalog::new(self.config.fetch.themes.iter().cloned())
    }

    pub fn ogr_options(&self) -> OgrOptions {
        OgrOptions::from_config(&self.config)
    }
}
