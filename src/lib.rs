//! kcgis: tools for fetching King County file geodatabases and converting
//! them to GeoPackage or PostGIS with GDAL's ogr2ogr.

pub mod cli;
pub mod config;
pub mod connection;
pub mod context;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod ogr;
pub mod report;
pub mod themes;
pub mod utils;

// Re-export commonly used types
pub use error::{GisError, Result};
pub use themes::{Theme, ThemeCatalog, ThemeSelection};
