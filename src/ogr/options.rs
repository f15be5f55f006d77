//! Fixed ogr2ogr option sets.
//!
//! Every conversion carries the global set (progress, assigned spatial
//! reference, overwrite, geometry type normalization) plus the option set of
//! its output driver. Merges use append semantics instead of overwrite.

use crate::config::Config;

pub const GPKG_DRIVER: &str = "GPKG";
pub const POSTGRES_DRIVER: &str = "PostgreSQL";

/// Option values resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OgrOptions {
    pub srs: String,
    pub geometry_type: String,
    pub gpkg_version: String,
    pub transaction_size: u32,
    pub spatial_index: Option<String>,
}

impl OgrOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            srs: config.ogr.srs.clone(),
            geometry_type: config.ogr.geometry_type.clone(),
            gpkg_version: config.gpkg.version.clone(),
            transaction_size: config.gpkg.transaction_size,
            spatial_index: config.postgres.spatial_index.clone(),
        }
    }

    /// Options applied to every conversion.
    pub fn global_args(&self) -> Vec<String> {
        vec![
            "-progress".into(),
            "-a_srs".into(),
            self.srs.clone(),
            "-overwrite".into(),
            "-nlt".into(),
            self.geometry_type.clone(),
        ]
    }

    /// GeoPackage driver and tuning options.
    pub fn gpkg_args(&self) -> Vec<String> {
        vec![
            "-f".into(),
            GPKG_DRIVER.into(),
            "-dsco".into(),
            format!("VERSION={}", self.gpkg_version),
            "-lco".into(),
            "OVERWRITE=YES".into(),
            "-gt".into(),
            self.transaction_size.to_string(),
        ]
    }

    /// PostgreSQL driver options; the spatial index option is only emitted
    /// when configured.
    pub fn postgres_args(&self) -> Vec<String> {
        let mut args = vec!["-f".into(), POSTGRES_DRIVER.into()];
        if let Some(index) = &self.spatial_index {
            args.push("-lco".into());
            args.push(format!("SPATIAL_INDEX={}", index));
        }
        args
    }

    /// Options for appending one GeoPackage into another.
    pub fn merge_args(&self) -> Vec<String> {
        vec![
            "-progress".into(),
            "-f".into(),
            GPKG_DRIVER.into(),
            "-a_srs".into(),
            self.srs.clone(),
            "-append".into(),
            "-dsco".into(),
            format!("VERSION={}", self.gpkg_version),
            "-lco".into(),
            "OVERWRITE=YES".into(),
            "-gt".into(),
            self.transaction_size.to_string(),
        ]
    }
}

impl Default for OgrOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
