//! Invocation layer for the external GDAL/OGR tools.
//!
//! `ogr2ogr` is the only write path to GeoPackage and PostGIS storage, and
//! `ogrinfo` is used to enumerate the layers of a geodatabase. Both are run
//! as subprocesses, one at a time.

pub mod layers;
pub mod options;
pub mod runner;

pub use layers::{parse_ogrinfo_output, LayerInfo, LayerLister, OgrInfo};
pub use options::OgrOptions;
pub use runner::{locate_tool, DryRunRunner, ProcessRunner, ToolInvocation, ToolRunner};

#[cfg(test)]
pub(crate) mod testing;
