//! Configuration schema for kcgis.
//!
//! Every section is optional; missing keys fall back to the built-in defaults.
//!
//! ```toml
//! [fetch]
//! base_url = "https://ftp.kingcounty.gov/gis-web/GISData"
//! retry_count = 2
//!
//! [ogr]
//! srs = "EPSG:2926"
//!
//! [gpkg]
//! transaction_size = 100000
//!
//! [postgres]
//! spatial_index = "GIST"
//!
//! [convert]
//! create_dest = true
//! ```

use crate::themes::DEFAULT_THEMES;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://ftp.kingcounty.gov/gis-web/GISData";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub ogr: OgrConfig,
    pub gpkg: GpkgConfig,
    pub postgres: PostgresConfig,
    pub convert: ConvertConfig,
}

/// Remote archive settings for `fetch-gdbs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base URL under which `<theme>GDB.zip` archives live
    pub base_url: String,
    /// Known theme names
    pub themes: Vec<String>,
    /// Number of retry attempts per archive (0 = no retry)
    pub retry_count: u32,
    /// Base delay between retries in seconds (doubled on each attempt)
    pub retry_delay_secs: u64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            themes: DEFAULT_THEMES.iter().map(|t| t.to_string()).collect(),
            retry_count: 0,
            retry_delay_secs: 1,
            timeout_secs: 300,
        }
    }
}

/// Options shared by every ogr2ogr invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OgrConfig {
    /// ogr2ogr executable name or path
    pub ogr2ogr: String,
    /// ogrinfo executable name or path
    pub ogrinfo: String,
    /// Spatial reference assigned to every output
    pub srs: String,
    /// Geometry type normalization passed to `-nlt`
    pub geometry_type: String,
}

impl Default for OgrConfig {
    fn default() -> Self {
        Self {
            ogr2ogr: "ogr2ogr".to_string(),
            ogrinfo: "ogrinfo".to_string(),
            srs: "EPSG:2926".to_string(),
            geometry_type: "PROMOTE_TO_MULTI".to_string(),
        }
    }
}

/// GeoPackage driver tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GpkgConfig {
    pub version: String,
    /// Rows per transaction (`-gt`)
    pub transaction_size: u32,
}

impl Default for GpkgConfig {
    fn default() -> Self {
        Self {
            version: "1.2".to_string(),
            transaction_size: 65536,
        }
    }
}

/// PostgreSQL driver tuning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    /// Value for `-lco SPATIAL_INDEX=...`; omitted from the command when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_index: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Create a missing GeoPackage destination directory instead of failing
    pub create_dest: bool,
}
