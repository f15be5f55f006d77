//! File geodatabase conversion to GeoPackage or PostGIS.
//!
//! Each discovered geodatabase is dispatched to one of four policies,
//! depending on the output format and whether splitting is requested:
//!
//! | format     | split | invocations                                      |
//! |------------|-------|--------------------------------------------------|
//! | GPKG       | no    | one, to `<theme>.gpkg`                           |
//! | GPKG       | yes   | one per layer, to `<layer>.gpkg`                 |
//! | PostgreSQL | no    | one, connection string unchanged                 |
//! | PostgreSQL | yes   | one, with `active_schema` set to the theme name  |

pub mod discover;

pub use discover::{discover_gdbs, GdbSource};

use crate::connection::PgConnection;
use crate::error::{GisError, Result};
use crate::ogr::{LayerInfo, LayerLister, OgrOptions, ToolInvocation, ToolRunner};
use crate::report::{BatchReport, FailurePolicy, ItemReport};
use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

/// Output format accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One or more GeoPackage files in a directory
    #[value(name = "GPKG")]
    Gpkg,
    /// A PostGIS database given by connection string
    #[value(name = "PostgreSQL")]
    PostgreSql,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Gpkg => write!(f, "GPKG"),
            OutputFormat::PostgreSql => write!(f, "PostgreSQL"),
        }
    }
}

/// Where converted data goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertTarget {
    Gpkg { dir: PathBuf },
    Postgres { connection: PgConnection },
}

impl ConvertTarget {
    /// Build a target from the format tag and the destination argument.
    pub fn parse(format: OutputFormat, destination: &str) -> Result<Self> {
        match format {
            OutputFormat::Gpkg => Ok(ConvertTarget::Gpkg {
                dir: PathBuf::from(destination),
            }),
            OutputFormat::PostgreSql => Ok(ConvertTarget::Postgres {
                connection: destination.parse()?,
            }),
        }
    }

    /// Make sure a GeoPackage destination directory is usable.
    ///
    /// A missing directory is created only when `create_dest` is set.
    pub fn prepare(&self, create_dest: bool) -> Result<()> {
        let ConvertTarget::Gpkg { dir } = self else {
            return Ok(());
        };

        if dir.is_dir() {
            return Ok(());
        }
        if dir.exists() {
            return Err(GisError::Config(format!(
                "Destination is not a directory: {}",
                dir.display()
            )));
        }
        if !create_dest {
            return Err(GisError::Config(format!(
                "Destination directory does not exist: {} (use --create-dest to create it)",
                dir.display()
            )));
        }

        println!("Output directory does not exist. Creating {}", dir.display());
        std::fs::create_dir_all(dir)?;
        Ok(())
    }
}

/// Behavior switches for a conversion run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Split geodatabases by layer (GPKG) or by schema (PostgreSQL)
    pub split: bool,
    /// Prefix per-layer GeoPackage names with the geodatabase theme
    pub prefix: bool,
    pub policy: FailurePolicy,
}

/// Builds ogr2ogr invocations for each conversion policy.
#[derive(Debug, Clone)]
pub struct ConversionPlanner {
    ogr2ogr: PathBuf,
    options: OgrOptions,
}

impl ConversionPlanner {
    pub fn new(ogr2ogr: impl Into<PathBuf>, options: OgrOptions) -> Self {
        Self {
            ogr2ogr: ogr2ogr.into(),
            options,
        }
    }

    fn gpkg_base(&self) -> ToolInvocation {
        ToolInvocation::new(&self.ogr2ogr)
            .args(self.options.gpkg_args())
            .args(self.options.global_args())
    }

    /// Whole geodatabase into `<dir>/<theme>.gpkg`.
    pub fn gdb_to_gpkg(&self, gdb: &GdbSource, dir: &Path) -> ToolInvocation {
        self.gpkg_base()
            .path_arg(&dir.join(format!("{}.gpkg", gdb.theme)))
            .path_arg(&gdb.path)
    }

    /// One layer into `<dir>/<layer>.gpkg` (or `<theme>_<layer>.gpkg`).
    pub fn layer_to_gpkg(
        &self,
        gdb: &GdbSource,
        layer: &LayerInfo,
        dir: &Path,
        prefix: bool,
    ) -> ToolInvocation {
        let file_stem = layer.name.replace(['/', '\\'], "_");
        let file_name = if prefix {
            format!("{}_{}.gpkg", gdb.theme, file_stem)
        } else {
            format!("{}.gpkg", file_stem)
        };
        self.gpkg_base()
            .path_arg(&dir.join(file_name))
            .path_arg(&gdb.path)
            .arg(layer.name.clone())
    }

    /// Whole geodatabase into a PostgreSQL connection.
    pub fn gdb_to_postgres(&self, gdb: &GdbSource, connection: &PgConnection) -> ToolInvocation {
        ToolInvocation::new(&self.ogr2ogr)
            .args(self.options.postgres_args())
            .args(self.options.global_args())
            .arg(connection.to_datasource())
            .path_arg(&gdb.path)
    }
}

/// Runs conversions one invocation at a time.
pub struct Converter<'a, R, L> {
    planner: ConversionPlanner,
    runner: &'a R,
    lister: &'a L,
    options: ConvertOptions,
}

impl<'a, R: ToolRunner, L: LayerLister> Converter<'a, R, L> {
    pub fn new(
        planner: ConversionPlanner,
        runner: &'a R,
        lister: &'a L,
        options: ConvertOptions,
    ) -> Self {
        Self {
            planner,
            runner,
            lister,
            options,
        }
    }

    /// Convert every geodatabase to the target.
    pub async fn run(&self, gdbs: &[GdbSource], target: &ConvertTarget) -> BatchReport {
        let mut report = BatchReport::new("convert-gdb");

        for gdb in gdbs {
            println!("Converting {}...", gdb.theme);
            if !self.convert_gdb(gdb, target, &mut report).await {
                break;
            }
        }

        report.finish();
        report
    }

    /// Returns false when the batch should stop.
    async fn convert_gdb(
        &self,
        gdb: &GdbSource,
        target: &ConvertTarget,
        report: &mut BatchReport,
    ) -> bool {
        let policy = self.options.policy;
        let gdb_label = gdb.path.display().to_string();

        match (target, self.options.split) {
            (ConvertTarget::Gpkg { dir }, false) => {
                let invocation = self.planner.gdb_to_gpkg(gdb, dir);
                let item = self.execute(&gdb_label, &invocation).await;
                report.record(item, policy)
            }
            (ConvertTarget::Gpkg { dir }, true) => {
                let layers = match self.lister.list_layers(&gdb.path).await {
                    Ok(layers) => layers,
                    Err(e) => {
                        let item = ItemReport::failed(gdb_label, "list-layers", e.to_string());
                        return report.record(item, policy);
                    }
                };

                if layers.is_empty() {
                    let item = ItemReport::skipped(gdb_label, "convert", "no layers found");
                    return report.record(item, policy);
                }

                for layer in &layers {
                    match &layer.geometry_type {
                        Some(geometry) => tracing::info!("{}: {} ({})", gdb.theme, layer.name, geometry),
                        None => tracing::info!("{}: {}", gdb.theme, layer.name),
                    }
                    let invocation =
                        self.planner
                            .layer_to_gpkg(gdb, layer, dir, self.options.prefix);
                    let label = format!("{}:{}", gdb.theme, layer.name);
                    let item = self.execute(&label, &invocation).await;
                    if !report.record(item, policy) {
                        return false;
                    }
                }
                true
            }
            (ConvertTarget::Postgres { connection }, split) => {
                let connection = if split {
                    connection.with_active_schema(&gdb.theme)
                } else {
                    connection.clone()
                };
                let invocation = self.planner.gdb_to_postgres(gdb, &connection);
                let item = self.execute(&gdb_label, &invocation).await;
                report.record(item, policy)
            }
        }
    }

    async fn execute(&self, label: &str, invocation: &ToolInvocation) -> ItemReport {
        match self.runner.run(invocation).await {
            Ok(()) => ItemReport::success(label, "convert"),
            Err(e) => {
                tracing::error!("{} failed: {}", label, e);
                ItemReport::failed(label, "convert", e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ogr::testing::{RecordingRunner, StaticLister};

    fn planner() -> ConversionPlanner {
        ConversionPlanner::new("ogr2ogr", OgrOptions::default())
    }

    fn gdb(name: &str) -> GdbSource {
        GdbSource::from_path(PathBuf::from(format!("/data/gdb/{}.gdb", name))).unwrap()
    }

    fn options(split: bool) -> ConvertOptions {
        ConvertOptions {
            split,
            ..Default::default()
        }
    }

    #[test]
    fn test_format_value_names() {
        assert_eq!(OutputFormat::from_str("GPKG", true).unwrap(), OutputFormat::Gpkg);
        assert_eq!(OutputFormat::from_str("gpkg", true).unwrap(), OutputFormat::Gpkg);
        assert_eq!(
            OutputFormat::from_str("postgresql", true).unwrap(),
            OutputFormat::PostgreSql
        );
        assert_eq!(OutputFormat::PostgreSql.to_string(), "PostgreSQL");
    }

    #[test]
    fn test_gdb_to_gpkg_argument_order() {
        let inv = planner().gdb_to_gpkg(&gdb("admin"), Path::new("/out"));
        assert_eq!(
            inv.args,
            vec![
                "-f", "GPKG", "-dsco", "VERSION=1.2", "-lco", "OVERWRITE=YES", "-gt", "65536",
                "-progress", "-a_srs", "EPSG:2926", "-overwrite", "-nlt", "PROMOTE_TO_MULTI",
                "/out/admin.gpkg", "/data/gdb/admin.gdb",
            ]
        );
    }

    #[test]
    fn test_layer_to_gpkg_prefix() {
        let layer = LayerInfo::new("roads");
        let plain = planner().layer_to_gpkg(&gdb("transportation"), &layer, Path::new("/out"), false);
        let prefixed = planner().layer_to_gpkg(&gdb("transportation"), &layer, Path::new("/out"), true);

        let n = plain.args.len();
        assert_eq!(&plain.args[n - 3..], &["/out/roads.gpkg", "/data/gdb/transportation.gdb", "roads"]);
        assert_eq!(prefixed.args[n - 3], "/out/transportation_roads.gpkg");
    }

    #[tokio::test]
    async fn test_gpkg_no_split_one_invocation() {
        let runner = RecordingRunner::default();
        let lister = StaticLister::default();
        let converter = Converter::new(planner(), &runner, &lister, options(false));
        let target = ConvertTarget::Gpkg {
            dir: PathBuf::from("/out"),
        };

        let report = converter.run(&[gdb("admin")], &target).await;

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].args.contains(&"/out/admin.gpkg".to_string()));
        assert_eq!(report.success_count(), 1);
    }

    #[tokio::test]
    async fn test_gpkg_split_one_invocation_per_layer() {
        let runner = RecordingRunner::default();
        let lister = StaticLister::default().with("admin.gdb", &["roads", "parcels"]);
        let converter = Converter::new(planner(), &runner, &lister, options(true));
        let target = ConvertTarget::Gpkg {
            dir: PathBuf::from("/out"),
        };

        let report = converter.run(&[gdb("admin")], &target).await;

        let outputs: Vec<String> = runner
            .calls()
            .iter()
            .map(|c| c.args[c.args.len() - 3].clone())
            .collect();
        assert_eq!(outputs, vec!["/out/roads.gpkg", "/out/parcels.gpkg"]);
        assert_eq!(report.success_count(), 2);
    }

    #[tokio::test]
    async fn test_postgres_no_split_keeps_connection() {
        let runner = RecordingRunner::default();
        let lister = StaticLister::default();
        let converter = Converter::new(planner(), &runner, &lister, options(false));
        let target =
            ConvertTarget::parse(OutputFormat::PostgreSql, "dbname=gis active_schema=public").unwrap();

        converter.run(&[gdb("hydro")], &target).await;

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(&calls[0].args[..2], &["-f", "PostgreSQL"]);
        assert!(calls[0]
            .args
            .contains(&"PG:dbname=gis active_schema=public".to_string()));
    }

    #[tokio::test]
    async fn test_postgres_split_rewrites_active_schema() {
        let runner = RecordingRunner::default();
        let lister = StaticLister::default();
        let converter = Converter::new(planner(), &runner, &lister, options(true));
        let target = ConvertTarget::parse(
            OutputFormat::PostgreSql,
            "dbname=gis host=localhost port=5432 user=gis password=pw active_schema=public",
        )
        .unwrap();

        converter.run(&[gdb("hydro"), gdb("topo")], &target).await;

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        let conn_arg = calls[0].args.iter().find(|a| a.starts_with("PG:")).unwrap();
        assert!(conn_arg.contains("active_schema=hydro"));
        assert!(!conn_arg.contains("active_schema=public"));
        let conn_arg = calls[1].args.iter().find(|a| a.starts_with("PG:")).unwrap();
        assert!(conn_arg.contains("active_schema=topo"));
    }

    #[tokio::test]
    async fn test_abort_on_first_failure() {
        let runner = RecordingRunner::failing_on(0);
        let lister = StaticLister::default();
        let converter = Converter::new(planner(), &runner, &lister, options(false));
        let target = ConvertTarget::Gpkg {
            dir: PathBuf::from("/out"),
        };

        let report = converter.run(&[gdb("admin"), gdb("hydro")], &target).await;

        assert_eq!(runner.calls().len(), 1);
        assert!(report.aborted);
        assert!(report.into_result().is_err());
    }

    #[tokio::test]
    async fn test_keep_going_isolates_failures() {
        let runner = RecordingRunner::failing_on(1);
        let lister = StaticLister::default().with("admin.gdb", &["a", "b", "c"]);
        let converter = Converter::new(
            planner(),
            &runner,
            &lister,
            ConvertOptions {
                split: true,
                prefix: false,
                policy: FailurePolicy::Continue,
            },
        );
        let target = ConvertTarget::Gpkg {
            dir: PathBuf::from("/out"),
        };

        let report = converter.run(&[gdb("admin")], &target).await;

        assert_eq!(runner.calls().len(), 3);
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.items[1].item, "admin:b");
    }

    #[tokio::test]
    async fn test_layer_listing_failure_is_recorded() {
        let runner = RecordingRunner::default();
        let lister = StaticLister::default();
        let converter = Converter::new(planner(), &runner, &lister, options(true));
        let target = ConvertTarget::Gpkg {
            dir: PathBuf::from("/out"),
        };

        let report = converter.run(&[gdb("admin")], &target).await;

        assert!(runner.calls().is_empty());
        assert_eq!(report.items[0].step, "list-layers");
        assert!(report.items[0].is_failed());
    }

    #[test]
    fn test_prepare_missing_dest() {
        let dir = tempfile::tempdir().unwrap();
        let target = ConvertTarget::Gpkg {
            dir: dir.path().join("out"),
        };
        assert!(matches!(target.prepare(false), Err(GisError::Config(_))));
        assert!(target.prepare(true).is_ok());
        assert!(dir.path().join("out").is_dir());
    }

    #[test]
    fn test_prepare_dest_is_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out");
        std::fs::write(&file, b"x").unwrap();
        let target = ConvertTarget::Gpkg { dir: file };
        assert!(matches!(target.prepare(true), Err(GisError::Config(_))));
    }

    #[test]
    fn test_parse_bad_connection() {
        let result = ConvertTarget::parse(OutputFormat::PostgreSql, "dbname");
        assert!(matches!(result, Err(GisError::Connection(_))));
    }
}
