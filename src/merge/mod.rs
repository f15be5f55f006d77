//! GeoPackage merging.
//!
//! Every GeoPackage in a source directory is appended, in path order, into a
//! single destination GeoPackage with one ogr2ogr call per file.

use crate::error::{GisError, Result};
use crate::ogr::{OgrOptions, ToolInvocation, ToolRunner};
use crate::report::{BatchReport, FailurePolicy, ItemReport};
use std::path::{Path, PathBuf};

pub const GPKG_SUFFIX: &str = "gpkg";

/// Find the GeoPackages to merge.
///
/// The source must be an existing directory containing at least one
/// `*.gpkg`. The destination is never one of its own inputs.
pub fn discover_gpkgs(source: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    if !source.is_dir() {
        return Err(GisError::Config(format!(
            "Source directory does not exist: {}",
            source.display()
        )));
    }

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&source.to_string_lossy()),
        GPKG_SUFFIX
    );
    let dest_canonical = dest.canonicalize().ok();
    let mut paths: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| GisError::Path(format!("Invalid source pattern {}: {}", pattern, e)))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .filter(|p| match &dest_canonical {
            Some(d) => p.canonicalize().ok().as_ref() != Some(d),
            None => true,
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(GisError::Config(format!(
            "No geopackages found in {}",
            source.display()
        )));
    }

    Ok(paths)
}

/// Appends GeoPackages into one destination.
pub struct Merger<'a, R> {
    ogr2ogr: PathBuf,
    options: OgrOptions,
    runner: &'a R,
    policy: FailurePolicy,
}

impl<'a, R: ToolRunner> Merger<'a, R> {
    pub fn new(
        ogr2ogr: impl Into<PathBuf>,
        options: OgrOptions,
        runner: &'a R,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            ogr2ogr: ogr2ogr.into(),
            options,
            runner,
            policy,
        }
    }

    /// The append invocation for one source file.
    pub fn invocation(&self, source: &Path, dest: &Path) -> ToolInvocation {
        ToolInvocation::new(&self.ogr2ogr)
            .args(self.options.merge_args())
            .path_arg(dest)
            .path_arg(source)
    }

    pub async fn run(&self, sources: &[PathBuf], dest: &Path) -> BatchReport {
        let mut report = BatchReport::new("merge-gpkgs");

        if dest.exists() {
            println!("Destination geopackage exists. Appending to {}", dest.display());
        }

        for source in sources {
            println!("Merging {}...", source.display());
            let invocation = self.invocation(source, dest);
            let label = source.display().to_string();
            let item = match self.runner.run(&invocation).await {
                Ok(()) => ItemReport::success(label, "merge"),
                Err(e) => {
                    tracing::error!("{} failed: {}", label, e);
                    ItemReport::failed(label, "merge", e.to_string())
                }
            };
            if !report.record(item, self.policy) {
                break;
            }
        }

        report.finish();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ogr::testing::RecordingRunner;

    fn touch(path: &Path) {
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_discover_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["roads.gpkg", "admin.gpkg", "notes.txt"] {
            touch(&dir.path().join(name));
        }

        let found = discover_gpkgs(dir.path(), &dir.path().join("merged.gpkg")).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["admin.gpkg", "roads.gpkg"]);
    }

    #[test]
    fn test_discover_excludes_destination() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.gpkg"));
        touch(&dir.path().join("merged.gpkg"));

        let found = discover_gpkgs(dir.path(), &dir.path().join("merged.gpkg")).unwrap();
        assert_eq!(found, vec![dir.path().join("a.gpkg")]);
    }

    #[test]
    fn test_discover_missing_source() {
        let err = discover_gpkgs(Path::new("/nonexistent"), Path::new("out.gpkg")).unwrap_err();
        assert!(matches!(err, GisError::Config(_)));
    }

    #[test]
    fn test_discover_no_gpkgs() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_gpkgs(dir.path(), Path::new("out.gpkg")).unwrap_err();
        assert!(err.to_string().contains("No geopackages found"));
    }

    #[test]
    fn test_invocation_order() {
        let runner = RecordingRunner::default();
        let merger = Merger::new("ogr2ogr", OgrOptions::default(), &runner, FailurePolicy::Abort);
        let inv = merger.invocation(Path::new("/src/a.gpkg"), Path::new("/out/all.gpkg"));
        assert_eq!(
            inv.args,
            vec![
                "-progress", "-f", "GPKG", "-a_srs", "EPSG:2926", "-append", "-dsco",
                "VERSION=1.2", "-lco", "OVERWRITE=YES", "-gt", "65536", "/out/all.gpkg",
                "/src/a.gpkg",
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_destination_still_merges_everything() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir(&src).unwrap();
        touch(&src.join("a.gpkg"));
        touch(&src.join("b.gpkg"));
        let dest = dir.path().join("all.gpkg");
        touch(&dest);

        let runner = RecordingRunner::default();
        let merger = Merger::new("ogr2ogr", OgrOptions::default(), &runner, FailurePolicy::Abort);
        let sources = discover_gpkgs(&src, &dest).unwrap();
        let report = merger.run(&sources, &dest).await;

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.args.contains(&"-append".to_string())));
        assert_eq!(report.success_count(), 2);
        assert!(report.into_result().is_ok());
    }

    #[tokio::test]
    async fn test_abort_stops_remaining_merges() {
        let runner = RecordingRunner::failing_on(0);
        let merger = Merger::new("ogr2ogr", OgrOptions::default(), &runner, FailurePolicy::Abort);
        let sources = vec![PathBuf::from("/s/a.gpkg"), PathBuf::from("/s/b.gpkg")];

        let report = merger.run(&sources, Path::new("/nonexistent/all.gpkg")).await;
        assert_eq!(runner.calls().len(), 1);
        assert!(report.aborted);
    }

    #[tokio::test]
    async fn test_keep_going_merges_rest() {
        let runner = RecordingRunner::failing_on(0);
        let merger =
            Merger::new("ogr2ogr", OgrOptions::default(), &runner, FailurePolicy::Continue);
        let sources = vec![PathBuf::from("/s/a.gpkg"), PathBuf::from("/s/b.gpkg")];

        let report = merger.run(&sources, Path::new("/nonexistent/all.gpkg")).await;
        assert_eq!(runner.calls().len(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.success_count(), 1);
    }
}
