//! Integration tests for the fetch-gdbs, convert-gdb and merge-gpkgs binaries.
//!
//! None of these need GDAL or network access: conversions and merges run in
//! dry-run mode and fetches reuse a pre-staged archive.

use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Run a binary with a clean environment and return the output.
fn run(bin: &str, args: &[&str], config_dir: &Path) -> (String, String, i32) {
    let output = Command::new(bin)
        .args(args)
        .env("KCGIS_CONFIG", config_dir.join("missing.toml"))
        .env_remove("KCGIS_BASE_URL")
        .env_remove("KCGIS_OGR2OGR")
        .env_remove("KCGIS_OGRINFO")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let status = output.status.code().unwrap_or(-1);

    (stdout, stderr, status)
}

fn convert(args: &[&str], dir: &TempDir) -> (String, String, i32) {
    run(env!("CARGO_BIN_EXE_convert-gdb"), args, dir.path())
}

fn merge(args: &[&str], dir: &TempDir) -> (String, String, i32) {
    run(env!("CARGO_BIN_EXE_merge-gpkgs"), args, dir.path())
}

fn fetch(args: &[&str], dir: &TempDir) -> (String, String, i32) {
    run(env!("CARGO_BIN_EXE_fetch-gdbs"), args, dir.path())
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    for bin in [
        env!("CARGO_BIN_EXE_fetch-gdbs"),
        env!("CARGO_BIN_EXE_convert-gdb"),
        env!("CARGO_BIN_EXE_merge-gpkgs"),
    ] {
        let (stdout, _stderr, status) = run(bin, &["--help"], dir.path());
        assert_eq!(status, 0);
        assert!(stdout.contains("Usage"));
    }
}

#[test]
fn test_convert_no_geodatabases() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    std::fs::create_dir(&src).unwrap();

    let (_stdout, stderr, status) = convert(&[path_str(&src), "GPKG", path_str(dir.path())], &dir);

    assert_ne!(status, 0);
    assert!(stderr.contains("No geodatabases found"));
}

#[test]
fn test_convert_missing_destination() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("admin.gdb")).unwrap();
    let out = dir.path().join("out");

    let (_stdout, stderr, status) =
        convert(&[path_str(dir.path()), "GPKG", path_str(&out), "-n"], &dir);

    assert_ne!(status, 0);
    assert!(stderr.contains("does not exist"));
    assert!(!out.exists());
}

#[test]
fn test_convert_dry_run_gpkg() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("admin.gdb")).unwrap();
    std::fs::create_dir(dir.path().join("hydro.gdb")).unwrap();
    let out = dir.path().join("out");

    let (stdout, stderr, status) = convert(
        &[path_str(dir.path()), "gpkg", path_str(&out), "--create-dest", "--dry-run"],
        &dir,
    );

    assert_eq!(status, 0, "stderr: {}", stderr);
    assert!(out.is_dir());
    assert!(stdout.contains("Found 2 geodatabase(s)"));
    assert!(stdout.contains("-f GPKG"));
    assert!(stdout.contains("admin.gpkg"));
    assert!(stdout.contains("hydro.gpkg"));
    assert!(stdout.find("admin.gpkg").unwrap() < stdout.find("hydro.gpkg").unwrap());
    // dry run leaves the output directory empty
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_convert_dry_run_postgres_split() {
    let dir = TempDir::new().unwrap();
    let gdb = dir.path().join("transportation.gdb");
    std::fs::create_dir(&gdb).unwrap();

    let (stdout, stderr, status) = convert(
        &[path_str(&gdb), "PostgreSQL", "dbname=gis host=localhost", "-s", "-n"],
        &dir,
    );

    assert_eq!(status, 0, "stderr: {}", stderr);
    assert!(stdout.contains("-f PostgreSQL"));
    assert!(stdout.contains("active_schema=transportation"));
}

#[test]
fn test_convert_bad_connection_string() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("admin.gdb")).unwrap();

    let (_stdout, stderr, status) =
        convert(&[path_str(dir.path()), "PostgreSQL", "dbname", "-n"], &dir);

    assert_ne!(status, 0);
    assert!(stderr.contains("Invalid connection string"));
}

#[test]
fn test_merge_missing_source() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("nope");
    let dest = dir.path().join("all.gpkg");

    let (_stdout, stderr, status) = merge(&[path_str(&src), path_str(&dest)], &dir);

    assert_ne!(status, 0);
    assert!(stderr.contains("does not exist"));
}

#[test]
fn test_merge_empty_source() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("all.gpkg");

    let (_stdout, stderr, status) = merge(&[path_str(dir.path()), path_str(&dest)], &dir);

    assert_ne!(status, 0);
    assert!(stderr.contains("No geopackages found"));
}

#[test]
fn test_merge_dry_run_with_report() {
    let dir = TempDir::new().unwrap();
    let parts = dir.path().join("parts");
    std::fs::create_dir(&parts).unwrap();
    std::fs::write(parts.join("b.gpkg"), b"").unwrap();
    std::fs::write(parts.join("a.gpkg"), b"").unwrap();
    std::fs::write(parts.join("notes.txt"), b"").unwrap();
    let dest = dir.path().join("all.gpkg");
    let report = dir.path().join("report.json");

    let (stdout, stderr, status) = merge(
        &[path_str(&parts), path_str(&dest), "-n", "--report", path_str(&report)],
        &dir,
    );

    assert_eq!(status, 0, "stderr: {}", stderr);
    assert!(stdout.contains("-append"));
    assert!(!stdout.contains("notes.txt"));
    assert!(stdout.find("a.gpkg").unwrap() < stdout.find("b.gpkg").unwrap());

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["program"], "merge-gpkgs");
    assert_eq!(value["items"].as_array().unwrap().len(), 2);
}

#[test]
fn test_fetch_unknown_theme() {
    let dir = TempDir::new().unwrap();

    let (_stdout, stderr, status) =
        fetch(&[path_str(dir.path()), "--themes", "hydro", "bogus"], &dir);

    assert_ne!(status, 0);
    assert!(stderr.contains("bogus"));
    assert!(!dir.path().join("zip").exists());
}

#[test]
fn test_fetch_reuses_staged_archive() {
    let dir = TempDir::new().unwrap();
    let zip_dir = dir.path().join("zip");
    std::fs::create_dir(&zip_dir).unwrap();

    let file = std::fs::File::create(zip_dir.join("hydroGDB.zip")).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    writer
        .start_file("hydroGDB/KingCounty_GDB_hydro.gdb/a00000001.gdbtable", options)
        .unwrap();
    writer.write_all(b"table").unwrap();
    writer.start_file("hydroGDB/readme.txt", options).unwrap();
    writer.write_all(b"ignored").unwrap();
    writer.finish().unwrap();

    let (_stdout, stderr, status) = fetch(
        &[path_str(dir.path()), "--themes", "hydro", "--reuse-archives"],
        &dir,
    );

    assert_eq!(status, 0, "stderr: {}", stderr);
    let gdb = dir.path().join("gdb").join("hydro.gdb");
    assert_eq!(
        std::fs::read_to_string(gdb.join("a00000001.gdbtable")).unwrap(),
        "table"
    );
    assert!(!gdb.join("readme.txt").exists());
}
