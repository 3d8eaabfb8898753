//! Tests for deriving and caching series from raw model output

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use gday_series::prelude::*;
use gday_series::{Climate, FormulaError, Treatment};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const SOURCE: &str = "D1GDAYEUCFIXEDAMBAVG.csv";

/// Write a raw output file with a 3-line preamble and `days` rows
fn write_raw(dir: &Path, name: &str, days: usize) {
    let mut text = String::from("# GDAY output\n# site EUC\n# daily\nYEAR,DOY,GL,GW,GR,NPP,GPP\n");
    for day in 0..days {
        let year = 2012 + day / 365;
        let doy = day % 365 + 1;
        let npp = 4.0 + (day % 7) as f64;
        text.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            year,
            doy,
            npp * 0.25,
            npp * 0.5,
            npp * 0.25,
            npp,
            npp * 2.0
        ));
    }
    fs::write(dir.join(name), text).unwrap();
}

fn setup(days: usize) -> (TempDir, DerivedCache, SourceId) {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("outputs");
    fs::create_dir_all(&data).unwrap();
    write_raw(&data, SOURCE, days);
    let cache = DerivedCache::new(Config::with_dirs(data, dir.path().join("cache")));
    (dir, cache, SOURCE.parse().unwrap())
}

#[test]
fn test_leaf_allocation_example() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("run.csv"),
        "preamble\npreamble\npreamble\nGL,NPP\n2,8\n",
    )
    .unwrap();
    let cache = DerivedCache::new(Config::with_dirs(dir.path(), dir.path().join("cache")));

    let series = cache
        .get_variable("leafAl", &SourceId::from_file_name("run.csv").unwrap())
        .unwrap();
    assert_eq!(series.values(), &[25.0]);
    assert_eq!(series.variable(), "leafAl");
    assert_eq!(series.source(), "run.csv");
}

#[test]
fn test_length_matches_raw_rows() {
    let (_dir, cache, source) = setup(400);
    for variable in ["leafAl", "woodAl", "rootAl", "NPP", "GPP", "CUE"] {
        assert_eq!(cache.get_variable(variable, &source).unwrap().len(), 400);
    }
}

#[test]
fn test_second_request_reads_artifact() {
    let (_dir, cache, source) = setup(730);

    let first = cache.get_variable("CUE", &source).unwrap();
    let second = cache.get_variable("CUE", &source).unwrap();

    assert!(first.bitwise_eq(&second));
    assert!(first.values().iter().all(|&v| v == 0.5));
    let stats = cache.stats();
    assert_eq!(stats.raw_reads, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.writes, 1);
}

#[test]
fn test_fresh_cache_reuses_artifacts() {
    let (dir, cache, source) = setup(30);
    let first = cache.get_variable("leafAl", &source).unwrap();

    // A new cache over the same directories sees the artifact
    let reopened = DerivedCache::new(cache.config().clone());
    let second = reopened.get_variable("leafAl", &source).unwrap();
    assert!(first.bitwise_eq(&second));
    assert_eq!(reopened.stats().raw_reads, 0);

    // Removing the raw file does not affect cached reads
    fs::remove_file(dir.path().join("outputs").join(SOURCE)).unwrap();
    assert!(reopened.get_variable("leafAl", &source).is_ok());
}

#[test]
fn test_undefined_variable_without_io() {
    let (_dir, cache, _) = setup(10);
    let missing = SourceId::from_file_name("D1GDAYEUCNOSUCHMODELAMBAVG.csv").unwrap();

    let err = cache.get_variable("shootAl", &missing).unwrap_err();
    assert!(err.is_undefined_variable());
    assert_eq!(cache.stats().raw_reads, 0);
    assert!(!cache.config().cache_dir.exists());
}

#[test]
fn test_source_not_found() {
    let (_dir, cache, _) = setup(10);
    let missing = SourceId::from_file_name("D1GDAYEUCNOSUCHMODELAMBAVG.csv").unwrap();

    let err = cache.get_variable("leafAl", &missing).unwrap_err();
    assert!(matches!(
        err,
        Error::SourceNotFound(ref path) if path.ends_with("D1GDAYEUCNOSUCHMODELAMBAVG.csv")
    ));
    assert!(!cache.artifact_path("leafAl", &missing).exists());
}

#[test]
fn test_missing_column_leaves_no_artifact() {
    let (_dir, cache, source) = setup(10);

    // LAI is not among the raw columns
    let err = cache.get_variable("LAI", &source).unwrap_err();
    assert!(matches!(
        err,
        Error::Formula(FormulaError::MissingColumn(ref column)) if column == "LAI"
    ));
    assert!(!cache.artifact_path("LAI", &source).exists());
    assert_eq!(cache.stats().writes, 0);
}

#[test]
fn test_source_modified_invalidation() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("outputs");
    fs::create_dir_all(&data).unwrap();
    write_raw(&data, SOURCE, 5);
    let source: SourceId = SOURCE.parse().unwrap();

    let config = Config {
        invalidation: InvalidationPolicy::SourceModified,
        ..Config::with_dirs(&data, dir.path().join("cache"))
    };
    let cache = DerivedCache::new(config);
    cache.get_variable("NPP", &source).unwrap();
    cache.get_variable("NPP", &source).unwrap();
    assert_eq!(cache.stats().raw_reads, 1);

    // Rewrite the raw file with a later modification time
    let raw_path = data.join(SOURCE);
    fs::write(&raw_path, "a\nb\nc\nNPP\n1\n2\n").unwrap();
    fs::File::options()
        .write(true)
        .open(&raw_path)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();

    let refreshed = cache.get_variable("NPP", &source).unwrap();
    assert_eq!(refreshed.values(), &[1.0, 2.0]);
    assert_eq!(cache.stats().raw_reads, 2);
}

#[test]
fn test_get_variables_order() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("outputs");
    fs::create_dir_all(&data).unwrap();
    let config = Config::with_dirs(&data, dir.path().join("cache"));

    let sources: Vec<SourceId> = ["FIXED", "ALLOMETRIC"]
        .iter()
        .map(|model| {
            config.source(model, Experiment::new(Treatment::Elevated, Climate::Variable))
        })
        .collect();
    for source in &sources {
        write_raw(&data, source.file_name(), 3);
    }

    let cache = DerivedCache::new(config);
    let series = cache.get_variables(&["NPP", "GPP"], &sources).unwrap();
    let labels: Vec<(&str, &str)> = series.iter().map(|s| (s.variable(), s.source())).collect();
    assert_eq!(
        labels,
        vec![
            ("NPP", "D1GDAYEUCFIXEDELEVAR.csv"),
            ("GPP", "D1GDAYEUCFIXEDELEVAR.csv"),
            ("NPP", "D1GDAYEUCALLOMETRICELEVAR.csv"),
            ("GPP", "D1GDAYEUCALLOMETRICELEVAR.csv"),
        ]
    );

    // An unknown variable fails before anything is computed
    assert!(cache.get_variables(&["NPP", "nope"], &sources).is_err());
    assert_eq!(cache.stats().writes, 4);
}

#[test]
fn test_series_file_roundtrip() {
    let (dir, cache, source) = setup(20);
    let series = cache.get_variable("rootAl", &source).unwrap();

    let path = dir.path().join("rootAl.csv");
    series.save(&path).unwrap();
    let reopened = DerivedSeries::open(&path, "rootAl", SOURCE).unwrap();
    assert!(series.bitwise_eq(&reopened));
}
