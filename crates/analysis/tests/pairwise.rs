//! End-to-end tests of the pairwise driver on small synthetic DEMs.

use lcpath_analysis::{run, RunConfig};
use lcpath_core::{GeoTransform, Location, LocationSet, Raster};
use lcpath_engine::VerticalFactor;
use std::fs;
use std::path::Path;

/// Flat DEM (all zeros) with 1-unit cells, origin at the top-left so the
/// grid covers x in [0, cols] and y in [0, rows].
fn flat_dem(rows: usize, cols: usize) -> Raster<f64> {
    let mut dem = Raster::filled(rows, cols, 0.0);
    dem.set_transform(GeoTransform::new(0.0, rows as f64, 1.0, -1.0));
    dem
}

/// Constant unit cost regardless of slope
fn unit_vf() -> VerticalFactor {
    VerticalFactor::from_breaks(vec![(-90.0, 1.0), (90.0, 1.0)]).unwrap()
}

fn loc(id: &str, name: &str, x: f64, y: f64) -> Location {
    Location {
        id: id.to_string(),
        name: name.to_string(),
        x,
        y,
    }
}

fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

fn master_lines(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("master.csv"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn distinct_sets_record_one_row_per_ordered_pair() {
    let dem = flat_dem(20, 20);
    let sources = LocationSet::new(vec![
        loc("s1", "Alpha", 2.5, 17.5),
        loc("s2", "Bravo", 2.5, 10.5),
        loc("s3", "Carl", 2.5, 3.5),
    ])
    .unwrap();
    let dests = LocationSet::new(vec![
        loc("d1", "Delta", 16.5, 17.5),
        loc("d2", "Echo", 16.5, 12.5),
        loc("d3", "Fox", 16.5, 7.5),
        loc("d4", "Golf", 16.5, 2.5),
    ])
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig::new(dir.path());
    let summary = run(&config, &dem, &unit_vf(), &sources, &dests).unwrap();

    assert_eq!(summary.rows_recorded, 12);
    assert_eq!(summary.surfaces_built, 3);
    assert_eq!(summary.sources_failed, 0);
    assert_eq!(summary.pairs_failed, 0);

    let lines = master_lines(dir.path());
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "Source,Dest,PathCost,Distance");

    // One surface pair per source, one polyline per pair
    assert_eq!(count_files(&dir.path().join("pathdis")), 3);
    assert_eq!(count_files(&dir.path().join("backlink")), 3);
    assert_eq!(count_files(&dir.path().join("polylines")), 12);
    assert!(summary.log_path.exists());
}

#[test]
fn identical_sets_cover_every_pair_in_one_pass() {
    let dem = flat_dem(20, 20);
    let set = LocationSet::new(vec![
        loc("p1", "One", 3.5, 16.5),
        loc("p2", "Two", 10.5, 16.5),
        loc("p3", "Thre", 16.5, 16.5),
        loc("p4", "Four", 3.5, 4.5),
        loc("p5", "Five", 16.5, 4.5),
    ])
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut config = RunConfig::new(dir.path());
    // Round trip is redundant for identical sets and must not double rows
    config.round_trip = true;
    let summary = run(&config, &dem, &unit_vf(), &set, &set).unwrap();

    // 5 * 5 ordered pairs minus 5 self-pairs
    assert_eq!(summary.rows_recorded, 20);
    assert_eq!(summary.surfaces_built, 5);
    assert!(!dir.path().join("forward").exists());
    assert!(dir.path().join("pathdis").exists());
}

#[test]
fn round_trip_over_distinct_sets_builds_both_subtrees() {
    let dem = flat_dem(15, 15);
    let sources = LocationSet::new(vec![
        loc("a1", "North", 3.5, 12.5),
        loc("a2", "South", 3.5, 2.5),
    ])
    .unwrap();
    let dests = LocationSet::new(vec![
        loc("b1", "East", 12.5, 12.5),
        loc("b2", "West", 12.5, 2.5),
    ])
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut config = RunConfig::new(dir.path());
    config.round_trip = true;
    let summary = run(&config, &dem, &unit_vf(), &sources, &dests).unwrap();

    assert_eq!(summary.rows_recorded, 8);
    assert_eq!(summary.surfaces_built, 4);
    assert_eq!(count_files(&dir.path().join("forward").join("pathdis")), 2);
    assert_eq!(count_files(&dir.path().join("reverse").join("pathdis")), 2);
    assert_eq!(count_files(&dir.path().join("forward").join("polylines")), 4);
    assert_eq!(count_files(&dir.path().join("reverse").join("polylines")), 4);

    // Reverse rows carry the swapped roles
    let lines = master_lines(dir.path());
    assert!(lines.iter().any(|l| l.starts_with("North,East,")));
    assert!(lines.iter().any(|l| l.starts_with("East,North,")));
}

#[test]
fn coincident_pair_records_zero_distance() {
    let dem = flat_dem(10, 10);
    let sources = LocationSet::new(vec![loc("s", "Here", 4.5, 4.5)]).unwrap();
    // Same cell, different display name: not a self-pair
    let dests = LocationSet::new(vec![loc("d", "Same", 4.5, 4.5)]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig::new(dir.path());
    let summary = run(&config, &dem, &unit_vf(), &sources, &dests).unwrap();

    assert_eq!(summary.rows_recorded, 1);
    assert_eq!(summary.pairs_failed, 0);
    let lines = master_lines(dir.path());
    assert_eq!(lines[1], "Here,Same,0,0");
}

#[test]
fn destination_outside_extent_omits_its_row() {
    let dem = flat_dem(10, 10);
    let sources = LocationSet::new(vec![loc("s", "Base", 2.5, 7.5)]).unwrap();
    let dests = LocationSet::new(vec![
        loc("d1", "Near", 7.5, 7.5),
        loc("d2", "Gone", 50.0, 50.0),
    ])
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig::new(dir.path());
    let summary = run(&config, &dem, &unit_vf(), &sources, &dests).unwrap();

    assert_eq!(summary.rows_recorded, 1);
    assert_eq!(summary.pairs_failed, 1);
    let lines = master_lines(dir.path());
    assert!(lines.iter().any(|l| l.starts_with("Base,Near,")));
    assert!(!lines.iter().any(|l| l.contains("Gone")));
}

#[test]
fn straight_path_length_matches_cell_geometry() {
    let dem = flat_dem(10, 10);
    // Same row, six cells apart: cost and length are both 6 on a flat DEM
    let sources = LocationSet::new(vec![loc("s", "From", 1.5, 5.5)]).unwrap();
    let dests = LocationSet::new(vec![loc("d", "To", 7.5, 5.5)]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig::new(dir.path());
    run(&config, &dem, &unit_vf(), &sources, &dests).unwrap();

    let lines = master_lines(dir.path());
    assert_eq!(lines[1], "From,To,6,6");
}

#[test]
fn keep_intermediate_persists_per_pair_artifacts() {
    let dem = flat_dem(10, 10);
    let sources = LocationSet::new(vec![loc("s", "From", 1.5, 5.5)]).unwrap();
    let dests = LocationSet::new(vec![loc("d", "To", 7.5, 5.5)]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let mut config = RunConfig::new(dir.path());
    config.keep_intermediate = true;
    run(&config, &dem, &unit_vf(), &sources, &dests).unwrap();

    assert!(dir.path().join("costpath").join("cp_s_d.tif").exists());
    let table = dir.path().join("tables").join("tb_s_d.csv");
    let content = fs::read_to_string(table).unwrap();
    assert!(content.contains("From,To,"));
}

#[test]
fn failed_source_skips_all_its_destinations() {
    let dem = flat_dem(10, 10);
    let sources = LocationSet::new(vec![
        loc("s1", "Good", 2.5, 7.5),
        // Outside the DEM extent: its surfaces cannot be generated
        loc("s2", "Bad", 500.0, 500.0),
    ])
    .unwrap();
    let dests = LocationSet::new(vec![
        loc("d1", "East", 7.5, 7.5),
        loc("d2", "South", 2.5, 2.5),
    ])
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig::new(dir.path());
    let summary = run(&config, &dem, &unit_vf(), &sources, &dests).unwrap();

    // Only the good source's pairs are recorded; the bad source is
    // counted once, not once per destination
    assert_eq!(summary.sources_failed, 1);
    assert_eq!(summary.surfaces_built, 1);
    assert_eq!(summary.rows_recorded, 2);
    assert_eq!(summary.pairs_failed, 0);

    let lines = master_lines(dir.path());
    assert!(lines.iter().all(|l| !l.contains("Bad")));
    let log = fs::read_to_string(&summary.log_path).unwrap();
    assert!(log.contains("Failed to generate cost and backlink surfaces for Bad"));
}

#[test]
fn unreachable_destination_logs_and_continues() {
    // Wall of missing elevation splits the grid in two
    let mut dem = flat_dem(10, 10);
    for row in 0..10 {
        dem.set(row, 5, f64::NAN).unwrap();
    }

    let sources = LocationSet::new(vec![loc("s", "Left", 1.5, 5.5)]).unwrap();
    let dests = LocationSet::new(vec![
        loc("d1", "Far", 8.5, 5.5),
        loc("d2", "Near", 3.5, 5.5),
    ])
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig::new(dir.path());
    let summary = run(&config, &dem, &unit_vf(), &sources, &dests).unwrap();

    // The blocked pair is dropped, the reachable one still records
    assert_eq!(summary.rows_recorded, 1);
    assert_eq!(summary.pairs_failed, 1);
    let log = fs::read_to_string(&summary.log_path).unwrap();
    assert!(log.contains("Far"));
}
