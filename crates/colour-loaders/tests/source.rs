//! Directory-backed raw data with manifest checksums.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use colour_loaders::manifest::{MANIFEST_FILE, sha256_hex};
use colour_loaders::{
    Breneman1987DatasetLoader, DatasetError, DatasetLoader, DirectorySource, Luo1999DatasetLoader,
    RawDataSource, SourceError,
};

const DATASET: &str = "3270903";
const CONDITIONS: &str = include_str!("fixtures/3270903/conditions.csv");
const COORDINATES: &str = include_str!("fixtures/3270903/coordinates.csv");

fn write_manifest(dir: &Path, id: &str, files: &[(&str, &str)]) {
    let mut text = format!("[dataset]\nid = \"{id}\"\n");
    for (path, sha256) in files {
        text.push_str(&format!("\n[[files]]\npath = \"{path}\"\nsha256 = \"{sha256}\"\n"));
    }
    fs::write(dir.join(MANIFEST_FILE), text).expect("write manifest");
}

fn dataset_dir(root: &Path) -> std::path::PathBuf {
    let dir = root.join(DATASET);
    fs::create_dir_all(&dir).expect("create dataset dir");
    dir
}

#[test]
fn reads_files_matching_their_checksums() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = dataset_dir(temp.path());
    fs::write(dir.join("conditions.csv"), CONDITIONS).expect("write");
    let digest = sha256_hex(CONDITIONS.as_bytes());
    write_manifest(&dir, DATASET, &[("conditions.csv", digest.as_str())]);

    let source = DirectorySource::new(temp.path());
    let bytes = source.read(DATASET, "conditions.csv").expect("read");
    assert_eq!(bytes, CONDITIONS.as_bytes());
}

#[test]
fn files_without_manifest_are_read_unchecked() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().join("10.1364_JOSAA.4.001115");
    fs::create_dir_all(&dir).expect("create dir");
    fs::write(dir.join("experiments.txt"), "experiment_01.dat\n").expect("write");

    let source = DirectorySource::new(temp.path());
    let bytes = source
        .read("10.1364/JOSAA.4.001115", "experiments.txt")
        .expect("read");
    assert_eq!(bytes, b"experiment_01.dat\n");
}

#[test]
fn checksum_mismatch_is_reported() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = dataset_dir(temp.path());
    fs::write(dir.join("conditions.csv"), "Name\ntampered\n").expect("write");
    let digest = sha256_hex(CONDITIONS.as_bytes());
    write_manifest(&dir, DATASET, &[("conditions.csv", digest.as_str())]);

    let err = DirectorySource::new(temp.path())
        .read(DATASET, "conditions.csv")
        .unwrap_err();
    assert!(matches!(err, SourceError::Sha256Mismatch { .. }));
}

#[test]
fn pinned_but_missing_file_is_reported() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = dataset_dir(temp.path());
    write_manifest(&dir, DATASET, &[("coordinates.csv", "0".repeat(64).as_str())]);

    let err = DirectorySource::new(temp.path())
        .read(DATASET, "coordinates.csv")
        .unwrap_err();
    assert!(matches!(err, SourceError::MissingFile { .. }));
}

#[test]
fn manifest_for_another_dataset_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = dataset_dir(temp.path());
    fs::write(dir.join("conditions.csv"), CONDITIONS).expect("write");
    write_manifest(&dir, "9999999", &[]);

    let err = DirectorySource::new(temp.path())
        .read(DATASET, "conditions.csv")
        .unwrap_err();
    assert!(matches!(err, SourceError::Manifest { .. }));
}

#[test]
fn malformed_manifest_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = dataset_dir(temp.path());
    fs::write(dir.join("conditions.csv"), CONDITIONS).expect("write");
    write_manifest(&dir, DATASET, &[("conditions.csv", "not-a-digest")]);

    let err = DirectorySource::new(temp.path())
        .read(DATASET, "conditions.csv")
        .unwrap_err();
    assert!(err.to_string().contains("invalid sha256 for conditions.csv"));
}

#[test]
fn loader_over_empty_root_is_unavailable() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut dataset =
        Luo1999DatasetLoader::with_source(Arc::new(DirectorySource::new(temp.path())));

    let err = dataset.load().unwrap_err();
    assert!(matches!(
        err,
        DatasetError::Unavailable {
            source: SourceError::Io { .. },
            ..
        }
    ));
    assert!(!dataset.is_loaded());
}

#[test]
fn loader_reads_verified_directory() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = dataset_dir(temp.path());
    fs::write(dir.join("conditions.csv"), CONDITIONS).expect("write");
    fs::write(dir.join("coordinates.csv"), COORDINATES).expect("write");
    write_manifest(
        &dir,
        DATASET,
        &[
            ("conditions.csv", sha256_hex(CONDITIONS.as_bytes()).as_str()),
            ("coordinates.csv", sha256_hex(COORDINATES.as_bytes()).as_str()),
        ],
    );

    let mut dataset =
        Luo1999DatasetLoader::with_source(Arc::new(DirectorySource::new(temp.path())));
    assert_eq!(dataset.load().expect("load").len(), 37);
}

const BRENEMAN: &str = "10.1364/JOSAA.4.001115";

/// A dataset directory plus a file next to it that must stay unreachable.
fn breneman_with_neighbour() -> (tempfile::TempDir, std::path::PathBuf) {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().join("10.1364_JOSAA.4.001115");
    fs::create_dir_all(&dir).expect("create dir");
    let secret = temp.path().join("secret.txt");
    fs::write(&secret, "outside the dataset").expect("write");
    (temp, secret)
}

#[test]
fn relative_escape_is_rejected() {
    let (temp, _secret) = breneman_with_neighbour();
    let source = DirectorySource::new(temp.path());

    let err = source.read(BRENEMAN, "../secret.txt").unwrap_err();
    assert!(matches!(err, SourceError::InvalidPath { ref file } if file == "../secret.txt"));
}

#[test]
fn absolute_path_is_rejected() {
    let (temp, secret) = breneman_with_neighbour();
    let source = DirectorySource::new(temp.path());
    let absolute = secret.to_str().expect("utf-8 temp path");

    let err = source.read(BRENEMAN, absolute).unwrap_err();
    assert!(matches!(err, SourceError::InvalidPath { .. }));
}

#[test]
fn listing_cannot_point_outside_the_dataset() {
    let (temp, secret) = breneman_with_neighbour();
    let listing = format!("{}\n", secret.display());
    fs::write(
        temp.path().join("10.1364_JOSAA.4.001115/experiments.txt"),
        listing,
    )
    .expect("write listing");

    let mut dataset =
        Breneman1987DatasetLoader::with_source(Arc::new(DirectorySource::new(temp.path())));
    let err = dataset.load().unwrap_err();
    assert!(err.is_format(), "unexpected error: {err}");
    assert!(!dataset.is_loaded());
}
