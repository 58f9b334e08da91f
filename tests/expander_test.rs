//! Tests for seed folder expansion.

mod support;

use drive_copy::expander::{children_query, expand};
use drive_copy::TargetSet;
use support::{file, folder, FakeDrive};

fn ids(set: &TargetSet) -> Vec<&str> {
    set.iter().collect()
}

#[tokio::test]
async fn folder_children_replace_seed_and_skip_native() {
    let drive = FakeDrive::new().with_query(
        children_query("A"),
        vec![
            file("x", "photo.jpg", "image/jpeg", "A"),
            file("y", "notes", "application/vnd.google-apps.document", "A"),
        ],
    );

    let seeds: TargetSet = ["A"].into_iter().collect();
    let expanded = expand(&drive, &seeds).await.unwrap();
    assert_eq!(ids(&expanded), vec!["x"]);
}

#[tokio::test]
async fn seeds_without_children_pass_through() {
    let drive = FakeDrive::new();
    let seeds: TargetSet = ["f1", "f2"].into_iter().collect();

    let expanded = expand(&drive, &seeds).await.unwrap();
    assert_eq!(expanded, seeds);
}

#[tokio::test]
async fn each_seed_gets_its_own_query() {
    let drive = FakeDrive::new();
    let seeds: TargetSet = ["f1", "f2"].into_iter().collect();

    expand(&drive, &seeds).await.unwrap();
    assert_eq!(
        drive.queries(),
        vec![children_query("f1"), children_query("f2")]
    );
    assert_eq!(children_query("f1"), "'f1' in parents and trashed = false");
}

#[tokio::test]
async fn mixed_folder_and_file_seeds() {
    let drive = FakeDrive::new().with_query(
        children_query("dir"),
        vec![
            file("a", "a.bin", "application/octet-stream", "dir"),
            file("b", "b.bin", "application/octet-stream", "dir"),
        ],
    );

    let seeds: TargetSet = ["dir", "loose"].into_iter().collect();
    let expanded = expand(&drive, &seeds).await.unwrap();
    assert_eq!(ids(&expanded), vec!["a", "b", "loose"]);
}

#[tokio::test]
async fn nested_folders_are_not_traversed() {
    let drive = FakeDrive::new()
        .with_query(
            children_query("top"),
            vec![
                folder("sub", "sub", "top"),
                file("t1", "t1.txt", "text/plain", "top"),
            ],
        )
        .with_query(
            children_query("sub"),
            vec![file("deep", "deep.txt", "text/plain", "sub")],
        );

    let seeds: TargetSet = ["top"].into_iter().collect();
    let expanded = expand(&drive, &seeds).await.unwrap();
    assert_eq!(ids(&expanded), vec!["t1"]);
    assert_eq!(drive.queries().len(), 1);
}

#[tokio::test]
async fn seed_that_is_parent_of_another_seed_is_dropped() {
    let drive = FakeDrive::new().with_query(
        children_query("dir"),
        vec![file("inner", "inner.txt", "text/plain", "dir")],
    );

    let seeds: TargetSet = ["dir", "inner"].into_iter().collect();
    let expanded = expand(&drive, &seeds).await.unwrap();
    assert_eq!(ids(&expanded), vec!["inner"]);
}

#[tokio::test]
async fn folder_with_only_native_children_yields_nothing() {
    let drive = FakeDrive::new().with_query(
        children_query("docs"),
        vec![file("s", "sheet", "application/vnd.google-apps.spreadsheet", "docs")],
    );

    let seeds: TargetSet = ["docs"].into_iter().collect();
    let expanded = expand(&drive, &seeds).await.unwrap();
    assert!(expanded.is_empty());
}
