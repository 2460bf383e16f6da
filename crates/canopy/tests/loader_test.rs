use canopy::{CanopyConfig, Error, load_tree, load_tree_sync, open};
use futures::executor::block_on;
use std::io::Write;

fn write_tree(dir: &tempfile::TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(text.as_bytes()).unwrap();
    path
}

#[test]
fn load_tree_resolves_with_a_complete_tree() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_tree(&dir, "sample.tsv", "A\tB\tC\nB\tD\n");

    let tree = block_on(load_tree(path)).unwrap();
    assert_eq!(tree.name(), Some("sample.tsv"));
    assert_eq!(tree.id(tree.root()), "A");
    assert_eq!(tree.subtree_size(tree.root()), 4);
}

#[test]
fn load_tree_sync_matches_async() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_tree(&dir, "t.txt", "r x y z\ny q\n");
    let a = load_tree_sync(&path).unwrap();
    let b = block_on(load_tree(path)).unwrap();
    let ids = |t: &canopy::Tree| t.nodes().map(|(_, id, _)| id.to_string()).collect::<Vec<_>>();
    assert_eq!(ids(&a), ids(&b));
}

#[test]
fn load_tree_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.tsv");
    let err = block_on(load_tree(missing.clone())).unwrap_err();
    match err {
        Error::LoadFailure { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn load_tree_reports_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_tree(&dir, "empty.tsv", "\n\n");
    let err = block_on(load_tree(path)).unwrap_err();
    assert!(matches!(err, Error::Tree(canopy_tree::Error::InvalidInput { .. })), "{err}");
}

#[test]
fn open_builds_a_laid_out_viewer() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_tree(&dir, "big.tsv", &{
        let mut text = String::from("root");
        for i in 0..50 {
            text.push_str(&format!(" n{i}"));
        }
        text.push('\n');
        for i in 0..50 {
            text.push_str(&format!("n{i} n{i}a n{i}b n{i}c\n"));
        }
        text
    });

    let viewer = block_on(open(path, &CanopyConfig::default())).unwrap();
    assert_eq!(viewer.visible_nodes().count(), 201);
    let snapshot = viewer.snapshot();
    assert_eq!(snapshot.name.as_deref(), Some("big.tsv"));
    assert_eq!(snapshot.edges.len(), 200);
}
