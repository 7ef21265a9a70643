//! Integration tests for the storage contract over the in-memory CMS.
//!
//! Covers absent paths, directory creation, listing and deletion.

use ariadne_core::{Action, AriadneAdapter, AriadneError, CmsClient, MemoryCms, StorageAdapter};

fn setup() -> (MemoryCms, AriadneAdapter<MemoryCms>) {
    let cms = MemoryCms::new("nl");
    let adapter = AriadneAdapter::new(cms.clone(), "/").unwrap();
    (cms, adapter)
}

#[test]
fn test_absent_paths_fail_every_read_operation() {
    let (_cms, adapter) = setup();
    let path = "missing/file.txt";

    assert!(!adapter.has(path));
    assert!(adapter.read(path).unwrap_err().is_not_found());
    assert!(adapter.read_stream(path).unwrap_err().is_not_found());
    assert!(adapter.get_metadata(path).unwrap_err().is_not_found());
    assert!(adapter.get_mimetype(path).unwrap_err().is_not_found());
    assert!(adapter.get_size(path).unwrap_err().is_not_found());
    assert!(adapter.get_timestamp(path).unwrap_err().is_not_found());
    assert!(adapter.get_visibility(path).unwrap_err().is_not_found());
    assert!(adapter.copy(path, "other").unwrap_err().is_not_found());
    assert!(adapter.rename(path, "other").unwrap_err().is_not_found());
    assert!(adapter.delete(path).unwrap_err().is_not_found());
    assert!(adapter.delete_dir(path).unwrap_err().is_not_found());
}

#[test]
fn test_create_dir_is_idempotent() {
    let (cms, adapter) = setup();

    let first = adapter.create_dir("a/b/c").unwrap();
    let nodes_after_first = cms.snapshot();
    let second = adapter.create_dir("a/b/c").unwrap();

    assert_eq!(first.path, "a/b/c/");
    assert_eq!(first, second);
    assert_eq!(cms.snapshot(), nodes_after_first);
    assert_eq!(cms.len(), 4);
}

#[test]
fn test_create_dir_skips_existing_segments() {
    let (cms, adapter) = setup();
    adapter.create_dir("a").unwrap();
    adapter.create_dir("/a//b/").unwrap();

    assert!(cms.exists("/a/b/"));
    assert_eq!(cms.ls("/").unwrap().len(), 1);
}

#[test]
fn test_write_creates_missing_ancestors() {
    let (cms, adapter) = setup();
    adapter.write("x/y/z/file.txt", b"deep").unwrap();

    for dir in ["/x/", "/x/y/", "/x/y/z/"] {
        let node = cms.get(dir).unwrap().unwrap();
        assert!(node.is_directory(), "{} should be a directory", dir);
    }
    assert!(adapter.get_metadata("x/y/z/file.txt").unwrap().is_file());
}

#[test]
fn test_list_contents_of_empty_directory_is_empty() {
    let (_cms, adapter) = setup();
    adapter.create_dir("empty").unwrap();

    assert!(adapter.list_contents("empty", false).unwrap().is_empty());
    assert!(adapter.list_contents("empty", true).unwrap().is_empty());
}

#[test]
fn test_list_contents_of_absent_directory_is_empty() {
    let (_cms, adapter) = setup();
    assert!(adapter.list_contents("nothing/here", false).unwrap().is_empty());
}

#[test]
fn test_list_contents_direct_and_recursive() {
    let (_cms, adapter) = setup();
    adapter.write("docs/a.txt", b"a").unwrap();
    adapter.write("docs/sub/b.txt", b"bb").unwrap();
    adapter.write("top.txt", b"t").unwrap();

    let direct: Vec<String> = adapter
        .list_contents("docs", false)
        .unwrap()
        .into_iter()
        .map(|m| m.path)
        .collect();
    assert_eq!(direct, vec!["docs/a.txt", "docs/sub/"]);

    let recursive: Vec<String> = adapter
        .list_contents("", true)
        .unwrap()
        .into_iter()
        .map(|m| m.path)
        .collect();
    assert_eq!(
        recursive,
        vec!["docs/", "docs/a.txt", "docs/sub/", "docs/sub/b.txt", "top.txt"]
    );
}

#[test]
fn test_delete_dir_on_file_fails_and_keeps_file() {
    let (_cms, adapter) = setup();
    adapter.write("notes.txt", b"keep me").unwrap();

    let result = adapter.delete_dir("notes.txt");
    assert!(matches!(result, Err(AriadneError::NotADirectory(_))));
    assert!(adapter.has("notes.txt"));
    assert_eq!(adapter.read("notes.txt").unwrap().contents, b"keep me");
}

#[test]
fn test_delete_dir_does_not_recurse() {
    let (_cms, adapter) = setup();
    adapter.write("docs/a.txt", b"a").unwrap();

    let result = adapter.delete_dir("docs");
    assert!(matches!(result, Err(AriadneError::HasChildren(_))));
    assert!(adapter.has("docs/a.txt"));

    adapter.delete("docs/a.txt").unwrap();
    adapter.delete_dir("docs").unwrap();
    assert!(!adapter.has("docs"));
}

#[test]
fn test_delete_file() {
    let (cms, adapter) = setup();
    adapter.write("a.txt", b"a").unwrap();
    adapter.delete("a.txt").unwrap();

    assert!(!adapter.has("a.txt"));
    assert!(!cms.exists("/a.txt/"));
}

#[test]
fn test_adapter_root_cannot_be_deleted_or_moved() {
    let cms = MemoryCms::with_root("/sites/", "nl");
    cms.call("/sites/", &Action::New {
        node_type: "pdir".into(),
        filename: "demo".into(),
        nls: "nl".into(),
        name: "demo".into(),
    })
    .unwrap();
    let adapter = AriadneAdapter::new(cms.clone(), "/sites/demo/").unwrap();

    for root in ["", "/", "."] {
        assert!(matches!(adapter.delete(root), Err(AriadneError::InvalidPath(_))));
        assert!(matches!(adapter.delete_dir(root), Err(AriadneError::InvalidPath(_))));
        assert!(matches!(
            adapter.rename(root, "elsewhere"),
            Err(AriadneError::InvalidPath(_))
        ));
    }

    assert!(cms.exists("/sites/demo/"));
    adapter.write("still/works.txt", b"ok").unwrap();
}
