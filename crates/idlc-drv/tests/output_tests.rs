//! Tests for the artifact writing behavior of the driver library.

use std::fs;

use idlc_drv::write_output;

#[test]
fn test_writes_new_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.json");
    write_output(&path, "{}\n").expect("write");
    assert_eq!(fs::read_to_string(&path).expect("read"), "{}\n");
}

#[test]
fn test_creates_missing_parents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("a").join("b").join("out.json");
    write_output(&path, "{}\n").expect("write");
    assert!(path.exists());
}

#[test]
fn test_overwrites_different_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.json");
    write_output(&path, "first\n").expect("write");
    write_output(&path, "second\n").expect("rewrite");
    assert_eq!(fs::read_to_string(&path).expect("read"), "second\n");
}

#[cfg(unix)]
#[test]
fn test_identical_content_skips_the_write() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.json");
    write_output(&path, "stable\n").expect("write");

    // With the file read-only, an actual rewrite would fail.
    fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).expect("chmod");
    write_output(&path, "stable\n").expect("identical write skipped");
    assert!(write_output(&path, "changed\n").is_err());

    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod back");
}
