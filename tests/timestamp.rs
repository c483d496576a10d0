// tests/timestamp.rs

use std::fs;

use docwatch::build::BuildStamp;
use tempfile::tempdir;

#[test]
fn write_then_read_roundtrips() {
    let dir = tempdir().unwrap();
    let stamp = BuildStamp::new(dir.path().join(".last_build_time"));

    stamp.write(1700000000.25).unwrap();
    assert_eq!(stamp.read(), Some(1700000000.25));
}

#[test]
fn read_or_zero_falls_back_for_missing_or_empty_files() {
    let dir = tempdir().unwrap();
    let stamp = BuildStamp::new(dir.path().join(".last_build_time"));

    assert_eq!(stamp.read_or_zero(), "0");

    fs::write(stamp.path(), "").unwrap();
    assert_eq!(stamp.read_or_zero(), "0");

    fs::write(stamp.path(), "1700000000.5\n").unwrap();
    assert_eq!(stamp.read_or_zero(), "1700000000.5");
}

#[test]
fn touch_records_a_recent_time_and_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let stamp = BuildStamp::new(dir.path().join(".last_build_time"));

    let before = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs_f64();
    let written = stamp.touch().unwrap();
    assert!(written >= before);
    assert_eq!(stamp.read(), Some(written));

    // The write goes through a temp file that must not survive the rename.
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name())
        .filter(|name| name.to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp file left behind: {leftovers:?}");
}

#[test]
fn successive_touches_never_decrease() {
    let dir = tempdir().unwrap();
    let stamp = BuildStamp::new(dir.path().join(".last_build_time"));

    let first = stamp.touch().unwrap();
    let second = stamp.touch().unwrap();
    assert!(second >= first);
    assert_eq!(stamp.read(), Some(second));
}

#[test]
fn write_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let stamp = BuildStamp::new(dir.path().join("state").join("stamp"));

    stamp.write(42.0).unwrap();
    assert_eq!(stamp.read(), Some(42.0));
}
