// tests/fingerprint.rs

use std::error::Error;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use docwatch::watch::{Change, Snapshot, WatchSet};
use docwatch_test_utils::init_tracing;
use proptest::prelude::*;
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

/// A watch set over `root` with the default "site" output directory and no
/// extra excludes, watching `root/../mkdocs.yml` style config paths.
fn watch_set(root: &Path, config_file: &Path) -> WatchSet {
    WatchSet::new(root, config_file, OsString::from("site"), &[]).unwrap()
}

fn fingerprint(root: &Path, config_file: &Path) -> Snapshot {
    watch_set(root, config_file).fingerprint()
}

#[test]
fn two_scans_of_identical_contents_are_equal() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let root = dir.path().join("docs");
    fs::create_dir_all(root.join("guides"))?;
    fs::write(root.join("index.md"), "# hello")?;
    fs::write(root.join("guides").join("setup.md"), "setup")?;

    let config = dir.path().join("mkdocs.yml");
    fs::write(&config, "site_name: demo")?;

    let first = fingerprint(&root, &config);
    let second = fingerprint(&root, &config);
    assert_eq!(first, second);

    // A freshly constructed watch set agrees too.
    let third = watch_set(&root, &config).fingerprint();
    assert_eq!(first, third);

    Ok(())
}

#[test]
fn fingerprint_is_independent_of_creation_order() -> TestResult {
    init_tracing();

    let a = tempdir()?;
    let b = tempdir()?;

    fs::write(a.path().join("one.md"), "one")?;
    fs::write(a.path().join("two.md"), "two")?;

    // Same contents, created in the opposite order.
    fs::write(b.path().join("two.md"), "two")?;
    fs::write(b.path().join("one.md"), "one")?;

    let missing = a.path().join("absent.yml");
    let fp_a = fingerprint(a.path(), &missing);
    let fp_b = fingerprint(b.path(), &missing);
    assert_eq!(fp_a.tree, fp_b.tree);

    Ok(())
}

#[test]
fn edits_deletions_and_additions_all_change_the_fingerprint() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let root = dir.path().to_path_buf();
    let config = root.join("absent.yml");

    fs::write(root.join("a.md"), "hello")?;
    fs::write(root.join("b.md"), "world")?;
    let baseline = fingerprint(&root, &config);

    // Append a single byte.
    fs::write(root.join("a.md"), "hello!")?;
    let edited = fingerprint(&root, &config);
    assert_ne!(baseline.tree, edited.tree);

    // Delete a watched file.
    fs::remove_file(root.join("b.md"))?;
    let deleted = fingerprint(&root, &config);
    assert_ne!(edited.tree, deleted.tree);

    // Add a new file.
    fs::write(root.join("c.md"), "new page")?;
    let added = fingerprint(&root, &config);
    assert_ne!(deleted.tree, added.tree);

    Ok(())
}

#[test]
fn hidden_output_and_excluded_paths_never_affect_the_fingerprint() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let root = dir.path().to_path_buf();
    let config = root.join("absent.yml");

    fs::create_dir_all(root.join(".cache"))?;
    fs::create_dir_all(root.join("site"))?;
    fs::create_dir_all(root.join("drafts"))?;
    fs::write(root.join("index.md"), "# index")?;

    let set = WatchSet::new(
        &root,
        &config,
        OsString::from("site"),
        &["drafts/**".to_string()],
    )?;
    let baseline = set.fingerprint();

    fs::write(root.join(".cache").join("state"), "scratch")?;
    fs::write(root.join("site").join("index.html"), "<html>built</html>")?;
    fs::write(root.join("drafts").join("wip.md"), "unfinished")?;
    assert_eq!(baseline, set.fingerprint());

    // A change to a watched file is still seen.
    fs::write(root.join("index.md"), "# index v2")?;
    assert_ne!(baseline, set.fingerprint());

    Ok(())
}

#[test]
fn absent_config_file_is_a_null_fingerprint() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let root = dir.path().join("docs");
    fs::create_dir_all(&root)?;
    fs::write(root.join("index.md"), "page")?;

    let config = dir.path().join("mkdocs.yml");
    let without = fingerprint(&root, &config);
    assert_eq!(without.config, None);

    fs::write(&config, "site_name: demo")?;
    let with = fingerprint(&root, &config);
    assert!(with.config.is_some());
    assert_eq!(without.tree, with.tree);

    fs::write(&config, "site_name: renamed")?;
    let changed = fingerprint(&root, &config);
    assert_ne!(with.config, changed.config);

    Ok(())
}

#[cfg(unix)]
#[test]
fn unreadable_files_are_skipped_not_fatal() -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    init_tracing();

    let dir = tempdir()?;
    let root = dir.path().to_path_buf();
    let config = root.join("absent.yml");

    fs::write(root.join("readable.md"), "fine")?;
    let locked = root.join("locked.md");
    fs::write(&locked, "secret")?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // Permission bits don't apply to root; nothing to assert in that case.
    if fs::File::open(&locked).is_ok() {
        return Ok(());
    }

    // The scan must not fail, and the locked file contributes nothing: the
    // fingerprint matches a tree holding only the readable file.
    let scanned = fingerprint(&root, &config);

    let twin = tempdir()?;
    fs::write(twin.path().join("readable.md"), "fine")?;
    let expected = fingerprint(twin.path(), &config);

    assert_eq!(scanned.tree, expected.tree);
    Ok(())
}

#[test]
fn classify_path_applies_the_same_rules_as_the_scan() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let root = dir.path().join("docs");
    fs::create_dir_all(root.join("site"))?;
    let config = dir.path().join("mkdocs.yml");
    fs::write(&config, "site_name: demo")?;

    let set = WatchSet::new(
        &root,
        &config,
        OsString::from("site"),
        &["drafts/**".to_string()],
    )?
    .canonicalized();

    let root = set.root().to_path_buf();
    let config = set.config_file().to_path_buf();

    assert_eq!(set.classify_path(&config), Some(Change::Config));
    assert_eq!(
        set.classify_path(&root.join("index.md")),
        Some(Change::Tree)
    );
    // Hidden files in visible directories are watched; hidden directories
    // are not.
    assert_eq!(
        set.classify_path(&root.join(".hidden-file")),
        Some(Change::Tree)
    );
    assert_eq!(set.classify_path(&root.join(".cache").join("x")), None);
    assert_eq!(
        set.classify_path(&root.join("site").join("index.html")),
        None
    );
    // Metadata events for the output directory itself are irrelevant too.
    assert_eq!(set.classify_path(&root.join("site")), None);
    assert_eq!(set.classify_path(&root.join("drafts").join("wip.md")), None);
    assert_eq!(set.classify_path(dir.path()), None);

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Scanning the same contents twice always agrees, whatever the
    /// contents are.
    #[test]
    fn scan_is_deterministic_for_arbitrary_contents(
        files in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..64), 1..6)
    ) {
        let dir = tempdir().unwrap();
        for (i, contents) in files.iter().enumerate() {
            fs::write(dir.path().join(format!("f{i}.md")), contents).unwrap();
        }

        let config = dir.path().join("absent.yml");
        let first = fingerprint(dir.path(), &config);
        let second = fingerprint(dir.path(), &config);
        prop_assert_eq!(first, second);
    }

    /// Flipping any single byte of any file changes the fingerprint.
    #[test]
    fn any_byte_flip_changes_the_fingerprint(
        files in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..64), 1..6),
        file_pick in any::<prop::sample::Index>(),
        byte_pick in any::<prop::sample::Index>(),
    ) {
        let dir = tempdir().unwrap();
        for (i, contents) in files.iter().enumerate() {
            fs::write(dir.path().join(format!("f{i}.md")), contents).unwrap();
        }

        let config = dir.path().join("absent.yml");
        let before = fingerprint(dir.path(), &config);

        let i = file_pick.index(files.len());
        let mut mutated = files[i].clone();
        let j = byte_pick.index(mutated.len());
        mutated[j] = mutated[j].wrapping_add(1);
        fs::write(dir.path().join(format!("f{i}.md")), &mutated).unwrap();

        let after = fingerprint(dir.path(), &config);
        prop_assert_ne!(before.tree, after.tree);
    }
}
