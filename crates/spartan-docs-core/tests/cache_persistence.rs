//! Disk-cache behavior across process restarts, modeled by constructing a
//! fresh `Storage` instance over the same root.

#![allow(clippy::unwrap_used)]

use spartan_docs_core::{ComponentPayload, ExtractedApiInfo, Storage};

fn payload(html: &str) -> ComponentPayload {
    ComponentPayload {
        html: html.to_string(),
        api: ExtractedApiInfo::default(),
        examples: vec![],
        full: None,
    }
}

#[test]
fn test_entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut storage = Storage::with_root(dir.path().to_path_buf()).unwrap();
        storage.initialize(Some("1.0.2")).unwrap();
        storage.set_component("button", &payload("<h1>Button</h1>")).unwrap();
        storage.set_docs("installation", "Run the schematic.").unwrap();
    }

    let mut reopened = Storage::with_root(dir.path().to_path_buf()).unwrap();
    reopened.initialize(Some("1.0.2")).unwrap();

    let hit = reopened.get_component("button", None).unwrap().unwrap();
    assert!(!hit.stale);
    assert_eq!(hit.data["html"], "<h1>Button</h1>");
    assert_eq!(hit.version, "1.0.2");

    let docs = reopened.get_docs("installation").unwrap().unwrap();
    assert_eq!(docs.content, "Run the schematic.");
}

#[test]
fn test_corrupt_metadata_recreated_without_losing_entries() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut storage = Storage::with_root(dir.path().to_path_buf()).unwrap();
        storage.initialize(None).unwrap();
        storage.set_component("dialog", &payload("<h1>Dialog</h1>")).unwrap();
    }

    // Simulate bookkeeping corruption. Entry files are the source of truth;
    // only the index is lost.
    std::fs::write(dir.path().join("latest/metadata.json"), "{ corrupt").unwrap();

    let mut reopened = Storage::with_root(dir.path().to_path_buf()).unwrap();
    reopened.initialize(None).unwrap();

    let hit = reopened.get_component("dialog", None).unwrap().unwrap();
    assert_eq!(hit.data["html"], "<h1>Dialog</h1>");

    // The recreated metadata starts empty until the next write.
    let stats = reopened.get_stats();
    let latest = stats.versions.iter().find(|v| v.version == "latest").unwrap();
    assert_eq!(latest.component_count, 0);

    reopened.set_component("dialog", &payload("<h1>Dialog</h1>")).unwrap();
    let stats = reopened.get_stats();
    let latest = stats.versions.iter().find(|v| v.version == "latest").unwrap();
    assert_eq!(latest.component_count, 1);
}

#[test]
fn test_partitions_do_not_leak_across_versions() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = Storage::with_root(dir.path().to_path_buf()).unwrap();

    storage.initialize(Some("1.0.1")).unwrap();
    storage.set_component("tabs", &payload("old")).unwrap();

    storage.initialize(Some("1.0.2")).unwrap();
    storage.set_component("tabs", &payload("new")).unwrap();

    // Clearing the active partition must leave the other untouched.
    let outcome = storage.clear_version();
    assert!(outcome.success);
    assert!(storage.get_component("tabs", None).unwrap().is_none());

    storage.switch_version("1.0.1").unwrap();
    let hit = storage.get_component("tabs", None).unwrap().unwrap();
    assert_eq!(hit.data["html"], "old");
}
