//! End-to-end warm-cache scenarios against a mock documentation site.

#![allow(clippy::unwrap_used)]

use spartan_docs_core::{Fetcher, Registry, Storage, WarmOptions, warm_cache};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCORDION_PAGE: &str = concat!(
    "<h1>Accordion</h1>",
    "<h2>Brain API</h2>",
    "<h3>BrnAccordion</h3>",
    "<p>Selector: brn-accordion</p>",
    "<h4>Inputs</h4>",
    "<table>",
    "<tr><th>Prop</th><th>Type</th><th>Default</th><th>Description</th></tr>",
    "<tr><td>orientation</td><td>string</td><td>vertical</td><td>Layout axis</td></tr>",
    "</table>",
    "<h2>On this page</h2>",
);

fn test_env(server: &MockServer) -> (tempfile::TempDir, Fetcher, Storage, Registry) {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = Storage::with_root(dir.path().to_path_buf()).unwrap();
    storage.initialize(None).unwrap();
    let fetcher = Fetcher::new().unwrap();
    let registry = Registry::with_base_url(&server.uri());
    (dir, fetcher, storage, registry)
}

#[tokio::test]
async fn test_partial_failure_never_aborts_the_batch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/components/accordion"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACCORDION_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/components/badge"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (_dir, fetcher, mut storage, registry) = test_env(&server);

    let report = warm_cache(
        &fetcher,
        &mut storage,
        &registry,
        WarmOptions {
            components: Some(vec!["accordion".to_string(), "badge".to_string()]),
            include_docs: false,
            on_progress: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(report.components.total, 2);
    assert_eq!(report.components.success, 1);
    assert_eq!(report.components.failed, 1);
    assert_eq!(report.components.errors.len(), 1);
    assert_eq!(report.components.errors[0].item, "badge");
    assert!(report.components.errors[0].error.contains("500"));

    // The successful item must still be cached.
    let hit = storage.get_component("accordion", None).unwrap().unwrap();
    assert!(!hit.stale);
    assert_eq!(hit.data["componentName"], "accordion");
}

#[tokio::test]
async fn test_extracted_api_is_persisted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/components/accordion"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACCORDION_PAGE))
        .mount(&server)
        .await;

    let (_dir, fetcher, mut storage, registry) = test_env(&server);

    warm_cache(
        &fetcher,
        &mut storage,
        &registry,
        WarmOptions {
            components: Some(vec!["accordion".to_string()]),
            include_docs: false,
            on_progress: None,
        },
    )
    .await
    .unwrap();

    let hit = storage
        .get_component("accordion", Some("api"))
        .unwrap()
        .unwrap();
    let records = hit.data["brainApi"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "BrnAccordion");
    assert_eq!(records[0]["selector"], "brn-accordion");
    assert_eq!(records[0]["inputs"][0]["prop"], "orientation");

    // The full payload records where it came from.
    let full = storage
        .get_component("accordion", Some("full"))
        .unwrap()
        .unwrap();
    let url = full.data["url"].as_str().unwrap();
    assert!(url.ends_with("/components/accordion"));
}

#[tokio::test]
async fn test_progress_reported_after_every_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/components/accordion"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACCORDION_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/components/badge"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (_dir, fetcher, mut storage, registry) = test_env(&server);

    let seen: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    warm_cache(
        &fetcher,
        &mut storage,
        &registry,
        WarmOptions {
            components: Some(vec!["accordion".to_string(), "badge".to_string()]),
            include_docs: false,
            on_progress: Some(Box::new(move |current, total| {
                sink.lock().unwrap().push((current, total));
            })),
        },
    )
    .await
    .unwrap();

    // Failures report progress too.
    assert_eq!(*seen.lock().unwrap(), vec![(1, 2), (2, 2)]);
}

#[tokio::test]
async fn test_docs_pass_runs_after_components() {
    let server = MockServer::start().await;
    // Catch-all for every documentation topic.
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<h1>Guide</h1><p>Some guidance.</p>"),
        )
        .mount(&server)
        .await;

    let (_dir, fetcher, mut storage, registry) = test_env(&server);

    let report = warm_cache(
        &fetcher,
        &mut storage,
        &registry,
        WarmOptions {
            components: Some(vec![]),
            include_docs: true,
            on_progress: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(report.components.total, 0);
    assert_eq!(report.docs.total, registry.doc_topics().len());
    assert_eq!(report.docs.success, registry.doc_topics().len());

    // Docs content is stored as plain text, not HTML.
    let hit = storage.get_docs("theming").unwrap().unwrap();
    assert_eq!(hit.content, "Guide\nSome guidance.");
}

#[tokio::test]
async fn test_report_carries_version_and_duration() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACCORDION_PAGE))
        .mount(&server)
        .await;

    let (_dir, fetcher, mut storage, registry) = test_env(&server);
    storage.initialize(Some("1.0.2")).unwrap();

    let report = warm_cache(
        &fetcher,
        &mut storage,
        &registry,
        WarmOptions {
            components: Some(vec!["accordion".to_string()]),
            include_docs: false,
            on_progress: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(report.version, "1.0.2");
    assert_eq!(storage.get_component("accordion", None).unwrap().unwrap().version, "1.0.2");
}
