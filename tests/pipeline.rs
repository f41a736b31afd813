//! End-to-end pipeline tests against a local HTTP server.
//!
//! Every test spins up a `tiny_http` server on an ephemeral port with a fixed
//! route table, runs asset resolution against it, and asserts on both the
//! filesystem outcome and the per-route hit counts — the hit counts are what
//! prove deduplication and idempotency, not just the files.

use serde_json::{Value, json};
use sitesmith::{assets, content, validate, walker};
use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

// ============================================================================
// Test server
// ============================================================================

enum Route {
    Bytes(&'static [u8]),
    Redirect(&'static str),
    Status(u16),
}

type Hits = Arc<Mutex<HashMap<String, usize>>>;

/// Serve a fixed route table on an ephemeral port. The server thread runs for
/// the rest of the test process; each test gets its own.
fn serve(routes: Vec<(&'static str, Route)>) -> (String, Hits) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let base = format!("http://127.0.0.1:{port}");

    let routes: HashMap<String, Route> = routes
        .into_iter()
        .map(|(path, route)| (path.to_string(), route))
        .collect();
    let hits: Hits = Arc::new(Mutex::new(HashMap::new()));
    let hit_log = Arc::clone(&hits);

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let path = request.url().to_string();
            *hit_log.lock().unwrap().entry(path.clone()).or_insert(0) += 1;
            let _ = match routes.get(&path) {
                Some(Route::Bytes(body)) => {
                    request.respond(tiny_http::Response::from_data(body.to_vec()))
                }
                Some(Route::Redirect(location)) => {
                    let header =
                        tiny_http::Header::from_bytes(&b"Location"[..], location.as_bytes())
                            .unwrap();
                    request.respond(tiny_http::Response::empty(302).with_header(header))
                }
                Some(Route::Status(code)) => {
                    request.respond(tiny_http::Response::empty(*code))
                }
                None => request.respond(tiny_http::Response::empty(404)),
            };
        }
    });

    (base, hits)
}

fn hit_count(hits: &Hits, path: &str) -> usize {
    *hits.lock().unwrap().get(path).unwrap_or(&0)
}

fn resolve(tree: &mut Value, dir: &std::path::Path) -> assets::AssetReport {
    assets::resolve_assets(tree, dir, None).unwrap()
}

// ============================================================================
// Deduplication and idempotency
// ============================================================================

#[test]
fn same_url_in_three_slots_is_fetched_once() {
    let (base, hits) = serve(vec![("/img/photo.jpg", Route::Bytes(b"jpeg bytes"))]);
    let url = format!("{base}/img/photo.jpg");
    let mut tree = json!({
        "navigation": {"logo": url},
        "sections": [
            {"type": "hero", "id": "top", "props": {"image": url}},
            {"type": "gallery", "id": "g", "props": {"images": [url]}}
        ]
    });

    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("assets");
    let report = resolve(&mut tree, &dir);

    assert!(report.is_clean());
    assert_eq!(hit_count(&hits, "/img/photo.jpg"), 1);
    assert_eq!(report.resolved.len(), 1);
    assert_eq!(report.resolved[0].refs, 3);
    assert_eq!(report.rewritten, 3);
    assert_eq!(fs::read(dir.join("photo.jpg")).unwrap(), b"jpeg bytes");

    // Every slot now points at the same local file.
    let local = &report.resolved[0].local_path;
    assert_eq!(tree["navigation"]["logo"].as_str(), Some(local.as_str()));
    assert_eq!(
        tree["sections"][0]["props"]["image"].as_str(),
        Some(local.as_str())
    );
    assert_eq!(
        tree["sections"][1]["props"]["images"][0].as_str(),
        Some(local.as_str())
    );
    assert!(walker::collect(&tree).is_empty());
}

#[test]
fn second_run_over_rewritten_tree_touches_nothing() {
    let (base, hits) = serve(vec![("/hero.jpg", Route::Bytes(b"hero"))]);
    let mut tree = json!({"image": format!("{base}/hero.jpg")});

    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("assets");
    resolve(&mut tree, &dir);
    assert_eq!(hit_count(&hits, "/hero.jpg"), 1);

    // The rewritten tree holds a local path, so there is nothing to collect.
    let report = resolve(&mut tree, &dir);
    assert_eq!(report.resolved.len(), 0);
    assert_eq!(hit_count(&hits, "/hero.jpg"), 1);
}

#[test]
fn rerun_with_original_url_reuses_the_file_on_disk() {
    let (base, hits) = serve(vec![("/hero.jpg", Route::Bytes(b"hero"))]);
    let url = format!("{base}/hero.jpg");

    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("assets");
    resolve(&mut json!({"image": url}), &dir);

    // A fresh tree still holding the URL: derived name is already on disk,
    // so the network is skipped entirely.
    let mut tree = json!({"image": url});
    let report = resolve(&mut tree, &dir);

    assert_eq!(report.cached(), 1);
    assert_eq!(report.downloaded(), 0);
    assert_eq!(hit_count(&hits, "/hero.jpg"), 1);
    assert_eq!(fs::read(dir.join("hero.jpg")).unwrap(), b"hero");
}

// ============================================================================
// Collisions
// ============================================================================

#[test]
fn distinct_urls_with_same_filename_get_suffixed() {
    let (base, _hits) = serve(vec![
        ("/a/image.jpg", Route::Bytes(b"first")),
        ("/b/image.jpg", Route::Bytes(b"second")),
    ]);
    let mut tree = json!({
        "one": format!("{base}/a/image.jpg"),
        "two": format!("{base}/b/image.jpg")
    });

    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("assets");
    let report = resolve(&mut tree, &dir);

    assert!(report.is_clean());
    let mut names: Vec<&str> = report.resolved.iter().map(|r| r.filename.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["image.jpg", "image_2.jpg"]);

    // Both files exist with their own content; which URL got the suffix is
    // scheduling-dependent, the pairing is not.
    let mut contents = vec![
        fs::read(dir.join("image.jpg")).unwrap(),
        fs::read(dir.join("image_2.jpg")).unwrap(),
    ];
    contents.sort();
    assert_eq!(contents, vec![b"first".to_vec(), b"second".to_vec()]);
}

// ============================================================================
// Redirects
// ============================================================================

#[test]
fn three_redirects_resolve() {
    let (base, hits) = serve(vec![
        ("/hop1", Route::Redirect("/hop2")),
        ("/hop2", Route::Redirect("/hop3")),
        ("/hop3", Route::Redirect("/final.jpg")),
        ("/final.jpg", Route::Bytes(b"made it")),
    ]);
    let mut tree = json!({"image": format!("{base}/hop1")});

    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("assets");
    let report = resolve(&mut tree, &dir);

    assert!(report.is_clean(), "{:?}", report.errors);
    assert_eq!(hit_count(&hits, "/final.jpg"), 1);
    // Filename derives from the original URL, not the redirect target.
    assert_eq!(report.resolved[0].filename, "hop1");
    assert_eq!(fs::read(dir.join("hop1")).unwrap(), b"made it");
}

#[test]
fn six_redirects_exceed_the_limit() {
    let (base, hits) = serve(vec![
        ("/d1", Route::Redirect("/d2")),
        ("/d2", Route::Redirect("/d3")),
        ("/d3", Route::Redirect("/d4")),
        ("/d4", Route::Redirect("/d5")),
        ("/d5", Route::Redirect("/d6")),
        ("/d6", Route::Redirect("/final.jpg")),
        ("/final.jpg", Route::Bytes(b"unreachable")),
    ]);
    let mut tree = json!({"image": format!("{base}/d1")});

    let tmp = TempDir::new().unwrap();
    let report = resolve(&mut tree, &tmp.path().join("assets"));

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].to_string().contains("too many redirects"));
    assert_eq!(hit_count(&hits, "/final.jpg"), 0);
    // The failed slot keeps its original URL for the next attempt.
    assert_eq!(tree["image"].as_str(), Some(format!("{base}/d1").as_str()));
}

// ============================================================================
// Failure isolation
// ============================================================================

#[test]
fn one_failing_url_does_not_block_the_others() {
    let (base, _hits) = serve(vec![
        ("/good.jpg", Route::Bytes(b"good")),
        ("/gone.png", Route::Status(404)),
    ]);
    let mut tree = json!({
        "a": format!("{base}/good.jpg"),
        "b": format!("{base}/gone.png")
    });

    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("assets");
    let report = resolve(&mut tree, &dir);

    assert_eq!(report.resolved.len(), 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].to_string().contains("404"));
    assert!(dir.join("good.jpg").exists());
    assert!(!dir.join("gone.png").exists());
    // Only the successful slot was rewritten.
    let rewritten = tree["a"].as_str().unwrap();
    assert!(!rewritten.starts_with("http"));
    assert!(rewritten.ends_with("good.jpg"));
    assert_eq!(tree["b"].as_str(), Some(format!("{base}/gone.png").as_str()));
}

// ============================================================================
// Full pipeline: check → fetch → write-back
// ============================================================================

#[test]
fn validate_fetch_and_rewrite_a_config_file() {
    let (base, hits) = serve(vec![("/storefront.jpg", Route::Bytes(b"storefront"))]);

    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("site.yaml");
    let yaml = format!(
        r##"name: Demo Bakery
defaultLanguage: en
languages: [en]
theme:
  colors:
    primary: "#8b5a2b"
seo:
  title: Demo Bakery
navigation:
  links:
    - label: Home
      anchor: top
sections:
  - type: hero
    id: top
    props:
      title: Welcome
      image: {base}/storefront.jpg
footer:
  text: "© Demo Bakery"
"##
    );
    fs::write(&config_path, yaml).unwrap();

    let mut tree = content::load(&config_path).unwrap();
    let report = validate::validate(&tree);
    assert!(report.is_valid(), "{:?}", report.errors);

    let asset_dir = tmp.path().join("assets");
    let fetch = assets::resolve_assets(&mut tree, &asset_dir, None).unwrap();
    assert!(fetch.is_clean());
    assert_eq!(fetch.rewritten, 1);
    content::save(&config_path, &tree).unwrap();

    // The saved file holds the local path and still validates.
    let reloaded = content::load(&config_path).unwrap();
    let image = reloaded["sections"][0]["props"]["image"].as_str().unwrap();
    assert!(image.ends_with("storefront.jpg"));
    assert!(!image.starts_with("http"));
    assert!(validate::validate(&reloaded).is_valid());

    // A second full run finds nothing remote.
    let mut second = content::load(&config_path).unwrap();
    let again = assets::resolve_assets(&mut second, &asset_dir, None).unwrap();
    assert!(again.resolved.is_empty());
    assert_eq!(hit_count(&hits, "/storefront.jpg"), 1);
}
