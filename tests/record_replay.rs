//! Record-replay round-trip integration tests.
//!
//! A cassette captured from a live session is replayed through the full
//! resolution path:
//! 1. Build a cassette with `CassetteRecorder` (probe, clock, manifest fetch).
//! 2. Replay it with `ServiceContext::replaying()` and resolve the page.
//! 3. Replay a second time and assert determinism.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use cshlink::cassette::recorder::CassetteRecorder;
use cshlink::config::ResolverConfig;
use cshlink::context::ServiceContext;
use cshlink::share::ShareLinkResolver;

const PAGE: &str = "https://h/Docs/v1/Content/topic.htm?q=search#hl";
const MANIFEST_URL: &str = "https://h/Docs/v1/Data/Alias.xml";
const MANIFEST: &str = r#"<CatapultAliasFile>
  <Map Name="Topic" Link="Content/topic.htm" ResolvedId="TOPIC_1" />
</CatapultAliasFile>"#;

fn ok(status: u16, body: &str) -> Value {
    json!({"ok": {"status": status, "content_length": body.len(), "body": body}})
}

fn quick_config() -> ResolverConfig {
    ResolverConfig { probe_delay_ms: 0, probe_timeout_ms: 50, ..ResolverConfig::default() }
}

fn resolve(path: &Path, config: &ResolverConfig) -> String {
    let ctx = ServiceContext::replaying(path).unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    runtime.block_on(ShareLinkResolver::new(&ctx, config).resolve(PAGE))
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn replayed_session_resolves_identically() {
    let dir = scratch("cshlink_record_replay_test");
    let cassette_path = dir.join("roundtrip.cassette.yaml");

    let mut recorder = CassetteRecorder::new(&cassette_path, "roundtrip-test");
    recorder.set_page_url(PAGE);
    // Discovery: the content-root candidate answers first.
    recorder.record("http", "get", json!({"url": MANIFEST_URL}), ok(200, ""));
    // Manifest lookup: cache stamp, then the document itself.
    recorder.record("clock", "now", json!(null), json!("2025-03-15T14:30:00Z"));
    recorder.record("http", "get", json!({"url": MANIFEST_URL}), ok(200, MANIFEST));
    recorder.finish().expect("recording should succeed");

    let config = quick_config();
    let first = resolve(&cassette_path, &config);
    assert_eq!(first, "https://h/Docs/v1/Default.htm#cshid=TOPIC_1");

    let second = resolve(&cassette_path, &config);
    assert_eq!(first, second, "determinism: replays differ");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn recorded_timeout_replays_as_timeout() {
    let dir = scratch("cshlink_record_replay_timeout_test");
    let cassette_path = dir.join("timeout.cassette.yaml");

    let mut recorder = CassetteRecorder::new(&cassette_path, "timeout-test");
    recorder.record("http", "get", json!({"url": MANIFEST_URL}), json!("cancelled"));
    recorder.record(
        "http",
        "get",
        json!({"url": "https://h/Docs/v1/Content/Data/Alias.xml"}),
        json!({"err": {"Transport": "connection refused"}}),
    );
    recorder.record("http", "get", json!({"url": "https://h/Docs/Data/Alias.xml"}), ok(404, ""));
    recorder.record("http", "get", json!({"url": "https://h/Data/Alias.xml"}), ok(200, ""));
    recorder.record("clock", "now", json!(null), json!("2025-03-15T14:30:00Z"));
    recorder.record("http", "get", json!({"url": "https://h/Data/Alias.xml"}), ok(200, MANIFEST));
    recorder.finish().unwrap();

    let config = ResolverConfig { probe_timeout_ms: 20, ..quick_config() };
    // Base is the site root, so the relative target keeps its folders and
    // only the file-name key matches; the link is built from the root.
    assert_eq!(resolve(&cassette_path, &config), "https://h/Default.htm#cshid=TOPIC_1");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn failed_manifest_replays_as_stripped_url() {
    let dir = scratch("cshlink_record_replay_fallback_test");
    let cassette_path = dir.join("fallback.cassette.yaml");

    let mut recorder = CassetteRecorder::new(&cassette_path, "fallback-test");
    recorder.record("http", "get", json!({"url": MANIFEST_URL}), ok(200, ""));
    recorder.record("clock", "now", json!(null), json!("2025-03-15T14:30:00Z"));
    recorder.record("http", "get", json!({"url": MANIFEST_URL}), ok(500, "oops"));
    recorder.finish().unwrap();

    assert_eq!(resolve(&cassette_path, &quick_config()), "https://h/Docs/v1/Content/topic.htm");

    let _ = std::fs::remove_dir_all(&dir);
}
