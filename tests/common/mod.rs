//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use serde_json::{json, Value};

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times — subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// The denormalized body a `GET /api/posts/{id}` answers with: the post record
/// plus the relation bundle for everything it references.
#[allow(dead_code)]
pub fn post_response() -> (Value, Value) {
    let post = json!({
        "id": 42,
        "title": "introducing the difference engine",
        "thumb": 7,
        "platform": 3,
        "source": null,
        "published": "1837-01-01T00:00:00Z",
        "updated": "1842-01-01T00:00:00Z",
    });
    let relations = json!({
        "authors": [
            {"id": 1, "name": "ada", "thumb": 7},
            {"id": 2, "name": "babbage", "thumb": null},
        ],
        "platforms": [{"id": 3, "name": "usenet"}],
        "tags": [{"id": 4, "name": "retro", "platform": 3}],
        "file_metas": [
            {"id": 7, "filename": "engine.png", "mime": "image/png", "post": 42},
            {"id": 8, "filename": "notes.pdf", "mime": "application/pdf", "post": 42},
        ],
    });
    (post, relations)
}
