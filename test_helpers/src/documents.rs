//! Hierarchy documents and fact sets shared by the test suites.

use anyhow::{Result, anyhow};
use serde_json::{Map, Value, json};

/// Deep-merge document where the role override is applied last.
pub const DEEP_ENV_THEN_ROLE: &str = r#"
hierarchy:
  order:
    - "env:{{ lookup('env') }}"
    - "role:{{ lookup('role') }}"
  merge: deep
data:
  log_level: INFO
overrides:
  "env:prod":
    log_level: WARN
  "role:web":
    log_level: TRACE
"#;

/// First-merge document where the role override wins immediately.
pub const FIRST_ROLE_THEN_ENV: &str = r#"
hierarchy:
  order:
    - "role:{{ lookup('role') }}"
    - "env:{{ lookup('env') }}"
  merge: first
data:
  log_level: INFO
overrides:
  "env:prod":
    log_level: WARN
    only_env: true
  "role:web":
    log_level: TRACE
"#;

/// Deep-merge document concatenating package lists.
pub const PACKAGE_LISTS: &str = r#"
hierarchy:
  order:
    - "role:{{ lookup('role') }}"
  merge: deep
data:
  packages:
    - a
overrides:
  "role:web":
    packages:
      - b
"#;

/// JSON document exercising typed placeholders in base data and overrides.
pub const TYPED_JSON: &str = r#"{
  "hierarchy": {"order": ["node:{{ lookup('node.fqdn') }}", "common"], "merge": "deep"},
  "data": {
    "port": "{{ lookup('port') }}",
    "owner": "{{ lookup('owner', 'ops') }}",
    "banner": "{{ lookup('node.fqdn') }}:{{ lookup('port') }}"
  },
  "overrides": {
    "node:web01.example.net": {"replicas": 2.0, "tags": ["edge"]},
    "common": {"tags": ["base"], "ratio": 0.5}
  }
}"#;

/// The facts used with every shared document.
#[must_use]
pub fn standard_facts() -> Value {
    json!({
        "env": "prod",
        "role": "web",
        "port": 8080,
        "node": {"fqdn": "web01.example.net"},
    })
}

/// Convert a JSON object into the mapping type resolvers accept.
///
/// # Errors
///
/// Returns an error when `value` is not an object.
pub fn mapping(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("expected a JSON object, got {other}")),
    }
}
