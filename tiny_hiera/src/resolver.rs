//! Resolution of a hierarchy document against a set of facts.
//!
//! A call moves through fixed phases: the document is normalised and
//! validated, the base data is expanded into an accumulator, then each
//! `hierarchy.order` entry is expanded into an override key and, when it
//! selects an existing fragment, merged in. `first` merging stops at the
//! first applied fragment; `deep` merging folds every one.

use serde_json::Value;

use crate::HieraResult;
use crate::decode::decode;
use crate::error::{DocumentFormat, HieraError};
use crate::hierarchy::{Hierarchy, MergeMode};
use crate::isolate::{Mapping, owned_mapping, owned_section, section};
use crate::logger::ResolveLogger;
use crate::merge::{deep_merge, shallow_merge};
use crate::normalise::normalise_numbers;
use crate::options::ResolveOptions;
use crate::query::FactSnapshot;
use crate::template::{expand_mapping, expand_string};

/// Section holding the override fragments.
const OVERRIDES_KEY: &str = "overrides";

/// Resolve an already decoded document.
///
/// The document and facts are only borrowed; the returned mapping owns all
/// of its data.
///
/// # Errors
///
/// Returns [`HieraError::Schema`] for a malformed document,
/// [`HieraError::Eval`] when an expression fails and
/// [`HieraError::MergeMode`] when a fragment is applied under an unknown
/// merge selector.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tiny_hiera::{ResolveOptions, resolve};
///
/// let document = json!({
///     "hierarchy": {"order": ["env:{{ lookup('env') }}"], "merge": "deep"},
///     "data": {"replicas": 1},
///     "overrides": {"env:prod": {"replicas": 3}},
/// });
/// let facts = json!({"env": "prod"});
/// let resolved = resolve(
///     &document,
///     facts.as_object().expect("object"),
///     &ResolveOptions::default(),
///     None,
/// )?;
/// assert_eq!(resolved["replicas"], json!(3));
/// # Ok::<(), std::sync::Arc<tiny_hiera::HieraError>>(())
/// ```
pub fn resolve(
    document: &Value,
    facts: &Mapping,
    options: &ResolveOptions,
    logger: Option<&dyn ResolveLogger>,
) -> HieraResult<Mapping> {
    let Value::Object(root) = normalise_numbers(document) else {
        return Err(HieraError::schema_arc("root document must be a map"));
    };
    let hierarchy = Hierarchy::parse(&root)?;
    let snapshot = FactSnapshot::new(facts);
    let data_key = options.data_key.as_str();

    let base = owned_section(&root, data_key);
    let has_data = base.is_some();
    let mut accumulator = base
        .map(|data| expand_mapping(data, &snapshot))
        .transpose()?
        .unwrap_or_default();
    let overrides = section(&root, OVERRIDES_KEY);

    for entry in &hierarchy.order {
        let expansion = expand_string(entry, &snapshot)?;
        if !expansion.matched {
            tracing::trace!(entry = %entry, "hierarchy entry did not match; skipping");
            continue;
        }
        let key = expansion.text;
        if let Some(log) = logger {
            log.debug("Evaluating override", &[("override", key.as_str())]);
        }
        if key == data_key && has_data {
            tracing::trace!(key = %key, "entry resolves to the base data section; skipping");
            continue;
        }
        let Some(raw) = overrides.and_then(|map| owned_mapping(map.get(&key))) else {
            tracing::trace!(key = %key, "no override fragment for key; skipping");
            continue;
        };
        let fragment = expand_mapping(raw, &snapshot)?;
        match hierarchy.merge_mode()? {
            MergeMode::Deep => {
                tracing::trace!(key = %key, "deep merging override fragment");
                accumulator = deep_merge(accumulator, fragment);
            }
            MergeMode::First => {
                tracing::trace!(key = %key, "applying first matching override fragment");
                return Ok(shallow_merge(accumulator, fragment));
            }
        }
    }
    Ok(accumulator)
}

/// Decode a YAML document and resolve it.
///
/// # Errors
///
/// Returns [`HieraError::Parse`] when the bytes are not valid YAML, or any
/// error [`resolve`] reports.
pub fn resolve_yaml(
    bytes: &[u8],
    facts: &Mapping,
    options: &ResolveOptions,
    logger: Option<&dyn ResolveLogger>,
) -> HieraResult<Mapping> {
    resolve_as(bytes, DocumentFormat::Yaml, facts, options, logger)
}

/// Decode a JSON document and resolve it.
///
/// # Errors
///
/// Returns [`HieraError::Parse`] when the bytes are not valid JSON, or any
/// error [`resolve`] reports.
pub fn resolve_json(
    bytes: &[u8],
    facts: &Mapping,
    options: &ResolveOptions,
    logger: Option<&dyn ResolveLogger>,
) -> HieraResult<Mapping> {
    resolve_as(bytes, DocumentFormat::Json, facts, options, logger)
}

/// Decode a document in whichever format it appears to be, then resolve it.
///
/// See [`DocumentFormat::detect`] for the detection rule.
///
/// # Errors
///
/// Returns [`HieraError::Parse`] when decoding fails, or any error
/// [`resolve`] reports.
pub fn resolve_bytes(
    bytes: &[u8],
    facts: &Mapping,
    options: &ResolveOptions,
    logger: Option<&dyn ResolveLogger>,
) -> HieraResult<Mapping> {
    resolve_as(bytes, DocumentFormat::detect(bytes), facts, options, logger)
}

fn resolve_as(
    bytes: &[u8],
    format: DocumentFormat,
    facts: &Mapping,
    options: &ResolveOptions,
    logger: Option<&dyn ResolveLogger>,
) -> HieraResult<Mapping> {
    let document = decode(bytes, format)?;
    resolve(&document, facts, options, logger)
}
