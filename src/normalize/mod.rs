//! Response normalization into a flat list of [`NormalizedRecord`]s.
//!
//! Endpoints disagree on nesting: some return a flat list of entities, others
//! return one list per submitted query. The normalizer removes that extra
//! level, drops elements that are not JSON objects, applies the caller's
//! result cap and wraps each entity in a record. Nested collections such as
//! `reviews_data` and `photos_data` are left untouched.
//!
//! Nothing here fails: shapes that do not match degrade to fewer (or zero)
//! records.

use serde_json::Value;

use crate::client::Payload;
use crate::models::{NormalizedRecord, Operation, ResponseShape};

/// Identity field of an async job envelope
const JOB_IDENTITY_FIELD: &str = "id";

/// Normalize a payload produced for `operation`
///
/// An async job envelope becomes a single record. A synchronous payload is
/// split into per-query groups according to the operation's
/// [`ResponseShape`]; each group is truncated to `limit` entries and the
/// groups are concatenated in query order.
pub fn normalize(
    payload: Payload,
    operation: Operation,
    limit: Option<usize>,
) -> Vec<NormalizedRecord> {
    match payload {
        Payload::Job(Value::Object(envelope)) => {
            vec![NormalizedRecord::new(envelope, Some(JOB_IDENTITY_FIELD))]
        }
        Payload::Job(other) => {
            tracing::warn!(operation = %operation, "async response is not an object: {}", other);
            Vec::new()
        }
        Payload::Data(Value::Array(items)) => split_groups(items, operation.response_shape())
            .into_iter()
            .flat_map(|group| truncate(into_records(group, operation.identity_field()), limit))
            .collect(),
        Payload::Data(Value::Null) => Vec::new(),
        Payload::Data(other) => {
            tracing::warn!(operation = %operation, "'data' is not a list: {}", other);
            Vec::new()
        }
    }
}

/// Split a synchronous payload into its per-query groups
///
/// With [`ResponseShape::GroupedPerQuery`], or [`ResponseShape::Detect`] when
/// the first element is a list, every list element is one group and each run
/// of non-list elements between them forms a group of its own. Otherwise the
/// whole payload is a single group.
pub fn split_groups(items: Vec<Value>, shape: ResponseShape) -> Vec<Vec<Value>> {
    let grouped = match shape {
        ResponseShape::GroupedPerQuery => true,
        ResponseShape::Detect => matches!(items.first(), Some(Value::Array(_))),
    };
    if !grouped {
        return vec![items];
    }

    let mut groups = Vec::new();
    let mut loose = Vec::new();
    for item in items {
        match item {
            Value::Array(group) => {
                if !loose.is_empty() {
                    groups.push(std::mem::take(&mut loose));
                }
                groups.push(group);
            }
            other => loose.push(other),
        }
    }
    if !loose.is_empty() {
        groups.push(loose);
    }
    groups
}

/// Keep the first `limit` entries
pub fn truncate<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

fn into_records(
    entities: Vec<Value>,
    identity_field: Option<&'static str>,
) -> Vec<NormalizedRecord> {
    let total = entities.len();
    let records: Vec<NormalizedRecord> = entities
        .into_iter()
        .filter_map(|entity| match entity {
            Value::Object(fields) => Some(NormalizedRecord::new(fields, identity_field)),
            _ => None,
        })
        .collect();

    let skipped = total - records.len();
    if skipped > 0 {
        tracing::warn!("skipped {} malformed entries in response", skipped);
    }

    records
}

/// Records back to a JSON list, e.g. for tool output
pub fn records_to_value(records: &[NormalizedRecord]) -> Value {
    Value::Array(
        records
            .iter()
            .map(|record| Value::Object(record.fields().clone()))
            .collect(),
    )
}
