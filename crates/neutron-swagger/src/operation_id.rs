//! Post-processing pass over `operationId` fields of the merged `paths`.
//!
//! Fragments are generated per module, so identical operation identifiers
//! (`Params`, `Query`, ...) routinely appear more than once in the merged
//! document and make documentation viewers group unrelated operations
//! together. The pass always reports those duplicates; whether they are also
//! rewritten is selected by [`OperationIdPolicy`].

use std::collections::BTreeMap;

use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::{Map, Value};
use tracing::warn;

/// Length of identifiers produced by [`OperationIdPolicy::Randomize`].
pub const RANDOM_OPERATION_ID_LEN: usize = 20;

const OPERATION_ID: &str = "operationId";

/// How the pass treats existing `operationId` values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OperationIdPolicy {
    /// Keep every identifier. Non-string identifiers are normalised to text:
    /// numbers as written, `True`/`False`/`None` for booleans and null, and
    /// compact JSON for arrays and objects.
    #[default]
    Preserve,
    /// Replace every identifier with a random alphanumeric string.
    Randomize,
}

/// Outcome of an operation id pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationIdPass {
    /// Number of operations carrying an `operationId`.
    pub operations: usize,
    /// Identifiers used by more than one operation before the pass, sorted.
    pub duplicates: Vec<String>,
}

/// Walk every path item and operation in `paths` and apply `policy` to its
/// `operationId`. Entries that are not JSON objects are left untouched.
pub fn apply_operation_ids(
    paths: &mut Map<String, Value>,
    policy: OperationIdPolicy,
) -> OperationIdPass {
    let mut rng = rand::rng();
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut operations = 0;

    for operation in operations_mut(paths) {
        let Some(id) = operation.get_mut(OPERATION_ID) else {
            continue;
        };
        operations += 1;
        let text = id_text(id);
        *seen.entry(text.clone()).or_default() += 1;
        *id = match policy {
            OperationIdPolicy::Preserve => Value::String(text),
            OperationIdPolicy::Randomize => Value::String(random_operation_id(&mut rng)),
        };
    }

    let mut duplicates = Vec::new();
    for (id, count) in seen {
        if count > 1 {
            warn!(operation_id = %id, count, "operation id shared by several operations");
            duplicates.push(id);
        }
    }

    OperationIdPass {
        operations,
        duplicates,
    }
}

fn operations_mut(
    paths: &mut Map<String, Value>,
) -> impl Iterator<Item = &mut Map<String, Value>> {
    paths
        .values_mut()
        .filter_map(Value::as_object_mut)
        .flat_map(|item| item.values_mut().filter_map(Value::as_object_mut))
}

fn id_text(id: &Value) -> String {
    match id {
        Value::String(text) => text.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

fn random_operation_id<R: Rng>(rng: &mut R) -> String {
    std::iter::repeat_with(|| rng.sample(Alphanumeric) as char)
        .take(RANDOM_OPERATION_ID_LEN)
        .collect()
}
