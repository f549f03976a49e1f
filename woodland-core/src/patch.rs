//! Partial updates from JSON-patch operations.
//!
//! Edits to a character or campaign are diffed into RFC 6902 operations by
//! an external utility. The server only accepts whole top-level fields, so the
//! operations are collapsed into the set of touched fields and their current
//! values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON-patch operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

/// One JSON-patch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
    pub op: PatchKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl PatchOp {
    pub fn new(op: PatchKind, path: impl Into<String>) -> Self {
        Self {
            op,
            path: path.into(),
            value: None,
            from: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// The top-level field this operation touches, if any.
    pub fn top_level_field(&self) -> Option<String> {
        let rest = self.path.strip_prefix('/')?;
        let segment = rest.split('/').next()?;
        if segment.is_empty() {
            return None;
        }
        Some(segment.replace("~1", "/").replace("~0", "~"))
    }
}

/// The fields to send for an update of the document with id `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialUpdate {
    pub id: String,
    pub fields: Map<String, Value>,
}

/// Top-level fields touched by `ops`, in first-seen order.
pub fn touched_fields(ops: &[PatchOp]) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for field in ops.iter().filter_map(PatchOp::top_level_field) {
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    fields
}

/// Collapse `ops` into the top-level fields of `base` that must be sent.
///
/// Returns `None` when there is nothing to send or `base` has no `_id`.
/// A field removed from `base` is sent as `null`.
pub fn partial_update(base: &Value, ops: &[PatchOp]) -> Option<PartialUpdate> {
    if ops.is_empty() {
        return None;
    }
    let id = base.get("_id")?.as_str()?.to_string();

    let fields = touched_fields(ops)
        .into_iter()
        .map(|field| {
            let value = base.get(&field).cloned().unwrap_or(Value::Null);
            (field, value)
        })
        .collect();

    Some(PartialUpdate { id, fields })
}
