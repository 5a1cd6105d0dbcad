//! JSONL trail operation envelope.
//!
//! Every persisted mutation is recorded as a `TrailOperation` in per-attempt
//! `{trail_dir}/{attempt_id}.jsonl` files, so an attempt's history can be read
//! back without the database.
//!
//! Old trail files without a `v` field deserialize with `v == 1` via
//! `#[serde(default)]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityType, TrailOp};

const fn default_trail_version() -> u32 {
    1
}

/// A single operation recorded in the JSONL trail.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrailOperation {
    /// Schema version. Defaults to 1 for old trails without this field.
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// ISO 8601 timestamp of the operation.
    pub ts: String,

    /// Attempt the operation belongs to. Also names the trail file.
    pub attempt: String,

    /// What kind of mutation this represents.
    pub op: TrailOp,

    /// Which entity type was affected.
    pub entity: EntityType,

    /// ID of the affected entity.
    pub id: String,

    /// Operation payload. Full entity for `Create`/`Append`/`Award`, changed
    /// fields for `Complete`.
    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_op_roundtrip() {
        let op = TrailOperation {
            v: 1,
            ts: "2026-02-08T12:00:00Z".to_string(),
            attempt: "att-a3f8b2c1".to_string(),
            op: TrailOp::Append,
            entity: EntityType::NotebookEntry,
            id: "nte-deadbeef".to_string(),
            data: serde_json::json!({"text": "solution turned pink"}),
        };

        let json = serde_json::to_string(&op).unwrap();
        let recovered: TrailOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, op);
    }

    #[test]
    fn trail_op_default_version() {
        let json = r#"{"ts":"2026-01-01T00:00:00Z","attempt":"att-00000000","op":"create","entity":"attempt","id":"att-00000000","data":{}}"#;
        let op: TrailOperation = serde_json::from_str(json).unwrap();
        assert_eq!(op.v, 1);
        assert_eq!(op.op, TrailOp::Create);
    }
}
