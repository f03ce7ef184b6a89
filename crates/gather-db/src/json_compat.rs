//! Defensive decoding for legacy document fields.
//!
//! Before per-member records existed, communities embedded their member list
//! in a `members` field. Depending on which client wrote the document, that
//! field holds a JSON array of UUID strings, a stringified copy of such an
//! array, or junk. These helpers normalize every shape to `Vec<Uuid>` without
//! ever failing a read.

use serde_json::Value;
use uuid::Uuid;

/// Decode a legacy embedded member list.
///
/// Arrays keep their valid UUID entries and drop the rest. Strings are parsed
/// as JSON and, when they contain an array, treated the same way. Every other
/// shape decodes to an empty list.
pub fn decode_member_list(value: &Value) -> Vec<Uuid> {
    match value {
        Value::Array(entries) => collect_uuids(entries),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(entries)) => collect_uuids(&entries),
            _ => {
                tracing::warn!("Legacy member list string did not parse as an array, reading as empty");
                Vec::new()
            }
        },
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(
                shape = %shape_of(other),
                "Legacy member list held an unexpected shape, reading as empty"
            );
            Vec::new()
        }
    }
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Encode a member list back into the canonical array-of-strings shape.
pub fn encode_member_list(members: &[Uuid]) -> Value {
    Value::Array(
        members
            .iter()
            .map(|id| Value::String(id.to_string()))
            .collect(),
    )
}

fn collect_uuids(entries: &[Value]) -> Vec<Uuid> {
    entries
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|s| Uuid::parse_str(s).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_plain_array() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let value = json!([a.to_string(), b.to_string()]);
        assert_eq!(decode_member_list(&value), vec![a, b]);
    }

    #[test]
    fn test_decodes_stringified_array() {
        let a = Uuid::now_v7();
        let value = json!(format!("[\"{a}\"]"));
        assert_eq!(decode_member_list(&value), vec![a]);
    }

    #[test]
    fn test_skips_invalid_entries() {
        let a = Uuid::now_v7();
        let value = json!([a.to_string(), "not-a-uuid", 42, null]);
        assert_eq!(decode_member_list(&value), vec![a]);
    }

    #[test]
    fn test_junk_decodes_to_empty() {
        assert!(decode_member_list(&Value::Null).is_empty());
        assert!(decode_member_list(&json!("not json")).is_empty());
        assert!(decode_member_list(&json!("{\"a\":1}")).is_empty());
        assert!(decode_member_list(&json!({ "members": [] })).is_empty());
        assert!(decode_member_list(&json!(17)).is_empty());
    }

    #[test]
    fn test_round_trips_canonical_shape() {
        let members = vec![Uuid::now_v7(), Uuid::now_v7()];
        let encoded = encode_member_list(&members);
        assert_eq!(decode_member_list(&encoded), members);
    }
}
