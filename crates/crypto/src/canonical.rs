use serde::Serialize;

/// Canonicalize any serializable value to stable JSON bytes: mapping
/// keys sorted lexicographically, no insignificant whitespace. Relies
/// on `serde_json::Value`'s default (non-`preserve_order`) map
/// representation being a `BTreeMap`.
///
/// Shared by block hashing and signed-message verification so both use
/// the same notion of "canonical bytes" (spec §6).
pub fn canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    serde_json::to_vec(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_keys_and_drops_whitespace() {
        let value = json!({"b": 1, "a": 2});
        let bytes = canonical_json_bytes(&value).unwrap();
        assert_eq!(bytes, br#"{"a":2,"b":1}"#);
    }
}
