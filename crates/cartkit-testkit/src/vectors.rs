//! Golden stored payloads.
//!
//! Each vector is a string as it might sit under the cart key, with the cart
//! it must decode to (or the fact that it must be rejected). Payloads
//! written by earlier app builds must keep loading.

use cartkit_core::{codec, CartState};

/// Expected decoding of a golden payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// Decodes to these `(id, quantity)` pairs, in this order.
    Cart(&'static [(&'static str, u32)]),
    /// Must be rejected.
    Rejected,
}

/// A golden stored payload.
#[derive(Debug, Clone)]
pub struct GoldenPayload {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Raw stored value.
    pub payload: &'static str,
    pub expected: Expected,
}

/// Get all golden payloads.
pub fn all_payloads() -> Vec<GoldenPayload> {
    vec![
        GoldenPayload {
            name: "empty cart",
            payload: "[]",
            expected: Expected::Cart(&[]),
        },
        GoldenPayload {
            name: "single item with integer price",
            payload: r#"[{"id":"1","title":"Cadeira Rivatti","image_url":"https://cdn.example.com/cadeira.png","price":400,"quantity":1}]"#,
            expected: Expected::Cart(&[("1", 1)]),
        },
        GoldenPayload {
            name: "order is preserved",
            payload: r#"[
                {"id":"2","title":"Poltrona","image_url":"https://cdn.example.com/poltrona.png","price":1200.5,"quantity":2},
                {"id":"1","title":"Cadeira","image_url":"https://cdn.example.com/cadeira.png","price":400,"quantity":3}
            ]"#,
            expected: Expected::Cart(&[("2", 2), ("1", 3)]),
        },
        GoldenPayload {
            name: "unknown fields are ignored",
            payload: r#"[{"id":"9","title":"T","image_url":"u","price":1,"quantity":1,"color":"red"}]"#,
            expected: Expected::Cart(&[("9", 1)]),
        },
        GoldenPayload {
            name: "not json",
            payload: "undefined",
            expected: Expected::Rejected,
        },
        GoldenPayload {
            name: "object instead of array",
            payload: r#"{"id":"1","quantity":1}"#,
            expected: Expected::Rejected,
        },
        GoldenPayload {
            name: "missing quantity",
            payload: r#"[{"id":"1","title":"T","image_url":"u","price":1}]"#,
            expected: Expected::Rejected,
        },
        GoldenPayload {
            name: "zero quantity",
            payload: r#"[{"id":"1","title":"T","image_url":"u","price":1,"quantity":0}]"#,
            expected: Expected::Rejected,
        },
        GoldenPayload {
            name: "duplicate ids",
            payload: r#"[
                {"id":"1","title":"T","image_url":"u","price":1,"quantity":1},
                {"id":"1","title":"T","image_url":"u","price":1,"quantity":1}
            ]"#,
            expected: Expected::Rejected,
        },
    ]
}

/// Check a decoded cart against an expectation.
pub fn matches_expected(result: &Result<CartState, cartkit_core::CodecError>, expected: &Expected) -> bool {
    match (result, expected) {
        (Ok(state), Expected::Cart(pairs)) => {
            state.len() == pairs.len()
                && state
                    .iter()
                    .zip(pairs.iter())
                    .all(|(item, (id, qty))| item.id == *id && item.quantity == *qty)
        }
        (Err(_), Expected::Rejected) => true,
        _ => false,
    }
}

/// Verify all golden payloads decode as expected.
///
/// Returns the names of the vectors that failed.
pub fn verify_all_payloads() -> Result<(), Vec<&'static str>> {
    let failed: Vec<&'static str> = all_payloads()
        .iter()
        .filter(|v| !matches_expected(&codec::decode(v.payload), &v.expected))
        .map(|v| v.name)
        .collect();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(failed)
    }
}
