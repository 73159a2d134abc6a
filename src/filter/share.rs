//! Shareable filter encoding.
//!
//! Conditions are reduced to `{f, o, v}` triples, serialized as JSON and
//! base64 encoded so they fit in a link's `f` query parameter. Decoding never
//! fails: anything unreadable is an empty condition list.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::filter::condition::{new_condition_id, Condition, Field, Operator};
use crate::logging::structured::LogContext;
use crate::log_warn;

/// Query parameter that carries the encoded conditions.
pub const SHARE_PARAM: &str = "f";

#[derive(Debug, Serialize, Deserialize)]
struct SharedCondition {
    f: Field,
    o: Operator,
    #[serde(default)]
    v: String,
}

/// Encode conditions. Returns `None` for an empty list so the link carries
/// no parameter at all.
pub fn encode_conditions(conditions: &[Condition]) -> Option<String> {
    if conditions.is_empty() {
        return None;
    }

    let triples: Vec<SharedCondition> = conditions
        .iter()
        .map(|c| SharedCondition {
            f: c.field,
            o: c.operator,
            v: c.value.clone(),
        })
        .collect();

    let json = serde_json::to_string(&triples).ok()?;
    Some(general_purpose::URL_SAFE_NO_PAD.encode(json))
}

/// Decode conditions, assigning each a fresh id.
pub fn decode_conditions(encoded: Option<&str>, ctx: &LogContext) -> Vec<Condition> {
    let encoded = match encoded.map(str::trim) {
        Some(e) if !e.is_empty() => e,
        _ => return Vec::new(),
    };

    // Try URL-safe first, then standard base64
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(encoded)
        .or_else(|_| general_purpose::URL_SAFE.decode(encoded))
        .or_else(|_| general_purpose::STANDARD.decode(encoded));

    let bytes = match bytes {
        Ok(b) => b,
        Err(e) => {
            log_warn!(ctx, "SHARE_DECODE_FAILED", stage = "base64", error = e.to_string());
            return Vec::new();
        }
    };

    match serde_json::from_slice::<Vec<SharedCondition>>(&bytes) {
        Ok(triples) => triples
            .into_iter()
            .map(|t| Condition {
                id: new_condition_id(),
                field: t.f,
                operator: t.o,
                value: t.v,
            })
            .collect(),
        Err(e) => {
            log_warn!(ctx, "SHARE_DECODE_FAILED", stage = "json", error = e.to_string());
            Vec::new()
        }
    }
}

/// Build the query string for a shareable link, e.g. `f=W3siZiI6...`.
pub fn share_query(conditions: &[Condition]) -> Option<String> {
    encode_conditions(conditions).map(|encoded| format!("{}={}", SHARE_PARAM, encoded))
}

/// Read conditions from a link query string (leading `?` optional).
///
/// The value is percent-decoded first. Form decoding turns `+` into a space
/// and base64 never contains spaces, so spaces are mapped back to `+`.
pub fn conditions_from_query(query: &str, ctx: &LogContext) -> Vec<Condition> {
    let param = url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == SHARE_PARAM)
        .map(|(_, value)| value.replace(' ', "+"));

    decode_conditions(param.as_deref(), ctx)
}
