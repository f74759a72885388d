//! Update masks derived from the request body.
//!
//! An update only touches the fields its caller sent. The set of sent fields
//! is read from the raw JSON body, mapped to field ids through the table the
//! generator emits for each update method, and stored in the object's
//! `fields` list before the backend sees it.

use serde_json::{Map, Value};

use crate::envelope::RegionObjFields;
use crate::error::GatewayError;

/// Fill the `fields` list of `wrapper` from the keys present in `body`.
///
/// `field_ids` pairs the dotted JSON path of every settable field with its
/// field id, in declaration order. Keys are matched ignoring case and
/// underscores; keys with no entry are ignored. An explicit non-empty
/// `fields` list in the request is kept as sent.
pub fn set_region_obj_fields<W: RegionObjFields>(
    body: &[u8],
    wrapper: &mut W,
    field_ids: &[(&str, &str)],
) -> Result<(), GatewayError> {
    if !wrapper.obj_fields().is_empty() {
        return Ok(());
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| GatewayError::BadRequest(e.to_string()))?;
    let Some(obj) = value.get(wrapper.obj_name()).and_then(Value::as_object) else {
        return Ok(());
    };

    let mut present = Vec::new();
    collect_paths(obj, "", &mut present);
    let fields = field_ids
        .iter()
        .filter(|(path, _)| present.contains(&normalize(path)))
        .map(|(_, id)| id.to_string())
        .collect();
    wrapper.set_obj_fields(fields);
    Ok(())
}

/// Dotted, normalized paths of every leaf under `obj`; the top level `fields` key is skipped.
fn collect_paths(obj: &Map<String, Value>, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in obj {
        let key = normalize(key);
        if prefix.is_empty() && key == "fields" {
            continue;
        }
        let path = if prefix.is_empty() { key } else { format!("{prefix}.{key}") };
        match value.as_object() {
            Some(inner) if !inner.is_empty() => collect_paths(inner, &path, out),
            _ => out.push(path),
        }
    }
}

fn normalize(path: &str) -> String {
    path.chars().filter(|c| *c != '_').flat_map(char::to_lowercase).collect()
}
