// ABOUTME: JSON normalizer decoding nested objects straight into the value model
// ABOUTME: Objects become records, arrays become lists, primitives become scalars

use tracing::debug;

use super::error::Result;
use crate::value::Value;

/// Decode a complete JSON document. Any root shape is accepted.
pub fn parse_json(input: &[u8]) -> Result<Value> {
    let document: Value = serde_json::from_slice(input)?;
    debug!("JSON input normalized into a {} document", document.type_name());
    Ok(document)
}
