use std::io::Read;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Return the payload text; `-` reads all of stdin.
pub fn read_payload(raw: &str) -> anyhow::Result<String> {
    if raw != "-" {
        return Ok(raw.to_owned());
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read payload from stdin")?;
    Ok(buffer)
}

/// Parse a JSON array of records. A single object is treated as a
/// one-element batch.
pub fn parse_records<T>(json: &str, what: &str) -> anyhow::Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let value: Value =
        serde_json::from_str(json).with_context(|| format!("invalid {what} payload: not JSON"))?;
    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => anyhow::bail!("invalid {what} payload: expected an array or object, got {other}"),
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).with_context(|| format!("invalid {what}[{index}]"))
        })
        .collect()
}

/// Read then parse a payload argument.
pub fn load_records<T>(raw: &str, what: &str) -> anyhow::Result<Vec<T>>
where
    T: DeserializeOwned,
{
    parse_records(&read_payload(raw)?, what)
}
