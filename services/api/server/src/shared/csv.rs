//! Renders serialized records as a CSV document with a fixed column order.
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

const DELIMITER: char = ',';
const QUOTE: char = '"';

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("record could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("record did not serialize to a JSON object")]
    NotAnObject,
}

/// Projects `records` onto `fields`, one row per record after a header row.
///
/// Missing and `null` values render as empty cells. Rows are separated by
/// `\n` with no trailing newline, so an empty input yields the header alone.
pub fn project<T: Serialize>(
    records: &[T],
    fields: &[&str],
) -> Result<String, CsvError> {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        fields
            .iter()
            .map(|field| escape(field))
            .collect::<Vec<_>>()
            .join(&DELIMITER.to_string()),
    );

    for record in records {
        let value = serde_json::to_value(record)?;
        let object = value.as_object().ok_or(CsvError::NotAnObject)?;

        let row = fields
            .iter()
            .map(|field| object.get(*field).map(format_value).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(&DELIMITER.to_string());
        lines.push(row);
    }

    Ok(lines.join("\n"))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => escape(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => escape(&nested.to_string()),
    }
}

fn escape(s: &str) -> String {
    if s.contains([DELIMITER, QUOTE, '\n', '\r']) {
        format!("{QUOTE}{}{QUOTE}", s.replace(QUOTE, "\"\""))
    } else {
        s.to_string()
    }
}
