use crate::errors::CarparkResult;
use crate::manager::StorageManager;
use crate::model::ExportKind;
use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;

/// How CSV column headers are mapped to record fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CsvKeyMapping {
    /// Each header reads the field it names.
    #[default]
    Explicit,
    /// The field name is the header lower-cased with spaces removed. Headers
    /// that do not match a stored field name (e.g. `Vehicle Registration`)
    /// produce blank cells.
    Derived,
}

const GUEST_COLUMNS: [(&str, &str); 7] = [
    ("ID", "id"),
    ("Name", "name"),
    ("Email", "email"),
    ("Vehicle Registration", "vehicleReg"),
    ("Room Number", "roomNumber"),
    ("Registered At", "registeredAt"),
    ("Status", "status"),
];

const EMAIL_COLUMNS: [(&str, &str); 5] = [
    ("ID", "id"),
    ("Subject", "subject"),
    ("Recipients", "recipients"),
    ("Sent At", "sentAt"),
    ("Status", "status"),
];

impl StorageManager {
    /// Renders a collection as CSV: a header row, then one row per record in
    /// stored order, every cell double-quoted, rows joined by `\n`.
    pub fn export_to_csv(&self, kind: ExportKind) -> CarparkResult<String> {
        let mapping = self.config().csv_key_mapping();
        match kind {
            ExportKind::Guests => to_csv(&self.get_guests()?, &GUEST_COLUMNS, mapping),
            ExportKind::Emails => to_csv(&self.get_emails()?, &EMAIL_COLUMNS, mapping),
        }
    }

    /// Like `export_to_csv`, selecting the collection by name. Returns `None`
    /// for anything other than `guests` or `emails`.
    pub fn export_named(&self, kind: &str) -> CarparkResult<Option<String>> {
        match kind.parse::<ExportKind>() {
            Ok(kind) => self.export_to_csv(kind).map(Some),
            Err(_) => {
                log::debug!("Unknown export type {}", kind);
                Ok(None)
            }
        }
    }
}

fn to_csv<T: Serialize>(
    records: &[T],
    columns: &[(&str, &str)],
    mapping: CsvKeyMapping,
) -> CarparkResult<String> {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(columns.iter().map(|(header, _)| *header).join(","));

    for record in records {
        let value = serde_json::to_value(record)?;
        let row = columns
            .iter()
            .map(|(header, field)| {
                let cell = match mapping {
                    CsvKeyMapping::Explicit => value.get(*field),
                    CsvKeyMapping::Derived => value.get(derived_key(header).as_str()),
                };
                quote(&cell.map(render_cell).unwrap_or_default())
            })
            .join(",");
        rows.push(row);
    }
    Ok(rows.join("\n"))
}

fn derived_key(header: &str) -> String {
    header.to_lowercase().replace(' ', "")
}

// false, zero, empty and null render as a blank cell
fn render_cell(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(number) => {
            if number.as_f64() == Some(0.0) {
                String::new()
            } else {
                number.to_string()
            }
        }
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(render_item).join(","),
        Value::Object(_) => value.to_string(),
    }
}

// list elements render like cells, except that false and 0 are kept
fn render_item(value: &Value) -> String {
    match value {
        Value::Bool(false) => "false".to_string(),
        Value::Number(number) => number.to_string(),
        other => render_cell(other),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}
