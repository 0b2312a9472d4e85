// crates/tessera-cli/src/output.rs
//
// Output formatting utilities for the Tessera CLI.
// Supports table and JSON output modes.

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed table output (default).
    Table,
    /// JSON output for machine consumption.
    Json,
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

/// Print rows in the requested format.
pub fn print_rows<T: Tabled + Serialize>(format: OutputFormat, rows: &[T]) {
    match format {
        OutputFormat::Table => println!("{}", format_table(rows)),
        OutputFormat::Json => println!("{}", format_json(&rows)),
    }
}

/// A single key/value line for summary tables.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct Field {
    #[tabled(rename = "Field")]
    pub name: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl Field {
    pub fn new(name: &str, value: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Print key/value pairs as a two-column table, or as one JSON object.
pub fn print_fields(format: OutputFormat, fields: &[Field]) {
    match format {
        OutputFormat::Table => println!("{}", format_table(fields)),
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = fields
                .iter()
                .map(|f| (f.name.clone(), serde_json::Value::String(f.value.clone())))
                .collect();
            println!("{}", format_json(&map));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_contains_values() {
        let fields = vec![Field::new("principal", "1000 TES"), Field::new("state", "Locked")];
        let table = format_table(&fields);
        assert!(table.contains("principal"));
        assert!(table.contains("1000 TES"));
        assert!(table.contains("Locked"));
    }

    #[test]
    fn test_json_output() {
        let fields = vec![Field::new("a", 1)];
        let json = format_json(&fields);
        assert!(json.contains("\"name\": \"a\""));
        assert!(json.contains("\"value\": \"1\""));
    }
}
