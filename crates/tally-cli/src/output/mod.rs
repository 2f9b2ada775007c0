use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

pub use table::Table;

/// Render a serializable response to a string in the requested format.
///
/// Tables are derived from the JSON shape: objects become key/value rows
/// and arrays of objects become one row per element.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(json_table(&serde_json::to_value(value)?).render(options())),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Like [`output`], with a purpose-built table instead of the generic one.
pub fn output_with_table<T, F>(value: &T, format: OutputFormat, to_table: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> Table,
{
    if format == OutputFormat::Table {
        println!("{}", to_table(value).render(options()));
        return Ok(());
    }
    output(value, format)
}

fn options() -> table::TableOptions {
    let terminal = ui::terminal();
    table::TableOptions {
        max_width: terminal.width,
        color: terminal.color,
    }
}

fn json_table(value: &Value) -> Table {
    match value {
        Value::Object(map) => {
            let mut table = Table::new(["key", "value"]);
            for (key, value) in map {
                table.push(vec![key.clone(), cell(value)]);
            }
            table
        }
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
            let mut headers = Vec::<&str>::new();
            for key in items.iter().filter_map(Value::as_object).flat_map(|m| m.keys()) {
                if !headers.contains(&key.as_str()) {
                    headers.push(key.as_str());
                }
            }
            let mut table = Table::new(headers.iter().copied());
            for map in items.iter().filter_map(Value::as_object) {
                table.push(
                    headers
                        .iter()
                        .map(|header| map.get(*header).map_or_else(|| "-".into(), cell))
                        .collect(),
                );
            }
            table
        }
        Value::Array(items) => {
            let mut table = Table::new(["value"]);
            for item in items {
                table.push(vec![cell(item)]);
            }
            table
        }
        scalar => {
            let mut table = Table::new(["value"]);
            table.push(vec![cell(scalar)]);
            table
        }
    }
}

/// One table cell; nested structures are shown as compact JSON.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
