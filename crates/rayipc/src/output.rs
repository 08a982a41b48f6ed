use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use rayipc_value::{Table as ValueTable, Value};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ValueOutput<'a> {
    #[serde(rename = "type")]
    type_name: &'static str,
    value: &'a Value,
}

pub fn print_value(value: &Value, format: OutputFormat) {
    println!("{}", render_value(value, format));
}

pub fn render_value(value: &Value, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&ValueOutput {
            type_name: value.type_name(),
            value,
        }),
        OutputFormat::Table => match value {
            Value::Table(table) => value_table(table).to_string(),
            _ => {
                let mut table = new_table(vec!["TYPE", "VALUE"]);
                table.add_row(vec![value.type_name().to_string(), value.to_string()]);
                table.to_string()
            }
        },
        OutputFormat::Pretty => value.to_string(),
    }
}

/// Print a flat record: JSON object, two-column table, or `key: value` lines.
pub fn print_record<T: Serialize>(record: &T, rows: &[(&str, String)], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", to_json(record)),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            for (key, value) in rows {
                table.add_row(vec![key.to_string(), value.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (key, value) in rows {
                println!("{key}: {value}");
            }
        }
    }
}

fn value_table(source: &ValueTable) -> Table {
    let mut table = new_table(source.column_names().map(str::to_string).collect());
    for row in 0..source.row_count() {
        table.add_row(
            source
                .columns
                .iter()
                .map(|column| {
                    column
                        .data
                        .get(row)
                        .map(|cell| cell.to_string())
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>(),
        );
    }
    table
}

fn new_table<H: Into<comfy_table::Cell>>(header: Vec<H>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}
