//! Terminal and JSON output
//!
//! With `--json` every command prints exactly one JSON document on stdout:
//! `{"status": "success", "data": ...}` on success. Errors are printed by
//! `main` in the same envelope. Warnings go to stderr in both modes.

use console::style;
use kissan_imagery::MapView;
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self { format: if json { OutputFormat::Json } else { OutputFormat::Human } }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Confirmation line for a completed write
    pub fn success(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => println!("{} {}", style("✓").green().bold(), message),
            OutputFormat::Json => {
                println!("{}", pretty(&json!({ "status": "success", "message": message.to_string() })))
            }
        }
    }

    pub fn warning(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", style("⚠").yellow().bold(), message),
            OutputFormat::Json => {
                eprintln!("{}", pretty(&json!({ "status": "warning", "message": message.to_string() })))
            }
        }
    }

    /// Farm records, tool definitions and config rows: a rounded table for
    /// people, the same rows as a `data` array in JSON mode
    pub fn table<T: Tabled + Serialize>(&self, rows: Vec<T>) -> anyhow::Result<()> {
        if self.is_json() {
            return self.result(rows);
        }
        if rows.is_empty() {
            println!("{}", style("(no data)").dim());
        } else {
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);
        }
        Ok(())
    }

    /// Pretty JSON without the envelope
    pub fn data<T: Serialize>(&self, data: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(data)?);
        Ok(())
    }

    /// A command's result, wrapped in the success envelope in JSON mode
    pub fn result<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Human => self.data(&data),
            OutputFormat::Json => {
                let output = json!({ "status": "success", "data": data });
                println!("{}", serde_json::to_string_pretty(&output)?);
                Ok(())
            }
        }
    }

    /// Vegetation index map for people: the ASCII grid, then one line per statistic
    pub fn map(&self, map: &MapView, utm_epsg: Option<u32>) {
        println!("{}", map.render_ascii());
        let (rows, cols) = map.shape();
        self.kv("Image", &map.image_id);
        self.kv("Grid", format!("{} x {}", rows, cols));
        self.kv(
            "Pixels in plot",
            format!("{} of {}", map.stats.valid_pixels, map.stats.total_pixels),
        );
        if let (Some(min), Some(mean), Some(max)) = (map.stats.min, map.stats.mean, map.stats.max) {
            self.kv("Min / mean / max", format!("{:.3} / {:.3} / {:.3}", min, mean, max));
        }
        if let Some(epsg) = utm_epsg {
            self.kv("UTM zone", format!("EPSG:{}", epsg));
        }
    }

    /// A tool's JSON output; an image tool's rendered `map` is printed as-is
    /// ahead of the remaining fields
    pub fn tool_output(&self, output: Value) -> anyhow::Result<()> {
        if self.is_json() {
            return self.result(output);
        }
        let mut fields = output;
        if let Some(Value::String(map)) = fields.as_object_mut().and_then(|o| o.remove("map")) {
            println!("{}", map);
        }
        self.data(&fields)
    }

    pub fn section(&self, title: impl Display) {
        if !self.is_json() {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    fn kv(&self, key: impl Display, value: impl Display) {
        println!("{}: {}", style(key).bold(), value);
    }
}
