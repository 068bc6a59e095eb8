use std::{collections::BTreeMap, path::Path};

use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use peversion::{StringField, VersionInfo};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Print `data` as JSON (if `--json`) or call `display_fn` for human-readable output.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    display_fn: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if opts.json {
        let json = serde_json::to_string_pretty(data)?;
        println!("{json}");
    } else {
        display_fn(data);
    }
    Ok(())
}

/// Version information of one file, as printed.
#[derive(Debug, Serialize)]
pub struct Report {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, String>,
}

impl Report {
    pub fn new(path: &Path, info: VersionInfo) -> Self {
        Report {
            file: path.display().to_string(),
            file_description: info.file_description,
            file_version: info.file_version,
            product_version: info.product_version,
            product_name: info.product_name,
            internal_name: info.internal_name,
            legal_copyright: info.legal_copyright,
            original_filename: info.original_filename,
            comments: info.comments,
            values: info.values,
        }
    }

    /// Recognised fields in a fixed order, as `(key, value)`.
    fn fields(&self) -> Vec<(StringField, &str)> {
        [
            (StringField::FileDescription, &self.file_description),
            (StringField::FileVersion, &self.file_version),
            (StringField::ProductVersion, &self.product_version),
            (StringField::ProductName, &self.product_name),
            (StringField::InternalName, &self.internal_name),
            (StringField::LegalCopyright, &self.legal_copyright),
            (StringField::OriginalFilename, &self.original_filename),
            (StringField::Comments, &self.comments),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|value| (field, value)))
        .collect()
    }

    pub fn print(&self) {
        println!("File: {}", self.file);

        let fields = self.fields();
        if !fields.is_empty() {
            let mut tw = TabWriter::new(vec!["Field", "Value"]);
            for (field, value) in fields {
                tw.row(vec![format!("{field}:"), value.to_string()]);
            }
            tw.print_body();
        }

        // Container blocks such as StringFileInfo carry no value
        let values: Vec<_> = self.values.iter().filter(|(_, v)| !v.is_empty()).collect();
        if !values.is_empty() {
            println!("\nOther values:");
            let mut tw = TabWriter::new(vec!["Key", "Value"]).indent("  ");
            for (key, value) in values {
                tw.row(vec![key.clone(), value.clone()]);
            }
            tw.print();
        }
    }
}

/// Tabular writer backed by `comfy-table` for dynamically-aligned CLI output.
///
/// Columns are sized to the widest entry, separated by whitespace only.
pub struct TabWriter {
    table: Table,
    indent: String,
}

impl TabWriter {
    /// Create a new `TabWriter` with the given left-aligned columns.
    pub fn new(columns: Vec<&str>) -> Self {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled);

        table.set_header(columns.clone());

        // First column: no left padding. Last column: no right padding.
        let last = columns.len().saturating_sub(1);
        for i in 0..columns.len() {
            if let Some(col) = table.column_mut(i) {
                col.set_cell_alignment(CellAlignment::Left);
                let pad_left = if i == 0 { 0 } else { 1 };
                let pad_right = if i == last { 0 } else { 1 };
                col.set_padding((pad_left, pad_right));
            }
        }

        Self {
            table,
            indent: String::new(),
        }
    }

    /// Set the indent prefix for every line.
    pub fn indent(mut self, prefix: &str) -> Self {
        self.indent = prefix.to_string();
        self
    }

    /// Add a row. Values are given in column order.
    pub fn row(&mut self, values: Vec<String>) {
        self.table.add_row(values);
    }

    /// Print the table, header included.
    pub fn print(&self) {
        self.print_lines(0);
    }

    /// Print the rows without the header line.
    pub fn print_body(&self) {
        self.print_lines(1);
    }

    fn print_lines(&self, skip: usize) {
        let output = self.table.to_string();
        for line in output.lines().skip(skip) {
            println!("{}{}", self.indent, line.trim_end());
        }
    }
}
