use anyhow::Result;
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::ledger::compute::format_currency;
use crate::ledger::snapshot::Snapshot;

/// Renders a submitted snapshot as a Markdown invoice preview
pub struct InvoicePreview {
    output_path: String,
}

impl InvoicePreview {
    pub fn new(output_path: &str) -> Result<Self> {
        // Create the parent directory if it doesn't exist
        if let Some(parent) = Path::new(output_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            output_path: output_path.to_string(),
        })
    }

    /// Write the preview for `snapshot` and return the path it was written to
    pub fn generate(&self, snapshot: &Snapshot, prepared_on: NaiveDate) -> Result<String> {
        let markdown = render_markdown(snapshot, prepared_on);

        let mut file = File::create(&self.output_path)?;
        file.write_all(markdown.as_bytes())?;

        Ok(self.output_path.clone())
    }
}

/// Markdown body: header, item table and the grand total
pub fn render_markdown(snapshot: &Snapshot, prepared_on: NaiveDate) -> String {
    let mut content = String::new();

    content.push_str("# Invoice\n");
    content.push_str(&format!("Prepared on {}\n\n", prepared_on.format("%m/%d/%Y")));

    content.push_str("| Item/Service | Quantity | Unit Price | Total |\n");
    content.push_str("|:---|---:|---:|---:|\n");

    for item in snapshot.items() {
        content.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(&item.name),
            item.quantity,
            format_currency(item.unit_price),
            format_currency(item.total),
        ));
    }

    content.push('\n');
    content.push_str(&format!("**TOTAL: {}**\n", format_currency(snapshot.total())));

    content
}

// Pipes would otherwise split the table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
