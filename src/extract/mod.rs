pub mod embedded;
pub mod scan;
pub mod structural;

use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// One inventory row, as field name → value. Both extraction modes produce
/// these; downstream code only cares about `name`, `genre` and a count field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Record {
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn name(&self) -> &str {
        self.get("name")
    }

    pub fn genre(&self) -> &str {
        self.get("genre")
    }

    /// The count column: `quantity` when the table has one, else `price`.
    pub fn count_text(&self) -> &str {
        let quantity = self.get("quantity");
        if !quantity.is_empty() {
            quantity
        } else {
            self.get("price")
        }
    }

    /// Render-time filter: a record shows up in output only when both its
    /// name and its count field are non-empty. Filtered records stay in the
    /// group, they are just skipped when rendering.
    pub fn is_displayable(&self) -> bool {
        !self.name().is_empty() && !self.count_text().is_empty()
    }
}

impl Default for Record {
    fn default() -> Self {
        Record::new()
    }
}

/// Decoded delimited text known to contain a header row plus data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularBlock {
    pub text: String,
}

impl TabularBlock {
    /// Parse the block into records. The header row determines field
    /// membership for every row: short rows pad missing trailing fields with
    /// empty values, values beyond the header are dropped.
    pub fn records(&self) -> Result<Vec<Record>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(self.text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .context("reading header row of embedded table")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.context("reading data row of embedded table")?;
            let mut record = Record::new();
            for (i, header) in headers.iter().enumerate() {
                let value = row.get(i).unwrap_or("").trim().to_string();
                record.fields.insert(header.clone(), value);
            }
            records.push(record);
        }
        Ok(records)
    }
}

/// Best-effort quantity coercion: keep only ASCII digits, so `"12個"` → 12
/// and `"個"` → 0. Lossy on purpose; decimals and signs are not supported.
pub fn coerce_quantity(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        0
    } else {
        digits.parse().unwrap_or(0)
    }
}
