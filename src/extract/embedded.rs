use super::scan::{self, Scan};
use super::TabularBlock;
use crate::error::ScrapeError;
use tracing::{debug, info};

/// Opening marker of the inline CSV literal. The trailing newline is part of
/// the marker: the table starts on the line after the backtick.
const OPEN_MARKER: &str = "const rentalItemsCsv = `\n";
const CLOSE_MARKER: &str = "`";

/// Locate the CSV literal embedded in the page script and return it as a
/// tabular block. Absence of the marker is a definite not-found, never a
/// fallback into structural extraction.
pub fn extract_table(html: &str) -> Result<TabularBlock, ScrapeError> {
    match scan::delimited(html, OPEN_MARKER, CLOSE_MARKER) {
        Scan::Found(csv_text) => {
            info!(len = csv_text.len(), "found embedded inventory table");
            debug!(head = %csv_text.chars().take(100).collect::<String>(), "table head");
            Ok(TabularBlock {
                text: csv_text.to_string(),
            })
        }
        Scan::NotFound => Err(ScrapeError::TableNotFound),
        Scan::Unterminated => Err(ScrapeError::UnterminatedLiteral),
    }
}
