use crate::group::GenreGroups;
use std::io::{self, Write};

/// Write the grouped inventory as a plain-text summary. Records failing the
/// displayability check are skipped here but still count toward the total.
pub fn write_summary<W: Write>(out: &mut W, groups: &GenreGroups) -> io::Result<()> {
    writeln!(out, "Extracted Rental Items:")?;
    for (genre, records) in groups.iter() {
        writeln!(out)?;
        writeln!(out, "Genre: {genre}")?;
        for record in records.iter().filter(|r| r.is_displayable()) {
            writeln!(
                out,
                "  Name: {}, Quantity: {}",
                record.name(),
                record.count_text()
            )?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Total number of items: {}", groups.total())?;
    Ok(())
}

/// Summary straight to stdout.
pub fn print_summary(groups: &GenreGroups) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_summary(&mut lock, groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Record;
    use crate::group::GenreGroups;

    fn record(name: &str, genre: &str, quantity: &str) -> Record {
        let mut r = Record::new();
        r.fields.insert("name".into(), name.into());
        r.fields.insert("genre".into(), genre.into());
        r.fields.insert("quantity".into(), quantity.into());
        r
    }

    #[test]
    fn summary_skips_blank_quantities_but_counts_them() {
        let groups = GenreGroups::from_records(vec![
            record("Tent", "Camping", "3"),
            record("Lantern", "Camping", ""),
        ]);

        let mut buf = Vec::new();
        write_summary(&mut buf, &groups).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Genre: Camping"));
        assert!(text.contains("Name: Tent, Quantity: 3"));
        assert!(!text.contains("Lantern"));
        assert!(text.contains("Total number of items: 2"));
    }
}
