use crate::group::GenreGroups;
use anyhow::{Context, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocumentReference, PdfLayerReference};
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

// A4 portrait
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MARGIN_MM: f32 = 25.0;
const QUANTITY_COLUMN_MM: f32 = 140.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;
const ROW_STEP_MM: f32 = 10.0;

const OUTPUT_SUFFIX: &str = "_rental_items.pdf";

/// Write one PDF per genre into `out_dir`: genre title plus a two-column
/// table of item name and quantity. Records with no quantity are listed as
/// `N/A` rather than dropped. Returns the paths written.
///
/// `font_path` points at a TTF for non-Latin text. When it is absent or
/// unloadable the builtin Helvetica is used instead; output quality degrades
/// but the documents are still produced.
pub fn write_documents(
    groups: &GenreGroups,
    out_dir: &Path,
    font_path: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(groups.genre_count());
    for (genre, records) in groups.iter() {
        let file_name = format!("{}{}", safe_file_name(genre), OUTPUT_SUFFIX);
        let path = out_dir.join(&file_name);

        let (doc, page, layer) =
            printpdf::PdfDocument::new(genre, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let font = add_font(&doc, font_path)?;

        let mut layer = doc.get_page(page).get_layer(layer);
        let mut y = PAGE_HEIGHT_MM - 30.0;

        // Title and table header
        layer.use_text(genre, 18.0, Mm(LEFT_MARGIN_MM), Mm(y), &font);
        y -= 15.0;
        layer.use_text("レンタル品", 14.0, Mm(LEFT_MARGIN_MM), Mm(y), &font);
        layer.use_text("個数", 14.0, Mm(QUANTITY_COLUMN_MM), Mm(y), &font);
        y -= ROW_STEP_MM;

        for record in records {
            if y < BOTTOM_MARGIN_MM {
                layer = add_page(&doc);
                y = PAGE_HEIGHT_MM - 30.0;
            }
            let quantity = match record.get("quantity") {
                "" => "N/A",
                q => q,
            };
            layer.use_text(record.name(), 12.0, Mm(LEFT_MARGIN_MM), Mm(y), &font);
            layer.use_text(quantity, 12.0, Mm(QUANTITY_COLUMN_MM), Mm(y), &font);
            y -= ROW_STEP_MM;
        }

        let file = File::create(&path)
            .with_context(|| format!("creating output document {}", path.display()))?;
        doc.save(&mut BufWriter::new(file))
            .with_context(|| format!("writing output document {}", path.display()))?;
        info!(path = %path.display(), items = records.len(), "wrote genre document");
        written.push(path);
    }
    Ok(written)
}

fn add_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    doc.get_page(page).get_layer(layer)
}

/// External TTF when available, builtin Helvetica otherwise. Never fatal.
fn add_font(doc: &PdfDocumentReference, font_path: Option<&Path>) -> Result<IndirectFontRef> {
    if let Some(path) = font_path {
        match File::open(path) {
            Ok(file) => match doc.add_external_font(file) {
                Ok(font) => return Ok(font),
                Err(err) => {
                    warn!(path = %path.display(), %err, "font not usable, falling back to builtin")
                }
            },
            Err(err) => {
                warn!(path = %path.display(), %err, "font not readable, falling back to builtin")
            }
        }
    }
    doc.add_builtin_font(BuiltinFont::Helvetica)
        .context("registering builtin fallback font")
}

/// Genre names become file names; keep them path-safe.
fn safe_file_name(genre: &str) -> String {
    genre
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect()
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
    fn writes_one_document_per_genre_with_builtin_font() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let groups = GenreGroups::from_records(vec![
            record("Tent", "Camping", "3"),
            record("Lantern", "Camping", ""),
            record("Kettle", "Kitchen", "5"),
        ]);

        let written = write_documents(&groups, dir.path(), None)?;
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("Camping_rental_items.pdf").is_file());
        assert!(dir.path().join("Kitchen_rental_items.pdf").is_file());
        for path in &written {
            assert!(std::fs::metadata(path)?.len() > 0);
        }
        Ok(())
    }

    #[test]
    fn missing_font_file_degrades_but_still_writes() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let groups = GenreGroups::from_records(vec![record("Tent", "Camping", "3")]);

        let written =
            write_documents(&groups, dir.path(), Some(Path::new("/no/such/font.ttf")))?;
        assert_eq!(written.len(), 1);
        assert!(written[0].is_file());
        Ok(())
    }

    #[test]
    fn genre_names_are_made_path_safe() {
        assert_eq!(safe_file_name("A/V gear"), "A_V gear");
        assert_eq!(safe_file_name("Camping"), "Camping");
    }
}
