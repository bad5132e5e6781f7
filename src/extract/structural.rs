use super::{coerce_quantity, Record};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::{debug, info, warn};

static GENRE_CANDIDATES: Lazy<Vec<Selector>> = Lazy::new(|| {
    [".genre-buttons button", ".genre-button"]
        .iter()
        .map(|s| Selector::parse(s).expect("genre selector should be valid"))
        .collect()
});

static DIV: Lazy<Selector> = Lazy::new(|| Selector::parse("div").expect("div selector"));
static ITEM: Lazy<Selector> = Lazy::new(|| Selector::parse("div.item").expect("item selector"));

static NAME_CANDIDATES: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["h3.item-name", "div.item-name"]
        .iter()
        .map(|s| Selector::parse(s).expect("name selector should be valid"))
        .collect()
});

static QUANTITY_CANDIDATES: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["span.item-quantity", "div.item-quantity"]
        .iter()
        .map(|s| Selector::parse(s).expect("quantity selector should be valid"))
        .collect()
});

/// Which required sub-field an item was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MissingField {
    Name,
    Quantity,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompleteItem {
    pub genre: String,
    pub missing: MissingField,
}

/// Batch statistics for one structural extraction. Dropped items and missed
/// containers are recorded here instead of only being printed, so success and
/// failure counts stay queryable after the run.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub genres_found: usize,
    pub missing_containers: Vec<String>,
    pub incomplete_items: Vec<IncompleteItem>,
    pub items_extracted: usize,
}

/// Walk the parsed page and collect one record per complete item. An item
/// missing a name or quantity sub-element is dropped with a diagnostic; a
/// genre with no resolvable container likewise. Neither aborts the batch.
pub fn extract_items(doc: &Html) -> (Vec<Record>, Diagnostics) {
    let mut diagnostics = Diagnostics::default();
    let mut records = Vec::new();

    let genres = genre_elements(doc);
    diagnostics.genres_found = genres.len();
    info!(genres = genres.len(), "located genre elements");

    for genre_el in genres {
        let genre_name = element_text(genre_el);
        debug!(genre = %genre_name, "processing genre");

        let container = match find_container(doc, &genre_name) {
            Some(c) => c,
            None => {
                warn!(genre = %genre_name, "no container found for genre");
                diagnostics.missing_containers.push(genre_name);
                continue;
            }
        };

        for item in container.select(&ITEM) {
            let name = first_text(item, &NAME_CANDIDATES);
            let quantity = first_text(item, &QUANTITY_CANDIDATES);
            match (name, quantity) {
                (Some(name), Some(quantity)) => {
                    let mut record = Record::new();
                    record.fields.insert("genre".into(), genre_name.clone());
                    record.fields.insert("name".into(), name);
                    record
                        .fields
                        .insert("quantity".into(), coerce_quantity(&quantity).to_string());
                    records.push(record);
                }
                (name, quantity) => {
                    let missing = match (name.is_none(), quantity.is_none()) {
                        (true, true) => MissingField::Both,
                        (true, false) => MissingField::Name,
                        _ => MissingField::Quantity,
                    };
                    warn!(genre = %genre_name, ?missing, "incomplete item data, skipping");
                    diagnostics.incomplete_items.push(IncompleteItem {
                        genre: genre_name.clone(),
                        missing,
                    });
                }
            }
        }
    }

    diagnostics.items_extracted = records.len();
    (records, diagnostics)
}

/// Log a coarse sketch of the page shape. Debugging aid for when extraction
/// comes back empty on a page that "should" have items.
pub fn log_page_structure(doc: &Html) {
    static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("title selector"));
    static SCRIPT: Lazy<Selector> =
        Lazy::new(|| Selector::parse("script").expect("script selector"));
    static STYLE: Lazy<Selector> = Lazy::new(|| Selector::parse("style").expect("style selector"));
    static MAIN_CANDIDATES: Lazy<Vec<Selector>> = Lazy::new(|| {
        ["main", "div#main-content", "div.container"]
            .iter()
            .map(|s| Selector::parse(s).expect("main content selector"))
            .collect()
    });

    let title = doc
        .select(&TITLE)
        .next()
        .map(element_text)
        .unwrap_or_else(|| "<no title>".to_string());
    debug!(
        title = %title,
        divs = doc.select(&DIV).count(),
        scripts = doc.select(&SCRIPT).count(),
        styles = doc.select(&STYLE).count(),
        has_main_content = MAIN_CANDIDATES.iter().any(|s| doc.select(s).next().is_some()),
        "page structure"
    );
}

/// First genre-selector rule that matches anything wins; the rules serve
/// different page revisions and are never mixed.
fn genre_elements(doc: &Html) -> Vec<ElementRef<'_>> {
    for selector in GENRE_CANDIDATES.iter() {
        let found: Vec<_> = doc.select(selector).collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

/// Ordered container lookup strategies, evaluated lazily, first hit wins:
/// id `{genre}-items`, attribute `data-genre="{genre}"`, class
/// `{genre_lower}-items`. Attribute comparison on walked divs sidesteps CSS
/// escaping of arbitrary genre names.
fn find_container<'a>(doc: &'a Html, genre: &str) -> Option<ElementRef<'a>> {
    let strategies: [for<'b> fn(&'b Html, &str) -> Option<ElementRef<'b>>; 3] =
        [container_by_id, container_by_data_attr, container_by_class];
    strategies.iter().find_map(|strategy| strategy(doc, genre))
}

fn container_by_id<'a>(doc: &'a Html, genre: &str) -> Option<ElementRef<'a>> {
    let wanted = format!("{genre}-items");
    doc.select(&DIV)
        .find(|el| el.value().attr("id") == Some(wanted.as_str()))
}

fn container_by_data_attr<'a>(doc: &'a Html, genre: &str) -> Option<ElementRef<'a>> {
    doc.select(&DIV)
        .find(|el| el.value().attr("data-genre") == Some(genre))
}

fn container_by_class<'a>(doc: &'a Html, genre: &str) -> Option<ElementRef<'a>> {
    let wanted = format!("{}-items", genre.to_lowercase());
    doc.select(&DIV).find(|el| {
        el.value()
            .attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == wanted))
            .unwrap_or(false)
    })
}

/// Text of the first sub-element matching any of the ordered alternatives.
fn first_text(scope: ElementRef<'_>, candidates: &[Selector]) -> Option<String> {
    candidates
        .iter()
        .find_map(|selector| scope.select(selector).next())
        .map(element_text)
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head><title>Rental items</title></head><body>
        <div class="genre-buttons">
            <button>Camping</button>
            <button>Kitchen</button>
            <button>Audio</button>
        </div>
        <div id="Camping-items">
            <div class="item">
                <h3 class="item-name">Tent</h3>
                <span class="item-quantity">3個</span>
            </div>
            <div class="item">
                <div class="item-name">Lantern</div>
                <div class="item-quantity">12</div>
            </div>
        </div>
        <div data-genre="Kitchen">
            <div class="item">
                <h3 class="item-name">Kettle</h3>
                <span class="item-quantity">5</span>
            </div>
            <div class="item">
                <h3 class="item-name">Grill</h3>
            </div>
        </div>
        <div class="audio-items">
            <div class="item">
                <h3 class="item-name">Speaker</h3>
                <span class="item-quantity">個</span>
            </div>
        </div>
        </body></html>"#;

    #[test]
    fn walks_all_container_strategies() {
        let doc = Html::parse_document(PAGE);
        let (records, diagnostics) = extract_items(&doc);

        assert_eq!(diagnostics.genres_found, 3);
        assert_eq!(records.len(), 4);
        assert_eq!(diagnostics.items_extracted, 4);

        let names: Vec<&str> = records.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Tent", "Lantern", "Kettle", "Speaker"]);

        // quantity is coerced at extraction time
        assert_eq!(records[0].get("quantity"), "3");
        assert_eq!(records[3].get("quantity"), "0");
    }

    #[test]
    fn incomplete_item_is_dropped_not_fatal() {
        let doc = Html::parse_document(PAGE);
        let (records, diagnostics) = extract_items(&doc);

        // Grill has no quantity sub-element; its siblings still made it.
        assert!(records.iter().all(|r| r.name() != "Grill"));
        assert!(records.iter().any(|r| r.name() == "Kettle"));
        assert_eq!(
            diagnostics.incomplete_items,
            vec![IncompleteItem {
                genre: "Kitchen".to_string(),
                missing: MissingField::Quantity,
            }]
        );
    }

    #[test]
    fn genre_without_container_is_a_diagnostic() {
        let html = r#"
            <div class="genre-button">Ghost</div>
            <div class="genre-button">Camping</div>
            <div id="Camping-items">
                <div class="item">
                    <h3 class="item-name">Tent</h3>
                    <span class="item-quantity">1</span>
                </div>
            </div>"#;
        let doc = Html::parse_document(html);
        let (records, diagnostics) = extract_items(&doc);

        assert_eq!(records.len(), 1);
        assert_eq!(diagnostics.missing_containers, vec!["Ghost".to_string()]);
    }

    #[test]
    fn fallback_genre_selector_used_when_primary_absent() {
        let html = r#"
            <button class="genre-button">Camping</button>
            <div id="Camping-items">
                <div class="item">
                    <h3 class="item-name">Tent</h3>
                    <span class="item-quantity">2</span>
                </div>
            </div>"#;
        let doc = Html::parse_document(html);
        let (records, diagnostics) = extract_items(&doc);
        assert_eq!(diagnostics.genres_found, 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].genre(), "Camping");
    }

    #[test]
    fn empty_page_yields_empty_batch() {
        let doc = Html::parse_document("<html><body></body></html>");
        let (records, diagnostics) = extract_items(&doc);
        assert!(records.is_empty());
        assert_eq!(diagnostics, Diagnostics::default());
    }
}
