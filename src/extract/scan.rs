/// Outcome of a two-token delimited scan. Keeping the three cases distinct is
/// the point: "marker absent" and "marker present but never closed" are
/// different failures and must not blur into one.
#[derive(Debug, PartialEq, Eq)]
pub enum Scan<'a> {
    Found(&'a str),
    NotFound,
    Unterminated,
}

/// Scan `text` for `open`, then capture everything up to the next `close`.
/// The capture excludes both tokens and is taken verbatim.
pub fn delimited<'a>(text: &'a str, open: &str, close: &str) -> Scan<'a> {
    let start = match text.find(open) {
        Some(pos) => pos + open.len(),
        None => return Scan::NotFound,
    };
    match text[start..].find(close) {
        Some(len) => Scan::Found(&text[start..start + len]),
        None => Scan::Unterminated,
    }
}
