use crate::fetch::RawDocument;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use tracing::{info, warn};

/// Pick the encoding for a fetched document: a declared charset wins when
/// encoding_rs knows the label, otherwise sniff the bytes.
pub fn resolve(doc: &RawDocument) -> &'static Encoding {
    if let Some(label) = &doc.declared_charset {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            info!(encoding = enc.name(), "using declared charset");
            return enc;
        }
        warn!(label = %label, "unknown declared charset, falling back to detection");
    }

    let mut detector = EncodingDetector::new();
    detector.feed(&doc.bytes, true);
    let enc = detector.guess(None, true);
    info!(encoding = enc.name(), "detected encoding");
    enc
}

/// Decode the raw bytes into text. Undecodable sequences become replacement
/// characters rather than failing the run; extraction never sees raw bytes.
pub fn decode(doc: &RawDocument) -> String {
    let enc = resolve(doc);
    let (text, _, had_errors) = enc.decode(&doc.bytes);
    if had_errors {
        warn!(
            encoding = enc.name(),
            "document contained byte sequences invalid for the chosen encoding"
        );
    }
    text.into_owned()
}
