use crate::extract::Record;
use tracing::debug;

/// Bucket for records whose genre field is absent or empty.
pub const DEFAULT_GENRE: &str = "その他";

/// Records grouped by genre. Both genre order and record order are encounter
/// order; nothing is sorted or deduplicated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenreGroups {
    groups: Vec<(String, Vec<Record>)>,
}

impl GenreGroups {
    /// Group records by their genre field, substituting [`DEFAULT_GENRE`]
    /// when it is missing or empty. First-seen genre establishes position.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut groups = GenreGroups::default();
        for record in records {
            groups.push(record);
        }
        debug!(
            genres = groups.groups.len(),
            items = groups.total(),
            "grouped records"
        );
        groups
    }

    fn push(&mut self, record: Record) {
        let genre = match record.genre() {
            "" => DEFAULT_GENRE.to_string(),
            g => g.to_string(),
        };
        match self.groups.iter_mut().find(|(name, _)| *name == genre) {
            Some((_, records)) => records.push(record),
            None => self.groups.push((genre, vec![record])),
        }
    }

    /// Genres with their records, in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.groups
            .iter()
            .map(|(genre, records)| (genre.as_str(), records.as_slice()))
    }

    pub fn genre_count(&self) -> usize {
        self.groups.len()
    }

    /// Total record count across all genres. Always equals the sum of the
    /// per-genre lengths; filtered records are still counted.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
