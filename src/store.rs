use crate::config::PROGRESS_INTERVAL;
use crate::models::{Author, AuthorId, Publication, RawRecord};
use crate::source::RecordSource;
use indicatif::ProgressBar;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

/// The in-memory record store: publication list, author table, and the
/// name-to-id identity index.
///
/// All mutation happens during [`ingest`](Bibliography::ingest) and the
/// deduplication pass; every query component reads the store and never
/// mutates it. A fresh ingestion rebuilds the store from empty rather than
/// merging into the live one.
#[derive(Debug, Default)]
pub struct Bibliography {
    pub(crate) publications: Vec<Publication>,
    pub(crate) authors: Vec<Author>,
    pub(crate) author_idx: FxHashMap<String, AuthorId>,
    pub(crate) min_year: Option<i32>,
    pub(crate) max_year: Option<i32>,
}

impl Bibliography {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append one record. Returns whether the record was
    /// retained.
    ///
    /// Records without a year or without authors never enter the store and
    /// never move the year bounds. A missing title is kept, with a warning
    /// naming the record. Author names resolve by exact string match; unseen
    /// names get the next sequential id.
    pub fn add_record(&mut self, record: RawRecord) -> bool {
        let RawRecord {
            kind,
            title,
            year,
            authors,
            key,
        } = record;

        if year.is_none() || authors.is_empty() {
            warn!(
                kind = kind.label(),
                title = title.as_deref().unwrap_or(""),
                year = year,
                authors = %authors.join(", "),
                key = %key,
                "excluding record with missing year or empty author list"
            );
            return false;
        }
        let Some(year) = year else { return false };

        if title.is_none() {
            warn!(
                kind = kind.label(),
                year,
                authors = %authors.join(", "),
                "adding record with missing title"
            );
        }

        let mut ids = Vec::with_capacity(authors.len());
        for name in authors {
            let id = match self.author_idx.get(&name) {
                Some(&id) => id,
                None => {
                    let id = AuthorId(self.authors.len() as u32);
                    self.author_idx.insert(name.clone(), id);
                    self.authors.push(Author { name });
                    id
                }
            };
            ids.push(id);
        }

        self.publications.push(Publication {
            kind,
            title,
            year,
            authors: ids,
            key,
        });

        self.min_year = Some(self.min_year.map_or(year, |y| y.min(year)));
        self.max_year = Some(self.max_year.map_or(year, |y| y.max(year)));

        if self.publications.len() as u64 % PROGRESS_INTERVAL == 0 {
            info!(
                publications = self.publications.len(),
                authors = self.authors.len(),
                "ingestion progress"
            );
        }
        true
    }

    /// Rebuild the store from a sequence of record streams.
    ///
    /// Sources contribute in order. A stream-level error ends that source's
    /// contribution but keeps the records it already produced; later sources
    /// still run. Returns `false` if any source failed.
    pub fn ingest(&mut self, mut sources: Vec<Box<dyn RecordSource>>) -> bool {
        *self = Bibliography::new();
        let mut valid = true;
        let mut added: u64 = 0;
        let pb = ProgressBar::new_spinner();

        for (n, source) in sources.iter_mut().enumerate() {
            loop {
                match source.next_record() {
                    Some(Ok(record)) => {
                        if self.add_record(record) {
                            added += 1;
                            if added % PROGRESS_INTERVAL == 0 {
                                pb.tick();
                            }
                        }
                    }
                    Some(Err(e)) => {
                        warn!(
                            source = n,
                            error = %e,
                            "record stream failed, keeping records read so far"
                        );
                        valid = false;
                        break;
                    }
                    None => break,
                }
            }
        }

        pb.finish_and_clear();
        info!(
            publications = self.publications.len(),
            authors = self.authors.len(),
            "ingestion complete"
        );
        valid
    }

    /// Drop records whose dedup key repeats, keeping the most recently
    /// ingested one of each group.
    ///
    /// Scans from the end so the last occurrence of a key is the survivor;
    /// relative order of survivors is unchanged. O(n) time and auxiliary
    /// space; a no-op on an empty store and idempotent.
    pub fn remove_duplicate_records(&mut self) {
        let before = self.publications.len();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut keep = vec![true; before];

        for i in (0..before).rev() {
            if !seen.insert(self.publications[i].key.clone()) {
                keep[i] = false;
                debug!(index = i, key = %self.publications[i].key, "dropping duplicate record");
            }
        }

        let mut i = 0;
        self.publications.retain(|_| {
            let kept = keep[i];
            i += 1;
            kept
        });

        if self.publications.len() != before {
            info!(
                before,
                after = self.publications.len(),
                "duplicate records removed"
            );
        }
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn publication_count(&self) -> usize {
        self.publications.len()
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    /// Display names in id order.
    pub fn author_names(&self) -> impl Iterator<Item = &str> {
        self.authors.iter().map(|a| a.name.as_str())
    }

    /// Exact-string lookup, no normalization.
    pub fn author_id(&self, name: &str) -> Option<AuthorId> {
        self.author_idx.get(name).copied()
    }

    pub fn author_name(&self, id: AuthorId) -> &str {
        &self.authors[id.index()].name
    }

    pub fn min_year(&self) -> Option<i32> {
        self.min_year
    }

    pub fn max_year(&self) -> Option<i32> {
        self.max_year
    }

    /// Inclusive year bounds over retained records; `None` for an empty
    /// store.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.min_year.zip(self.max_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PubKind;

    fn record(
        kind: PubKind,
        title: Option<&str>,
        year: Option<i32>,
        authors: &[&str],
        key: &str,
    ) -> RawRecord {
        RawRecord {
            kind,
            title: title.map(str::to_string),
            year,
            authors: authors.iter().map(|a| a.to_string()).collect(),
            key: key.to_string(),
        }
    }

    #[test]
    fn add_record_assigns_ids_in_first_seen_order() {
        let mut store = Bibliography::new();
        assert!(store.add_record(record(
            PubKind::Journal,
            Some("t1"),
            Some(2001),
            &["B", "A"],
            "k1"
        )));
        assert!(store.add_record(record(
            PubKind::Book,
            Some("t2"),
            Some(2002),
            &["A", "C"],
            "k2"
        )));

        assert_eq!(store.author_id("B"), Some(AuthorId(0)));
        assert_eq!(store.author_id("A"), Some(AuthorId(1)));
        assert_eq!(store.author_id("C"), Some(AuthorId(2)));
        assert_eq!(store.author_count(), 3);
        let names: Vec<_> = store.author_names().collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn author_lookup_is_case_sensitive() {
        let mut store = Bibliography::new();
        store.add_record(record(
            PubKind::Journal,
            Some("t"),
            Some(2001),
            &["Ada Lovelace"],
            "k",
        ));
        assert!(store.author_id("Ada Lovelace").is_some());
        assert!(store.author_id("ada lovelace").is_none());
        assert!(store.author_id("ADA LOVELACE").is_none());
    }

    #[test]
    fn record_without_year_is_excluded() {
        let mut store = Bibliography::new();
        assert!(!store.add_record(record(PubKind::Journal, Some("t"), None, &["A"], "k")));
        assert_eq!(store.publication_count(), 0);
        assert_eq!(store.author_count(), 0);
        assert_eq!(store.year_bounds(), None);
    }

    #[test]
    fn record_without_authors_is_excluded() {
        let mut store = Bibliography::new();
        assert!(!store.add_record(record(PubKind::Journal, Some("t"), Some(2001), &[], "k")));
        assert_eq!(store.publication_count(), 0);
        assert_eq!(store.year_bounds(), None);
    }

    #[test]
    fn record_without_title_is_kept() {
        let mut store = Bibliography::new();
        assert!(store.add_record(record(PubKind::Journal, None, Some(2001), &["A"], "k")));
        assert_eq!(store.publication_count(), 1);
        assert_eq!(store.publications()[0].title, None);
    }

    #[test]
    fn duplicate_author_within_one_record_is_preserved() {
        let mut store = Bibliography::new();
        store.add_record(record(
            PubKind::Journal,
            Some("t"),
            Some(2001),
            &["A", "A"],
            "k",
        ));
        assert_eq!(store.author_count(), 1);
        assert_eq!(
            store.publications()[0].authors,
            vec![AuthorId(0), AuthorId(0)]
        );
    }

    #[test]
    fn year_bounds_track_min_and_max() {
        let mut store = Bibliography::new();
        store.add_record(record(PubKind::Journal, Some("a"), Some(2005), &["A"], "k1"));
        assert_eq!(store.year_bounds(), Some((2005, 2005)));

        store.add_record(record(PubKind::Journal, Some("b"), Some(1999), &["A"], "k2"));
        store.add_record(record(PubKind::Journal, Some("c"), Some(2010), &["A"], "k3"));
        assert_eq!(store.year_bounds(), Some((1999, 2010)));

        for p in store.publications() {
            assert!(store.min_year().is_some_and(|y| y <= p.year));
            assert!(store.max_year().is_some_and(|y| p.year <= y));
        }
    }

    #[test]
    fn dedup_keeps_last_occurrence() {
        let mut store = Bibliography::new();
        store.add_record(record(PubKind::Journal, Some("first"), Some(2001), &["A"], "a"));
        store.add_record(record(PubKind::Journal, Some("other"), Some(2002), &["A"], "b"));
        store.add_record(record(PubKind::Journal, Some("latest"), Some(2003), &["A"], "a"));

        store.remove_duplicate_records();

        assert_eq!(store.publication_count(), 2);
        assert_eq!(store.publications()[0].key, "b");
        assert_eq!(store.publications()[1].key, "a");
        assert_eq!(store.publications()[1].title.as_deref(), Some("latest"));
    }

    #[test]
    fn dedup_preserves_survivor_order() {
        let mut store = Bibliography::new();
        for (i, key) in ["x", "y", "x", "z", "y"].iter().enumerate() {
            store.add_record(record(
                PubKind::Journal,
                Some(&format!("t{i}")),
                Some(2001),
                &["A"],
                key,
            ));
        }
        store.remove_duplicate_records();

        let keys: Vec<_> = store.publications().iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["x", "z", "y"]);
        let titles: Vec<_> = store
            .publications()
            .iter()
            .map(|p| p.title.as_deref().unwrap_or(""))
            .collect();
        assert_eq!(titles, vec!["t2", "t3", "t4"]);
    }

    #[test]
    fn dedup_is_idempotent() {
        let mut store = Bibliography::new();
        for key in ["a", "b", "a", "c", "b", "a"] {
            store.add_record(record(PubKind::Journal, Some("t"), Some(2001), &["A"], key));
        }
        store.remove_duplicate_records();
        let once: Vec<_> = store.publications().iter().map(|p| p.key.clone()).collect();
        store.remove_duplicate_records();
        let twice: Vec<_> = store.publications().iter().map(|p| p.key.clone()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn dedup_on_empty_store_is_a_noop() {
        let mut store = Bibliography::new();
        store.remove_duplicate_records();
        assert_eq!(store.publication_count(), 0);
    }
}
