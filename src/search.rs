//! Fuzzy author search and the reports derived from it.
//!
//! Matching assigns each candidate name at most one of seven tiers, lower
//! being better. Token-equality rules are tried first (exact name, last
//! token, first token, middle token), then prefix and substring rules.
//! Comparisons are case-insensitive; results keep the stored casing.

use crate::error::QueryError;
use crate::models::{AuthorId, PubKind};
use crate::queries::count_header;
use crate::store::Bibliography;
use crate::table::{Cell, Table};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::BTreeMap;

/// Allow-list of known-internal author names, supplied by the surrounding
/// application. Membership is an exact string match on the display name.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    names: FxHashSet<String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Roster {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Per-kind tally used by the author detail payload, broken out in the
/// report's display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KindTally {
    pub overall: u64,
    pub journals: u64,
    pub conference_papers: u64,
    pub books: u64,
    pub book_chapters: u64,
}

/// Detail payload for a single, exactly-named author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorProfile {
    pub name: String,
    pub publications: KindTally,
    pub first_author: KindTally,
    pub last_author: KindTally,
    pub sole_author: KindTally,
    pub coauthors: u64,
}

/// Tier for one candidate, or `None` when the name does not match at all.
fn match_tier(name: &str, query_lower: &str) -> Option<u8> {
    let name_lower = name.to_lowercase();
    if name_lower == query_lower {
        return Some(0);
    }

    let tokens: Vec<&str> = name_lower.split_whitespace().collect();
    let last = tokens.len().saturating_sub(1);
    for (i, token) in tokens.iter().enumerate() {
        if *token == query_lower {
            return Some(if i == last {
                1
            } else if i == 0 {
                3
            } else {
                5
            });
        }
    }

    if tokens.last().is_some_and(|t| t.starts_with(query_lower)) {
        return Some(2);
    }
    if tokens.first().is_some_and(|t| t.starts_with(query_lower)) {
        return Some(4);
    }
    if name_lower.contains(query_lower) {
        return Some(6);
    }
    None
}

fn first_token(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

fn last_token(name: &str) -> &str {
    name.split_whitespace().next_back().unwrap_or(name)
}

impl Bibliography {
    /// All author names matching the query, best tier first; ties order by
    /// last then first token. An empty query matches nothing, and a result
    /// set of zero names is an error, never an empty success.
    pub fn match_authors(&self, query: &str) -> Result<Vec<String>, QueryError> {
        if query.is_empty() {
            return Err(QueryError::NotFound(query.to_string()));
        }

        let query_lower = query.to_lowercase();
        let mut ranked: Vec<(u8, &str)> = Vec::new();
        for author in &self.authors {
            if let Some(tier) = match_tier(&author.name, &query_lower) {
                ranked.push((tier, author.name.as_str()));
            }
        }

        if ranked.is_empty() {
            return Err(QueryError::NotFound(query.to_string()));
        }

        ranked.sort_by(|(tier_a, a), (tier_b, b)| {
            tier_a
                .cmp(tier_b)
                .then_with(|| last_token(a).cmp(last_token(b)))
                .then_with(|| first_token(a).cmp(first_token(b)))
        });
        Ok(ranked.into_iter().map(|(_, name)| name.to_string()).collect())
    }

    /// Publication, co-author, and first/last appearance counts for every
    /// author matching the query, in rank order.
    pub fn author_report(&self, query: &str) -> Result<Table, QueryError> {
        let names = self.match_authors(query)?;
        let counts = self.author_kind_counts();
        let appearance = self.appearance_matrix();
        let pooled = &appearance[PubKind::COUNT];

        let mut table = Table::new([
            "Author",
            "Number of conference papers",
            "Number of journals",
            "Number of books",
            "Number of book chapters",
            "Number of publications",
            "Number of co-authors",
            "Number of first author",
            "Number of last author",
        ]);
        for name in &names {
            let Some(id) = self.author_id(name) else { continue };
            let kind_counts = &counts[id.index()];
            let appearances = &pooled[id.index()];
            let mut row = vec![Cell::from(name.clone())];
            row.extend(kind_counts.iter().map(|&n| Cell::from(n)));
            row.push(Cell::from(kind_counts.iter().sum::<u64>()));
            row.push(Cell::from(self.collaborations(id, false).len()));
            row.push(Cell::from(appearances[0]));
            row.push(Cell::from(appearances[1]));
            table.push_row(row);
        }
        Ok(table)
    }

    /// Per-year publication counts for every author matching the query:
    /// matched names in rank order, each author's rows ascending by year.
    pub fn author_activity_by_year(&self, query: &str) -> Result<Table, QueryError> {
        let names = self.match_authors(query)?;

        let mut map: BTreeMap<(AuthorId, i32), [u64; PubKind::COUNT]> = BTreeMap::new();
        for p in &self.publications {
            for &a in &p.authors {
                map.entry((a, p.year)).or_default()[p.kind.index()] += 1;
            }
        }

        let mut table = Table::new(count_header(&["Author", "Year"], "Total publications"));
        for name in &names {
            let Some(id) = self.author_id(name) else { continue };
            for ((_, year), kind_counts) in map.range((id, i32::MIN)..=(id, i32::MAX)) {
                let mut row = vec![Cell::from(name.clone()), Cell::from(year.to_string())];
                row.extend(kind_counts.iter().map(|&n| Cell::from(n)));
                row.push(Cell::from(kind_counts.iter().sum::<u64>()));
                table.push_row(row);
            }
        }
        Ok(table)
    }

    /// Detail payload for an exactly-named author. The name must be present
    /// verbatim; no fuzzy ranking is applied.
    pub fn author_profile(&self, name: &str) -> Result<AuthorProfile, QueryError> {
        let id = self
            .author_id(name)
            .ok_or_else(|| QueryError::UnknownAuthor(name.to_string()))?;

        let counts_by_author = self.author_kind_counts();
        let counts = &counts_by_author[id.index()];
        let appearance = self.appearance_matrix();
        let tally = |column: usize| KindTally {
            overall: appearance[PubKind::COUNT][id.index()][column],
            journals: appearance[PubKind::Journal.index()][id.index()][column],
            conference_papers: appearance[PubKind::ConferencePaper.index()][id.index()][column],
            books: appearance[PubKind::Book.index()][id.index()][column],
            book_chapters: appearance[PubKind::BookChapter.index()][id.index()][column],
        };

        Ok(AuthorProfile {
            name: self.author_name(id).to_string(),
            publications: KindTally {
                overall: counts.iter().sum(),
                journals: counts[PubKind::Journal.index()],
                conference_papers: counts[PubKind::ConferencePaper.index()],
                books: counts[PubKind::Book.index()],
                book_chapters: counts[PubKind::BookChapter.index()],
            },
            first_author: tally(0),
            last_author: tally(1),
            sole_author: tally(2),
            coauthors: self.collaborations(id, false).len() as u64,
        })
    }

    /// Collaborators of an exactly-named author that are not on the roster,
    /// sorted by last name token.
    pub fn external_coauthors(
        &self,
        name: &str,
        roster: &Roster,
    ) -> Result<Vec<String>, QueryError> {
        let id = self
            .author_id(name)
            .ok_or_else(|| QueryError::UnknownAuthor(name.to_string()))?;

        let mut external: Vec<String> = self
            .collaborations(id, false)
            .keys()
            .map(|&partner| self.author_name(partner).to_string())
            .filter(|partner| !roster.contains(partner))
            .collect();
        external.sort_by(|a, b| last_token(a).cmp(last_token(b)));
        Ok(external)
    }
}
