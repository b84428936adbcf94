//! Aggregation queries over the record store.
//!
//! Every operation here is a pure function of the store: one scan over the
//! publication list per call, no caching, no mutation. Per-kind breakdowns
//! enumerate the four publication kinds in fixed order and close with an
//! "All Publications" column computed over the pooled sample, never derived
//! from the per-kind results.

use crate::error::QueryError;
use crate::models::{AuthorId, PubKind, Stat};
use crate::store::Bibliography;
use crate::table::{Cell, Table};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::BTreeMap;

const COUNT_COLUMNS: [&str; PubKind::COUNT] = [
    "Number of conference papers",
    "Number of journals",
    "Number of books",
    "Number of book chapters",
];

const APPEARANCE_COLUMNS: [&str; 4] = ["Author", "First author", "Last author", "Sole author"];

/// Kind labels plus a pooled trailing column.
fn stat_header(leading: &[&str], trailing: &str) -> Vec<String> {
    leading
        .iter()
        .map(|s| s.to_string())
        .chain(PubKind::ALL.iter().map(|k| k.label().to_string()))
        .chain(std::iter::once(trailing.to_string()))
        .collect()
}

/// Count-column labels plus a trailing total column.
pub(crate) fn count_header(leading: &[&str], trailing: &str) -> Vec<String> {
    leading
        .iter()
        .map(|s| s.to_string())
        .chain(COUNT_COLUMNS.iter().map(|s| s.to_string()))
        .chain(std::iter::once(trailing.to_string()))
        .collect()
}

/// Per-kind stat cells plus the stat over all samples pooled.
fn pooled_stat_cells(stat: Stat, samples: &[Vec<f64>; PubKind::COUNT]) -> Vec<Cell> {
    let mut cells: Vec<Cell> = samples.iter().map(|s| stat.apply(s).into()).collect();
    let pooled: Vec<f64> = samples.iter().flatten().copied().collect();
    cells.push(stat.apply(&pooled).into());
    cells
}

/// Column-wise stat cells over a dense sample×kind matrix, plus the stat
/// over per-row totals.
fn matrix_stat_cells(stat: Stat, matrix: &[[f64; PubKind::COUNT]]) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(PubKind::COUNT + 1);
    for k in 0..PubKind::COUNT {
        let column: Vec<f64> = matrix.iter().map(|row| row[k]).collect();
        cells.push(stat.apply(&column).into());
    }
    let totals: Vec<f64> = matrix.iter().map(|row| row.iter().sum()).collect();
    cells.push(stat.apply(&totals).into());
    cells
}

/// The per-kind first/last/sole appearance breakdown: one section per
/// publication kind plus a pooled "All Types" section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppearanceBreakdown {
    pub kinds: Vec<String>,
    pub sections: Vec<Table>,
}

impl Bibliography {
    /// Dense author×kind publication counts, indexed by author id.
    pub(crate) fn author_kind_counts(&self) -> Vec<[u64; PubKind::COUNT]> {
        let mut counts = vec![[0u64; PubKind::COUNT]; self.authors.len()];
        for p in &self.publications {
            for &a in &p.authors {
                counts[a.index()][p.kind.index()] += 1;
            }
        }
        counts
    }

    fn author_kind_counts_f64(&self) -> Vec<[f64; PubKind::COUNT]> {
        self.author_kind_counts()
            .into_iter()
            .map(|row| row.map(|n| n as f64))
            .collect()
    }

    /// Per-author [first, last, sole] counts, one section per kind plus a
    /// pooled section at the end.
    ///
    /// A sole-authored publication counts only toward the sole column; first
    /// and last are tallied only when at least two authors are listed.
    pub(crate) fn appearance_matrix(&self) -> Vec<Vec<[u64; 3]>> {
        let mut sections = vec![vec![[0u64; 3]; self.authors.len()]; PubKind::COUNT + 1];
        for p in &self.publications {
            let (Some(&first), Some(&last)) = (p.authors.first(), p.authors.last()) else {
                continue;
            };
            let k = p.kind.index();
            if p.is_sole_authored() {
                sections[k][first.index()][2] += 1;
                sections[PubKind::COUNT][first.index()][2] += 1;
            } else {
                sections[k][first.index()][0] += 1;
                sections[PubKind::COUNT][first.index()][0] += 1;
                sections[k][last.index()][1] += 1;
                sections[PubKind::COUNT][last.index()][1] += 1;
            }
        }
        sections
    }

    /// Author-list sizes per kind, pooled in the trailing column.
    pub fn average_authors_per_publication(&self, stat: Stat) -> Table {
        let mut samples: [Vec<f64>; PubKind::COUNT] = Default::default();
        for p in &self.publications {
            samples[p.kind.index()].push(p.authors.len() as f64);
        }
        let mut table = Table::new(stat_header(&[], "All Publications"));
        table.push_row(pooled_stat_cells(stat, &samples));
        table
    }

    /// Publication counts per author per kind; the trailing column applies
    /// the stat to each author's total output.
    pub fn average_publications_per_author(&self, stat: Stat) -> Table {
        let matrix = self.author_kind_counts_f64();
        let mut table = Table::new(stat_header(&[], "All Publications"));
        table.push_row(matrix_stat_cells(stat, &matrix));
        table
    }

    /// Publication counts per year in `[min_year, max_year]`; years with no
    /// publications contribute zero-valued samples. An empty store has no
    /// year range and therefore no samples.
    pub fn average_publications_in_a_year(&self, stat: Stat) -> Table {
        let matrix: Vec<[f64; PubKind::COUNT]> = match self.year_bounds() {
            Some((lo, hi)) => {
                let mut m = vec![[0f64; PubKind::COUNT]; (hi - lo + 1) as usize];
                for p in &self.publications {
                    m[(p.year - lo) as usize][p.kind.index()] += 1.0;
                }
                m
            }
            None => Vec::new(),
        };
        let mut table = Table::new(stat_header(&[], "All Publications"));
        table.push_row(matrix_stat_cells(stat, &matrix));
        table
    }

    /// Distinct authors active per year per kind. The trailing column is the
    /// per-year union across kinds, not the sum of the per-kind counts: an
    /// author publishing in two kinds in one year is one author.
    pub fn average_authors_in_a_year(&self, stat: Stat) -> Table {
        let mut table = Table::new(stat_header(&[], "All Publications"));
        let row = match self.year_bounds() {
            Some((lo, hi)) => {
                let span = (hi - lo + 1) as usize;
                let mut sets: Vec<[FxHashSet<AuthorId>; PubKind::COUNT + 1]> =
                    (0..span).map(|_| Default::default()).collect();
                for p in &self.publications {
                    let y = (p.year - lo) as usize;
                    for &a in &p.authors {
                        sets[y][p.kind.index()].insert(a);
                        sets[y][PubKind::COUNT].insert(a);
                    }
                }
                (0..=PubKind::COUNT)
                    .map(|k| {
                        let column: Vec<f64> =
                            sets.iter().map(|year| year[k].len() as f64).collect();
                        stat.apply(&column).into()
                    })
                    .collect()
            }
            None => (0..=PubKind::COUNT).map(|_| stat.apply(&[]).into()).collect(),
        };
        table.push_row(row);
        table
    }

    /// Publication and distinct-author counts per kind, with totals. The
    /// author total is the union across kinds.
    pub fn publication_summary(&self) -> Table {
        let mut pubs = [0u64; PubKind::COUNT];
        let mut authors: [FxHashSet<AuthorId>; PubKind::COUNT] = Default::default();
        for p in &self.publications {
            pubs[p.kind.index()] += 1;
            for &a in &p.authors {
                authors[p.kind.index()].insert(a);
            }
        }
        let union: FxHashSet<AuthorId> = authors.iter().flatten().copied().collect();

        let mut table = Table::new(stat_header(&["Details"], "Total"));
        let mut pub_row = vec![Cell::from("Number of publications")];
        pub_row.extend(pubs.iter().map(|&n| Cell::from(n)));
        pub_row.push(Cell::from(pubs.iter().sum::<u64>()));
        table.push_row(pub_row);

        let mut author_row = vec![Cell::from("Number of authors")];
        author_row.extend(authors.iter().map(|s| Cell::from(s.len())));
        author_row.push(Cell::from(union.len()));
        table.push_row(author_row);
        table
    }

    /// Both per-publication and per-author averages in one labelled table.
    pub fn publication_summary_average(&self, stat: Stat) -> Table {
        let mut samples: [Vec<f64>; PubKind::COUNT] = Default::default();
        for p in &self.publications {
            samples[p.kind.index()].push(p.authors.len() as f64);
        }
        let matrix = self.author_kind_counts_f64();

        let mut table = Table::new(stat_header(&["Details"], "All Publications"));
        let mut per_pub = vec![Cell::from(format!(
            "{} authors per publication",
            stat.label()
        ))];
        per_pub.extend(pooled_stat_cells(stat, &samples));
        table.push_row(per_pub);

        let mut per_author = vec![Cell::from(format!(
            "{} publications per author",
            stat.label()
        ))];
        per_author.extend(matrix_stat_cells(stat, &matrix));
        table.push_row(per_author);
        table
    }

    /// Publication counts per author, one row per author in id order.
    pub fn publications_by_author(&self) -> Table {
        let counts = self.author_kind_counts();
        let mut table = Table::new(count_header(&["Author"], "Total"));
        for (author, row) in self.authors.iter().zip(&counts) {
            let mut cells = vec![Cell::from(author.name.clone())];
            cells.extend(row.iter().map(|&n| Cell::from(n)));
            cells.push(Cell::from(row.iter().sum::<u64>()));
            table.push_row(cells);
        }
        table
    }

    /// Stat over the author-list sizes of each author's own publications.
    pub fn average_authors_per_publication_by_author(&self, stat: Stat) -> Table {
        let mut samples: Vec<[Vec<f64>; PubKind::COUNT]> =
            (0..self.authors.len()).map(|_| Default::default()).collect();
        for p in &self.publications {
            for &a in &p.authors {
                samples[a.index()][p.kind.index()].push(p.authors.len() as f64);
            }
        }

        let mut table = Table::new(stat_header(&["Author"], "All Publications"));
        for (author, per_kind) in self.authors.iter().zip(&samples) {
            let mut cells = vec![Cell::from(author.name.clone())];
            cells.extend(pooled_stat_cells(stat, per_kind));
            table.push_row(cells);
        }
        table
    }

    /// One row per (author, year) pair with at least one publication,
    /// ordered by author id then year. The year column is the literal string
    /// form of the integer.
    pub fn publications_by_author_year(&self) -> Table {
        let mut map: BTreeMap<(AuthorId, i32), [u64; PubKind::COUNT]> = BTreeMap::new();
        for p in &self.publications {
            for &a in &p.authors {
                map.entry((a, p.year)).or_default()[p.kind.index()] += 1;
            }
        }

        let mut table = Table::new(count_header(&["Author", "Year"], "Total"));
        for ((author, year), counts) in &map {
            let mut cells = vec![
                Cell::from(self.author_name(*author).to_string()),
                Cell::from(year.to_string()),
            ];
            cells.extend(counts.iter().map(|&n| Cell::from(n)));
            cells.push(Cell::from(counts.iter().sum::<u64>()));
            table.push_row(cells);
        }
        table
    }

    /// Publication counts per year, ascending.
    pub fn publications_by_year(&self) -> Table {
        let mut map: BTreeMap<i32, [u64; PubKind::COUNT]> = BTreeMap::new();
        for p in &self.publications {
            map.entry(p.year).or_default()[p.kind.index()] += 1;
        }

        let mut table = Table::new(count_header(&["Year"], "Total"));
        for (year, counts) in &map {
            let mut cells = vec![Cell::from(i64::from(*year))];
            cells.extend(counts.iter().map(|&n| Cell::from(n)));
            cells.push(Cell::from(counts.iter().sum::<u64>()));
            table.push_row(cells);
        }
        table
    }

    /// Distinct authors per year per kind; the total is the union across
    /// kinds within the year.
    pub fn author_totals_by_year(&self) -> Table {
        let mut map: BTreeMap<i32, [FxHashSet<AuthorId>; PubKind::COUNT]> = BTreeMap::new();
        for p in &self.publications {
            let sets = map.entry(p.year).or_default();
            for &a in &p.authors {
                sets[p.kind.index()].insert(a);
            }
        }

        let mut table = Table::new(count_header(&["Year"], "Total"));
        for (year, sets) in &map {
            let union: FxHashSet<AuthorId> = sets.iter().flatten().copied().collect();
            let mut cells = vec![Cell::from(i64::from(*year))];
            cells.extend(sets.iter().map(|s| Cell::from(s.len())));
            cells.push(Cell::from(union.len()));
            table.push_row(cells);
        }
        table
    }

    /// Stat over author-list sizes, sliced per year. Only years with at
    /// least one publication appear.
    pub fn average_authors_per_publication_by_year(&self, stat: Stat) -> Table {
        let mut map: BTreeMap<i32, [Vec<f64>; PubKind::COUNT]> = BTreeMap::new();
        for p in &self.publications {
            map.entry(p.year).or_default()[p.kind.index()].push(p.authors.len() as f64);
        }

        let mut table = Table::new(stat_header(&["Year"], "All Publications"));
        for (year, samples) in &map {
            let mut cells = vec![Cell::from(i64::from(*year))];
            cells.extend(pooled_stat_cells(stat, samples));
            table.push_row(cells);
        }
        table
    }

    /// Stat over per-author publication counts, sliced per year. Every known
    /// author contributes a sample to every listed year, zero when inactive.
    pub fn average_publications_per_author_by_year(&self, stat: Stat) -> Table {
        let mut map: BTreeMap<i32, Vec<[f64; PubKind::COUNT]>> = BTreeMap::new();
        for p in &self.publications {
            let matrix = map
                .entry(p.year)
                .or_insert_with(|| vec![[0f64; PubKind::COUNT]; self.authors.len()]);
            for &a in &p.authors {
                matrix[a.index()][p.kind.index()] += 1.0;
            }
        }

        let mut table = Table::new(stat_header(&["Year"], "All Publications"));
        for (year, matrix) in &map {
            let mut cells = vec![Cell::from(i64::from(*year))];
            cells.extend(matrix_stat_cells(stat, matrix));
            table.push_row(cells);
        }
        table
    }

    /// First/last/sole appearance counts per author, all kinds pooled.
    pub fn appearance_by_author(&self) -> Table {
        let sections = self.appearance_matrix();
        let pooled = &sections[PubKind::COUNT];

        let mut table = Table::new(APPEARANCE_COLUMNS);
        for (author, counts) in self.authors.iter().zip(pooled) {
            table.push_row(vec![
                Cell::from(author.name.clone()),
                Cell::from(counts[0]),
                Cell::from(counts[1]),
                Cell::from(counts[2]),
            ]);
        }
        table
    }

    /// First/last/sole appearance counts broken down per kind, with a pooled
    /// "All Types" section last. With a query, rows are restricted to the
    /// fuzzy-matched authors in rank order; an unmatched query is an error
    /// rather than an empty breakdown.
    pub fn appearance_by_kind(
        &self,
        query: Option<&str>,
    ) -> Result<AppearanceBreakdown, QueryError> {
        let selected: Vec<AuthorId> = match query {
            Some(q) => self
                .match_authors(q)?
                .iter()
                .filter_map(|name| self.author_id(name))
                .collect(),
            None => (0..self.authors.len() as u32).map(AuthorId).collect(),
        };

        let matrix = self.appearance_matrix();
        let kinds: Vec<String> = PubKind::ALL
            .iter()
            .map(|k| k.label().to_string())
            .chain(std::iter::once("All Types".to_string()))
            .collect();

        let sections = matrix
            .iter()
            .map(|section| {
                let mut table = Table::new(APPEARANCE_COLUMNS);
                for &id in &selected {
                    let counts = &section[id.index()];
                    table.push_row(vec![
                        Cell::from(self.author_name(id).to_string()),
                        Cell::from(counts[0]),
                        Cell::from(counts[1]),
                        Cell::from(counts[2]),
                    ]);
                }
                table
            })
            .collect();

        Ok(AppearanceBreakdown { kinds, sections })
    }

    /// Distinct co-author listing per author, optionally restricted by year
    /// range and kind. Each cell shows a name with its distinct co-author
    /// count within the same restriction.
    pub fn coauthor_table(
        &self,
        start_year: Option<i32>,
        end_year: Option<i32>,
        kind: Option<PubKind>,
    ) -> Table {
        let mut partners: BTreeMap<AuthorId, FxHashSet<AuthorId>> = BTreeMap::new();
        for p in &self.publications {
            if start_year.is_some_and(|s| p.year < s)
                || end_year.is_some_and(|e| p.year > e)
                || kind.is_some_and(|k| p.kind != k)
            {
                continue;
            }
            for &a in &p.authors {
                for &b in &p.authors {
                    if a != b {
                        partners.entry(a).or_default().insert(b);
                    }
                }
            }
        }

        let display =
            |id: AuthorId, set: &FxHashSet<AuthorId>| format!("{} {}", self.author_name(id), set.len());

        let mut table = Table::new(["Author", "Co-Authors"]);
        for (&a, set) in &partners {
            let mut ids: Vec<AuthorId> = set.iter().copied().collect();
            ids.sort();
            let listing: Vec<String> = ids
                .iter()
                .map(|b| display(*b, &partners[b]))
                .collect();
            table.push_row(vec![
                Cell::from(display(a, set)),
                Cell::from(listing.join(", ")),
            ]);
        }
        table
    }
}
