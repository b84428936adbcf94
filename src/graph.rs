//! Co-author graph queries.
//!
//! Adjacency is derived from the record store on demand: two authors are
//! adjacent iff they co-occur in at least one publication's author list.
//! Nothing here mutates the store.

use crate::error::QueryError;
use crate::models::AuthorId;
use crate::store::Bibliography;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;

/// One author in the network snapshot, with their distinct collaborator
/// count (self excluded).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkNode {
    pub name: String,
    pub collaborators: usize,
}

/// All author nodes plus every undirected collaboration edge, each unordered
/// pair emitted once with the lower id first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSnapshot {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<(AuthorId, AuthorId)>,
}

/// Degrees of separation between two authors.
///
/// The reported count is the raw BFS distance minus one, uniformly: direct
/// co-authors are 0 apart and an author is -1 from themself. A pair with no
/// connecting chain is `Unreachable`, which renders as the `X` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Separation {
    Degrees(i64),
    Unreachable,
}

impl fmt::Display for Separation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Separation::Degrees(n) => write!(f, "{n}"),
            Separation::Unreachable => write!(f, "X"),
        }
    }
}

impl Bibliography {
    /// Shared-publication counts per co-author. Each occurrence in an author
    /// list counts, so a name listed twice on one publication tallies twice.
    /// The author's own entry is removed unless `include_self` is set.
    pub fn collaborations(&self, author: AuthorId, include_self: bool) -> FxHashMap<AuthorId, u64> {
        let mut shared: FxHashMap<AuthorId, u64> = FxHashMap::default();
        for p in &self.publications {
            if p.authors.contains(&author) {
                for &a in &p.authors {
                    *shared.entry(a).or_insert(0) += 1;
                }
            }
        }
        if !include_self {
            shared.remove(&author);
        }
        shared
    }

    /// Name-keyed collaboration counts including the author's own
    /// publication tally, in id order.
    pub fn coauthor_details(&self, name: &str) -> Result<Vec<(String, u64)>, QueryError> {
        let id = self
            .author_id(name)
            .ok_or_else(|| QueryError::UnknownAuthor(name.to_string()))?;
        let shared = self.collaborations(id, true);
        let mut pairs: Vec<(AuthorId, u64)> = shared.into_iter().collect();
        pairs.sort();
        Ok(pairs
            .into_iter()
            .map(|(a, count)| (self.author_name(a).to_string(), count))
            .collect())
    }

    /// Every author node with its collaborator count, plus the undirected
    /// edge set, deterministically ordered.
    pub fn network_snapshot(&self) -> NetworkSnapshot {
        let mut nodes = Vec::with_capacity(self.authors.len());
        let mut edges: BTreeSet<(AuthorId, AuthorId)> = BTreeSet::new();

        for (i, author) in self.authors.iter().enumerate() {
            let id = AuthorId(i as u32);
            let shared = self.collaborations(id, false);
            nodes.push(NetworkNode {
                name: author.name.clone(),
                collaborators: shared.len(),
            });
            for &partner in shared.keys() {
                if id < partner {
                    edges.insert((id, partner));
                }
            }
        }

        NetworkSnapshot {
            nodes,
            edges: edges.into_iter().collect(),
        }
    }

    /// Degrees of separation between two named authors.
    ///
    /// Breadth-first search from the first author over the derived
    /// adjacency. When a frontier reaches an already-labelled author the
    /// smaller distance wins, so ties cannot inflate the result. Either name
    /// missing from the index is an `UnknownAuthor` error.
    pub fn separation(&self, name_a: &str, name_b: &str) -> Result<Separation, QueryError> {
        let start = self
            .author_id(name_a)
            .ok_or_else(|| QueryError::UnknownAuthor(name_a.to_string()))?;
        let target = self
            .author_id(name_b)
            .ok_or_else(|| QueryError::UnknownAuthor(name_b.to_string()))?;

        let mut distance: Vec<Option<u32>> = vec![None; self.authors.len()];
        let mut visited = vec![false; self.authors.len()];
        distance[start.index()] = Some(0);
        let mut queue = VecDeque::from([start]);

        while let Some(head) = queue.pop_front() {
            if visited[head.index()] {
                continue;
            }
            visited[head.index()] = true;
            let next = match distance[head.index()] {
                Some(d) => d + 1,
                None => continue,
            };
            for &partner in self.collaborations(head, false).keys() {
                let slot = &mut distance[partner.index()];
                *slot = Some(slot.map_or(next, |d| d.min(next)));
                if !visited[partner.index()] {
                    queue.push_back(partner);
                }
            }
        }

        Ok(match distance[target.index()] {
            Some(raw) => Separation::Degrees(i64::from(raw) - 1),
            None => Separation::Unreachable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PubKind, RawRecord};

    fn add(store: &mut Bibliography, authors: &[&str], key: &str) {
        assert!(store.add_record(RawRecord {
            kind: PubKind::ConferencePaper,
            title: Some(format!("title {key}")),
            year: Some(2001),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            key: key.to_string(),
        }));
    }

    /// Two chains: A-B-C-D-E and the isolated pair F-G.
    fn chained_store() -> Bibliography {
        let mut store = Bibliography::new();
        add(&mut store, &["A", "B"], "k1");
        add(&mut store, &["B", "C"], "k2");
        add(&mut store, &["C", "D"], "k3");
        add(&mut store, &["D", "E"], "k4");
        add(&mut store, &["F", "G"], "k5");
        store
    }

    #[test]
    fn collaborations_count_shared_publications() {
        let mut store = Bibliography::new();
        add(&mut store, &["A", "B"], "k1");
        add(&mut store, &["A", "B"], "k2");
        add(&mut store, &["A", "C"], "k3");

        let a = store.author_id("A").unwrap();
        let b = store.author_id("B").unwrap();
        let c = store.author_id("C").unwrap();

        let shared = store.collaborations(a, false);
        assert_eq!(shared.get(&b), Some(&2));
        assert_eq!(shared.get(&c), Some(&1));
        assert!(!shared.contains_key(&a));

        let with_self = store.collaborations(a, true);
        assert_eq!(with_self.get(&a), Some(&3));
    }

    #[test]
    fn adjacency_is_symmetric() {
        let store = chained_store();
        for (i, _) in store.authors().iter().enumerate() {
            let a = AuthorId(i as u32);
            for &b in store.collaborations(a, false).keys() {
                assert!(
                    store.collaborations(b, false).contains_key(&a),
                    "edge {a:?} -> {b:?} missing its reverse"
                );
            }
        }
    }

    #[test]
    fn collaborations_for_isolated_author_are_empty() {
        let mut store = Bibliography::new();
        add(&mut store, &["Solo"], "k1");
        let id = store.author_id("Solo").unwrap();
        assert!(store.collaborations(id, false).is_empty());
    }

    #[test]
    fn coauthor_details_include_self_in_id_order() {
        let mut store = Bibliography::new();
        add(&mut store, &["A", "B"], "k1");
        let details = store.coauthor_details("A").unwrap();
        assert_eq!(details, vec![("A".to_string(), 1), ("B".to_string(), 1)]);
    }

    #[test]
    fn coauthor_details_unknown_name() {
        let store = chained_store();
        assert_eq!(
            store.coauthor_details("Nobody").unwrap_err(),
            QueryError::UnknownAuthor("Nobody".into())
        );
    }

    #[test]
    fn network_snapshot_nodes_and_edges() {
        let mut store = Bibliography::new();
        add(&mut store, &["A", "B"], "k1");
        let snapshot = store.network_snapshot();
        assert_eq!(
            snapshot.nodes,
            vec![
                NetworkNode {
                    name: "A".into(),
                    collaborators: 1
                },
                NetworkNode {
                    name: "B".into(),
                    collaborators: 1
                },
            ]
        );
        assert_eq!(snapshot.edges, vec![(AuthorId(0), AuthorId(1))]);
    }

    #[test]
    fn network_snapshot_emits_each_edge_once() {
        let store = chained_store();
        let snapshot = store.network_snapshot();
        assert_eq!(snapshot.edges.len(), 5);
        for &(low, high) in &snapshot.edges {
            assert!(low < high);
        }
    }

    #[test]
    fn separation_counts_edges_between_collaborator_sets() {
        let store = chained_store();
        assert_eq!(
            store.separation("A", "B").unwrap(),
            Separation::Degrees(0)
        );
        assert_eq!(
            store.separation("A", "C").unwrap(),
            Separation::Degrees(1)
        );
        assert_eq!(
            store.separation("A", "E").unwrap(),
            Separation::Degrees(3)
        );
    }

    #[test]
    fn separation_to_self_is_minus_one() {
        let store = chained_store();
        assert_eq!(
            store.separation("A", "A").unwrap(),
            Separation::Degrees(-1)
        );
    }

    #[test]
    fn separation_across_components_is_unreachable() {
        let store = chained_store();
        assert_eq!(
            store.separation("A", "F").unwrap(),
            Separation::Unreachable
        );
        assert_eq!(store.separation("A", "F").unwrap().to_string(), "X");
    }

    #[test]
    fn separation_unknown_author_is_an_error() {
        let store = chained_store();
        assert_eq!(
            store.separation("A", "Nobody").unwrap_err(),
            QueryError::UnknownAuthor("Nobody".into())
        );
        assert_eq!(
            store.separation("", "A").unwrap_err(),
            QueryError::UnknownAuthor("".into())
        );
    }

    #[test]
    fn separation_takes_the_shortest_of_multiple_paths() {
        let mut store = Bibliography::new();
        // long way round: A-B-C-D, short cut: A-D
        add(&mut store, &["A", "B"], "k1");
        add(&mut store, &["B", "C"], "k2");
        add(&mut store, &["C", "D"], "k3");
        add(&mut store, &["A", "D"], "k4");
        assert_eq!(
            store.separation("A", "D").unwrap(),
            Separation::Degrees(0)
        );
        assert_eq!(
            store.separation("B", "D").unwrap(),
            Separation::Degrees(1)
        );
    }
}
