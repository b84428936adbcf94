//! Pinakes: an in-memory bibliographic record store and query engine
//!
//! This crate ingests publication records (kind, title, year, authors, dedup
//! key) from abstract record streams and answers analytical queries over
//! them:
//!
//! 1. **Ingestion** -- Validate and append records from one or more sources,
//!    building the author-identity index as names are first seen
//! 2. **Deduplication** -- Drop records whose dedup key repeats, keeping the
//!    most recently ingested occurrence
//! 3. **Aggregation** -- Count and statistic tables (mean/median/mode) sliced
//!    by publication kind, year, and author
//! 4. **Graph** -- Co-author adjacency, network snapshots, and BFS degrees of
//!    separation
//! 5. **Search** -- Tier-ranked fuzzy author matching and the per-author
//!    reports built on it
//!
//! # Architecture
//!
//! The store is write-rare and read-many: all mutation happens in a bulk
//! ingest-then-deduplicate phase, after which every query component treats it
//! as immutable. Queries are single scans over the publication list with no
//! incremental indexes; the expected corpus (tens of thousands of records,
//! thousands of authors) does not need them. Author ids are dense and double
//! as indices into per-author tables.
//!
//! # Key Modules
//!
//! - [`store`] -- Record store, identity index, ingestion, dedup pass
//! - [`source`] -- The record-stream contract expected from upstream parsers
//! - [`queries`] -- Aggregation tables over kinds, years, and authors
//! - [`graph`] -- Co-author adjacency, network export, degrees of separation
//! - [`search`] -- Fuzzy name matching, author reports, staff roster
//! - [`average`] -- Mean/median/mode over count multisets
//! - [`table`] -- Heterogeneous `(header, rows)` result type
//! - [`export`] -- CSV output for tables and the co-author network
//! - [`models`] -- Core data types
//! - [`error`] -- Failure kinds for name-based lookups
//! - [`config`] -- Tunable constants

pub mod average;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod models;
pub mod queries;
pub mod search;
pub mod source;
pub mod store;
pub mod table;
