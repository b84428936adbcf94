use serde::Serialize;

/// The four publication kinds tracked by the store, in fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PubKind {
    ConferencePaper,
    Journal,
    Book,
    BookChapter,
}

impl PubKind {
    pub const ALL: [PubKind; 4] = [
        PubKind::ConferencePaper,
        PubKind::Journal,
        PubKind::Book,
        PubKind::BookChapter,
    ];

    pub const COUNT: usize = 4;

    /// Position in dense per-kind tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            PubKind::ConferencePaper => "Conference Paper",
            PubKind::Journal => "Journal",
            PubKind::Book => "Book",
            PubKind::BookChapter => "Book Chapter",
        }
    }
}

/// Dense author identity: assignment order is first-seen order during
/// ingestion, and the value doubles as the index into the store's author
/// table and every per-author breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AuthorId(pub u32);

impl AuthorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A distinct author display name. Names are case-sensitive and unique per
/// id; authors are never deleted.
#[derive(Debug, Clone, Serialize)]
pub struct Author {
    pub name: String,
}

/// A retained publication record. Author order is significant: the first
/// entry is the first author, the last entry the last author. Duplicate ids
/// are preserved if the source listed an author twice.
#[derive(Debug, Clone, Serialize)]
pub struct Publication {
    pub kind: PubKind,
    pub title: Option<String>,
    pub year: i32,
    pub authors: Vec<AuthorId>,
    pub key: String,
}

impl Publication {
    /// Sole-author publications have exactly one listed author.
    pub fn is_sole_authored(&self) -> bool {
        self.authors.len() == 1
    }
}

/// A record as produced by an upstream parser, before validation.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub kind: PubKind,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub authors: Vec<String>,
    pub key: String,
}

/// Statistic selector for aggregation queries. The set is closed; dispatch
/// lives in [`crate::average`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stat {
    Mean,
    Median,
    Mode,
}

impl Stat {
    pub fn label(self) -> &'static str {
        match self {
            Stat::Mean => "Mean",
            Stat::Median => "Median",
            Stat::Mode => "Mode",
        }
    }
}
