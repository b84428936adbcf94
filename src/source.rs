use crate::models::RawRecord;
use anyhow::Result;

/// A pull-based stream of bibliographic records, as produced by an upstream
/// parser.
///
/// `next_record` returns `None` once the stream is exhausted. A malformed
/// stream surfaces a single `Err` item; the store keeps whatever the stream
/// yielded before the error and moves on to the next source.
pub trait RecordSource {
    fn next_record(&mut self) -> Option<Result<RawRecord>>;
}

/// Source over already-materialized records; never fails.
pub struct VecSource {
    records: std::vec::IntoIter<RawRecord>,
}

impl VecSource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }
}

impl RecordSource for VecSource {
    fn next_record(&mut self) -> Option<Result<RawRecord>> {
        self.records.next().map(Ok)
    }
}
