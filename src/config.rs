/// Emit a progress notice every N successfully added records
pub const PROGRESS_INTERVAL: u64 = 100_000;
