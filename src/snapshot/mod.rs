// src/snapshot/mod.rs
// =============================================================================
// Persistence of the frontier between crawl passes.
//
// The crawl loop calls `SnapshotSink::save` once at the end of every pass.
// A failed save is logged and the crawl carries on: the in-memory frontier
// is the source of truth, the snapshot is progress insurance.
// =============================================================================

mod file;

pub use file::JsonFileSink;

use crate::crawl::Frontier;
use crate::error::PersistenceError;

pub trait SnapshotSink: Send + Sync {
    /// Records the full frontier, replacing any earlier snapshot.
    fn save(&self, frontier: &Frontier) -> Result<(), PersistenceError>;
}
